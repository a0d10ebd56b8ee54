//! Geographic point used as the centre of nearby searches

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point, rejecting coordinates outside the valid ranges
    pub fn new(lat: f64, lon: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!("Latitude must be between -90 and 90, got {lat}"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(format!("Longitude must be between -180 and 180, got {lon}"));
        }
        Ok(Self { lat, lon })
    }

    /// Great-circle distance to another point in metres
    #[must_use]
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let from = HaversineLocation {
            latitude: self.lat,
            longitude: self.lon,
        };
        let to = HaversineLocation {
            latitude: other.lat,
            longitude: other.lon,
        };
        distance(from, to, Units::Kilometers) * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_validation() {
        assert!(GeoPoint::new(48.8566, 2.3522).is_ok());
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_distance_meters() {
        let louvre = GeoPoint::new(48.8606, 2.3376).unwrap();
        let eiffel = GeoPoint::new(48.8584, 2.2945).unwrap();
        let meters = louvre.distance_meters(&eiffel);
        assert!(meters > 3000.0 && meters < 3400.0, "got {meters}");
        assert_eq!(louvre.distance_meters(&louvre), 0.0);
    }
}
