//! Search queries accepted by the capability aggregators
//!
//! Each query validates its own mandatory fields so that malformed requests
//! fail before any provider is contacted.

use chrono::NaiveDate;

use super::GeoPoint;

/// Default attraction search radius in metres
pub const DEFAULT_RADIUS_METERS: u32 = 5000;
/// Default number of list results
pub const DEFAULT_LIMIT: usize = 20;
/// Upper bound on list results
pub const MAX_LIMIT: usize = 100;

/// Free-text destination lookup
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationQuery {
    pub query: String,
    pub limit: usize,
}

impl DestinationQuery {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into().trim().to_string(),
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.query.is_empty() {
            return Err("Query parameter is required".to_string());
        }
        Ok(())
    }
}

/// Points-of-interest lookup around a place or a coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct AttractionQuery {
    /// Free-text location, ignored for geo dispatch when `center` is set
    pub location: Option<String>,
    pub center: Option<GeoPoint>,
    /// Provider category filter such as `museums` or `interesting_places`
    pub category: Option<String>,
    pub radius_meters: u32,
    pub limit: usize,
}

impl Default for AttractionQuery {
    fn default() -> Self {
        Self {
            location: None,
            center: None,
            category: None,
            radius_meters: DEFAULT_RADIUS_METERS,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl AttractionQuery {
    pub fn validate(&self) -> Result<(), String> {
        let has_location = self.location.as_deref().is_some_and(|l| !l.trim().is_empty());
        if !has_location && self.center.is_none() {
            return Err("Either location or lat/lon coordinates are required".to_string());
        }
        if self.radius_meters == 0 {
            return Err("Radius must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Free-text place qualifying image lookups; empty for coordinate searches
    #[must_use]
    pub fn place_label(&self) -> String {
        self.location
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string()
    }
}

/// Hotel availability lookup
#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuery {
    pub location: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub limit: usize,
}

impl HotelQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.location.trim().is_empty()
            || self.check_in.trim().is_empty()
            || self.check_out.trim().is_empty()
        {
            return Err("Location, check_in, and check_out are required".to_string());
        }
        let check_in = parse_date("check_in", &self.check_in)?;
        let check_out = parse_date("check_out", &self.check_out)?;
        if check_out <= check_in {
            return Err("check_out must be after check_in".to_string());
        }
        if self.guests == 0 {
            return Err("guests must be at least 1".to_string());
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price)
            && min > max
        {
            return Err("min_price cannot exceed max_price".to_string());
        }
        Ok(())
    }

    /// Whether a nightly price lies inside the requested bounds
    #[must_use]
    pub fn accepts_price(&self, price: Option<f64>) -> bool {
        let Some(price) = price else {
            return true;
        };
        self.min_price.is_none_or(|min| price >= min) && self.max_price.is_none_or(|max| price <= max)
    }
}

/// Cabin class requested for a flight search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CabinClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    /// Lenient parse; unknown values fall back to economy
    #[must_use]
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "premium" | "premium_economy" => Self::PremiumEconomy,
            "business" => Self::Business,
            "first" => Self::First,
            _ => Self::Economy,
        }
    }

    /// Numeric travel class of the metasearch engine
    #[must_use]
    pub fn metasearch_code(self) -> u8 {
        match self {
            Self::Economy => 1,
            Self::PremiumEconomy => 2,
            Self::Business => 3,
            Self::First => 4,
        }
    }

    /// Travel class keyword of the GDS offer API
    #[must_use]
    pub fn gds_code(self) -> &'static str {
        match self {
            Self::Economy => "ECONOMY",
            Self::PremiumEconomy => "PREMIUM_ECONOMY",
            Self::Business => "BUSINESS",
            Self::First => "FIRST",
        }
    }
}

/// Flight offer lookup
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub passengers: u32,
    pub cabin: CabinClass,
}

impl FlightQuery {
    /// Build a query with airport identifiers cleaned up
    #[must_use]
    pub fn new(
        origin: &str,
        destination: &str,
        departure_date: &str,
        return_date: Option<&str>,
        passengers: u32,
        cabin: CabinClass,
    ) -> Self {
        Self {
            origin: clean_airport_id(origin),
            destination: clean_airport_id(destination),
            departure_date: departure_date.trim().to_string(),
            return_date: return_date
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            passengers,
            cabin,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.origin.is_empty() || self.destination.is_empty() || self.departure_date.is_empty() {
            return Err("Origin, destination, and departure_date are required".to_string());
        }
        validate_airport_id("origin", &self.origin)?;
        validate_airport_id("destination", &self.destination)?;
        let departure = parse_date("departure_date", &self.departure_date)?;
        if let Some(return_date) = &self.return_date
            && parse_date("return_date", return_date)? < departure
        {
            return Err("return_date cannot be before departure_date".to_string());
        }
        if !(1..=9).contains(&self.passengers) {
            return Err("passengers must be between 1 and 9".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }
}

/// Strip whitespace and `+` signs; IATA codes are upper-cased, place ids kept verbatim
#[must_use]
pub fn clean_airport_id(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '+')
        .collect();
    if is_place_id(&cleaned) {
        cleaned
    } else {
        cleaned.to_uppercase()
    }
}

/// Three ASCII letters
#[must_use]
pub fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// Knowledge-graph place identifier such as `/m/02_286`
#[must_use]
pub fn is_place_id(code: &str) -> bool {
    code.starts_with("/m/") && code.len() > 3
}

fn validate_airport_id(field: &str, code: &str) -> Result<(), String> {
    if is_iata_code(code) || is_place_id(code) {
        Ok(())
    } else {
        Err(format!(
            "Invalid {field} airport code: '{code}'. Must be a 3-letter IATA code (e.g., ATL, JFK) or select from airport suggestions."
        ))
    }
}

/// Parse a `YYYY-MM-DD` date, naming the field on failure
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid {field} '{value}'. Expected YYYY-MM-DD"))
}
