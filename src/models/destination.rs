//! Destination and point-of-interest models

use serde::Serialize;

/// A place a traveller can search for
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Destination {
    pub name: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// `city` for populated places, `location` otherwise
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub url: Option<String>,
}

/// A normalized point of interest
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Attraction {
    pub id: Option<String>,
    pub name: String,
    pub category: String,
    pub description: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Distance from the search centre in metres, `0` when unknown
    pub distance: f64,
    pub rating: f64,
    pub image_url: Option<String>,
}

/// Full record for a single point of interest
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct AttractionDetails {
    pub id: String,
    pub name: String,
    pub address: String,
    pub description: String,
    pub categories: Vec<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub rating: f64,
    pub wikipedia: Option<String>,
}
