//! Flight inspiration, analytics and activity models

use serde::Serialize;
use serde_json::Value;

/// A cheap destination reachable from an origin
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct FlightDestination {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
}

/// Cheapest travel dates for a route
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct CheapestDate {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
}

/// A destination recommended for travellers from given cities
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct RecommendedLocation {
    pub name: String,
    pub iata_code: String,
    pub subtype: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub relevance: Option<f64>,
}

/// A bookable tour or activity
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Activity {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Option<f64>,
    pub currency: String,
    pub rating: Option<f64>,
    pub pictures: Vec<String>,
    pub booking_link: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// A destination ranked by traveller volume
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct TraveledDestination {
    pub destination: String,
    pub subtype: String,
    pub flights_score: Option<f64>,
    pub travelers_score: Option<f64>,
}

/// Pass-through payloads with no stable schema (status, seat maps, pricing)
pub type RawDocument = Value;
