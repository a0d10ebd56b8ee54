//! Flight offer models

use serde::Serialize;

/// A single leg of a flight offer
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct FlightSegment {
    pub airline: String,
    pub flight_number: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub duration_minutes: u64,
    pub airplane: String,
    pub travel_class: String,
}

/// A connection between two segments
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Layover {
    pub airport: String,
    pub code: String,
    pub duration_minutes: u64,
}

/// A normalized flight offer
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Flight {
    pub flight_id: String,
    pub price: f64,
    pub currency: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    pub arrival_date: String,
    pub return_departure: Option<String>,
    pub return_arrival: Option<String>,
    /// Token for fetching return options of a round trip
    pub return_token: Option<String>,
    /// ISO-8601 total travel time
    pub duration: String,
    pub stops: u32,
    pub direct: bool,
    pub segments: Vec<FlightSegment>,
    pub layovers: Vec<Layover>,
    /// Grams of CO2 for this itinerary
    pub carbon_emissions: Option<i64>,
}
