//! Hotel listing, rate and price calendar models

use serde::Serialize;

/// A normalized hotel listing
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct Hotel {
    pub hotel_id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub rating: f64,
    pub review_count: u64,
    /// Nightly price in `currency`; `None` when the provider shows no price
    pub price_per_night: Option<f64>,
    pub price_min: f64,
    pub price_max: f64,
    pub currency: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub image_url: Option<String>,
    pub url: Option<String>,
    pub accommodation_type: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
}

/// One booking site's quote for a stay
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct RateQuote {
    pub code: String,
    pub name: String,
    pub rate: Option<f64>,
    pub tax: Option<f64>,
}

/// The cheapest quote of a pricing lookup
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct BestRate {
    pub code: String,
    pub name: String,
    pub rate: Option<f64>,
    pub rate_per_night: Option<f64>,
}

/// Rates across booking sites for one hotel and stay
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct HotelPricing {
    pub hotel_key: String,
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub rooms: u32,
    pub currency: String,
    pub rates: Vec<RateQuote>,
    pub best_rate: Option<BestRate>,
    pub timestamp: Option<i64>,
}

/// Price calendar buckets
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct PriceHeatmap {
    pub average_price_days: Vec<String>,
    pub cheap_price_days: Vec<String>,
    pub high_price_days: Vec<String>,
}

/// Price calendar for one hotel
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct HotelHeatmap {
    pub hotel_key: String,
    pub check_out: String,
    pub heatmap: PriceHeatmap,
    pub timestamp: Option<i64>,
}
