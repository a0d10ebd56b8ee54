//! REST surface of the search service
//!
//! List endpoints always answer 200 with a `{<key>, count}` envelope, even
//! when every provider came back empty. Single-resource lookups answer the
//! resource itself or an error body produced by [`ApiError`].

mod error;
mod flights;
mod hotels;
mod insights;
mod listing;
mod places;

use std::sync::Arc;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::search::SearchService;

pub use error::ApiError;
pub use listing::Listing;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
}

impl AppState {
    pub fn new(search: Arc<SearchService>) -> Self {
        Self { search }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search/destinations", get(places::search_destinations))
        .route("/search/attractions", get(places::search_attractions))
        .route("/search/attractions/{id}", get(places::attraction_details))
        .route(
            "/search/attractions-enriched",
            get(places::search_attractions_enriched),
        )
        .route(
            "/search/attractions-serp",
            get(places::search_attractions_enriched),
        )
        .route("/search/hotels", get(hotels::search_hotels))
        .route("/search/hotels/{hotel_key}", get(hotels::hotel_details))
        .route("/search/hotels/{hotel_key}/pricing", get(hotels::hotel_pricing))
        .route("/search/hotels/{hotel_key}/heatmap", get(hotels::hotel_heatmap))
        .route("/search/flights", get(flights::search_flights))
        .route("/search/flights/status", get(flights::flight_status))
        .route("/search/flights/price", post(flights::price_flight))
        .route("/search/flights/{flight_id}", get(flights::flight_details))
        .route("/search/flights/{flight_id}/seatmap", get(flights::flight_seatmap))
        .route("/search/airports", get(flights::search_airports))
        .route("/search/flight-destinations", get(insights::flight_destinations))
        .route("/search/cheapest-dates", get(insights::cheapest_dates))
        .route(
            "/search/recommended-locations",
            get(insights::recommended_locations),
        )
        .route("/search/activities", get(insights::activities))
        .route("/search/most-traveled", get(insights::most_traveled))
        .route("/search/guides/{destination}", get(places::destination_guide))
        .route("/search/tips/{destination}", get(places::travel_tips))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}
