use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use super::listing::{Listing, NO_HOTELS, Params};
use super::places::clamp_limit;
use super::{ApiError, AppState};
use crate::models::query::DEFAULT_LIMIT;
use crate::models::{Hotel, HotelHeatmap, HotelPricing, HotelQuery};
use crate::search::PricingQuery;

const DEFAULT_GUESTS: u32 = 2;

#[derive(Debug, Deserialize)]
pub struct HotelParams {
    #[serde(default)]
    location: String,
    #[serde(default)]
    check_in: String,
    #[serde(default)]
    check_out: String,
    guests: Option<u32>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PricingParams {
    #[serde(default)]
    check_in: String,
    #[serde(default)]
    check_out: String,
    guests: Option<u32>,
    rooms: Option<u32>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapParams {
    #[serde(default)]
    check_out: String,
}

pub async fn search_hotels(
    State(state): State<AppState>,
    Params(params): Params<HotelParams>,
) -> Result<Listing<Hotel>, ApiError> {
    let query = HotelQuery {
        location: params.location.trim().to_string(),
        check_in: params.check_in.trim().to_string(),
        check_out: params.check_out.trim().to_string(),
        guests: params.guests.unwrap_or(DEFAULT_GUESTS),
        min_price: params.min_price,
        max_price: params.max_price,
        limit: clamp_limit(params.limit, DEFAULT_LIMIT),
    };
    let outcome = state.search.hotels.search(&query).await?;
    Ok(Listing::new("hotels", outcome, NO_HOTELS))
}

pub async fn hotel_details(
    State(state): State<AppState>,
    Path(hotel_key): Path<String>,
) -> Result<Json<Hotel>, ApiError> {
    Ok(Json(state.search.hotels.details(&hotel_key).await?))
}

pub async fn hotel_pricing(
    State(state): State<AppState>,
    Path(hotel_key): Path<String>,
    Params(params): Params<PricingParams>,
) -> Result<Json<HotelPricing>, ApiError> {
    let defaults = PricingQuery::default();
    let query = PricingQuery {
        check_in: params.check_in,
        check_out: params.check_out,
        guests: params.guests.unwrap_or(defaults.guests),
        rooms: params.rooms.unwrap_or(defaults.rooms),
        currency: params
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(defaults.currency),
    };
    Ok(Json(state.search.hotels.pricing(&hotel_key, &query).await?))
}

pub async fn hotel_heatmap(
    State(state): State<AppState>,
    Path(hotel_key): Path<String>,
    Params(params): Params<HeatmapParams>,
) -> Result<Json<HotelHeatmap>, ApiError> {
    Ok(Json(
        state
            .search
            .hotels
            .heatmap(&hotel_key, &params.check_out)
            .await?,
    ))
}
