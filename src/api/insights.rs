use axum::extract::State;
use serde::Deserialize;

use super::listing::{
    Listing, NO_ACTIVITIES, NO_CHEAPEST_DATES, NO_FLIGHT_DESTINATIONS, NO_RECOMMENDATIONS,
    NO_TRAVELED_DESTINATIONS, Params,
};
use super::{ApiError, AppState};
use crate::models::{
    Activity, CheapestDate, FlightDestination, RecommendedLocation, TraveledDestination,
};

#[derive(Debug, Deserialize)]
pub struct InspirationParams {
    #[serde(default)]
    origin: String,
    max_price: Option<f64>,
    departure_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    #[serde(default)]
    origin: String,
    #[serde(default)]
    destination: String,
    departure_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    #[serde(default)]
    city_codes: String,
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    lat: Option<f64>,
    lon: Option<f64>,
    radius: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct TrafficParams {
    #[serde(default)]
    origin: String,
    period: Option<String>,
}

pub async fn flight_destinations(
    State(state): State<AppState>,
    Params(params): Params<InspirationParams>,
) -> Result<Listing<FlightDestination>, ApiError> {
    let outcome = state
        .search
        .insights
        .flight_destinations(
            &params.origin,
            params.max_price,
            params.departure_date.as_deref(),
        )
        .await?;
    Ok(Listing::new("destinations", outcome, NO_FLIGHT_DESTINATIONS))
}

pub async fn cheapest_dates(
    State(state): State<AppState>,
    Params(params): Params<RouteParams>,
) -> Result<Listing<CheapestDate>, ApiError> {
    let outcome = state
        .search
        .insights
        .cheapest_dates(
            &params.origin,
            &params.destination,
            params.departure_date.as_deref(),
        )
        .await?;
    Ok(Listing::new("dates", outcome, NO_CHEAPEST_DATES))
}

pub async fn recommended_locations(
    State(state): State<AppState>,
    Params(params): Params<RecommendationParams>,
) -> Result<Listing<RecommendedLocation>, ApiError> {
    let outcome = state
        .search
        .insights
        .recommended_locations(&params.city_codes)
        .await?;
    Ok(Listing::new("locations", outcome, NO_RECOMMENDATIONS))
}

pub async fn activities(
    State(state): State<AppState>,
    Params(params): Params<ActivityParams>,
) -> Result<Listing<Activity>, ApiError> {
    let outcome = state
        .search
        .insights
        .activities(params.lat, params.lon, params.radius)
        .await?;
    Ok(Listing::new("activities", outcome, NO_ACTIVITIES))
}

pub async fn most_traveled(
    State(state): State<AppState>,
    Params(params): Params<TrafficParams>,
) -> Result<Listing<TraveledDestination>, ApiError> {
    let outcome = state
        .search
        .insights
        .most_traveled(&params.origin, params.period.as_deref())
        .await?;
    Ok(Listing::new("destinations", outcome, NO_TRAVELED_DESTINATIONS))
}
