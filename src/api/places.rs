use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use super::listing::{Listing, NO_ATTRACTIONS, NO_DESTINATIONS, Params};
use super::{ApiError, AppState};
use crate::models::query::{DEFAULT_LIMIT, DEFAULT_RADIUS_METERS, MAX_LIMIT};
use crate::models::{
    Attraction, AttractionDetails, AttractionQuery, Destination, DestinationGuide,
    DestinationQuery, GeoPoint, TravelTips,
};

#[derive(Debug, Deserialize)]
pub struct DestinationParams {
    #[serde(default)]
    query: String,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AttractionParams {
    location: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    category: Option<String>,
    radius: Option<u32>,
    limit: Option<usize>,
}

impl AttractionParams {
    fn into_query(self) -> Result<AttractionQuery, ApiError> {
        let center = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon).map_err(ApiError::BadRequest)?),
            (None, None) => None,
            _ => return Err(ApiError::bad_request("lat and lon must be given together")),
        };
        Ok(AttractionQuery {
            location: self.location.filter(|l| !l.trim().is_empty()),
            center,
            category: self.category.filter(|c| !c.trim().is_empty()),
            radius_meters: self.radius.unwrap_or(DEFAULT_RADIUS_METERS),
            limit: clamp_limit(self.limit, DEFAULT_LIMIT),
        })
    }
}

pub(super) fn clamp_limit(limit: Option<usize>, default: usize) -> usize {
    limit.unwrap_or(default).clamp(1, MAX_LIMIT)
}

pub async fn search_destinations(
    State(state): State<AppState>,
    Params(params): Params<DestinationParams>,
) -> Result<Listing<Destination>, ApiError> {
    let mut query = DestinationQuery::new(params.query);
    query.limit = clamp_limit(params.limit, DEFAULT_LIMIT);
    let outcome = state.search.destinations.search(&query).await?;
    Ok(Listing::new("destinations", outcome, NO_DESTINATIONS))
}

pub async fn search_attractions(
    State(state): State<AppState>,
    Params(params): Params<AttractionParams>,
) -> Result<Listing<Attraction>, ApiError> {
    let query = params.into_query()?;
    let outcome = state.search.attractions.search(&query).await?;
    Ok(Listing::new("attractions", outcome, NO_ATTRACTIONS))
}

pub async fn search_attractions_enriched(
    State(state): State<AppState>,
    Params(params): Params<AttractionParams>,
) -> Result<Listing<Attraction>, ApiError> {
    let query = params.into_query()?;
    let outcome = state.search.attractions.search_enriched(&query).await?;
    Ok(Listing::new("attractions", outcome, NO_ATTRACTIONS))
}

pub async fn attraction_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AttractionDetails>, ApiError> {
    Ok(Json(state.search.attractions.details(&id).await?))
}

pub async fn destination_guide(
    State(state): State<AppState>,
    Path(destination): Path<String>,
) -> Result<Json<DestinationGuide>, ApiError> {
    Ok(Json(state.search.guides.guide(&destination).await?))
}

pub async fn travel_tips(
    State(state): State<AppState>,
    Path(destination): Path<String>,
) -> Result<Json<TravelTips>, ApiError> {
    Ok(Json(state.search.guides.tips(&destination).await?))
}
