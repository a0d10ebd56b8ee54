use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::Deserialize;
use serde_json::Value;

use super::listing::{Listing, NO_AIRPORTS, NO_FLIGHTS, Params};
use super::{ApiError, AppState};
use crate::airports::DEFAULT_AIRPORT_LIMIT;
use crate::models::{Airport, CabinClass, Flight, FlightQuery, RawDocument};

#[derive(Debug, Deserialize)]
pub struct FlightParams {
    #[serde(default)]
    origin: String,
    #[serde(default)]
    destination: String,
    #[serde(default)]
    departure_date: String,
    return_date: Option<String>,
    passengers: Option<u32>,
    cabin_class: Option<String>,
}

impl FlightParams {
    fn into_query(self) -> FlightQuery {
        FlightQuery::new(
            &self.origin,
            &self.destination,
            &self.departure_date,
            self.return_date.as_deref(),
            self.passengers.unwrap_or(1),
            self.cabin_class
                .as_deref()
                .map(CabinClass::from_param)
                .unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusParams {
    #[serde(default)]
    flight_number: String,
    #[serde(default)]
    date: String,
}

#[derive(Debug, Deserialize)]
pub struct AirportParams {
    #[serde(default)]
    query: String,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    flight_offer: Option<Value>,
}

pub async fn search_flights(
    State(state): State<AppState>,
    Params(params): Params<FlightParams>,
) -> Result<Listing<Flight>, ApiError> {
    let outcome = state.search.flights.search(&params.into_query()).await?;
    Ok(Listing::new("flights", outcome, NO_FLIGHTS))
}

pub async fn flight_details(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> Result<Json<RawDocument>, ApiError> {
    Ok(Json(state.search.flights.details(&flight_id).await?))
}

pub async fn flight_status(
    State(state): State<AppState>,
    Params(params): Params<StatusParams>,
) -> Result<Json<RawDocument>, ApiError> {
    Ok(Json(
        state
            .search
            .flights
            .status(&params.flight_number, &params.date)
            .await?,
    ))
}

pub async fn flight_seatmap(
    State(state): State<AppState>,
    Path(flight_id): Path<String>,
) -> Result<Json<RawDocument>, ApiError> {
    Ok(Json(state.search.flights.seatmap(&flight_id).await?))
}

pub async fn price_flight(
    State(state): State<AppState>,
    body: Result<Json<PriceRequest>, JsonRejection>,
) -> Result<Json<RawDocument>, ApiError> {
    // An unreadable body is treated like a missing offer
    let offer = body.ok().and_then(|Json(request)| request.flight_offer);
    Ok(Json(state.search.flights.price(offer.as_ref()).await?))
}

pub async fn search_airports(
    State(state): State<AppState>,
    Params(params): Params<AirportParams>,
) -> Result<Listing<Airport>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_AIRPORT_LIMIT);
    let outcome = state.search.airports.search(&params.query, limit).await?;
    Ok(Listing::new("airports", outcome, NO_AIRPORTS))
}
