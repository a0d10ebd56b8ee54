//! Response envelope shared by the list endpoints
//!
//! `{<key>: [...], count: N}` on success, plus a `msg` hint when the list is
//! empty. An empty list is still a 200.

use axum::{
    Json,
    extract::{FromRequestParts, Query},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use super::ApiError;
use crate::search::Outcome;

pub const NO_DESTINATIONS: &str = "No destinations found. Try a different search term.";
pub const NO_ATTRACTIONS: &str =
    "No attractions found. Try a different location or increase the search radius.";
pub const NO_HOTELS: &str = "No hotels found. Try adjusting your search criteria.";
pub const NO_FLIGHTS: &str = "No flights found. Try different dates or airports.";
pub const NO_AIRPORTS: &str = "No airports found. Try a city name or IATA code.";
pub const NO_FLIGHT_DESTINATIONS: &str =
    "No destinations found from this origin. Try a higher budget or another date.";
pub const NO_CHEAPEST_DATES: &str = "No dates found for this route.";
pub const NO_RECOMMENDATIONS: &str = "No recommended locations found.";
pub const NO_ACTIVITIES: &str =
    "No activities found. Try another location or a larger radius.";
pub const NO_TRAVELED_DESTINATIONS: &str =
    "No traveled destinations found for this origin and period.";

pub struct Listing<T> {
    key: &'static str,
    items: Vec<T>,
    empty_msg: &'static str,
}

impl<T> Listing<T> {
    pub fn new(key: &'static str, outcome: Outcome<T>, empty_msg: &'static str) -> Self {
        if let Some(provider) = outcome.served_by {
            debug!(key, %provider, count = outcome.items.len(), "Listing served");
        }
        Self {
            key,
            items: outcome.items,
            empty_msg,
        }
    }
}

impl<T: Serialize> Serialize for Listing<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let empty = self.items.is_empty();
        let mut map = serializer.serialize_map(Some(if empty { 3 } else { 2 }))?;
        map.serialize_entry(self.key, &self.items)?;
        map.serialize_entry("count", &self.items.len())?;
        if empty {
            map.serialize_entry("msg", self.empty_msg)?;
        }
        map.end()
    }
}

impl<T: Serialize> IntoResponse for Listing<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Query string extractor whose rejection is a `{msg}` 400
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        Ok(Self(params))
    }
}
