//! Provider adapters
//!
//! One adapter per upstream API. Every adapter turns a query into exactly
//! one outbound call (two for derived lookups such as text-based nearby
//! search), never retries, and reports failure as a [`ProviderError`] value
//! instead of panicking or returning partial data. Raw response shapes stay
//! private to each adapter; only the normalized models leave this module.

pub mod amadeus;
pub mod error;
pub mod google_flights;
mod http;
pub mod image_search;
pub mod opentripmap;
pub mod token;
pub mod tripadvisor;
pub mod wikivoyage;
pub mod xotelo;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use crate::models::{
    Attraction, AttractionQuery, Destination, DestinationQuery, Flight, FlightQuery, Hotel,
    HotelQuery,
};

pub use amadeus::AmadeusClient;
pub use error::{FailureKind, ProviderError, ProviderResult};
pub use google_flights::GoogleFlightsClient;
pub use image_search::ImageSearchClient;
pub use opentripmap::OpenTripMapClient;
pub use token::{AccessToken, OAuthTokenSource, TokenCache, TokenSource};
pub use tripadvisor::TripAdvisorClient;
pub use wikivoyage::WikivoyageClient;
pub use xotelo::XoteloClient;

/// Upstream data sources known to the aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    OpenTripMap,
    Wikivoyage,
    TripAdvisor,
    ImageSearch,
    Xotelo,
    GoogleFlights,
    Amadeus,
    AirportDirectory,
}

impl ProviderId {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenTripMap => "opentripmap",
            Self::Wikivoyage => "wikivoyage",
            Self::TripAdvisor => "tripadvisor",
            Self::ImageSearch => "image_search",
            Self::Xotelo => "xotelo",
            Self::GoogleFlights => "google_flights",
            Self::Amadeus => "amadeus",
            Self::AirportDirectory => "airport_directory",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and availability shared by all adapters
pub trait Provider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Whether the credentials this provider needs are present
    fn is_configured(&self) -> bool {
        true
    }
}

#[async_trait]
pub trait DestinationSource: Provider {
    async fn search_destinations(&self, query: &DestinationQuery)
    -> ProviderResult<Vec<Destination>>;
}

#[async_trait]
pub trait AttractionSource: Provider {
    async fn search_attractions(&self, query: &AttractionQuery)
    -> ProviderResult<Vec<Attraction>>;
}

#[async_trait]
pub trait HotelSource: Provider {
    async fn search_hotels(&self, query: &HotelQuery) -> ProviderResult<Vec<Hotel>>;
}

#[async_trait]
pub trait FlightSource: Provider {
    async fn search_flights(&self, query: &FlightQuery) -> ProviderResult<Vec<Flight>>;
}

/// Best-effort picture lookup for items that came without one
#[async_trait]
pub trait ImageSource: Provider {
    async fn find_image(&self, query: &str) -> ProviderResult<Option<String>>;
}
