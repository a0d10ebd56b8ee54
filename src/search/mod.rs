//! Capability aggregators
//!
//! One aggregator per client-facing capability. Aggregators validate the
//! query, run the provider fallback chain and shape the winning batch
//! (distance fill-in, image enrichment, price filters, limits). Single
//! resource lookups go straight to the one provider that can answer them.

pub mod airports;
pub mod attractions;
pub mod chain;
pub mod destinations;
pub mod flights;
pub mod guides;
pub mod hotels;
pub mod insights;

use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::ProvidersConfig;
use crate::providers::{
    AmadeusClient, AttractionSource, DestinationSource, FlightSource, GoogleFlightsClient,
    HotelSource, ImageSearchClient, ImageSource, OpenTripMapClient, Provider, ProviderError,
    ProviderId, TripAdvisorClient, WikivoyageClient, XoteloClient,
};
use crate::TravelHubError;

pub use airports::AirportSearch;
pub use attractions::AttractionSearch;
pub use chain::{AttemptState, Outcome, ProviderOrder};
pub use destinations::DestinationSearch;
pub use flights::FlightSearch;
pub use guides::GuideSearch;
pub use hotels::{HotelSearch, PricingQuery};
pub use insights::InsightSearch;

/// Why an aggregator could not produce an answer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SearchError {
    /// Missing or malformed request parameter
    #[error("{0}")]
    Validation(String),

    /// The only provider able to answer has no credentials
    #[error("{0} is not configured")]
    NotConfigured(ProviderId),

    /// Nothing to return for a single-resource lookup
    #[error("{0}")]
    NotFound(String),
}

impl SearchError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    /// Map a single-resource provider failure: missing credentials stay
    /// visible, anything else reads as "not found"
    #[must_use]
    pub fn from_lookup(error: &ProviderError, not_found: &str) -> Self {
        match error {
            ProviderError::NotConfigured { provider } => Self::NotConfigured(*provider),
            _ => Self::not_found(not_found),
        }
    }
}

/// Every aggregator, wired to the configured providers
pub struct SearchService {
    pub destinations: DestinationSearch,
    pub attractions: AttractionSearch,
    pub hotels: HotelSearch,
    pub flights: FlightSearch,
    pub airports: AirportSearch,
    pub insights: InsightSearch,
    pub guides: GuideSearch,
}

impl SearchService {
    /// Build every adapter once and fix the provider orders
    pub fn from_config(config: &ProvidersConfig) -> Result<Self, TravelHubError> {
        let opentripmap = Arc::new(OpenTripMapClient::new(&config.opentripmap)?);
        let tripadvisor = Arc::new(TripAdvisorClient::new(&config.serpapi)?);
        let image_search = Arc::new(ImageSearchClient::new(&config.serpapi)?);
        let google_flights = Arc::new(GoogleFlightsClient::new(&config.serpapi)?);
        let xotelo = Arc::new(XoteloClient::new(&config.xotelo)?);
        let amadeus = Arc::new(AmadeusClient::new(&config.amadeus)?);
        let wikivoyage = Arc::new(WikivoyageClient::new(&config.wikivoyage)?);

        let destination_order = ProviderOrder::new(
            "destinations",
            vec![
                opentripmap.clone() as Arc<dyn DestinationSource>,
                wikivoyage.clone() as Arc<dyn DestinationSource>,
            ],
        );
        let attraction_order = ProviderOrder::new(
            "attractions",
            vec![
                opentripmap.clone() as Arc<dyn AttractionSource>,
                tripadvisor.clone() as Arc<dyn AttractionSource>,
            ],
        );
        let enriched_order = ProviderOrder::new(
            "attractions-enriched",
            vec![
                tripadvisor.clone() as Arc<dyn AttractionSource>,
                opentripmap.clone() as Arc<dyn AttractionSource>,
            ],
        );
        let images = image_search
            .is_configured()
            .then(|| image_search as Arc<dyn ImageSource>);
        let hotel_order = ProviderOrder::new(
            "hotels",
            vec![
                tripadvisor as Arc<dyn HotelSource>,
                xotelo.clone() as Arc<dyn HotelSource>,
            ],
        );
        let flight_order = ProviderOrder::new(
            "flights",
            vec![
                google_flights.clone() as Arc<dyn FlightSource>,
                amadeus.clone() as Arc<dyn FlightSource>,
            ],
        );

        let service = Self {
            destinations: DestinationSearch::new(destination_order),
            attractions: AttractionSearch::new(attraction_order, enriched_order, images, opentripmap),
            hotels: HotelSearch::new(hotel_order, xotelo),
            flights: FlightSearch::new(flight_order, google_flights, amadeus.clone()),
            airports: AirportSearch::new(ProviderOrder::new("airports", vec![amadeus.clone()])),
            insights: InsightSearch::new(ProviderOrder::new("insights", vec![amadeus])),
            guides: GuideSearch::new(wikivoyage),
        };
        info!("Search service ready");
        Ok(service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup() {
        let missing = ProviderError::not_configured(ProviderId::Amadeus);
        assert_eq!(
            SearchError::from_lookup(&missing, "Seat map not available"),
            SearchError::NotConfigured(ProviderId::Amadeus)
        );

        let failed = ProviderError::from_status(ProviderId::Xotelo, 502, "bad gateway");
        assert_eq!(
            SearchError::from_lookup(&failed, "Heatmap not available"),
            SearchError::NotFound("Heatmap not available".to_string())
        );
    }

    #[test]
    fn test_service_without_credentials() {
        let service = SearchService::from_config(&ProvidersConfig::default()).unwrap();
        assert!(service.flights.order().is_empty());
        assert_eq!(service.hotels.order().ids(), vec![ProviderId::Xotelo]);
        assert_eq!(service.destinations.order().ids(), vec![ProviderId::Wikivoyage]);
    }
}
