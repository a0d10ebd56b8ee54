use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, warn};

use super::{Outcome, ProviderOrder, SearchError};
use crate::models::query::parse_date;
use crate::models::{Flight, FlightQuery, RawDocument};
use crate::providers::amadeus::split_flight_number;
use crate::providers::{AmadeusClient, FlightSource, GoogleFlightsClient, ProviderError};

/// Flight offers plus booking details, live status, seat maps and offer pricing
pub struct FlightSearch {
    order: ProviderOrder<dyn FlightSource>,
    metasearch: Arc<GoogleFlightsClient>,
    gds: Arc<AmadeusClient>,
}

impl FlightSearch {
    pub fn new(
        order: ProviderOrder<dyn FlightSource>,
        metasearch: Arc<GoogleFlightsClient>,
        gds: Arc<AmadeusClient>,
    ) -> Self {
        Self {
            order,
            metasearch,
            gds,
        }
    }

    pub fn order(&self) -> &ProviderOrder<dyn FlightSource> {
        &self.order
    }

    #[instrument(skip(self), fields(origin = %query.origin, destination = %query.destination))]
    pub async fn search(&self, query: &FlightQuery) -> Result<Outcome<Flight>, SearchError> {
        query.validate().map_err(SearchError::Validation)?;
        Ok(self
            .order
            .first_non_empty(|provider| provider.search_flights(query))
            .await)
    }

    /// Booking options behind a search result token
    #[instrument(skip_all)]
    pub async fn details(&self, flight_id: &str) -> Result<RawDocument, SearchError> {
        const NOT_FOUND: &str = "Flight not found";
        let flight_id = flight_id.trim();
        if flight_id.is_empty() {
            return Err(SearchError::validation("Flight id is required"));
        }
        self.metasearch
            .flight_details(flight_id)
            .await
            .map_err(|error| SearchError::from_lookup(&error, NOT_FOUND))
    }

    /// Live status of a scheduled flight such as `LH400` on a date
    #[instrument(skip(self))]
    pub async fn status(&self, flight_number: &str, date: &str) -> Result<RawDocument, SearchError> {
        const NOT_FOUND: &str = "Flight status not available";
        if flight_number.trim().is_empty() || date.trim().is_empty() {
            return Err(SearchError::validation("flight_number and date are required"));
        }
        if split_flight_number(flight_number).is_none() {
            return Err(SearchError::validation(format!(
                "Invalid flight number '{}'. Expected an airline code followed by a number (e.g., LH400)",
                flight_number.trim()
            )));
        }
        parse_date("date", date).map_err(SearchError::Validation)?;

        match self.gds.flight_status(flight_number, date.trim()).await {
            Ok(Some(status)) => Ok(status),
            Ok(None) => Err(SearchError::not_found(NOT_FOUND)),
            Err(error) => Err(SearchError::from_lookup(&error, NOT_FOUND)),
        }
    }

    #[instrument(skip(self))]
    pub async fn seatmap(&self, flight_order_id: &str) -> Result<RawDocument, SearchError> {
        const NOT_FOUND: &str = "Seat map not available";
        let flight_order_id = flight_order_id.trim();
        if flight_order_id.is_empty() {
            return Err(SearchError::validation("Flight id is required"));
        }
        match self.gds.seatmap(flight_order_id).await {
            Ok(Some(seatmap)) => Ok(seatmap),
            Ok(None) => Err(SearchError::not_found(NOT_FOUND)),
            Err(error) => Err(SearchError::from_lookup(&error, NOT_FOUND)),
        }
    }

    /// Re-price an offer from a previous search; upstream rejection is a client error
    #[instrument(skip_all)]
    pub async fn price(&self, offer: Option<&Value>) -> Result<RawDocument, SearchError> {
        let offer = offer
            .filter(|offer| offer.as_object().is_some_and(|fields| !fields.is_empty()))
            .ok_or_else(|| SearchError::validation("flight_offer required in request body"))?;

        match self.gds.price_offer(offer).await {
            Ok(priced) => Ok(priced),
            Err(ProviderError::NotConfigured { provider }) => Err(SearchError::NotConfigured(provider)),
            Err(error) => {
                warn!("Offer pricing failed: {error}");
                Err(SearchError::validation("Failed to price flight offer"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AmadeusConfig, SerpApiConfig};
    use crate::models::CabinClass;
    use crate::providers::{Provider, ProviderId, ProviderResult};
    use async_trait::async_trait;
    use rstest::rstest;
    use serde_json::json;

    struct FakeFlights {
        id: ProviderId,
        flights: Vec<Flight>,
    }

    impl Provider for FakeFlights {
        fn id(&self) -> ProviderId {
            self.id
        }
    }

    #[async_trait]
    impl FlightSource for FakeFlights {
        async fn search_flights(&self, query: &FlightQuery) -> ProviderResult<Vec<Flight>> {
            Ok(self
                .flights
                .iter()
                .cloned()
                .map(|mut f| {
                    f.origin = query.origin.clone();
                    f.destination = query.destination.clone();
                    f
                })
                .collect())
        }
    }

    fn search(sources: Vec<FakeFlights>) -> FlightSearch {
        let sources = sources
            .into_iter()
            .map(|s| Arc::new(s) as Arc<dyn FlightSource>)
            .collect();
        FlightSearch::new(
            ProviderOrder::new("flights", sources),
            Arc::new(GoogleFlightsClient::new(&SerpApiConfig::default()).unwrap()),
            Arc::new(AmadeusClient::new(&AmadeusConfig::default()).unwrap()),
        )
    }

    fn offer(price: f64) -> Flight {
        Flight {
            price,
            currency: "USD".to_string(),
            ..Flight::default()
        }
    }

    #[tokio::test]
    async fn test_secondary_provider_serves_when_primary_is_empty() {
        let search = search(vec![
            FakeFlights {
                id: ProviderId::GoogleFlights,
                flights: vec![],
            },
            FakeFlights {
                id: ProviderId::Amadeus,
                flights: vec![offer(410.0), offer(455.5)],
            },
        ]);
        let query = FlightQuery::new("jfk", "lhr", "2025-06-01", None, 2, CabinClass::Economy);

        let outcome = search.search(&query).await.unwrap();
        assert_eq!(outcome.served_by, Some(ProviderId::Amadeus));
        assert!(outcome.items.iter().all(|f| f.origin == "JFK" && f.destination == "LHR"));
    }

    #[rstest]
    #[case("", "LHR", "2025-06-01")]
    #[case("NEW YORK", "LHR", "2025-06-01")]
    #[case("JFK", "LHR", "June 1st")]
    #[tokio::test]
    async fn test_invalid_queries_never_reach_providers(
        #[case] origin: &str,
        #[case] destination: &str,
        #[case] date: &str,
    ) {
        let search = search(vec![]);
        let query = FlightQuery::new(origin, destination, date, None, 1, CabinClass::Economy);
        let err = search.search(&query).await.unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
    }

    #[tokio::test]
    async fn test_status_validates_flight_number() {
        let search = search(vec![]);
        let err = search.status("L", "2025-06-01").await.unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
    }

    #[tokio::test]
    async fn test_status_without_credentials() {
        let search = search(vec![]);
        let err = search.status("LH400", "2025-06-01").await.unwrap_err();
        assert_eq!(err, SearchError::NotConfigured(ProviderId::Amadeus));
    }

    #[tokio::test]
    async fn test_price_requires_offer() {
        let search = search(vec![]);
        assert!(matches!(
            search.price(None).await.unwrap_err(),
            SearchError::Validation(_)
        ));
        assert!(matches!(
            search.price(Some(&json!({}))).await.unwrap_err(),
            SearchError::Validation(_)
        ));
        assert_eq!(
            search.price(Some(&json!({"id": "1"}))).await.unwrap_err(),
            SearchError::NotConfigured(ProviderId::Amadeus)
        );
    }

    #[tokio::test]
    async fn test_details_without_credentials() {
        let search = search(vec![]);
        let err = search.details("token-abc").await.unwrap_err();
        assert_eq!(err, SearchError::NotConfigured(ProviderId::GoogleFlights));
    }
}
