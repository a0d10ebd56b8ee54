use tracing::instrument;

use super::{Outcome, ProviderOrder, SearchError};
use crate::airports;
use crate::models::Airport;
use crate::providers::{AmadeusClient, ProviderId};

/// Largest page of suggestions a caller may ask for
pub const MAX_AIRPORT_LIMIT: usize = 50;

/// Airport autocomplete: the embedded directory first, the remote locations API after
pub struct AirportSearch {
    remote: ProviderOrder<AmadeusClient>,
}

impl AirportSearch {
    pub fn new(remote: ProviderOrder<AmadeusClient>) -> Self {
        Self { remote }
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, limit: usize) -> Result<Outcome<Airport>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::validation("Query parameter is required"));
        }
        let limit = limit.min(MAX_AIRPORT_LIMIT);
        if limit == 0 {
            return Ok(Outcome::empty());
        }

        let local = airports::search(query, limit);
        if !local.is_empty() {
            return Ok(Outcome::served(ProviderId::AirportDirectory, local));
        }

        Ok(self
            .remote
            .first_non_empty(|client| client.search_locations(query, limit))
            .await
            .map_items(|mut found| {
                found.truncate(limit);
                found
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::DEFAULT_AIRPORT_LIMIT;
    use crate::config::AmadeusConfig;
    use std::sync::Arc;

    fn search() -> AirportSearch {
        let amadeus = Arc::new(AmadeusClient::new(&AmadeusConfig::default()).unwrap());
        AirportSearch::new(ProviderOrder::new("airports", vec![amadeus]))
    }

    #[tokio::test]
    async fn test_exact_code() {
        let outcome = search().search("JFK", DEFAULT_AIRPORT_LIMIT).await.unwrap();
        let codes: Vec<&str> = outcome.items.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["JFK"]);
        assert_eq!(outcome.served_by, Some(ProviderId::AirportDirectory));
    }

    #[tokio::test]
    async fn test_city_lookup() {
        let outcome = search().search("london", DEFAULT_AIRPORT_LIMIT).await.unwrap();
        let codes: Vec<&str> = outcome.items.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["LHR", "LGW"]);
    }

    #[tokio::test]
    async fn test_unknown_place_without_remote() {
        let outcome = search().search("Ouagadougou", DEFAULT_AIRPORT_LIMIT).await.unwrap();
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit_finds_nothing() {
        let outcome = search().search("JFK", 0).await.unwrap();
        assert!(outcome.is_empty());
        assert_eq!(outcome.served_by, None);
    }

    #[tokio::test]
    async fn test_limit_is_capped() {
        let outcome = search().search("a", usize::MAX).await.unwrap();
        assert!(outcome.items.len() <= MAX_AIRPORT_LIMIT);
    }

    #[tokio::test]
    async fn test_blank_query() {
        let err = search().search(" ", DEFAULT_AIRPORT_LIMIT).await.unwrap_err();
        assert_eq!(err, SearchError::Validation("Query parameter is required".to_string()));
    }
}
