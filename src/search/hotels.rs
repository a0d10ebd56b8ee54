use std::sync::Arc;
use tracing::instrument;

use super::{Outcome, ProviderOrder, SearchError};
use crate::models::query::parse_date;
use crate::models::{Hotel, HotelHeatmap, HotelPricing, HotelQuery};
use crate::providers::xotelo::StayRequest;
use crate::providers::{HotelSource, ProviderError, XoteloClient};

const MAX_ROOMS: u32 = 8;

/// Stay details for a rate lookup
#[derive(Debug, Clone, PartialEq)]
pub struct PricingQuery {
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub rooms: u32,
    pub currency: String,
}

impl Default for PricingQuery {
    fn default() -> Self {
        Self {
            check_in: String::new(),
            check_out: String::new(),
            guests: 2,
            rooms: 1,
            currency: "USD".to_string(),
        }
    }
}

impl PricingQuery {
    pub fn validate(&self) -> Result<(), String> {
        if self.check_in.trim().is_empty() || self.check_out.trim().is_empty() {
            return Err("check_in and check_out are required".to_string());
        }
        if parse_date("check_out", &self.check_out)? <= parse_date("check_in", &self.check_in)? {
            return Err("check_out must be after check_in".to_string());
        }
        if self.guests == 0 {
            return Err("guests must be at least 1".to_string());
        }
        if !(1..=MAX_ROOMS).contains(&self.rooms) {
            return Err(format!("rooms must be between 1 and {MAX_ROOMS}"));
        }
        Ok(())
    }
}

/// Hotel listings plus the per-hotel lookups of the rate provider
pub struct HotelSearch {
    order: ProviderOrder<dyn HotelSource>,
    rates: Arc<XoteloClient>,
}

impl HotelSearch {
    pub fn new(order: ProviderOrder<dyn HotelSource>, rates: Arc<XoteloClient>) -> Self {
        Self { order, rates }
    }

    pub fn order(&self) -> &ProviderOrder<dyn HotelSource> {
        &self.order
    }

    /// Listings of the first provider with hotels inside the price bounds
    #[instrument(skip(self), fields(location = %query.location))]
    pub async fn search(&self, query: &HotelQuery) -> Result<Outcome<Hotel>, SearchError> {
        query.validate().map_err(SearchError::Validation)?;

        let outcome = self
            .order
            .first_non_empty(|provider| async move {
                let hotels = provider.search_hotels(query).await?;
                Ok::<_, ProviderError>(
                    hotels
                        .into_iter()
                        .filter(|hotel| query.accepts_price(hotel.price_per_night))
                        .collect::<Vec<_>>(),
                )
            })
            .await;
        Ok(outcome.map_items(|mut hotels| {
            hotels.truncate(query.limit);
            hotels
        }))
    }

    #[instrument(skip(self))]
    pub async fn details(&self, hotel_key: &str) -> Result<Hotel, SearchError> {
        const NOT_FOUND: &str = "Hotel not found";
        match self.rates.hotel_details(require_key(hotel_key)?).await {
            Ok(Some(hotel)) => Ok(hotel),
            Ok(None) => Err(SearchError::not_found(NOT_FOUND)),
            Err(error) => Err(SearchError::from_lookup(&error, NOT_FOUND)),
        }
    }

    #[instrument(skip(self))]
    pub async fn pricing(
        &self,
        hotel_key: &str,
        query: &PricingQuery,
    ) -> Result<HotelPricing, SearchError> {
        const NOT_FOUND: &str = "Pricing not available";
        let hotel_key = require_key(hotel_key)?;
        query.validate().map_err(SearchError::Validation)?;

        let stay = StayRequest {
            check_in: query.check_in.trim().to_string(),
            check_out: query.check_out.trim().to_string(),
            guests: query.guests,
            rooms: query.rooms,
            currency: query.currency.trim().to_uppercase(),
        };
        match self.rates.pricing(hotel_key, &stay).await {
            Ok(Some(pricing)) => Ok(pricing),
            Ok(None) => Err(SearchError::not_found(NOT_FOUND)),
            Err(error) => Err(SearchError::from_lookup(&error, NOT_FOUND)),
        }
    }

    #[instrument(skip(self))]
    pub async fn heatmap(&self, hotel_key: &str, check_out: &str) -> Result<HotelHeatmap, SearchError> {
        const NOT_FOUND: &str = "Heatmap not available";
        let hotel_key = require_key(hotel_key)?;
        if check_out.trim().is_empty() {
            return Err(SearchError::validation("check_out is required"));
        }
        parse_date("check_out", check_out).map_err(SearchError::Validation)?;

        match self.rates.heatmap(hotel_key, check_out.trim()).await {
            Ok(Some(heatmap)) => Ok(heatmap),
            Ok(None) => Err(SearchError::not_found(NOT_FOUND)),
            Err(error) => Err(SearchError::from_lookup(&error, NOT_FOUND)),
        }
    }
}

fn require_key(hotel_key: &str) -> Result<&str, SearchError> {
    let key = hotel_key.trim();
    if key.is_empty() {
        return Err(SearchError::validation("Hotel key is required"));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::XoteloConfig;
    use crate::models::query::DEFAULT_LIMIT;
    use crate::providers::{Provider, ProviderId, ProviderResult};
    use async_trait::async_trait;
    use rstest::rstest;

    struct FakeHotels {
        id: ProviderId,
        prices: Vec<Option<f64>>,
        configured: bool,
    }

    impl Provider for FakeHotels {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    #[async_trait]
    impl HotelSource for FakeHotels {
        async fn search_hotels(&self, _query: &HotelQuery) -> ProviderResult<Vec<Hotel>> {
            if !self.configured {
                return Err(ProviderError::not_configured(self.id));
            }
            Ok(self
                .prices
                .iter()
                .enumerate()
                .map(|(i, price)| Hotel {
                    hotel_id: format!("{}-{i}", self.id),
                    price_per_night: *price,
                    ..Hotel::default()
                })
                .collect())
        }
    }

    fn unreachable_rates() -> Arc<XoteloClient> {
        let config = XoteloConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..XoteloConfig::default()
        };
        Arc::new(XoteloClient::new(&config).unwrap())
    }

    fn search(sources: Vec<FakeHotels>) -> HotelSearch {
        let sources = sources
            .into_iter()
            .map(|s| Arc::new(s) as Arc<dyn HotelSource>)
            .collect();
        HotelSearch::new(ProviderOrder::new("hotels", sources), unreachable_rates())
    }

    fn paris() -> HotelQuery {
        HotelQuery {
            location: "Paris".to_string(),
            check_in: "2025-06-01".to_string(),
            check_out: "2025-06-05".to_string(),
            guests: 2,
            min_price: None,
            max_price: None,
            limit: DEFAULT_LIMIT,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_primary_is_skipped() {
        let search = search(vec![
            FakeHotels {
                id: ProviderId::TripAdvisor,
                prices: vec![Some(100.0)],
                configured: false,
            },
            FakeHotels {
                id: ProviderId::Xotelo,
                prices: vec![Some(150.0), None],
                configured: true,
            },
        ]);
        let outcome = search.search(&paris()).await.unwrap();
        assert_eq!(outcome.served_by, Some(ProviderId::Xotelo));
        assert_eq!(outcome.items.len(), 2);
    }

    #[tokio::test]
    async fn test_price_bounds_filter_known_prices() {
        let search = search(vec![FakeHotels {
            id: ProviderId::Xotelo,
            prices: vec![Some(80.0), Some(150.0), Some(400.0), None],
            configured: true,
        }]);
        let query = HotelQuery {
            min_price: Some(100.0),
            max_price: Some(300.0),
            ..paris()
        };
        let outcome = search.search(&query).await.unwrap();
        let prices: Vec<Option<f64>> = outcome.items.iter().map(|h| h.price_per_night).collect();
        assert_eq!(prices, vec![Some(150.0), None]);
    }

    #[tokio::test]
    async fn test_filtered_out_batch_falls_back() {
        let search = search(vec![
            FakeHotels {
                id: ProviderId::TripAdvisor,
                prices: vec![Some(900.0)],
                configured: true,
            },
            FakeHotels {
                id: ProviderId::Xotelo,
                prices: vec![Some(120.0)],
                configured: true,
            },
        ]);
        let query = HotelQuery {
            max_price: Some(200.0),
            ..paris()
        };
        let outcome = search.search(&query).await.unwrap();
        assert_eq!(outcome.served_by, Some(ProviderId::Xotelo));
    }

    #[tokio::test]
    async fn test_nothing_found_is_empty_not_error() {
        let search = search(vec![]);
        let outcome = search.search(&paris()).await.unwrap();
        assert!(outcome.is_empty());
    }

    #[rstest]
    #[case("", "2025-06-05")]
    #[case("2025-06-05", "2025-06-01")]
    #[case("2025-06-01", "06/05/2025")]
    fn test_pricing_query_validation(#[case] check_in: &str, #[case] check_out: &str) {
        let query = PricingQuery {
            check_in: check_in.to_string(),
            check_out: check_out.to_string(),
            ..PricingQuery::default()
        };
        assert!(query.validate().is_err());
    }

    #[tokio::test]
    async fn test_pricing_upstream_failure_is_not_found() {
        let search = search(vec![]);
        let query = PricingQuery {
            check_in: "2025-06-01".to_string(),
            check_out: "2025-06-05".to_string(),
            ..PricingQuery::default()
        };
        let err = search.pricing("g187147-d188726", &query).await.unwrap_err();
        assert_eq!(err, SearchError::NotFound("Pricing not available".to_string()));
    }

    #[tokio::test]
    async fn test_heatmap_requires_date() {
        let search = search(vec![]);
        let err = search.heatmap("g187147-d188726", "").await.unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
    }
}
