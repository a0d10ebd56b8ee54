//! Flight inspiration, analytics and activities
//!
//! Only the GDS provider serves these. When it has no credentials the
//! order is empty and every list comes back empty rather than failing.

use chrono::NaiveDate;
use tracing::instrument;

use super::{Outcome, ProviderOrder, SearchError};
use crate::models::query::parse_date;
use crate::models::{
    Activity, CheapestDate, FlightDestination, GeoPoint, RecommendedLocation, TraveledDestination,
    is_iata_code,
};
use crate::providers::AmadeusClient;

/// Analytics period used when the caller names none
pub const DEFAULT_PERIOD: &str = "2024-01";
pub const DEFAULT_ACTIVITY_RADIUS_KM: u32 = 5;
const MAX_ACTIVITY_RADIUS_KM: u32 = 20;

pub struct InsightSearch {
    order: ProviderOrder<AmadeusClient>,
}

impl InsightSearch {
    pub fn new(order: ProviderOrder<AmadeusClient>) -> Self {
        Self { order }
    }

    #[instrument(skip(self))]
    pub async fn flight_destinations(
        &self,
        origin: &str,
        max_price: Option<f64>,
        departure_date: Option<&str>,
    ) -> Result<Outcome<FlightDestination>, SearchError> {
        let origin = require_code("origin", origin)?;
        if max_price.is_some_and(|price| price <= 0.0) {
            return Err(SearchError::validation("max_price must be positive"));
        }
        let departure_date = optional_date("departure_date", departure_date)?;

        Ok(self
            .order
            .first_non_empty(|client| client.flight_destinations(&origin, max_price, departure_date))
            .await)
    }

    #[instrument(skip(self))]
    pub async fn cheapest_dates(
        &self,
        origin: &str,
        destination: &str,
        departure_date: Option<&str>,
    ) -> Result<Outcome<CheapestDate>, SearchError> {
        let origin = require_code("origin", origin)?;
        let destination = require_code("destination", destination)?;
        let departure_date = optional_date("departure_date", departure_date)?;

        Ok(self
            .order
            .first_non_empty(|client| client.cheapest_dates(&origin, &destination, departure_date))
            .await)
    }

    /// `city_codes` is a comma-separated list; empty asks for general recommendations
    #[instrument(skip(self))]
    pub async fn recommended_locations(
        &self,
        city_codes: &str,
    ) -> Result<Outcome<RecommendedLocation>, SearchError> {
        let codes = city_codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| require_code("city", code))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self
            .order
            .first_non_empty(|client| client.recommended_locations(&codes))
            .await)
    }

    #[instrument(skip(self))]
    pub async fn activities(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
        radius_km: Option<u32>,
    ) -> Result<Outcome<Activity>, SearchError> {
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(SearchError::validation("lat and lon are required"));
        };
        let center = GeoPoint::new(lat, lon).map_err(SearchError::Validation)?;
        let radius_km = radius_km.unwrap_or(DEFAULT_ACTIVITY_RADIUS_KM);
        if !(1..=MAX_ACTIVITY_RADIUS_KM).contains(&radius_km) {
            return Err(SearchError::validation(format!(
                "radius must be between 1 and {MAX_ACTIVITY_RADIUS_KM} km"
            )));
        }

        Ok(self
            .order
            .first_non_empty(|client| client.activities(center, radius_km))
            .await)
    }

    #[instrument(skip(self))]
    pub async fn most_traveled(
        &self,
        origin: &str,
        period: Option<&str>,
    ) -> Result<Outcome<TraveledDestination>, SearchError> {
        let origin = require_code("origin", origin)?;
        let period = period
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PERIOD);
        validate_period(period)?;

        Ok(self
            .order
            .first_non_empty(|client| client.most_traveled(&origin, period))
            .await)
    }
}

fn require_code(field: &str, code: &str) -> Result<String, SearchError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(SearchError::validation(format!("{field} is required")));
    }
    if !is_iata_code(code) {
        return Err(SearchError::validation(format!(
            "Invalid {field} code: '{code}'. Must be a 3-letter IATA code (e.g., ATL, JFK)"
        )));
    }
    Ok(code.to_uppercase())
}

fn optional_date<'a>(field: &str, value: Option<&'a str>) -> Result<Option<&'a str>, SearchError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(date) => {
            parse_date(field, date).map_err(SearchError::Validation)?;
            Ok(Some(date))
        }
        None => Ok(None),
    }
}

/// `YYYY-MM`
fn validate_period(period: &str) -> Result<(), SearchError> {
    let valid = period.len() == 7
        && NaiveDate::parse_from_str(&format!("{period}-01"), "%Y-%m-%d").is_ok();
    if valid {
        Ok(())
    } else {
        Err(SearchError::validation(format!(
            "Invalid period '{period}'. Expected YYYY-MM"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AmadeusConfig;
    use rstest::rstest;
    use std::sync::Arc;

    fn unconfigured() -> InsightSearch {
        let amadeus = Arc::new(AmadeusClient::new(&AmadeusConfig::default()).unwrap());
        InsightSearch::new(ProviderOrder::new("insights", vec![amadeus]))
    }

    #[rstest]
    #[case("2024-01", true)]
    #[case("2023-12", true)]
    #[case("2024-13", false)]
    #[case("2024-1", false)]
    #[case("January", false)]
    fn test_validate_period(#[case] period: &str, #[case] valid: bool) {
        assert_eq!(validate_period(period).is_ok(), valid);
    }

    #[rstest]
    #[case(" mad ", Ok("MAD".to_string()))]
    #[case("", Err(()))]
    #[case("MADRID", Err(()))]
    fn test_require_code(#[case] input: &str, #[case] expected: Result<String, ()>) {
        assert_eq!(require_code("origin", input).map_err(|_| ()), expected);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_gives_empty_lists() {
        let insights = unconfigured();
        let outcome = insights.flight_destinations("MAD", Some(500.0), None).await.unwrap();
        assert!(outcome.is_empty());

        let outcome = insights.most_traveled("MAD", None).await.unwrap();
        assert!(outcome.is_empty());
    }

    #[tokio::test]
    async fn test_activities_need_coordinates() {
        let insights = unconfigured();
        let err = insights.activities(Some(41.39), None, None).await.unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));

        let err = insights.activities(Some(41.39), Some(2.17), Some(50)).await.unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
    }

    #[tokio::test]
    async fn test_recommended_locations_validate_each_code() {
        let insights = unconfigured();
        let err = insights.recommended_locations("PAR, Paris").await.unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
        assert!(insights.recommended_locations("").await.unwrap().is_empty());
    }
}
