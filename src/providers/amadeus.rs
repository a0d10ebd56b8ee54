//! Amadeus self-service APIs
//!
//! Flight offers, airport lookup, inspiration and analytics endpoints. Every
//! call carries a bearer token from the adapter's [`TokenCache`]; a 401 or
//! 403 drops the cached token so the next call fetches a new one.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::http::{build_client, decode_items, send_json};
use super::{
    FlightSource, OAuthTokenSource, Provider, ProviderError, ProviderId, ProviderResult,
    TokenCache, TokenSource,
};
use crate::TravelHubError;
use crate::airports;
use crate::config::AmadeusConfig;
use crate::models::{
    Activity, Airport, CheapestDate, Flight, FlightDestination, FlightQuery, FlightSegment,
    GeoPoint, Layover, RawDocument, RecommendedLocation, TraveledDestination, is_iata_code,
};
use crate::normalize::{
    LONG_DESCRIPTION_CHARS, minutes_from_iso_duration, number_from_opt, truncate_chars,
};

const PROVIDER: ProviderId = ProviderId::Amadeus;
const MAX_OFFERS: u32 = 20;
const DEFAULT_CURRENCY: &str = "EUR";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Token endpoint relative to the API base URL
pub const TOKEN_PATH: &str = "/v1/security/oauth2/token";

/// Amadeus API client
pub struct AmadeusClient {
    client: Client,
    base_url: String,
    tokens: TokenCache,
}

/// Split `LH400` into carrier `LH` and number `400`
#[must_use]
pub fn split_flight_number(flight_number: &str) -> Option<(String, String)> {
    let compact: String = flight_number
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    let carrier = compact.get(..2)?;
    let number = compact.get(2..)?;
    let valid = carrier.chars().all(|c| c.is_ascii_alphanumeric())
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| (carrier.to_string(), number.to_string()))
}

#[derive(Debug, Deserialize)]
struct RawData {
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawOffer {
    id: Option<String>,
    price: Option<RawPrice>,
    #[serde(default)]
    itineraries: Vec<RawItinerary>,
}

#[derive(Debug, Deserialize)]
struct RawPrice {
    total: Option<Value>,
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItinerary {
    duration: Option<String>,
    #[serde(default)]
    segments: Vec<RawSegment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSegment {
    departure: Option<RawEndpoint>,
    arrival: Option<RawEndpoint>,
    carrier_code: Option<String>,
    number: Option<String>,
    duration: Option<String>,
    aircraft: Option<RawAircraft>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEndpoint {
    iata_code: Option<String>,
    at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAircraft {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLocation {
    iata_code: Option<String>,
    name: Option<String>,
    sub_type: Option<String>,
    address: Option<RawAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    city_name: Option<String>,
    country_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFare {
    origin: Option<String>,
    destination: Option<String>,
    departure_date: Option<String>,
    return_date: Option<String>,
    price: Option<RawPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecommendation {
    name: Option<String>,
    iata_code: Option<String>,
    sub_type: Option<String>,
    geo_code: Option<RawGeoCode>,
    relevance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawGeoCode {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawActivity {
    id: Option<String>,
    name: Option<String>,
    short_description: Option<String>,
    price: Option<RawAmount>,
    rating: Option<Value>,
    #[serde(default)]
    pictures: Vec<String>,
    booking_link: Option<String>,
    geo_code: Option<RawGeoCode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAmount {
    amount: Option<Value>,
    currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTraveled {
    destination: Option<String>,
    sub_type: Option<String>,
    analytics: Option<RawAnalytics>,
}

#[derive(Debug, Deserialize)]
struct RawAnalytics {
    flights: Option<RawScore>,
    travelers: Option<RawScore>,
}

#[derive(Debug, Deserialize)]
struct RawScore {
    score: Option<f64>,
}

impl AmadeusClient {
    /// Create a client; without both credentials it reports as unconfigured
    pub fn new(config: &AmadeusConfig) -> Result<Self, TravelHubError> {
        let source = match config.credentials() {
            Some((client_id, client_secret)) => {
                let token_url = format!("{}{TOKEN_PATH}", config.base_url);
                let source = OAuthTokenSource::new(
                    PROVIDER,
                    client_id,
                    client_secret,
                    &token_url,
                    config.token_timeout_seconds,
                )
                .map_err(|e| TravelHubError::config(e.to_string()))?;
                Some(Arc::new(source) as Arc<dyn TokenSource>)
            }
            None => None,
        };
        Self::with_token_source(config, source)
    }

    /// Create a client with an explicit token source
    pub fn with_token_source(
        config: &AmadeusConfig,
        source: Option<Arc<dyn TokenSource>>,
    ) -> Result<Self, TravelHubError> {
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            base_url: config.base_url.clone(),
            tokens: TokenCache::new(PROVIDER, source),
        })
    }

    /// Authorized call; authentication failures invalidate the cached token
    async fn send<T: DeserializeOwned>(
        &self,
        build: impl FnOnce(&Client, &str) -> RequestBuilder,
    ) -> ProviderResult<T> {
        let token = self.tokens.get().await?;
        let request = build(&self.client, &self.base_url).bearer_auth(token);
        send_json(PROVIDER, request).await.inspect_err(|e| {
            if e.is_authentication() {
                debug!("Dropping rejected Amadeus token");
                self.tokens.invalidate();
            }
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> ProviderResult<T> {
        self.send(|client, base| client.get(format!("{base}{path}")).query(params))
            .await
    }

    async fn get_data(&self, path: &str, params: &[(&str, String)]) -> ProviderResult<Vec<Value>> {
        let raw: RawData = self.get(path, params).await?;
        Ok(raw.data)
    }

    /// Live status of a scheduled flight, `None` when no flight matches
    #[instrument(skip(self))]
    pub async fn flight_status(
        &self,
        flight_number: &str,
        date: &str,
    ) -> ProviderResult<Option<RawDocument>> {
        let (carrier, number) = split_flight_number(flight_number).ok_or_else(|| {
            ProviderError::invalid_input(PROVIDER, format!("invalid flight number '{flight_number}'"))
        })?;
        let params = [
            ("carrierCode", carrier),
            ("flightNumber", number),
            ("scheduledDepartureDate", date.to_string()),
        ];
        let document: Value = self.get("/v2/schedule/flights", &params).await?;
        Ok(has_data(&document).then_some(document))
    }

    /// Airports and cities matching a keyword
    #[instrument(skip(self))]
    pub async fn search_locations(&self, keyword: &str, limit: usize) -> ProviderResult<Vec<Airport>> {
        let params = [
            ("subType", "AIRPORT,CITY".to_string()),
            ("keyword", keyword.trim().to_string()),
            ("page[limit]", limit.to_string()),
        ];
        let items = self.get_data("/v1/reference-data/locations", &params).await?;
        Ok(decode_items::<RawLocation>(items)
            .into_iter()
            .filter_map(RawLocation::into_airport)
            .collect())
    }

    /// Cheapest destinations reachable from an origin
    #[instrument(skip(self))]
    pub async fn flight_destinations(
        &self,
        origin: &str,
        max_price: Option<f64>,
        departure_date: Option<&str>,
    ) -> ProviderResult<Vec<FlightDestination>> {
        let mut params = vec![("origin", origin.to_uppercase())];
        if let Some(max_price) = max_price {
            params.push(("maxPrice", format!("{}", max_price.trunc())));
        }
        if let Some(date) = departure_date {
            params.push(("departureDate", date.to_string()));
        }
        let items = self.get_data("/v1/shopping/flight-destinations", &params).await?;
        Ok(decode_items::<RawFare>(items)
            .into_iter()
            .map(|fare| {
                let (departure_date, return_date, price, currency) = fare.dates_and_price();
                FlightDestination {
                    origin: fare.origin.unwrap_or_else(|| origin.to_uppercase()),
                    destination: fare.destination.unwrap_or_default(),
                    departure_date,
                    return_date,
                    price,
                    currency,
                }
            })
            .collect())
    }

    /// Cheapest departure dates for a route
    #[instrument(skip(self))]
    pub async fn cheapest_dates(
        &self,
        origin: &str,
        destination: &str,
        departure_date: Option<&str>,
    ) -> ProviderResult<Vec<CheapestDate>> {
        let mut params = vec![
            ("origin", origin.to_uppercase()),
            ("destination", destination.to_uppercase()),
        ];
        if let Some(date) = departure_date {
            params.push(("departureDate", date.to_string()));
        }
        let items = self.get_data("/v1/shopping/flight-dates", &params).await?;
        Ok(decode_items::<RawFare>(items)
            .into_iter()
            .map(|fare| {
                let (departure_date, return_date, price, currency) = fare.dates_and_price();
                CheapestDate {
                    origin: fare.origin.unwrap_or_else(|| origin.to_uppercase()),
                    destination: fare.destination.unwrap_or_else(|| destination.to_uppercase()),
                    departure_date,
                    return_date,
                    price,
                    currency,
                }
            })
            .collect())
    }

    /// Destinations recommended for travellers from the given cities
    #[instrument(skip(self))]
    pub async fn recommended_locations(
        &self,
        city_codes: &[String],
    ) -> ProviderResult<Vec<RecommendedLocation>> {
        let mut params = Vec::new();
        if !city_codes.is_empty() {
            params.push(("cityCodes", city_codes.join(",")));
        }
        let items = self
            .get_data("/v1/reference-data/recommended-locations", &params)
            .await?;
        Ok(decode_items::<RawRecommendation>(items)
            .into_iter()
            .map(|item| RecommendedLocation {
                name: item.name.unwrap_or_default(),
                iata_code: item.iata_code.unwrap_or_default(),
                subtype: item.sub_type.unwrap_or_default(),
                lat: item.geo_code.as_ref().and_then(|g| g.latitude),
                lon: item.geo_code.as_ref().and_then(|g| g.longitude),
                relevance: item.relevance,
            })
            .collect())
    }

    /// Tours and activities within `radius_km` of a point
    #[instrument(skip(self))]
    pub async fn activities(&self, center: GeoPoint, radius_km: u32) -> ProviderResult<Vec<Activity>> {
        let params = [
            ("latitude", center.lat.to_string()),
            ("longitude", center.lon.to_string()),
            ("radius", radius_km.to_string()),
        ];
        let items = self.get_data("/v1/shopping/activities", &params).await?;
        Ok(decode_items::<RawActivity>(items)
            .into_iter()
            .map(RawActivity::into_activity)
            .collect())
    }

    /// Destinations ranked by traffic from an origin city in a `YYYY-MM` period
    #[instrument(skip(self))]
    pub async fn most_traveled(
        &self,
        origin: &str,
        period: &str,
    ) -> ProviderResult<Vec<TraveledDestination>> {
        let params = [
            ("originCityCode", origin.to_uppercase()),
            ("period", period.to_string()),
        ];
        let items = self
            .get_data("/v1/travel/analytics/air-traffic/traveled", &params)
            .await?;
        Ok(decode_items::<RawTraveled>(items)
            .into_iter()
            .map(|item| {
                let analytics = item.analytics;
                TraveledDestination {
                    destination: item.destination.unwrap_or_default(),
                    subtype: item.sub_type.unwrap_or_default(),
                    flights_score: analytics
                        .as_ref()
                        .and_then(|a| a.flights.as_ref())
                        .and_then(|s| s.score),
                    travelers_score: analytics
                        .as_ref()
                        .and_then(|a| a.travelers.as_ref())
                        .and_then(|s| s.score),
                }
            })
            .collect())
    }

    /// Seat map of a flight order, `None` when the order has none
    #[instrument(skip(self))]
    pub async fn seatmap(&self, flight_order_id: &str) -> ProviderResult<Option<RawDocument>> {
        let params = [("flight-orderId", flight_order_id.to_string())];
        let document: Value = self.get("/v1/shopping/seatmaps", &params).await?;
        Ok(has_data(&document).then_some(document))
    }

    /// Confirm the current price of a flight offer
    #[instrument(skip_all)]
    pub async fn price_offer(&self, offer: &Value) -> ProviderResult<RawDocument> {
        let payload = json!({
            "data": {
                "type": "flight-offers-pricing",
                "flightOffers": [offer],
            }
        });
        self.send(|client, base| {
            client
                .post(format!("{base}/v1/shopping/flight-offers/pricing"))
                .json(&payload)
        })
        .await
    }
}

fn has_data(document: &Value) -> bool {
    match document.get("data") {
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

impl Provider for AmadeusClient {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.tokens.is_configured()
    }
}

#[async_trait]
impl FlightSource for AmadeusClient {
    #[instrument(skip(self, query), fields(origin = %query.origin, destination = %query.destination))]
    async fn search_flights(&self, query: &FlightQuery) -> ProviderResult<Vec<Flight>> {
        for (field, id) in [("origin", &query.origin), ("destination", &query.destination)] {
            if !is_iata_code(id) {
                return Err(ProviderError::invalid_input(
                    PROVIDER,
                    format!("{field} '{id}' is not an IATA code"),
                ));
            }
        }

        let mut params = vec![
            ("originLocationCode", query.origin.clone()),
            ("destinationLocationCode", query.destination.clone()),
            ("departureDate", query.departure_date.clone()),
            ("adults", query.passengers.to_string()),
            ("travelClass", query.cabin.gds_code().to_string()),
            ("max", MAX_OFFERS.to_string()),
        ];
        if let Some(return_date) = &query.return_date {
            params.push(("returnDate", return_date.clone()));
        }

        let items = self.get_data("/v2/shopping/flight-offers", &params).await?;
        let travel_class = query.cabin.gds_code();
        let flights: Vec<Flight> = decode_items::<RawOffer>(items)
            .into_iter()
            .filter_map(|offer| offer.into_flight(travel_class))
            .collect();
        info!("Found {} flight offers", flights.len());
        Ok(flights)
    }
}

impl RawOffer {
    /// `None` when the outbound itinerary has no segments
    fn into_flight(self, travel_class: &str) -> Option<Flight> {
        let mut itineraries = self.itineraries.into_iter();
        let outbound = itineraries.next()?;
        let inbound = itineraries.next();

        let first = outbound.segments.first()?;
        let last = outbound.segments.last()?;
        let departure = first.departure.as_ref();
        let arrival = last.arrival.as_ref();
        let stops = u32::try_from(outbound.segments.len().saturating_sub(1)).unwrap_or(u32::MAX);

        let (price, currency) = self.price.map_or((0.0, DEFAULT_CURRENCY.to_string()), |p| {
            (
                number_from_opt(p.total.as_ref()).unwrap_or(0.0),
                p.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            )
        });

        let (return_departure, return_arrival) = inbound
            .as_ref()
            .map(|itinerary| {
                (
                    itinerary
                        .segments
                        .first()
                        .and_then(|s| s.departure.as_ref())
                        .and_then(|e| e.at.clone()),
                    itinerary
                        .segments
                        .last()
                        .and_then(|s| s.arrival.as_ref())
                        .and_then(|e| e.at.clone()),
                )
            })
            .unwrap_or_default();

        Some(Flight {
            flight_id: self.id.unwrap_or_default(),
            price,
            currency,
            airline: first.carrier_code.clone().unwrap_or_default(),
            origin: departure.and_then(|e| e.iata_code.clone()).unwrap_or_default(),
            destination: arrival.and_then(|e| e.iata_code.clone()).unwrap_or_default(),
            departure_date: departure.and_then(|e| e.at.clone()).unwrap_or_default(),
            arrival_date: arrival.and_then(|e| e.at.clone()).unwrap_or_default(),
            return_departure,
            return_arrival,
            return_token: None,
            duration: outbound.duration.clone().unwrap_or_default(),
            stops,
            direct: stops == 0,
            layovers: layovers(&outbound.segments),
            segments: outbound
                .segments
                .into_iter()
                .map(|segment| segment.into_segment(travel_class))
                .collect(),
            carbon_emissions: None,
        })
    }
}

/// Connections derived from the gap between consecutive segments
fn layovers(segments: &[RawSegment]) -> Vec<Layover> {
    segments
        .windows(2)
        .map(|pair| {
            let arrival = pair[0].arrival.as_ref();
            let code = arrival.and_then(|e| e.iata_code.clone()).unwrap_or_default();
            let landed = arrival.and_then(|e| parse_timestamp(e.at.as_deref()));
            let leaves = pair[1]
                .departure
                .as_ref()
                .and_then(|e| parse_timestamp(e.at.as_deref()));
            let duration_minutes = match (landed, leaves) {
                (Some(landed), Some(leaves)) => {
                    u64::try_from((leaves - landed).num_minutes()).unwrap_or(0)
                }
                _ => 0,
            };
            Layover {
                airport: airports::find_by_code(&code)
                    .map_or_else(|| code.clone(), |record| record.name.to_string()),
                code,
                duration_minutes,
            }
        })
        .collect()
}

fn parse_timestamp(value: Option<&str>) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value?, TIMESTAMP_FORMAT).ok()
}

impl RawSegment {
    fn into_segment(self, travel_class: &str) -> FlightSegment {
        let departure = self.departure.unwrap_or_default();
        let arrival = self.arrival.unwrap_or_default();
        let carrier = self.carrier_code.unwrap_or_default();
        FlightSegment {
            flight_number: format!("{carrier} {}", self.number.unwrap_or_default())
                .trim()
                .to_string(),
            airline: carrier,
            departure_airport: departure.iata_code.unwrap_or_default(),
            arrival_airport: arrival.iata_code.unwrap_or_default(),
            departure_time: departure.at.unwrap_or_default(),
            arrival_time: arrival.at.unwrap_or_default(),
            duration_minutes: self
                .duration
                .as_deref()
                .and_then(minutes_from_iso_duration)
                .unwrap_or(0),
            airplane: self.aircraft.and_then(|a| a.code).unwrap_or_default(),
            travel_class: travel_class.to_string(),
        }
    }
}

impl RawLocation {
    fn into_airport(self) -> Option<Airport> {
        let code = self.iata_code.filter(|c| !c.is_empty())?;
        let address = self.address;
        Some(Airport::new(
            &code,
            self.name.as_deref().unwrap_or_default(),
            self.sub_type.as_deref().unwrap_or_default(),
            address
                .as_ref()
                .and_then(|a| a.city_name.as_deref())
                .unwrap_or_default(),
            address
                .as_ref()
                .and_then(|a| a.country_name.as_deref())
                .unwrap_or_default(),
        ))
    }
}

impl RawFare {
    fn dates_and_price(&self) -> (String, Option<String>, Option<f64>, String) {
        let price = self.price.as_ref();
        (
            self.departure_date.clone().unwrap_or_default(),
            self.return_date.clone().filter(|d| !d.is_empty()),
            price.and_then(|p| number_from_opt(p.total.as_ref())),
            price
                .and_then(|p| p.currency.clone())
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        )
    }
}

impl RawActivity {
    fn into_activity(self) -> Activity {
        let price = self.price;
        Activity {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: truncate_chars(
                self.short_description.as_deref().unwrap_or_default(),
                LONG_DESCRIPTION_CHARS,
            ),
            price: price.as_ref().and_then(|p| number_from_opt(p.amount.as_ref())),
            currency: price
                .and_then(|p| p.currency_code)
                .unwrap_or_else(|| "USD".to_string()),
            rating: number_from_opt(self.rating.as_ref()),
            pictures: self.pictures,
            booking_link: self.booking_link.filter(|l| !l.is_empty()),
            lat: self.geo_code.as_ref().and_then(|g| g.latitude),
            lon: self.geo_code.as_ref().and_then(|g| g.longitude),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CabinClass;
    use rstest::rstest;

    #[rstest]
    #[case("LH400", Some(("LH", "400")))]
    #[case("ba 117", Some(("BA", "117")))]
    #[case("U2 1234", Some(("U2", "1234")))]
    #[case("LH", None)]
    #[case("", None)]
    #[case("LH-40", None)]
    fn test_split_flight_number(#[case] input: &str, #[case] expected: Option<(&str, &str)>) {
        let expected = expected.map(|(c, n)| (c.to_string(), n.to_string()));
        assert_eq!(split_flight_number(input), expected);
    }

    #[test]
    fn test_offer_normalization() {
        let offer: RawOffer = serde_json::from_value(json!({
            "id": "1",
            "price": {"currency": "EUR", "total": "546.70"},
            "itineraries": [
                {
                    "duration": "PT9H10M",
                    "segments": [
                        {
                            "departure": {"iataCode": "JFK", "at": "2025-06-01T08:00:00"},
                            "arrival": {"iataCode": "DUB", "at": "2025-06-01T14:00:00"},
                            "carrierCode": "EI",
                            "number": "104",
                            "aircraft": {"code": "333"},
                            "duration": "PT6H"
                        },
                        {
                            "departure": {"iataCode": "DUB", "at": "2025-06-01T15:30:00"},
                            "arrival": {"iataCode": "LHR", "at": "2025-06-01T17:10:00"},
                            "carrierCode": "EI",
                            "number": "158",
                            "duration": "PT1H40M"
                        }
                    ]
                },
                {
                    "duration": "PT7H",
                    "segments": [{
                        "departure": {"iataCode": "LHR", "at": "2025-06-10T10:00:00"},
                        "arrival": {"iataCode": "JFK", "at": "2025-06-10T13:00:00"},
                        "carrierCode": "BA",
                        "number": "117"
                    }]
                }
            ]
        }))
        .unwrap();

        let flight = offer.into_flight(CabinClass::Economy.gds_code()).unwrap();
        assert_eq!(flight.flight_id, "1");
        assert_eq!(flight.price, 546.7);
        assert_eq!(flight.currency, "EUR");
        assert_eq!(flight.airline, "EI");
        assert_eq!(flight.origin, "JFK");
        assert_eq!(flight.destination, "LHR");
        assert_eq!(flight.duration, "PT9H10M");
        assert_eq!(flight.stops, 1);
        assert!(!flight.direct);
        assert_eq!(flight.segments[0].flight_number, "EI 104");
        assert_eq!(flight.segments[0].duration_minutes, 360);
        assert_eq!(flight.segments[0].airplane, "333");
        assert_eq!(flight.layovers[0].code, "DUB");
        assert_eq!(flight.layovers[0].duration_minutes, 90);
        assert_eq!(flight.return_departure.as_deref(), Some("2025-06-10T10:00:00"));
        assert_eq!(flight.return_arrival.as_deref(), Some("2025-06-10T13:00:00"));
    }

    #[test]
    fn test_offer_without_segments_is_dropped() {
        let offer: RawOffer =
            serde_json::from_value(json!({"id": "2", "itineraries": [{"segments": []}]})).unwrap();
        assert!(offer.into_flight("ECONOMY").is_none());
    }

    #[test]
    fn test_location_requires_code() {
        let location: RawLocation = serde_json::from_value(json!({
            "iataCode": "PAR",
            "name": "PARIS",
            "subType": "CITY",
            "address": {"cityName": "PARIS", "countryName": "FRANCE"}
        }))
        .unwrap();
        let airport = location.into_airport().unwrap();
        assert_eq!(airport.display_name, "PARIS (PAR)");
        assert_eq!(airport.kind, "CITY");

        let nameless: RawLocation = serde_json::from_value(json!({"name": "Nowhere"})).unwrap();
        assert!(nameless.into_airport().is_none());
    }

    #[test]
    fn test_activity_prices_from_text() {
        let activity: RawActivity = serde_json::from_value(json!({
            "id": "23642",
            "name": "Skip-the-line tickets to the Louvre",
            "shortDescription": "Book in advance",
            "geoCode": {"latitude": 48.86, "longitude": 2.33},
            "rating": "4.500000",
            "pictures": ["https://images.example/louvre.jpg"],
            "bookingLink": "https://b2c.example/23642",
            "price": {"currencyCode": "EUR", "amount": "35.0"}
        }))
        .unwrap();
        let activity = activity.into_activity();
        assert_eq!(activity.price, Some(35.0));
        assert_eq!(activity.rating, Some(4.5));
        assert_eq!(activity.currency, "EUR");
        assert_eq!(activity.lat, Some(48.86));
    }

    #[test]
    fn test_activity_description_is_cut_long() {
        let activity: RawActivity = serde_json::from_value(json!({
            "id": "23643",
            "name": "Seine cruise",
            "shortDescription": "é".repeat(420)
        }))
        .unwrap();
        let activity = activity.into_activity();
        assert_eq!(activity.description.chars().count(), LONG_DESCRIPTION_CHARS);
        assert_eq!(activity.price, None);
    }

    #[rstest]
    #[case(json!({"data": []}), false)]
    #[case(json!({"data": [{"type": "seatmap"}]}), true)]
    #[case(json!({"data": {"type": "flight-offers-pricing"}}), true)]
    #[case(json!({"errors": []}), false)]
    fn test_has_data(#[case] document: Value, #[case] expected: bool) {
        assert_eq!(has_data(&document), expected);
    }

    #[tokio::test]
    async fn test_unconfigured_client() {
        let client = AmadeusClient::new(&AmadeusConfig::default()).unwrap();
        assert!(!client.is_configured());
        let err = client.search_locations("paris", 5).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured { .. }));
    }
}
