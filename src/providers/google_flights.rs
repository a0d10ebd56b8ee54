//! Flight offers through the SerpAPI Google Flights engine

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::http::{build_client, decode_items, send_json};
use super::{FlightSource, Provider, ProviderError, ProviderId, ProviderResult};
use crate::TravelHubError;
use crate::config::SerpApiConfig;
use crate::models::{
    Flight, FlightQuery, FlightSegment, Layover, RawDocument, is_iata_code, is_place_id,
};
use crate::normalize::iso_duration_from_minutes;

const PROVIDER: ProviderId = ProviderId::GoogleFlights;
const CURRENCY: &str = "USD";

/// Round trip and one way, as the engine numbers them
const TRIP_ROUND: &str = "1";
const TRIP_ONE_WAY: &str = "2";

/// Google Flights client
pub struct GoogleFlightsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawSearch {
    #[serde(default)]
    best_flights: Vec<Value>,
    #[serde(default)]
    other_flights: Vec<Value>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawOption {
    #[serde(default)]
    flights: Vec<RawSegment>,
    #[serde(default)]
    layovers: Vec<RawLayover>,
    total_duration: Option<u64>,
    price: Option<f64>,
    booking_token: Option<String>,
    departure_token: Option<String>,
    carbon_emissions: Option<RawEmissions>,
}

#[derive(Debug, Deserialize)]
struct RawSegment {
    departure_airport: Option<RawEndpoint>,
    arrival_airport: Option<RawEndpoint>,
    duration: Option<u64>,
    airline: Option<String>,
    flight_number: Option<String>,
    airplane: Option<String>,
    travel_class: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEndpoint {
    id: Option<String>,
    time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawLayover {
    name: Option<String>,
    id: Option<String>,
    duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawEmissions {
    this_flight: Option<i64>,
}

impl GoogleFlightsClient {
    /// Create a new client
    pub fn new(config: &SerpApiConfig) -> Result<Self, TravelHubError> {
        Ok(Self {
            client: build_client(config.flights_timeout_seconds)?,
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.clone(),
        })
    }

    fn api_key(&self) -> ProviderResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::not_configured(PROVIDER))
    }

    /// Booking options for a token from a search result, passed through as returned
    #[instrument(skip_all)]
    pub async fn flight_details(&self, booking_token: &str) -> ProviderResult<RawDocument> {
        let api_key = self.api_key()?;
        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("engine", "google_flights"),
                ("booking_token", booking_token),
                ("currency", CURRENCY),
                ("hl", "en"),
                ("api_key", api_key),
            ]);

        let document: Value = send_json(PROVIDER, request).await?;
        if let Some(error) = document.get("error").and_then(Value::as_str) {
            return Err(ProviderError::upstream(PROVIDER, error));
        }
        Ok(document)
    }
}

impl Provider for GoogleFlightsClient {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl FlightSource for GoogleFlightsClient {
    #[instrument(skip(self, query), fields(origin = %query.origin, destination = %query.destination))]
    async fn search_flights(&self, query: &FlightQuery) -> ProviderResult<Vec<Flight>> {
        let api_key = self.api_key()?;
        for (field, id) in [("origin", &query.origin), ("destination", &query.destination)] {
            if !is_iata_code(id) && !is_place_id(id) {
                return Err(ProviderError::invalid_input(
                    PROVIDER,
                    format!("{field} '{id}' is neither an IATA code nor a place id"),
                ));
            }
        }

        let mut params = vec![
            ("engine", "google_flights".to_string()),
            ("departure_id", query.origin.clone()),
            ("arrival_id", query.destination.clone()),
            ("outbound_date", query.departure_date.clone()),
            ("adults", query.passengers.to_string()),
            ("travel_class", query.cabin.metasearch_code().to_string()),
            ("currency", CURRENCY.to_string()),
            ("hl", "en".to_string()),
            ("gl", "us".to_string()),
            ("api_key", api_key.to_string()),
        ];
        match &query.return_date {
            Some(return_date) => {
                params.push(("type", TRIP_ROUND.to_string()));
                params.push(("return_date", return_date.clone()));
            }
            None => params.push(("type", TRIP_ONE_WAY.to_string())),
        }

        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&params);
        let response: RawSearch = send_json(PROVIDER, request).await?;
        if let Some(error) = response.error {
            return Err(ProviderError::upstream(PROVIDER, error));
        }

        let flights = response.into_flights(query.is_round_trip());
        if flights.is_empty() {
            debug!("No flight options returned");
        } else {
            info!("Found {} flight options", flights.len());
        }
        Ok(flights)
    }
}

impl RawSearch {
    fn into_flights(self, round_trip: bool) -> Vec<Flight> {
        let mut options = self.best_flights;
        options.extend(self.other_flights);
        decode_items::<RawOption>(options)
            .into_iter()
            .filter_map(|option| option.into_flight(round_trip))
            .collect()
    }
}

impl RawOption {
    /// `None` for options without segments
    fn into_flight(self, round_trip: bool) -> Option<Flight> {
        let first = self.flights.first()?;
        let last = self.flights.last()?;
        let departure = first.departure_airport.as_ref();
        let arrival = last.arrival_airport.as_ref();
        let stops = u32::try_from(self.layovers.len()).unwrap_or(u32::MAX);

        let flight_id = self
            .booking_token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.departure_token.clone())
            .unwrap_or_default();

        Some(Flight {
            flight_id,
            price: self.price.unwrap_or(0.0),
            currency: CURRENCY.to_string(),
            airline: first.airline.clone().unwrap_or_default(),
            origin: departure.and_then(|a| a.id.clone()).unwrap_or_default(),
            destination: arrival.and_then(|a| a.id.clone()).unwrap_or_default(),
            departure_date: departure.and_then(|a| a.time.clone()).unwrap_or_default(),
            arrival_date: arrival.and_then(|a| a.time.clone()).unwrap_or_default(),
            return_departure: None,
            return_arrival: None,
            return_token: if round_trip { self.departure_token } else { None },
            duration: iso_duration_from_minutes(self.total_duration.unwrap_or(0)),
            stops,
            direct: stops == 0,
            segments: self.flights.into_iter().map(RawSegment::into_segment).collect(),
            layovers: self
                .layovers
                .into_iter()
                .map(|l| Layover {
                    airport: l.name.unwrap_or_default(),
                    code: l.id.unwrap_or_default(),
                    duration_minutes: l.duration.unwrap_or(0),
                })
                .collect(),
            carbon_emissions: self.carbon_emissions.and_then(|c| c.this_flight),
        })
    }
}

impl RawSegment {
    fn into_segment(self) -> FlightSegment {
        let departure = self.departure_airport.unwrap_or_default();
        let arrival = self.arrival_airport.unwrap_or_default();
        FlightSegment {
            airline: self.airline.unwrap_or_default(),
            flight_number: self.flight_number.unwrap_or_default(),
            departure_airport: departure.id.unwrap_or_default(),
            arrival_airport: arrival.id.unwrap_or_default(),
            departure_time: departure.time.unwrap_or_default(),
            arrival_time: arrival.time.unwrap_or_default(),
            duration_minutes: self.duration.unwrap_or(0),
            airplane: self.airplane.unwrap_or_default(),
            travel_class: self.travel_class.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CabinClass;
    use serde_json::json;

    fn search_fixture() -> RawSearch {
        serde_json::from_value(json!({
            "best_flights": [{
                "flights": [
                    {
                        "departure_airport": {"name": "John F. Kennedy International Airport", "id": "JFK", "time": "2025-06-01 08:00"},
                        "arrival_airport": {"name": "Keflavik", "id": "KEF", "time": "2025-06-01 17:30"},
                        "duration": 330,
                        "airline": "Icelandair",
                        "flight_number": "FI 614",
                        "airplane": "Boeing 757",
                        "travel_class": "Economy"
                    },
                    {
                        "departure_airport": {"id": "KEF", "time": "2025-06-01 19:00"},
                        "arrival_airport": {"id": "LHR", "time": "2025-06-01 23:10"},
                        "duration": 190,
                        "airline": "Icelandair",
                        "flight_number": "FI 450"
                    }
                ],
                "layovers": [{"duration": 90, "name": "Keflavik International Airport", "id": "KEF"}],
                "total_duration": 610,
                "carbon_emissions": {"this_flight": 512000},
                "price": 489,
                "departure_token": "dep-1"
            }],
            "other_flights": [
                {"flights": [], "price": 100},
                {
                    "flights": [{
                        "departure_airport": {"id": "JFK", "time": "2025-06-01 18:00"},
                        "arrival_airport": {"id": "LHR", "time": "2025-06-02 06:05"},
                        "duration": 425,
                        "airline": "British Airways"
                    }],
                    "total_duration": 425,
                    "price": 612,
                    "booking_token": "book-2"
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_flight_options() {
        let flights = search_fixture().into_flights(false);
        assert_eq!(flights.len(), 2);

        let connecting = &flights[0];
        assert_eq!(connecting.flight_id, "dep-1");
        assert_eq!(connecting.origin, "JFK");
        assert_eq!(connecting.destination, "LHR");
        assert_eq!(connecting.duration, "PT10H10M");
        assert_eq!(connecting.stops, 1);
        assert!(!connecting.direct);
        assert_eq!(connecting.segments.len(), 2);
        assert_eq!(connecting.layovers[0].code, "KEF");
        assert_eq!(connecting.carbon_emissions, Some(512_000));
        assert_eq!(connecting.return_token, None);

        let direct = &flights[1];
        assert_eq!(direct.flight_id, "book-2");
        assert!(direct.direct);
        assert_eq!(direct.price, 612.0);
        assert_eq!(direct.airline, "British Airways");
    }

    #[test]
    fn test_round_trip_exposes_return_token() {
        let flights = search_fixture().into_flights(true);
        assert_eq!(flights[0].return_token.as_deref(), Some("dep-1"));
        assert_eq!(flights[1].return_token, None);
    }

    #[tokio::test]
    async fn test_unconfigured_client() {
        let client = GoogleFlightsClient::new(&SerpApiConfig::default()).unwrap();
        assert!(!client.is_configured());
        let query = FlightQuery::new("JFK", "LHR", "2025-06-01", None, 1, CabinClass::Economy);
        let err = client.search_flights(&query).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured { .. }));
    }

    #[tokio::test]
    async fn test_rejects_free_text_airport() {
        let config = SerpApiConfig {
            api_key: Some("key".to_string()),
            ..SerpApiConfig::default()
        };
        let client = GoogleFlightsClient::new(&config).unwrap();
        let query = FlightQuery::new("NEWYORK", "LHR", "2025-06-01", None, 1, CabinClass::Economy);
        let err = client.search_flights(&query).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidInput { .. }));
    }
}
