//! TripAdvisor listings through the SerpAPI TripAdvisor engine
//!
//! The engine answers with loosely shaped listings: the same fact can live
//! under several keys depending on the listing type, and prices may be
//! numbers, display strings or nested objects. Each listing is decoded on its
//! own and unusable ones are skipped.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use super::http::{build_client, decode_items, send_json};
use super::{AttractionSource, HotelSource, Provider, ProviderError, ProviderId, ProviderResult};
use crate::TravelHubError;
use crate::config::SerpApiConfig;
use crate::models::{Attraction, AttractionQuery, GeoPoint, Hotel, HotelQuery};
use crate::normalize::{
    LONG_DESCRIPTION_CHARS, first_tag, non_empty, number_from_opt, number_from_value,
    truncate_chars,
};

const PROVIDER: ProviderId = ProviderId::TripAdvisor;

/// Listing keys tried, in order, when `locations` is absent or empty
const FALLBACK_LIST_KEYS: [&str; 5] = ["results", "local_results", "places", "data", "organic_results"];

/// Listing category filter of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingKind {
    ThingsToDo,
    Hotels,
}

impl ListingKind {
    fn ssrc(self) -> &'static str {
        match self {
            Self::ThingsToDo => "A",
            Self::Hotels => "h",
        }
    }
}

/// SerpAPI TripAdvisor client
pub struct TripAdvisorClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawListing {
    title: Option<String>,
    name: Option<String>,
    location_name: Option<String>,
    description: Option<String>,
    snippet: Option<String>,
    subtitle: Option<String>,
    rating: Option<Value>,
    stars: Option<Value>,
    reviews: Option<Value>,
    review_count: Option<Value>,
    num_reviews: Option<Value>,
    location_id: Option<Value>,
    id: Option<Value>,
    hotel_id: Option<Value>,
    location_type: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    link: Option<String>,
    url: Option<String>,
    thumbnail: Option<String>,
    photo: Option<RawPhoto>,
    coordinates: Option<Value>,
    location: Option<Value>,
    price: Option<Value>,
    starting_price: Option<Value>,
    price_info: Option<RawPriceInfo>,
}

#[derive(Debug, Deserialize)]
struct RawPhoto {
    thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPriceInfo {
    amount: Option<Value>,
    price: Option<Value>,
    currency: Option<String>,
}

impl TripAdvisorClient {
    /// Create a new client
    pub fn new(config: &SerpApiConfig) -> Result<Self, TravelHubError> {
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.clone(),
        })
    }

    #[instrument(skip(self))]
    async fn search(
        &self,
        kind: ListingKind,
        text: &str,
        near: Option<GeoPoint>,
        limit: usize,
    ) -> ProviderResult<Vec<RawListing>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::not_configured(PROVIDER))?;

        let mut params = vec![
            ("engine", "tripadvisor".to_string()),
            ("q", text.to_string()),
            ("ssrc", kind.ssrc().to_string()),
            ("limit", limit.to_string()),
            ("hl", "en".to_string()),
            ("api_key", api_key.to_string()),
        ];
        if let Some(point) = near {
            params.push(("lat", point.lat.to_string()));
            params.push(("lon", point.lon.to_string()));
        }

        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&params);
        let body: serde_json::Map<String, Value> = send_json(PROVIDER, request).await?;

        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Err(ProviderError::upstream(PROVIDER, error));
        }

        let listings: Vec<RawListing> = decode_items(candidate_items(body));
        debug!("TripAdvisor returned {} listings", listings.len());
        Ok(listings.into_iter().take(limit).collect())
    }
}

/// `locations` when it is a non-empty list, else the first non-empty fallback list
fn candidate_items(mut body: serde_json::Map<String, Value>) -> Vec<Value> {
    std::iter::once("locations")
        .chain(FALLBACK_LIST_KEYS)
        .find_map(|key| match body.remove(key) {
            Some(Value::Array(items)) if !items.is_empty() => Some(items),
            _ => None,
        })
        .unwrap_or_default()
}

impl Provider for TripAdvisorClient {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl AttractionSource for TripAdvisorClient {
    async fn search_attractions(&self, query: &AttractionQuery) -> ProviderResult<Vec<Attraction>> {
        let text = query
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or("things to do");

        let listings = self
            .search(ListingKind::ThingsToDo, text, query.center, query.limit)
            .await?;
        Ok(listings
            .into_iter()
            .filter_map(RawListing::to_attraction)
            .collect())
    }
}

#[async_trait]
impl HotelSource for TripAdvisorClient {
    async fn search_hotels(&self, query: &HotelQuery) -> ProviderResult<Vec<Hotel>> {
        let listings = self
            .search(ListingKind::Hotels, query.location.trim(), None, query.limit)
            .await?;
        Ok(listings
            .into_iter()
            .filter_map(|listing| listing.to_hotel(query))
            .collect())
    }
}

fn value_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn point_of(value: Option<&Value>) -> (Option<f64>, Option<f64>) {
    let Some(Value::Object(map)) = value else {
        return (None, None);
    };
    let coordinate = |keys: [&str; 2]| keys.iter().find_map(|k| map.get(*k).and_then(number_from_value));
    (
        coordinate(["lat", "latitude"]),
        coordinate(["lon", "longitude"]),
    )
}

impl RawListing {
    fn display_name(&mut self) -> Option<String> {
        non_empty(self.title.take())
            .or_else(|| non_empty(self.name.take()))
            .or_else(|| non_empty(self.location_name.take()))
    }

    fn summary(&mut self) -> String {
        non_empty(self.description.take())
            .or_else(|| non_empty(self.snippet.take()))
            .or_else(|| non_empty(self.subtitle.take()))
            .unwrap_or_default()
    }

    fn listing_id(&mut self) -> Option<String> {
        [self.location_id.take(), self.id.take(), self.hotel_id.take()]
            .into_iter()
            .flatten()
            .find_map(value_to_string)
    }

    fn rating_value(&self) -> f64 {
        number_from_opt(self.rating.as_ref())
            .or_else(|| number_from_opt(self.stars.as_ref()))
            .unwrap_or(0.0)
    }

    fn review_total(&self) -> u64 {
        [&self.reviews, &self.review_count, &self.num_reviews]
            .into_iter()
            .find_map(|v| number_from_opt(v.as_ref()))
            .map_or(0, |n| n as u64)
    }

    fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        match point_of(self.coordinates.as_ref()) {
            (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            _ => point_of(self.location.as_ref()),
        }
    }

    fn image(&mut self) -> Option<String> {
        non_empty(self.thumbnail.take())
            .or_else(|| self.photo.take().and_then(|p| non_empty(p.thumbnail)))
    }

    /// Nightly price and its currency, if the listing shows one
    fn nightly_price(&self) -> (Option<f64>, Option<String>) {
        if let Some(price) = number_from_opt(self.price.as_ref()) {
            return (Some(price), None);
        }
        if let Some(price) = number_from_opt(self.starting_price.as_ref()) {
            return (Some(price), None);
        }
        match &self.price_info {
            Some(info) => (
                number_from_opt(info.amount.as_ref()).or_else(|| number_from_opt(info.price.as_ref())),
                info.currency.clone(),
            ),
            None => (None, None),
        }
    }

    fn to_attraction(mut self) -> Option<Attraction> {
        let name = self.display_name()?;
        let (lat, lon) = self.coordinates();

        Some(Attraction {
            id: self.listing_id(),
            name,
            category: first_tag(
                self.location_type
                    .as_deref()
                    .or(self.kind.as_deref())
                    .unwrap_or_default(),
            ),
            description: self.summary(),
            lat,
            lon,
            distance: 0.0,
            rating: self.rating_value(),
            image_url: self.image(),
        })
    }

    fn to_hotel(mut self, query: &HotelQuery) -> Option<Hotel> {
        let name = self.display_name()?;
        let (lat, lon) = self.coordinates();
        let (price, currency) = self.nightly_price();
        let location = match self.location.take() {
            Some(Value::String(text)) if !text.trim().is_empty() => text,
            _ => query.location.trim().to_string(),
        };

        Some(Hotel {
            hotel_id: self.listing_id().unwrap_or_default(),
            name,
            location,
            description: truncate_chars(&self.summary(), LONG_DESCRIPTION_CHARS),
            rating: self.rating_value(),
            review_count: self.review_total(),
            price_per_night: price,
            price_min: price.unwrap_or(0.0),
            price_max: price.unwrap_or(0.0),
            currency: currency.unwrap_or_else(|| "USD".to_string()),
            lat,
            lon,
            image_url: self.image(),
            url: non_empty(self.link.take()).or_else(|| non_empty(self.url.take())),
            accommodation_type: self
                .location_type
                .take()
                .or(self.kind.take())
                .unwrap_or_else(|| "hotel".to_string()),
            check_in: query.check_in.clone(),
            check_out: query.check_out.clone(),
            guests: query.guests,
        })
    }
}
