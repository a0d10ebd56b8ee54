//! Xotelo hotel list, rate and price calendar adapter
//!
//! Xotelo needs no credentials. Its listings are keyed by TripAdvisor geo
//! keys (`g187147`) and hotel keys (`g187147-d188726`).

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

use super::http::{build_client, decode_items, send_json};
use super::{HotelSource, Provider, ProviderError, ProviderId, ProviderResult};
use crate::TravelHubError;
use crate::config::XoteloConfig;
use crate::models::{BestRate, Hotel, HotelHeatmap, HotelPricing, HotelQuery, PriceHeatmap, RateQuote};
use crate::normalize::{average_price, lowest_rate_index, non_empty, number_from_opt};

const PROVIDER: ProviderId = ProviderId::Xotelo;

/// Largest page the list endpoint serves
const MAX_PAGE: usize = 100;
const MAX_ADULTS: u32 = 32;
const MAX_ROOMS: u32 = 8;

static GEO_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(g\d+)(?:-d\d+)?$").expect("geo key pattern is valid"));

/// Stay parameters of a pricing lookup
#[derive(Debug, Clone, PartialEq)]
pub struct StayRequest {
    pub check_in: String,
    pub check_out: String,
    pub guests: u32,
    pub rooms: u32,
    pub currency: String,
}

/// Xotelo API client
pub struct XoteloClient {
    client: Client,
    base_url: String,
    default_location_key: String,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope<T> {
    error: Option<Value>,
    result: Option<T>,
    timestamp: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawList {
    #[serde(default)]
    list: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawHotel {
    key: Option<String>,
    name: Option<String>,
    accommodation_type: Option<String>,
    url: Option<String>,
    image: Option<String>,
    review_summary: Option<RawReviewSummary>,
    price_ranges: Option<RawPriceRange>,
    geo: Option<RawGeo>,
}

#[derive(Debug, Deserialize)]
struct RawReviewSummary {
    rating: Option<f64>,
    count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawPriceRange {
    minimum: Option<f64>,
    maximum: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawGeo {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRates {
    #[serde(default)]
    rates: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawRate {
    code: Option<String>,
    name: Option<String>,
    rate: Option<Value>,
    tax: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawHeatmapResult {
    heatmap: Option<RawHeatmap>,
}

#[derive(Debug, Deserialize)]
struct RawHeatmap {
    #[serde(default)]
    average_price_days: Vec<String>,
    #[serde(default)]
    cheap_price_days: Vec<String>,
    #[serde(default)]
    high_price_days: Vec<String>,
}

impl XoteloClient {
    /// Create a new client
    pub fn new(config: &XoteloConfig) -> Result<Self, TravelHubError> {
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            base_url: config.base_url.clone(),
            default_location_key: config.default_location_key.clone(),
        })
    }

    /// Geo key for a search: an explicit `g…` key, else the configured default
    fn location_key(&self, location: &str) -> String {
        GEO_KEY
            .captures(location.trim())
            .and_then(|c| c.get(1))
            .map_or_else(|| self.default_location_key.clone(), |m| m.as_str().to_string())
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> ProviderResult<(T, Option<i64>)> {
        let request = self
            .client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(params);
        let envelope: RawEnvelope<T> = send_json(PROVIDER, request).await?;

        if let Some(error) = envelope.error.filter(|e| !e.is_null()) {
            warn!("Xotelo {endpoint} error: {error}");
            return Err(ProviderError::upstream(PROVIDER, error.to_string()));
        }
        let result = envelope
            .result
            .ok_or_else(|| ProviderError::parse(PROVIDER, format!("{endpoint} without result")))?;
        Ok((result, envelope.timestamp))
    }

    #[instrument(skip(self))]
    async fn list(&self, location_key: &str, limit: usize) -> ProviderResult<Vec<RawHotel>> {
        let params = [
            ("location_key", location_key.to_string()),
            ("limit", limit.min(MAX_PAGE).to_string()),
            ("offset", "0".to_string()),
            ("sort", "best_value".to_string()),
        ];
        let (result, _): (RawList, _) = self.get("list", &params).await?;
        Ok(decode_items(result.list))
    }

    /// One hotel from its area listing, `None` when it is not listed
    pub async fn hotel_details(&self, hotel_key: &str) -> ProviderResult<Option<Hotel>> {
        let location_key = self.location_key(hotel_key);
        let hotels = self.list(&location_key, MAX_PAGE).await?;
        Ok(hotels
            .into_iter()
            .find(|hotel| hotel.key.as_deref() == Some(hotel_key))
            .map(|hotel| hotel.to_hotel("", "", "", 0)))
    }

    /// Rates across booking sites, `None` when no site quotes the stay
    #[instrument(skip(self))]
    pub async fn pricing(
        &self,
        hotel_key: &str,
        stay: &StayRequest,
    ) -> ProviderResult<Option<HotelPricing>> {
        let params = [
            ("hotel_key", hotel_key.to_string()),
            ("chk_in", stay.check_in.clone()),
            ("chk_out", stay.check_out.clone()),
            ("adults", stay.guests.min(MAX_ADULTS).to_string()),
            ("rooms", stay.rooms.min(MAX_ROOMS).to_string()),
            ("currency", stay.currency.clone()),
        ];
        let (result, timestamp): (RawRates, _) = self.get("rates", &params).await?;
        Ok(build_pricing(hotel_key, stay, decode_items(result.rates), timestamp))
    }

    /// Cheap, average and expensive days around a check-out date
    #[instrument(skip(self))]
    pub async fn heatmap(
        &self,
        hotel_key: &str,
        check_out: &str,
    ) -> ProviderResult<Option<HotelHeatmap>> {
        let params = [
            ("hotel_key", hotel_key.to_string()),
            ("chk_out", check_out.to_string()),
        ];
        let (result, timestamp): (RawHeatmapResult, _) = self.get("heatmap", &params).await?;

        Ok(result.heatmap.map(|heatmap| HotelHeatmap {
            hotel_key: hotel_key.to_string(),
            check_out: check_out.to_string(),
            heatmap: PriceHeatmap {
                average_price_days: heatmap.average_price_days,
                cheap_price_days: heatmap.cheap_price_days,
                high_price_days: heatmap.high_price_days,
            },
            timestamp,
        }))
    }
}

fn build_pricing(
    hotel_key: &str,
    stay: &StayRequest,
    rates: Vec<RawRate>,
    timestamp: Option<i64>,
) -> Option<HotelPricing> {
    let rates: Vec<RateQuote> = rates
        .into_iter()
        .map(|r| RateQuote {
            code: r.code.unwrap_or_default(),
            name: r.name.unwrap_or_default(),
            rate: number_from_opt(r.rate.as_ref()),
            tax: number_from_opt(r.tax.as_ref()),
        })
        .collect();

    let best = lowest_rate_index(&rates.iter().map(|r| r.rate).collect::<Vec<_>>())?;
    let best_rate = rates.get(best).map(|quote| BestRate {
        code: quote.code.clone(),
        name: quote.name.clone(),
        rate: quote.rate,
        rate_per_night: quote.rate,
    });

    Some(HotelPricing {
        hotel_key: hotel_key.to_string(),
        check_in: stay.check_in.clone(),
        check_out: stay.check_out.clone(),
        guests: stay.guests,
        rooms: stay.rooms,
        currency: stay.currency.clone(),
        rates,
        best_rate,
        timestamp,
    })
}

impl Provider for XoteloClient {
    fn id(&self) -> ProviderId {
        PROVIDER
    }
}

#[async_trait]
impl HotelSource for XoteloClient {
    async fn search_hotels(&self, query: &HotelQuery) -> ProviderResult<Vec<Hotel>> {
        let location_key = self.location_key(&query.location);
        debug!("Searching Xotelo listings for {location_key}");

        let hotels = self.list(&location_key, query.limit).await?;
        Ok(hotels
            .into_iter()
            .map(|hotel| {
                hotel.to_hotel(
                    query.location.trim(),
                    &query.check_in,
                    &query.check_out,
                    query.guests,
                )
            })
            .collect())
    }
}

impl RawHotel {
    fn to_hotel(self, location: &str, check_in: &str, check_out: &str, guests: u32) -> Hotel {
        let (price_min, price_max) = self
            .price_ranges
            .map_or((0.0, 0.0), |p| (p.minimum.unwrap_or(0.0), p.maximum.unwrap_or(0.0)));
        let average = average_price(price_min, price_max);
        let (rating, review_count) = self
            .review_summary
            .map_or((0.0, 0), |r| (r.rating.unwrap_or(0.0), r.count.unwrap_or(0)));

        Hotel {
            hotel_id: self.key.unwrap_or_default(),
            name: self.name.unwrap_or_else(|| "Unknown".to_string()),
            location: location.to_string(),
            description: String::new(),
            rating,
            review_count,
            price_per_night: (average > 0.0).then_some(average),
            price_min,
            price_max,
            currency: "USD".to_string(),
            lat: self.geo.as_ref().and_then(|g| g.latitude),
            lon: self.geo.as_ref().and_then(|g| g.longitude),
            image_url: non_empty(self.image),
            url: non_empty(self.url),
            accommodation_type: self
                .accommodation_type
                .unwrap_or_else(|| "Hotel".to_string()),
            check_in: check_in.to_string(),
            check_out: check_out.to_string(),
            guests,
        }
    }
}
