//! OpenTripMap points-of-interest adapter
//!
//! Destination lookup uses the geoname endpoint. Nearby search uses the
//! radius endpoint; a text location is first resolved through geoname, which
//! makes text search the one two-call lookup of this adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::http::{build_client, decode_items, send_json};
use super::{
    AttractionSource, DestinationSource, Provider, ProviderError, ProviderId, ProviderResult,
};
use crate::TravelHubError;
use crate::config::OpenTripMapConfig;
use crate::models::{
    Attraction, AttractionDetails, AttractionQuery, Destination, DestinationQuery, GeoPoint,
};
use crate::normalize::{first_tag, non_empty, number_from_opt};

const PROVIDER: ProviderId = ProviderId::OpenTripMap;

/// OpenTripMap API client
pub struct OpenTripMapClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawGeoname {
    name: Option<String>,
    country: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    fcode: Option<String>,
    population: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    #[serde(default)]
    features: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: RawPlace,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPlace {
    xid: Option<String>,
    name: Option<String>,
    kinds: Option<String>,
    dist: Option<f64>,
    rate: Option<Value>,
    wikipedia_extracts: Option<RawExtract>,
    preview: Option<RawPreview>,
}

#[derive(Debug, Deserialize)]
struct RawExtract {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPreview {
    source: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPoint {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDetails {
    xid: Option<String>,
    name: Option<String>,
    kinds: Option<String>,
    rate: Option<Value>,
    address: Option<serde_json::Map<String, Value>>,
    wikipedia: Option<String>,
    url: Option<String>,
    otm: Option<String>,
    point: Option<RawPoint>,
    preview: Option<RawPreview>,
    wikipedia_extracts: Option<RawExtract>,
    info: Option<RawInfo>,
}

#[derive(Debug, Deserialize)]
struct RawInfo {
    descr: Option<String>,
}

impl OpenTripMapClient {
    /// Create a new client
    pub fn new(config: &OpenTripMapConfig) -> Result<Self, TravelHubError> {
        Ok(Self {
            client: build_client(config.timeout_seconds)?,
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.clone(),
        })
    }

    fn api_key(&self) -> ProviderResult<&str> {
        self.api_key
            .as_deref()
            .ok_or(ProviderError::not_configured(PROVIDER))
    }

    /// Resolve a place name to its centre point
    #[instrument(skip(self))]
    pub async fn geoname(&self, name: &str) -> ProviderResult<Option<Destination>> {
        let api_key = self.api_key()?;
        let request = self
            .client
            .get(format!("{}/places/geoname", self.base_url))
            .query(&[("name", name), ("apikey", api_key)]);

        let raw: RawGeoname = send_json(PROVIDER, request).await?;
        Ok(raw.to_destination())
    }

    /// Named places within `radius_meters` of `center`
    #[instrument(skip(self))]
    pub async fn nearby(
        &self,
        center: GeoPoint,
        radius_meters: u32,
        kinds: Option<&str>,
        limit: usize,
    ) -> ProviderResult<Vec<Attraction>> {
        let api_key = self.api_key()?;
        let mut params = vec![
            ("radius", radius_meters.to_string()),
            ("lon", center.lon.to_string()),
            ("lat", center.lat.to_string()),
            ("limit", limit.to_string()),
            ("format", "geojson".to_string()),
            ("apikey", api_key.to_string()),
        ];
        if let Some(kinds) = kinds.filter(|k| !k.trim().is_empty()) {
            params.push(("kinds", kinds.trim().to_string()));
        }

        let request = self
            .client
            .get(format!("{}/places/radius", self.base_url))
            .query(&params);
        let collection: RawFeatureCollection = send_json(PROVIDER, request).await?;

        let attractions: Vec<Attraction> = decode_items::<RawFeature>(collection.features)
            .into_iter()
            .filter_map(RawFeature::to_attraction)
            .collect();

        debug!("OpenTripMap returned {} named places", attractions.len());
        Ok(attractions)
    }

    /// Full record of one place, `None` when the id is unknown
    #[instrument(skip(self))]
    pub async fn details(&self, xid: &str) -> ProviderResult<Option<AttractionDetails>> {
        let api_key = self.api_key()?;
        let request = self
            .client
            .get(format!(
                "{}/places/xid/{}",
                self.base_url,
                urlencoding::encode(xid)
            ))
            .query(&[("apikey", api_key)]);

        match send_json::<RawDetails>(PROVIDER, request).await {
            Ok(raw) => Ok(raw.to_details()),
            Err(ProviderError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl Provider for OpenTripMapClient {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl DestinationSource for OpenTripMapClient {
    async fn search_destinations(
        &self,
        query: &DestinationQuery,
    ) -> ProviderResult<Vec<Destination>> {
        Ok(self.geoname(&query.query).await?.into_iter().collect())
    }
}

#[async_trait]
impl AttractionSource for OpenTripMapClient {
    async fn search_attractions(&self, query: &AttractionQuery) -> ProviderResult<Vec<Attraction>> {
        let center = match (query.center, query.location.as_deref()) {
            (Some(center), _) => center,
            (None, Some(location)) => {
                let Some(place) = self.geoname(location).await? else {
                    info!("OpenTripMap could not resolve '{location}'");
                    return Ok(Vec::new());
                };
                match (place.lat, place.lon) {
                    (Some(lat), Some(lon)) => GeoPoint { lat, lon },
                    _ => return Ok(Vec::new()),
                }
            }
            (None, None) => {
                return Err(ProviderError::invalid_input(
                    PROVIDER,
                    "a location or coordinates are required",
                ));
            }
        };

        self.nearby(
            center,
            query.radius_meters,
            query.category.as_deref(),
            query.limit,
        )
        .await
    }
}

impl RawGeoname {
    fn to_destination(self) -> Option<Destination> {
        let (lat, lon) = (self.lat?, self.lon?);
        let is_city = self
            .fcode
            .as_deref()
            .map_or(self.population.unwrap_or(0) > 0, |code| code.starts_with("PPL"));

        Some(Destination {
            name: self.name.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            lat: Some(lat),
            lon: Some(lon),
            kind: if is_city { "city" } else { "location" }.to_string(),
            description: String::new(),
            url: None,
        })
    }
}

impl RawFeature {
    /// Unnamed features are map clutter and are dropped
    fn to_attraction(self) -> Option<Attraction> {
        let place = self.properties;
        let name = non_empty(place.name)?;
        let coordinates = self.geometry.map(|g| g.coordinates).unwrap_or_default();

        Some(Attraction {
            id: place.xid,
            name,
            category: first_tag(place.kinds.as_deref().unwrap_or_default()),
            description: place
                .wikipedia_extracts
                .and_then(|e| e.text)
                .unwrap_or_default(),
            lat: coordinates.get(1).copied(),
            lon: coordinates.first().copied(),
            distance: place.dist.unwrap_or(0.0),
            rating: number_from_opt(place.rate.as_ref()).unwrap_or(0.0),
            image_url: place.preview.and_then(|p| p.source),
        })
    }
}

impl RawDetails {
    fn to_details(self) -> Option<AttractionDetails> {
        let id = self.xid?;
        let address = self
            .address
            .map(|parts| {
                ["house_number", "road", "city", "state", "postcode", "country"]
                    .iter()
                    .filter_map(|key| parts.get(*key).and_then(Value::as_str))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        let description = self
            .wikipedia_extracts
            .and_then(|e| e.text)
            .or(self.info.and_then(|i| i.descr))
            .unwrap_or_default();

        Some(AttractionDetails {
            id,
            name: self.name.unwrap_or_default(),
            address,
            description,
            categories: self
                .kinds
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect(),
            lat: self.point.as_ref().and_then(|p| p.lat),
            lon: self.point.as_ref().and_then(|p| p.lon),
            image_url: self.preview.and_then(|p| p.source),
            url: self.url.or(self.otm),
            rating: number_from_opt(self.rate.as_ref()).unwrap_or(0.0),
            wikipedia: self.wikipedia,
        })
    }
}
