//! Picture lookup through the SerpAPI Google Images engine

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::http::{build_client, send_json};
use super::{ImageSource, Provider, ProviderError, ProviderId, ProviderResult};
use crate::TravelHubError;
use crate::config::SerpApiConfig;

const PROVIDER: ProviderId = ProviderId::ImageSearch;

/// Image search client
pub struct ImageSearchClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawImageResponse {
    #[serde(default)]
    images_results: Vec<RawImage>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    thumbnail: Option<String>,
    original: Option<String>,
    link: Option<String>,
}

impl ImageSearchClient {
    /// Create a new client
    pub fn new(config: &SerpApiConfig) -> Result<Self, TravelHubError> {
        Ok(Self {
            client: build_client(config.images_timeout_seconds)?,
            api_key: config.api_key().map(str::to_string),
            base_url: config.base_url.clone(),
        })
    }
}

impl Provider for ImageSearchClient {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl ImageSource for ImageSearchClient {
    #[instrument(skip(self))]
    async fn find_image(&self, query: &str) -> ProviderResult<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::not_configured(PROVIDER))?;

        let request = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("engine", "google_images"),
                ("q", query.trim()),
                ("num", "3"),
                ("safe", "active"),
                ("api_key", api_key),
            ]);

        let response: RawImageResponse = send_json(PROVIDER, request).await?;
        if let Some(error) = response.error {
            return Err(ProviderError::upstream(PROVIDER, error));
        }
        Ok(response.first_http_url())
    }
}

impl RawImageResponse {
    /// First absolute URL among thumbnail, original and link of each result
    fn first_http_url(self) -> Option<String> {
        self.images_results.into_iter().find_map(|image| {
            image
                .thumbnail
                .or(image.original)
                .or(image.link)
                .filter(|url| url.starts_with("http"))
        })
    }
}
