//! Shared outbound HTTP plumbing for the adapters

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{ProviderError, ProviderId, ProviderResult};
use crate::TravelHubError;

pub(crate) const USER_AGENT: &str = concat!("TravelHub/", env!("CARGO_PKG_VERSION"));

/// Client with the provider's timeout and our user agent
pub(crate) fn build_client(timeout_seconds: u32) -> Result<Client, TravelHubError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| TravelHubError::client(format!("Failed to create HTTP client: {e}")))
}

/// Send a request and decode a JSON body, mapping every failure to a [`ProviderError`]
pub(crate) async fn send_json<T: DeserializeOwned>(
    provider: ProviderId,
    request: RequestBuilder,
) -> ProviderResult<T> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::network(provider, e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::network(provider, e.to_string()))?;

    if !status.is_success() {
        debug!(%provider, status = status.as_u16(), "upstream returned an error status");
        return Err(ProviderError::from_status(provider, status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| ProviderError::parse(provider, e.to_string()))
}

/// Decode list items one by one, dropping the ones that do not fit the expected shape
pub(crate) fn decode_items<T: DeserializeOwned>(items: Vec<serde_json::Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}
