//! OAuth client-credentials token cache
//!
//! The cache is an owned component handed to the adapter that needs it.
//! Concurrent refreshes are allowed; the last one to finish wins, which is
//! harmless because any fresh token is valid.

use async_trait::async_trait;
use chrono::Utc;
use oauth2::{
    AuthType, AuthUrl, ClientId, ClientSecret, TokenResponse, TokenUrl, basic::BasicClient,
};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{ProviderError, ProviderId, ProviderResult};

/// Tokens are refreshed this many seconds before they expire
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Lifetime assumed when the token endpoint omits `expires_in`
pub const DEFAULT_EXPIRES_IN_SECS: i64 = 1800;

/// A bearer token with its absolute expiry (unix seconds)
#[derive(Debug, Clone, PartialEq)]
pub struct AccessToken {
    pub access_token: String,
    pub expiry: i64,
}

impl AccessToken {
    /// Build from a token endpoint answer received at `now`
    #[must_use]
    pub fn issued_at(access_token: String, expires_in: Option<i64>, now: i64) -> Self {
        Self {
            access_token,
            expiry: now + expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
        }
    }

    /// Usable at `now` with the refresh margin applied
    #[must_use]
    pub fn is_fresh(&self, now: i64) -> bool {
        now < self.expiry - REFRESH_MARGIN_SECS
    }
}

/// Something that can mint a new access token
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Returns the token and its lifetime in seconds, when known
    async fn fetch_token(&self) -> ProviderResult<(String, Option<i64>)>;
}

/// Client-credentials grant against an OAuth2 token endpoint
pub struct OAuthTokenSource {
    provider: ProviderId,
    client: BasicClient,
    timeout: Duration,
}

impl OAuthTokenSource {
    /// Create a source posting id and secret in the form body to `token_url`
    pub fn new(
        provider: ProviderId,
        client_id: &str,
        client_secret: &str,
        token_url: &str,
        timeout_seconds: u32,
    ) -> ProviderResult<Self> {
        let invalid_url =
            |e: oauth2::url::ParseError| ProviderError::invalid_input(provider, e.to_string());
        let client = BasicClient::new(
            ClientId::new(client_id.to_string()),
            Some(ClientSecret::new(client_secret.to_string())),
            AuthUrl::new(token_url.to_string()).map_err(invalid_url)?,
            Some(TokenUrl::new(token_url.to_string()).map_err(invalid_url)?),
        )
        .set_auth_type(AuthType::RequestBody);

        Ok(Self {
            provider,
            client,
            timeout: Duration::from_secs(timeout_seconds.into()),
        })
    }
}

#[async_trait]
impl TokenSource for OAuthTokenSource {
    async fn fetch_token(&self) -> ProviderResult<(String, Option<i64>)> {
        let request = self
            .client
            .exchange_client_credentials()
            .request_async(oauth2::reqwest::async_http_client);

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| ProviderError::network(self.provider, "token request timed out"))?
            .map_err(|e| ProviderError::Authentication {
                provider: self.provider,
                message: format!("token request failed: {e}"),
            })?;

        let expires_in = response
            .expires_in()
            .and_then(|d| i64::try_from(d.as_secs()).ok());
        Ok((response.access_token().secret().clone(), expires_in))
    }
}

/// Memoizes one access token until shortly before it expires
pub struct TokenCache {
    provider: ProviderId,
    source: Option<Arc<dyn TokenSource>>,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenCache {
    /// A cache backed by `source`; `None` means credentials are absent
    #[must_use]
    pub fn new(provider: ProviderId, source: Option<Arc<dyn TokenSource>>) -> Self {
        Self {
            provider,
            source,
            cached: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// A valid token, fetching a new one when the cached token is missing or stale
    pub async fn get(&self) -> ProviderResult<String> {
        let Some(source) = &self.source else {
            return Err(ProviderError::not_configured(self.provider));
        };

        let now = Utc::now().timestamp();
        let cached = self.lock().clone().filter(|t| t.is_fresh(now));
        if let Some(token) = cached {
            return Ok(token.access_token);
        }

        debug!(provider = %self.provider, "fetching new access token");
        let (value, expires_in) = source.fetch_token().await.inspect_err(|e| {
            warn!(provider = %self.provider, "token refresh failed: {e}");
        })?;

        let token = AccessToken::issued_at(value, expires_in, Utc::now().timestamp());
        info!(provider = %self.provider, expiry = token.expiry, "access token refreshed");
        let access_token = token.access_token.clone();
        *self.lock() = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token so the next [`TokenCache::get`] fetches a new one
    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<AccessToken>> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        expires_in: Option<i64>,
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn fetch_token(&self) -> ProviderResult<(String, Option<i64>)> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok((format!("token-{n}"), self.expires_in))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl TokenSource for FailingSource {
        async fn fetch_token(&self) -> ProviderResult<(String, Option<i64>)> {
            Err(ProviderError::network(ProviderId::Amadeus, "connection refused"))
        }
    }

    fn counting(expires_in: Option<i64>) -> Arc<CountingSource> {
        Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            expires_in,
        })
    }

    #[test]
    fn test_freshness_margin() {
        let token = AccessToken::issued_at("t".to_string(), Some(1799), 1_000);
        assert_eq!(token.expiry, 2_799);
        assert!(token.is_fresh(2_700));
        assert!(!token.is_fresh(2_739));
        assert!(!token.is_fresh(2_800));
    }

    #[test]
    fn test_default_lifetime() {
        let token = AccessToken::issued_at("t".to_string(), None, 0);
        assert_eq!(token.expiry, DEFAULT_EXPIRES_IN_SECS);
    }

    #[tokio::test]
    async fn test_token_is_memoized() {
        let source = counting(Some(1799));
        let cache = TokenCache::new(ProviderId::Amadeus, Some(source.clone()));

        assert_eq!(cache.get().await.unwrap(), "token-1");
        assert_eq!(cache.get().await.unwrap(), "token-1");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_lived_token_is_refetched() {
        // expires inside the refresh margin, so every call fetches
        let source = counting(Some(30));
        let cache = TokenCache::new(ProviderId::Amadeus, Some(source.clone()));

        assert_eq!(cache.get().await.unwrap(), "token-1");
        assert_eq!(cache.get().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let source = counting(Some(1799));
        let cache = TokenCache::new(ProviderId::Amadeus, Some(source.clone()));

        cache.get().await.unwrap();
        cache.invalidate();
        assert_eq!(cache.get().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn test_missing_credentials() {
        let cache = TokenCache::new(ProviderId::Amadeus, None);
        assert!(!cache.is_configured());
        let err = cache.get().await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured { .. }));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported() {
        let cache = TokenCache::new(ProviderId::Amadeus, Some(Arc::new(FailingSource)));
        let err = cache.get().await.unwrap_err();
        assert!(matches!(err, ProviderError::Network { .. }));
    }
}
