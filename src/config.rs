//! Configuration management for the `TravelHub` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.
//!
//! Provider credentials are optional: a provider without its key is simply
//! left out of every fallback chain.

use crate::TravelHubError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `TravelHub` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TravelHubConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Upstream provider configuration
    #[serde(default)]
    pub providers: ProvidersConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins, `*` allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    /// Upper bound for a whole request, including every provider attempt
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Settings for every upstream provider
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub opentripmap: OpenTripMapConfig,
    #[serde(default)]
    pub serpapi: SerpApiConfig,
    #[serde(default)]
    pub amadeus: AmadeusConfig,
    #[serde(default)]
    pub xotelo: XoteloConfig,
    #[serde(default)]
    pub wikivoyage: WikivoyageConfig,
}

/// OpenTripMap points-of-interest API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTripMapConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_opentripmap_base_url")]
    pub base_url: String,
    #[serde(default = "default_opentripmap_timeout")]
    pub timeout_seconds: u32,
}

/// SerpAPI, shared by the TripAdvisor, Google Flights and Google Images engines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerpApiConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_serpapi_base_url")]
    pub base_url: String,
    /// TripAdvisor engine timeout
    #[serde(default = "default_serpapi_timeout")]
    pub timeout_seconds: u32,
    /// Google Flights engine timeout
    #[serde(default = "default_serpapi_flights_timeout")]
    pub flights_timeout_seconds: u32,
    /// Google Images engine timeout
    #[serde(default = "default_serpapi_images_timeout")]
    pub images_timeout_seconds: u32,
}

/// Amadeus self-service APIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmadeusConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_amadeus_base_url")]
    pub base_url: String,
    #[serde(default = "default_amadeus_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_amadeus_token_timeout")]
    pub token_timeout_seconds: u32,
}

/// Xotelo hotel price API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XoteloConfig {
    #[serde(default = "default_xotelo_base_url")]
    pub base_url: String,
    /// TripAdvisor geo key used when a search location is plain text
    #[serde(default = "default_xotelo_location_key")]
    pub default_location_key: String,
    #[serde(default = "default_xotelo_timeout")]
    pub timeout_seconds: u32,
}

/// Wikivoyage MediaWiki API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikivoyageConfig {
    #[serde(default = "default_wikivoyage_base_url")]
    pub base_url: String,
    #[serde(default = "default_wikivoyage_timeout")]
    pub timeout_seconds: u32,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_request_timeout() -> u32 {
    90
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_opentripmap_base_url() -> String {
    "https://api.opentripmap.com/0.1/en".to_string()
}

fn default_opentripmap_timeout() -> u32 {
    10
}

fn default_serpapi_base_url() -> String {
    "https://serpapi.com".to_string()
}

fn default_serpapi_timeout() -> u32 {
    20
}

fn default_serpapi_flights_timeout() -> u32 {
    30
}

fn default_serpapi_images_timeout() -> u32 {
    10
}

fn default_amadeus_base_url() -> String {
    "https://test.api.amadeus.com".to_string()
}

fn default_amadeus_timeout() -> u32 {
    15
}

fn default_amadeus_token_timeout() -> u32 {
    10
}

fn default_xotelo_base_url() -> String {
    "https://data.xotelo.com/api".to_string()
}

fn default_xotelo_location_key() -> String {
    "g294197".to_string()
}

fn default_xotelo_timeout() -> u32 {
    15
}

fn default_wikivoyage_base_url() -> String {
    "https://en.wikivoyage.org/w/api.php".to_string()
}

fn default_wikivoyage_timeout() -> u32 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for OpenTripMapConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_opentripmap_base_url(),
            timeout_seconds: default_opentripmap_timeout(),
        }
    }
}

impl Default for SerpApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_serpapi_base_url(),
            timeout_seconds: default_serpapi_timeout(),
            flights_timeout_seconds: default_serpapi_flights_timeout(),
            images_timeout_seconds: default_serpapi_images_timeout(),
        }
    }
}

impl Default for AmadeusConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            base_url: default_amadeus_base_url(),
            timeout_seconds: default_amadeus_timeout(),
            token_timeout_seconds: default_amadeus_token_timeout(),
        }
    }
}

impl Default for XoteloConfig {
    fn default() -> Self {
        Self {
            base_url: default_xotelo_base_url(),
            default_location_key: default_xotelo_location_key(),
            timeout_seconds: default_xotelo_timeout(),
        }
    }
}

impl Default for WikivoyageConfig {
    fn default() -> Self {
        Self {
            base_url: default_wikivoyage_base_url(),
            timeout_seconds: default_wikivoyage_timeout(),
        }
    }
}

impl OpenTripMapConfig {
    /// API key, if one is set and non-empty
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

impl SerpApiConfig {
    /// API key, if one is set and non-empty
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

impl AmadeusConfig {
    /// Client id and secret, only when both are present
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((
            non_blank(self.client_id.as_deref())?,
            non_blank(self.client_secret.as_deref())?,
        ))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Ensure a scheme and drop trailing slashes
#[must_use]
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    };
    url.trim_end_matches('/').to_string()
}

fn fill_base_url(url: &mut String, fallback: fn() -> String) {
    *url = if url.trim().is_empty() {
        fallback()
    } else {
        normalize_base_url(url)
    };
}

impl TravelHubConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(Self::get_config_path);

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Nested keys use a double underscore: TRAVELHUB_PROVIDERS__SERPAPI__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("TRAVELHUB")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TravelHubConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Configuration file location: `TRAVELHUB_CONFIG` or `./config.toml`
    #[must_use]
    pub fn get_config_path() -> PathBuf {
        std::env::var("TRAVELHUB_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"))
    }

    /// Apply the conventional provider variables (`SERP_API_KEY`, `AMADEUS_API_KEY`, ...)
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OPENTRIPMAP_API_KEY") {
            self.providers.opentripmap.api_key = Some(key);
        }
        if let Some(key) = get("SERP_API_KEY") {
            self.providers.serpapi.api_key = Some(key);
        }
        if let Some(id) = get("AMADEUS_API_KEY") {
            self.providers.amadeus.client_id = Some(id);
        }
        if let Some(secret) = get("AMADEUS_API_SECRET") {
            self.providers.amadeus.client_secret = Some(secret);
        }
        if let Some(url) = get("AMADEUS_BASE_URL") {
            self.providers.amadeus.base_url = url;
        }
        if let Some(port) = get("PORT").and_then(|p| p.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.cors_origins.is_empty() {
            self.server.cors_origins = default_cors_origins();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }

        let providers = &mut self.providers;
        if providers.opentripmap.timeout_seconds == 0 {
            providers.opentripmap.timeout_seconds = default_opentripmap_timeout();
        }
        if providers.serpapi.timeout_seconds == 0 {
            providers.serpapi.timeout_seconds = default_serpapi_timeout();
        }
        if providers.serpapi.flights_timeout_seconds == 0 {
            providers.serpapi.flights_timeout_seconds = default_serpapi_flights_timeout();
        }
        if providers.serpapi.images_timeout_seconds == 0 {
            providers.serpapi.images_timeout_seconds = default_serpapi_images_timeout();
        }
        if providers.amadeus.timeout_seconds == 0 {
            providers.amadeus.timeout_seconds = default_amadeus_timeout();
        }
        if providers.amadeus.token_timeout_seconds == 0 {
            providers.amadeus.token_timeout_seconds = default_amadeus_token_timeout();
        }
        if providers.xotelo.timeout_seconds == 0 {
            providers.xotelo.timeout_seconds = default_xotelo_timeout();
        }
        if providers.xotelo.default_location_key.is_empty() {
            providers.xotelo.default_location_key = default_xotelo_location_key();
        }
        if providers.wikivoyage.timeout_seconds == 0 {
            providers.wikivoyage.timeout_seconds = default_wikivoyage_timeout();
        }

        fill_base_url(&mut providers.opentripmap.base_url, default_opentripmap_base_url);
        fill_base_url(&mut providers.serpapi.base_url, default_serpapi_base_url);
        fill_base_url(&mut providers.amadeus.base_url, default_amadeus_base_url);
        fill_base_url(&mut providers.xotelo.base_url, default_xotelo_base_url);
        fill_base_url(&mut providers.wikivoyage.base_url, default_wikivoyage_base_url);
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_credentials()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate that paired credentials are complete
    pub fn validate_credentials(&self) -> Result<()> {
        let amadeus = &self.providers.amadeus;
        let has_id = non_blank(amadeus.client_id.as_deref()).is_some();
        let has_secret = non_blank(amadeus.client_secret.as_deref()).is_some();
        if has_id != has_secret {
            return Err(TravelHubError::config(
                "Amadeus needs both a client id and a client secret. Set both or neither.",
            )
            .into());
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(TravelHubError::config("Server port cannot be 0").into());
        }

        if self.server.request_timeout_seconds > 600 {
            return Err(
                TravelHubError::config("Request timeout cannot exceed 600 seconds").into(),
            );
        }

        let providers = &self.providers;
        let timeouts = [
            ("OpenTripMap", providers.opentripmap.timeout_seconds),
            ("SerpAPI", providers.serpapi.timeout_seconds),
            ("SerpAPI flights", providers.serpapi.flights_timeout_seconds),
            ("SerpAPI images", providers.serpapi.images_timeout_seconds),
            ("Amadeus", providers.amadeus.timeout_seconds),
            ("Amadeus token", providers.amadeus.token_timeout_seconds),
            ("Xotelo", providers.xotelo.timeout_seconds),
            ("Wikivoyage", providers.wikivoyage.timeout_seconds),
        ];
        for (name, seconds) in timeouts {
            if seconds > 300 {
                return Err(TravelHubError::config(format!(
                    "{name} timeout cannot exceed 300 seconds"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TravelHubError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(TravelHubError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let providers = &self.providers;
        let urls = [
            ("OpenTripMap", &providers.opentripmap.base_url),
            ("SerpAPI", &providers.serpapi.base_url),
            ("Amadeus", &providers.amadeus.base_url),
            ("Xotelo", &providers.xotelo.base_url),
            ("Wikivoyage", &providers.wikivoyage.base_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(TravelHubError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
