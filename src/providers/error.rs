use thiserror::Error;

use super::ProviderId;

/// Why a single provider call produced no usable data
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("{provider} is not configured")]
    NotConfigured { provider: ProviderId },

    #[error("{provider} rejected the input: {message}")]
    InvalidInput {
        provider: ProviderId,
        message: String,
    },

    #[error("{provider} network error: {message}")]
    Network {
        provider: ProviderId,
        message: String,
    },

    #[error("{provider} authentication failed: {message}")]
    Authentication {
        provider: ProviderId,
        message: String,
    },

    #[error("{provider} rate limit exceeded")]
    RateLimited { provider: ProviderId },

    #[error("{provider} returned HTTP {status}: {message}")]
    Status {
        provider: ProviderId,
        status: u16,
        message: String,
    },

    #[error("{provider} reported an error: {message}")]
    Upstream {
        provider: ProviderId,
        message: String,
    },

    #[error("{provider} response could not be parsed: {message}")]
    Parse {
        provider: ProviderId,
        message: String,
    },
}

/// Coarse classification used by the fallback chains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotConfigured,
    InvalidInput,
    Upstream,
}

impl ProviderError {
    pub fn not_configured(provider: ProviderId) -> Self {
        Self::NotConfigured { provider }
    }

    pub fn invalid_input<S: Into<String>>(provider: ProviderId, message: S) -> Self {
        Self::InvalidInput {
            provider,
            message: message.into(),
        }
    }

    pub fn network<S: Into<String>>(provider: ProviderId, message: S) -> Self {
        Self::Network {
            provider,
            message: message.into(),
        }
    }

    pub fn upstream<S: Into<String>>(provider: ProviderId, message: S) -> Self {
        Self::Upstream {
            provider,
            message: message.into(),
        }
    }

    pub fn parse<S: Into<String>>(provider: ProviderId, message: S) -> Self {
        Self::Parse {
            provider,
            message: message.into(),
        }
    }

    /// Map a non-success HTTP status to an error
    pub fn from_status(provider: ProviderId, status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::Authentication {
                provider,
                message: format!("HTTP {status}"),
            },
            429 => Self::RateLimited { provider },
            _ => Self::Status {
                provider,
                status,
                message: body.chars().take(200).collect(),
            },
        }
    }

    #[must_use]
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::NotConfigured { provider }
            | Self::RateLimited { provider }
            | Self::InvalidInput { provider, .. }
            | Self::Network { provider, .. }
            | Self::Authentication { provider, .. }
            | Self::Status { provider, .. }
            | Self::Upstream { provider, .. }
            | Self::Parse { provider, .. } => *provider,
        }
    }

    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotConfigured { .. } => FailureKind::NotConfigured,
            Self::InvalidInput { .. } => FailureKind::InvalidInput,
            _ => FailureKind::Upstream,
        }
    }

    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = ProviderError::from_status(ProviderId::Amadeus, 401, "");
        assert!(err.is_authentication());

        let err = ProviderError::from_status(ProviderId::Xotelo, 429, "slow down");
        assert!(matches!(err, ProviderError::RateLimited { .. }));

        let err = ProviderError::from_status(ProviderId::OpenTripMap, 502, "bad gateway");
        assert!(matches!(err, ProviderError::Status { status: 502, .. }));
        assert_eq!(err.kind(), FailureKind::Upstream);
    }

    #[test]
    fn test_kind_and_provider() {
        let err = ProviderError::not_configured(ProviderId::GoogleFlights);
        assert_eq!(err.kind(), FailureKind::NotConfigured);
        assert_eq!(err.provider(), ProviderId::GoogleFlights);
        assert_eq!(err.to_string(), "google_flights is not configured");

        let err = ProviderError::invalid_input(ProviderId::Amadeus, "bad code");
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }
}
