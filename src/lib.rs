//! `TravelHub` - Multi-provider travel search aggregator
//!
//! This library fans each search out over an ordered chain of upstream
//! providers (points-of-interest, review, hotel rate, flight metasearch,
//! GDS and wiki APIs) and serves the normalized results through a REST API.

pub mod airports;
pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod search;
pub mod web;

// Re-export core types for public API
pub use config::TravelHubConfig;
pub use error::TravelHubError;
pub use search::{SearchError, SearchService};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TravelHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
