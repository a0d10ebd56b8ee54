use std::sync::Arc;
use tracing::instrument;

use super::SearchError;
use crate::models::{DestinationGuide, TravelTips};
use crate::providers::WikivoyageClient;

/// Destination guides and practical tips from the travel wiki
pub struct GuideSearch {
    wiki: Arc<WikivoyageClient>,
}

impl GuideSearch {
    pub fn new(wiki: Arc<WikivoyageClient>) -> Self {
        Self { wiki }
    }

    #[instrument(skip(self))]
    pub async fn guide(&self, destination: &str) -> Result<DestinationGuide, SearchError> {
        const NOT_FOUND: &str = "Guide not found";
        match self.wiki.guide(require_destination(destination)?).await {
            Ok(Some(guide)) => Ok(guide),
            Ok(None) => Err(SearchError::not_found(NOT_FOUND)),
            Err(error) => Err(SearchError::from_lookup(&error, NOT_FOUND)),
        }
    }

    #[instrument(skip(self))]
    pub async fn tips(&self, destination: &str) -> Result<TravelTips, SearchError> {
        const NOT_FOUND: &str = "Tips not found";
        match self.wiki.tips(require_destination(destination)?).await {
            Ok(Some(tips)) => Ok(tips),
            Ok(None) => Err(SearchError::not_found(NOT_FOUND)),
            Err(error) => Err(SearchError::from_lookup(&error, NOT_FOUND)),
        }
    }
}

fn require_destination(destination: &str) -> Result<&str, SearchError> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(SearchError::validation("Destination is required"));
    }
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WikivoyageConfig;

    fn unreachable() -> GuideSearch {
        let config = WikivoyageConfig {
            base_url: "http://127.0.0.1:9/w/api.php".to_string(),
            ..WikivoyageConfig::default()
        };
        GuideSearch::new(Arc::new(WikivoyageClient::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn test_unreachable_wiki_reads_as_not_found() {
        let err = unreachable().guide("Lisbon").await.unwrap_err();
        assert_eq!(err, SearchError::NotFound("Guide not found".to_string()));

        let err = unreachable().tips("Lisbon").await.unwrap_err();
        assert_eq!(err, SearchError::NotFound("Tips not found".to_string()));
    }

    #[tokio::test]
    async fn test_blank_destination() {
        let err = unreachable().guide("  ").await.unwrap_err();
        assert!(matches!(err, SearchError::Validation(_)));
    }
}
