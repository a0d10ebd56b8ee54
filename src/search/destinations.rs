use tracing::instrument;

use super::{Outcome, ProviderOrder, SearchError};
use crate::models::{Destination, DestinationQuery};
use crate::providers::DestinationSource;

/// Destination search over the configured place providers
pub struct DestinationSearch {
    order: ProviderOrder<dyn DestinationSource>,
}

impl DestinationSearch {
    pub fn new(order: ProviderOrder<dyn DestinationSource>) -> Self {
        Self { order }
    }

    pub fn order(&self) -> &ProviderOrder<dyn DestinationSource> {
        &self.order
    }

    #[instrument(skip(self), fields(query = %query.query))]
    pub async fn search(&self, query: &DestinationQuery) -> Result<Outcome<Destination>, SearchError> {
        query.validate().map_err(SearchError::Validation)?;

        let limit = query.limit;
        let outcome = self
            .order
            .first_non_empty(|provider| provider.search_destinations(query))
            .await;
        Ok(outcome.map_items(|mut items| {
            items.truncate(limit);
            items
        }))
    }
}
