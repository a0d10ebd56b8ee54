//! Provider fallback chains
//!
//! A [`ProviderOrder`] is fixed when the service starts: the preferred order
//! of a capability minus every provider whose credentials are missing. At
//! request time each provider in the order is tried at most once, and the
//! first one to return a non-empty batch wins. Errors and empty batches both
//! move on to the next provider.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::providers::{FailureKind, Provider, ProviderId, ProviderResult};

/// Where a provider stands within one chain run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    NotTried,
    TriedOkNonEmpty,
    TriedEmptyOrFailed,
}

/// Items of one chain run and the provider that produced them
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub items: Vec<T>,
    pub served_by: Option<ProviderId>,
    pub attempts: Vec<(ProviderId, AttemptState)>,
}

impl<T> Outcome<T> {
    /// An outcome no provider contributed to
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            served_by: None,
            attempts: Vec::new(),
        }
    }

    /// An outcome served by a single source without a chain
    #[must_use]
    pub fn served(provider: ProviderId, items: Vec<T>) -> Self {
        let state = if items.is_empty() {
            AttemptState::TriedEmptyOrFailed
        } else {
            AttemptState::TriedOkNonEmpty
        };
        Self {
            served_by: (!items.is_empty()).then_some(provider),
            items,
            attempts: vec![(provider, state)],
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply `f` to the items, keeping the bookkeeping
    #[must_use]
    pub fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Outcome<U> {
        Outcome {
            items: f(self.items),
            served_by: self.served_by,
            attempts: self.attempts,
        }
    }
}

/// Trial sequence of the configured providers of one capability
pub struct ProviderOrder<S: ?Sized> {
    capability: &'static str,
    providers: Vec<Arc<S>>,
}

impl<S: ?Sized + Provider> ProviderOrder<S> {
    /// Keep the configured providers of `preferred`, in order
    pub fn new(capability: &'static str, preferred: Vec<Arc<S>>) -> Self {
        let providers: Vec<Arc<S>> = preferred
            .into_iter()
            .filter(|provider| {
                let configured = provider.is_configured();
                if !configured {
                    info!(capability, provider = %provider.id(), "provider not configured, left out of the order");
                }
                configured
            })
            .collect();

        debug!(
            capability,
            order = ?providers.iter().map(|p| p.id()).collect::<Vec<_>>(),
            "provider order fixed"
        );
        Self {
            capability,
            providers,
        }
    }

    #[must_use]
    pub fn ids(&self) -> Vec<ProviderId> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// The first provider of the order, if any is configured
    #[must_use]
    pub fn first(&self) -> Option<&Arc<S>> {
        self.providers.first()
    }

    /// Try each provider once and return the first non-empty batch
    pub async fn first_non_empty<'a, T, F, Fut>(&'a self, mut attempt: F) -> Outcome<T>
    where
        F: FnMut(&'a S) -> Fut,
        Fut: Future<Output = ProviderResult<Vec<T>>>,
    {
        let mut attempts: Vec<(ProviderId, AttemptState)> = self
            .providers
            .iter()
            .map(|p| (p.id(), AttemptState::NotTried))
            .collect();

        for (index, provider) in self.providers.iter().enumerate() {
            let id = provider.id();
            match attempt(provider.as_ref()).await {
                Ok(items) if !items.is_empty() => {
                    attempts[index].1 = AttemptState::TriedOkNonEmpty;
                    info!(capability = self.capability, provider = %id, count = items.len(), "served");
                    return Outcome {
                        items,
                        served_by: Some(id),
                        attempts,
                    };
                }
                Ok(_) => {
                    debug!(capability = self.capability, provider = %id, "no results, falling back");
                }
                Err(error) => match error.kind() {
                    FailureKind::NotConfigured | FailureKind::InvalidInput => {
                        debug!(capability = self.capability, provider = %id, "skipped: {error}");
                    }
                    FailureKind::Upstream => {
                        warn!(capability = self.capability, provider = %id, "provider failed: {error}");
                    }
                },
            }
            attempts[index].1 = AttemptState::TriedEmptyOrFailed;
        }

        info!(capability = self.capability, "no provider returned results");
        Outcome {
            items: Vec::new(),
            served_by: None,
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Items(Vec<u32>),
        Fails,
    }

    struct FakeSource {
        id: ProviderId,
        configured: bool,
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(id: ProviderId, configured: bool, behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                id,
                configured,
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }

        async fn fetch(&self) -> ProviderResult<Vec<u32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.behaviour {
                Behaviour::Items(items) => Ok(items.clone()),
                Behaviour::Fails => Err(ProviderError::network(self.id, "connection reset")),
            }
        }
    }

    impl Provider for FakeSource {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    #[tokio::test]
    async fn test_empty_primary_falls_back() {
        let a = FakeSource::new(ProviderId::OpenTripMap, true, Behaviour::Items(vec![]));
        let b = FakeSource::new(ProviderId::Wikivoyage, true, Behaviour::Items(vec![7, 8]));
        let order = ProviderOrder::new("test", vec![a.clone(), b.clone()]);

        let outcome = order.first_non_empty(|p| p.fetch()).await;
        assert_eq!(outcome.items, vec![7, 8]);
        assert_eq!(outcome.served_by, Some(ProviderId::Wikivoyage));
        assert_eq!(
            outcome.attempts,
            vec![
                (ProviderId::OpenTripMap, AttemptState::TriedEmptyOrFailed),
                (ProviderId::Wikivoyage, AttemptState::TriedOkNonEmpty),
            ]
        );
    }

    #[tokio::test]
    async fn test_failing_primary_falls_back() {
        let a = FakeSource::new(ProviderId::TripAdvisor, true, Behaviour::Fails);
        let b = FakeSource::new(ProviderId::Xotelo, true, Behaviour::Items(vec![1]));
        let order = ProviderOrder::new("test", vec![a.clone(), b.clone()]);

        let outcome = order.first_non_empty(|p| p.fetch()).await;
        assert_eq!(outcome.items, vec![1]);
        assert_eq!(a.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_non_empty_stops_the_chain() {
        let a = FakeSource::new(ProviderId::GoogleFlights, true, Behaviour::Items(vec![3]));
        let b = FakeSource::new(ProviderId::Amadeus, true, Behaviour::Items(vec![4]));
        let order = ProviderOrder::new("test", vec![a.clone(), b.clone()]);

        let outcome = order.first_non_empty(|p| p.fetch()).await;
        assert_eq!(outcome.items, vec![3]);
        assert_eq!(b.calls.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.attempts[1].1, AttemptState::NotTried);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_is_never_invoked() {
        let a = FakeSource::new(ProviderId::GoogleFlights, false, Behaviour::Items(vec![9]));
        let b = FakeSource::new(ProviderId::Amadeus, true, Behaviour::Items(vec![5]));
        let order = ProviderOrder::new("test", vec![a.clone(), b.clone()]);

        assert_eq!(order.ids(), vec![ProviderId::Amadeus]);
        let outcome = order.first_non_empty(|p| p.fetch()).await;
        assert_eq!(outcome.items, vec![5]);
        assert_eq!(a.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_everything_empty_or_failed() {
        let a = FakeSource::new(ProviderId::TripAdvisor, true, Behaviour::Fails);
        let b = FakeSource::new(ProviderId::Xotelo, true, Behaviour::Items(vec![]));
        let order = ProviderOrder::new("test", vec![a, b]);

        let outcome = order.first_non_empty(|p| p.fetch()).await;
        assert!(outcome.is_empty());
        assert_eq!(outcome.served_by, None);
        assert!(
            outcome
                .attempts
                .iter()
                .all(|(_, state)| *state == AttemptState::TriedEmptyOrFailed)
        );
    }

    #[tokio::test]
    async fn test_empty_order() {
        let order: ProviderOrder<FakeSource> = ProviderOrder::new("test", Vec::new());
        let outcome = order.first_non_empty(|p| p.fetch()).await;
        assert!(outcome.is_empty());
        assert!(outcome.attempts.is_empty());
    }

    #[test]
    fn test_served_outcome() {
        let outcome = Outcome::served(ProviderId::AirportDirectory, vec!["JFK"]);
        assert_eq!(outcome.served_by, Some(ProviderId::AirportDirectory));
        let empty: Outcome<&str> = Outcome::served(ProviderId::AirportDirectory, Vec::new());
        assert_eq!(empty.served_by, None);
    }
}
