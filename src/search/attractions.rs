//! Attraction search, plain and image-enriched
//!
//! Both variants run a fallback chain, then fill in distances from the
//! search centre when the winning provider did not report them. The
//! enriched variant prefers the review platform and afterwards looks up one
//! picture for every item that came without one.

use std::sync::Arc;
use tracing::{debug, instrument};

use super::{Outcome, ProviderOrder, SearchError};
use crate::models::{Attraction, AttractionDetails, AttractionQuery, GeoPoint};
use crate::normalize::{LONG_DESCRIPTION_CHARS, SHORT_DESCRIPTION_CHARS, truncate_chars};
use crate::providers::{AttractionSource, ImageSource, OpenTripMapClient};

const NOT_FOUND: &str = "Attraction not found";

/// Attraction search and point-of-interest details
pub struct AttractionSearch {
    plain: ProviderOrder<dyn AttractionSource>,
    enriched: ProviderOrder<dyn AttractionSource>,
    images: Option<Arc<dyn ImageSource>>,
    places: Arc<OpenTripMapClient>,
}

impl AttractionSearch {
    pub fn new(
        plain: ProviderOrder<dyn AttractionSource>,
        enriched: ProviderOrder<dyn AttractionSource>,
        images: Option<Arc<dyn ImageSource>>,
        places: Arc<OpenTripMapClient>,
    ) -> Self {
        Self {
            plain,
            enriched,
            images,
            places,
        }
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &AttractionQuery) -> Result<Outcome<Attraction>, SearchError> {
        query.validate().map_err(SearchError::Validation)?;
        let outcome = self
            .plain
            .first_non_empty(|provider| provider.search_attractions(query))
            .await;
        Ok(outcome.map_items(|items| finish(items, query, SHORT_DESCRIPTION_CHARS)))
    }

    #[instrument(skip(self))]
    pub async fn search_enriched(
        &self,
        query: &AttractionQuery,
    ) -> Result<Outcome<Attraction>, SearchError> {
        query.validate().map_err(SearchError::Validation)?;
        let mut outcome = self
            .enriched
            .first_non_empty(|provider| provider.search_attractions(query))
            .await
            .map_items(|items| finish(items, query, LONG_DESCRIPTION_CHARS));

        if let Some(images) = &self.images {
            enrich_images(images.as_ref(), &mut outcome.items, &query.place_label()).await;
        }
        Ok(outcome)
    }

    /// Full record of one point of interest
    #[instrument(skip(self))]
    pub async fn details(&self, xid: &str) -> Result<AttractionDetails, SearchError> {
        let xid = xid.trim();
        if xid.is_empty() {
            return Err(SearchError::validation("Attraction id is required"));
        }
        match self.places.details(xid).await {
            Ok(Some(details)) => Ok(details),
            Ok(None) => Err(SearchError::not_found(NOT_FOUND)),
            Err(error) => Err(SearchError::from_lookup(&error, NOT_FOUND)),
        }
    }
}

/// Cut descriptions to the capability's length, fill in missing distances and apply the limit
fn finish(
    mut items: Vec<Attraction>,
    query: &AttractionQuery,
    description_chars: usize,
) -> Vec<Attraction> {
    items.truncate(query.limit);
    for item in &mut items {
        item.description = truncate_chars(&item.description, description_chars);
        if let Some(center) = query.center {
            fill_distance(item, &center);
        }
    }
    items
}

fn fill_distance(item: &mut Attraction, center: &GeoPoint) {
    if item.distance > 0.0 {
        return;
    }
    if let (Some(lat), Some(lon)) = (item.lat, item.lon) {
        item.distance = center.distance_meters(&GeoPoint { lat, lon }).round();
    }
}

/// One image lookup per item without a picture; failures leave the item as is
async fn enrich_images(images: &dyn ImageSource, items: &mut [Attraction], place: &str) {
    for item in items.iter_mut().filter(|item| item.image_url.is_none()) {
        let lookup = format!("{} {}", item.name, place);
        match images.find_image(lookup.trim()).await {
            Ok(found) => item.image_url = found,
            Err(error) => debug!(attraction = %item.name, "image lookup failed: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenTripMapConfig;
    use crate::providers::{Provider, ProviderError, ProviderId, ProviderResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeAttractions {
        id: ProviderId,
        items: Vec<Attraction>,
    }

    impl Provider for FakeAttractions {
        fn id(&self) -> ProviderId {
            self.id
        }
    }

    #[async_trait]
    impl AttractionSource for FakeAttractions {
        async fn search_attractions(&self, _query: &AttractionQuery) -> ProviderResult<Vec<Attraction>> {
            Ok(self.items.clone())
        }
    }

    #[derive(Default)]
    struct RecordingImages {
        queries: Mutex<Vec<String>>,
    }

    impl Provider for RecordingImages {
        fn id(&self) -> ProviderId {
            ProviderId::ImageSearch
        }
    }

    #[async_trait]
    impl ImageSource for RecordingImages {
        async fn find_image(&self, query: &str) -> ProviderResult<Option<String>> {
            self.queries.lock().unwrap().push(query.to_string());
            if query.starts_with("Broken") {
                return Err(ProviderError::network(ProviderId::ImageSearch, "timeout"));
            }
            Ok(Some(format!("https://img.example/{}.jpg", query.len())))
        }
    }

    fn attraction(name: &str, image: Option<&str>) -> Attraction {
        Attraction {
            name: name.to_string(),
            image_url: image.map(str::to_string),
            lat: Some(48.8606),
            lon: Some(2.3376),
            ..Attraction::default()
        }
    }

    fn places() -> Arc<OpenTripMapClient> {
        Arc::new(OpenTripMapClient::new(&OpenTripMapConfig::default()).unwrap())
    }

    fn order(items: Vec<Attraction>) -> ProviderOrder<dyn AttractionSource> {
        let source = Arc::new(FakeAttractions {
            id: ProviderId::TripAdvisor,
            items,
        }) as Arc<dyn AttractionSource>;
        ProviderOrder::new("attractions", vec![source])
    }

    /// An empty `primary` followed by `secondary` holding `items`
    fn fallback_order(
        primary: ProviderId,
        secondary: ProviderId,
        items: Vec<Attraction>,
    ) -> ProviderOrder<dyn AttractionSource> {
        let sources = vec![
            Arc::new(FakeAttractions {
                id: primary,
                items: vec![],
            }) as Arc<dyn AttractionSource>,
            Arc::new(FakeAttractions {
                id: secondary,
                items,
            }) as Arc<dyn AttractionSource>,
        ];
        ProviderOrder::new("attractions", sources)
    }

    fn described(length: usize) -> Attraction {
        Attraction {
            description: "d".repeat(length),
            ..attraction("Louvre", Some("https://img.example/louvre.jpg"))
        }
    }

    fn paris() -> AttractionQuery {
        AttractionQuery {
            location: Some("Paris".to_string()),
            ..AttractionQuery::default()
        }
    }

    #[tokio::test]
    async fn test_enrichment_only_for_missing_images() {
        let images = Arc::new(RecordingImages::default());
        let search = AttractionSearch::new(
            order(vec![]),
            order(vec![
                attraction("Louvre", None),
                attraction("Orsay", Some("https://img.example/orsay.jpg")),
                attraction("Broken", None),
            ]),
            Some(images.clone() as Arc<dyn ImageSource>),
            places(),
        );

        let outcome = search.search_enriched(&paris()).await.unwrap();
        let queries = images.queries.lock().unwrap().clone();
        assert_eq!(queries, vec!["Louvre Paris", "Broken Paris"]);
        assert!(outcome.items[0].image_url.is_some());
        assert_eq!(
            outcome.items[1].image_url.as_deref(),
            Some("https://img.example/orsay.jpg")
        );
        assert_eq!(outcome.items[2].image_url, None);
    }

    #[tokio::test]
    async fn test_coordinate_search_looks_images_up_by_name() {
        let images = Arc::new(RecordingImages::default());
        let search = AttractionSearch::new(
            order(vec![]),
            order(vec![attraction("Louvre", None)]),
            Some(images.clone() as Arc<dyn ImageSource>),
            places(),
        );
        let query = AttractionQuery {
            center: Some(GeoPoint::new(48.86, 2.33).unwrap()),
            ..AttractionQuery::default()
        };

        search.search_enriched(&query).await.unwrap();
        assert_eq!(*images.queries.lock().unwrap(), vec!["Louvre"]);
    }

    #[tokio::test]
    async fn test_plain_search_cuts_fallback_descriptions_short() {
        let search = AttractionSearch::new(
            fallback_order(ProviderId::OpenTripMap, ProviderId::TripAdvisor, vec![described(280)]),
            order(vec![]),
            None,
            places(),
        );
        let outcome = search.search(&paris()).await.unwrap();
        assert_eq!(outcome.served_by, Some(ProviderId::TripAdvisor));
        assert_eq!(outcome.items[0].description.chars().count(), SHORT_DESCRIPTION_CHARS);
    }

    #[tokio::test]
    async fn test_enriched_search_keeps_long_fallback_descriptions() {
        let search = AttractionSearch::new(
            order(vec![]),
            fallback_order(
                ProviderId::TripAdvisor,
                ProviderId::OpenTripMap,
                vec![described(280), described(450)],
            ),
            None,
            places(),
        );
        let outcome = search.search_enriched(&paris()).await.unwrap();
        assert_eq!(outcome.served_by, Some(ProviderId::OpenTripMap));
        assert_eq!(outcome.items[0].description.chars().count(), 280);
        assert_eq!(outcome.items[1].description.chars().count(), LONG_DESCRIPTION_CHARS);
    }

    #[tokio::test]
    async fn test_distance_filled_from_center() {
        let search = AttractionSearch::new(
            order(vec![attraction("Louvre", None)]),
            order(vec![]),
            None,
            places(),
        );
        let query = AttractionQuery {
            center: Some(GeoPoint::new(48.8584, 2.2945).unwrap()),
            ..AttractionQuery::default()
        };

        let outcome = search.search(&query).await.unwrap();
        let distance = outcome.items[0].distance;
        assert!((3_000.0..3_500.0).contains(&distance), "got {distance}");
    }

    #[tokio::test]
    async fn test_reported_distance_is_kept() {
        let mut item = attraction("Louvre", None);
        item.distance = 120.0;
        let search = AttractionSearch::new(order(vec![item]), order(vec![]), None, places());
        let query = AttractionQuery {
            center: Some(GeoPoint::new(48.8584, 2.2945).unwrap()),
            ..AttractionQuery::default()
        };

        let outcome = search.search(&query).await.unwrap();
        assert_eq!(outcome.items[0].distance, 120.0);
    }

    #[tokio::test]
    async fn test_identical_queries_identical_results() {
        let search = AttractionSearch::new(
            order(vec![attraction("Louvre", None), attraction("Orsay", None)]),
            order(vec![]),
            None,
            places(),
        );
        let first = search.search(&paris()).await.unwrap();
        let second = search.search(&paris()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_missing_location_is_rejected() {
        let search = AttractionSearch::new(order(vec![]), order(vec![]), None, places());
        let err = search.search(&AttractionQuery::default()).await.unwrap_err();
        assert_eq!(
            err,
            SearchError::Validation("Either location or lat/lon coordinates are required".to_string())
        );
    }

    #[tokio::test]
    async fn test_details_without_key() {
        let search = AttractionSearch::new(order(vec![]), order(vec![]), None, places());
        let err = search.details("W123").await.unwrap_err();
        assert_eq!(err, SearchError::NotConfigured(ProviderId::OpenTripMap));
    }
}
