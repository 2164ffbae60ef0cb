//! Cached place-search decorator.
//!
//! Wraps a `PlaceSearch` implementation with the cache-aside pattern:
//! reads check the cache first and populate it on a miss. Cache failures
//! never fail the request; the provider is the source of truth.
//!
//! Search results and detail lookups use separate TTLs: search pages go
//! stale with foot traffic, detail records barely change.

use std::sync::Arc;

use async_trait::async_trait;

use dinnersync_core::cache::{
    deserialize_place, deserialize_places, place_detail_key, place_search_key, serialize_place,
    serialize_places, Cache, DETAIL_TTL, SEARCH_TTL,
};
use dinnersync_core::places::{PlaceQuery, PlaceSearch, ProviderPlace, Result};

/// Cache-aside decorator over a place provider.
pub struct CachedPlaceSearch {
    provider: Arc<dyn PlaceSearch>,
    cache: Arc<dyn Cache>,
}

impl CachedPlaceSearch {
    /// Creates a new cached provider.
    pub fn new(provider: Arc<dyn PlaceSearch>, cache: Arc<dyn Cache>) -> Self {
        Self { provider, cache }
    }
}

#[async_trait]
impl PlaceSearch for CachedPlaceSearch {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<ProviderPlace>> {
        let cache_key = place_search_key(query);

        // Check cache first
        if let Ok(Some(bytes)) = self.cache.get(&cache_key).await {
            if let Ok(places) = deserialize_places(&bytes) {
                tracing::trace!(key = %cache_key, count = places.len(), "Cache hit for place search");
                return Ok(places);
            }
            // Deserialization failed - treat as cache miss
            tracing::warn!(key = %cache_key, "Cached search page failed to deserialize");
        }

        // Cache miss - ask the provider
        tracing::trace!(key = %cache_key, "Cache miss for place search");
        let places = self.provider.search(query).await?;

        if let Ok(bytes) = serialize_places(&places) {
            if let Err(err) = self.cache.set(&cache_key, &bytes, Some(SEARCH_TTL)).await {
                tracing::warn!(key = %cache_key, error = %err, "Failed to cache search page");
            }
        }

        Ok(places)
    }

    async fn details(&self, place_id: &str) -> Result<Option<ProviderPlace>> {
        let cache_key = place_detail_key(place_id);

        if let Ok(Some(bytes)) = self.cache.get(&cache_key).await {
            if let Ok(place) = deserialize_place(&bytes) {
                tracing::trace!(%place_id, "Cache hit for place detail");
                return Ok(Some(place));
            }
            tracing::warn!(%place_id, "Cached place detail failed to deserialize");
        }

        tracing::trace!(%place_id, "Cache miss for place detail");
        let place = self.provider.details(place_id).await?;

        // Only positive lookups are cached; a provider miss stays a miss.
        if let Some(ref p) = place {
            if let Ok(bytes) = serialize_place(p) {
                if let Err(err) = self.cache.set(&cache_key, &bytes, Some(DETAIL_TTL)).await {
                    tracing::warn!(%place_id, error = %err, "Failed to cache place detail");
                }
            }
        }

        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use dinnersync_core::dining::Coordinates;
    use dinnersync_core::places::ProviderGeometry;

    use crate::cache::MemoryCache;

    /// Provider that counts calls, for asserting cache behavior.
    struct CountingProvider {
        searches: AtomicUsize,
        details: AtomicUsize,
        place: ProviderPlace,
    }

    impl CountingProvider {
        fn new() -> Self {
            Self {
                searches: AtomicUsize::new(0),
                details: AtomicUsize::new(0),
                place: ProviderPlace {
                    place_id: Some("place-1".to_string()),
                    name: "Counting Cafe".to_string(),
                    vicinity: Some("1 Main St".to_string()),
                    types: vec!["restaurant".to_string()],
                    price_level: Some(2),
                    rating: Some(4.0),
                    geometry: Some(ProviderGeometry { lat: 1.0, lng: 2.0 }),
                    photo_url: None,
                    website: None,
                    maps_url: None,
                },
            }
        }
    }

    #[async_trait]
    impl PlaceSearch for CountingProvider {
        async fn search(&self, _query: &PlaceQuery) -> Result<Vec<ProviderPlace>> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![self.place.clone()])
        }

        async fn details(&self, place_id: &str) -> Result<Option<ProviderPlace>> {
            self.details.fetch_add(1, Ordering::SeqCst);
            if place_id == "place-1" {
                Ok(Some(self.place.clone()))
            } else {
                Ok(None)
            }
        }
    }

    fn setup() -> (Arc<CountingProvider>, CachedPlaceSearch) {
        let provider = Arc::new(CountingProvider::new());
        let cache = Arc::new(MemoryCache::new(100));
        let cached = CachedPlaceSearch::new(provider.clone(), cache);
        (provider, cached)
    }

    #[tokio::test]
    async fn test_repeat_search_hits_cache() {
        let (provider, cached) = setup();
        let query = PlaceQuery::new(Coordinates::new(40.758, -73.9855));

        let first = cached.search(&query).await.unwrap();
        let second = cached.search(&query).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.searches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_queries_miss_separately() {
        let (provider, cached) = setup();
        let near = PlaceQuery::new(Coordinates::new(40.758, -73.9855));
        let far = PlaceQuery::new(Coordinates::new(37.7843, -122.401));

        cached.search(&near).await.unwrap();
        cached.search(&far).await.unwrap();

        assert_eq!(provider.searches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_repeat_details_hits_cache() {
        let (provider, cached) = setup();

        let first = cached.details("place-1").await.unwrap();
        let second = cached.details("place-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.details.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_negative_details_are_not_cached() {
        let (provider, cached) = setup();

        assert!(cached.details("missing").await.unwrap().is_none());
        assert!(cached.details("missing").await.unwrap().is_none());

        // Both lookups went to the provider.
        assert_eq!(provider.details.load(Ordering::SeqCst), 2);
    }
}
