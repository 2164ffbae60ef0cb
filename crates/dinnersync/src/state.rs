//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It uses repository trait objects for storage
//! abstraction and selects the backend at compile time via feature flags.

use std::sync::Arc;

use dinnersync_core::cache::Cache;
use dinnersync_core::places::PlaceSearch;
use dinnersync_core::storage::{AttendanceRepository, GroupRepository, RestaurantRepository};

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::places::CachedPlaceSearch;
use crate::services::MembershipService;

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'sqlite'");

/// Shared application state.
///
/// Cloned for each request handler; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    /// Place provider behind the read-through TTL cache.
    pub places: Arc<dyn PlaceSearch>,
    pub membership: MembershipService,
}

impl AppState {
    /// Creates the state from explicit backends.
    pub fn new(
        restaurants: Arc<dyn RestaurantRepository>,
        groups: Arc<dyn GroupRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        places: Arc<dyn PlaceSearch>,
    ) -> Self {
        let membership = MembershipService::new(
            restaurants.clone(),
            groups.clone(),
            attendance.clone(),
            places.clone(),
        );
        Self {
            restaurants,
            groups,
            attendance,
            places,
            membership,
        }
    }

    /// Creates the state from configuration, wiring the feature-selected
    /// storage backend, the in-memory TTL cache, and the place provider
    /// (mock unless an API key is configured).
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new(config.cache_max_entries));
        let provider = crate::places::provider_from_config(config)?;
        let places: Arc<dyn PlaceSearch> = Arc::new(CachedPlaceSearch::new(provider, cache));

        #[cfg(feature = "inmemory")]
        {
            let repo = Arc::new(crate::storage::inmemory::InMemoryRepository::new());
            Ok(Self::new(repo.clone(), repo.clone(), repo, places))
        }

        #[cfg(feature = "sqlite")]
        {
            let repo =
                Arc::new(crate::storage::sqlite::SqliteRepository::new(&config.sqlite_path).await?);
            Ok(Self::new(repo.clone(), repo.clone(), repo, places))
        }
    }
}

#[cfg(all(test, feature = "inmemory"))]
impl AppState {
    /// Test state: in-memory storage, mock provider, no cache layer.
    pub fn for_tests() -> Self {
        let repo = Arc::new(crate::storage::inmemory::InMemoryRepository::new());
        Self::new(
            repo.clone(),
            repo.clone(),
            repo,
            Arc::new(crate::places::MockPlaces::conference_demo()),
        )
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_from_config_builds_inmemory_state() {
        let config = Config {
            cache_max_entries: 16,
            sqlite_path: "unused.db".to_string(),
            places_api_key: None,
            places_base_url: "http://localhost".to_string(),
            places_timeout_seconds: 1,
        };

        let state = AppState::from_config(&config).await.unwrap();

        assert!(state
            .restaurants
            .get_restaurant("missing")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_state_clones_share_storage() {
        let state = AppState::for_tests();
        let clone = state.clone();

        let restaurant = dinnersync_core::dining::Restaurant::new(
            "place-1",
            "Shared",
            dinnersync_core::dining::Coordinates::new(0.0, 0.0),
        );
        state.restaurants.upsert_restaurant(&restaurant).await.unwrap();

        let seen = clone.restaurants.get_restaurant("place-1").await.unwrap();
        assert_eq!(seen.map(|r| r.name), Some("Shared".to_string()));
    }
}
