//! Place-search provider implementations.
//!
//! Concrete implementations of the `PlaceSearch` trait from
//! `dinnersync_core::places`:
//!
//! - [`GooglePlaces`]: HTTP client for the Google Places web service
//! - [`CachedPlaceSearch`]: cache-aside decorator for any provider
//! - [`MockPlaces`]: deterministic in-process provider for local runs and tests
//!
//! The raw provider responses are cached and returned as-is; normalization
//! into domain restaurants happens in the core crate, after the cache.

mod cached;
mod google;
mod mock;

use std::sync::Arc;

use dinnersync_core::places::PlaceSearch;

use crate::config::Config;

pub use cached::CachedPlaceSearch;
pub use google::GooglePlaces;
pub use mock::MockPlaces;

/// Builds the place provider selected by configuration.
///
/// With an API key configured this talks to the real Google Places service;
/// without one it falls back to the deterministic mock so the server stays
/// usable in local development.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn PlaceSearch>> {
    match &config.places_api_key {
        Some(api_key) => {
            tracing::info!(base_url = %config.places_base_url, "Using Google Places provider");
            let provider = GooglePlaces::new(
                api_key.clone(),
                config.places_base_url.clone(),
                std::time::Duration::from_secs(config.places_timeout_seconds),
            )?;
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!("PLACES_API_KEY not set, using built-in demo places");
            Ok(Arc::new(MockPlaces::conference_demo()))
        }
    }
}
