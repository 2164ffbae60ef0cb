//! Deterministic cache key derivation for provider lookups.
//!
//! Keys cover the full query parameter set so two searches share a cache
//! entry exactly when the provider would see the same request. Coordinates
//! are rounded to 4 decimal places (~11 m) so GPS jitter around the same
//! spot reuses entries.

use std::time::Duration;

use crate::places::PlaceQuery;

/// TTL for cached search results.
pub const SEARCH_TTL: Duration = Duration::from_secs(60 * 60);

/// TTL for cached single-place detail lookups.
pub const DETAIL_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Returns the cache key for a place search query.
pub fn place_search_key(query: &PlaceQuery) -> String {
    let keyword = query
        .keyword
        .as_deref()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| "-".to_string());
    let min_price = query
        .min_price
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let max_price = query
        .max_price
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());
    let open = if query.open_now { "open" } else { "any" };

    format!(
        "places:search:{:.4}:{:.4}:{}:{}:{}:{}:{}",
        query.center.lat, query.center.lng, query.radius_m, keyword, min_price, max_price, open
    )
}

/// Returns the cache key for a single-place detail lookup.
pub fn place_detail_key(place_id: &str) -> String {
    format!("places:detail:{place_id}")
}
