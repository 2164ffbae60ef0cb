use async_trait::async_trait;

use super::{PlaceQuery, ProviderPlace, Result};

/// The external place-search collaborator.
///
/// Implementations return raw provider shapes; callers run them through
/// [`super::normalize_places`] before anything else sees them.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    /// Searches for candidate places around the query center.
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<ProviderPlace>>;

    /// Looks up a single place by its external identifier.
    async fn details(&self, place_id: &str) -> Result<Option<ProviderPlace>>;
}
