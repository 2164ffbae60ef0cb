use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use crate::dining::{Attendee, DinnerGroup, Restaurant};

use super::Result;

/// Repository for restaurant records sourced from the place provider.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Creates or refreshes a restaurant, keyed by its external place id.
    async fn upsert_restaurant(&self, restaurant: &Restaurant) -> Result<()>;

    /// Gets a restaurant by its external place id.
    async fn get_restaurant(&self, place_id: &str) -> Result<Option<Restaurant>>;
}

/// Repository for dinner groups (one per restaurant, created lazily).
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Gets a group by its ID.
    async fn get_group(&self, id: Uuid) -> Result<Option<DinnerGroup>>;

    /// Gets the group for a restaurant, if one has been created.
    async fn get_group_by_restaurant(&self, place_id: &str) -> Result<Option<DinnerGroup>>;

    /// Gets the groups for a set of restaurants.
    async fn get_groups_by_restaurants(&self, place_ids: &[String]) -> Result<Vec<DinnerGroup>>;

    /// Gets the group for a restaurant, creating it if absent.
    ///
    /// Implementations must make this atomic under concurrent calls for the
    /// same restaurant (uniqueness is enforced at the storage layer, not by
    /// read-then-write in callers): exactly one group per restaurant ever
    /// exists, and concurrent callers receive that same group.
    async fn get_or_create_group(&self, place_id: &str) -> Result<DinnerGroup>;
}

/// Repository for attendance rows, keyed by user.
///
/// A user holds at most one row at any time; the key structure carries the
/// invariant so no service-level delete-then-insert is needed.
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Writes the user's membership, replacing any previous one.
    ///
    /// Implementations must make the replacement a single atomic write:
    /// concurrent joins by the same user leave exactly one row. Fails with
    /// `NotFound` when the group does not exist.
    async fn set_membership(&self, user_id: Uuid, group_id: Uuid) -> Result<Attendee>;

    /// Removes the user's membership. Returns whether a row was removed.
    async fn clear_membership(&self, user_id: Uuid) -> Result<bool>;

    /// Gets the user's membership, if any.
    async fn get_membership(&self, user_id: Uuid) -> Result<Option<Attendee>>;

    /// Gets the full roster for a group.
    async fn get_attendees(&self, group_id: Uuid) -> Result<Vec<Attendee>>;

    /// Counts attendance rows for a group.
    async fn count_attendees(&self, group_id: Uuid) -> Result<u64>;

    /// Counts attendance rows for a set of groups. Groups with no
    /// attendees may be absent from the result map.
    async fn count_attendees_for_groups(&self, group_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>>;
}
