//! Dinner-group membership workflows.
//!
//! `MembershipService` owns the join/leave/view flows that span the
//! restaurant, group, and attendance repositories plus the place provider.
//! The hard invariants (one group per restaurant, one membership per user)
//! live in the storage layer; this service sequences the lookups around
//! them and keeps restaurants persisted before any group references them.

use std::sync::Arc;

use uuid::Uuid;

use dinnersync_core::dining::{GroupView, Restaurant, EPHEMERAL_ID_PREFIX};
use dinnersync_core::places::{normalize_place, PlaceSearch, PlacesError};
use dinnersync_core::storage::{
    AttendanceRepository, GroupRepository, RepositoryError, RestaurantRepository, Result,
};

/// Coordinates membership changes across repositories and the place provider.
#[derive(Clone)]
pub struct MembershipService {
    restaurants: Arc<dyn RestaurantRepository>,
    groups: Arc<dyn GroupRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    places: Arc<dyn PlaceSearch>,
}

impl MembershipService {
    pub fn new(
        restaurants: Arc<dyn RestaurantRepository>,
        groups: Arc<dyn GroupRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        places: Arc<dyn PlaceSearch>,
    ) -> Self {
        Self {
            restaurants,
            groups,
            attendance,
            places,
        }
    }

    /// Joins the user to the dinner group at the given restaurant.
    ///
    /// Creates the group lazily if it does not exist yet, and replaces any
    /// membership the user holds elsewhere. Returns the resulting group view.
    pub async fn join(&self, user_id: Uuid, place_id: &str) -> Result<GroupView> {
        if place_id.is_empty() || place_id.starts_with(EPHEMERAL_ID_PREFIX) {
            return Err(RepositoryError::InvalidData(format!(
                "Place id '{place_id}' is not a stable provider id"
            )));
        }

        let restaurant = self.resolve_restaurant(place_id).await?;
        let group = self.groups.get_or_create_group(place_id).await?;

        let attendee = self.attendance.set_membership(user_id, group.id).await?;
        tracing::info!(
            %user_id,
            group_id = %group.id,
            %place_id,
            "User joined dinner group"
        );
        debug_assert_eq!(attendee.group_id, group.id);

        let roster = self.attendance.get_attendees(group.id).await?;
        Ok(GroupView::new(group, restaurant, roster))
    }

    /// Removes the user's membership, wherever it is.
    ///
    /// Returns `true` if a membership existed, `false` if the user was not
    /// attending anything. Empty groups are left in place for reuse.
    pub async fn leave(&self, user_id: Uuid) -> Result<bool> {
        let removed = self.attendance.clear_membership(user_id).await?;
        if removed {
            tracing::info!(%user_id, "User left their dinner group");
        }
        Ok(removed)
    }

    /// The group view for the user's current membership, if any.
    pub async fn current_view(&self, user_id: Uuid) -> Result<Option<GroupView>> {
        let Some(membership) = self.attendance.get_membership(user_id).await? else {
            return Ok(None);
        };

        let view = self.load_view(membership.group_id).await?.ok_or_else(|| {
            RepositoryError::QueryFailed(format!(
                "Membership for user {user_id} references missing group {}",
                membership.group_id
            ))
        })?;
        Ok(Some(view))
    }

    /// The group view for a specific group id.
    pub async fn group_view(&self, group_id: Uuid) -> Result<Option<GroupView>> {
        self.load_view(group_id).await
    }

    /// The attendee count for a group; NotFound when the group is unknown.
    pub async fn attendee_count(&self, group_id: Uuid) -> Result<u64> {
        if self.groups.get_group(group_id).await?.is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "DinnerGroup",
                id: group_id.to_string(),
            });
        }
        self.attendance.count_attendees(group_id).await
    }

    /// Fetches a persisted restaurant, falling back to a provider detail
    /// lookup (and persisting the result) for place ids first seen here.
    async fn resolve_restaurant(&self, place_id: &str) -> Result<Restaurant> {
        if let Some(restaurant) = self.restaurants.get_restaurant(place_id).await? {
            return Ok(restaurant);
        }

        let raw = self
            .places
            .details(place_id)
            .await
            .map_err(map_places_error)?;
        let restaurant = raw.and_then(normalize_place).ok_or_else(|| {
            RepositoryError::NotFound {
                entity_type: "Restaurant",
                id: place_id.to_string(),
            }
        })?;

        // Detail lookups should carry a stable id, but the normalizer can
        // still mint an ephemeral one from a degenerate payload.
        if restaurant.is_ephemeral() {
            return Err(RepositoryError::NotFound {
                entity_type: "Restaurant",
                id: place_id.to_string(),
            });
        }

        self.restaurants.upsert_restaurant(&restaurant).await?;
        tracing::debug!(%place_id, "Persisted restaurant from provider detail lookup");
        Ok(restaurant)
    }

    async fn load_view(&self, group_id: Uuid) -> Result<Option<GroupView>> {
        let Some(group) = self.groups.get_group(group_id).await? else {
            return Ok(None);
        };

        let restaurant = self
            .restaurants
            .get_restaurant(&group.restaurant_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::QueryFailed(format!(
                    "Group {group_id} references missing restaurant {}",
                    group.restaurant_id
                ))
            })?;

        let roster = self.attendance.get_attendees(group_id).await?;
        Ok(Some(GroupView::new(group, restaurant, roster)))
    }
}

/// Maps provider failures into the repository error space the handlers
/// already translate to status codes.
fn map_places_error(err: PlacesError) -> RepositoryError {
    match err {
        PlacesError::Http(msg) => RepositoryError::ConnectionFailed(msg),
        PlacesError::Decode(msg) => RepositoryError::QueryFailed(msg),
        PlacesError::Provider { status, message } => {
            RepositoryError::QueryFailed(format!("{status}: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dinnersync_core::dining::{Coordinates, PriceTier};

    use crate::places::MockPlaces;
    use crate::storage::inmemory::InMemoryRepository;

    fn service() -> MembershipService {
        let repo = Arc::new(InMemoryRepository::new());
        MembershipService::new(
            repo.clone(),
            repo.clone(),
            repo,
            Arc::new(MockPlaces::conference_demo()),
        )
    }

    /// Service over repositories pre-seeded with one restaurant.
    async fn seeded_service(place_id: &str) -> MembershipService {
        let svc = service();
        let restaurant =
            Restaurant::new(place_id, "Seeded Bistro", Coordinates::new(37.785, -122.4))
                .with_address("1 Seed St")
                .with_cuisine("bistro")
                .with_price_tier(PriceTier::Moderate)
                .with_rating(4.1);
        svc.restaurants.upsert_restaurant(&restaurant).await.unwrap();
        svc
    }

    #[tokio::test]
    async fn test_join_creates_group_lazily() {
        let svc = seeded_service("place-1").await;
        let user = Uuid::new_v4();

        assert!(svc
            .groups
            .get_group_by_restaurant("place-1")
            .await
            .unwrap()
            .is_none());

        let view = svc.join(user, "place-1").await.unwrap();
        assert_eq!(view.group.restaurant_id, "place-1");
        assert_eq!(view.attendee_count, 1);
        assert_eq!(view.attendees[0].user_id, user);
    }

    #[tokio::test]
    async fn test_two_users_share_one_group() {
        let svc = seeded_service("place-1").await;

        let first = svc.join(Uuid::new_v4(), "place-1").await.unwrap();
        let second = svc.join(Uuid::new_v4(), "place-1").await.unwrap();

        assert_eq!(first.group.id, second.group.id);
        assert_eq!(second.attendee_count, 2);
    }

    #[tokio::test]
    async fn test_rejoining_same_restaurant_is_idempotent() {
        let svc = seeded_service("place-1").await;
        let user = Uuid::new_v4();

        svc.join(user, "place-1").await.unwrap();
        let view = svc.join(user, "place-1").await.unwrap();

        assert_eq!(view.attendee_count, 1);
    }

    #[tokio::test]
    async fn test_switching_restaurants_moves_membership() {
        let svc = seeded_service("place-1").await;
        let second =
            Restaurant::new("place-2", "Second Stop", Coordinates::new(37.786, -122.401));
        svc.restaurants.upsert_restaurant(&second).await.unwrap();
        let user = Uuid::new_v4();

        let old_view = svc.join(user, "place-1").await.unwrap();
        let new_view = svc.join(user, "place-2").await.unwrap();

        assert_eq!(new_view.attendee_count, 1);
        assert_eq!(
            svc.attendance.count_attendees(old_view.group.id).await.unwrap(),
            0
        );
        let current = svc.current_view(user).await.unwrap().unwrap();
        assert_eq!(current.group.id, new_view.group.id);
    }

    #[tokio::test]
    async fn test_leave_then_leave_again() {
        let svc = seeded_service("place-1").await;
        let user = Uuid::new_v4();
        svc.join(user, "place-1").await.unwrap();

        assert!(svc.leave(user).await.unwrap());
        assert!(!svc.leave(user).await.unwrap());
        assert!(svc.current_view(user).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_emptied_group_is_reused_on_next_join() {
        let svc = seeded_service("place-1").await;
        let user = Uuid::new_v4();

        let first = svc.join(user, "place-1").await.unwrap();
        svc.leave(user).await.unwrap();

        let second = svc.join(Uuid::new_v4(), "place-1").await.unwrap();
        assert_eq!(first.group.id, second.group.id);
    }

    #[tokio::test]
    async fn test_join_fetches_unseen_restaurant_from_provider() {
        // Not seeded: "demo-ramen" only exists in the mock provider catalog.
        let svc = service();
        let user = Uuid::new_v4();

        let view = svc.join(user, "demo-ramen").await.unwrap();
        assert_eq!(view.restaurant.name, "Kinka Ramen");

        // The restaurant is now persisted.
        assert!(svc
            .restaurants
            .get_restaurant("demo-ramen")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_join_unknown_place_is_not_found() {
        let svc = service();
        let result = svc.join(Uuid::new_v4(), "no-such-place").await;

        assert!(matches!(
            result,
            Err(RepositoryError::NotFound {
                entity_type: "Restaurant",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_join_ephemeral_id_is_rejected() {
        let svc = service();
        let result = svc.join(Uuid::new_v4(), "tmp:no-name:37.7850:-122.4000").await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_attendee_count_distinguishes_empty_from_missing() {
        let svc = seeded_service("place-1").await;
        let view = svc.join(Uuid::new_v4(), "place-1").await.unwrap();

        assert_eq!(svc.attendee_count(view.group.id).await.unwrap(), 1);
        assert!(matches!(
            svc.attendee_count(Uuid::new_v4()).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_group_view_missing_group_is_none() {
        let svc = service();
        assert!(svc.group_view(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_group_view_includes_full_roster() {
        let svc = seeded_service("place-1").await;
        let view = svc.join(Uuid::new_v4(), "place-1").await.unwrap();
        svc.join(Uuid::new_v4(), "place-1").await.unwrap();

        let loaded = svc.group_view(view.group.id).await.unwrap().unwrap();
        assert_eq!(loaded.attendee_count, 2);
        assert_eq!(loaded.attendees.len(), 2);
        assert_eq!(loaded.restaurant.place_id, "place-1");
    }
}
