//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use dinnersync_core::dining::{Attendee, DinnerGroup, Restaurant};
use dinnersync_core::storage::{
    AttendanceRepository, GroupRepository, RepositoryError, RestaurantRepository, Result,
};

/// In-memory storage backend.
///
/// The map key structure carries the membership invariants: groups are keyed by
/// restaurant id (one group per restaurant) and attendance by user id (one
/// membership per user), so both "create if absent" and "replace
/// membership" are single operations under one write lock.
#[derive(Debug, Clone)]
pub struct InMemoryRepository {
    restaurants: Arc<RwLock<HashMap<String, Restaurant>>>,
    groups: Arc<RwLock<HashMap<String, DinnerGroup>>>,
    attendance: Arc<RwLock<HashMap<Uuid, Attendee>>>,
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self {
            restaurants: Arc::new(RwLock::new(HashMap::new())),
            groups: Arc::new(RwLock::new(HashMap::new())),
            attendance: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRepository {
    async fn upsert_restaurant(&self, restaurant: &Restaurant) -> Result<()> {
        let mut restaurants = self.restaurants.write().await;
        restaurants.insert(restaurant.place_id.clone(), restaurant.clone());
        Ok(())
    }

    async fn get_restaurant(&self, place_id: &str) -> Result<Option<Restaurant>> {
        let restaurants = self.restaurants.read().await;
        Ok(restaurants.get(place_id).cloned())
    }
}

#[async_trait]
impl GroupRepository for InMemoryRepository {
    async fn get_group(&self, id: Uuid) -> Result<Option<DinnerGroup>> {
        let groups = self.groups.read().await;
        Ok(groups.values().find(|g| g.id == id).cloned())
    }

    async fn get_group_by_restaurant(&self, place_id: &str) -> Result<Option<DinnerGroup>> {
        let groups = self.groups.read().await;
        Ok(groups.get(place_id).cloned())
    }

    async fn get_groups_by_restaurants(&self, place_ids: &[String]) -> Result<Vec<DinnerGroup>> {
        let groups = self.groups.read().await;
        Ok(place_ids
            .iter()
            .filter_map(|id| groups.get(id).cloned())
            .collect())
    }

    async fn get_or_create_group(&self, place_id: &str) -> Result<DinnerGroup> {
        // Single write-lock section: concurrent callers for the same
        // restaurant observe exactly one group.
        let mut groups = self.groups.write().await;
        let group = groups
            .entry(place_id.to_string())
            .or_insert_with(|| DinnerGroup::new(place_id));
        Ok(group.clone())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryRepository {
    async fn set_membership(&self, user_id: Uuid, group_id: Uuid) -> Result<Attendee> {
        {
            let groups = self.groups.read().await;
            if !groups.values().any(|g| g.id == group_id) {
                return Err(RepositoryError::NotFound {
                    entity_type: "DinnerGroup",
                    id: group_id.to_string(),
                });
            }
        }

        let attendee = Attendee::new(user_id, group_id);
        let mut attendance = self.attendance.write().await;
        attendance.insert(user_id, attendee.clone());
        Ok(attendee)
    }

    async fn clear_membership(&self, user_id: Uuid) -> Result<bool> {
        let mut attendance = self.attendance.write().await;
        Ok(attendance.remove(&user_id).is_some())
    }

    async fn get_membership(&self, user_id: Uuid) -> Result<Option<Attendee>> {
        let attendance = self.attendance.read().await;
        Ok(attendance.get(&user_id).cloned())
    }

    async fn get_attendees(&self, group_id: Uuid) -> Result<Vec<Attendee>> {
        let attendance = self.attendance.read().await;
        let mut attendees: Vec<Attendee> = attendance
            .values()
            .filter(|a| a.group_id == group_id)
            .cloned()
            .collect();
        attendees.sort_by_key(|a| a.joined_at);
        Ok(attendees)
    }

    async fn count_attendees(&self, group_id: Uuid) -> Result<u64> {
        let attendance = self.attendance.read().await;
        Ok(attendance.values().filter(|a| a.group_id == group_id).count() as u64)
    }

    async fn count_attendees_for_groups(&self, group_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>> {
        let attendance = self.attendance.read().await;
        let mut counts = HashMap::new();
        for attendee in attendance.values() {
            if group_ids.contains(&attendee.group_id) {
                *counts.entry(attendee.group_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dinnersync_core::dining::Coordinates;

    fn restaurant(place_id: &str) -> Restaurant {
        Restaurant::new(place_id, format!("Restaurant {place_id}"), Coordinates::new(0.0, 0.0))
    }

    #[tokio::test]
    async fn test_upsert_restaurant_overwrites() {
        let repo = InMemoryRepository::new();
        repo.upsert_restaurant(&restaurant("p1")).await.unwrap();

        let updated = restaurant("p1").with_rating(4.9);
        repo.upsert_restaurant(&updated).await.unwrap();

        let stored = repo.get_restaurant("p1").await.unwrap().unwrap();
        assert_eq!(stored.rating, 4.9);
    }

    #[tokio::test]
    async fn test_get_or_create_group_is_stable() {
        let repo = InMemoryRepository::new();

        let first = repo.get_or_create_group("p1").await.unwrap();
        let second = repo.get_or_create_group("p1").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first.restaurant_id, "p1");
    }

    #[tokio::test]
    async fn test_get_or_create_group_per_restaurant() {
        let repo = InMemoryRepository::new();

        let a = repo.get_or_create_group("p1").await.unwrap();
        let b = repo.get_or_create_group("p2").await.unwrap();

        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_concurrent_get_or_create_yields_one_group() {
        let repo = Arc::new(InMemoryRepository::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.get_or_create_group("p1").await.unwrap().id })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_set_membership_replaces_previous() {
        let repo = InMemoryRepository::new();
        let user = Uuid::new_v4();
        let group_a = repo.get_or_create_group("p1").await.unwrap();
        let group_b = repo.get_or_create_group("p2").await.unwrap();

        repo.set_membership(user, group_a.id).await.unwrap();
        repo.set_membership(user, group_b.id).await.unwrap();

        assert_eq!(repo.count_attendees(group_a.id).await.unwrap(), 0);
        assert_eq!(repo.count_attendees(group_b.id).await.unwrap(), 1);

        let membership = repo.get_membership(user).await.unwrap().unwrap();
        assert_eq!(membership.group_id, group_b.id);
    }

    #[tokio::test]
    async fn test_set_membership_unknown_group_fails() {
        let repo = InMemoryRepository::new();

        let result = repo.set_membership(Uuid::new_v4(), Uuid::new_v4()).await;

        assert!(matches!(
            result,
            Err(RepositoryError::NotFound {
                entity_type: "DinnerGroup",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_clear_membership_reports_removal() {
        let repo = InMemoryRepository::new();
        let user = Uuid::new_v4();
        let group = repo.get_or_create_group("p1").await.unwrap();
        repo.set_membership(user, group.id).await.unwrap();

        assert!(repo.clear_membership(user).await.unwrap());
        assert!(!repo.clear_membership(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_roster_is_ordered_by_join_time() {
        let repo = InMemoryRepository::new();
        let group = repo.get_or_create_group("p1").await.unwrap();

        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        repo.set_membership(first, group.id).await.unwrap();
        repo.set_membership(second, group.id).await.unwrap();

        let roster = repo.get_attendees(group.id).await.unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster[0].joined_at <= roster[1].joined_at);
    }

    #[tokio::test]
    async fn test_count_for_groups_skips_empty() {
        let repo = InMemoryRepository::new();
        let group_a = repo.get_or_create_group("p1").await.unwrap();
        let group_b = repo.get_or_create_group("p2").await.unwrap();
        repo.set_membership(Uuid::new_v4(), group_a.id).await.unwrap();

        let counts = repo
            .count_attendees_for_groups(&[group_a.id, group_b.id])
            .await
            .unwrap();

        assert_eq!(counts.get(&group_a.id), Some(&1));
        assert_eq!(counts.get(&group_b.id), None);
    }
}
