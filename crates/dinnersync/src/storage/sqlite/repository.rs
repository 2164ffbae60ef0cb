//! SQLite repository implementation.
//!
//! Implements the repository traits from `dinnersync_core::storage` using SQLite.
//! The membership invariants live in the schema: groups carry a UNIQUE
//! restaurant_id, attendees key on user_id, so the write paths are single
//! conflict-handling statements with no read-modify-write races.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use dinnersync_core::dining::{Attendee, DinnerGroup, Restaurant};
use dinnersync_core::storage::{
    AttendanceRepository, GroupRepository, RepositoryError, RestaurantRepository, Result,
};

use super::conversions::{format_datetime, row_to_attendee, row_to_group, row_to_restaurant};
use super::error::map_sqlite_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")
                .map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// RestaurantRepository implementation
// ============================================================================

#[async_trait]
impl RestaurantRepository for SqliteRepository {
    async fn upsert_restaurant(&self, restaurant: &Restaurant) -> Result<()> {
        let place_id = restaurant.place_id.clone();
        let name = restaurant.name.clone();
        let address = restaurant.address.clone();
        let cuisine = restaurant.cuisine.clone();
        let price_tier = restaurant.price_tier.level();
        let rating = restaurant.rating;
        let lat = restaurant.location.lat;
        let lng = restaurant.location.lng;
        let photo_url = restaurant.photo_url.clone();
        let maps_url = restaurant.maps_url.clone();
        let website = restaurant.website.clone();
        let updated_at = format_datetime(&chrono::Utc::now());
        let entity_id = restaurant.place_id.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_RESTAURANT,
                    rusqlite::params![
                        place_id, name, address, cuisine, price_tier, rating, lat, lng, photo_url,
                        maps_url, website, updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Restaurant", Some(entity_id.as_str())))
    }

    async fn get_restaurant(&self, place_id: &str) -> Result<Option<Restaurant>> {
        let id_str = place_id.to_string();
        let entity_id = place_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RESTAURANT_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_restaurant) {
                    Ok(restaurant) => Ok(Some(restaurant)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Restaurant", Some(entity_id.as_str())))
    }
}

// ============================================================================
// GroupRepository implementation
// ============================================================================

#[async_trait]
impl GroupRepository for SqliteRepository {
    async fn get_group(&self, id: Uuid) -> Result<Option<DinnerGroup>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_GROUP_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_group) {
                    Ok(group) => Ok(Some(group)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_sqlite_error(e, "DinnerGroup", Some(id.to_string().as_str())))
    }

    async fn get_group_by_restaurant(&self, place_id: &str) -> Result<Option<DinnerGroup>> {
        let place_id_str = place_id.to_string();
        let entity_id = place_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_GROUP_BY_RESTAURANT)
                    .map_err(wrap_err)?;
                match stmt.query_row([&place_id_str], row_to_group) {
                    Ok(group) => Ok(Some(group)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_sqlite_error(e, "DinnerGroup", Some(entity_id.as_str())))
    }

    async fn get_groups_by_restaurants(&self, place_ids: &[String]) -> Result<Vec<DinnerGroup>> {
        if place_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = place_ids.to_vec();

        self.conn
            .call(move |conn| {
                // Dynamic IN-clause; placeholder count matches the id list.
                let placeholders = vec!["?"; ids.len()].join(", ");
                let sql = format!(
                    "SELECT id, restaurant_id, note, created_at FROM groups \
                     WHERE restaurant_id IN ({placeholders})"
                );
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(ids.iter()), row_to_group)
                    .map_err(wrap_err)?;

                let mut groups = Vec::new();
                for row_result in rows {
                    groups.push(row_result.map_err(wrap_err)?);
                }
                Ok(groups)
            })
            .await
            .map_err(|e| map_sqlite_error(e, "DinnerGroup", None))
    }

    async fn get_or_create_group(&self, place_id: &str) -> Result<DinnerGroup> {
        let candidate = DinnerGroup::new(place_id);
        let id = candidate.id.to_string();
        let restaurant_id = candidate.restaurant_id.clone();
        let note = candidate.note.clone();
        let created_at = format_datetime(&candidate.created_at);
        let entity_id = place_id.to_string();

        // Insert-if-absent then read back. The UNIQUE constraint on
        // restaurant_id makes concurrent callers converge on one row.
        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_GROUP_IF_ABSENT,
                    rusqlite::params![id, restaurant_id, note, created_at],
                )
                .map_err(wrap_err)?;

                let mut stmt = conn
                    .prepare(schema::SELECT_GROUP_BY_RESTAURANT)
                    .map_err(wrap_err)?;
                stmt.query_row([&restaurant_id], row_to_group)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_sqlite_error(e, "DinnerGroup", Some(entity_id.as_str())))
    }
}

// ============================================================================
// AttendanceRepository implementation
// ============================================================================

#[async_trait]
impl AttendanceRepository for SqliteRepository {
    async fn set_membership(&self, user_id: Uuid, group_id: Uuid) -> Result<Attendee> {
        let attendee = Attendee::new(user_id, group_id);
        let user_id_str = attendee.user_id.to_string();
        let id_str = attendee.id.to_string();
        let group_id_str = attendee.group_id.to_string();
        let joined_at = format_datetime(&attendee.joined_at);
        let entity_id = group_id.to_string();

        self.conn
            .call(move |conn| {
                // The target group must exist before upserting the membership;
                // this turns a dangling group id into NotFound instead of a
                // foreign-key failure.
                let mut stmt = conn.prepare(schema::SELECT_GROUP_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([&group_id_str], row_to_group) {
                    Ok(_) => {}
                    Err(e) => return Err(wrap_err(e)),
                }

                conn.execute(
                    schema::UPSERT_ATTENDEE,
                    rusqlite::params![user_id_str, id_str, group_id_str, joined_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_sqlite_error(e, "DinnerGroup", Some(entity_id.as_str())))?;

        Ok(attendee)
    }

    async fn clear_membership(&self, user_id: Uuid) -> Result<bool> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_ATTENDEE_BY_USER, [&user_id_str])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Attendee", None))
    }

    async fn get_membership(&self, user_id: Uuid) -> Result<Option<Attendee>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ATTENDEE_BY_USER)
                    .map_err(wrap_err)?;
                match stmt.query_row([&user_id_str], row_to_attendee) {
                    Ok(attendee) => Ok(Some(attendee)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Attendee", None))
    }

    async fn get_attendees(&self, group_id: Uuid) -> Result<Vec<Attendee>> {
        let group_id_str = group_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ATTENDEES_BY_GROUP)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&group_id_str], row_to_attendee)
                    .map_err(wrap_err)?;

                let mut attendees = Vec::new();
                for row_result in rows {
                    attendees.push(row_result.map_err(wrap_err)?);
                }
                Ok(attendees)
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Attendee", None))
    }

    async fn count_attendees(&self, group_id: Uuid) -> Result<u64> {
        let group_id_str = group_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::COUNT_ATTENDEES_BY_GROUP)
                    .map_err(wrap_err)?;
                let count: i64 = stmt
                    .query_row([&group_id_str], |row| row.get(0))
                    .map_err(wrap_err)?;
                Ok(count as u64)
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Attendee", None))
    }

    async fn count_attendees_for_groups(&self, group_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>> {
        if group_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let ids: Vec<String> = group_ids.iter().map(|id| id.to_string()).collect();

        self.conn
            .call(move |conn| {
                let placeholders = vec!["?"; ids.len()].join(", ");
                let sql = format!(
                    "SELECT group_id, COUNT(*) FROM attendees \
                     WHERE group_id IN ({placeholders}) GROUP BY group_id"
                );
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(ids.iter()), |row| {
                        let group_id: String = row.get(0)?;
                        let count: i64 = row.get(1)?;
                        Ok((group_id, count))
                    })
                    .map_err(wrap_err)?;

                let mut counts = HashMap::new();
                for row_result in rows {
                    let (group_id_str, count) = row_result.map_err(wrap_err)?;
                    let group_id = Uuid::parse_str(&group_id_str).map_err(|e| {
                        wrap_err(rusqlite::Error::FromSqlConversionFailure(
                            0,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        ))
                    })?;
                    counts.insert(group_id, count as u64);
                }
                Ok(counts)
            })
            .await
            .map_err(|e| map_sqlite_error(e, "Attendee", None))
    }
}
