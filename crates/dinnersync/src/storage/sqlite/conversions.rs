//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use chrono::{DateTime, Utc};
use dinnersync_core::dining::{Attendee, Coordinates, DinnerGroup, PriceTier, Restaurant};
use rusqlite::Row;
use uuid::Uuid;

/// Convert a SQLite row to a Restaurant.
///
/// Expected columns: place_id, name, address, cuisine, price_tier, rating,
/// lat, lng, photo_url, maps_url, website
pub fn row_to_restaurant(row: &Row) -> rusqlite::Result<Restaurant> {
    let place_id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let address: String = row.get(2)?;
    let cuisine: String = row.get(3)?;
    let price_tier: u8 = row.get(4)?;
    let rating: f64 = row.get(5)?;
    let lat: f64 = row.get(6)?;
    let lng: f64 = row.get(7)?;
    let photo_url: Option<String> = row.get(8)?;
    let maps_url: Option<String> = row.get(9)?;
    let website: Option<String> = row.get(10)?;

    Ok(Restaurant {
        place_id,
        name,
        address,
        cuisine,
        price_tier: PriceTier::from_level(price_tier),
        rating,
        location: Coordinates::new(lat, lng),
        photo_url,
        maps_url,
        website,
    })
}

/// Convert a SQLite row to a DinnerGroup.
///
/// Expected columns: id, restaurant_id, note, created_at
pub fn row_to_group(row: &Row) -> rusqlite::Result<DinnerGroup> {
    let id: String = row.get(0)?;
    let restaurant_id: String = row.get(1)?;
    let note: Option<String> = row.get(2)?;
    let created_at: String = row.get(3)?;

    Ok(DinnerGroup {
        id: parse_uuid(&id)?,
        restaurant_id,
        note,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Convert a SQLite row to an Attendee.
///
/// Expected columns: id, user_id, group_id, joined_at
pub fn row_to_attendee(row: &Row) -> rusqlite::Result<Attendee> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let group_id: String = row.get(2)?;
    let joined_at: String = row.get(3)?;

    Ok(Attendee {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        group_id: parse_uuid(&group_id)?,
        joined_at: parse_datetime(&joined_at)?,
    })
}

/// Format a datetime for storage (RFC 3339).
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_round_trip() {
        let now = Utc::now();
        let formatted = format_datetime(&now);
        let parsed = parse_datetime(&formatted).unwrap();
        assert_eq!(parsed, now);
    }

    #[test]
    fn test_parse_datetime_rejects_garbage() {
        assert!(parse_datetime("yesterday-ish").is_err());
    }

    #[test]
    fn test_parse_uuid_rejects_garbage() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }
}
