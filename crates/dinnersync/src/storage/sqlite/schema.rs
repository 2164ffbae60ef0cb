//! SQLite schema definitions and SQL query constants.
//!
//! All SQL used by the SQLite repository lives here as pure data. The
//! constraint structure carries the membership invariants: `groups.restaurant_id`
//! is UNIQUE (one group per restaurant) and `attendees.user_id` is the
//! primary key (one membership per user), so lazy group creation and
//! membership replacement are single conflict-handling statements.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Restaurants table, keyed by the provider's stable place id
CREATE TABLE IF NOT EXISTS restaurants (
    place_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL,
    cuisine TEXT NOT NULL,
    price_tier INTEGER NOT NULL,
    rating REAL NOT NULL,
    lat REAL NOT NULL,
    lng REAL NOT NULL,
    photo_url TEXT,
    maps_url TEXT,
    website TEXT,
    updated_at TEXT NOT NULL
);

-- Dinner groups table (at most one live group per restaurant)
CREATE TABLE IF NOT EXISTS groups (
    id TEXT PRIMARY KEY,
    restaurant_id TEXT NOT NULL UNIQUE,
    note TEXT,
    created_at TEXT NOT NULL,
    FOREIGN KEY (restaurant_id) REFERENCES restaurants(place_id) ON DELETE CASCADE
);

-- Attendance table (at most one row per user)
CREATE TABLE IF NOT EXISTS attendees (
    user_id TEXT PRIMARY KEY,
    id TEXT NOT NULL,
    group_id TEXT NOT NULL,
    joined_at TEXT NOT NULL,
    FOREIGN KEY (group_id) REFERENCES groups(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_groups_restaurant_id ON groups(restaurant_id);
CREATE INDEX IF NOT EXISTS idx_attendees_group_id ON attendees(group_id);
"#;

// Restaurant queries
pub const UPSERT_RESTAURANT: &str = r#"
INSERT INTO restaurants (place_id, name, address, cuisine, price_tier, rating, lat, lng, photo_url, maps_url, website, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
ON CONFLICT(place_id) DO UPDATE SET
    name = excluded.name,
    address = excluded.address,
    cuisine = excluded.cuisine,
    price_tier = excluded.price_tier,
    rating = excluded.rating,
    lat = excluded.lat,
    lng = excluded.lng,
    photo_url = excluded.photo_url,
    maps_url = excluded.maps_url,
    website = excluded.website,
    updated_at = excluded.updated_at
"#;

pub const SELECT_RESTAURANT_BY_ID: &str = r#"
SELECT place_id, name, address, cuisine, price_tier, rating, lat, lng, photo_url, maps_url, website
FROM restaurants
WHERE place_id = ?1
"#;

// Group queries
pub const INSERT_GROUP_IF_ABSENT: &str = r#"
INSERT INTO groups (id, restaurant_id, note, created_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(restaurant_id) DO NOTHING
"#;

pub const SELECT_GROUP_BY_ID: &str = r#"
SELECT id, restaurant_id, note, created_at
FROM groups
WHERE id = ?1
"#;

pub const SELECT_GROUP_BY_RESTAURANT: &str = r#"
SELECT id, restaurant_id, note, created_at
FROM groups
WHERE restaurant_id = ?1
"#;

// Attendance queries
pub const UPSERT_ATTENDEE: &str = r#"
INSERT INTO attendees (user_id, id, group_id, joined_at)
VALUES (?1, ?2, ?3, ?4)
ON CONFLICT(user_id) DO UPDATE SET
    id = excluded.id,
    group_id = excluded.group_id,
    joined_at = excluded.joined_at
"#;

pub const SELECT_ATTENDEE_BY_USER: &str = r#"
SELECT id, user_id, group_id, joined_at
FROM attendees
WHERE user_id = ?1
"#;

pub const SELECT_ATTENDEES_BY_GROUP: &str = r#"
SELECT id, user_id, group_id, joined_at
FROM attendees
WHERE group_id = ?1
ORDER BY joined_at ASC
"#;

pub const COUNT_ATTENDEES_BY_GROUP: &str = r#"
SELECT COUNT(*)
FROM attendees
WHERE group_id = ?1
"#;

pub const DELETE_ATTENDEE_BY_USER: &str = r#"
DELETE FROM attendees
WHERE user_id = ?1
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_covers_all_entities() {
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS restaurants"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS groups"));
        assert!(CREATE_TABLES.contains("CREATE TABLE IF NOT EXISTS attendees"));
    }

    #[test]
    fn test_invariants_are_in_the_schema() {
        // One group per restaurant, one membership per user.
        assert!(CREATE_TABLES.contains("restaurant_id TEXT NOT NULL UNIQUE"));
        assert!(CREATE_TABLES.contains("user_id TEXT PRIMARY KEY"));
    }

    #[test]
    fn test_writes_are_single_statements() {
        assert!(UPSERT_RESTAURANT.contains("ON CONFLICT(place_id) DO UPDATE"));
        assert!(INSERT_GROUP_IF_ABSENT.contains("ON CONFLICT(restaurant_id) DO NOTHING"));
        assert!(UPSERT_ATTENDEE.contains("ON CONFLICT(user_id) DO UPDATE"));
    }
}
