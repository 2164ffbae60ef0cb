use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix for fallback ids assigned to provider entries without a stable
/// external identifier. Ephemeral restaurants are never persisted or joined.
pub const EPHEMERAL_ID_PREFIX: &str = "tmp:";

/// A geographic point (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns true if both components are within valid WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Ordinal price tier (1-4), mirroring the provider's price level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Budget,
    Moderate,
    Upscale,
    Splurge,
}

impl PriceTier {
    /// Builds a tier from a provider price level, clamping out-of-range
    /// values into 1-4.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => PriceTier::Budget,
            2 => PriceTier::Moderate,
            3 => PriceTier::Upscale,
            _ => PriceTier::Splurge,
        }
    }

    /// The ordinal level (1-4) for this tier.
    pub fn level(&self) -> u8 {
        match self {
            PriceTier::Budget => 1,
            PriceTier::Moderate => 2,
            PriceTier::Upscale => 3,
            PriceTier::Splurge => 4,
        }
    }
}

impl Default for PriceTier {
    /// Mid-tier default used when the provider omits a price level.
    fn default() -> Self {
        PriceTier::Moderate
    }
}

/// A restaurant sourced from the external place-search provider.
///
/// Keyed by the provider's stable place id. Rows are upserted on every
/// ingest and never deleted by normal flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// External place identifier (stable across provider calls), or an
    /// ephemeral `tmp:` id for entries the provider did not identify.
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub cuisine: String,
    pub price_tier: PriceTier,
    pub rating: f64,
    pub location: Coordinates,
    pub photo_url: Option<String>,
    pub maps_url: Option<String>,
    pub website: Option<String>,
}

impl Restaurant {
    /// Creates a restaurant with defaulted descriptive fields.
    pub fn new(place_id: impl Into<String>, name: impl Into<String>, location: Coordinates) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            address: String::new(),
            cuisine: "restaurant".to_string(),
            price_tier: PriceTier::default(),
            rating: 0.0,
            location,
            photo_url: None,
            maps_url: None,
            website: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = cuisine.into();
        self
    }

    pub fn with_price_tier(mut self, tier: PriceTier) -> Self {
        self.price_tier = tier;
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// True when this entry carries a fallback id and must not be persisted.
    pub fn is_ephemeral(&self) -> bool {
        self.place_id.starts_with(EPHEMERAL_ID_PREFIX)
    }
}

/// The single dinner group attached to a restaurant.
///
/// Created lazily on first join and never explicitly closed; a group
/// persists even with zero attendees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DinnerGroup {
    pub id: Uuid,
    /// The restaurant this group belongs to (unique per restaurant).
    pub restaurant_id: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DinnerGroup {
    pub fn new(restaurant_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            restaurant_id: restaurant_id.into(),
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets a specific ID for this group (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// The membership record linking one user to one dinner group.
///
/// Storage keys the row by `user_id`, so a user holds at most one of these
/// at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

impl Attendee {
    pub fn new(user_id: Uuid, group_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            group_id,
            joined_at: Utc::now(),
        }
    }
}

/// A dinner group with its restaurant and full attendee roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupView {
    pub group: DinnerGroup,
    pub restaurant: Restaurant,
    pub attendees: Vec<Attendee>,
    pub attendee_count: u64,
}

impl GroupView {
    pub fn new(group: DinnerGroup, restaurant: Restaurant, attendees: Vec<Attendee>) -> Self {
        let attendee_count = attendees.len() as u64;
        Self {
            group,
            restaurant,
            attendees,
            attendee_count,
        }
    }
}

/// One row of the restaurant aggregation view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantCard {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    /// Straight-line distance from the query center, in meters.
    pub distance_m: u32,
    /// Estimated walking time from the query center, in minutes.
    pub walk_minutes: u32,
    pub attendee_count: u64,
    /// Whether the requesting user's membership points at this restaurant.
    pub is_attending: bool,
    /// The restaurant's group id, when a group has been created.
    pub group_id: Option<Uuid>,
}
