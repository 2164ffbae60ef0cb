//! Restaurant aggregation view handler.
//!
//! `GET /api/restaurants` runs the full pipeline: cached provider search,
//! normalization, persistence of stable entries, then the merge with group
//! and attendee-count data into restaurant cards. Cards come back in
//! provider order.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use dinnersync_core::dining::{haversine_m, walk_minutes, Coordinates, RestaurantCard};
use dinnersync_core::places::{normalize_places, PlaceQuery};
use dinnersync_core::storage::RepositoryError;

use crate::{context::CurrentUser, handlers::AppError, state::AppState};

/// Query parameters for the restaurant search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub lat: f64,
    pub lng: f64,
    /// Search radius in meters (default: 1500).
    #[serde(default = "default_radius")]
    pub radius_m: u32,
    pub keyword: Option<String>,
    /// Lower price-level bound (1-4), inclusive.
    pub min_price: Option<u8>,
    /// Upper price-level bound (1-4), inclusive.
    pub max_price: Option<u8>,
    #[serde(default)]
    pub open_now: bool,
}

fn default_radius() -> u32 {
    1500
}

/// Largest radius the provider accepts.
const MAX_RADIUS_M: u32 = 50_000;

impl SearchQuery {
    fn validate(&self) -> Result<(), String> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("lat {} is out of range [-90, 90]", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!("lng {} is out of range [-180, 180]", self.lng));
        }
        if self.radius_m == 0 || self.radius_m > MAX_RADIUS_M {
            return Err(format!(
                "radius_m {} is out of range [1, {MAX_RADIUS_M}]",
                self.radius_m
            ));
        }
        for (name, value) in [("min_price", self.min_price), ("max_price", self.max_price)] {
            if let Some(level) = value {
                if !(1..=4).contains(&level) {
                    return Err(format!("{name} {level} is out of range [1, 4]"));
                }
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(format!("min_price {min} exceeds max_price {max}"));
            }
        }
        Ok(())
    }

    fn to_place_query(&self) -> PlaceQuery {
        let mut query = PlaceQuery::new(Coordinates::new(self.lat, self.lng))
            .with_radius(self.radius_m)
            .with_price_range(self.min_price, self.max_price);
        if let Some(keyword) = &self.keyword {
            query = query.with_keyword(keyword.clone());
        }
        if self.open_now {
            query = query.open_now();
        }
        query
    }
}

/// List restaurants near a point, merged with group data (GET /api/restaurants).
pub async fn list_restaurants(
    CurrentUser(user_id): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<RestaurantCard>>, AppError> {
    query
        .validate()
        .map_err(|msg| AppError(RepositoryError::InvalidData(msg).into()))?;
    let place_query = query.to_place_query();
    let center = place_query.center;

    // A provider outage degrades to an empty listing; membership operations
    // stay available either way.
    let raw = match state.places.search(&place_query).await {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(error = %err, "Place search failed, serving empty listing");
            Vec::new()
        }
    };
    let restaurants = normalize_places(raw);

    // Persist every entry with a stable provider id so joins can reference it.
    let mut stable_ids: Vec<String> = Vec::new();
    for restaurant in &restaurants {
        if !restaurant.is_ephemeral() {
            state.restaurants.upsert_restaurant(restaurant).await?;
            stable_ids.push(restaurant.place_id.clone());
        }
    }

    let groups = state.groups.get_groups_by_restaurants(&stable_ids).await?;
    let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
    let counts = state
        .attendance
        .count_attendees_for_groups(&group_ids)
        .await?;
    let membership = state.attendance.get_membership(user_id).await?;

    let group_for = |place_id: &str| groups.iter().find(|g| g.restaurant_id == place_id);

    let cards = restaurants
        .into_iter()
        .map(|restaurant| {
            let group = group_for(&restaurant.place_id);
            let attendee_count = group
                .and_then(|g| counts.get(&g.id).copied())
                .unwrap_or(0);
            let is_attending = match (&membership, group) {
                (Some(m), Some(g)) => m.group_id == g.id,
                _ => false,
            };
            let distance_m = haversine_m(center, restaurant.location);
            RestaurantCard {
                distance_m: distance_m.round() as u32,
                walk_minutes: walk_minutes(distance_m),
                attendee_count,
                is_attending,
                group_id: group.map(|g| g.id),
                restaurant,
            }
        })
        .collect();

    Ok(Json(cards))
}
