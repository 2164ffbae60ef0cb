//! Normalization of provider responses into the fixed `Restaurant` shape.
//!
//! This is the only place provider field shapes are interpreted. Rules:
//!
//! - entries without geometry are dropped silently;
//! - entries without a stable external id get an ephemeral `tmp:` id and
//!   are never persisted;
//! - a missing price level defaults to mid-tier, a missing rating to a
//!   neutral value, so no null ever reaches the view layer.

use crate::dining::{Coordinates, PriceTier, Restaurant, EPHEMERAL_ID_PREFIX};

use super::{ProviderPlace, ProviderGeometry};

/// Rating assumed for places the provider has not rated.
pub const NEUTRAL_RATING: f64 = 3.0;

/// Category tags that carry no cuisine information.
const GENERIC_TYPES: &[&str] = &[
    "restaurant",
    "food",
    "point_of_interest",
    "establishment",
    "meal_takeaway",
    "meal_delivery",
];

/// Normalizes a single provider place. Returns `None` when the entry has
/// no geometry.
pub fn normalize_place(raw: ProviderPlace) -> Option<Restaurant> {
    let ProviderGeometry { lat, lng } = raw.geometry?;
    let location = Coordinates::new(lat, lng);

    let place_id = match raw.place_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => id,
        None => ephemeral_id(&raw.name, location),
    };

    let mut restaurant = Restaurant::new(place_id, raw.name, location)
        .with_cuisine(cuisine_from_types(&raw.types))
        .with_price_tier(
            raw.price_level
                .map(PriceTier::from_level)
                .unwrap_or_default(),
        )
        .with_rating(raw.rating.unwrap_or(NEUTRAL_RATING));

    if let Some(vicinity) = raw.vicinity {
        restaurant = restaurant.with_address(vicinity);
    }
    restaurant.photo_url = raw.photo_url;
    restaurant.website = raw.website;
    restaurant.maps_url = raw.maps_url;

    Some(restaurant)
}

/// Normalizes a provider result set, preserving provider order and
/// dropping entries without geometry.
pub fn normalize_places(raw: Vec<ProviderPlace>) -> Vec<Restaurant> {
    raw.into_iter().filter_map(normalize_place).collect()
}

/// Deterministic fallback id for entries the provider did not identify.
fn ephemeral_id(name: &str, location: Coordinates) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    format!(
        "{EPHEMERAL_ID_PREFIX}{}:{:.4}:{:.4}",
        slug.trim_matches('-'),
        location.lat,
        location.lng
    )
}

/// Picks the most specific category tag as the cuisine label.
fn cuisine_from_types(types: &[String]) -> String {
    types
        .iter()
        .find(|t| !GENERIC_TYPES.contains(&t.as_str()))
        .map(|t| t.replace('_', " "))
        .unwrap_or_else(|| "restaurant".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str) -> ProviderPlace {
        ProviderPlace {
            place_id: Some(format!("id-{name}")),
            name: name.to_string(),
            vicinity: Some("1 Test St".to_string()),
            types: vec!["thai_restaurant".to_string(), "restaurant".to_string()],
            price_level: Some(3),
            rating: Some(4.2),
            geometry: Some(ProviderGeometry {
                lat: 13.7563,
                lng: 100.5018,
            }),
            photo_url: None,
            website: None,
            maps_url: None,
        }
    }

    #[test]
    fn test_normalize_maps_all_fields() {
        let restaurant = normalize_place(raw("Thai Garden")).unwrap();

        assert_eq!(restaurant.place_id, "id-Thai Garden");
        assert_eq!(restaurant.address, "1 Test St");
        assert_eq!(restaurant.cuisine, "thai restaurant");
        assert_eq!(restaurant.price_tier, PriceTier::Upscale);
        assert_eq!(restaurant.rating, 4.2);
        assert!(!restaurant.is_ephemeral());
    }

    #[test]
    fn test_missing_geometry_is_dropped() {
        let mut place = raw("No Geometry");
        place.geometry = None;

        assert_eq!(normalize_place(place), None);
    }

    #[test]
    fn test_missing_optionals_get_defaults() {
        let mut place = raw("Defaults");
        place.price_level = None;
        place.rating = None;
        place.types = vec!["restaurant".to_string()];
        place.vicinity = None;

        let restaurant = normalize_place(place).unwrap();

        assert_eq!(restaurant.price_tier, PriceTier::Moderate);
        assert_eq!(restaurant.rating, NEUTRAL_RATING);
        assert_eq!(restaurant.cuisine, "restaurant");
        assert_eq!(restaurant.address, "");
    }

    #[test]
    fn test_missing_id_gets_ephemeral_fallback() {
        let mut place = raw("Pop-Up Kitchen");
        place.place_id = None;

        let restaurant = normalize_place(place).unwrap();

        assert!(restaurant.is_ephemeral());
        assert!(restaurant.place_id.starts_with("tmp:pop-up-kitchen"));
    }

    #[test]
    fn test_blank_id_treated_as_missing() {
        let mut place = raw("Blank Id");
        place.place_id = Some("  ".to_string());

        let restaurant = normalize_place(place).unwrap();

        assert!(restaurant.is_ephemeral());
    }

    #[test]
    fn test_ephemeral_id_is_deterministic() {
        let mut a = raw("Same Spot");
        a.place_id = None;
        let mut b = raw("Same Spot");
        b.place_id = None;

        assert_eq!(
            normalize_place(a).unwrap().place_id,
            normalize_place(b).unwrap().place_id
        );
    }

    #[test]
    fn test_normalize_places_preserves_order_and_drops() {
        let mut no_geo = raw("Dropped");
        no_geo.geometry = None;

        let restaurants = normalize_places(vec![raw("First"), no_geo, raw("Second")]);

        assert_eq!(restaurants.len(), 2);
        assert_eq!(restaurants[0].name, "First");
        assert_eq!(restaurants[1].name, "Second");
    }
}
