//! Deterministic in-process place provider.
//!
//! Serves a fixed set of places so the server runs end to end without a
//! provider API key. The filter behavior (radius, keyword, price bounds)
//! mirrors the real provider closely enough for demos and router tests.

use async_trait::async_trait;

use dinnersync_core::dining::{haversine_m, Coordinates};
use dinnersync_core::places::{PlaceQuery, PlaceSearch, ProviderGeometry, ProviderPlace, Result};

/// Fixed-catalog place provider.
pub struct MockPlaces {
    places: Vec<ProviderPlace>,
}

impl MockPlaces {
    /// Creates a provider serving the given catalog.
    pub fn new(places: Vec<ProviderPlace>) -> Self {
        Self { places }
    }

    /// A small catalog of restaurants around a conference venue
    /// (Moscone Center, San Francisco).
    pub fn conference_demo() -> Self {
        fn place(
            id: &str,
            name: &str,
            vicinity: &str,
            cuisine: &str,
            price_level: u8,
            rating: f64,
            lat: f64,
            lng: f64,
        ) -> ProviderPlace {
            ProviderPlace {
                place_id: Some(id.to_string()),
                name: name.to_string(),
                vicinity: Some(vicinity.to_string()),
                types: vec![cuisine.to_string(), "restaurant".to_string()],
                price_level: Some(price_level),
                rating: Some(rating),
                geometry: Some(ProviderGeometry { lat, lng }),
                photo_url: None,
                website: None,
                maps_url: None,
            }
        }

        Self::new(vec![
            place(
                "demo-taqueria",
                "Mission Street Taqueria",
                "598 Mission St",
                "mexican_restaurant",
                1,
                4.4,
                37.7880,
                -122.3990,
            ),
            place(
                "demo-ramen",
                "Kinka Ramen",
                "101 4th St",
                "japanese_restaurant",
                2,
                4.6,
                37.7841,
                -122.4035,
            ),
            place(
                "demo-trattoria",
                "Trattoria Lucca",
                "720 Howard St",
                "italian_restaurant",
                3,
                4.2,
                37.7849,
                -122.4005,
            ),
            place(
                "demo-brasserie",
                "Brasserie Marianne",
                "55 3rd St",
                "french_restaurant",
                4,
                4.7,
                37.7866,
                -122.4021,
            ),
            place(
                "demo-diner",
                "Fourth Street Diner",
                "250 4th St",
                "american_restaurant",
                1,
                3.8,
                37.7822,
                -122.4017,
            ),
        ])
    }

    fn matches(place: &ProviderPlace, query: &PlaceQuery) -> bool {
        let Some(geometry) = place.geometry else {
            return false;
        };
        let location = Coordinates::new(geometry.lat, geometry.lng);
        if haversine_m(query.center, location) > f64::from(query.radius_m) {
            return false;
        }

        if let Some(keyword) = &query.keyword {
            let needle = keyword.trim().to_lowercase();
            let in_name = place.name.to_lowercase().contains(&needle);
            let in_types = place.types.iter().any(|t| t.contains(&needle));
            if !in_name && !in_types {
                return false;
            }
        }

        if let Some(level) = place.price_level {
            if query.min_price.is_some_and(|min| level < min) {
                return false;
            }
            if query.max_price.is_some_and(|max| level > max) {
                return false;
            }
        }

        true
    }
}

#[async_trait]
impl PlaceSearch for MockPlaces {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<ProviderPlace>> {
        Ok(self
            .places
            .iter()
            .filter(|p| Self::matches(p, query))
            .cloned()
            .collect())
    }

    async fn details(&self, place_id: &str) -> Result<Option<ProviderPlace>> {
        Ok(self
            .places
            .iter()
            .find(|p| p.place_id.as_deref() == Some(place_id))
            .cloned())
    }
}
