use serde::{Deserialize, Serialize};

use crate::dining::Coordinates;

/// A geographic search against the place provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub center: Coordinates,
    /// Search radius in meters.
    pub radius_m: u32,
    pub keyword: Option<String>,
    /// Lower price-level bound (1-4), inclusive.
    pub min_price: Option<u8>,
    /// Upper price-level bound (1-4), inclusive.
    pub max_price: Option<u8>,
    pub open_now: bool,
}

impl PlaceQuery {
    /// Creates a query with the default 1.5 km radius and no filters.
    pub fn new(center: Coordinates) -> Self {
        Self {
            center,
            radius_m: 1500,
            keyword: None,
            min_price: None,
            max_price: None,
            open_now: false,
        }
    }

    pub fn with_radius(mut self, radius_m: u32) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<u8>, max: Option<u8>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn open_now(mut self) -> Self {
        self.open_now = true;
        self
    }
}

/// Geometry as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProviderGeometry {
    pub lat: f64,
    pub lng: f64,
}

/// A raw candidate place from the provider, pre-normalization.
///
/// Every field the provider marks optional is optional here; defaulting
/// happens in one place (`normalize`), never downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPlace {
    #[serde(default)]
    pub place_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub vicinity: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub price_level: Option<u8>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub geometry: Option<ProviderGeometry>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub maps_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = PlaceQuery::new(Coordinates::new(1.0, 2.0));

        assert_eq!(query.radius_m, 1500);
        assert_eq!(query.keyword, None);
        assert!(!query.open_now);
    }

    #[test]
    fn test_provider_place_tolerates_sparse_payload() {
        // Only `name` is required; everything else defaults.
        let place: ProviderPlace = serde_json::from_str(r#"{"name": "Bare Bones BBQ"}"#).unwrap();

        assert_eq!(place.name, "Bare Bones BBQ");
        assert_eq!(place.place_id, None);
        assert_eq!(place.geometry, None);
        assert!(place.types.is_empty());
    }
}
