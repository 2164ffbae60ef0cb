//! Google Places HTTP provider.
//!
//! Talks to the Google Places web service (Nearby Search and Place Details)
//! and converts its wire shapes into the provider-neutral `ProviderPlace`.
//! Provider-reported statuses other than `OK` / `ZERO_RESULTS` are surfaced
//! as `PlacesError::Provider` so callers can decide how to degrade.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use dinnersync_core::places::{
    PlaceQuery, PlaceSearch, PlacesError, ProviderGeometry, ProviderPlace, Result,
};

/// Width requested for place photos, in pixels.
const PHOTO_MAX_WIDTH: u32 = 640;

/// Google Places HTTP client.
pub struct GooglePlaces {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GooglePlaces {
    /// Creates a new client against the given base URL.
    ///
    /// `base_url` is the service root, e.g.
    /// `https://maps.googleapis.com/maps/api/place`.
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn photo_url(&self, photo_reference: &str) -> String {
        format!(
            "{}/photo?maxwidth={}&photo_reference={}&key={}",
            self.base_url, PHOTO_MAX_WIDTH, photo_reference, self.api_key
        )
    }

    fn to_provider_place(&self, place: GooglePlace) -> ProviderPlace {
        let photo_url = place
            .photos
            .first()
            .map(|p| self.photo_url(&p.photo_reference));

        ProviderPlace {
            place_id: place.place_id,
            name: place.name,
            vicinity: place.vicinity.or(place.formatted_address),
            types: place.types,
            price_level: place.price_level,
            rating: place.rating,
            geometry: place.geometry.map(|g| ProviderGeometry {
                lat: g.location.lat,
                lng: g.location.lng,
            }),
            photo_url,
            website: place.website,
            maps_url: place.url,
        }
    }
}

#[async_trait]
impl PlaceSearch for GooglePlaces {
    async fn search(&self, query: &PlaceQuery) -> Result<Vec<ProviderPlace>> {
        let url = format!("{}/nearbysearch/json", self.base_url);

        let mut params: Vec<(&str, String)> = vec![
            (
                "location",
                format!("{},{}", query.center.lat, query.center.lng),
            ),
            ("radius", query.radius_m.to_string()),
            ("type", "restaurant".to_string()),
            ("key", self.api_key.clone()),
        ];
        if let Some(keyword) = &query.keyword {
            params.push(("keyword", keyword.clone()));
        }
        if let Some(min) = query.min_price {
            params.push(("minprice", min.to_string()));
        }
        if let Some(max) = query.max_price {
            params.push(("maxprice", max.to_string()));
        }
        if query.open_now {
            params.push(("opennow", "true".to_string()));
        }

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| PlacesError::Http(e.to_string()))?;

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::Decode(e.to_string()))?;

        match body.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(body
                .results
                .into_iter()
                .map(|p| self.to_provider_place(p))
                .collect()),
            status => Err(PlacesError::Provider {
                status: status.to_string(),
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }

    async fn details(&self, place_id: &str) -> Result<Option<ProviderPlace>> {
        let url = format!("{}/details/json", self.base_url);

        let params: Vec<(&str, String)> = vec![
            ("place_id", place_id.to_string()),
            (
                "fields",
                "place_id,name,vicinity,formatted_address,types,price_level,rating,geometry,photos,website,url"
                    .to_string(),
            ),
            ("key", self.api_key.clone()),
        ];

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| PlacesError::Http(e.to_string()))?;

        let body: DetailsResponse = response
            .json()
            .await
            .map_err(|e| PlacesError::Decode(e.to_string()))?;

        match body.status.as_str() {
            "OK" => Ok(body.result.map(|p| self.to_provider_place(p))),
            "NOT_FOUND" | "ZERO_RESULTS" | "INVALID_REQUEST" => Ok(None),
            status => Err(PlacesError::Provider {
                status: status.to_string(),
                message: body.error_message.unwrap_or_default(),
            }),
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<GooglePlace>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<GooglePlace>,
}

#[derive(Debug, Deserialize)]
struct GooglePlace {
    #[serde(default)]
    place_id: Option<String>,
    name: String,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    price_level: Option<u8>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    geometry: Option<GoogleGeometry>,
    #[serde(default)]
    photos: Vec<GooglePhoto>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLocation,
}

#[derive(Debug, Deserialize)]
struct GoogleLocation {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GooglePhoto {
    photo_reference: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GooglePlaces {
        GooglePlaces::new(
            "test-key".to_string(),
            "https://example.test/place/".to_string(),
            Duration::from_secs(1),
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = test_client();
        assert_eq!(client.base_url, "https://example.test/place");
    }

    #[test]
    fn test_search_response_decodes_sparse_results() {
        let json = r#"{
            "status": "OK",
            "results": [
                {"name": "Corner Pho", "place_id": "abc", "geometry": {"location": {"lat": 1.0, "lng": 2.0}}},
                {"name": "No Geometry Diner"}
            ]
        }"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.status, "OK");
        assert_eq!(body.results.len(), 2);
        assert!(body.results[1].geometry.is_none());
    }

    #[test]
    fn test_conversion_flattens_geometry_and_picks_first_photo() {
        let client = test_client();
        let place = GooglePlace {
            place_id: Some("abc".to_string()),
            name: "Corner Pho".to_string(),
            vicinity: Some("12 Elm St".to_string()),
            formatted_address: None,
            types: vec!["restaurant".to_string()],
            price_level: Some(2),
            rating: Some(4.5),
            geometry: Some(GoogleGeometry {
                location: GoogleLocation { lat: 1.0, lng: 2.0 },
            }),
            photos: vec![
                GooglePhoto {
                    photo_reference: "ref-1".to_string(),
                },
                GooglePhoto {
                    photo_reference: "ref-2".to_string(),
                },
            ],
            website: None,
            url: None,
        };

        let converted = client.to_provider_place(place);
        assert_eq!(
            converted.geometry,
            Some(ProviderGeometry { lat: 1.0, lng: 2.0 })
        );
        let photo_url = converted.photo_url.unwrap();
        assert!(photo_url.contains("ref-1"));
        assert!(!photo_url.contains("ref-2"));
    }

    #[test]
    fn test_details_address_falls_back_to_formatted_address() {
        let client = test_client();
        let place = GooglePlace {
            place_id: Some("abc".to_string()),
            name: "Corner Pho".to_string(),
            vicinity: None,
            formatted_address: Some("12 Elm St, Springfield".to_string()),
            types: vec![],
            price_level: None,
            rating: None,
            geometry: None,
            photos: vec![],
            website: None,
            url: None,
        };

        let converted = client.to_provider_place(place);
        assert_eq!(
            converted.vicinity,
            Some("12 Elm St, Springfield".to_string())
        );
    }
}
