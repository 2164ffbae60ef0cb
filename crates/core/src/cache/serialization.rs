//! Pure functions for serializing provider results to/from cache bytes.
//!
//! JSON is used for cache storage, keeping cached values human-readable
//! for debugging.

use thiserror::Error;

use crate::places::ProviderPlace;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a provider search result set to JSON bytes.
pub fn serialize_places(places: &[ProviderPlace]) -> Result<Vec<u8>> {
    serde_json::to_vec(places).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a provider search result set.
pub fn deserialize_places(bytes: &[u8]) -> Result<Vec<ProviderPlace>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a single provider place to JSON bytes.
pub fn serialize_place(place: &ProviderPlace) -> Result<Vec<u8>> {
    serde_json::to_vec(place).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a single provider place.
pub fn deserialize_place(bytes: &[u8]) -> Result<ProviderPlace> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
