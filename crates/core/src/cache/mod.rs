mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{place_detail_key, place_search_key, DETAIL_TTL, SEARCH_TTL};
pub use serialization::{
    deserialize_place, deserialize_places, serialize_place, serialize_places, SerializationError,
};
pub use traits::Cache;
