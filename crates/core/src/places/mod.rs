mod error;
mod normalize;
mod traits;
mod types;

pub use error::{PlacesError, Result};
pub use normalize::{normalize_place, normalize_places, NEUTRAL_RATING};
pub use traits::PlaceSearch;
pub use types::{PlaceQuery, ProviderGeometry, ProviderPlace};
