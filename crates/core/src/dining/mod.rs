mod distance;
mod types;

pub use distance::{haversine_m, walk_minutes, WALK_SPEED_M_PER_MIN};
pub use types::{
    Attendee, Coordinates, DinnerGroup, GroupView, PriceTier, Restaurant, RestaurantCard,
    EPHEMERAL_ID_PREFIX,
};
