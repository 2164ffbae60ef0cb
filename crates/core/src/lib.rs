//! Core library for the dinnersync project.
//!
//! Pure domain logic with no I/O: restaurant and dinner-group types,
//! repository and cache traits, the place-provider abstraction, and the
//! normalization step that maps arbitrary provider responses into the
//! fixed `Restaurant` shape. Concrete backends live in the server crate.

pub mod cache;
pub mod dining;
pub mod places;
pub mod storage;
