//! Cache backend implementations.
//!
//! Provides the concrete implementation of the `Cache` trait defined in
//! `dinnersync_core::cache`. Place-provider responses are the only cached
//! data, so a single in-memory backend with LRU eviction is enough.

pub mod memory;

pub use memory::MemoryCache;
