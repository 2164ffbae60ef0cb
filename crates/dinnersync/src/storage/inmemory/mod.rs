//! In-memory storage backend for testing and demos.
//!
//! Stores all data in HashMaps wrapped in `Arc<RwLock<_>>`. Data is not
//! persisted and is lost when the repository is dropped.

mod repository;

pub use repository::InMemoryRepository;
