//! SQLite storage backend.
//!
//! Build with:
//! ```bash
//! cargo build -p dinnersync --no-default-features --features sqlite
//! ```

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
