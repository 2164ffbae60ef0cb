pub mod attendance;
pub mod error;
pub mod groups;
pub mod health;
pub mod restaurants;

pub use error::AppError;
