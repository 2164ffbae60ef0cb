//! Request-scoped identity context.
//!
//! Identity resolution itself is an external collaborator's job; by the
//! time a request reaches this service the user is already authenticated
//! and arrives as a resolved id in the `x-user-id` header. Every membership
//! operation requires it.

mod extractor;

pub use extractor::CurrentUser;

/// Header carrying the resolved user identity.
pub const USER_ID_HEADER: &str = "x-user-id";
