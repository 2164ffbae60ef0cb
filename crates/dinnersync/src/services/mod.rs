//! Application services.
//!
//! Service structs own the multi-repository workflows the handlers call
//! into, keeping the handlers thin.

mod membership;

pub use membership::MembershipService;
