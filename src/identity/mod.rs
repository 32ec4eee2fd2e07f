//! Identity and scope resolution for Filedock.
//!
//! Authentication lives in the external identity provider; this module
//! covers the boundary: resolving an authenticated caller into a scope,
//! and reading the display profiles the provider syncs in.

mod profile;
mod scope;

pub use profile::{UserProfile, UserProfileRepository};
pub use scope::{Caller, Scope, ScopeRole};
