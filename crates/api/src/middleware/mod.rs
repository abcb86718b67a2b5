//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`rbac::RequireAdmin`], [`rbac::RequireOrganizer`],
//!   [`rbac::RequireArtist`] -- role-gated wrappers around `AuthUser`.

pub mod auth;
pub mod rbac;
