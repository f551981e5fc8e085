//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Google sign-in (`begin_login`, `complete_login`)
//! - `links` - Slug resolution and link registration

pub mod auth;
pub mod links;

pub use auth::{AuthError, AuthService};
pub use links::{LinkError, LinkService};
