//! golinks core - Shared domain types.
//!
//! This crate provides the types used across all golinks components:
//! - `server` - Redirect resolver, link registrar, and Google sign-in
//! - `cli` - Command-line tools for migrations, seeding, and link management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. Validation lives here so that every entry point (HTTP form,
//! CLI argument, datastore record) goes through the same rules.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes (`Slug`, `Destination`, `Email`, `ExternalId`)
//!   and the stored entities (`User`, `Link`, `UserSession`)
//! - [`clock`] - Swappable time source

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use types::*;
