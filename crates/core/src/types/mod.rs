//! Core types for golinks.
//!
//! This module provides type-safe wrappers for the domain concepts and the
//! entities persisted in the datastore.

pub mod destination;
pub mod email;
pub mod entity;
pub mod id;
pub mod slug;

pub use destination::{Destination, DestinationError};
pub use email::{Email, EmailError};
pub use entity::{Link, User, UserSession};
pub use id::*;
pub use slug::{Slug, SlugError};
