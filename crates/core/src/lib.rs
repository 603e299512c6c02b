//! `familycabin-core`: shared domain foundation.
//!
//! Typed identifiers and the error taxonomy used by every other crate.
//! No infrastructure concerns live here.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{CabinId, NotificationId, RequestId, UserId};
