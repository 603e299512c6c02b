//! `familycabin-identity`: user accounts.
//!
//! Pure domain types and validation for registered users. Persistence and
//! credential hashing live behind the identity store contract
//! (`familycabin-membership::store`); this crate only decides what a valid
//! user record looks like.

pub mod user;

pub use user::{NewUser, User, UserPatch};
