//! `familycabin-auth`: pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to hash credentials, mint/verify bearer tokens, and decide whether an
//! actor may perform an action, and nothing else.

pub mod claims;
pub mod jwt;
pub mod password;
pub mod policy;
pub mod roles;

pub use claims::{AuthClaims, TOKEN_TTL, validate_claims};
pub use jwt::{Hs256JwtCodec, JwtCodec};
pub use password::{hash_password, verify_password};
pub use policy::{Action, Actor, authorize};
pub use roles::{CabinRole, GlobalRole};
