//! `familycabin-cabins`: cabin records.
//!
//! A cabin is a named shared space that users join. Member and request lists
//! are *views* derived from the membership store, never stored on the cabin
//! record itself, so this crate stays free of the dual-write hazard.

pub mod cabin;

pub use cabin::{Cabin, CabinPatch, DEFAULT_CABIN_IMAGE, NewCabin};
