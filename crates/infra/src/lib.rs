//! `familycabin-infra`: store implementations.
//!
//! A single in-memory store backs every contract in
//! `familycabin-membership::store`. All state sits behind one `RwLock`, so
//! each multi-entity mutation (approve, cabin create/delete cascade,
//! last-admin-guarded role change) is one critical section and readers never
//! observe half-written state.

pub mod memory;
pub mod seed;

pub use memory::InMemoryStore;
pub use seed::seed_demo;
