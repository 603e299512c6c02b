//! `familycabin-membership`: the membership lifecycle core.
//!
//! Per (user, cabin) pair the state machine is:
//!
//! ```text
//! None → Requested → Member        (approve)
//! None → Requested → Rejected      (reject; a new request may follow)
//! Member → None                    (remove)
//! Member(Member) ⇄ Member(Admin)   (change role, while a member)
//! ```
//!
//! Membership edges are stored once, keyed by (user, cabin), and both the
//! user-side and cabin-side views are derived by query. The store contracts
//! expose every multi-entity mutation as a single atomic operation, so no
//! reader can observe half-updated state.

pub mod edge;
pub mod engine;
pub mod request;
pub mod store;

pub use edge::MembershipEdge;
pub use engine::LifecycleEngine;
pub use request::{MembershipRequest, RequestStatus};
pub use store::{CabinStore, IdentityStore, MembershipStore, NotificationSink};
