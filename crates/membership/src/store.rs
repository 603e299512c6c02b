//! Store contracts.
//!
//! Contracts live here with the domain (the lifecycle engine is written
//! against them); implementations live in `familycabin-infra`. Every
//! operation that touches more than one entity, e.g. approve (resolve request +
//! insert edge), cabin creation (record + creator admin edge), cabin delete
//! (record + every edge/request trace), is a *single* trait method, so an
//! implementation can make it one critical section and no caller can ever
//! interleave a half-done mutation.

use chrono::{DateTime, Utc};

use familycabin_auth::CabinRole;
use familycabin_cabins::{Cabin, CabinPatch};
use familycabin_core::{CabinId, DomainResult, NotificationId, UserId};
use familycabin_identity::{NewUser, User, UserPatch};
use familycabin_notifications::{Notification, NotificationPayload};

use crate::{MembershipEdge, MembershipRequest};

/// User records and credential verification.
pub trait IdentityStore: Send + Sync {
    /// Create a user: validates input, hashes the credential before
    /// persisting, enforces username/email uniqueness
    /// (`DomainError::DuplicateIdentity`).
    fn create_user(&self, input: NewUser) -> DomainResult<User>;

    fn user_by_id(&self, id: UserId) -> DomainResult<Option<User>>;

    fn by_username(&self, username: &str) -> DomainResult<Option<User>>;

    fn all_users(&self) -> DomainResult<Vec<User>>;

    /// Apply a profile patch; re-hashes the credential only when the patch
    /// carries a new one. Global role is not reachable through this path.
    fn update_user(&self, id: UserId, patch: UserPatch) -> DomainResult<User>;

    /// Verify a username/password pair.
    ///
    /// "No such user" and "wrong password" both surface as the one generic
    /// `DomainError::NotAuthenticated`; callers never learn which.
    fn verify_credentials(&self, username: &str, password: &str) -> DomainResult<User>;
}

/// Cabin records. Creation and deletion are membership-coupled and live on
/// [`MembershipStore`]; this contract covers the single-entity reads and the
/// editable-field patch.
pub trait CabinStore: Send + Sync {
    fn cabin_by_id(&self, id: CabinId) -> DomainResult<Option<Cabin>>;

    fn all_cabins(&self) -> DomainResult<Vec<Cabin>>;

    /// Merge editable fields (name/description/location/image only).
    fn update_cabin(&self, id: CabinId, patch: CabinPatch) -> DomainResult<Cabin>;
}

/// Membership edges and requests: the single source of truth, plus the
/// membership-coupled cabin mutations.
pub trait MembershipStore: Send + Sync {
    /// Persist a cabin and its creator's Admin edge atomically.
    fn create_cabin_with_admin(&self, cabin: Cabin, now: DateTime<Utc>) -> DomainResult<Cabin>;

    /// Remove the cabin and cascade every edge and request for it, leaving no
    /// dangling references anywhere.
    fn delete_cabin(&self, cabin_id: CabinId) -> DomainResult<()>;

    /// Append a pending request for (user, cabin).
    ///
    /// Fails `AlreadyMember` when an edge exists, `DuplicatePendingRequest`
    /// when a pending request exists, `NotFound` when either entity is gone.
    fn submit_request(
        &self,
        cabin_id: CabinId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<MembershipRequest>;

    /// Resolve the pending request for (user, cabin), update-if-still-pending.
    ///
    /// On approval the Member edge is inserted in the same critical section.
    /// Fails `RequestNotFound` when no pending request exists (including when
    /// a concurrent call already resolved it). The resolved record is
    /// retained as audit trail.
    fn resolve_request(
        &self,
        cabin_id: CabinId,
        user_id: UserId,
        approve: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<MembershipRequest>;

    /// Delete the (user, cabin) edge. Fails `MemberNotFound` when absent.
    /// Request history is untouched.
    fn remove_member(&self, cabin_id: CabinId, user_id: UserId) -> DomainResult<MembershipEdge>;

    /// Set the member's role. Fails `MemberNotFound` when no edge exists and
    /// `LastAdminProtected` when the change would leave the cabin with zero
    /// admins, checked in the same critical section as the write.
    fn change_role(
        &self,
        cabin_id: CabinId,
        user_id: UserId,
        role: CabinRole,
    ) -> DomainResult<MembershipEdge>;

    fn edges_for_user(&self, user_id: UserId) -> DomainResult<Vec<MembershipEdge>>;

    fn edges_for_cabin(&self, cabin_id: CabinId) -> DomainResult<Vec<MembershipEdge>>;

    fn requests_for_cabin(&self, cabin_id: CabinId) -> DomainResult<Vec<MembershipRequest>>;

    /// Cabins where the user currently holds the Admin role. Resolved fresh
    /// on every authorization check.
    fn admin_cabins_of(&self, user_id: UserId) -> DomainResult<Vec<CabinId>>;
}

/// Append-only per-user event log for in-app alerts.
pub trait NotificationSink: Send + Sync {
    fn append(
        &self,
        recipient: UserId,
        payload: NotificationPayload,
        now: DateTime<Utc>,
    ) -> DomainResult<NotificationId>;

    /// Newest first.
    fn for_user(&self, user_id: UserId) -> DomainResult<Vec<Notification>>;

    /// Idempotent; marking an already-read (or unknown) notification is a
    /// no-op, not an error.
    fn mark_read(&self, user_id: UserId, notification_id: NotificationId) -> DomainResult<()>;

    /// Idempotent; sets every notification read regardless of current state.
    fn mark_all_read(&self, user_id: UserId) -> DomainResult<()>;
}
