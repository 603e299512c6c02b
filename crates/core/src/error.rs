//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// The membership lifecycle needs its conflict conditions to stay
/// distinguishable all the way to the API boundary, so they are first-class
/// variants rather than stringly-typed conflicts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing, malformed, or expired credential.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Authenticated, but policy denies the action.
    #[error("not authorized")]
    NotAuthorized,

    /// A requested entity does not resolve.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Username or email already taken at registration.
    #[error("username or email already exists")]
    DuplicateIdentity,

    /// A member edge already exists for this (user, cabin) pair.
    #[error("already a member of this cabin")]
    AlreadyMember,

    /// A pending membership request already exists for this pair.
    #[error("a pending request for this cabin already exists")]
    DuplicatePendingRequest,

    /// No pending request to resolve (already approved/rejected, or never made).
    #[error("membership request not found")]
    RequestNotFound,

    /// No member edge for this (user, cabin) pair.
    #[error("member not found")]
    MemberNotFound,

    /// Demoting this member would leave the cabin with zero admins.
    #[error("cannot demote the only admin of a cabin")]
    LastAdminProtected,

    /// A role value outside the allowed set.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Store unreachable or timed out. Retryable by the caller.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// Whether the caller may usefully retry the failed call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Infrastructure(_))
    }
}
