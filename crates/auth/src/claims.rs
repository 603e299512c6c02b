use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use familycabin_core::{DomainError, UserId};

use crate::GlobalRole;

/// How long an issued token stays valid.
pub const TOKEN_TTL: Duration = Duration::hours(2);

/// Bearer-token claims (transport-agnostic).
///
/// Deliberately carries no cabin-membership snapshot: per-cabin roles are
/// re-resolved from the membership store on every authorization check, so a
/// role change takes effect immediately instead of at the next re-issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    pub username: String,

    pub email: String,

    /// Global role at issue time.
    pub role: GlobalRole,

    /// Issued-at, Unix seconds.
    pub iat: i64,

    /// Expiration, Unix seconds.
    pub exp: i64,
}

impl AuthClaims {
    /// Build claims for a freshly authenticated user, valid for [`TOKEN_TTL`].
    pub fn issue(
        sub: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        role: GlobalRole,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            sub,
            username: username.into(),
            email: email.into(),
            role,
            iat: now.timestamp(),
            exp: (now + TOKEN_TTL).timestamp(),
        }
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Deterministically validate the claim time window.
///
/// Signature verification happens in [`crate::jwt`]; this checks only the
/// claims themselves, so it can be tested without key material.
pub fn validate_claims(claims: &AuthClaims, now: DateTime<Utc>) -> Result<(), DomainError> {
    if claims.exp <= claims.iat {
        return Err(DomainError::NotAuthenticated);
    }
    if now.timestamp() < claims.iat {
        return Err(DomainError::NotAuthenticated);
    }
    if now.timestamp() >= claims.exp {
        return Err(DomainError::NotAuthenticated);
    }
    Ok(())
}
