use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use familycabin_core::{CabinId, DomainError, DomainResult, RequestId, UserId};

/// Resolution state of a membership request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    /// Approved and Rejected are terminal: a request never resurrects. A
    /// rejected user may ask again, which creates a *new* record.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RequestStatus::Pending => f.write_str("PENDING"),
            RequestStatus::Approved => f.write_str("APPROVED"),
            RequestStatus::Rejected => f.write_str("REJECTED"),
        }
    }
}

/// An ask to join a cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRequest {
    pub id: RequestId,
    pub cabin_id: CabinId,
    pub user_id: UserId,
    pub requested_at: DateTime<Utc>,
    pub status: RequestStatus,
}

impl MembershipRequest {
    pub fn pending(cabin_id: CabinId, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id: RequestId::new(),
            cabin_id,
            user_id,
            requested_at: now,
            status: RequestStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Conditional transition: resolve only if still pending.
    ///
    /// This is the guard that makes concurrent double-approval impossible:
    /// the second resolver observes a terminal state and gets
    /// [`DomainError::RequestNotFound`], matching "no pending request".
    pub fn resolve(&mut self, approve: bool) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::RequestNotFound);
        }
        self.status = if approve {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };
        Ok(())
    }
}
