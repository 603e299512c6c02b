use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use familycabin_auth::CabinRole;
use familycabin_core::{CabinId, UserId};

/// A membership edge: the single source of truth for "user U belongs to
/// cabin C with role R".
///
/// At most one edge exists per (user, cabin) pair. The user's cabin list and
/// the cabin's member list are both queries over these edges, which makes the
/// symmetric-representation invariant structural rather than maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipEdge {
    pub user_id: UserId,
    pub cabin_id: CabinId,
    pub role: CabinRole,
    pub joined_at: DateTime<Utc>,
}

impl MembershipEdge {
    pub fn new(user_id: UserId, cabin_id: CabinId, role: CabinRole, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            cabin_id,
            role,
            joined_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == CabinRole::Admin
    }
}
