use familycabin_auth::GlobalRole;
use familycabin_core::UserId;

/// Authenticated identity for a request, derived from verified claims.
///
/// Carries no cabin-membership state: per-cabin roles are resolved fresh
/// from the membership store at each authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorContext {
    user_id: UserId,
    username: String,
    global_role: GlobalRole,
}

impl ActorContext {
    pub fn new(user_id: UserId, username: String, global_role: GlobalRole) -> Self {
        Self {
            user_id,
            username,
            global_role,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn global_role(&self) -> GlobalRole {
        self.global_role
    }
}
