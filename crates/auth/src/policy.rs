//! Pure authorization policy.

use familycabin_core::{CabinId, DomainError, DomainResult, UserId};

use crate::GlobalRole;

/// A fully resolved actor for authorization decisions.
///
/// Construction is decoupled from storage and transport: the API layer builds
/// this from verified claims plus the actor's *current* cabin-admin set read
/// from the membership store, so decisions never rely on a stale token
/// snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: UserId,
    pub global_role: GlobalRole,
    /// Cabins where the actor currently holds [`CabinRole::Admin`].
    pub admin_of: Vec<CabinId>,
}

impl Actor {
    pub fn new(user_id: UserId, global_role: GlobalRole) -> Self {
        Self {
            user_id,
            global_role,
            admin_of: Vec::new(),
        }
    }

    pub fn with_admin_of(mut self, cabins: Vec<CabinId>) -> Self {
        self.admin_of = cabins;
        self
    }

    fn administers(&self, cabin_id: CabinId) -> bool {
        self.admin_of.contains(&cabin_id)
    }
}

/// An action requiring an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Cabin-scoped mutation: update/delete the cabin, approve/reject
    /// requests, remove members, change member roles.
    ManageCabin(CabinId),
    /// Self-service mutation on a user-owned resource (profile,
    /// notifications).
    ActAsUser(UserId),
    /// Enumerate all user accounts.
    ListUsers,
}

/// Authorize an actor for an action.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
///
/// Every denial surfaces as [`DomainError::NotAuthorized`]; callers must not
/// silently no-op a denied mutation.
pub fn authorize(actor: &Actor, action: &Action) -> DomainResult<()> {
    if actor.global_role.is_global_admin() {
        return Ok(());
    }

    let allowed = match action {
        Action::ManageCabin(cabin_id) => actor.administers(*cabin_id),
        Action::ActAsUser(user_id) => actor.user_id == *user_id,
        Action::ListUsers => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(DomainError::NotAuthorized)
    }
}
