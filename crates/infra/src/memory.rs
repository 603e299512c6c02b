use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use familycabin_auth::{CabinRole, GlobalRole, hash_password, verify_password};
use familycabin_cabins::{Cabin, CabinPatch};
use familycabin_core::{CabinId, DomainError, DomainResult, NotificationId, UserId};
use familycabin_identity::{NewUser, User, UserPatch};
use familycabin_membership::{
    CabinStore, IdentityStore, MembershipEdge, MembershipRequest, MembershipStore,
    NotificationSink,
};
use familycabin_notifications::{Notification, NotificationPayload};

#[derive(Debug, Default)]
struct StoreState {
    users: HashMap<UserId, User>,
    cabins: HashMap<CabinId, Cabin>,
    /// Membership edges, keyed by (user, cabin): the single source of truth.
    edges: BTreeMap<(UserId, CabinId), MembershipEdge>,
    /// Requests in submission order; resolved records are retained as audit
    /// trail.
    requests: Vec<MembershipRequest>,
    /// Per-user notification logs, append order.
    notifications: HashMap<UserId, Vec<Notification>>,
}

/// In-memory store for the whole system.
///
/// One `RwLock` over the combined state: every write is a critical section,
/// which is what makes the dual-entity operations of the lifecycle engine
/// atomic from any reader's point of view.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, StoreState>> {
        self.inner
            .read()
            .map_err(|_| DomainError::infrastructure("store lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, StoreState>> {
        self.inner
            .write()
            .map_err(|_| DomainError::infrastructure("store lock poisoned"))
    }

    /// Grant the global-admin role. Seeding-only escape hatch: the identity
    /// store contract deliberately has no way to set roles.
    pub fn promote_to_global_admin(&self, user_id: UserId) -> DomainResult<()> {
        let mut state = self.write()?;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or(DomainError::NotFound("user"))?;
        user.role = GlobalRole::GlobalAdmin;
        Ok(())
    }
}

impl IdentityStore for InMemoryStore {
    fn create_user(&self, input: NewUser) -> DomainResult<User> {
        let input = input.normalized()?;
        // Hash outside the lock; uniqueness is re-checked under it.
        let password_hash = hash_password(&input.password)?;

        let mut state = self.write()?;
        let duplicate = state.users.values().any(|u| {
            u.username.eq_ignore_ascii_case(&input.username) || u.email == input.email
        });
        if duplicate {
            return Err(DomainError::DuplicateIdentity);
        }

        let user = User {
            id: UserId::new(),
            username: input.username,
            email: input.email,
            password_hash,
            name: input.name,
            address: input.address,
            bio: input.bio,
            member_since: Utc::now(),
            role: GlobalRole::User,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn user_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    fn by_username(&self, username: &str) -> DomainResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    fn all_users(&self) -> DomainResult<Vec<User>> {
        let mut users: Vec<User> = self.read()?.users.values().cloned().collect();
        users.sort_by(|a, b| a.member_since.cmp(&b.member_since));
        Ok(users)
    }

    fn update_user(&self, id: UserId, patch: UserPatch) -> DomainResult<User> {
        let new_hash = match &patch.password {
            Some(password) => {
                if password.len() < familycabin_identity::user::MIN_PASSWORD_LEN {
                    return Err(DomainError::validation("password too short"));
                }
                Some(hash_password(password)?)
            }
            None => None,
        };

        let mut state = self.write()?;

        if let Some(email) = &patch.email {
            let email = email.trim().to_lowercase();
            if state
                .users
                .values()
                .any(|u| u.id != id && u.email == email)
            {
                return Err(DomainError::DuplicateIdentity);
            }
        }

        let user = state
            .users
            .get_mut(&id)
            .ok_or(DomainError::NotFound("user"))?;
        user.apply(&patch)?;
        if let Some(hash) = new_hash {
            user.password_hash = hash;
        }
        Ok(user.clone())
    }

    fn verify_credentials(&self, username: &str, password: &str) -> DomainResult<User> {
        let user = self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned();

        // One generic failure for "no such user" and "wrong password".
        match user {
            Some(user) if verify_password(password, &user.password_hash) => Ok(user),
            _ => Err(DomainError::NotAuthenticated),
        }
    }
}

impl CabinStore for InMemoryStore {
    fn cabin_by_id(&self, id: CabinId) -> DomainResult<Option<Cabin>> {
        Ok(self.read()?.cabins.get(&id).cloned())
    }

    fn all_cabins(&self) -> DomainResult<Vec<Cabin>> {
        let mut cabins: Vec<Cabin> = self.read()?.cabins.values().cloned().collect();
        cabins.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(cabins)
    }

    fn update_cabin(&self, id: CabinId, patch: CabinPatch) -> DomainResult<Cabin> {
        let mut state = self.write()?;
        let cabin = state
            .cabins
            .get_mut(&id)
            .ok_or(DomainError::NotFound("cabin"))?;
        cabin.apply(&patch)?;
        Ok(cabin.clone())
    }
}

impl MembershipStore for InMemoryStore {
    fn create_cabin_with_admin(&self, cabin: Cabin, now: DateTime<Utc>) -> DomainResult<Cabin> {
        let mut state = self.write()?;
        if !state.users.contains_key(&cabin.created_by) {
            return Err(DomainError::NotFound("user"));
        }

        let edge = MembershipEdge::new(cabin.created_by, cabin.id, CabinRole::Admin, now);
        state.edges.insert((edge.user_id, edge.cabin_id), edge);
        state.cabins.insert(cabin.id, cabin.clone());
        Ok(cabin)
    }

    fn delete_cabin(&self, cabin_id: CabinId) -> DomainResult<()> {
        let mut state = self.write()?;
        state
            .cabins
            .remove(&cabin_id)
            .ok_or(DomainError::NotFound("cabin"))?;
        state.edges.retain(|(_, c), _| *c != cabin_id);
        state.requests.retain(|r| r.cabin_id != cabin_id);
        Ok(())
    }

    fn submit_request(
        &self,
        cabin_id: CabinId,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> DomainResult<MembershipRequest> {
        let mut state = self.write()?;
        if !state.cabins.contains_key(&cabin_id) {
            return Err(DomainError::NotFound("cabin"));
        }
        if !state.users.contains_key(&user_id) {
            return Err(DomainError::NotFound("user"));
        }
        if state.edges.contains_key(&(user_id, cabin_id)) {
            return Err(DomainError::AlreadyMember);
        }
        let has_pending = state
            .requests
            .iter()
            .any(|r| r.cabin_id == cabin_id && r.user_id == user_id && r.is_pending());
        if has_pending {
            return Err(DomainError::DuplicatePendingRequest);
        }

        let request = MembershipRequest::pending(cabin_id, user_id, now);
        state.requests.push(request);
        Ok(request)
    }

    fn resolve_request(
        &self,
        cabin_id: CabinId,
        user_id: UserId,
        approve: bool,
        now: DateTime<Utc>,
    ) -> DomainResult<MembershipRequest> {
        let mut state = self.write()?;

        // Update-if-still-pending: a concurrent resolver that got here first
        // leaves no pending record to find.
        let request = state
            .requests
            .iter_mut()
            .find(|r| r.cabin_id == cabin_id && r.user_id == user_id && r.is_pending())
            .ok_or(DomainError::RequestNotFound)?;
        request.resolve(approve)?;
        let resolved = *request;

        if approve {
            let edge = MembershipEdge::new(user_id, cabin_id, CabinRole::Member, now);
            state.edges.insert((user_id, cabin_id), edge);
        }
        Ok(resolved)
    }

    fn remove_member(&self, cabin_id: CabinId, user_id: UserId) -> DomainResult<MembershipEdge> {
        let mut state = self.write()?;
        state
            .edges
            .remove(&(user_id, cabin_id))
            .ok_or(DomainError::MemberNotFound)
    }

    fn change_role(
        &self,
        cabin_id: CabinId,
        user_id: UserId,
        role: CabinRole,
    ) -> DomainResult<MembershipEdge> {
        let mut state = self.write()?;

        let current = state
            .edges
            .get(&(user_id, cabin_id))
            .copied()
            .ok_or(DomainError::MemberNotFound)?;

        if current.role == CabinRole::Admin && role == CabinRole::Member {
            let admin_count = state
                .edges
                .values()
                .filter(|e| e.cabin_id == cabin_id && e.is_admin())
                .count();
            if admin_count <= 1 {
                return Err(DomainError::LastAdminProtected);
            }
        }

        let edge = state
            .edges
            .get_mut(&(user_id, cabin_id))
            .ok_or(DomainError::MemberNotFound)?;
        edge.role = role;
        Ok(*edge)
    }

    fn edges_for_user(&self, user_id: UserId) -> DomainResult<Vec<MembershipEdge>> {
        let state = self.read()?;
        let mut edges: Vec<MembershipEdge> = state
            .edges
            .values()
            .filter(|e| e.user_id == user_id)
            .copied()
            .collect();
        edges.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(edges)
    }

    fn edges_for_cabin(&self, cabin_id: CabinId) -> DomainResult<Vec<MembershipEdge>> {
        let state = self.read()?;
        let mut edges: Vec<MembershipEdge> = state
            .edges
            .values()
            .filter(|e| e.cabin_id == cabin_id)
            .copied()
            .collect();
        edges.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        Ok(edges)
    }

    fn requests_for_cabin(&self, cabin_id: CabinId) -> DomainResult<Vec<MembershipRequest>> {
        Ok(self
            .read()?
            .requests
            .iter()
            .filter(|r| r.cabin_id == cabin_id)
            .copied()
            .collect())
    }

    fn admin_cabins_of(&self, user_id: UserId) -> DomainResult<Vec<CabinId>> {
        Ok(self
            .read()?
            .edges
            .values()
            .filter(|e| e.user_id == user_id && e.is_admin())
            .map(|e| e.cabin_id)
            .collect())
    }
}

impl NotificationSink for InMemoryStore {
    fn append(
        &self,
        recipient: UserId,
        payload: NotificationPayload,
        now: DateTime<Utc>,
    ) -> DomainResult<NotificationId> {
        let mut state = self.write()?;
        if !state.users.contains_key(&recipient) {
            return Err(DomainError::NotFound("user"));
        }
        let notification = Notification::new(recipient, payload, now);
        let id = notification.id;
        state
            .notifications
            .entry(recipient)
            .or_default()
            .push(notification);
        Ok(id)
    }

    fn for_user(&self, user_id: UserId) -> DomainResult<Vec<Notification>> {
        let state = self.read()?;
        let mut all: Vec<Notification> = state
            .notifications
            .get(&user_id)
            .cloned()
            .unwrap_or_default();
        // Newest first.
        all.reverse();
        Ok(all)
    }

    fn mark_read(&self, user_id: UserId, notification_id: NotificationId) -> DomainResult<()> {
        let mut state = self.write()?;
        if let Some(items) = state.notifications.get_mut(&user_id) {
            if let Some(item) = items.iter_mut().find(|n| n.id == notification_id) {
                item.read = true;
            }
        }
        Ok(())
    }

    fn mark_all_read(&self, user_id: UserId) -> DomainResult<()> {
        let mut state = self.write()?;
        if let Some(items) = state.notifications.get_mut(&user_id) {
            for item in items.iter_mut() {
                item.read = true;
            }
        }
        Ok(())
    }
}
