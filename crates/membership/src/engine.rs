//! Membership lifecycle engine.
//!
//! Orchestrates the request/approve/reject/remove/role-change workflow:
//! authorization gate first, then the atomic store mutation, then
//! best-effort notification fan-out. Notification failures are logged and
//! swallowed; the primary state change never rolls back because an alert
//! could not be appended.

use std::sync::Arc;

use chrono::Utc;

use familycabin_auth::{Action, Actor, CabinRole, GlobalRole, authorize};
use familycabin_cabins::{Cabin, CabinPatch, NewCabin};
use familycabin_core::{CabinId, DomainError, DomainResult, UserId};
use familycabin_notifications::NotificationPayload;

use crate::{CabinStore, IdentityStore, MembershipEdge, MembershipRequest, MembershipStore,
            NotificationSink, RequestStatus};

pub struct LifecycleEngine {
    identity: Arc<dyn IdentityStore>,
    cabins: Arc<dyn CabinStore>,
    membership: Arc<dyn MembershipStore>,
    notifications: Arc<dyn NotificationSink>,
}

impl LifecycleEngine {
    pub fn new(
        identity: Arc<dyn IdentityStore>,
        cabins: Arc<dyn CabinStore>,
        membership: Arc<dyn MembershipStore>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            identity,
            cabins,
            membership,
            notifications,
        }
    }

    /// Build the authorization view of a user: identity plus the cabins they
    /// currently administer, read fresh from the membership store.
    pub fn actor_for(&self, user_id: UserId, global_role: GlobalRole) -> DomainResult<Actor> {
        let admin_of = self.membership.admin_cabins_of(user_id)?;
        Ok(Actor::new(user_id, global_role).with_admin_of(admin_of))
    }

    /// Create a cabin; the creator becomes its first Admin member atomically
    /// with creation.
    pub fn create_cabin(&self, actor: &Actor, input: NewCabin) -> DomainResult<Cabin> {
        let now = Utc::now();
        let cabin = input.into_cabin(actor.user_id, now)?;
        let cabin = self.membership.create_cabin_with_admin(cabin, now)?;
        tracing::info!(cabin_id = %cabin.id, created_by = %actor.user_id, "cabin created");
        Ok(cabin)
    }

    /// Merge editable cabin fields. Cabin-admin (or global-admin) only.
    pub fn update_cabin(
        &self,
        actor: &Actor,
        cabin_id: CabinId,
        patch: CabinPatch,
    ) -> DomainResult<Cabin> {
        self.require_cabin(cabin_id)?;
        authorize(actor, &Action::ManageCabin(cabin_id))?;
        self.cabins.update_cabin(cabin_id, patch)
    }

    /// Delete a cabin and every membership/request trace of it, atomically.
    pub fn delete_cabin(&self, actor: &Actor, cabin_id: CabinId) -> DomainResult<()> {
        self.require_cabin(cabin_id)?;
        authorize(actor, &Action::ManageCabin(cabin_id))?;
        self.membership.delete_cabin(cabin_id)?;
        tracing::info!(%cabin_id, actor = %actor.user_id, "cabin deleted");
        Ok(())
    }

    /// `None → Requested`: append a pending request and alert every current
    /// cabin admin.
    pub fn request_membership(&self, actor: &Actor, cabin_id: CabinId) -> DomainResult<()> {
        let admins: Vec<UserId> = self
            .membership
            .edges_for_cabin(cabin_id)?
            .into_iter()
            .filter(MembershipEdge::is_admin)
            .map(|e| e.user_id)
            .collect();

        self.membership
            .submit_request(cabin_id, actor.user_id, Utc::now())?;
        tracing::info!(%cabin_id, user_id = %actor.user_id, "membership requested");

        for admin in admins {
            self.notify(
                admin,
                NotificationPayload::Invite {
                    cabin_id,
                    requester_id: actor.user_id,
                },
            );
        }
        Ok(())
    }

    /// `Requested → Member`: conditional transition plus Member-edge insert,
    /// both in one critical section. A concurrent second approval observes
    /// `RequestNotFound`.
    pub fn approve_request(
        &self,
        actor: &Actor,
        cabin_id: CabinId,
        user_id: UserId,
    ) -> DomainResult<MembershipRequest> {
        self.resolve(actor, cabin_id, user_id, true)
    }

    /// `Requested → Rejected`: no edge is inserted; the user may request
    /// again later, creating a new record.
    pub fn reject_request(
        &self,
        actor: &Actor,
        cabin_id: CabinId,
        user_id: UserId,
    ) -> DomainResult<MembershipRequest> {
        self.resolve(actor, cabin_id, user_id, false)
    }

    fn resolve(
        &self,
        actor: &Actor,
        cabin_id: CabinId,
        user_id: UserId,
        approve: bool,
    ) -> DomainResult<MembershipRequest> {
        self.require_cabin(cabin_id)?;
        authorize(actor, &Action::ManageCabin(cabin_id))?;

        let request = self
            .membership
            .resolve_request(cabin_id, user_id, approve, Utc::now())?;
        debug_assert!(request.status.is_terminal());
        tracing::info!(
            %cabin_id,
            %user_id,
            status = %request.status,
            actor = %actor.user_id,
            "membership request resolved"
        );

        self.notify(
            user_id,
            NotificationPayload::Approval {
                cabin_id,
                approved: approve,
            },
        );
        Ok(request)
    }

    /// `Member → None`: delete the edge. Past request history is untouched.
    pub fn remove_member(
        &self,
        actor: &Actor,
        cabin_id: CabinId,
        user_id: UserId,
    ) -> DomainResult<()> {
        self.require_cabin(cabin_id)?;
        authorize(actor, &Action::ManageCabin(cabin_id))?;
        self.membership.remove_member(cabin_id, user_id)?;
        tracing::info!(%cabin_id, %user_id, actor = %actor.user_id, "member removed");

        self.notify(user_id, NotificationPayload::Removal { cabin_id });
        Ok(())
    }

    /// Side transition while a member: Admin ⇄ Member. Refuses to leave the
    /// cabin with zero admins (`LastAdminProtected`).
    pub fn change_role(
        &self,
        actor: &Actor,
        cabin_id: CabinId,
        user_id: UserId,
        role: CabinRole,
    ) -> DomainResult<MembershipEdge> {
        self.require_cabin(cabin_id)?;
        authorize(actor, &Action::ManageCabin(cabin_id))?;
        let edge = self.membership.change_role(cabin_id, user_id, role)?;
        tracing::info!(%cabin_id, %user_id, role = %role, actor = %actor.user_id, "member role changed");

        self.notify(user_id, NotificationPayload::RoleChange { cabin_id, role });
        Ok(edge)
    }

    /// Pending requests for a cabin, for its admins' review screens.
    pub fn pending_requests(
        &self,
        actor: &Actor,
        cabin_id: CabinId,
    ) -> DomainResult<Vec<MembershipRequest>> {
        self.require_cabin(cabin_id)?;
        authorize(actor, &Action::ManageCabin(cabin_id))?;
        Ok(self
            .membership
            .requests_for_cabin(cabin_id)?
            .into_iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .collect())
    }

    fn require_cabin(&self, cabin_id: CabinId) -> DomainResult<()> {
        self.cabins
            .cabin_by_id(cabin_id)?
            .map(|_| ())
            .ok_or(DomainError::NotFound("cabin"))
    }

    /// Best-effort append: never fails the caller's primary operation.
    fn notify(&self, recipient: UserId, payload: NotificationPayload) {
        if let Err(err) = self.notifications.append(recipient, payload, Utc::now()) {
            tracing::warn!(%recipient, error = %err, "notification append failed, continuing");
        }
    }

    pub fn identity(&self) -> &dyn IdentityStore {
        self.identity.as_ref()
    }

    pub fn cabins(&self) -> &dyn CabinStore {
        self.cabins.as_ref()
    }

    pub fn membership(&self) -> &dyn MembershipStore {
        self.membership.as_ref()
    }

    pub fn notifications(&self) -> &dyn NotificationSink {
        self.notifications.as_ref()
    }
}
