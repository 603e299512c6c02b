//! Engine-level lifecycle tests against the in-memory store.

use std::sync::Arc;

use chrono::Utc;

use familycabin_auth::{Actor, CabinRole};
use familycabin_cabins::NewCabin;
use familycabin_core::{DomainError, DomainResult, NotificationId, UserId};
use familycabin_identity::{NewUser, User};
use familycabin_infra::InMemoryStore;
use familycabin_membership::{
    IdentityStore, LifecycleEngine, MembershipStore, NotificationSink, RequestStatus,
};
use familycabin_notifications::{Notification, NotificationPayload};

fn setup() -> (Arc<InMemoryStore>, LifecycleEngine) {
    let store = Arc::new(InMemoryStore::new());
    let engine = LifecycleEngine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );
    (store, engine)
}

fn register(store: &InMemoryStore, username: &str) -> User {
    store
        .create_user(NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "password123".to_string(),
            name: username.to_string(),
            address: "1 Lake Rd".to_string(),
            bio: None,
        })
        .unwrap()
}

fn actor_of(engine: &LifecycleEngine, user: &User) -> Actor {
    engine.actor_for(user.id, user.role).unwrap()
}

fn new_cabin(name: &str) -> NewCabin {
    NewCabin {
        name: name.to_string(),
        description: "a cabin".to_string(),
        location: "somewhere".to_string(),
        image: None,
    }
}

#[test]
fn request_approve_notify_round() {
    let (store, engine) = setup();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");

    let cabin = engine
        .create_cabin(&actor_of(&engine, &alice), new_cabin("Lakeside"))
        .unwrap();

    engine
        .request_membership(&actor_of(&engine, &bob), cabin.id)
        .unwrap();

    // The admin got an invite alert naming the requester.
    let alerts = store.for_user(alice.id).unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(
        alerts[0].payload,
        NotificationPayload::Invite {
            cabin_id: cabin.id,
            requester_id: bob.id,
        }
    );

    let resolved = engine
        .approve_request(&actor_of(&engine, &alice), cabin.id, bob.id)
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Approved);

    // Both views show the same edge.
    let from_user = store.edges_for_user(bob.id).unwrap();
    let from_cabin = store.edges_for_cabin(cabin.id).unwrap();
    assert_eq!(from_user.len(), 1);
    assert_eq!(from_user[0].role, CabinRole::Member);
    assert!(from_cabin.iter().any(|e| e.user_id == bob.id));

    // Requester learned of the approval.
    let alerts = store.for_user(bob.id).unwrap();
    assert_eq!(
        alerts[0].payload,
        NotificationPayload::Approval {
            cabin_id: cabin.id,
            approved: true,
        }
    );
}

#[test]
fn second_approval_observes_request_not_found() {
    let (store, engine) = setup();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");

    let cabin = engine
        .create_cabin(&actor_of(&engine, &alice), new_cabin("Lakeside"))
        .unwrap();
    engine
        .request_membership(&actor_of(&engine, &bob), cabin.id)
        .unwrap();

    let admin = actor_of(&engine, &alice);
    engine.approve_request(&admin, cabin.id, bob.id).unwrap();
    assert_eq!(
        engine.approve_request(&admin, cabin.id, bob.id).unwrap_err(),
        DomainError::RequestNotFound
    );
}

#[test]
fn rejection_is_not_a_ban() {
    let (store, engine) = setup();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");

    let cabin = engine
        .create_cabin(&actor_of(&engine, &alice), new_cabin("Lakeside"))
        .unwrap();

    let bob_actor = actor_of(&engine, &bob);
    engine.request_membership(&bob_actor, cabin.id).unwrap();
    engine
        .reject_request(&actor_of(&engine, &alice), cabin.id, bob.id)
        .unwrap();

    // No edge, and a fresh request opens a new record.
    assert!(store.edges_for_user(bob.id).unwrap().is_empty());
    engine.request_membership(&bob_actor, cabin.id).unwrap();

    let requests = store.requests_for_cabin(cabin.id).unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .count(),
        1
    );
}

#[test]
fn member_cannot_request_again() {
    let (store, engine) = setup();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");

    let cabin = engine
        .create_cabin(&actor_of(&engine, &alice), new_cabin("Lakeside"))
        .unwrap();
    let bob_actor = actor_of(&engine, &bob);
    engine.request_membership(&bob_actor, cabin.id).unwrap();
    engine
        .approve_request(&actor_of(&engine, &alice), cabin.id, bob.id)
        .unwrap();

    assert_eq!(
        engine.request_membership(&bob_actor, cabin.id).unwrap_err(),
        DomainError::AlreadyMember
    );
}

#[test]
fn non_admin_cannot_manage_and_global_admin_always_can() {
    let (store, engine) = setup();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");
    let root = register(&store, "root");
    store.promote_to_global_admin(root.id).unwrap();
    let root = store.user_by_id(root.id).unwrap().unwrap();

    let cabin = engine
        .create_cabin(&actor_of(&engine, &alice), new_cabin("Lakeside"))
        .unwrap();
    engine
        .request_membership(&actor_of(&engine, &bob), cabin.id)
        .unwrap();

    // Bob holds no admin edge on this cabin.
    assert_eq!(
        engine
            .approve_request(&actor_of(&engine, &bob), cabin.id, bob.id)
            .unwrap_err(),
        DomainError::NotAuthorized
    );

    // A global admin needs no edge at all.
    engine
        .approve_request(&actor_of(&engine, &root), cabin.id, bob.id)
        .unwrap();
}

#[test]
fn sole_admin_demotion_is_refused_until_another_admin_exists() {
    let (store, engine) = setup();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");

    let cabin = engine
        .create_cabin(&actor_of(&engine, &alice), new_cabin("Lakeside"))
        .unwrap();
    engine
        .request_membership(&actor_of(&engine, &bob), cabin.id)
        .unwrap();
    engine
        .approve_request(&actor_of(&engine, &alice), cabin.id, bob.id)
        .unwrap();

    let admin = actor_of(&engine, &alice);
    assert_eq!(
        engine
            .change_role(&admin, cabin.id, alice.id, CabinRole::Member)
            .unwrap_err(),
        DomainError::LastAdminProtected
    );

    engine
        .change_role(&admin, cabin.id, bob.id, CabinRole::Admin)
        .unwrap();
    engine
        .change_role(&admin, cabin.id, alice.id, CabinRole::Member)
        .unwrap();

    // Bob got both a role-change alert and alice's demotion left one admin.
    let admins = store.admin_cabins_of(bob.id).unwrap();
    assert_eq!(admins, vec![cabin.id]);
}

#[test]
fn delete_cabin_cascades_edges_and_requests() {
    let (store, engine) = setup();
    let alice = register(&store, "alice");
    let bob = register(&store, "bob");

    let cabin = engine
        .create_cabin(&actor_of(&engine, &alice), new_cabin("Lakeside"))
        .unwrap();
    engine
        .request_membership(&actor_of(&engine, &bob), cabin.id)
        .unwrap();

    engine
        .delete_cabin(&actor_of(&engine, &alice), cabin.id)
        .unwrap();

    assert!(store.edges_for_user(alice.id).unwrap().is_empty());
    assert!(store.requests_for_cabin(cabin.id).unwrap().is_empty());
    assert_eq!(
        engine
            .request_membership(&actor_of(&engine, &bob), cabin.id)
            .unwrap_err(),
        DomainError::NotFound("cabin")
    );
}

/// A sink that always fails, to prove alerts are best-effort.
struct FailingSink;

impl NotificationSink for FailingSink {
    fn append(
        &self,
        _recipient: UserId,
        _payload: NotificationPayload,
        _now: chrono::DateTime<Utc>,
    ) -> DomainResult<NotificationId> {
        Err(DomainError::infrastructure("sink down"))
    }

    fn for_user(&self, _user_id: UserId) -> DomainResult<Vec<Notification>> {
        Ok(Vec::new())
    }

    fn mark_read(&self, _user_id: UserId, _id: NotificationId) -> DomainResult<()> {
        Ok(())
    }

    fn mark_all_read(&self, _user_id: UserId) -> DomainResult<()> {
        Ok(())
    }
}

#[test]
fn notification_failure_never_rolls_back_the_mutation() {
    let store = Arc::new(InMemoryStore::new());
    let engine = LifecycleEngine::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(FailingSink),
    );

    let alice = register(&store, "alice");
    let bob = register(&store, "bob");

    let cabin = engine
        .create_cabin(&actor_of(&engine, &alice), new_cabin("Lakeside"))
        .unwrap();
    engine
        .request_membership(&actor_of(&engine, &bob), cabin.id)
        .unwrap();
    engine
        .approve_request(&actor_of(&engine, &alice), cabin.id, bob.id)
        .unwrap();

    // The edge exists even though every append failed.
    assert_eq!(store.edges_for_user(bob.id).unwrap().len(), 1);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// One step of the lifecycle driven against a random (user, cabin) pair.
    #[derive(Debug, Clone, Copy)]
    enum Op {
        Request,
        Approve,
        Reject,
        Remove,
        Promote,
        Demote,
    }

    fn op_strategy() -> impl Strategy<Value = (Op, usize, usize)> {
        (
            prop_oneof![
                Just(Op::Request),
                Just(Op::Approve),
                Just(Op::Reject),
                Just(Op::Remove),
                Just(Op::Promote),
                Just(Op::Demote),
            ],
            0usize..3,
            0usize..2,
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Whatever order operations run in, the store never shows a pending
        /// request next to a member edge, never more than one pending request
        /// per pair, both edge views agree, and a non-empty cabin keeps at
        /// least one admin.
        #[test]
        fn lifecycle_invariants_hold_under_any_sequence(
            ops in proptest::collection::vec(op_strategy(), 1..40)
        ) {
            let (store, engine) = setup();
            let root = register(&store, "root");
            store.promote_to_global_admin(root.id).unwrap();
            let root = store.user_by_id(root.id).unwrap().unwrap();
            let root_actor = actor_of(&engine, &root);

            let users: Vec<User> = ["alice", "bob", "carol"]
                .iter()
                .map(|name| register(&store, name))
                .collect();
            let cabins: Vec<_> = (0..2)
                .map(|i| {
                    engine
                        .create_cabin(&root_actor, new_cabin(&format!("cabin-{i}")))
                        .unwrap()
                })
                .collect();

            for (op, user_idx, cabin_idx) in ops {
                let user = &users[user_idx];
                let cabin_id = cabins[cabin_idx].id;
                // Errors (duplicate request, missing member, guarded
                // demotion) are legal outcomes of a random schedule.
                let _ = match op {
                    Op::Request => engine
                        .request_membership(&actor_of(&engine, user), cabin_id)
                        .map(|_| ()),
                    Op::Approve => engine
                        .approve_request(&root_actor, cabin_id, user.id)
                        .map(|_| ()),
                    Op::Reject => engine
                        .reject_request(&root_actor, cabin_id, user.id)
                        .map(|_| ()),
                    Op::Remove => engine
                        .remove_member(&root_actor, cabin_id, user.id)
                        .map(|_| ()),
                    Op::Promote => engine
                        .change_role(&root_actor, cabin_id, user.id, CabinRole::Admin)
                        .map(|_| ()),
                    Op::Demote => engine
                        .change_role(&root_actor, cabin_id, user.id, CabinRole::Member)
                        .map(|_| ()),
                };
            }

            for cabin in &cabins {
                let edges = store.edges_for_cabin(cabin.id).unwrap();
                let requests = store.requests_for_cabin(cabin.id).unwrap();

                for user in &users {
                    let pending = requests
                        .iter()
                        .filter(|r| r.user_id == user.id && r.status == RequestStatus::Pending)
                        .count();
                    prop_assert!(pending <= 1);

                    let is_member = edges.iter().any(|e| e.user_id == user.id);
                    prop_assert!(!(is_member && pending > 0));

                    let from_user = store
                        .edges_for_user(user.id)
                        .unwrap()
                        .iter()
                        .any(|e| e.cabin_id == cabin.id);
                    prop_assert_eq!(is_member, from_user);
                }

                // The creator's admin edge can only be demoted, never below
                // the last-admin floor.
                if !edges.is_empty() {
                    prop_assert!(edges.iter().any(|e| e.is_admin()));
                }
            }
        }
    }
}
