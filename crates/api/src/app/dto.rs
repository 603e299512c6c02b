//! Request DTOs and JSON view helpers.
//!
//! Views are built here so every route renders an entity the same way.
//! Notification text is rendered at this boundary: the engine stores the
//! structured payload and the names are looked up at read time.

use serde::Deserialize;
use serde_json::{Value, json};

use familycabin_cabins::Cabin;
use familycabin_identity::User;
use familycabin_membership::{LifecycleEngine, MembershipEdge, MembershipRequest};
use familycabin_notifications::{Notification, NotificationPayload, render};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: String,
}

// -------------------------
// JSON views
// -------------------------

pub fn user_json(user: &User) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email,
        "name": user.name,
        "address": user.address,
        "bio": user.bio,
        "member_since": user.member_since,
        "role": user.role,
    })
}

pub fn cabin_json(cabin: &Cabin) -> Value {
    json!({
        "id": cabin.id,
        "name": cabin.name,
        "description": cabin.description,
        "location": cabin.location,
        "image": cabin.image,
        "created_by": cabin.created_by,
        "created_at": cabin.created_at,
    })
}

pub fn member_json(edge: &MembershipEdge, username: Option<&str>) -> Value {
    json!({
        "user_id": edge.user_id,
        "username": username,
        "role": edge.role,
        "joined_at": edge.joined_at,
    })
}

pub fn request_json(request: &MembershipRequest, username: Option<&str>) -> Value {
    json!({
        "id": request.id,
        "user_id": request.user_id,
        "username": username,
        "cabin_id": request.cabin_id,
        "status": request.status,
        "requested_at": request.requested_at,
    })
}

/// Render a notification for its owner, resolving cabin and requester names.
/// A failed lookup (entity since deleted) falls back to neutral wording.
pub fn notification_json(engine: &LifecycleEngine, notification: &Notification) -> Value {
    let cabin_id = notification.payload.cabin_id();
    let cabin_name = engine
        .cabins()
        .cabin_by_id(cabin_id)
        .ok()
        .flatten()
        .map(|c| c.name);

    let requester_name = match notification.payload {
        NotificationPayload::Invite { requester_id, .. } => engine
            .identity()
            .user_by_id(requester_id)
            .ok()
            .flatten()
            .map(|u| u.username),
        _ => None,
    };

    let message = render(
        &notification.payload,
        cabin_name.as_deref(),
        requester_name.as_deref(),
    );

    json!({
        "id": notification.id,
        "kind": notification.payload.kind(),
        "message": message,
        "cabin_id": cabin_id,
        "created_at": notification.created_at,
        "read": notification.read,
    })
}
