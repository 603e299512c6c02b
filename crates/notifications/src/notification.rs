use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use familycabin_auth::CabinRole;
use familycabin_core::{CabinId, NotificationId, UserId};

/// What happened, as structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// Someone asked to join a cabin the recipient administers.
    Invite {
        cabin_id: CabinId,
        requester_id: UserId,
    },
    /// The recipient's membership request was resolved.
    Approval { cabin_id: CabinId, approved: bool },
    /// The recipient was removed from a cabin.
    Removal { cabin_id: CabinId },
    /// The recipient's role in a cabin changed.
    RoleChange { cabin_id: CabinId, role: CabinRole },
}

impl NotificationPayload {
    pub fn cabin_id(&self) -> CabinId {
        match self {
            NotificationPayload::Invite { cabin_id, .. }
            | NotificationPayload::Approval { cabin_id, .. }
            | NotificationPayload::Removal { cabin_id }
            | NotificationPayload::RoleChange { cabin_id, .. } => *cabin_id,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationPayload::Invite { .. } => NotificationKind::Invite,
            NotificationPayload::Approval { .. } => NotificationKind::Approval,
            NotificationPayload::Removal { .. } | NotificationPayload::RoleChange { .. } => {
                NotificationKind::System
            }
        }
    }
}

/// Coarse wire category (`INVITE` | `APPROVAL` | `SYSTEM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Invite,
    Approval,
    System,
}

/// A single per-user notification record.
///
/// Append-only: after creation only `read` ever mutates, and only by the
/// owning user's own action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient: UserId,
    pub payload: NotificationPayload,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl Notification {
    pub fn new(recipient: UserId, payload: NotificationPayload, now: DateTime<Utc>) -> Self {
        Self {
            id: NotificationId::new(),
            recipient,
            payload,
            created_at: now,
            read: false,
        }
    }
}

/// Render display text for a payload.
///
/// Name lookups happen at the boundary; a `None` name means the referenced
/// entity has since been deleted and a neutral fallback is used.
pub fn render(
    payload: &NotificationPayload,
    cabin_name: Option<&str>,
    requester_name: Option<&str>,
) -> String {
    let cabin = cabin_name.unwrap_or("a cabin");
    match payload {
        NotificationPayload::Invite { .. } => {
            let requester = requester_name.unwrap_or("Someone");
            format!("{requester} has requested to join {cabin}")
        }
        NotificationPayload::Approval { approved: true, .. } => {
            format!("Your request to join {cabin} has been approved")
        }
        NotificationPayload::Approval {
            approved: false, ..
        } => {
            format!("Your request to join {cabin} has been rejected")
        }
        NotificationPayload::Removal { .. } => {
            format!("You have been removed from {cabin}")
        }
        NotificationPayload::RoleChange { role, .. } => {
            format!("Your role in {cabin} has been changed to {role}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invite_renders_requester_and_cabin() {
        let payload = NotificationPayload::Invite {
            cabin_id: CabinId::new(),
            requester_id: UserId::new(),
        };
        assert_eq!(
            render(&payload, Some("Pine Lake"), Some("alice")),
            "alice has requested to join Pine Lake"
        );
    }

    #[test]
    fn rejection_wording_differs_from_approval() {
        let cabin_id = CabinId::new();
        let approved = NotificationPayload::Approval {
            cabin_id,
            approved: true,
        };
        let rejected = NotificationPayload::Approval {
            cabin_id,
            approved: false,
        };
        assert!(render(&approved, Some("Pine Lake"), None).contains("approved"));
        assert!(render(&rejected, Some("Pine Lake"), None).contains("rejected"));
    }

    #[test]
    fn deleted_cabin_gets_neutral_fallback() {
        let payload = NotificationPayload::Removal {
            cabin_id: CabinId::new(),
        };
        assert_eq!(render(&payload, None, None), "You have been removed from a cabin");
    }

    #[test]
    fn kinds_follow_wire_categories() {
        let cabin_id = CabinId::new();
        assert_eq!(
            NotificationPayload::Invite {
                cabin_id,
                requester_id: UserId::new()
            }
            .kind(),
            NotificationKind::Invite
        );
        assert_eq!(
            NotificationPayload::RoleChange {
                cabin_id,
                role: CabinRole::Admin
            }
            .kind(),
            NotificationKind::System
        );
    }
}
