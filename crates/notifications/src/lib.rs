//! `familycabin-notifications`: in-app membership event alerts.
//!
//! Notifications are append-only per-user records with a *tagged* payload:
//! the lifecycle engine records what happened (which cabin, which requester,
//! approved or not) and the API boundary renders display text, so the engine
//! never carries presentation strings.

pub mod notification;

pub use notification::{Notification, NotificationKind, NotificationPayload, render};
