use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use familycabin_core::NotificationId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

/// The caller's notifications, newest first, rendered for display.
pub async fn list_notifications(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    match services.engine.notifications().for_user(actor.user_id()) {
        Ok(notifications) => {
            let views: Vec<_> = notifications
                .iter()
                .map(|n| dto::notification_json(&services.engine, n))
                .collect();
            Json(views).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn mark_read(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let notification_id: NotificationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid notification id",
            );
        }
    };

    match services
        .engine
        .notifications()
        .mark_read(actor.user_id(), notification_id)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn mark_all_read(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    match services.engine.notifications().mark_all_read(actor.user_id()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
