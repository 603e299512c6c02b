use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use familycabin_auth::{Action, authorize};
use familycabin_core::UserId;
use familycabin_identity::UserPatch;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    match services.engine.identity().user_by_id(actor.user_id()) {
        Ok(Some(user)) => Json(dto::user_json(&user)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
    Json(patch): Json<UserPatch>,
) -> axum::response::Response {
    match services.engine.identity().update_user(actor.user_id(), patch) {
        Ok(user) => Json(dto::user_json(&user)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Global admin only.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
) -> axum::response::Response {
    let actor = match services.actor(&ctx) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = authorize(&actor, &Action::ListUsers) {
        return errors::domain_error_to_response(e);
    }

    match services.engine.identity().all_users() {
        Ok(users) => {
            let views: Vec<_> = users.iter().map(dto::user_json).collect();
            Json(views).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let user_id: UserId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"),
    };

    match services.engine.identity().user_by_id(user_id) {
        Ok(Some(user)) => Json(dto::user_json(&user)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(e) => errors::domain_error_to_response(e),
    }
}
