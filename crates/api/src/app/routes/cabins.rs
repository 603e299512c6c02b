use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use familycabin_cabins::{CabinPatch, NewCabin};
use familycabin_core::CabinId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

pub async fn list_cabins(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.engine.cabins().all_cabins() {
        Ok(cabins) => {
            let views: Vec<_> = cabins.iter().map(dto::cabin_json).collect();
            Json(views).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Cabin detail: record plus the member list derived from the membership
/// store, with usernames resolved.
pub async fn get_cabin(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let cabin_id: CabinId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cabin id");
        }
    };

    let cabin = match services.engine.cabins().cabin_by_id(cabin_id) {
        Ok(Some(c)) => c,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "cabin not found");
        }
        Err(e) => return errors::domain_error_to_response(e),
    };

    let edges = match services.engine.membership().edges_for_cabin(cabin_id) {
        Ok(edges) => edges,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let members: Vec<_> = edges
        .iter()
        .map(|edge| {
            let username = services
                .engine
                .identity()
                .user_by_id(edge.user_id)
                .ok()
                .flatten()
                .map(|u| u.username);
            dto::member_json(edge, username.as_deref())
        })
        .collect();

    let mut view = dto::cabin_json(&cabin);
    view["members"] = serde_json::Value::Array(members);
    Json(view).into_response()
}

pub async fn create_cabin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Json(body): Json<NewCabin>,
) -> axum::response::Response {
    let actor = match services.actor(&ctx) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.engine.create_cabin(&actor, body) {
        Ok(cabin) => (StatusCode::CREATED, Json(dto::cabin_json(&cabin))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_cabin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
    Json(patch): Json<CabinPatch>,
) -> axum::response::Response {
    let cabin_id: CabinId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cabin id");
        }
    };
    let actor = match services.actor(&ctx) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.engine.update_cabin(&actor, cabin_id, patch) {
        Ok(cabin) => Json(dto::cabin_json(&cabin)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_cabin(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let cabin_id: CabinId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cabin id");
        }
    };
    let actor = match services.actor(&ctx) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.engine.delete_cabin(&actor, cabin_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
