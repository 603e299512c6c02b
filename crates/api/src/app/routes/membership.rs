use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use familycabin_auth::CabinRole;
use familycabin_core::{CabinId, UserId};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::ActorContext;

/// The caller's memberships: cabin record plus their role and join date.
pub async fn my_cabins(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<ActorContext>,
) -> axum::response::Response {
    let edges = match services.engine.membership().edges_for_user(actor.user_id()) {
        Ok(edges) => edges,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut views = Vec::with_capacity(edges.len());
    for edge in &edges {
        let cabin = match services.engine.cabins().cabin_by_id(edge.cabin_id) {
            Ok(Some(c)) => c,
            // Edge cascade on cabin delete makes this unreachable, but a
            // stale read is no reason to fail the whole listing.
            Ok(None) => continue,
            Err(e) => return errors::domain_error_to_response(e),
        };
        views.push(serde_json::json!({
            "cabin": dto::cabin_json(&cabin),
            "role": edge.role,
            "joined_at": edge.joined_at,
        }));
    }

    Json(views).into_response()
}

pub async fn request_membership(
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

    match services.engine.request_membership(&actor, cabin_id) {
        Ok(()) => StatusCode::CREATED.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Pending requests for a cabin; its admins only.
pub async fn pending_requests(
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

    let requests = match services.engine.pending_requests(&actor, cabin_id) {
        Ok(rs) => rs,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let views: Vec<_> = requests
        .iter()
        .map(|request| {
            let username = services
                .engine
                .identity()
                .user_by_id(request.user_id)
                .ok()
                .flatten()
                .map(|u| u.username);
            dto::request_json(request, username.as_deref())
        })
        .collect();

    Json(views).into_response()
}

pub async fn approve_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path((id, user_id)): Path<(String, String)>,
) -> axum::response::Response {
    resolve(services, ctx, id, user_id, true)
}

pub async fn reject_request(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path((id, user_id)): Path<(String, String)>,
) -> axum::response::Response {
    resolve(services, ctx, id, user_id, false)
}

fn resolve(
    services: Arc<AppServices>,
    ctx: ActorContext,
    cabin_id: String,
    user_id: String,
    approve: bool,
) -> axum::response::Response {
    let (cabin_id, user_id) = match parse_pair(&cabin_id, &user_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let actor = match services.actor(&ctx) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let result = if approve {
        services.engine.approve_request(&actor, cabin_id, user_id)
    } else {
        services.engine.reject_request(&actor, cabin_id, user_id)
    };

    match result {
        Ok(request) => Json(dto::request_json(&request, None)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path((id, user_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (cabin_id, user_id) = match parse_pair(&id, &user_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let actor = match services.actor(&ctx) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.engine.remove_member(&actor, cabin_id, user_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn change_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<ActorContext>,
    Path((id, user_id)): Path<(String, String)>,
    Json(body): Json<dto::ChangeRoleRequest>,
) -> axum::response::Response {
    let (cabin_id, user_id) = match parse_pair(&id, &user_id) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let role: CabinRole = match body.role.parse() {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };
    let actor = match services.actor(&ctx) {
        Ok(a) => a,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.engine.change_role(&actor, cabin_id, user_id, role) {
        Ok(edge) => Json(dto::member_json(&edge, None)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn parse_pair(
    cabin_id: &str,
    user_id: &str,
) -> Result<(CabinId, UserId), axum::response::Response> {
    let cabin_id: CabinId = cabin_id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid cabin id")
    })?;
    let user_id: UserId = user_id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id")
    })?;
    Ok((cabin_id, user_id))
}
