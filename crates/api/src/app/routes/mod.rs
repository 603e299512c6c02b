use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

pub mod auth;
pub mod cabins;
pub mod membership;
pub mod notifications;
pub mod system;
pub mod users;

/// Routes reachable without a bearer token.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/cabins", get(cabins::list_cabins))
        .route("/cabins/:id", get(cabins::get_cabin))
}

/// Routes behind the auth middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/users", get(users::list_users))
        .route("/users/me", get(users::me).patch(users::update_me))
        .route("/users/:id", get(users::get_user))
        .route("/cabins", post(cabins::create_cabin))
        .route(
            "/cabins/:id",
            patch(cabins::update_cabin).delete(cabins::delete_cabin),
        )
        .route("/me/cabins", get(membership::my_cabins))
        .route(
            "/cabins/:id/requests",
            post(membership::request_membership).get(membership::pending_requests),
        )
        .route(
            "/cabins/:id/requests/:user_id/approve",
            post(membership::approve_request),
        )
        .route(
            "/cabins/:id/requests/:user_id/reject",
            post(membership::reject_request),
        )
        .route(
            "/cabins/:id/members/:user_id",
            delete(membership::remove_member),
        )
        .route(
            "/cabins/:id/members/:user_id/role",
            put(membership::change_role),
        )
        .route("/me/notifications", get(notifications::list_notifications))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route("/notifications/read-all", post(notifications::mark_all_read))
}
