use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use familycabin_auth::AuthClaims;
use familycabin_identity::{NewUser, User};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<NewUser>,
) -> axum::response::Response {
    let user = match services.engine.identity().create_user(body) {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    match token_response(&services, &user) {
        Ok(body) => (StatusCode::CREATED, Json(body)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services
        .engine
        .identity()
        .verify_credentials(&body.username, &body.password)
    {
        Ok(u) => u,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match token_response(&services, &user) {
        Ok(body) => Json(body).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn token_response(
    services: &AppServices,
    user: &User,
) -> Result<serde_json::Value, familycabin_core::DomainError> {
    let claims = AuthClaims::issue(
        user.id,
        user.username.clone(),
        user.email.clone(),
        user.role,
        Utc::now(),
    );
    let token = services.jwt.issue(&claims)?;

    Ok(serde_json::json!({
        "token": token,
        "user": dto::user_json(user),
    }))
}
