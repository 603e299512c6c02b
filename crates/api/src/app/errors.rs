use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use familycabin_core::DomainError;

/// Map a domain error to its HTTP response.
///
/// Auth failures stay generic; conflict failures carry the actionable
/// message. Infrastructure details are never forwarded verbatim.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotAuthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "not_authenticated",
            "authentication required",
        ),
        DomainError::NotAuthorized => {
            json_error(StatusCode::FORBIDDEN, "forbidden", "not authorized")
        }
        DomainError::NotFound(_) | DomainError::RequestNotFound | DomainError::MemberNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        DomainError::DuplicateIdentity
        | DomainError::AlreadyMember
        | DomainError::DuplicatePendingRequest
        | DomainError::LastAdminProtected => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        DomainError::InvalidRole(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_role", err.to_string())
        }
        DomainError::Validation(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        DomainError::InvalidId(_) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_id", err.to_string())
        }
        DomainError::Infrastructure(detail) => {
            tracing::error!(%detail, "infrastructure failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
