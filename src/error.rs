/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / AuthError / extractor rejection を統一的に変換
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::DenialPolicy;
use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

/// `{"success": false, "error": 404, "message": "resource not found"}`
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unauthorized: {0}")]
    Unauthorized(AuthError),
    #[error("forbidden: {0}")]
    Forbidden(AuthError),
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable(message.into())
    }

    /// Translate a guard denial according to the configured 401/403 policy.
    pub fn from_auth(err: AuthError, policy: DenialPolicy) -> Self {
        match (err, policy) {
            (AuthError::KeySetUnavailable(_), _) => AppError::Internal,
            (err @ AuthError::PermissionDenied(_), DenialPolicy::Forbidden) => {
                AppError::Forbidden(err)
            }
            (err, _) => AppError::Unauthorized(err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::BadRequest(_) => "bad request".to_string(),
            AppError::Unauthorized(err) | AppError::Forbidden(err) => err.to_string(),
            AppError::NotFound => "resource not found".to_string(),
            AppError::MethodNotAllowed => "method not allowed".to_string(),
            AppError::Unprocessable(_) => "unprocessable".to_string(),
            AppError::Internal => "internal server error".to_string(),
        };

        let body = ErrorResponse {
            success: false,
            error: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::unprocessable("conflict"),
            RepoError::Db(err) => {
                tracing::error!(error = %err, "database error");
                AppError::Internal
            }
        }
    }
}

// Unreadable JSON is a bad request; well-formed JSON with missing or mistyped fields is unprocessable.
impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        match e {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::MissingJsonContentType(_) => {
                AppError::BadRequest(e.body_text())
            }
            _ => AppError::Unprocessable(e.body_text()),
        }
    }
}

// `/drinks/{id}` only matches integer ids
impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{Value, json};

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_body_matches_the_api_shape() {
        let (status, body) = render(AppError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "error": 404, "message": "resource not found"})
        );
    }

    #[tokio::test]
    async fn method_not_allowed_has_a_json_body() {
        let (status, body) = render(AppError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body,
            json!({"success": false, "error": 405, "message": "method not allowed"})
        );
    }

    #[tokio::test]
    async fn auth_denials_carry_kind_specific_messages() {
        let err = AppError::from_auth(AuthError::CredentialExpired, DenialPolicy::Forbidden);
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], 401);
        assert_eq!(body["message"], "token expired");
    }

    #[test]
    fn permission_denied_follows_the_policy() {
        let denied = || AuthError::PermissionDenied("post:drinks".into());

        let split = AppError::from_auth(denied(), DenialPolicy::Forbidden);
        assert_eq!(split.status(), StatusCode::FORBIDDEN);

        let flat = AppError::from_auth(denied(), DenialPolicy::Unauthorized);
        assert_eq!(flat.status(), StatusCode::UNAUTHORIZED);

        let missing = AppError::from_auth(AuthError::PermissionsClaimMissing, DenialPolicy::Forbidden);
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn key_set_outage_is_a_server_error() {
        let err = AppError::from_auth(
            AuthError::KeySetUnavailable("timeout".into()),
            DenialPolicy::Unauthorized,
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
