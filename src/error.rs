use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Incomplete data provided")]
    IncompleteRecipe,
    #[error("Unprocessable entity")]
    ConstraintViolation,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("User not found")]
    NotFound,

    #[error("Incorrect password")]
    BadPassword,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(ValidationError::IncompleteRecipe) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::DuplicateUsername => StatusCode::CONFLICT,
            ApiError::NotFound | ApiError::BadPassword | ApiError::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Unwrap a JSON request body, answering with `err` instead of axum's
/// plain-text rejection when the body is missing, mistyped, or not JSON.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>, err: ApiError) -> ApiResult<T> {
    body.map(|Json(value)| value).map_err(|rejection| {
        warn!(status = %rejection.status(), reason = %rejection.body_text(), "bad request body");
        err
    })
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation => ApiError::DuplicateUsername,
            StoreError::CheckViolation | StoreError::ForeignKeyViolation => {
                ValidationError::ConstraintViolation.into()
            }
            StoreError::Database(e) => ApiError::Internal(e.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_endpoint_table() {
        assert_eq!(
            ApiError::from(ValidationError::MissingCredentials).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(ValidationError::IncompleteRecipe).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::DuplicateUsername.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::BadPassword.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn store_violations_map_to_user_facing_errors() {
        assert!(matches!(
            ApiError::from(StoreError::UniqueViolation),
            ApiError::DuplicateUsername
        ));
        assert_eq!(
            ApiError::from(StoreError::CheckViolation).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(StoreError::Database(sqlx::Error::PoolTimedOut)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = ApiError::Internal(anyhow::anyhow!("pool exploded")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("pool exploded"));
        assert!(text.contains("Internal server error"));
    }
}
