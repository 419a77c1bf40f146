use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::user::UserError;

/// Status the REST surface answers with when a request was understood but
/// nothing was done (missing record, duplicate email, bad format)
pub const NOT_PROCESSED_STATUS: u16 = 210;

/// Unified API error type for HTTP boundary
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    NotProcessed(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

fn not_processed_status() -> StatusCode {
    StatusCode::from_u16(NOT_PROCESSED_STATUS).unwrap_or(StatusCode::OK)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            ApiError::NotProcessed(_) => (not_processed_status(), "not_processed"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
        });

        (status, body).into_response()
    }
}

// Convert anyhow::Error to ApiError
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        tracing::error!("Internal error: {:?}", err);
        ApiError::Internal(err.to_string())
    }
}

// Convert validator::ValidationErrors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err.to_string())
    }
}

// Convert sea_orm::DbErr to ApiError
impl From<sea_orm::DbErr> for ApiError {
    fn from(err: sea_orm::DbErr) -> Self {
        tracing::error!("Database error: {:?}", err);
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Invalid(e) => ApiError::from(e),
            UserError::DuplicateEmail(email) => {
                ApiError::Conflict(format!("Email already registered: {}", email))
            }
            UserError::NotFound(what) => ApiError::NotFound(format!("User {} not found", what)),
            UserError::Database(e) => ApiError::from(e),
            UserError::Internal(e) => ApiError::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn extract_error_json(response: Response) -> serde_json::Value {
        let body = response.into_body();
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_from_user_error() {
        let errors = crate::models::user::UpdateUserInput {
            phone: Some("call me".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        let response = ApiError::from(UserError::Invalid(errors)).into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = extract_error_json(response).await;
        assert_eq!(json["error"], "validation_error");
        assert!(json["message"].as_str().unwrap().contains("phone"));
    }

    #[tokio::test]
    async fn test_not_processed_response() {
        let response =
            ApiError::NotProcessed("wilma@bedrock.org is not found".to_string()).into_response();

        assert_eq!(response.status().as_u16(), 210);

        let json = extract_error_json(response).await;
        assert_eq!(json["error"], "not_processed");
        assert_eq!(json["message"], "wilma@bedrock.org is not found");
    }

    #[tokio::test]
    async fn test_conflict_from_duplicate_email() {
        let error: ApiError = UserError::DuplicateEmail("fred@bedrock.org".to_string()).into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let json = extract_error_json(response).await;
        assert_eq!(json["error"], "conflict");
        assert!(json["message"].as_str().unwrap().contains("fred@bedrock.org"));
    }

    #[tokio::test]
    async fn test_not_found_from_user_error() {
        let error: ApiError = UserError::NotFound("42".to_string()).into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = extract_error_json(response).await;
        assert_eq!(json["error"], "not_found");
    }

    #[tokio::test]
    async fn test_internal_error_response() {
        let response = ApiError::Internal("Database connection failed".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = extract_error_json(response).await;
        assert_eq!(json["error"], "internal_error");
    }

    #[test]
    fn test_from_anyhow_error() {
        let api_error: ApiError = anyhow::anyhow!("Something went wrong").into();

        match api_error {
            ApiError::Internal(msg) => assert!(msg.contains("Something went wrong")),
            _ => panic!("Expected Internal error"),
        }
    }

    #[test]
    fn test_error_display() {
        let error = ApiError::NotFound("Resource not found".to_string());
        assert_eq!(error.to_string(), "Not found: Resource not found");

        let error = ApiError::NotProcessed("5 is not found".to_string());
        assert_eq!(error.to_string(), "5 is not found");
    }
}
