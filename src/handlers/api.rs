use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::models::user::{CreateUserInput, UpdateUserInput, UserResponse};
use crate::services::user::{UserError, UserService};
use crate::utils::error::ApiError;
use crate::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    tracing::debug!("Health check endpoint called");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn not_found_as_not_processed(err: UserError, key: &str) -> ApiError {
    match err {
        UserError::NotFound(_) => ApiError::NotProcessed(format!("{} is not found", key)),
        other => other.into(),
    }
}

/// Create a user from path segments
pub async fn create_user(
    State(state): State<AppState>,
    Path((name, email, password, phone)): Path<(String, String, String, String)>,
) -> Result<Json<UserResponse>, ApiError> {
    let service = UserService::new(state.db.clone());
    let result = service
        .create_user(CreateUserInput {
            name: name.clone(),
            email: email.clone(),
            password,
            phone,
        })
        .await
        .map_err(|e| match e {
            UserError::Invalid(_) | UserError::DuplicateEmail(_) => {
                tracing::warn!("REST create not processed: {}", e);
                ApiError::NotProcessed(format!(
                    "Processed {}, either a format error or {} is duplicate",
                    name, email
                ))
            }
            other => other.into(),
        })?;

    Ok(Json(result))
}

/// List all users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let service = UserService::new(state.db.clone());
    let users = service.list_users().await?;

    Ok(Json(users))
}

/// Rename the user registered under `email`
pub async fn update_user_name(
    State(state): State<AppState>,
    Path((email, name)): Path<(String, String)>,
) -> Result<Json<UserResponse>, ApiError> {
    let service = UserService::new(state.db.clone());
    let result = service
        .update_user_by_email(&email, UpdateUserInput::name(name))
        .await
        .map_err(|e| not_found_as_not_processed(e, &email))?;

    Ok(Json(result))
}

/// Replace name, password and phone of the user registered under `email`
pub async fn update_user(
    State(state): State<AppState>,
    Path((email, name, password, phone)): Path<(String, String, String, String)>,
) -> Result<Json<UserResponse>, ApiError> {
    let service = UserService::new(state.db.clone());
    let result = service
        .update_user_by_email(
            &email,
            UpdateUserInput {
                name: Some(name),
                password: Some(password),
                phone: Some(phone),
            },
        )
        .await
        .map_err(|e| not_found_as_not_processed(e, &email))?;

    Ok(Json(result))
}

/// Delete a user, answering with the record as it was
pub async fn delete_user(
    State(state): State<AppState>,
    Path(userid): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let service = UserService::new(state.db.clone());
    let result = service
        .delete_user(userid)
        .await
        .map_err(|e| not_found_as_not_processed(e, &userid.to_string()))?;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let Json(health) = health_check().await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_not_found_maps_to_not_processed() {
        let err = not_found_as_not_processed(
            UserError::NotFound("wilma@bedrock.org".to_string()),
            "wilma@bedrock.org",
        );
        match err {
            ApiError::NotProcessed(msg) => assert_eq!(msg, "wilma@bedrock.org is not found"),
            other => panic!("Expected NotProcessed, got {:?}", other),
        }
    }

    #[test]
    fn test_other_errors_keep_their_kind() {
        let err = not_found_as_not_processed(
            UserError::DuplicateEmail("fred@bedrock.org".to_string()),
            "fred@bedrock.org",
        );
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
