use axum::{
    extract::{Form, State},
    response::Redirect,
    Json,
};
use maud::Markup;
use serde::Deserialize;

use crate::models::user::{CreateUserInput, UpdateUserInput, UserResponse};
use crate::services::user::{UserError, UserService};
use crate::templates;
use crate::utils::error::ApiError;
use crate::AppState;

/// Where form actions land after a mutation
pub const CRUD_INDEX: &str = "/crud/";

/// Create form fields; missing fields read as empty
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateUserForm {
    name: String,
    email: String,
    password: String,
    phone: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserIdForm {
    userid: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateNameForm {
    userid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    term: String,
}

/// Blank or non-numeric ids match no user
fn parse_user_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Form actions swallow domain failures; storage failures still surface as 500
fn absorb(err: UserError, action: &str) -> Result<(), ApiError> {
    match err {
        UserError::Database(_) | UserError::Internal(_) => Err(err.into()),
        other => {
            tracing::warn!("Form {} skipped: {}", action, other);
            Ok(())
        }
    }
}

/// Users table page
pub async fn index(State(state): State<AppState>) -> Result<Markup, ApiError> {
    let service = UserService::new(state.db.clone());
    let users = service.list_users().await?;

    Ok(templates::crud_page(&users))
}

/// Create a user from the create form
pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CreateUserForm>,
) -> Result<Redirect, ApiError> {
    let service = UserService::new(state.db.clone());
    let result = service
        .create_user(CreateUserInput {
            name: form.name,
            email: form.email,
            password: form.password,
            phone: form.phone,
        })
        .await;

    if let Err(e) = result {
        absorb(e, "create")?;
    }

    Ok(Redirect::to(CRUD_INDEX))
}

/// Table page narrowed to a single user id
pub async fn read(
    State(state): State<AppState>,
    Form(form): Form<UserIdForm>,
) -> Result<Markup, ApiError> {
    let users: Vec<UserResponse> = match parse_user_id(&form.userid) {
        Some(id) => {
            let service = UserService::new(state.db.clone());
            service.get_user(id).await?.into_iter().collect()
        }
        None => Vec::new(),
    };

    Ok(templates::crud_page(&users))
}

/// Rename a user from the update form
pub async fn update(
    State(state): State<AppState>,
    Form(form): Form<UpdateNameForm>,
) -> Result<Redirect, ApiError> {
    if let Some(id) = parse_user_id(&form.userid) {
        let service = UserService::new(state.db.clone());
        if let Err(e) = service.update_user(id, UpdateUserInput::name(form.name)).await {
            absorb(e, "update")?;
        }
    }

    Ok(Redirect::to(CRUD_INDEX))
}

/// Delete a user from the delete form
pub async fn delete(
    State(state): State<AppState>,
    Form(form): Form<UserIdForm>,
) -> Result<Redirect, ApiError> {
    if let Some(id) = parse_user_id(&form.userid) {
        let service = UserService::new(state.db.clone());
        if let Err(e) = service.delete_user(id).await {
            absorb(e, "delete")?;
        }
    }

    Ok(Redirect::to(CRUD_INDEX))
}

/// Search page
pub async fn search() -> Markup {
    templates::search_page()
}

/// Case-insensitive substring search over name and email
pub async fn search_term(
    State(state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let service = UserService::new(state.db.clone());
    let users = service.search_users(&payload.term).await?;

    Ok(Json(users))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_id() {
        assert_eq!(parse_user_id("4"), Some(4));
        assert_eq!(parse_user_id(" 12 "), Some(12));
        assert_eq!(parse_user_id(""), None);
        assert_eq!(parse_user_id("four"), None);
    }

    #[test]
    fn test_absorb_domain_errors() {
        assert!(absorb(UserError::NotFound("3".to_string()), "delete").is_ok());
        assert!(absorb(UserError::DuplicateEmail("a@b.org".to_string()), "create").is_ok());
    }

    #[test]
    fn test_absorb_propagates_storage_errors() {
        let err = UserError::Database(sea_orm::DbErr::Custom("disk full".to_string()));
        assert!(matches!(absorb(err, "create"), Err(ApiError::Internal(_))));
    }

    #[test]
    fn test_create_form_missing_fields_are_empty() {
        let form: CreateUserForm = serde_json::from_str(r#"{ "name": "Pebbles" }"#).unwrap();
        assert_eq!(form.name, "Pebbles");
        assert!(form.email.is_empty());
        assert!(form.phone.is_empty());
    }
}
