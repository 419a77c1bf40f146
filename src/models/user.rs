use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validator::PHONE_REGEX;

/// User database entity model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Database-assigned user identifier
    #[sea_orm(primary_key)]
    pub id: i32,

    /// User display name
    pub name: String,

    /// User email address (unique)
    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 hashed password
    pub password_hash: String,

    /// Contact phone number, may be empty
    pub phone: String,

    /// Account creation timestamp
    pub created_at: DateTimeUtc,

    /// Last update timestamp
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// User creation input
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 255, message = "name must be 1 to 255 characters"))]
    pub name: String,

    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "email is too long")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    #[validate(
        regex(path = *PHONE_REGEX, message = "phone may only contain digits, spaces and +()-"),
        length(max = 64, message = "phone is too long")
    )]
    pub phone: String,
}

/// User update input
///
/// Absent or empty fields leave the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(max = 255, message = "name is too long"))]
    pub name: Option<String>,

    pub password: Option<String>,

    #[validate(
        regex(path = *PHONE_REGEX, message = "phone may only contain digits, spaces and +()-"),
        length(max = 64, message = "phone is too long")
    )]
    pub phone: Option<String>,
}

impl UpdateUserInput {
    /// Update touching only the name
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// User response (without sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
