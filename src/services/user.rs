use crate::models::user::{
    ActiveModel, Column, CreateUserInput, Entity as UserEntity, Model as UserModel,
    UpdateUserInput, UserResponse,
};
use crate::utils::password::hash_password;
use chrono::Utc;
use sea_orm::{
    sea_query::{BinOper, Expr, Func, SimpleExpr},
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, NotSet,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Failures of user persistence operations
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Invalid user data: {0}")]
    Invalid(#[from] ValidationErrors),

    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    /// Carries the id or email that was looked up
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// User service for CRUD operations
pub struct UserService {
    db: DatabaseConnection,
}

/// `lower(column) LIKE lower(pattern)`, both sides folded by the database
fn lower_like(column: Column, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column)))
        .binary(BinOper::Like, Func::lower(Expr::val(pattern.to_string())))
}

/// `None` for absent or empty strings
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl UserService {
    /// Create a new user service
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new user
    pub async fn create_user(&self, input: CreateUserInput) -> Result<UserResponse, UserError> {
        input.validate()?;

        if self.get_user_by_email(&input.email).await?.is_some() {
            return Err(UserError::DuplicateEmail(input.email));
        }

        let password_hash = hash_password(&input.password)?;

        let now = Utc::now();
        let email = input.email.clone();
        let user = ActiveModel {
            id: NotSet,
            name: Set(input.name),
            email: Set(input.email),
            password_hash: Set(password_hash),
            phone: Set(input.phone),
            created_at: Set(now),
            updated_at: Set(now),
        };

        // A concurrent insert can still win the race past the lookup above
        let result = user.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => UserError::DuplicateEmail(email),
            _ => UserError::Database(e),
        })?;

        tracing::info!("User created: {} ({})", result.email, result.id);
        Ok(UserResponse::from(result))
    }

    /// All users in id order
    pub async fn list_users(&self) -> Result<Vec<UserResponse>, UserError> {
        let users = UserEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Get user by ID
    pub async fn get_user(&self, id: i32) -> Result<Option<UserResponse>, UserError> {
        let user = UserEntity::find_by_id(id).one(&self.db).await?;

        Ok(user.map(UserResponse::from))
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserModel>, UserError> {
        let user = UserEntity::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await?;

        Ok(user)
    }

    /// Update the user with the given id
    pub async fn update_user(
        &self,
        id: i32,
        input: UpdateUserInput,
    ) -> Result<UserResponse, UserError> {
        input.validate()?;

        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        self.apply_update(user, input).await
    }

    /// Update the user registered under the given email
    pub async fn update_user_by_email(
        &self,
        email: &str,
        input: UpdateUserInput,
    ) -> Result<UserResponse, UserError> {
        input.validate()?;

        let user = self
            .get_user_by_email(email)
            .await?
            .ok_or_else(|| UserError::NotFound(email.to_string()))?;

        self.apply_update(user, input).await
    }

    async fn apply_update(
        &self,
        user: UserModel,
        input: UpdateUserInput,
    ) -> Result<UserResponse, UserError> {
        let mut active_model: ActiveModel = user.into();

        if let Some(name) = non_empty(input.name) {
            active_model.name = Set(name);
        }
        if let Some(password) = non_empty(input.password) {
            active_model.password_hash = Set(hash_password(&password)?);
        }
        if let Some(phone) = non_empty(input.phone) {
            active_model.phone = Set(phone);
        }
        active_model.updated_at = Set(Utc::now());

        let result = active_model.update(&self.db).await?;

        tracing::info!("User updated: {} ({})", result.email, result.id);
        Ok(UserResponse::from(result))
    }

    /// Delete a user, returning the record as it was
    pub async fn delete_user(&self, id: i32) -> Result<UserResponse, UserError> {
        let user = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(UserError::NotFound(id.to_string()));
        }

        tracing::info!("User deleted: {} ({})", user.email, id);
        Ok(UserResponse::from(user))
    }

    /// Users whose name or email contains `term`, ignoring case
    ///
    /// `%` and `_` in the term act as LIKE wildcards.
    pub async fn search_users(&self, term: &str) -> Result<Vec<UserResponse>, UserError> {
        let pattern = format!("%{}%", term);

        let users = UserEntity::find()
            .filter(
                Condition::any()
                    .add(lower_like(Column::Name, &pattern))
                    .add(lower_like(Column::Email, &pattern)),
            )
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        tracing::debug!("Search for {:?} matched {} users", term, users.len());
        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}
