use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::api::{
    create_user, delete_user, health_check, list_users, update_user, update_user_name,
};
use crate::AppState;

/// JSON resources addressed entirely by path parameters
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/crud/create/{name}/{email}/{password}/{phone}", post(create_user))
        .route("/crud/read/", get(list_users))
        .route("/crud/update/{email}/{name}", put(update_user_name))
        .route("/crud/update/{email}/{name}/{password}/{phone}", put(update_user))
        .route("/crud/delete/{userid}", delete(delete_user))
}
