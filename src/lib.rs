pub mod bootstrap;
pub mod handlers;
pub mod middleware;
pub mod migrations;
pub mod models;
pub mod routes;
pub mod services;
pub mod templates;
pub mod utils;

use sea_orm::DatabaseConnection;
pub use utils::AppConfig;

/// Application shared state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}
