use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::crud::{create, delete, index, read, search, search_term, update};
use crate::AppState;

/// HTML pages and the form actions behind them
pub fn crud_routes() -> Router<AppState> {
    Router::new()
        .route("/crud", get(index))
        .route("/crud/", get(index))
        .route("/crud/create/", post(create))
        .route("/crud/read/", post(read))
        .route("/crud/update/", post(update))
        .route("/crud/delete/", post(delete))
        .route("/crud/search/", get(search))
        .route("/crud/search/term/", post(search_term))
}
