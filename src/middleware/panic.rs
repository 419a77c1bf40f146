use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Create an internal error response
fn internal_error_response(message: &str) -> Response {
    #[derive(Serialize)]
    struct ErrorBody {
        error: String,
        message: String,
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "internal_error".to_string(),
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Turn a panic raised inside a handler into a JSON 500
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Panic caught in handler: {}", panic_message(payload.as_ref()));
    internal_error_response("An unexpected error occurred")
}

/// Layer that keeps a panicking handler from dropping the connection
pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(handle_panic as PanicHandler)
}

/// Process-wide hook logging every panic with its location
pub fn setup_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let message = panic_message(panic_info.payload());

        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "unknown location".to_string());

        tracing::error!(
            target: "panic",
            message = %message,
            location = %location,
            "Application panic occurred"
        );
    }));

    tracing::info!("Panic hook installed");
}
