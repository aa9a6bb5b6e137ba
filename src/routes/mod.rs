//! Router assembly.

mod common;
mod entity;

pub use common::{common_routes_with_ready, WELCOME_MESSAGE};
pub use entity::entity_routes;

use crate::error::AppError;
use crate::response::error_body;
use crate::state::AppState;
use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json, Router};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

async fn fallback() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::NOT_FOUND, Json(error_body("route not found")))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}

/// A panicking handler answers like any other server failure: logged, generic body.
fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    AppError::Unknown(format!("panic: {}", panic_message(&*payload))).into_response()
}

/// Panic recovery, request tracing, permissive CORS.
pub fn with_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Full application: common and entity routes plus the fallback, wrapped in [`with_layers`].
pub fn app(state: AppState) -> Router {
    with_layers(
        Router::new()
            .merge(common_routes_with_ready(state.clone()))
            .merge(entity_routes(state))
            .fallback(fallback),
    )
}
