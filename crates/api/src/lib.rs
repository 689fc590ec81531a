//! HTTP API layer with Axum routes.
//!
//! Exposes the period closing subsystem to its UI/API callers. The layer
//! is thin: request parsing, service invocation, and the structured JSON
//! error envelope. Authentication happens upstream; requests carry the
//! authenticated user and their resolved roles.

pub mod routes;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ledgerlock_gateway::PeriodClosingService;
use ledgerlock_shared::error::{AppError, ErrorBody};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The period closing service.
    pub service: PeriodClosingService,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .fallback(unknown_route)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Fallback for unmatched paths, keeping the error envelope uniform.
async fn unknown_route() -> impl IntoResponse {
    let err = AppError::NotFound("no such route".to_string());
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::NOT_FOUND);
    (status, Json(ErrorBody::from(&err)))
}
