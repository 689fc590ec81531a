//! API route definitions.

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use ledgerlock_gateway::ServiceError;
use ledgerlock_shared::error::ErrorBody;

use crate::AppState;

pub mod closing;
pub mod config;
pub mod health;
pub mod periods;
pub mod restriction;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(periods::routes())
        .merge(closing::routes())
        .merge(restriction::routes())
        .merge(config::routes())
}

/// Maps a service error onto the structured JSON error envelope.
pub(crate) fn error_response(err: &ServiceError) -> Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut body = ErrorBody::new(err.error_code(), err.to_string());
    if let Some(details) = err.details() {
        body = body.with_details(details);
    }

    (status, Json(body)).into_response()
}
