//! Period lifecycle routes: close, reopen, permanently close.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use ledgerlock_shared::types::{CompanyId, PeriodId};

use crate::AppState;
use crate::routes::error_response;

/// Creates the lifecycle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/periods/{period_id}/close", post(close_period))
        .route("/periods/{period_id}/reopen", post(reopen_period))
        .route(
            "/periods/{period_id}/permanently-close",
            post(permanently_close_period),
        )
}

/// Request body for closing a period.
#[derive(Debug, Deserialize)]
pub struct ClosePeriodRequest {
    /// Company the period belongs to.
    pub company_id: CompanyId,
    /// Skip the pre-close validation checklist.
    #[serde(default)]
    pub force: bool,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    pub roles: Vec<String>,
}

/// Request body for reopening a period.
#[derive(Debug, Deserialize)]
pub struct ReopenPeriodRequest {
    /// Company the period belongs to.
    pub company_id: CompanyId,
    /// Why the period is being reopened. Required.
    pub reason: String,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    pub roles: Vec<String>,
}

/// Request body for permanently closing a period.
#[derive(Debug, Deserialize)]
pub struct PermanentClosePeriodRequest {
    /// Company the period belongs to.
    pub company_id: CompanyId,
    /// Must be the exact literal "PERMANENT".
    pub confirmation: String,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    pub roles: Vec<String>,
}

/// POST `/periods/{period_id}/close` - Close an open period.
async fn close_period(
    State(state): State<AppState>,
    Path(period_id): Path<PeriodId>,
    Json(payload): Json<ClosePeriodRequest>,
) -> impl IntoResponse {
    match state
        .service
        .close(
            period_id,
            payload.company_id,
            &payload.user,
            &payload.roles,
            payload.force,
        )
        .await
    {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Period closed successfully",
                "data": {
                    "period": outcome.period,
                    "closing_entry": outcome.closing_entry,
                    "account_balances": outcome.account_balances,
                },
            })),
        )
            .into_response(),
        Err(e) => {
            error!(period_id = %period_id, error = %e, "Failed to close period");
            error_response(&e)
        }
    }
}

/// POST `/periods/{period_id}/reopen` - Reopen a closed period.
async fn reopen_period(
    State(state): State<AppState>,
    Path(period_id): Path<PeriodId>,
    Json(payload): Json<ReopenPeriodRequest>,
) -> impl IntoResponse {
    match state
        .service
        .reopen(
            period_id,
            payload.company_id,
            &payload.user,
            &payload.roles,
            payload.reason,
        )
        .await
    {
        Ok(period) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Period reopened successfully",
                "data": { "period": period },
            })),
        )
            .into_response(),
        Err(e) => {
            error!(period_id = %period_id, error = %e, "Failed to reopen period");
            error_response(&e)
        }
    }
}

/// POST `/periods/{period_id}/permanently-close` - Permanently close a
/// closed period. Irreversible.
async fn permanently_close_period(
    State(state): State<AppState>,
    Path(period_id): Path<PeriodId>,
    Json(payload): Json<PermanentClosePeriodRequest>,
) -> impl IntoResponse {
    match state
        .service
        .permanently_close(
            period_id,
            payload.company_id,
            &payload.user,
            &payload.roles,
            &payload.confirmation,
        )
        .await
    {
        Ok(period) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Period permanently closed",
                "data": { "period": period },
            })),
        )
            .into_response(),
        Err(e) => {
            error!(period_id = %period_id, error = %e, "Failed to permanently close period");
            error_response(&e)
        }
    }
}
