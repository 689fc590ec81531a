//! Period administration and inspection routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use ledgerlock_gateway::CreatePeriodInput;
use ledgerlock_shared::types::{CompanyId, PeriodId};

use crate::AppState;
use crate::routes::error_response;

/// Creates the period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/companies/{company_id}/periods", get(list_periods))
        .route("/periods", post(create_period))
        .route("/periods/generate-monthly", post(generate_monthly))
        .route("/periods/{period_id}", get(get_period))
        .route("/periods/{period_id}/preview-closing", get(preview_closing))
        .route("/periods/{period_id}/audit-log", get(audit_log))
}

/// Request body for creating a period.
#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    /// Company the period belongs to.
    pub company_id: CompanyId,
    /// Period name (e.g., "January 2024").
    pub name: String,
    /// First day (inclusive).
    pub start_date: NaiveDate,
    /// Last day (inclusive).
    pub end_date: NaiveDate,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    pub roles: Vec<String>,
}

/// Request body for generating monthly periods.
#[derive(Debug, Deserialize)]
pub struct GenerateMonthlyRequest {
    /// Company the periods belong to.
    pub company_id: CompanyId,
    /// First day of the range.
    pub start_date: NaiveDate,
    /// Last day of the range.
    pub end_date: NaiveDate,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    pub roles: Vec<String>,
}

/// GET `/companies/{company_id}/periods` - List a company's periods.
async fn list_periods(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
) -> impl IntoResponse {
    match state.service.list_periods(company_id).await {
        Ok(periods) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": periods })),
        )
            .into_response(),
        Err(e) => {
            error!(company_id = %company_id, error = %e, "Failed to list periods");
            error_response(&e)
        }
    }
}

/// GET `/periods/{period_id}` - Fetch one period.
async fn get_period(
    State(state): State<AppState>,
    Path(period_id): Path<PeriodId>,
) -> impl IntoResponse {
    match state.service.period(period_id).await {
        Ok(period) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": period })),
        )
            .into_response(),
        Err(e) => {
            error!(period_id = %period_id, error = %e, "Failed to fetch period");
            error_response(&e)
        }
    }
}

/// POST `/periods` - Create a period administratively.
async fn create_period(
    State(state): State<AppState>,
    Json(payload): Json<CreatePeriodRequest>,
) -> impl IntoResponse {
    let input = CreatePeriodInput {
        company_id: payload.company_id,
        name: payload.name,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    match state
        .service
        .create_period(input, &payload.user, &payload.roles)
        .await
    {
        Ok(period) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "data": period })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to create period");
            error_response(&e)
        }
    }
}

/// POST `/periods/generate-monthly` - Generate one period per calendar
/// month across a range.
async fn generate_monthly(
    State(state): State<AppState>,
    Json(payload): Json<GenerateMonthlyRequest>,
) -> impl IntoResponse {
    match state
        .service
        .generate_monthly_periods(
            payload.company_id,
            payload.start_date,
            payload.end_date,
            &payload.user,
            &payload.roles,
        )
        .await
    {
        Ok(periods) => (
            StatusCode::CREATED,
            Json(json!({ "success": true, "data": periods })),
        )
            .into_response(),
        Err(e) => {
            error!(company_id = %payload.company_id, error = %e, "Failed to generate periods");
            error_response(&e)
        }
    }
}

/// GET `/periods/{period_id}/preview-closing` - Preview the closing entry
/// without persisting anything.
async fn preview_closing(
    State(state): State<AppState>,
    Path(period_id): Path<PeriodId>,
) -> impl IntoResponse {
    match state.service.preview_closing(period_id).await {
        Ok(preview) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "period": preview.period,
                    "nominal_balances": preview.nominal_balances,
                    "entry": preview.entry,
                    "net_income": preview.entry.net_income,
                },
            })),
        )
            .into_response(),
        Err(e) => {
            error!(period_id = %period_id, error = %e, "Failed to preview closing");
            error_response(&e)
        }
    }
}

/// GET `/periods/{period_id}/audit-log` - The period's audit trail.
async fn audit_log(
    State(state): State<AppState>,
    Path(period_id): Path<PeriodId>,
) -> impl IntoResponse {
    match state.service.audit_trail(period_id).await {
        Ok(entries) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": entries })),
        )
            .into_response(),
        Err(e) => {
            error!(period_id = %period_id, error = %e, "Failed to fetch audit trail");
            error_response(&e)
        }
    }
}
