//! Transaction restriction routes.
//!
//! Called by the transaction entry layers before any ledger write.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use ledgerlock_gateway::WriteRequest;
use ledgerlock_shared::types::{CompanyId, PeriodId};

use crate::AppState;
use crate::routes::error_response;

/// Creates the restriction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/check-restriction", post(check_restriction))
        .route("/override-log", post(log_override))
}

/// Request body for a restriction check.
#[derive(Debug, Deserialize)]
pub struct CheckRestrictionRequest {
    /// Company of the prospective write.
    pub company_id: CompanyId,
    /// Effective date of the write; absent means unrestricted.
    pub posting_date: Option<NaiveDate>,
    /// Document type being written.
    pub doctype: String,
    /// Document name, when modifying an existing document.
    pub docname: Option<String>,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl CheckRestrictionRequest {
    fn into_write_request(self) -> WriteRequest {
        WriteRequest {
            company_id: self.company_id,
            posting_date: self.posting_date,
            doctype: self.doctype,
            docname: self.docname,
            user: self.user,
            roles: self.roles,
        }
    }
}

/// Request body for recording an administrator override.
#[derive(Debug, Deserialize)]
pub struct OverrideLogRequest {
    /// The closed period that was written into.
    pub period_id: PeriodId,
    /// Company of the write.
    pub company_id: CompanyId,
    /// Document type that was written.
    pub doctype: String,
    /// The affected document.
    pub docname: String,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Optional free-form reason.
    pub reason: Option<String>,
}

/// POST `/check-restriction` - Decide whether a prospective write is
/// permitted against closed periods.
async fn check_restriction(
    State(state): State<AppState>,
    Json(payload): Json<CheckRestrictionRequest>,
) -> impl IntoResponse {
    let check = state.service.check_write(&payload.into_write_request()).await;

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "allowed": check.allowed,
            "restricted": check.restricted,
            "requires_logging": check.requires_logging,
            "can_override": check.can_override,
            "reason": check.reason,
            "period": check.period,
        })),
    )
}

/// POST `/override-log` - Record the mandatory audit entry after an
/// overridden write landed.
async fn log_override(
    State(state): State<AppState>,
    Json(payload): Json<OverrideLogRequest>,
) -> impl IntoResponse {
    let period = match state.service.period(payload.period_id).await {
        Ok(period) => period,
        Err(e) => {
            error!(period_id = %payload.period_id, error = %e, "Override log target not found");
            return error_response(&e);
        }
    };

    let request = WriteRequest {
        company_id: payload.company_id,
        posting_date: None,
        doctype: payload.doctype,
        docname: Some(payload.docname),
        user: payload.user,
        roles: payload.roles,
    };

    match state
        .service
        .record_override(&period, &request, payload.reason)
        .await
    {
        Ok(entry) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "data": entry,
            })),
        )
            .into_response(),
        Err(e) => {
            error!(period_id = %period.id, error = %e, "Failed to record override");
            error_response(&e)
        }
    }
}
