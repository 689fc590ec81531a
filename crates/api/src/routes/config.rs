//! Closing configuration routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use ledgerlock_gateway::ClosingConfigUpdate;
use ledgerlock_shared::types::AccountId;

use crate::AppState;
use crate::routes::error_response;

/// Creates the configuration routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/config", get(get_config).put(update_config))
}

/// Request body for a configuration change.
#[derive(Debug, Deserialize)]
pub struct UpdateConfigRequest {
    /// New retained earnings account.
    pub retained_earnings_account: Option<AccountId>,
    /// New closing role.
    pub closing_role: Option<String>,
    /// New reopen role.
    pub reopen_role: Option<String>,
    /// New reopen notification toggle.
    pub notify_on_reopen: Option<bool>,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    pub roles: Vec<String>,
}

/// GET `/config` - Read the closing configuration.
async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    match state.service.closing_config().await {
        Ok(config) => (
            StatusCode::OK,
            Json(json!({ "success": true, "data": config })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to read closing configuration");
            error_response(&e)
        }
    }
}

/// PUT `/config` - Change the closing configuration. Requires the
/// config-change authorization.
async fn update_config(
    State(state): State<AppState>,
    Json(payload): Json<UpdateConfigRequest>,
) -> impl IntoResponse {
    let update = ClosingConfigUpdate {
        retained_earnings_account: payload.retained_earnings_account,
        closing_role: payload.closing_role,
        reopen_role: payload.reopen_role,
        notify_on_reopen: payload.notify_on_reopen,
    };

    match state
        .service
        .update_config(&payload.user, &payload.roles, update)
        .await
    {
        Ok(config) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "message": "Configuration updated",
                "data": config,
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to update closing configuration");
            error_response(&e)
        }
    }
}
