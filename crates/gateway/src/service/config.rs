//! Closing configuration reads and authorized updates.

use serde::Deserialize;
use tracing::info;

use ledgerlock_core::authz::{ClosingConfig, PeriodAction, authorize};
use ledgerlock_shared::types::AccountId;

use super::{PeriodClosingService, ServiceError};

/// Partial update to the closing configuration.
///
/// Absent fields keep their current values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClosingConfigUpdate {
    /// New retained earnings account.
    pub retained_earnings_account: Option<AccountId>,
    /// New closing role.
    pub closing_role: Option<String>,
    /// New reopen role.
    pub reopen_role: Option<String>,
    /// New reopen notification toggle.
    pub notify_on_reopen: Option<bool>,
}

impl PeriodClosingService {
    /// Reads the closing configuration.
    pub async fn closing_config(&self) -> Result<ClosingConfig, ServiceError> {
        Ok(self.gateway.closing_config().await?)
    }

    /// Applies a configuration change.
    ///
    /// # Errors
    ///
    /// `FORBIDDEN` unless the caller holds "System Manager" or
    /// "Accounts Manager".
    pub async fn update_config(
        &self,
        user: &str,
        roles: &[String],
        update: ClosingConfigUpdate,
    ) -> Result<ClosingConfig, ServiceError> {
        let mut config = self.gateway.closing_config().await?;

        authorize(roles, PeriodAction::ChangeConfig, &config)
            .require(PeriodAction::ChangeConfig)?;

        if let Some(account) = update.retained_earnings_account {
            config.retained_earnings_account = Some(account);
        }
        if let Some(role) = update.closing_role {
            config.closing_role = role;
        }
        if let Some(role) = update.reopen_role {
            config.reopen_role = role;
        }
        if let Some(notify) = update.notify_on_reopen {
            config.notify_on_reopen = notify;
        }

        self.gateway.save_closing_config(&config).await?;

        info!(
            changed_by = user,
            closing_role = config.closing_role,
            reopen_role = config.reopen_role,
            "Closing configuration updated"
        );

        Ok(config)
    }
}
