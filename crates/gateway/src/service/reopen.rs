//! Reopen orchestration: Closed -> Open.

use std::sync::Arc;

use tracing::{info, warn};

use ledgerlock_core::audit::{AuditAction, NewAuditLogEntry, PeriodSnapshot};
use ledgerlock_core::authz::{PeriodAction, authorize};
use ledgerlock_core::period::{AccountingPeriod, PeriodStateMachine};
use ledgerlock_shared::types::{CompanyId, PeriodId};

use super::{PeriodClosingService, ServiceError};

impl PeriodClosingService {
    /// Reopens a closed period.
    ///
    /// Cancels and deletes the linked closing entry, clears the closing
    /// metadata via a compare-and-set update, records a `Reopened` audit
    /// entry with the caller's reason, and notifies reopen-role holders
    /// (fire-and-forget; notification failure never fails the reopen).
    ///
    /// # Errors
    ///
    /// * `FORBIDDEN` unless the caller holds "System Manager" or the
    ///   configured reopen role
    /// * `REASON_REQUIRED` when `reason` is empty
    /// * `NOT_CLOSED` when the period is open
    /// * `PERMANENTLY_CLOSED` when the period is permanently closed
    /// * `NEXT_PERIOD_CLOSED` when a later period of the company is locked
    pub async fn reopen(
        &self,
        period_id: PeriodId,
        company_id: CompanyId,
        user: &str,
        roles: &[String],
        reason: String,
    ) -> Result<AccountingPeriod, ServiceError> {
        let period = self.require_period(period_id, company_id).await?;
        let config = self.gateway.closing_config().await?;

        authorize(roles, PeriodAction::Reopen, &config).require(PeriodAction::Reopen)?;

        let next_closed = self
            .gateway
            .next_closed_period(company_id, period.end_date)
            .await?;

        let transition = PeriodStateMachine::reopen(
            period.status,
            user,
            reason.clone(),
            next_closed.as_ref(),
        )?;

        // The closing entry is reversed and removed before the period is
        // unlocked; a reopened period must carry no closing entry.
        if let Some(entry_id) = period.closing_entry_id {
            self.gateway.cancel_journal(entry_id).await?;
            self.gateway.delete_journal(entry_id).await?;
        }

        let before = PeriodSnapshot::from(&period);
        let updated = self.gateway.apply_transition(period.id, &transition).await?;
        let after = PeriodSnapshot::from(&updated);

        self.gateway
            .append_audit(
                NewAuditLogEntry::new(period.id, AuditAction::Reopened, user)
                    .with_reason(&reason)
                    .with_snapshots(&before, &after),
            )
            .await?;

        info!(
            period = %updated.name,
            reopened_by = user,
            reason,
            "Accounting period reopened"
        );

        if config.notify_on_reopen {
            let gateway = Arc::clone(&self.gateway);
            let notifier = Arc::clone(&self.notifier);
            let notify_period = updated.clone();
            let reopen_role = config.reopen_role.clone();
            let reopened_by = user.to_string();

            tokio::spawn(async move {
                match gateway.users_with_role(&reopen_role).await {
                    Ok(recipients) => {
                        notifier
                            .period_reopened(&notify_period, &recipients, &reopened_by, &reason)
                            .await;
                    }
                    Err(e) => {
                        warn!(
                            period = %notify_period.name,
                            error = %e,
                            "Could not resolve reopen notification recipients"
                        );
                    }
                }
            });
        }

        Ok(updated)
    }
}
