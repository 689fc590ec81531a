//! Permanent close orchestration: Closed -> Permanently Closed.

use tracing::info;

use ledgerlock_core::audit::{AuditAction, NewAuditLogEntry, PeriodSnapshot};
use ledgerlock_core::authz::{PeriodAction, authorize};
use ledgerlock_core::period::{AccountingPeriod, PeriodStateMachine};
use ledgerlock_shared::types::{CompanyId, PeriodId};

use super::{PeriodClosingService, ServiceError};

impl PeriodClosingService {
    /// Permanently closes a closed period. Irreversible.
    ///
    /// The closing entry stays linked and is never again deletable; no
    /// operation in the subsystem moves a period out of Permanently
    /// Closed.
    ///
    /// # Errors
    ///
    /// * `FORBIDDEN` unless the caller holds "System Manager"
    /// * `MUST_BE_CLOSED_FIRST` unless the period is exactly Closed
    /// * `CONFIRMATION_REQUIRED` unless `confirmation` is the exact
    ///   literal token; nothing changes state in that case
    pub async fn permanently_close(
        &self,
        period_id: PeriodId,
        company_id: CompanyId,
        user: &str,
        roles: &[String],
        confirmation: &str,
    ) -> Result<AccountingPeriod, ServiceError> {
        let period = self.require_period(period_id, company_id).await?;
        let config = self.gateway.closing_config().await?;

        authorize(roles, PeriodAction::PermanentClose, &config)
            .require(PeriodAction::PermanentClose)?;

        let transition =
            PeriodStateMachine::permanently_close(period.status, user, confirmation)?;

        let before = PeriodSnapshot::from(&period);
        let updated = self.gateway.apply_transition(period.id, &transition).await?;
        let after = PeriodSnapshot::from(&updated);

        self.gateway
            .append_audit(
                NewAuditLogEntry::new(period.id, AuditAction::PermanentlyClosed, user)
                    .with_snapshots(&before, &after),
            )
            .await?;

        info!(
            period = %updated.name,
            closed_by = user,
            "Accounting period permanently closed"
        );

        Ok(updated)
    }
}
