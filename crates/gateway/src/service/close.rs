//! Close orchestration: Open -> Closed.

use tracing::info;

use ledgerlock_core::audit::{AuditAction, NewAuditLogEntry, PeriodSnapshot};
use ledgerlock_core::authz::{ClosingConfig, PeriodAction, authorize};
use ledgerlock_core::closing::{
    AccountBalance, AccountMeta, RootType, all_balances, compose_closing_entry, nominal_balances,
};
use ledgerlock_core::period::{AccountingPeriod, PeriodError, PeriodStateMachine, PeriodStatus};
use ledgerlock_shared::types::{CompanyId, PeriodId};

use super::{PeriodClosingService, ServiceError};
use crate::error::GatewayError;
use crate::types::{JournalEntry, NewJournalEntry};

/// Result of a successful close.
#[derive(Debug)]
pub struct CloseOutcome {
    /// The period, now Closed.
    pub period: AccountingPeriod,
    /// The submitted closing entry.
    pub closing_entry: JournalEntry,
    /// Snapshot of all account balances as of the period end.
    pub account_balances: Vec<AccountBalance>,
}

impl PeriodClosingService {
    /// Closes an open period.
    ///
    /// Composes and submits the closing entry, snapshots all account
    /// balances, flips the period to Closed via a compare-and-set update,
    /// and records a `Closed` audit entry with before/after snapshots.
    ///
    /// The sequence is not transactional: if a step after the closing
    /// entry was submitted fails, the entry is NOT rolled back and must be
    /// cleaned up by a compensating retry (reopen cancels and deletes it)
    /// or manual intervention.
    ///
    /// # Errors
    ///
    /// * `FORBIDDEN` unless the caller holds "System Manager" or the
    ///   configured closing role
    /// * `ALREADY_CLOSED` / `ALREADY_PERMANENTLY_CLOSED` on wrong status
    /// * `VALIDATION_FAILED` when checks fail and `force` is false
    /// * `CONFIGURATION_ERROR` for a missing or non-Equity retained
    ///   earnings account
    /// * `NO_ACTIVITY` when no nominal account has a balance in the window
    pub async fn close(
        &self,
        period_id: PeriodId,
        company_id: CompanyId,
        user: &str,
        roles: &[String],
        force: bool,
    ) -> Result<CloseOutcome, ServiceError> {
        let period = self.require_period(period_id, company_id).await?;
        let config = self.gateway.closing_config().await?;

        authorize(roles, PeriodAction::Close, &config).require(PeriodAction::Close)?;

        match period.status {
            PeriodStatus::Open => {}
            PeriodStatus::Closed => return Err(PeriodError::AlreadyClosed.into()),
            PeriodStatus::PermanentlyClosed => {
                return Err(PeriodError::AlreadyPermanentlyClosed.into());
            }
        }

        if !force {
            let failures = self.validator.validate(self.gateway.as_ref(), &period).await?;
            if !failures.is_empty() {
                return Err(PeriodError::ValidationFailed {
                    failures: failures.iter().map(ToString::to_string).collect(),
                }
                .into());
            }
        }

        let retained = self.retained_earnings_account(&config).await?;

        let lines = self.gateway.ledger_lines(company_id, period.end_date).await?;
        let accounts = self.gateway.accounts(company_id).await?;

        let nominal = nominal_balances(&lines, &accounts, period.start_date, period.end_date);
        let draft = compose_closing_entry(&period.name, period.end_date, &nominal, retained.id)?;

        // The subsystem's only ledger-affecting write: the closing entry
        // is created and finalized in one step, no manual submission.
        let journal = self
            .gateway
            .insert_journal(NewJournalEntry::from_closing_draft(
                company_id, period.id, &draft,
            ))
            .await?;
        self.gateway.submit_journal(journal.id).await?;
        let closing_entry = self
            .gateway
            .find_journal(journal.id)
            .await?
            .ok_or_else(|| GatewayError::NotFound(format!("journal {}", journal.id)))?;

        let account_balances = all_balances(&lines, &accounts, period.end_date);

        let before = PeriodSnapshot::from(&period);
        let transition = PeriodStateMachine::close(period.status, user, journal.id)?;
        let updated = self.gateway.apply_transition(period.id, &transition).await?;
        let after = PeriodSnapshot::from(&updated);

        self.gateway
            .append_audit(
                NewAuditLogEntry::new(period.id, AuditAction::Closed, user)
                    .with_snapshots(&before, &after),
            )
            .await?;

        info!(
            period = %updated.name,
            closed_by = user,
            closing_entry = %journal.id,
            net_income = %draft.net_income,
            "Accounting period closed"
        );

        Ok(CloseOutcome {
            period: updated,
            closing_entry,
            account_balances,
        })
    }

    /// Resolves and verifies the configured retained earnings account.
    pub(crate) async fn retained_earnings_account(
        &self,
        config: &ClosingConfig,
    ) -> Result<AccountMeta, ServiceError> {
        let account_id = config
            .retained_earnings_account
            .ok_or(ServiceError::MissingRetainedEarnings)?;

        let account = self
            .gateway
            .find_account(account_id)
            .await?
            .ok_or(ServiceError::RetainedEarningsUnknown)?;

        if account.root_type != RootType::Equity {
            return Err(ServiceError::RetainedEarningsNotEquity {
                account: account.name,
                root_type: account.root_type,
            });
        }

        Ok(account)
    }
}
