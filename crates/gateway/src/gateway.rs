//! The ledger gateway trait - the subsystem's only storage boundary.

use async_trait::async_trait;
use chrono::NaiveDate;

use ledgerlock_core::audit::{AuditLogEntry, NewAuditLogEntry};
use ledgerlock_core::authz::ClosingConfig;
use ledgerlock_core::closing::{AccountMeta, LedgerLine};
use ledgerlock_core::period::{AccountingPeriod, PeriodTransition};
use ledgerlock_shared::types::{AccountId, CompanyId, JournalId, PeriodId};

use crate::error::GatewayError;
use crate::types::{JournalEntry, NewJournalEntry};

/// Append-only store of ledger lines, accounting documents, periods,
/// configuration, and audit logs.
///
/// All durable state lives behind this trait. Implementations must make
/// [`apply_transition`](Self::apply_transition) a single conditional
/// update against the period's current status (compare-and-set): the
/// write succeeds only while the period still holds the transition's
/// expected status, and fails with [`GatewayError::StatusConflict`]
/// otherwise.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    // ========== Ledger lines & accounts ==========

    /// All ledger lines of a company with `posting_date <= through`.
    ///
    /// Includes cancelled lines; callers filter them during aggregation.
    async fn ledger_lines(
        &self,
        company_id: CompanyId,
        through: NaiveDate,
    ) -> Result<Vec<LedgerLine>, GatewayError>;

    /// Chart-of-accounts metadata for a company.
    async fn accounts(&self, company_id: CompanyId) -> Result<Vec<AccountMeta>, GatewayError>;

    /// Looks up a single account.
    async fn find_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AccountMeta>, GatewayError>;

    // ========== Accounting periods ==========

    /// Looks up a period by id.
    async fn find_period(
        &self,
        period_id: PeriodId,
    ) -> Result<Option<AccountingPeriod>, GatewayError>;

    /// All periods of a company, ordered by start date.
    async fn list_periods(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<AccountingPeriod>, GatewayError>;

    /// Stores a newly created period.
    async fn insert_period(
        &self,
        period: AccountingPeriod,
    ) -> Result<AccountingPeriod, GatewayError>;

    /// The Closed or Permanently Closed period of `company_id` whose range
    /// contains `posting_date`, if any.
    async fn restricting_period(
        &self,
        company_id: CompanyId,
        posting_date: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, GatewayError>;

    /// The earliest Closed or Permanently Closed period of `company_id`
    /// starting after `after`, if any.
    async fn next_closed_period(
        &self,
        company_id: CompanyId,
        after: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, GatewayError>;

    /// Applies a lifecycle transition as a compare-and-set update.
    ///
    /// # Errors
    ///
    /// * [`GatewayError::NotFound`] if the period does not exist
    /// * [`GatewayError::StatusConflict`] if the period no longer holds
    ///   the transition's expected status
    async fn apply_transition(
        &self,
        period_id: PeriodId,
        transition: &PeriodTransition,
    ) -> Result<AccountingPeriod, GatewayError>;

    // ========== Journal documents ==========

    /// Inserts a journal document in Draft status.
    async fn insert_journal(
        &self,
        journal: NewJournalEntry,
    ) -> Result<JournalEntry, GatewayError>;

    /// Submits (finalizes) a draft journal document.
    async fn submit_journal(&self, journal_id: JournalId) -> Result<(), GatewayError>;

    /// Cancels a submitted journal document, reversing its ledger effect.
    async fn cancel_journal(&self, journal_id: JournalId) -> Result<(), GatewayError>;

    /// Deletes a journal document. Submitted documents must be cancelled
    /// first.
    async fn delete_journal(&self, journal_id: JournalId) -> Result<(), GatewayError>;

    /// Looks up a journal document.
    async fn find_journal(
        &self,
        journal_id: JournalId,
    ) -> Result<Option<JournalEntry>, GatewayError>;

    /// Draft journal documents of a company dated inside `[start, end]`.
    async fn draft_journals(
        &self,
        company_id: CompanyId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<JournalEntry>, GatewayError>;

    // ========== Configuration ==========

    /// Reads the singleton closing configuration.
    async fn closing_config(&self) -> Result<ClosingConfig, GatewayError>;

    /// Replaces the singleton closing configuration.
    async fn save_closing_config(&self, config: &ClosingConfig) -> Result<(), GatewayError>;

    // ========== Audit log ==========

    /// Appends an audit log entry.
    async fn append_audit(
        &self,
        entry: NewAuditLogEntry,
    ) -> Result<AuditLogEntry, GatewayError>;

    /// The audit trail of a period, oldest first.
    async fn audit_trail(
        &self,
        period_id: PeriodId,
    ) -> Result<Vec<AuditLogEntry>, GatewayError>;

    // ========== Users ==========

    /// Email addresses of users holding `role`.
    async fn users_with_role(&self, role: &str) -> Result<Vec<String>, GatewayError>;
}
