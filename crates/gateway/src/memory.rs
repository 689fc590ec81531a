//! In-memory ledger gateway for tests and local development.
//!
//! Mirrors the remote gateway's semantics, including the compare-and-set
//! period update and the draft/submit/cancel document lifecycle. Lookup
//! failures can be injected to exercise the fail-open restriction path.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use ledgerlock_core::audit::{AuditLogEntry, NewAuditLogEntry};
use ledgerlock_core::authz::ClosingConfig;
use ledgerlock_core::closing::{AccountMeta, LedgerLine};
use ledgerlock_core::period::{AccountingPeriod, PeriodStatus, PeriodTransition};
use ledgerlock_shared::types::{AccountId, AuditLogId, CompanyId, JournalId, PeriodId};

use crate::error::GatewayError;
use crate::gateway::LedgerGateway;
use crate::types::{DocStatus, JournalEntry, NewJournalEntry};

#[derive(Default)]
struct State {
    lines: HashMap<CompanyId, Vec<LedgerLine>>,
    accounts: HashMap<CompanyId, Vec<AccountMeta>>,
    periods: HashMap<PeriodId, AccountingPeriod>,
    journals: HashMap<JournalId, JournalEntry>,
    config: ClosingConfig,
    audit: Vec<AuditLogEntry>,
    users: HashMap<String, Vec<String>>,
}

/// In-memory implementation of [`LedgerGateway`].
pub struct MemoryLedgerGateway {
    state: RwLock<State>,
    fail_lookups: AtomicBool,
}

impl Default for MemoryLedgerGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedgerGateway {
    /// Creates an empty gateway with the default closing configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                config: ClosingConfig::default(),
                ..State::default()
            }),
            fail_lookups: AtomicBool::new(false),
        }
    }

    /// When set, every read operation fails with a transport error.
    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    fn check_lookup(&self) -> Result<(), GatewayError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport(
                "injected lookup failure".to_string(),
            ));
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    // ========== Fixture helpers ==========

    /// Seeds an accounting period.
    pub fn add_period(&self, period: AccountingPeriod) {
        self.write().periods.insert(period.id, period);
    }

    /// Seeds an account for a company.
    pub fn add_account(&self, company_id: CompanyId, account: AccountMeta) {
        self.write().accounts.entry(company_id).or_default().push(account);
    }

    /// Seeds a ledger line for a company.
    pub fn add_line(&self, company_id: CompanyId, line: LedgerLine) {
        self.write().lines.entry(company_id).or_default().push(line);
    }

    /// Seeds a user holding `role`.
    pub fn add_user(&self, role: &str, email: &str) {
        self.write()
            .users
            .entry(role.to_string())
            .or_default()
            .push(email.to_string());
    }

    /// Replaces the closing configuration.
    pub fn set_config(&self, config: ClosingConfig) {
        self.write().config = config;
    }

    /// Snapshot of all stored journals, for assertions.
    #[must_use]
    pub fn journals(&self) -> Vec<JournalEntry> {
        self.read().journals.values().cloned().collect()
    }

    /// Snapshot of the full audit log, for assertions.
    #[must_use]
    pub fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.read().audit.clone()
    }
}

#[async_trait]
impl LedgerGateway for MemoryLedgerGateway {
    async fn ledger_lines(
        &self,
        company_id: CompanyId,
        through: NaiveDate,
    ) -> Result<Vec<LedgerLine>, GatewayError> {
        self.check_lookup()?;
        Ok(self
            .read()
            .lines
            .get(&company_id)
            .map(|lines| {
                lines
                    .iter()
                    .filter(|l| l.posting_date <= through)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn accounts(&self, company_id: CompanyId) -> Result<Vec<AccountMeta>, GatewayError> {
        self.check_lookup()?;
        Ok(self.read().accounts.get(&company_id).cloned().unwrap_or_default())
    }

    async fn find_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AccountMeta>, GatewayError> {
        self.check_lookup()?;
        Ok(self
            .read()
            .accounts
            .values()
            .flatten()
            .find(|a| a.id == account_id)
            .cloned())
    }

    async fn find_period(
        &self,
        period_id: PeriodId,
    ) -> Result<Option<AccountingPeriod>, GatewayError> {
        self.check_lookup()?;
        Ok(self.read().periods.get(&period_id).cloned())
    }

    async fn list_periods(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<AccountingPeriod>, GatewayError> {
        self.check_lookup()?;
        let mut periods: Vec<AccountingPeriod> = self
            .read()
            .periods
            .values()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect();
        periods.sort_by_key(|p| p.start_date);
        Ok(periods)
    }

    async fn insert_period(
        &self,
        period: AccountingPeriod,
    ) -> Result<AccountingPeriod, GatewayError> {
        self.write().periods.insert(period.id, period.clone());
        Ok(period)
    }

    async fn restricting_period(
        &self,
        company_id: CompanyId,
        posting_date: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, GatewayError> {
        self.check_lookup()?;
        Ok(self
            .read()
            .periods
            .values()
            .find(|p| {
                p.company_id == company_id
                    && p.status.is_restricted()
                    && p.contains_date(posting_date)
            })
            .cloned())
    }

    async fn next_closed_period(
        &self,
        company_id: CompanyId,
        after: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, GatewayError> {
        self.check_lookup()?;
        let state = self.read();
        let mut candidates: Vec<&AccountingPeriod> = state
            .periods
            .values()
            .filter(|p| {
                p.company_id == company_id && p.status.is_restricted() && p.start_date > after
            })
            .collect();
        candidates.sort_by_key(|p| p.start_date);
        Ok(candidates.first().map(|p| (*p).clone()))
    }

    async fn apply_transition(
        &self,
        period_id: PeriodId,
        transition: &PeriodTransition,
    ) -> Result<AccountingPeriod, GatewayError> {
        let mut state = self.write();
        let period = state
            .periods
            .get_mut(&period_id)
            .ok_or_else(|| GatewayError::NotFound(format!("period {period_id}")))?;

        if period.status != transition.expected_status() {
            return Err(GatewayError::StatusConflict {
                expected: transition.expected_status(),
                actual: period.status,
            });
        }

        match transition {
            PeriodTransition::Close {
                closed_by,
                closed_on,
                closing_entry_id,
            } => {
                period.status = PeriodStatus::Closed;
                period.closed_by = Some(closed_by.clone());
                period.closed_on = Some(*closed_on);
                period.closing_entry_id = Some(*closing_entry_id);
            }
            PeriodTransition::Reopen { .. } => {
                period.status = PeriodStatus::Open;
                period.closed_by = None;
                period.closed_on = None;
                period.closing_entry_id = None;
            }
            PeriodTransition::PermanentlyClose {
                closed_by,
                closed_on,
            } => {
                period.status = PeriodStatus::PermanentlyClosed;
                period.permanently_closed_by = Some(closed_by.clone());
                period.permanently_closed_on = Some(*closed_on);
            }
        }

        Ok(period.clone())
    }

    async fn insert_journal(
        &self,
        journal: NewJournalEntry,
    ) -> Result<JournalEntry, GatewayError> {
        let entry = JournalEntry {
            id: JournalId::new(),
            company_id: journal.company_id,
            posting_date: journal.posting_date,
            lines: journal.lines,
            remark: journal.remark,
            is_closing_entry: journal.is_closing_entry,
            period_id: journal.period_id,
            docstatus: DocStatus::Draft,
        };
        self.write().journals.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn submit_journal(&self, journal_id: JournalId) -> Result<(), GatewayError> {
        let mut state = self.write();
        let journal = state
            .journals
            .get_mut(&journal_id)
            .ok_or_else(|| GatewayError::NotFound(format!("journal {journal_id}")))?;

        if journal.docstatus != DocStatus::Draft {
            return Err(GatewayError::InvalidDocumentState(format!(
                "journal {journal_id} is not a draft"
            )));
        }
        journal.docstatus = DocStatus::Submitted;
        Ok(())
    }

    async fn cancel_journal(&self, journal_id: JournalId) -> Result<(), GatewayError> {
        let mut state = self.write();
        let journal = state
            .journals
            .get_mut(&journal_id)
            .ok_or_else(|| GatewayError::NotFound(format!("journal {journal_id}")))?;

        if journal.docstatus != DocStatus::Submitted {
            return Err(GatewayError::InvalidDocumentState(format!(
                "journal {journal_id} is not submitted"
            )));
        }
        journal.docstatus = DocStatus::Cancelled;
        Ok(())
    }

    async fn delete_journal(&self, journal_id: JournalId) -> Result<(), GatewayError> {
        let mut state = self.write();
        let journal = state
            .journals
            .get(&journal_id)
            .ok_or_else(|| GatewayError::NotFound(format!("journal {journal_id}")))?;

        if journal.docstatus == DocStatus::Submitted {
            return Err(GatewayError::InvalidDocumentState(format!(
                "journal {journal_id} must be cancelled before deletion"
            )));
        }
        state.journals.remove(&journal_id);
        Ok(())
    }

    async fn find_journal(
        &self,
        journal_id: JournalId,
    ) -> Result<Option<JournalEntry>, GatewayError> {
        self.check_lookup()?;
        Ok(self.read().journals.get(&journal_id).cloned())
    }

    async fn draft_journals(
        &self,
        company_id: CompanyId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<JournalEntry>, GatewayError> {
        self.check_lookup()?;
        Ok(self
            .read()
            .journals
            .values()
            .filter(|j| {
                j.company_id == company_id
                    && j.docstatus == DocStatus::Draft
                    && j.posting_date >= start
                    && j.posting_date <= end
            })
            .cloned()
            .collect())
    }

    async fn closing_config(&self) -> Result<ClosingConfig, GatewayError> {
        self.check_lookup()?;
        Ok(self.read().config.clone())
    }

    async fn save_closing_config(&self, config: &ClosingConfig) -> Result<(), GatewayError> {
        self.write().config = config.clone();
        Ok(())
    }

    async fn append_audit(
        &self,
        entry: NewAuditLogEntry,
    ) -> Result<AuditLogEntry, GatewayError> {
        let stored = AuditLogEntry {
            id: AuditLogId::new(),
            period_id: entry.period_id,
            action: entry.action,
            action_by: entry.action_by,
            action_date: chrono::Utc::now(),
            reason: entry.reason,
            before_snapshot: entry.before_snapshot,
            after_snapshot: entry.after_snapshot,
            affected_transaction: entry.affected_transaction,
            transaction_doctype: entry.transaction_doctype,
        };
        self.write().audit.push(stored.clone());
        Ok(stored)
    }

    async fn audit_trail(
        &self,
        period_id: PeriodId,
    ) -> Result<Vec<AuditLogEntry>, GatewayError> {
        self.check_lookup()?;
        Ok(self
            .read()
            .audit
            .iter()
            .filter(|e| e.period_id == period_id)
            .cloned()
            .collect())
    }

    async fn users_with_role(&self, role: &str) -> Result<Vec<String>, GatewayError> {
        self.check_lookup()?;
        Ok(self.read().users.get(role).cloned().unwrap_or_default())
    }
}
