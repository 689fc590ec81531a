//! Pre-close validation checklist.
//!
//! The rules that must hold before a period may be closed are external to
//! the state machine; they report pass/fail with a list of failures and
//! can be skipped with `force = true` by an authorized caller.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

use ledgerlock_core::period::AccountingPeriod;

use crate::error::GatewayError;
use crate::gateway::LedgerGateway;

/// A single failed validation check.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationFailure {
    /// Name of the check that failed.
    pub check: String,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.check, self.message)
    }
}

/// Validates a period before closing.
#[async_trait]
pub trait CloseValidator: Send + Sync {
    /// Runs the checklist; an empty result means all checks passed.
    async fn validate(
        &self,
        gateway: &dyn LedgerGateway,
        period: &AccountingPeriod,
    ) -> Result<Vec<ValidationFailure>, GatewayError>;
}

/// Validator that performs no checks.
pub struct NoopValidator;

#[async_trait]
impl CloseValidator for NoopValidator {
    async fn validate(
        &self,
        _gateway: &dyn LedgerGateway,
        _period: &AccountingPeriod,
    ) -> Result<Vec<ValidationFailure>, GatewayError> {
        Ok(Vec::new())
    }
}

/// Fails when draft journal documents are dated inside the period.
///
/// A draft dated inside a closed period could never be submitted, so the
/// period is not ready to close while any exist.
pub struct DraftJournalCheck;

#[async_trait]
impl CloseValidator for DraftJournalCheck {
    async fn validate(
        &self,
        gateway: &dyn LedgerGateway,
        period: &AccountingPeriod,
    ) -> Result<Vec<ValidationFailure>, GatewayError> {
        let drafts = gateway
            .draft_journals(period.company_id, period.start_date, period.end_date)
            .await?;

        Ok(drafts
            .into_iter()
            .map(|journal| ValidationFailure {
                check: "draft_journals".to_string(),
                message: format!(
                    "Draft journal {} dated {} must be submitted or deleted",
                    journal.id, journal.posting_date
                ),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryLedgerGateway;
    use crate::types::NewJournalEntry;
    use chrono::NaiveDate;
    use ledgerlock_shared::types::CompanyId;

    fn january(company: CompanyId) -> AccountingPeriod {
        AccountingPeriod::new(
            company,
            "January 2024",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_noop_validator_passes() {
        let gateway = MemoryLedgerGateway::new();
        let period = january(CompanyId::new());

        let failures = NoopValidator.validate(&gateway, &period).await.unwrap();
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn test_draft_journal_check_reports_drafts_in_window() {
        let gateway = MemoryLedgerGateway::new();
        let company = CompanyId::new();
        let period = january(company);

        gateway
            .insert_journal(NewJournalEntry {
                company_id: company,
                posting_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                lines: vec![],
                remark: String::new(),
                is_closing_entry: false,
                period_id: None,
            })
            .await
            .unwrap();

        // A draft outside the window does not count.
        gateway
            .insert_journal(NewJournalEntry {
                company_id: company,
                posting_date: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
                lines: vec![],
                remark: String::new(),
                is_closing_entry: false,
                period_id: None,
            })
            .await
            .unwrap();

        let failures = DraftJournalCheck.validate(&gateway, &period).await.unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].check, "draft_journals");
        assert!(failures[0].message.contains("2024-01-10"));
    }
}
