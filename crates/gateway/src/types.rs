//! Accounting document types exchanged with the ledger gateway.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerlock_core::closing::ClosingEntryDraft;
use ledgerlock_shared::types::{AccountId, CompanyId, JournalId, PeriodId};

/// Lifecycle of an accounting document at the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocStatus {
    /// Document exists but has not hit the ledger.
    Draft,
    /// Document is finalized and its lines are live.
    Submitted,
    /// Document was reversed; its lines are cancelled.
    Cancelled,
}

/// One line of a journal document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// The account debited or credited.
    pub account_id: AccountId,
    /// Debit amount (zero if credit).
    pub debit: Decimal,
    /// Credit amount (zero if debit).
    pub credit: Decimal,
    /// Line-level remark.
    pub remark: Option<String>,
}

/// A journal document as stored at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: JournalId,
    /// Company the document belongs to.
    pub company_id: CompanyId,
    /// Effective date of the document.
    pub posting_date: NaiveDate,
    /// The document lines.
    pub lines: Vec<JournalLine>,
    /// Document-level remark.
    pub remark: String,
    /// Marks the document as a period closing entry.
    pub is_closing_entry: bool,
    /// The accounting period the document is linked to, if any.
    pub period_id: Option<PeriodId>,
    /// Document lifecycle status.
    pub docstatus: DocStatus,
}

impl JournalEntry {
    /// Sum of all debit amounts.
    #[must_use]
    pub fn total_debit(&self) -> Decimal {
        self.lines.iter().map(|l| l.debit).sum()
    }

    /// Sum of all credit amounts.
    #[must_use]
    pub fn total_credit(&self) -> Decimal {
        self.lines.iter().map(|l| l.credit).sum()
    }
}

/// A journal document to be inserted at the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJournalEntry {
    /// Company the document belongs to.
    pub company_id: CompanyId,
    /// Effective date of the document.
    pub posting_date: NaiveDate,
    /// The document lines.
    pub lines: Vec<JournalLine>,
    /// Document-level remark.
    pub remark: String,
    /// Marks the document as a period closing entry.
    pub is_closing_entry: bool,
    /// The accounting period the document is linked to, if any.
    pub period_id: Option<PeriodId>,
}

impl NewJournalEntry {
    /// Builds the gateway document for a composed closing entry.
    #[must_use]
    pub fn from_closing_draft(
        company_id: CompanyId,
        period_id: PeriodId,
        draft: &ClosingEntryDraft,
    ) -> Self {
        Self {
            company_id,
            posting_date: draft.posting_date,
            lines: draft
                .lines
                .iter()
                .map(|line| JournalLine {
                    account_id: line.account_id,
                    debit: line.debit,
                    credit: line.credit,
                    remark: line.remark.clone(),
                })
                .collect(),
            remark: draft.remark.clone(),
            is_closing_entry: true,
            period_id: Some(period_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlock_core::closing::ClosingLine;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_closing_draft_carries_lines_and_link() {
        let draft = ClosingEntryDraft {
            posting_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            lines: vec![
                ClosingLine {
                    account_id: AccountId::new(),
                    debit: dec!(500),
                    credit: Decimal::ZERO,
                    remark: Some("Closing Sales for period January 2024".to_string()),
                },
                ClosingLine {
                    account_id: AccountId::new(),
                    debit: Decimal::ZERO,
                    credit: dec!(500),
                    remark: None,
                },
            ],
            remark: "Closing entry for accounting period January 2024".to_string(),
            net_income: dec!(500),
            total_debit: dec!(500),
            total_credit: dec!(500),
        };

        let period_id = PeriodId::new();
        let journal = NewJournalEntry::from_closing_draft(CompanyId::new(), period_id, &draft);

        assert!(journal.is_closing_entry);
        assert_eq!(journal.period_id, Some(period_id));
        assert_eq!(journal.lines.len(), 2);
        assert_eq!(journal.posting_date, draft.posting_date);
    }

    #[test]
    fn test_journal_totals() {
        let journal = JournalEntry {
            id: JournalId::new(),
            company_id: CompanyId::new(),
            posting_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            lines: vec![
                JournalLine {
                    account_id: AccountId::new(),
                    debit: dec!(300),
                    credit: Decimal::ZERO,
                    remark: None,
                },
                JournalLine {
                    account_id: AccountId::new(),
                    debit: Decimal::ZERO,
                    credit: dec!(300),
                    remark: None,
                },
            ],
            remark: String::new(),
            is_closing_entry: false,
            period_id: None,
            docstatus: DocStatus::Draft,
        };

        assert_eq!(journal.total_debit(), dec!(300));
        assert_eq!(journal.total_credit(), dec!(300));
    }
}
