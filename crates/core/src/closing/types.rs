//! Domain types for balance aggregation and closing entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledgerlock_shared::types::AccountId;

/// Smallest currency difference that is considered a real balance.
///
/// Balances within this epsilon of zero are treated as settled and are
/// never reported or closed.
#[must_use]
pub fn currency_epsilon() -> Decimal {
    Decimal::new(1, 2)
}

/// Root classification of a chart-of-accounts entry.
///
/// Income and Expense accounts are nominal: their balances are zeroed at
/// period end. Asset, Liability, and Equity accounts are permanent: their
/// balances carry forward to the next period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootType {
    /// Asset account (debit-normal, permanent).
    Asset,
    /// Liability account (credit-normal, permanent).
    Liability,
    /// Equity account (credit-normal, permanent).
    Equity,
    /// Income account (credit-normal, nominal).
    Income,
    /// Expense account (debit-normal, nominal).
    Expense,
}

impl RootType {
    /// Parses a root type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the string representation of the root type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }

    /// Returns true for Income and Expense accounts.
    #[must_use]
    pub fn is_nominal(&self) -> bool {
        matches!(self, Self::Income | Self::Expense)
    }

    /// Computes the signed balance for this root type.
    ///
    /// - Asset/Expense: balance = debit - credit (debit-normal)
    /// - Liability/Equity/Income: balance = credit - debit (credit-normal)
    #[must_use]
    pub fn balance(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Asset | Self::Expense => debit - credit,
            Self::Liability | Self::Equity | Self::Income => credit - debit,
        }
    }
}

impl std::fmt::Display for RootType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single ledger line as read from the ledger gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerLine {
    /// The account the line was posted against.
    pub account_id: AccountId,
    /// Debit amount (zero if credit).
    pub debit: Decimal,
    /// Credit amount (zero if debit).
    pub credit: Decimal,
    /// The effective date of the posting.
    pub posting_date: NaiveDate,
    /// Whether the line has been cancelled. Cancelled lines are ignored.
    pub is_cancelled: bool,
}

/// Chart-of-accounts metadata needed for balance classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMeta {
    /// Account identifier.
    pub id: AccountId,
    /// Display name of the account.
    pub name: String,
    /// Account subtype (free-form, e.g. "Receivable").
    pub account_type: String,
    /// Root classification.
    pub root_type: RootType,
    /// Group accounts aggregate children and never carry postings.
    pub is_group: bool,
}

/// A derived, non-persisted account balance over a date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account.
    pub account_id: AccountId,
    /// Display name of the account.
    pub account_name: String,
    /// Account subtype.
    pub account_type: String,
    /// Root classification.
    pub root_type: RootType,
    /// Sum of debits over the window.
    pub debit_total: Decimal,
    /// Sum of credits over the window.
    pub credit_total: Decimal,
    /// Signed balance per the root-type convention.
    pub balance: Decimal,
    /// True for Income/Expense accounts.
    pub is_nominal: bool,
}

/// One line of a closing entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingLine {
    /// The account debited or credited.
    pub account_id: AccountId,
    /// Debit amount (zero if credit).
    pub debit: Decimal,
    /// Credit amount (zero if debit).
    pub credit: Decimal,
    /// Line-level remark.
    pub remark: Option<String>,
}

/// A composed, not-yet-persisted closing entry.
///
/// The draft is balanced by construction: the composer verifies that the
/// debit and credit totals match before returning it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingEntryDraft {
    /// Posting date of the entry (the period's end date).
    pub posting_date: NaiveDate,
    /// The entry lines: one per nominal account plus the balancing line.
    pub lines: Vec<ClosingLine>,
    /// Document-level remark.
    pub remark: String,
    /// Net income for the window (positive = profit, negative = loss).
    pub net_income: Decimal,
    /// Sum of all debit amounts.
    pub total_debit: Decimal,
    /// Sum of all credit amounts.
    pub total_credit: Decimal,
}
