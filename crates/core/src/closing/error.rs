//! Error types for closing entry composition.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur while composing a closing entry.
#[derive(Debug, Error)]
pub enum ClosingError {
    /// No nominal account has a non-trivial balance in the window.
    #[error("No income or expense accounts with a non-zero balance in the period")]
    NoActivity,

    /// The constructed entry does not balance.
    ///
    /// A guard against contra-signed balances; nothing is persisted when
    /// this fires.
    #[error("Closing entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit amount of the rejected entry.
        debit: Decimal,
        /// Total credit amount of the rejected entry.
        credit: Decimal,
    },
}

impl ClosingError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NoActivity => "NO_ACTIVITY",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
        }
    }
}
