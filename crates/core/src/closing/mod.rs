//! Balance aggregation and closing entry composition.
//!
//! This module implements the reconciliation arithmetic of period closing:
//! - Aggregating ledger lines into per-account balances
//! - Classifying accounts as nominal (Income/Expense) or permanent
//! - Composing the balanced closing entry that zeroes nominal accounts

pub mod balance;
pub mod composer;
pub mod error;
pub mod types;

#[cfg(test)]
mod composer_props;

pub use balance::{all_balances, nominal_balances};
pub use composer::{compose_closing_entry, net_income};
pub use error::ClosingError;
pub use types::{
    AccountBalance, AccountMeta, ClosingEntryDraft, ClosingLine, LedgerLine, RootType,
    currency_epsilon,
};
