//! Account balance aggregation over ledger lines.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerlock_shared::types::AccountId;

use super::types::{AccountBalance, AccountMeta, LedgerLine, currency_epsilon};

/// Nominal account balances for a period window.
///
/// Sums all non-cancelled ledger lines with
/// `start <= posting_date <= end`, joins account metadata filtered to
/// non-group Income/Expense accounts, and applies the root-type sign
/// convention. Only accounts with `|balance| > 0.01` are returned, each
/// flagged `is_nominal = true`.
///
/// The result set is exactly "Income or Expense accounts with non-trivial
/// net activity in the window" - no more, no fewer.
#[must_use]
pub fn nominal_balances(
    lines: &[LedgerLine],
    accounts: &[AccountMeta],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<AccountBalance> {
    let totals = aggregate(lines, |line| {
        line.posting_date >= start && line.posting_date <= end
    });

    build_balances(&totals, accounts, |account| account.root_type.is_nominal())
}

/// All account balances as of a period end date.
///
/// Same aggregation as [`nominal_balances`] but over
/// `posting_date <= end` (no lower bound) across all non-group accounts
/// of the company. Used for closing snapshots and for verifying
/// opening-balance carry-forward.
#[must_use]
pub fn all_balances(
    lines: &[LedgerLine],
    accounts: &[AccountMeta],
    end: NaiveDate,
) -> Vec<AccountBalance> {
    let totals = aggregate(lines, |line| line.posting_date <= end);

    build_balances(&totals, accounts, |_| true)
}

/// Sums debit/credit per account over the lines accepted by `in_window`.
fn aggregate<F>(lines: &[LedgerLine], in_window: F) -> HashMap<AccountId, (Decimal, Decimal)>
where
    F: Fn(&LedgerLine) -> bool,
{
    let mut totals: HashMap<AccountId, (Decimal, Decimal)> = HashMap::new();

    for line in lines {
        if line.is_cancelled || !in_window(line) {
            continue;
        }
        let entry = totals.entry(line.account_id).or_default();
        entry.0 += line.debit;
        entry.1 += line.credit;
    }

    totals
}

/// Joins aggregated totals with account metadata and applies the sign
/// convention and the currency epsilon filter.
fn build_balances<F>(
    totals: &HashMap<AccountId, (Decimal, Decimal)>,
    accounts: &[AccountMeta],
    keep: F,
) -> Vec<AccountBalance>
where
    F: Fn(&AccountMeta) -> bool,
{
    let epsilon = currency_epsilon();
    let mut balances: Vec<AccountBalance> = accounts
        .iter()
        .filter(|account| !account.is_group && keep(account))
        .filter_map(|account| {
            let (debit_total, credit_total) = totals.get(&account.id).copied()?;
            let balance = account.root_type.balance(debit_total, credit_total);

            if balance.abs() <= epsilon {
                return None;
            }

            Some(AccountBalance {
                account_id: account.id,
                account_name: account.name.clone(),
                account_type: account.account_type.clone(),
                root_type: account.root_type,
                debit_total,
                credit_total,
                balance,
                is_nominal: account.root_type.is_nominal(),
            })
        })
        .collect();

    // Stable output order for snapshots and reports.
    balances.sort_by(|a, b| a.account_name.cmp(&b.account_name));
    balances
}
