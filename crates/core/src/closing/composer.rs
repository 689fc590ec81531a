//! Closing entry composition.
//!
//! Turns nominal account balances into a balanced closing document plus a
//! single net-income/loss line against a retained-earnings account.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use ledgerlock_shared::types::AccountId;

use super::error::ClosingError;
use super::types::{AccountBalance, ClosingEntryDraft, ClosingLine, RootType, currency_epsilon};

/// Net income over a set of nominal balances.
///
/// `net_income = total income - total expense`. Positive means profit,
/// negative means loss.
#[must_use]
pub fn net_income(balances: &[AccountBalance]) -> Decimal {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;

    for balance in balances {
        match balance.root_type {
            RootType::Income => total_income += balance.balance,
            RootType::Expense => total_expense += balance.balance,
            _ => {}
        }
    }

    total_income - total_expense
}

/// Composes the closing entry for a period from its nominal balances.
///
/// - One line per nominal account: Income accounts are debited by
///   `|balance|`, Expense accounts are credited by `|balance|`.
/// - If net income is outside the currency epsilon, one balancing line on
///   the retained-earnings account: credited for a profit, debited for a
///   loss. Within epsilon the line is omitted; the entry still balances
///   because income debits equal expense credits exactly.
///
/// # Errors
///
/// - [`ClosingError::NoActivity`] when `balances` is empty.
/// - [`ClosingError::UnbalancedEntry`] when the constructed entry does not
///   balance. This should never trigger for normally-signed balances and
///   exists as a final guard before anything is persisted.
pub fn compose_closing_entry(
    period_name: &str,
    end_date: NaiveDate,
    balances: &[AccountBalance],
    retained_earnings: AccountId,
) -> Result<ClosingEntryDraft, ClosingError> {
    if balances.is_empty() {
        return Err(ClosingError::NoActivity);
    }

    let epsilon = currency_epsilon();
    let mut lines = Vec::with_capacity(balances.len() + 1);

    // Zero out income accounts (debit away their credit balances).
    for balance in balances.iter().filter(|b| b.root_type == RootType::Income) {
        lines.push(ClosingLine {
            account_id: balance.account_id,
            debit: balance.balance.abs(),
            credit: Decimal::ZERO,
            remark: Some(format!(
                "Closing {} for period {period_name}",
                balance.account_name
            )),
        });
    }

    // Zero out expense accounts (credit away their debit balances).
    for balance in balances.iter().filter(|b| b.root_type == RootType::Expense) {
        lines.push(ClosingLine {
            account_id: balance.account_id,
            debit: Decimal::ZERO,
            credit: balance.balance.abs(),
            remark: Some(format!(
                "Closing {} for period {period_name}",
                balance.account_name
            )),
        });
    }

    let net = net_income(balances);

    if net.abs() > epsilon {
        let (debit, credit, remark) = if net > Decimal::ZERO {
            (
                Decimal::ZERO,
                net,
                format!("Net income for period {period_name}"),
            )
        } else {
            (
                net.abs(),
                Decimal::ZERO,
                format!("Net loss for period {period_name}"),
            )
        };

        lines.push(ClosingLine {
            account_id: retained_earnings,
            debit,
            credit,
            remark: Some(remark),
        });
    }

    let total_debit: Decimal = lines.iter().map(|l| l.debit).sum();
    let total_credit: Decimal = lines.iter().map(|l| l.credit).sum();

    if total_debit != total_credit {
        return Err(ClosingError::UnbalancedEntry {
            debit: total_debit,
            credit: total_credit,
        });
    }

    Ok(ClosingEntryDraft {
        posting_date: end_date,
        lines,
        remark: format!("Closing entry for accounting period {period_name}"),
        net_income: net,
        total_debit,
        total_credit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn balance(name: &str, root_type: RootType, amount: Decimal) -> AccountBalance {
        let (debit_total, credit_total) = match root_type {
            RootType::Income => (Decimal::ZERO, amount),
            _ => (amount, Decimal::ZERO),
        };
        AccountBalance {
            account_id: AccountId::new(),
            account_name: name.to_string(),
            account_type: String::new(),
            root_type,
            debit_total,
            credit_total,
            balance: amount,
            is_nominal: root_type.is_nominal(),
        }
    }

    #[test]
    fn test_profit_credits_retained_earnings() {
        // Income 500,000 and Expense 300,000 -> Retained Earnings credited 200,000.
        let balances = vec![
            balance("Sales", RootType::Income, dec!(500000)),
            balance("Salaries", RootType::Expense, dec!(300000)),
        ];
        let retained = AccountId::new();

        let draft =
            compose_closing_entry("January 2024", date(2024, 1, 31), &balances, retained).unwrap();

        assert_eq!(draft.net_income, dec!(200000));
        assert_eq!(draft.lines.len(), 3);

        let income_line = &draft.lines[0];
        assert_eq!(income_line.debit, dec!(500000));
        assert_eq!(income_line.credit, Decimal::ZERO);

        let expense_line = &draft.lines[1];
        assert_eq!(expense_line.debit, Decimal::ZERO);
        assert_eq!(expense_line.credit, dec!(300000));

        let retained_line = &draft.lines[2];
        assert_eq!(retained_line.account_id, retained);
        assert_eq!(retained_line.credit, dec!(200000));
        assert_eq!(retained_line.debit, Decimal::ZERO);
    }

    #[test]
    fn test_loss_debits_retained_earnings() {
        // Income 200,000 and Expense 350,000 -> Retained Earnings debited 150,000.
        let balances = vec![
            balance("Sales", RootType::Income, dec!(200000)),
            balance("Salaries", RootType::Expense, dec!(350000)),
        ];
        let retained = AccountId::new();

        let draft =
            compose_closing_entry("January 2024", date(2024, 1, 31), &balances, retained).unwrap();

        assert_eq!(draft.net_income, dec!(-150000));
        let retained_line = draft
            .lines
            .iter()
            .find(|l| l.account_id == retained)
            .unwrap();
        assert_eq!(retained_line.debit, dec!(150000));
        assert_eq!(retained_line.credit, Decimal::ZERO);
    }

    #[test]
    fn test_break_even_omits_retained_earnings_line() {
        // Income == Expense == 250,000 -> no retained earnings line, still balanced.
        let balances = vec![
            balance("Sales", RootType::Income, dec!(250000)),
            balance("Salaries", RootType::Expense, dec!(250000)),
        ];
        let retained = AccountId::new();

        let draft =
            compose_closing_entry("March 2024", date(2024, 3, 31), &balances, retained).unwrap();

        assert_eq!(draft.net_income, Decimal::ZERO);
        assert_eq!(draft.lines.len(), 2);
        assert!(draft.lines.iter().all(|l| l.account_id != retained));
        assert_eq!(draft.total_debit, draft.total_credit);
    }

    #[test]
    fn test_empty_balances_fail_with_no_activity() {
        let result = compose_closing_entry(
            "January 2024",
            date(2024, 1, 31),
            &[],
            AccountId::new(),
        );
        assert!(matches!(result, Err(ClosingError::NoActivity)));
    }

    #[test]
    fn test_debits_equal_credits() {
        let balances = vec![
            balance("Sales", RootType::Income, dec!(1234.56)),
            balance("Interest", RootType::Income, dec!(78.90)),
            balance("Rent", RootType::Expense, dec!(400.00)),
            balance("Utilities", RootType::Expense, dec!(86.54)),
        ];

        let draft = compose_closing_entry(
            "June 2024",
            date(2024, 6, 30),
            &balances,
            AccountId::new(),
        )
        .unwrap();

        assert_eq!(draft.total_debit, draft.total_credit);
    }

    #[test]
    fn test_contra_balances_are_caught_by_guard() {
        // A contra-income balance (net debit) breaks the |balance| line
        // construction; the guard must refuse to emit an unbalanced entry.
        let balances = vec![
            balance("Sales", RootType::Income, dec!(100)),
            balance("Sales Returns", RootType::Income, dec!(-40)),
        ];

        let result = compose_closing_entry(
            "July 2024",
            date(2024, 7, 31),
            &balances,
            AccountId::new(),
        );

        assert!(matches!(result, Err(ClosingError::UnbalancedEntry { .. })));
    }

    #[test]
    fn test_net_income_ignores_permanent_accounts() {
        let balances = vec![
            balance("Sales", RootType::Income, dec!(100)),
            balance("Cash", RootType::Asset, dec!(999)),
            balance("Rent", RootType::Expense, dec!(40)),
        ];

        assert_eq!(net_income(&balances), dec!(60));
    }

    #[test]
    fn test_posting_date_is_period_end() {
        let balances = vec![balance("Sales", RootType::Income, dec!(100))];
        let end = date(2024, 1, 31);

        let draft = compose_closing_entry("January 2024", end, &balances, AccountId::new()).unwrap();

        assert_eq!(draft.posting_date, end);
    }
}
