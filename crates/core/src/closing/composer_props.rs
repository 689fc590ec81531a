//! Property-based tests for closing entry composition.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use ledgerlock_shared::types::AccountId;

use super::composer::{compose_closing_entry, net_income};
use super::types::{AccountBalance, RootType, currency_epsilon};

/// Strategy for a normally-signed nominal balance (at least one cent).
fn nominal_balance_strategy() -> impl Strategy<Value = AccountBalance> {
    (
        prop_oneof![Just(RootType::Income), Just(RootType::Expense)],
        2i64..10_000_000i64,
        "[a-z]{4,12}",
    )
        .prop_map(|(root_type, cents, name)| {
            let amount = Decimal::new(cents, 2);
            let (debit_total, credit_total) = match root_type {
                RootType::Income => (Decimal::ZERO, amount),
                _ => (amount, Decimal::ZERO),
            };
            AccountBalance {
                account_id: AccountId::new(),
                account_name: name,
                account_type: String::new(),
                root_type,
                debit_total,
                credit_total,
                balance: amount,
                is_nominal: true,
            }
        })
}

fn balances_strategy() -> impl Strategy<Value = Vec<AccountBalance>> {
    prop::collection::vec(nominal_balance_strategy(), 1..20)
}

fn period_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any set of normally-signed nominal balances, the composed
    /// entry's debit total equals its credit total exactly.
    #[test]
    fn prop_entry_always_balances(balances in balances_strategy()) {
        let draft = compose_closing_entry("P", period_end(), &balances, AccountId::new())
            .expect("normally-signed balances must compose");

        prop_assert_eq!(draft.total_debit, draft.total_credit);
    }

    /// The entry's net income equals total income minus total expense.
    #[test]
    fn prop_net_income_matches_totals(balances in balances_strategy()) {
        let expected_income: Decimal = balances
            .iter()
            .filter(|b| b.root_type == RootType::Income)
            .map(|b| b.balance)
            .sum();
        let expected_expense: Decimal = balances
            .iter()
            .filter(|b| b.root_type == RootType::Expense)
            .map(|b| b.balance)
            .sum();

        let draft = compose_closing_entry("P", period_end(), &balances, AccountId::new())
            .expect("normally-signed balances must compose");

        prop_assert_eq!(draft.net_income, expected_income - expected_expense);
        prop_assert_eq!(draft.net_income, net_income(&balances));
    }

    /// Every nominal account appears exactly once, on the side that
    /// zeroes it: Income debited, Expense credited.
    #[test]
    fn prop_each_account_zeroed_once(balances in balances_strategy()) {
        let retained = AccountId::new();
        let draft = compose_closing_entry("P", period_end(), &balances, retained)
            .expect("normally-signed balances must compose");

        for balance in &balances {
            let matching: Vec<_> = draft
                .lines
                .iter()
                .filter(|l| l.account_id == balance.account_id)
                .collect();
            prop_assert_eq!(matching.len(), 1);

            let line = matching[0];
            match balance.root_type {
                RootType::Income => {
                    prop_assert_eq!(line.debit, balance.balance.abs());
                    prop_assert_eq!(line.credit, Decimal::ZERO);
                }
                RootType::Expense => {
                    prop_assert_eq!(line.credit, balance.balance.abs());
                    prop_assert_eq!(line.debit, Decimal::ZERO);
                }
                _ => prop_assert!(false, "only nominal balances are generated"),
            }
        }
    }

    /// The retained-earnings line exists iff |net income| exceeds the
    /// currency epsilon, and its side matches the sign of the result.
    #[test]
    fn prop_retained_earnings_line_matches_net(balances in balances_strategy()) {
        let retained = AccountId::new();
        let draft = compose_closing_entry("P", period_end(), &balances, retained)
            .expect("normally-signed balances must compose");

        let retained_lines: Vec<_> = draft
            .lines
            .iter()
            .filter(|l| l.account_id == retained)
            .collect();

        if draft.net_income.abs() > currency_epsilon() {
            prop_assert_eq!(retained_lines.len(), 1);
            let line = retained_lines[0];
            if draft.net_income > Decimal::ZERO {
                prop_assert_eq!(line.credit, draft.net_income);
            } else {
                prop_assert_eq!(line.debit, draft.net_income.abs());
            }
        } else {
            prop_assert!(retained_lines.is_empty());
        }
    }
}
