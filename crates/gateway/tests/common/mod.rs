//! Shared fixture for period closing service tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use ledgerlock_core::authz::ClosingConfig;
use ledgerlock_core::closing::{AccountMeta, LedgerLine, RootType};
use ledgerlock_core::period::AccountingPeriod;
use ledgerlock_gateway::{MemoryLedgerGateway, PeriodClosingService};
use ledgerlock_shared::types::{AccountId, CompanyId};

pub struct Fixture {
    pub gateway: Arc<MemoryLedgerGateway>,
    pub service: PeriodClosingService,
    pub company: CompanyId,
    pub january: AccountingPeriod,
    pub sales: AccountMeta,
    pub salaries: AccountMeta,
    pub cash: AccountMeta,
    pub retained: AccountMeta,
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn account(name: &str, root_type: RootType) -> AccountMeta {
    AccountMeta {
        id: AccountId::new(),
        name: name.to_string(),
        account_type: String::new(),
        root_type,
        is_group: false,
    }
}

pub fn roles(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

impl Fixture {
    /// A company with a January 2024 period, a small chart of accounts,
    /// and balanced activity: income 500,000 / expense 300,000.
    pub fn new() -> Self {
        let gateway = Arc::new(MemoryLedgerGateway::new());
        let company = CompanyId::new();

        let sales = account("Sales", RootType::Income);
        let salaries = account("Salaries", RootType::Expense);
        let cash = account("Cash", RootType::Asset);
        let retained = account("Retained Earnings", RootType::Equity);

        for acc in [&sales, &salaries, &cash, &retained] {
            gateway.add_account(company, acc.clone());
        }

        let jan_10 = date(2024, 1, 10);
        gateway.add_line(company, line(&sales, Decimal::ZERO, dec!(500000), jan_10));
        gateway.add_line(company, line(&cash, dec!(500000), Decimal::ZERO, jan_10));
        gateway.add_line(company, line(&salaries, dec!(300000), Decimal::ZERO, jan_10));
        gateway.add_line(company, line(&cash, Decimal::ZERO, dec!(300000), jan_10));

        gateway.set_config(ClosingConfig {
            retained_earnings_account: Some(retained.id),
            ..ClosingConfig::default()
        });

        let january = AccountingPeriod::new(
            company,
            "January 2024",
            date(2024, 1, 1),
            date(2024, 1, 31),
        );
        gateway.add_period(january.clone());

        let service = PeriodClosingService::new(gateway.clone());

        Self {
            gateway,
            service,
            company,
            january,
            sales,
            salaries,
            cash,
            retained,
        }
    }

    /// Adds a February 2024 period and returns it.
    pub fn add_february(&self) -> AccountingPeriod {
        let february = AccountingPeriod::new(
            self.company,
            "February 2024",
            date(2024, 2, 1),
            date(2024, 2, 29),
        );
        self.gateway.add_period(february.clone());
        february
    }

    /// Closes January as an Accounts Manager and returns the closed period.
    pub async fn close_january(&self) -> AccountingPeriod {
        self.service
            .close(
                self.january.id,
                self.company,
                "jane@example.com",
                &roles(&["Accounts Manager"]),
                false,
            )
            .await
            .expect("close must succeed")
            .period
    }
}

pub fn line(
    account: &AccountMeta,
    debit: Decimal,
    credit: Decimal,
    posting_date: NaiveDate,
) -> LedgerLine {
    LedgerLine {
        account_id: account.id,
        debit,
        credit,
        posting_date,
        is_cancelled: false,
    }
}
