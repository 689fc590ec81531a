//! Administrative period management: creation, monthly generation, and
//! the read-only closing preview.

use chrono::{Datelike, NaiveDate};
use tracing::info;

use ledgerlock_core::audit::{AuditAction, NewAuditLogEntry};
use ledgerlock_core::authz::{PeriodAction, authorize};
use ledgerlock_core::closing::{
    AccountBalance, ClosingEntryDraft, compose_closing_entry, nominal_balances,
};
use ledgerlock_core::period::AccountingPeriod;
use ledgerlock_shared::types::{CompanyId, PeriodId};

use super::{PeriodClosingService, ServiceError};

/// Input for creating a single accounting period.
#[derive(Debug, Clone)]
pub struct CreatePeriodInput {
    /// Company the period belongs to.
    pub company_id: CompanyId,
    /// Period name (e.g., "January 2024").
    pub name: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
}

/// Read-only preview of what closing a period would produce.
#[derive(Debug)]
pub struct ClosingPreview {
    /// The period being previewed.
    pub period: AccountingPeriod,
    /// Nominal balances that the closing entry would zero.
    pub nominal_balances: Vec<AccountBalance>,
    /// The entry as it would be composed. Nothing is persisted.
    pub entry: ClosingEntryDraft,
}

impl PeriodClosingService {
    /// Creates a single accounting period.
    ///
    /// # Errors
    ///
    /// * `FORBIDDEN` unless the caller may change configuration
    /// * `INVALID_DATE_RANGE` when `start_date >= end_date`
    /// * `OVERLAPPING_PERIOD` when the range overlaps an existing period
    pub async fn create_period(
        &self,
        input: CreatePeriodInput,
        user: &str,
        roles: &[String],
    ) -> Result<AccountingPeriod, ServiceError> {
        let config = self.gateway.closing_config().await?;
        authorize(roles, PeriodAction::ChangeConfig, &config)
            .require(PeriodAction::ChangeConfig)?;

        validate_date_range(input.start_date, input.end_date)?;

        let existing = self.gateway.list_periods(input.company_id).await?;
        if let Some(overlap) = existing.iter().find(|p| {
            date_ranges_overlap(p.start_date, p.end_date, input.start_date, input.end_date)
        }) {
            return Err(ServiceError::OverlappingPeriod(overlap.name.clone()));
        }

        let period = AccountingPeriod::new(
            input.company_id,
            input.name,
            input.start_date,
            input.end_date,
        );
        let period = self.gateway.insert_period(period).await?;

        self.gateway
            .append_audit(NewAuditLogEntry::new(
                period.id,
                AuditAction::Created,
                user,
            ))
            .await?;

        info!(period = %period.name, company_id = %period.company_id, "Accounting period created");

        Ok(period)
    }

    /// Generates one period per calendar month across a date range.
    ///
    /// # Errors
    ///
    /// Same as [`create_period`](Self::create_period); the whole range is
    /// checked for overlaps before anything is inserted.
    pub async fn generate_monthly_periods(
        &self,
        company_id: CompanyId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        user: &str,
        roles: &[String],
    ) -> Result<Vec<AccountingPeriod>, ServiceError> {
        let config = self.gateway.closing_config().await?;
        authorize(roles, PeriodAction::ChangeConfig, &config)
            .require(PeriodAction::ChangeConfig)?;

        validate_date_range(start_date, end_date)?;

        let existing = self.gateway.list_periods(company_id).await?;
        if let Some(overlap) = existing
            .iter()
            .find(|p| date_ranges_overlap(p.start_date, p.end_date, start_date, end_date))
        {
            return Err(ServiceError::OverlappingPeriod(overlap.name.clone()));
        }

        let mut inserted = Vec::new();
        for period in monthly_periods(company_id, start_date, end_date) {
            let period = self.gateway.insert_period(period).await?;
            self.gateway
                .append_audit(NewAuditLogEntry::new(
                    period.id,
                    AuditAction::Created,
                    user,
                ))
                .await?;
            inserted.push(period);
        }

        info!(
            company_id = %company_id,
            periods = inserted.len(),
            "Generated monthly accounting periods"
        );

        Ok(inserted)
    }

    /// Previews the closing entry for a period without persisting anything.
    ///
    /// # Errors
    ///
    /// * `CONFIGURATION_ERROR` when retained earnings is unset or invalid
    /// * `NO_ACTIVITY` when no nominal account has a balance in the window
    pub async fn preview_closing(
        &self,
        period_id: PeriodId,
    ) -> Result<ClosingPreview, ServiceError> {
        let period = self.period(period_id).await?;
        let config = self.gateway.closing_config().await?;
        let retained = self.retained_earnings_account(&config).await?;

        let lines = self
            .gateway
            .ledger_lines(period.company_id, period.end_date)
            .await?;
        let accounts = self.gateway.accounts(period.company_id).await?;

        let balances = nominal_balances(&lines, &accounts, period.start_date, period.end_date);
        let entry = compose_closing_entry(&period.name, period.end_date, &balances, retained.id)?;

        Ok(ClosingPreview {
            period,
            nominal_balances: balances,
            entry,
        })
    }
}

/// Validates that `start_date` is strictly before `end_date`.
fn validate_date_range(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), ServiceError> {
    if start_date >= end_date {
        return Err(ServiceError::InvalidDateRange);
    }
    Ok(())
}

/// Checks if two inclusive date ranges overlap.
///
/// Two ranges [a_start, a_end] and [b_start, b_end] overlap if:
/// a_start <= b_end AND a_end >= b_start
fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// Generates monthly periods across a date range.
fn monthly_periods(
    company_id: CompanyId,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Vec<AccountingPeriod> {
    let mut periods = Vec::new();
    let mut current = start_date;

    while current <= end_date {
        // Period end is the last day of the month or the range end.
        let month_end = last_day_of_month(current.year(), current.month());
        let period_end = if month_end > end_date {
            end_date
        } else {
            month_end
        };

        let name = format!("{} {}", month_name(current.month()), current.year());
        periods.push(AccountingPeriod::new(company_id, name, current, period_end));

        // Move to the first day of the next month; the 1st always exists.
        current = if current.month() == 12 {
            NaiveDate::from_ymd_opt(current.year() + 1, 1, 1).expect("January 1st exists")
        } else {
            NaiveDate::from_ymd_opt(current.year(), current.month() + 1, 1)
                .expect("first of month exists")
        };
    }

    periods
}

/// Returns the last day of a month.
fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap_or_default())
}

/// Returns the month name.
fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
