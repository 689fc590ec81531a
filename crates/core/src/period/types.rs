//! Accounting period types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use ledgerlock_shared::types::{CompanyId, JournalId, PeriodId};

/// Lifecycle status of an accounting period.
///
/// The valid transitions are:
/// - Open -> Closed (close)
/// - Closed -> Open (reopen)
/// - Closed -> Permanently Closed (permanent close, irreversible)
///
/// `PermanentlyClosed` is absorbing: no operation in the subsystem moves a
/// period out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodStatus {
    /// Period accepts postings.
    Open,
    /// Period is locked; privileged users may still override.
    Closed,
    /// Period is locked forever; no override exists.
    #[serde(rename = "Permanently Closed")]
    PermanentlyClosed,
}

impl PeriodStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::PermanentlyClosed => "Permanently Closed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Open" => Some(Self::Open),
            "Closed" => Some(Self::Closed),
            "Permanently Closed" => Some(Self::PermanentlyClosed),
            _ => None,
        }
    }

    /// Returns true if the period restricts writes (closed either way).
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Closed | Self::PermanentlyClosed)
    }

    /// Returns true for the terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PermanentlyClosed)
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named date range of one company's ledger.
///
/// Created administratively; mutated only by the state machine; never
/// physically deleted by this subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountingPeriod {
    /// Unique identifier.
    pub id: PeriodId,
    /// Company this period belongs to.
    pub company_id: CompanyId,
    /// Period name (e.g., "January 2024").
    pub name: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the period (inclusive).
    pub end_date: NaiveDate,
    /// Current lifecycle status.
    pub status: PeriodStatus,
    /// User who closed the period.
    pub closed_by: Option<String>,
    /// When the period was closed.
    pub closed_on: Option<DateTime<Utc>>,
    /// The closing entry produced while closing.
    pub closing_entry_id: Option<JournalId>,
    /// User who permanently closed the period.
    pub permanently_closed_by: Option<String>,
    /// When the period was permanently closed.
    pub permanently_closed_on: Option<DateTime<Utc>>,
}

impl AccountingPeriod {
    /// Creates a new open period.
    #[must_use]
    pub fn new(
        company_id: CompanyId,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: PeriodId::new(),
            company_id,
            name: name.into(),
            start_date,
            end_date,
            status: PeriodStatus::Open,
            closed_by: None,
            closed_on: None,
            closing_entry_id: None,
            permanently_closed_by: None,
            permanently_closed_on: None,
        }
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if postings into this period are unrestricted.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == PeriodStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlock_shared::types::CompanyId;

    fn january() -> AccountingPeriod {
        AccountingPeriod::new(
            CompanyId::new(),
            "January 2024",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            PeriodStatus::Open,
            PeriodStatus::Closed,
            PeriodStatus::PermanentlyClosed,
        ] {
            assert_eq!(PeriodStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PeriodStatus::parse("Locked"), None);
    }

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&PeriodStatus::PermanentlyClosed).unwrap();
        assert_eq!(json, "\"Permanently Closed\"");
    }

    #[test]
    fn test_restricted_statuses() {
        assert!(!PeriodStatus::Open.is_restricted());
        assert!(PeriodStatus::Closed.is_restricted());
        assert!(PeriodStatus::PermanentlyClosed.is_restricted());
    }

    #[test]
    fn test_contains_date_inclusive_bounds() {
        let period = january();
        assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
        assert!(!period.contains_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()));
    }

    #[test]
    fn test_new_period_starts_open() {
        let period = january();
        assert!(period.is_open());
        assert!(period.closed_by.is_none());
        assert!(period.closing_entry_id.is_none());
    }
}
