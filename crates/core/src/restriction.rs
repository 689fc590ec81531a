//! Write restrictions against closed periods.
//!
//! Pure decision logic: given the period (if any) that overlaps a
//! prospective write's posting date, the caller's roles, and the closing
//! configuration, decide whether the write is allowed, allowed with
//! mandatory audit logging, or rejected.

use serde::Serialize;

use crate::authz::{ClosingConfig, PeriodAction, authorize};
use crate::period::{AccountingPeriod, PeriodStatus};

/// Outcome of a write restriction check.
#[derive(Debug, Clone, Serialize)]
pub struct WriteCheck {
    /// Whether the write may proceed.
    pub allowed: bool,
    /// Whether a restricted period overlaps the posting date.
    pub restricted: bool,
    /// When true, the caller is obliged to record a "Transaction
    /// Modified" audit entry referencing the affected document.
    pub requires_logging: bool,
    /// Whether a sufficiently privileged user could override the
    /// restriction (never true for permanently closed periods).
    pub can_override: bool,
    /// Human-readable explanation when restricted.
    pub reason: Option<String>,
    /// The overlapping period, if any.
    pub period: Option<AccountingPeriod>,
}

impl WriteCheck {
    /// An unconditional allow (no restriction applies).
    #[must_use]
    pub fn allow() -> Self {
        Self {
            allowed: true,
            restricted: false,
            requires_logging: false,
            can_override: false,
            reason: None,
            period: None,
        }
    }

    /// An allow produced by the fail-open path after a lookup error.
    #[must_use]
    pub fn allow_after_lookup_error(error: impl std::fmt::Display) -> Self {
        Self {
            reason: Some(format!("Restriction lookup failed: {error}")),
            ..Self::allow()
        }
    }
}

/// Decides whether a write into `period` is permitted for `user_roles`.
///
/// - No overlapping period: allow.
/// - Permanently closed: reject for every user and every role; no
///   override exists.
/// - Closed: allow iff the caller is authorized for
///   [`PeriodAction::OverrideRestriction`], in which case
///   `requires_logging` is set; otherwise reject with a message naming
///   the period.
#[must_use]
pub fn evaluate_write(
    period: Option<AccountingPeriod>,
    user_roles: &[String],
    config: &ClosingConfig,
) -> WriteCheck {
    let Some(period) = period else {
        return WriteCheck::allow();
    };

    match period.status {
        PeriodStatus::Open => WriteCheck::allow(),
        PeriodStatus::PermanentlyClosed => WriteCheck {
            allowed: false,
            restricted: true,
            requires_logging: false,
            can_override: false,
            reason: Some(format!(
                "Cannot modify transaction: period {} is permanently closed. \
                 No modifications are allowed.",
                period.name
            )),
            period: Some(period),
        },
        PeriodStatus::Closed => {
            let decision = authorize(user_roles, PeriodAction::OverrideRestriction, config);

            if decision.allowed {
                WriteCheck {
                    allowed: true,
                    restricted: true,
                    requires_logging: true,
                    can_override: true,
                    reason: Some(format!(
                        "Transaction allowed in closed period {} with administrator override",
                        period.name
                    )),
                    period: Some(period),
                }
            } else {
                WriteCheck {
                    allowed: false,
                    restricted: true,
                    requires_logging: false,
                    can_override: false,
                    reason: Some(format!(
                        "Cannot modify transaction: period {} is closed. \
                         Contact an administrator to reopen the period.",
                        period.name
                    )),
                    period: Some(period),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ledgerlock_shared::types::CompanyId;

    fn period(status: PeriodStatus) -> AccountingPeriod {
        let mut period = AccountingPeriod::new(
            CompanyId::new(),
            "January 2024",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        period.status = status;
        period
    }

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_period_allows() {
        let check = evaluate_write(None, &roles(&[]), &ClosingConfig::default());
        assert!(check.allowed);
        assert!(!check.restricted);
        assert!(!check.requires_logging);
    }

    #[test]
    fn test_open_period_allows() {
        let check = evaluate_write(
            Some(period(PeriodStatus::Open)),
            &roles(&[]),
            &ClosingConfig::default(),
        );
        assert!(check.allowed);
        assert!(!check.restricted);
    }

    #[test]
    fn test_permanently_closed_rejects_even_system_manager() {
        let check = evaluate_write(
            Some(period(PeriodStatus::PermanentlyClosed)),
            &roles(&["System Manager"]),
            &ClosingConfig::default(),
        );

        assert!(!check.allowed);
        assert!(check.restricted);
        assert!(!check.requires_logging);
        assert!(!check.can_override);
        assert!(check.reason.unwrap().contains("permanently closed"));
    }

    #[test]
    fn test_closed_period_override_requires_logging() {
        let check = evaluate_write(
            Some(period(PeriodStatus::Closed)),
            &roles(&["Accounts Manager"]),
            &ClosingConfig::default(),
        );

        assert!(check.allowed);
        assert!(check.restricted);
        assert!(check.requires_logging);
        assert!(check.can_override);
    }

    #[test]
    fn test_closed_period_rejects_unprivileged_user() {
        let check = evaluate_write(
            Some(period(PeriodStatus::Closed)),
            &roles(&["Sales User"]),
            &ClosingConfig::default(),
        );

        assert!(!check.allowed);
        assert!(!check.requires_logging);
        let reason = check.reason.unwrap();
        assert!(reason.contains("January 2024"));
        assert!(reason.contains("Contact an administrator"));
    }

    #[test]
    fn test_configured_reopen_role_can_override() {
        let config = ClosingConfig {
            reopen_role: "Controller".to_string(),
            ..ClosingConfig::default()
        };

        let check = evaluate_write(
            Some(period(PeriodStatus::Closed)),
            &roles(&["Controller"]),
            &config,
        );
        assert!(check.allowed);
        assert!(check.requires_logging);

        // The default role does not apply once the config points elsewhere.
        let check = evaluate_write(
            Some(period(PeriodStatus::Closed)),
            &roles(&["Accounts Manager"]),
            &config,
        );
        assert!(!check.allowed);
    }

    #[test]
    fn test_fail_open_surfaces_the_error() {
        let check = WriteCheck::allow_after_lookup_error("gateway timed out");
        assert!(check.allowed);
        assert!(!check.requires_logging);
        assert!(check.reason.unwrap().contains("gateway timed out"));
    }
}
