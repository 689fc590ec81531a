//! Service-level error type aggregating the domain errors.

use serde_json::json;
use thiserror::Error;

use ledgerlock_core::authz::AuthzError;
use ledgerlock_core::closing::{ClosingError, RootType};
use ledgerlock_core::period::PeriodError;
use ledgerlock_shared::types::{CompanyId, PeriodId};

use crate::error::GatewayError;

/// Errors returned by the period closing services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The referenced period does not exist.
    #[error("Accounting period not found: {0}")]
    PeriodNotFound(PeriodId),

    /// The period exists but belongs to a different company.
    #[error("Period {period} does not belong to company {company}")]
    CompanyMismatch {
        /// The requested period.
        period: PeriodId,
        /// The company named in the request.
        company: CompanyId,
    },

    /// No retained earnings account is configured.
    #[error(
        "Retained earnings account is not configured. Set it in the closing configuration."
    )]
    MissingRetainedEarnings,

    /// The configured retained earnings account does not exist.
    #[error("Configured retained earnings account does not exist at the gateway")]
    RetainedEarningsUnknown,

    /// The configured retained earnings account has the wrong root type.
    #[error(
        "Retained earnings account \"{account}\" must be an Equity account (current: {root_type})"
    )]
    RetainedEarningsNotEquity {
        /// Name of the misconfigured account.
        account: String,
        /// Its actual root type.
        root_type: RootType,
    },

    /// Start date must be before end date.
    #[error("Start date must be before end date")]
    InvalidDateRange,

    /// The date range overlaps an existing period of the same company.
    #[error("Period overlaps with existing period: {0}")]
    OverlappingPeriod(String),

    /// A lifecycle state error.
    #[error(transparent)]
    State(#[from] PeriodError),

    /// A closing composition error.
    #[error(transparent)]
    Closing(#[from] ClosingError),

    /// An authorization denial.
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// A gateway failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ServiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::CompanyMismatch { .. } => "COMPANY_MISMATCH",
            Self::MissingRetainedEarnings
            | Self::RetainedEarningsUnknown
            | Self::RetainedEarningsNotEquity { .. } => "CONFIGURATION_ERROR",
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::OverlappingPeriod(_) => "OVERLAPPING_PERIOD",
            Self::State(e) => e.error_code(),
            Self::Closing(e) => e.error_code(),
            Self::Authz(AuthzError::Denied { .. }) => "FORBIDDEN",
            Self::Gateway(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::PeriodNotFound(_) => 404,
            Self::CompanyMismatch { .. } | Self::Authz(_) => 403,
            Self::MissingRetainedEarnings
            | Self::RetainedEarningsUnknown
            | Self::RetainedEarningsNotEquity { .. } => 422,
            Self::InvalidDateRange => 400,
            Self::OverlappingPeriod(_) => 409,
            Self::State(e) => e.http_status_code(),
            Self::Closing(ClosingError::NoActivity) => 422,
            // The composer guard refusing an unbalanced entry is an
            // internal invariant break, not caller error.
            Self::Closing(ClosingError::UnbalancedEntry { .. }) => 500,
            Self::Gateway(GatewayError::StatusConflict { .. }) => 409,
            Self::Gateway(GatewayError::NotFound(_)) => 404,
            Self::Gateway(_) => 502,
        }
    }

    /// Structured details for the API error envelope, where the variant
    /// carries more than a message.
    #[must_use]
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::Authz(AuthzError::Denied {
                required_role,
                user_roles,
                ..
            }) => Some(json!({
                "required_role": required_role,
                "user_roles": user_roles,
            })),
            Self::State(PeriodError::ValidationFailed { failures }) => Some(json!({
                "failed_validations": failures,
            })),
            Self::State(PeriodError::NextPeriodClosed { blocking_period }) => Some(json!({
                "blocking_period": blocking_period,
            })),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlock_core::authz::PeriodAction;

    #[test]
    fn test_state_errors_pass_through_codes() {
        let err = ServiceError::State(PeriodError::AlreadyClosed);
        assert_eq!(err.error_code(), "ALREADY_CLOSED");
        assert_eq!(err.http_status_code(), 422);
    }

    #[test]
    fn test_authz_denial_carries_details() {
        let err = ServiceError::Authz(AuthzError::Denied {
            action: PeriodAction::Close,
            required_role: "Accounts Manager".to_string(),
            user_roles: vec!["Sales User".to_string()],
        });

        assert_eq!(err.error_code(), "FORBIDDEN");
        assert_eq!(err.http_status_code(), 403);
        let details = err.details().unwrap();
        assert_eq!(details["required_role"], "Accounts Manager");
        assert_eq!(details["user_roles"][0], "Sales User");
    }

    #[test]
    fn test_validation_failures_in_details() {
        let err = ServiceError::State(PeriodError::ValidationFailed {
            failures: vec!["draft_journals: one draft left".to_string()],
        });
        assert_eq!(err.error_code(), "VALIDATION_FAILED");
        let details = err.details().unwrap();
        assert_eq!(details["failed_validations"][0], "draft_journals: one draft left");
    }

    #[test]
    fn test_concurrent_conflict_is_409() {
        use ledgerlock_core::period::PeriodStatus;
        let err = ServiceError::Gateway(GatewayError::StatusConflict {
            expected: PeriodStatus::Open,
            actual: PeriodStatus::Closed,
        });
        assert_eq!(err.http_status_code(), 409);
        assert_eq!(err.error_code(), "CONCURRENT_MODIFICATION");
    }

    #[test]
    fn test_no_activity_is_unprocessable() {
        let err = ServiceError::Closing(ClosingError::NoActivity);
        assert_eq!(err.http_status_code(), 422);
        assert_eq!(err.error_code(), "NO_ACTIVITY");
    }
}
