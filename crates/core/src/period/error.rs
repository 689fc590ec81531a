//! Error types for period lifecycle transitions.

use thiserror::Error;

use super::types::PeriodStatus;

/// Errors that can occur during period state transitions.
#[derive(Debug, Error)]
pub enum PeriodError {
    // ========== Close ==========
    /// The period is already closed.
    #[error("Period is already closed")]
    AlreadyClosed,

    /// The period is permanently closed and can never change again.
    #[error("Period is permanently closed")]
    AlreadyPermanentlyClosed,

    /// Pre-close validations failed.
    #[error("Cannot close period: {} validation(s) failed", failures.len())]
    ValidationFailed {
        /// The individual validation failures.
        failures: Vec<String>,
    },

    // ========== Reopen ==========
    /// Only a closed period can be reopened.
    #[error("Period is not closed (current status: {current})")]
    NotClosed {
        /// The period's current status.
        current: PeriodStatus,
    },

    /// A permanently closed period can never be reopened.
    #[error("Period is permanently closed and cannot be reopened")]
    PermanentlyClosedCannotReopen,

    /// A later period of the same company is already closed.
    #[error("Cannot reopen period because next period \"{blocking_period}\" is already closed")]
    NextPeriodClosed {
        /// Name of the blocking period.
        blocking_period: String,
    },

    /// Reopening requires a reason for the audit trail.
    #[error("A reason is required to reopen a period")]
    ReasonRequired,

    // ========== Permanent close ==========
    /// Only a closed period can be permanently closed.
    #[error("Period must be closed before it can be permanently closed (current status: {current})")]
    MustBeClosedFirst {
        /// The period's current status.
        current: PeriodStatus,
    },

    /// The confirmation token was missing or wrong.
    #[error("Permanent closing requires the exact confirmation token")]
    ConfirmationRequired,
}

impl PeriodError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyClosed => "ALREADY_CLOSED",
            Self::AlreadyPermanentlyClosed => "ALREADY_PERMANENTLY_CLOSED",
            Self::ValidationFailed { .. } => "VALIDATION_FAILED",
            Self::NotClosed { .. } => "NOT_CLOSED",
            Self::PermanentlyClosedCannotReopen => "PERMANENTLY_CLOSED",
            Self::NextPeriodClosed { .. } => "NEXT_PERIOD_CLOSED",
            Self::ReasonRequired => "REASON_REQUIRED",
            Self::MustBeClosedFirst { .. } => "MUST_BE_CLOSED_FIRST",
            Self::ConfirmationRequired => "CONFIRMATION_REQUIRED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::ReasonRequired | Self::ConfirmationRequired => 400,
            Self::AlreadyClosed
            | Self::AlreadyPermanentlyClosed
            | Self::NotClosed { .. }
            | Self::PermanentlyClosedCannotReopen
            | Self::NextPeriodClosed { .. }
            | Self::MustBeClosedFirst { .. }
            | Self::ValidationFailed { .. } => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(PeriodError::AlreadyClosed.error_code(), "ALREADY_CLOSED");
        assert_eq!(
            PeriodError::NextPeriodClosed {
                blocking_period: "February 2024".to_string()
            }
            .error_code(),
            "NEXT_PERIOD_CLOSED"
        );
        assert_eq!(
            PeriodError::ConfirmationRequired.error_code(),
            "CONFIRMATION_REQUIRED"
        );
        assert_eq!(
            PeriodError::ValidationFailed { failures: vec![] }.error_code(),
            "VALIDATION_FAILED"
        );
    }

    #[test]
    fn test_state_errors_name_current_status() {
        let err = PeriodError::NotClosed {
            current: PeriodStatus::Open,
        };
        assert!(err.to_string().contains("Open"));

        let err = PeriodError::MustBeClosedFirst {
            current: PeriodStatus::PermanentlyClosed,
        };
        assert!(err.to_string().contains("Permanently Closed"));
    }

    #[test]
    fn test_next_period_closed_names_blocker() {
        let err = PeriodError::NextPeriodClosed {
            blocking_period: "February 2024".to_string(),
        };
        assert!(err.to_string().contains("February 2024"));
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(PeriodError::ConfirmationRequired.http_status_code(), 400);
        assert_eq!(PeriodError::AlreadyClosed.http_status_code(), 422);
        assert_eq!(
            PeriodError::ValidationFailed { failures: vec![] }.http_status_code(),
            422
        );
    }
}
