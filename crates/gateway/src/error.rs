//! Error types for ledger gateway operations.

use thiserror::Error;

use ledgerlock_core::period::PeriodStatus;

/// Errors that can occur while talking to the ledger gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway could not be reached.
    #[error("Gateway transport error: {0}")]
    Transport(String),

    /// The gateway answered with a non-success status.
    #[error("Gateway returned {status}: {message}")]
    Remote {
        /// HTTP status code of the response.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The gateway's response could not be decoded.
    #[error("Failed to decode gateway response: {0}")]
    Decode(String),

    /// A referenced entity does not exist at the gateway.
    #[error("Not found at gateway: {0}")]
    NotFound(String),

    /// A conditional period update found a different status than expected.
    ///
    /// Raised by the compare-and-set write when a concurrent caller won
    /// the transition race.
    #[error("Period status changed concurrently: expected {expected}, found {actual}")]
    StatusConflict {
        /// The status the transition required.
        expected: PeriodStatus,
        /// The status actually found.
        actual: PeriodStatus,
    },

    /// A document operation was attempted in the wrong docstatus.
    #[error("Invalid document state: {0}")]
    InvalidDocumentState(String),
}

impl GatewayError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Transport(_) => "GATEWAY_UNREACHABLE",
            Self::Remote { .. } => "GATEWAY_ERROR",
            Self::Decode(_) => "GATEWAY_DECODE_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::StatusConflict { .. } => "CONCURRENT_MODIFICATION",
            Self::InvalidDocumentState(_) => "INVALID_DOCUMENT_STATE",
        }
    }

    /// Returns true if retrying the operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::StatusConflict { .. })
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
