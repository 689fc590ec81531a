//! State machine for period lifecycle transitions.
//!
//! Each transition validates the current status and produces a
//! `PeriodTransition` carrying the metadata to record and the status the
//! period must still hold when the write lands. The gateway applies the
//! transition as a single conditional update (compare-and-set), so two
//! concurrent callers cannot both succeed from the same starting state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ledgerlock_shared::types::JournalId;

use super::error::PeriodError;
use super::types::{AccountingPeriod, PeriodStatus};

/// The literal confirmation token required to permanently close a period.
///
/// Matched case-sensitively; anything else fails `ConfirmationRequired`.
pub const PERMANENT_CLOSE_CONFIRMATION: &str = "PERMANENT";

/// A validated state transition with audit data.
///
/// Each variant captures the resulting status, the expected prior status
/// for the compare-and-set write, and the metadata recorded alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeriodTransition {
    /// Close an open period.
    Close {
        /// The user who closed the period.
        closed_by: String,
        /// When the period was closed.
        closed_on: DateTime<Utc>,
        /// The closing entry produced for the period.
        closing_entry_id: JournalId,
    },
    /// Reopen a closed period.
    Reopen {
        /// The user who reopened the period.
        reopened_by: String,
        /// The caller-supplied reason, recorded in the audit trail.
        reason: String,
    },
    /// Permanently close a closed period. Irreversible.
    PermanentlyClose {
        /// The user who permanently closed the period.
        closed_by: String,
        /// When the period was permanently closed.
        closed_on: DateTime<Utc>,
    },
}

impl PeriodTransition {
    /// The status the period must hold for this transition to apply.
    #[must_use]
    pub fn expected_status(&self) -> PeriodStatus {
        match self {
            Self::Close { .. } => PeriodStatus::Open,
            Self::Reopen { .. } | Self::PermanentlyClose { .. } => PeriodStatus::Closed,
        }
    }

    /// The status the period holds after this transition.
    #[must_use]
    pub fn new_status(&self) -> PeriodStatus {
        match self {
            Self::Close { .. } => PeriodStatus::Closed,
            Self::Reopen { .. } => PeriodStatus::Open,
            Self::PermanentlyClose { .. } => PeriodStatus::PermanentlyClosed,
        }
    }
}

/// Stateless service validating period lifecycle transitions.
pub struct PeriodStateMachine;

impl PeriodStateMachine {
    /// Validates closing an open period.
    ///
    /// # Errors
    ///
    /// * `AlreadyClosed` if the period is closed
    /// * `AlreadyPermanentlyClosed` if the period is permanently closed
    pub fn close(
        current_status: PeriodStatus,
        closed_by: impl Into<String>,
        closing_entry_id: JournalId,
    ) -> Result<PeriodTransition, PeriodError> {
        match current_status {
            PeriodStatus::Open => Ok(PeriodTransition::Close {
                closed_by: closed_by.into(),
                closed_on: Utc::now(),
                closing_entry_id,
            }),
            PeriodStatus::Closed => Err(PeriodError::AlreadyClosed),
            PeriodStatus::PermanentlyClosed => Err(PeriodError::AlreadyPermanentlyClosed),
        }
    }

    /// Validates reopening a closed period.
    ///
    /// `next_closed_period` is the earliest later period of the same
    /// company whose status is Closed or Permanently Closed, if any; a
    /// period cannot be reopened underneath an already-locked successor.
    ///
    /// # Errors
    ///
    /// * `ReasonRequired` if `reason` is empty or whitespace
    /// * `NotClosed` if the period is open
    /// * `PermanentlyClosedCannotReopen` if the period is permanently closed
    /// * `NextPeriodClosed` if a later period is locked
    pub fn reopen(
        current_status: PeriodStatus,
        reopened_by: impl Into<String>,
        reason: String,
        next_closed_period: Option<&AccountingPeriod>,
    ) -> Result<PeriodTransition, PeriodError> {
        if reason.trim().is_empty() {
            return Err(PeriodError::ReasonRequired);
        }

        match current_status {
            PeriodStatus::Open => {
                return Err(PeriodError::NotClosed {
                    current: current_status,
                });
            }
            PeriodStatus::PermanentlyClosed => {
                return Err(PeriodError::PermanentlyClosedCannotReopen);
            }
            PeriodStatus::Closed => {}
        }

        if let Some(blocking) = next_closed_period {
            return Err(PeriodError::NextPeriodClosed {
                blocking_period: blocking.name.clone(),
            });
        }

        Ok(PeriodTransition::Reopen {
            reopened_by: reopened_by.into(),
            reason,
        })
    }

    /// Validates permanently closing a closed period.
    ///
    /// # Errors
    ///
    /// * `MustBeClosedFirst` unless the period is exactly Closed
    /// * `ConfirmationRequired` unless `confirmation` is the exact literal
    ///   [`PERMANENT_CLOSE_CONFIRMATION`]
    pub fn permanently_close(
        current_status: PeriodStatus,
        closed_by: impl Into<String>,
        confirmation: &str,
    ) -> Result<PeriodTransition, PeriodError> {
        if current_status != PeriodStatus::Closed {
            return Err(PeriodError::MustBeClosedFirst {
                current: current_status,
            });
        }

        if confirmation != PERMANENT_CLOSE_CONFIRMATION {
            return Err(PeriodError::ConfirmationRequired);
        }

        Ok(PeriodTransition::PermanentlyClose {
            closed_by: closed_by.into(),
            closed_on: Utc::now(),
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Open -> Closed (close)
    /// - Closed -> Open (reopen)
    /// - Closed -> Permanently Closed (permanent close)
    #[must_use]
    pub fn is_valid_transition(from: PeriodStatus, to: PeriodStatus) -> bool {
        matches!(
            (from, to),
            (PeriodStatus::Open, PeriodStatus::Closed)
                | (
                    PeriodStatus::Closed,
                    PeriodStatus::Open | PeriodStatus::PermanentlyClosed
                )
        )
    }
}
