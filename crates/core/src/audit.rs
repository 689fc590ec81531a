//! Append-only audit trail types.
//!
//! Every state transition and every administrator override is recorded as
//! an immutable audit log entry. Before/after snapshots are serialized
//! from a fixed, small set of period fields so entries stay diffable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use ledgerlock_shared::types::{AuditLogId, JournalId, PeriodId};

use crate::period::{AccountingPeriod, PeriodStatus};

/// The recorded action of an audit log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    /// A period was created.
    Created,
    /// A period was closed.
    Closed,
    /// A period was reopened.
    Reopened,
    /// A period was permanently closed.
    #[serde(rename = "Permanently Closed")]
    PermanentlyClosed,
    /// A transaction inside a closed period was modified under override.
    #[serde(rename = "Transaction Modified")]
    TransactionModified,
}

impl AuditAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Closed => "Closed",
            Self::Reopened => "Reopened",
            Self::PermanentlyClosed => "Permanently Closed",
            Self::TransactionModified => "Transaction Modified",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable audit log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique identifier.
    pub id: AuditLogId,
    /// The period the action concerned.
    pub period_id: PeriodId,
    /// What happened.
    pub action: AuditAction,
    /// Who did it.
    pub action_by: String,
    /// When it happened.
    pub action_date: DateTime<Utc>,
    /// Caller-supplied reason, where the action demands one.
    pub reason: Option<String>,
    /// Serialized period fields before the action.
    pub before_snapshot: Option<String>,
    /// Serialized period fields after the action.
    pub after_snapshot: Option<String>,
    /// The affected document, for override entries.
    pub affected_transaction: Option<String>,
    /// The affected document's type, for override entries.
    pub transaction_doctype: Option<String>,
}

/// A new audit log entry, before the gateway assigns it an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditLogEntry {
    /// The period the action concerns.
    pub period_id: PeriodId,
    /// What happened.
    pub action: AuditAction,
    /// Who did it.
    pub action_by: String,
    /// Caller-supplied reason.
    pub reason: Option<String>,
    /// Serialized period fields before the action.
    pub before_snapshot: Option<String>,
    /// Serialized period fields after the action.
    pub after_snapshot: Option<String>,
    /// The affected document, for override entries.
    pub affected_transaction: Option<String>,
    /// The affected document's type, for override entries.
    pub transaction_doctype: Option<String>,
}

impl NewAuditLogEntry {
    /// Creates a minimal entry for `action` on `period_id` by `action_by`.
    #[must_use]
    pub fn new(period_id: PeriodId, action: AuditAction, action_by: impl Into<String>) -> Self {
        Self {
            period_id,
            action,
            action_by: action_by.into(),
            reason: None,
            before_snapshot: None,
            after_snapshot: None,
            affected_transaction: None,
            transaction_doctype: None,
        }
    }

    /// Attaches a reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches before/after snapshots.
    #[must_use]
    pub fn with_snapshots(mut self, before: &PeriodSnapshot, after: &PeriodSnapshot) -> Self {
        self.before_snapshot = Some(before.to_json());
        self.after_snapshot = Some(after.to_json());
        self
    }

    /// Attaches the affected document for an override entry.
    #[must_use]
    pub fn with_transaction(
        mut self,
        docname: impl Into<String>,
        doctype: impl Into<String>,
    ) -> Self {
        self.affected_transaction = Some(docname.into());
        self.transaction_doctype = Some(doctype.into());
        self
    }
}

/// Stable serialization of the period fields that transitions touch.
///
/// Deliberately not the whole period: the date range and name never change
/// after creation, and keeping the snapshot narrow keeps audit entries
/// diffable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    /// Lifecycle status.
    pub status: PeriodStatus,
    /// User who closed the period.
    pub closed_by: Option<String>,
    /// When the period was closed.
    pub closed_on: Option<DateTime<Utc>>,
    /// The linked closing entry.
    pub closing_entry_id: Option<JournalId>,
    /// User who permanently closed the period.
    pub permanently_closed_by: Option<String>,
    /// When the period was permanently closed.
    pub permanently_closed_on: Option<DateTime<Utc>>,
}

impl PeriodSnapshot {
    /// Serializes the snapshot as JSON in declaration order.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl From<&AccountingPeriod> for PeriodSnapshot {
    fn from(period: &AccountingPeriod) -> Self {
        Self {
            status: period.status,
            closed_by: period.closed_by.clone(),
            closed_on: period.closed_on,
            closing_entry_id: period.closing_entry_id,
            permanently_closed_by: period.permanently_closed_by.clone(),
            permanently_closed_on: period.permanently_closed_on,
        }
    }
}
