//! Role-based authorization gate for period operations.
//!
//! Resolves the acting user's roles against an explicitly injected
//! [`ClosingConfig`] (never a process-wide global, so tests can substitute
//! roles freely) and the hard-coded super-role rule: only "System Manager"
//! may permanently close a period.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use ledgerlock_shared::types::AccountId;

/// The super-role. Always authorized, and the only role allowed to
/// permanently close periods.
pub const SYSTEM_MANAGER_ROLE: &str = "System Manager";

/// Default role for closing and reopening periods.
pub const ACCOUNTS_MANAGER_ROLE: &str = "Accounts Manager";

/// Singleton configuration for the closing subsystem.
///
/// Mutated only through the explicitly authorized config-change operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingConfig {
    /// Equity account that accumulates net income/loss across periods.
    pub retained_earnings_account: Option<AccountId>,
    /// Role allowed to close periods.
    pub closing_role: String,
    /// Role allowed to reopen periods and override write restrictions.
    pub reopen_role: String,
    /// Whether reopening sends notifications to reopen-role holders.
    pub notify_on_reopen: bool,
}

impl Default for ClosingConfig {
    fn default() -> Self {
        Self {
            retained_earnings_account: None,
            closing_role: ACCOUNTS_MANAGER_ROLE.to_string(),
            reopen_role: ACCOUNTS_MANAGER_ROLE.to_string(),
            notify_on_reopen: true,
        }
    }
}

/// An operation guarded by the authorization gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodAction {
    /// Close an open period.
    Close,
    /// Reopen a closed period.
    Reopen,
    /// Permanently close a period (System Manager only).
    PermanentClose,
    /// Change the closing configuration.
    ChangeConfig,
    /// Write into a closed (not permanently closed) period.
    OverrideRestriction,
}

impl PeriodAction {
    /// Returns the string representation of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Close => "close",
            Self::Reopen => "reopen",
            Self::PermanentClose => "permanent_close",
            Self::ChangeConfig => "change_config",
            Self::OverrideRestriction => "override_restriction",
        }
    }
}

impl fmt::Display for PeriodAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured allow/deny outcome.
///
/// On deny this carries the role that would have been sufficient and the
/// caller's actual roles - part of the contract, not just a boolean,
/// because callers must render an actionable error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether the action is allowed.
    pub allowed: bool,
    /// On deny: the role that would have been sufficient.
    pub required_role: Option<String>,
    /// The caller's actual roles.
    pub user_roles: Vec<String>,
}

impl AccessDecision {
    /// Converts the decision into a result, surfacing denials as errors.
    pub fn require(self, action: PeriodAction) -> Result<(), AuthzError> {
        if self.allowed {
            Ok(())
        } else {
            Err(AuthzError::Denied {
                action,
                required_role: self
                    .required_role
                    .unwrap_or_else(|| SYSTEM_MANAGER_ROLE.to_string()),
                user_roles: self.user_roles,
            })
        }
    }
}

/// Authorization errors.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// The caller lacks the role required for the action.
    #[error("Not permitted to {action}. Required role: {required_role}")]
    Denied {
        /// The attempted action.
        action: PeriodAction,
        /// The role that would have been sufficient.
        required_role: String,
        /// The caller's actual roles.
        user_roles: Vec<String>,
    },
}

/// Returns true if `roles` contains `role` (exact match).
#[must_use]
pub fn has_role(roles: &[String], role: &str) -> bool {
    roles.iter().any(|r| r == role)
}

/// Resolves whether the caller may perform `action`.
///
/// Rule table:
///
/// | action              | allowed if                                   |
/// |---------------------|----------------------------------------------|
/// | Close               | System Manager OR `closing_role`             |
/// | Reopen              | System Manager OR `reopen_role`              |
/// | PermanentClose      | System Manager only                          |
/// | ChangeConfig        | System Manager OR Accounts Manager           |
/// | OverrideRestriction | System Manager OR `reopen_role`              |
#[must_use]
pub fn authorize(
    user_roles: &[String],
    action: PeriodAction,
    config: &ClosingConfig,
) -> AccessDecision {
    let (allowed, required_role) = match action {
        PeriodAction::Close => (
            has_role(user_roles, SYSTEM_MANAGER_ROLE) || has_role(user_roles, &config.closing_role),
            config.closing_role.clone(),
        ),
        PeriodAction::Reopen | PeriodAction::OverrideRestriction => (
            has_role(user_roles, SYSTEM_MANAGER_ROLE) || has_role(user_roles, &config.reopen_role),
            config.reopen_role.clone(),
        ),
        PeriodAction::PermanentClose => (
            has_role(user_roles, SYSTEM_MANAGER_ROLE),
            SYSTEM_MANAGER_ROLE.to_string(),
        ),
        PeriodAction::ChangeConfig => (
            has_role(user_roles, SYSTEM_MANAGER_ROLE)
                || has_role(user_roles, ACCOUNTS_MANAGER_ROLE),
            format!("{SYSTEM_MANAGER_ROLE} or {ACCOUNTS_MANAGER_ROLE}"),
        ),
    };

    AccessDecision {
        allowed,
        required_role: if allowed { None } else { Some(required_role) },
        user_roles: user_roles.to_vec(),
    }
}
