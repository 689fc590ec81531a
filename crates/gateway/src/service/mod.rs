//! Period closing services.
//!
//! Orchestrates the core rules against the ledger gateway: close, reopen,
//! permanently close, write restriction checks, configuration, and period
//! administration.

pub mod close;
pub mod config;
pub mod error;
pub mod periods;
pub mod permanent;
pub mod reopen;
pub mod restriction;

use std::sync::Arc;

use ledgerlock_core::audit::AuditLogEntry;
use ledgerlock_core::period::AccountingPeriod;
use ledgerlock_shared::types::{CompanyId, PeriodId};

use crate::gateway::LedgerGateway;
use crate::notify::{LogNotifier, ReopenNotifier};
use crate::validate::{CloseValidator, DraftJournalCheck};

pub use close::CloseOutcome;
pub use config::ClosingConfigUpdate;
pub use error::ServiceError;
pub use periods::{ClosingPreview, CreatePeriodInput};
pub use restriction::WriteRequest;

/// Stateless request-scoped service for period closing operations.
///
/// Holds no mutable state of its own; all durable state lives behind the
/// gateway. Cloning is cheap.
#[derive(Clone)]
pub struct PeriodClosingService {
    pub(crate) gateway: Arc<dyn LedgerGateway>,
    pub(crate) notifier: Arc<dyn ReopenNotifier>,
    pub(crate) validator: Arc<dyn CloseValidator>,
}

impl PeriodClosingService {
    /// Creates a service with the default validator (draft journal check)
    /// and a log-only notifier.
    #[must_use]
    pub fn new(gateway: Arc<dyn LedgerGateway>) -> Self {
        Self {
            gateway,
            notifier: Arc::new(LogNotifier),
            validator: Arc::new(DraftJournalCheck),
        }
    }

    /// Replaces the reopen notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn ReopenNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Replaces the pre-close validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn CloseValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Fetches a period, verifying it belongs to `company_id`.
    pub(crate) async fn require_period(
        &self,
        period_id: PeriodId,
        company_id: CompanyId,
    ) -> Result<AccountingPeriod, ServiceError> {
        let period = self
            .gateway
            .find_period(period_id)
            .await?
            .ok_or(ServiceError::PeriodNotFound(period_id))?;

        if period.company_id != company_id {
            return Err(ServiceError::CompanyMismatch {
                period: period_id,
                company: company_id,
            });
        }

        Ok(period)
    }

    /// Fetches a period by id.
    pub async fn period(&self, period_id: PeriodId) -> Result<AccountingPeriod, ServiceError> {
        self.gateway
            .find_period(period_id)
            .await?
            .ok_or(ServiceError::PeriodNotFound(period_id))
    }

    /// Lists a company's periods, ordered by start date.
    pub async fn list_periods(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<AccountingPeriod>, ServiceError> {
        Ok(self.gateway.list_periods(company_id).await?)
    }

    /// The audit trail of a period, oldest first.
    pub async fn audit_trail(
        &self,
        period_id: PeriodId,
    ) -> Result<Vec<AuditLogEntry>, ServiceError> {
        Ok(self.gateway.audit_trail(period_id).await?)
    }
}
