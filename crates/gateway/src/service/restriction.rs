//! Write restriction checks against closed periods.

use chrono::NaiveDate;
use tracing::error;

use ledgerlock_core::audit::{AuditAction, AuditLogEntry, NewAuditLogEntry};
use ledgerlock_core::period::AccountingPeriod;
use ledgerlock_core::restriction::{WriteCheck, evaluate_write};
use ledgerlock_shared::types::CompanyId;

use super::{PeriodClosingService, ServiceError};

/// A prospective ledger write to check.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// Company the write belongs to.
    pub company_id: CompanyId,
    /// Effective date of the write. Absent means no restriction applies.
    pub posting_date: Option<NaiveDate>,
    /// Document type of the write (e.g., "Sales Invoice").
    pub doctype: String,
    /// Document name, when an existing document is modified.
    pub docname: Option<String>,
    /// The acting user.
    pub user: String,
    /// The acting user's roles.
    pub roles: Vec<String>,
}

impl PeriodClosingService {
    /// Checks whether a prospective write is permitted.
    ///
    /// Read-only and fully parallelizable. On a lookup failure this fails
    /// OPEN - the write is allowed and the error is logged - because a
    /// gateway outage must not block all transaction activity system-wide.
    pub async fn check_write(&self, request: &WriteRequest) -> WriteCheck {
        let Some(posting_date) = request.posting_date else {
            return WriteCheck::allow();
        };

        let period = match self
            .gateway
            .restricting_period(request.company_id, posting_date)
            .await
        {
            Ok(period) => period,
            Err(e) => {
                error!(
                    company_id = %request.company_id,
                    posting_date = %posting_date,
                    doctype = request.doctype,
                    error = %e,
                    "Restriction lookup failed; allowing write (fail-open)"
                );
                return WriteCheck::allow_after_lookup_error(e);
            }
        };

        if period.is_none() {
            return WriteCheck::allow();
        }

        let config = match self.gateway.closing_config().await {
            Ok(config) => config,
            Err(e) => {
                error!(
                    company_id = %request.company_id,
                    posting_date = %posting_date,
                    error = %e,
                    "Closing config lookup failed; allowing write (fail-open)"
                );
                return WriteCheck::allow_after_lookup_error(e);
            }
        };

        evaluate_write(period, &request.roles, &config)
    }

    /// Records the mandatory audit entry for an overridden write.
    ///
    /// Callers receiving `requires_logging = true` from
    /// [`check_write`](Self::check_write) are obliged to call this with
    /// the affected document once the write lands.
    pub async fn record_override(
        &self,
        period: &AccountingPeriod,
        request: &WriteRequest,
        reason: Option<String>,
    ) -> Result<AuditLogEntry, ServiceError> {
        let docname = request.docname.clone().unwrap_or_else(|| "new".to_string());
        let reason = reason.unwrap_or_else(|| {
            format!(
                "{} modified {} {} in closed period {}",
                request.user, request.doctype, docname, period.name
            )
        });

        let entry = self
            .gateway
            .append_audit(
                NewAuditLogEntry::new(
                    period.id,
                    AuditAction::TransactionModified,
                    request.user.clone(),
                )
                .with_reason(reason)
                .with_transaction(docname, request.doctype.clone()),
            )
            .await?;

        Ok(entry)
    }
}
