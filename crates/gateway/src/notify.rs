//! Reopen notifications.
//!
//! Reopening a closed period is disruptive enough that users holding the
//! reopen role are told about it. Delivery is fire-and-forget: a failed
//! notification never fails the reopen itself.

use async_trait::async_trait;
use tracing::{info, warn};

use ledgerlock_core::period::AccountingPeriod;
use ledgerlock_shared::email::EmailService;

/// Delivers period-reopened notices.
#[async_trait]
pub trait ReopenNotifier: Send + Sync {
    /// Notifies `recipients` that `period` was reopened.
    async fn period_reopened(
        &self,
        period: &AccountingPeriod,
        recipients: &[String],
        reopened_by: &str,
        reason: &str,
    );
}

/// Notifier that only logs, for deployments without SMTP.
pub struct LogNotifier;

#[async_trait]
impl ReopenNotifier for LogNotifier {
    async fn period_reopened(
        &self,
        period: &AccountingPeriod,
        recipients: &[String],
        reopened_by: &str,
        reason: &str,
    ) {
        info!(
            period = %period.name,
            reopened_by,
            reason,
            recipients = recipients.len(),
            "Period reopened"
        );
    }
}

/// Notifier that emails every recipient via SMTP.
pub struct EmailNotifier {
    email: EmailService,
}

impl EmailNotifier {
    /// Creates a notifier backed by the given email service.
    #[must_use]
    pub const fn new(email: EmailService) -> Self {
        Self { email }
    }
}

#[async_trait]
impl ReopenNotifier for EmailNotifier {
    async fn period_reopened(
        &self,
        period: &AccountingPeriod,
        recipients: &[String],
        reopened_by: &str,
        reason: &str,
    ) {
        for recipient in recipients {
            if let Err(e) = self
                .email
                .send_period_reopened_email(recipient, &period.name, reopened_by, reason)
                .await
            {
                warn!(
                    period = %period.name,
                    recipient,
                    error = %e,
                    "Failed to send reopen notification"
                );
            }
        }
    }
}
