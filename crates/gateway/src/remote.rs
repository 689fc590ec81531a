//! HTTP client implementation of the ledger gateway.
//!
//! The gateway is a separate service owning all durable state; this client
//! maps the trait surface onto its REST API. Authentication is a bearer
//! token; bodies are JSON.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ledgerlock_core::audit::{AuditLogEntry, NewAuditLogEntry};
use ledgerlock_core::authz::ClosingConfig;
use ledgerlock_core::closing::{AccountMeta, LedgerLine};
use ledgerlock_core::period::{AccountingPeriod, PeriodStatus, PeriodTransition};
use ledgerlock_shared::config::GatewayConfig;
use ledgerlock_shared::types::{AccountId, CompanyId, JournalId, PeriodId};

use crate::error::GatewayError;
use crate::gateway::LedgerGateway;
use crate::types::{JournalEntry, NewJournalEntry};

/// Error body returned by the gateway on failures.
#[derive(Debug, Deserialize)]
struct RemoteErrorBody {
    message: Option<String>,
    expected: Option<PeriodStatus>,
    actual: Option<PeriodStatus>,
}

/// REST client for the ledger gateway.
pub struct RemoteLedgerGateway {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl RemoteLedgerGateway {
    /// Creates a client from gateway configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GatewayError::from)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn handle<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(GatewayError::from);
        }

        let code = status.as_u16();
        let body: RemoteErrorBody = response.json().await.unwrap_or(RemoteErrorBody {
            message: None,
            expected: None,
            actual: None,
        });

        if code == 409
            && let (Some(expected), Some(actual)) = (body.expected, body.actual)
        {
            return Err(GatewayError::StatusConflict { expected, actual });
        }

        Err(GatewayError::Remote {
            status: code,
            message: body.message.unwrap_or_else(|| "no message".to_string()),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        debug!(path, "gateway GET");
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        self.handle(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        debug!(path, "gateway POST");
        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;
        self.handle(response).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        debug!(path, "gateway PUT");
        let response = self
            .client
            .put(self.url(path))
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await?;
        self.handle(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), GatewayError> {
        debug!(path, "gateway DELETE");
        let response = self
            .client
            .delete(self.url(path))
            .bearer_auth(&self.api_token)
            .send()
            .await?;
        let _: serde_json::Value = self.handle(response).await?;
        Ok(())
    }
}

#[async_trait]
impl LedgerGateway for RemoteLedgerGateway {
    async fn ledger_lines(
        &self,
        company_id: CompanyId,
        through: NaiveDate,
    ) -> Result<Vec<LedgerLine>, GatewayError> {
        self.get(&format!(
            "/api/v1/companies/{company_id}/ledger-lines?through={through}"
        ))
        .await
    }

    async fn accounts(&self, company_id: CompanyId) -> Result<Vec<AccountMeta>, GatewayError> {
        self.get(&format!("/api/v1/companies/{company_id}/accounts"))
            .await
    }

    async fn find_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AccountMeta>, GatewayError> {
        self.get(&format!("/api/v1/accounts/{account_id}")).await
    }

    async fn find_period(
        &self,
        period_id: PeriodId,
    ) -> Result<Option<AccountingPeriod>, GatewayError> {
        self.get(&format!("/api/v1/periods/{period_id}")).await
    }

    async fn list_periods(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<AccountingPeriod>, GatewayError> {
        self.get(&format!("/api/v1/companies/{company_id}/periods"))
            .await
    }

    async fn insert_period(
        &self,
        period: AccountingPeriod,
    ) -> Result<AccountingPeriod, GatewayError> {
        self.post("/api/v1/periods", &period).await
    }

    async fn restricting_period(
        &self,
        company_id: CompanyId,
        posting_date: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, GatewayError> {
        self.get(&format!(
            "/api/v1/companies/{company_id}/periods/restricting?posting_date={posting_date}"
        ))
        .await
    }

    async fn next_closed_period(
        &self,
        company_id: CompanyId,
        after: NaiveDate,
    ) -> Result<Option<AccountingPeriod>, GatewayError> {
        self.get(&format!(
            "/api/v1/companies/{company_id}/periods/next-closed?after={after}"
        ))
        .await
    }

    async fn apply_transition(
        &self,
        period_id: PeriodId,
        transition: &PeriodTransition,
    ) -> Result<AccountingPeriod, GatewayError> {
        self.post(&format!("/api/v1/periods/{period_id}/transition"), transition)
            .await
    }

    async fn insert_journal(
        &self,
        journal: NewJournalEntry,
    ) -> Result<JournalEntry, GatewayError> {
        self.post("/api/v1/journals", &journal).await
    }

    async fn submit_journal(&self, journal_id: JournalId) -> Result<(), GatewayError> {
        let _: serde_json::Value = self
            .post(&format!("/api/v1/journals/{journal_id}/submit"), &())
            .await?;
        Ok(())
    }

    async fn cancel_journal(&self, journal_id: JournalId) -> Result<(), GatewayError> {
        let _: serde_json::Value = self
            .post(&format!("/api/v1/journals/{journal_id}/cancel"), &())
            .await?;
        Ok(())
    }

    async fn delete_journal(&self, journal_id: JournalId) -> Result<(), GatewayError> {
        self.delete(&format!("/api/v1/journals/{journal_id}")).await
    }

    async fn find_journal(
        &self,
        journal_id: JournalId,
    ) -> Result<Option<JournalEntry>, GatewayError> {
        self.get(&format!("/api/v1/journals/{journal_id}")).await
    }

    async fn draft_journals(
        &self,
        company_id: CompanyId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<JournalEntry>, GatewayError> {
        self.get(&format!(
            "/api/v1/companies/{company_id}/journals/drafts?start={start}&end={end}"
        ))
        .await
    }

    async fn closing_config(&self) -> Result<ClosingConfig, GatewayError> {
        self.get("/api/v1/closing-config").await
    }

    async fn save_closing_config(&self, config: &ClosingConfig) -> Result<(), GatewayError> {
        let _: serde_json::Value = self.put("/api/v1/closing-config", config).await?;
        Ok(())
    }

    async fn append_audit(
        &self,
        entry: NewAuditLogEntry,
    ) -> Result<AuditLogEntry, GatewayError> {
        self.post("/api/v1/audit-logs", &entry).await
    }

    async fn audit_trail(
        &self,
        period_id: PeriodId,
    ) -> Result<Vec<AuditLogEntry>, GatewayError> {
        self.get(&format!("/api/v1/periods/{period_id}/audit-logs"))
            .await
    }

    async fn users_with_role(&self, role: &str) -> Result<Vec<String>, GatewayError> {
        let encoded = role.replace(' ', "%20");
        self.get(&format!("/api/v1/users?role={encoded}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GatewayConfig {
        GatewayConfig {
            base_url: "http://gateway.local/".to_string(),
            api_token: "secret".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gateway = RemoteLedgerGateway::new(&config()).unwrap();
        assert_eq!(
            gateway.url("/api/v1/closing-config"),
            "http://gateway.local/api/v1/closing-config"
        );
    }

    #[test]
    fn test_transition_wire_format() {
        let transition = ledgerlock_core::period::PeriodStateMachine::close(
            PeriodStatus::Open,
            "jane",
            JournalId::new(),
        )
        .unwrap();

        let json = serde_json::to_value(&transition).unwrap();
        assert_eq!(json["type"], "close");
        assert_eq!(json["closed_by"], "jane");
        assert!(json["closing_entry_id"].is_string());
    }
}
