//! Ledger gateway client and period closing services.
//!
//! The ledger gateway is the external, append-only store of ledger lines,
//! accounting documents, periods, configuration, and audit logs. This
//! subsystem never owns storage; it reads and writes exclusively through
//! the [`LedgerGateway`] trait.
//!
//! This crate provides:
//! - The [`LedgerGateway`] trait - the collaborator boundary
//! - [`remote::RemoteLedgerGateway`] - HTTP client implementation
//! - [`memory::MemoryLedgerGateway`] - in-memory implementation for tests
//! - [`service::PeriodClosingService`] - the close/reopen/permanent-close
//!   and write-restriction orchestrations

pub mod error;
pub mod gateway;
pub mod memory;
pub mod notify;
pub mod remote;
pub mod service;
pub mod types;
pub mod validate;

pub use error::GatewayError;
pub use gateway::LedgerGateway;
pub use memory::MemoryLedgerGateway;
pub use notify::{LogNotifier, ReopenNotifier};
pub use remote::RemoteLedgerGateway;
pub use service::{
    CloseOutcome, ClosingConfigUpdate, ClosingPreview, CreatePeriodInput, PeriodClosingService,
    ServiceError, WriteRequest,
};
pub use types::{DocStatus, JournalEntry, JournalLine, NewJournalEntry};
pub use validate::{CloseValidator, DraftJournalCheck, NoopValidator, ValidationFailure};
