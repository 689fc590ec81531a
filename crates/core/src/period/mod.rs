//! Accounting period lifecycle.
//!
//! Owns the three-state lifecycle (Open, Closed, Permanently Closed), the
//! metadata recorded at each transition, and the transition rules.

pub mod error;
pub mod machine;
pub mod types;

#[cfg(test)]
mod machine_props;

pub use error::PeriodError;
pub use machine::{PERMANENT_CLOSE_CONFIRMATION, PeriodStateMachine, PeriodTransition};
pub use types::{AccountingPeriod, PeriodStatus};
