//! Property-based tests for the period state machine.

use proptest::prelude::*;

use ledgerlock_shared::types::JournalId;

use super::machine::{PERMANENT_CLOSE_CONFIRMATION, PeriodStateMachine};
use super::types::PeriodStatus;

fn status_strategy() -> impl Strategy<Value = PeriodStatus> {
    prop_oneof![
        Just(PeriodStatus::Open),
        Just(PeriodStatus::Closed),
        Just(PeriodStatus::PermanentlyClosed),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Closing succeeds only from Open.
    #[test]
    fn prop_close_only_from_open(status in status_strategy()) {
        let result = PeriodStateMachine::close(status, "user", JournalId::new());
        prop_assert_eq!(result.is_ok(), status == PeriodStatus::Open);
    }

    /// Reopening succeeds only from Closed (with a reason and no blocker).
    #[test]
    fn prop_reopen_only_from_closed(status in status_strategy()) {
        let result = PeriodStateMachine::reopen(status, "user", "reason".to_string(), None);
        prop_assert_eq!(result.is_ok(), status == PeriodStatus::Closed);
    }

    /// The terminal state is absorbing: no transition leaves it.
    #[test]
    fn prop_permanently_closed_is_absorbing(target in status_strategy()) {
        prop_assert!(!PeriodStateMachine::is_valid_transition(
            PeriodStatus::PermanentlyClosed,
            target,
        ));
    }

    /// Anything but the exact literal token is rejected.
    #[test]
    fn prop_wrong_confirmation_rejected(token in "[a-zA-Z]{0,12}") {
        prop_assume!(token != PERMANENT_CLOSE_CONFIRMATION);
        let result = PeriodStateMachine::permanently_close(PeriodStatus::Closed, "root", &token);
        prop_assert!(result.is_err());
    }

    /// Every successful transition's expected status matches the status it
    /// was validated against, so the compare-and-set is self-consistent.
    #[test]
    fn prop_transitions_are_cas_consistent(status in status_strategy()) {
        if let Ok(t) = PeriodStateMachine::close(status, "user", JournalId::new()) {
            prop_assert_eq!(t.expected_status(), status);
            prop_assert!(PeriodStateMachine::is_valid_transition(status, t.new_status()));
        }
        if let Ok(t) = PeriodStateMachine::reopen(status, "user", "reason".to_string(), None) {
            prop_assert_eq!(t.expected_status(), status);
            prop_assert!(PeriodStateMachine::is_valid_transition(status, t.new_status()));
        }
        if let Ok(t) = PeriodStateMachine::permanently_close(
            status,
            "root",
            PERMANENT_CLOSE_CONFIRMATION,
        ) {
            prop_assert_eq!(t.expected_status(), status);
            prop_assert!(PeriodStateMachine::is_valid_transition(status, t.new_status()));
        }
    }
}
