//! End-to-end tests for closing configuration changes.

mod common;

use common::{Fixture, roles};

use ledgerlock_gateway::{ClosingConfigUpdate, LedgerGateway, ServiceError};

#[tokio::test]
async fn test_update_config_requires_authorization() {
    let fx = Fixture::new();

    let result = fx
        .service
        .update_config(
            "sam@example.com",
            &roles(&["Sales User"]),
            ClosingConfigUpdate {
                closing_role: Some("Sales User".to_string()),
                ..ClosingConfigUpdate::default()
            },
        )
        .await;

    assert!(matches!(result, Err(ServiceError::Authz(_))));

    // The configuration is unchanged.
    let config = fx.gateway.closing_config().await.unwrap();
    assert_eq!(config.closing_role, "Accounts Manager");
}

#[tokio::test]
async fn test_update_config_merges_partial_update() {
    let fx = Fixture::new();

    let updated = fx
        .service
        .update_config(
            "jane@example.com",
            &roles(&["Accounts Manager"]),
            ClosingConfigUpdate {
                reopen_role: Some("Controller".to_string()),
                ..ClosingConfigUpdate::default()
            },
        )
        .await
        .unwrap();

    // Touched field changed, the rest kept.
    assert_eq!(updated.reopen_role, "Controller");
    assert_eq!(updated.closing_role, "Accounts Manager");
    assert_eq!(updated.retained_earnings_account, Some(fx.retained.id));
    assert!(updated.notify_on_reopen);
}

#[tokio::test]
async fn test_changed_closing_role_takes_effect() {
    let fx = Fixture::new();

    fx.service
        .update_config(
            "root@example.com",
            &roles(&["System Manager"]),
            ClosingConfigUpdate {
                closing_role: Some("Finance Lead".to_string()),
                ..ClosingConfigUpdate::default()
            },
        )
        .await
        .unwrap();

    // The old closing role may no longer close periods.
    let result = fx
        .service
        .close(
            fx.january.id,
            fx.company,
            "jane@example.com",
            &roles(&["Accounts Manager"]),
            false,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::Authz(_))));

    // The new role may.
    let outcome = fx
        .service
        .close(
            fx.january.id,
            fx.company,
            "lee@example.com",
            &roles(&["Finance Lead"]),
            false,
        )
        .await
        .unwrap();
    assert_eq!(
        outcome.period.status,
        ledgerlock_core::period::PeriodStatus::Closed
    );
}
