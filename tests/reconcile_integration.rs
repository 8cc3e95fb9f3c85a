//! Integration tests for reconciliation against the in-memory API
//!
//! Checks end-state properties across repeated calls.

use cdn_backend_reconciler::adapters::outbound::CallCounts;
use cdn_backend_reconciler::{
    BackendAttributes, BackendReconciler, DesiredBackend, InMemoryCdnApi, InMemoryClientFactory,
    ReconcileError, RemoteBackend,
};
use std::sync::Arc;

fn setup() -> (BackendReconciler, Arc<InMemoryCdnApi>) {
    let api = Arc::new(InMemoryCdnApi::new());
    api.add_service("1234abc", "service_name", 10);
    api.add_service("cba4321", "another_service", 4);
    let reconciler = BackendReconciler::new(Arc::new(InMemoryClientFactory::new(api.clone())));
    (reconciler, api)
}

fn desired(name: &str) -> DesiredBackend {
    DesiredBackend::new(name, "service_name").with_api_key("an_api_key")
}

fn seeded(name: &str, address: &str) -> RemoteBackend {
    RemoteBackend {
        name: name.to_string(),
        address: address.to_string(),
        service_id: Some("1234abc".to_string()),
        version: Some(10),
        attributes: BackendAttributes::default(),
    }
}

#[tokio::test]
async fn test_absent_backend_is_created_once() {
    let (reconciler, api) = setup();

    let created = reconciler
        .reconcile(&desired("backend.domain.name"))
        .await
        .unwrap();

    assert_eq!(created.name, "backend.domain.name");
    assert_eq!(created.address, "backend.domain.name");
    assert_eq!(
        api.call_counts(),
        CallCounts {
            list_services: 1,
            list_backends: 1,
            create_backend: 1,
            update_backend: 0,
        }
    );
    assert_eq!(api.backends_at("1234abc", 10), vec![created]);
}

#[tokio::test]
async fn test_reconcile_twice_is_idempotent() {
    let (reconciler, api) = setup();
    let d = desired("backend.domain.name").with_attributes(BackendAttributes {
        port: Some(443),
        use_ssl: Some(true),
        ..Default::default()
    });

    let first = reconciler.reconcile(&d).await.unwrap();
    let after_first = api.backends_at("1234abc", 10);

    let second = reconciler.reconcile(&d).await.unwrap();
    let after_second = api.backends_at("1234abc", 10);

    assert_eq!(first, second);
    assert_eq!(after_first, after_second);
    assert_eq!(after_second.len(), 1);

    let counts = api.call_counts();
    assert_eq!(counts.create_backend, 1);
    assert_eq!(counts.update_backend, 1);
}

#[tokio::test]
async fn test_find_after_reconcile_round_trip() {
    let (reconciler, _) = setup();
    let d = desired("origin").with_address("origin.example.com");

    reconciler.reconcile(&d).await.unwrap();
    let found = reconciler.find(&d).await.unwrap().unwrap();

    assert_eq!(found.name, d.name);
    assert_eq!(found.address, d.effective_address());
}

#[tokio::test]
async fn test_address_change_updates_in_place() {
    let (reconciler, api) = setup();
    api.seed_backend("1234abc", 10, seeded("origin", "10.0.0.1"));

    let updated = reconciler
        .reconcile(&desired("origin").with_address("10.0.0.2"))
        .await
        .unwrap();

    assert_eq!(updated.address, "10.0.0.2");
    let stored = api.backends_at("1234abc", 10);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].address, "10.0.0.2");
}

#[tokio::test]
async fn test_find_matches_listing_example() {
    let (reconciler, api) = setup();
    api.seed_backend("1234abc", 10, seeded("backend.domain.name", "backend.domain.name"));
    api.seed_backend("1234abc", 10, seeded("backend.domain.name_http", "backend.domain.name"));
    api.seed_backend("1234abc", 10, seeded("example-2.name", "example-2.name"));

    let found = reconciler
        .find(&desired("backend.domain.name"))
        .await
        .unwrap();
    assert_eq!(found, Some(seeded("backend.domain.name", "backend.domain.name")));

    let absent = reconciler.find(&desired("not-found.name")).await.unwrap();
    assert!(absent.is_none());

    assert_eq!(api.call_counts().create_backend, 0);
    assert_eq!(api.call_counts().update_backend, 0);
}

#[tokio::test]
async fn test_duplicate_names_update_first() {
    let (reconciler, api) = setup();
    api.seed_backend("1234abc", 10, seeded("dup", "first.example"));
    api.seed_backend("1234abc", 10, seeded("dup", "second.example"));

    reconciler
        .reconcile(&desired("dup").with_address("third.example"))
        .await
        .unwrap();

    let stored = api.backends_at("1234abc", 10);
    assert_eq!(stored[0].address, "third.example");
    assert_eq!(stored[1].address, "second.example");
}

#[tokio::test]
async fn test_only_latest_version_is_touched() {
    let (reconciler, api) = setup();
    api.seed_backend("1234abc", 9, seeded("origin", "old.example"));

    reconciler.reconcile(&desired("origin")).await.unwrap();

    // Version 9 is not the latest, so origin was created at 10
    assert_eq!(api.backends_at("1234abc", 9)[0].address, "old.example");
    assert_eq!(api.backends_at("1234abc", 10).len(), 1);
    assert_eq!(api.call_counts().create_backend, 1);
}

#[tokio::test]
async fn test_unknown_service_leaves_state_untouched() {
    let (reconciler, api) = setup();
    let mut d = desired("origin");
    d.service = "not_found".to_string();

    assert!(matches!(
        reconciler.reconcile(&d).await,
        Err(ReconcileError::ServiceNotFound { .. })
    ));
    assert!(matches!(
        reconciler.find(&d).await,
        Err(ReconcileError::ServiceNotFound { .. })
    ));
    assert!(api.backends_at("1234abc", 10).is_empty());
}

#[tokio::test]
async fn test_other_service_is_isolated() {
    let (reconciler, api) = setup();
    let mut d = desired("origin");
    d.service = "another_service".to_string();

    reconciler.reconcile(&d).await.unwrap();

    assert_eq!(api.backends_at("cba4321", 4).len(), 1);
    assert!(api.backends_at("1234abc", 10).is_empty());
    assert!(reconciler.find(&desired("origin")).await.unwrap().is_none());
}

#[tokio::test]
#[tracing_test::traced_test]
async fn test_create_and_update_are_logged() {
    let (reconciler, _) = setup();
    let d = desired("logged.example");

    reconciler.reconcile(&d).await.unwrap();
    reconciler.reconcile(&d).await.unwrap();

    assert!(logs_contain("created backend logged.example"));
    assert!(logs_contain("updated backend logged.example"));
}
