mod common;

use axum::http::StatusCode;
use std::time::Duration;

use cloudops_dash::core::{ContainerId, FailureKind, FetchError};
use common::{stats_body, MockBackend};

#[tokio::test]
async fn test_list_containers_decodes_inventory() {
    let backend = MockBackend::start().await;
    backend.containers_reply(
        StatusCode::OK,
        r#"{"containers":[
            {"id":"a1b2c3d4e5f6a7b8","name":"web","image":"nginx:latest","status":"running"},
            {"id":"ffff0000eeee1111","name":"db","image":"postgres:16","status":"exited"}
        ]}"#,
    );

    let containers = backend.client().list_containers().await.unwrap();
    assert_eq!(containers.len(), 2);
    assert_eq!(containers[0].name, "web");
    assert_eq!(containers[0].id.short(), "a1b2c3d4e5f6");
    assert!(containers[0].state().is_running());
    assert_eq!(containers[1].status, "exited");
}

#[tokio::test]
async fn test_empty_inventory_is_success() {
    let backend = MockBackend::start().await;
    backend.containers_reply(StatusCode::OK, r#"{"containers":[]}"#);

    let containers = backend.client().list_containers().await.unwrap();
    assert!(containers.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_network_failure() {
    let backend = MockBackend::start().await;
    backend.containers_reply(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"docker unavailable"}"#);

    let err = backend.client().list_containers().await.unwrap_err();
    assert_eq!(err, FetchError::Status { status: 500 });
    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn test_wrong_shape_is_decode_failure() {
    let backend = MockBackend::start().await;
    backend.stats_reply(StatusCode::OK, r#"{"cpu_percent":"high"}"#);

    let err = backend
        .client()
        .container_stats(&ContainerId::new("abc"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::Decode);
}

#[tokio::test]
async fn test_stats_hits_entity_path() {
    let backend = MockBackend::start().await;
    backend.stats_reply(StatusCode::OK, &stats_body("abc123", 12.5, 25.0));

    let stats = backend
        .client()
        .container_stats(&ContainerId::new("abc123"))
        .await
        .unwrap();

    assert_eq!(backend.script.last_stats_id().as_deref(), Some("abc123"));
    assert_eq!(stats.container_id, "abc123");
    assert_eq!(stats.cpu_percent, 12.5);
    assert_eq!(stats.memory_usage_bytes(), 52_428_800);
}

#[tokio::test]
async fn test_missing_container_id_defaults_to_empty() {
    let backend = MockBackend::start().await;
    backend.stats_reply(
        StatusCode::OK,
        r#"{"cpu_percent":0,"memory_usage":0,"memory_limit":0,"memory_percent":0}"#,
    );

    let stats = backend
        .client()
        .container_stats(&ContainerId::new("unknown"))
        .await
        .unwrap();
    assert_eq!(stats.container_id, "");
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let backend = MockBackend::start().await;
    backend.stats_delay(Duration::from_millis(500));
    backend.stats_reply(StatusCode::OK, &stats_body("abc", 1.0, 1.0));

    let err = backend
        .client_with_timeout(Duration::from_millis(100))
        .container_stats(&ContainerId::new("abc"))
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::Timeout(Duration::from_millis(100)));
    assert_eq!(err.kind(), FailureKind::Network);
}

#[tokio::test]
async fn test_container_id_reaches_backend_unchanged() {
    let backend = MockBackend::start().await;
    backend.stats_reply(StatusCode::OK, &stats_body("abc", 1.0, 1.0));
    let client = backend.client();

    for id in ["web#1", "a?b", "a/b", "with space", "50%"] {
        let result = client.container_stats(&ContainerId::new(id)).await;
        assert!(result.is_ok(), "stats for {:?} failed: {:?}", id, result);
        assert_eq!(backend.script.last_stats_id().as_deref(), Some(id));
    }
}
