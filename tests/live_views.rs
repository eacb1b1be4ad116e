mod common;

use axum::http::StatusCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cloudops_dash::core::{
    mount_containers, ContainerId, ErrorPolicy, FetchError, PollOptions, PollResult, PollingSession, StatsView,
    Subject, ViewState,
};
use cloudops_dash::utils::{containers_failure_message, STATS_FAILURE_MESSAGE};
use common::{stats_body, wait_until, MockBackend};

fn fast() -> PollOptions {
    PollOptions::new(Duration::from_millis(40)).with_attempt_timeout(Duration::from_secs(1))
}

#[tokio::test]
async fn test_empty_inventory_shows_no_containers_not_error() {
    let backend = MockBackend::start().await;
    backend.containers_reply(StatusCode::OK, r#"{"containers":[]}"#);

    let mut view = mount_containers(&backend.client(), fast(), ErrorPolicy::RetainStale);
    assert!(view.state().is_loading());

    let settled = wait_until(|| {
        view.pump();
        !view.state().is_loading()
    })
    .await;

    assert!(settled);
    assert!(!view.state().is_error());
    assert_eq!(view.state(), &ViewState::Ready(Vec::new()));
}

#[tokio::test]
async fn test_five_samples_feed_chart_in_order() {
    let backend = MockBackend::start().await;
    for cpu in [10.0, 20.0, 30.0, 40.0, 50.0] {
        backend.stats_reply(StatusCode::OK, &stats_body("abc", cpu, 25.0));
    }
    // Anything after the fifth sample fails
    backend.stats_reply(StatusCode::SERVICE_UNAVAILABLE, "{}");

    let mut view = StatsView::mount(&backend.client(), ContainerId::new("abc"), fast(), ErrorPolicy::RetainStale);

    let filled = wait_until(|| {
        view.pump();
        view.window().len() >= 5 && view.state().is_error()
    })
    .await;
    assert!(filled);

    let cpu: Vec<f64> = view.window().iter().map(|s| s.cpu_percent).collect();
    assert_eq!(cpu, vec![10.0, 20.0, 30.0, 40.0, 50.0]);

    let memory: Vec<f64> = view.window().iter().map(|s| s.memory_percent).collect();
    assert_eq!(memory, vec![25.0; 5]);

    // Failures after data keep the last good reading on screen
    assert_eq!(view.state().error_message(), Some(STATS_FAILURE_MESSAGE));
    assert_eq!(view.state().data().map(|s| s.cpu_percent), Some(50.0));
}

#[tokio::test]
async fn test_first_failure_shows_error_only() {
    let backend = MockBackend::start().await;
    backend.stats_reply(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":"boom"}"#);

    for policy in [ErrorPolicy::RetainStale, ErrorPolicy::Replace] {
        let mut view = StatsView::mount(&backend.client(), ContainerId::new("abc"), fast(), policy);

        let failed = wait_until(|| {
            view.pump();
            view.state().is_error()
        })
        .await;

        assert!(failed);
        assert_eq!(view.state().data(), None);
        assert!(view.window().is_empty());
        assert_eq!(view.state().error_message(), Some(STATS_FAILURE_MESSAGE));
        assert_eq!(view.state().error_detail(), Some("backend returned HTTP 500"));
    }
}

#[tokio::test]
async fn test_replace_policy_drops_data_on_failure() {
    let backend = MockBackend::start().await;
    backend.stats_reply(StatusCode::OK, &stats_body("abc", 10.0, 10.0));
    backend.stats_reply(StatusCode::BAD_GATEWAY, "{}");

    let mut view = StatsView::mount(&backend.client(), ContainerId::new("abc"), fast(), ErrorPolicy::Replace);

    let failed = wait_until(|| {
        view.pump();
        view.state().is_error()
    })
    .await;

    assert!(failed);
    assert_eq!(view.state().data(), None);
    // Chart history is not rewritten by a failure
    assert_eq!(view.window().len(), 1);
}

#[tokio::test]
async fn test_unreachable_backend_uses_collection_message() {
    let client = cloudops_dash::core::ApiClient::new(cloudops_dash::core::ApiConfig::new(
        "http://127.0.0.1:9/api",
        Duration::from_secs(1),
    ))
    .unwrap();

    let mut view = mount_containers(&client, fast(), ErrorPolicy::RetainStale);
    let failed = wait_until(|| {
        view.pump();
        view.state().is_error()
    })
    .await;

    assert!(failed);
    assert_eq!(
        view.state().error_message(),
        Some(containers_failure_message("http://127.0.0.1:9/api").as_str())
    );
}

#[tokio::test]
async fn test_stopped_session_stops_hitting_backend() {
    let backend = MockBackend::start().await;
    backend.stats_reply(StatusCode::OK, &stats_body("abc", 1.0, 1.0));

    let received: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let mut session = PollingSession::start(
        backend.client().stats_fetcher(ContainerId::new("abc")),
        fast(),
        move |result: PollResult<_>| sink.lock().unwrap().push(result.is_success()),
    );
    assert_eq!(session.subject(), &Subject::Container(ContainerId::new("abc")));

    assert!(wait_until(|| received.lock().unwrap().len() >= 3).await);

    session.stop();
    session.stop();
    let delivered = received.lock().unwrap().len();
    let hits = backend.script.stats_hits();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(received.lock().unwrap().len(), delivered);
    assert!(backend.script.stats_hits() <= hits + 1);
    assert!(received.lock().unwrap().iter().all(|ok| *ok));
}

#[tokio::test]
async fn test_slow_responses_never_overlap() {
    let backend = MockBackend::start().await;
    backend.stats_delay(Duration::from_millis(120));
    backend.stats_reply(StatusCode::OK, &stats_body("abc", 1.0, 1.0));

    let timestamps = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&timestamps);
    let _session = PollingSession::start(
        backend.client().stats_fetcher(ContainerId::new("abc")),
        fast(),
        move |_result| sink.lock().unwrap().push(tokio::time::Instant::now()),
    );

    assert!(wait_until(|| timestamps.lock().unwrap().len() >= 3).await);

    // Each attempt starts only after the previous one settled
    let stamps = timestamps.lock().unwrap().clone();
    for pair in stamps.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(150));
    }
}

#[tokio::test]
async fn test_attempt_timeout_reports_failure_and_keeps_polling() {
    let backend = MockBackend::start().await;
    backend.stats_delay(Duration::from_millis(300));
    backend.stats_reply(StatusCode::OK, &stats_body("abc", 1.0, 1.0));

    let options = PollOptions::new(Duration::from_millis(20)).with_attempt_timeout(Duration::from_millis(50));
    let failures = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&failures);
    let _session = PollingSession::start(
        backend.client().stats_fetcher(ContainerId::new("abc")),
        options,
        move |result| {
            if let PollResult::Failure(err) = result {
                sink.lock().unwrap().push(err);
            }
        },
    );

    assert!(wait_until(|| failures.lock().unwrap().len() >= 2).await);
    assert!(failures
        .lock()
        .unwrap()
        .iter()
        .all(|err| *err == FetchError::Timeout(Duration::from_millis(50))));
}
