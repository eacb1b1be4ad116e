//! In-process mock of the monitoring backend

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cloudops_dash::core::{ApiClient, ApiConfig};

pub type Reply = (StatusCode, String);

#[derive(Default)]
pub struct Script {
    containers: Mutex<VecDeque<Reply>>,
    stats: Mutex<VecDeque<Reply>>,
    stats_hits: AtomicUsize,
    last_stats_id: Mutex<Option<String>>,
    stats_delay: Mutex<Option<Duration>>,
}

impl Script {
    pub fn stats_hits(&self) -> usize {
        self.stats_hits.load(Ordering::SeqCst)
    }

    pub fn last_stats_id(&self) -> Option<String> {
        self.last_stats_id.lock().unwrap().clone()
    }
}

pub struct MockBackend {
    pub base_url: String,
    pub script: Arc<Script>,
}

/// Pop the next scripted reply; the last one repeats once the script runs out
fn next_reply(queue: &Mutex<VecDeque<Reply>>) -> Reply {
    let mut queue = queue.lock().unwrap();
    if queue.len() > 1 {
        queue.pop_front().unwrap()
    } else {
        queue
            .front()
            .cloned()
            .unwrap_or((StatusCode::NOT_FOUND, "{}".to_string()))
    }
}

async fn containers(State(script): State<Arc<Script>>) -> (StatusCode, String) {
    next_reply(&script.containers)
}

async fn stats(State(script): State<Arc<Script>>, Path(id): Path<String>) -> (StatusCode, String) {
    script.stats_hits.fetch_add(1, Ordering::SeqCst);
    *script.last_stats_id.lock().unwrap() = Some(id);

    let delay = *script.stats_delay.lock().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    next_reply(&script.stats)
}

impl MockBackend {
    pub async fn start() -> Self {
        let script = Arc::new(Script::default());
        let app = Router::new()
            .route("/api/containers", get(containers))
            .route("/api/stats/:id", get(stats))
            .with_state(Arc::clone(&script));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            script,
        }
    }

    pub fn containers_reply(&self, status: StatusCode, body: &str) {
        self.script.containers.lock().unwrap().push_back((status, body.to_string()));
    }

    pub fn stats_reply(&self, status: StatusCode, body: &str) {
        self.script.stats.lock().unwrap().push_back((status, body.to_string()));
    }

    pub fn stats_delay(&self, delay: Duration) {
        *self.script.stats_delay.lock().unwrap() = Some(delay);
    }

    pub fn client(&self) -> ApiClient {
        self.client_with_timeout(Duration::from_secs(2))
    }

    pub fn client_with_timeout(&self, timeout: Duration) -> ApiClient {
        ApiClient::new(ApiConfig::new(self.base_url.clone(), timeout)).unwrap()
    }
}

pub fn stats_body(id: &str, cpu: f64, memory_percent: f64) -> String {
    format!(
        r#"{{"container_id":"{}","cpu_percent":{},"memory_usage":52428800,"memory_limit":209715200,"memory_percent":{}}}"#,
        id, cpu, memory_percent
    )
}

/// Check `done` every 10ms until it holds or two seconds pass
pub async fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if done() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
