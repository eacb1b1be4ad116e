/// Mounted views: a polling session, its result queue and the view state
///
/// The session's observer only pushes into a channel owned by the view.
/// The UI loop drains it with `pump()`, so the view state and the sample
/// window have a single writer and never need a lock. Unmounting (or
/// dropping) a view stops its session and discards anything still queued.

use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::core::api::ApiClient;
use crate::core::models::{ContainerId, ContainerStats, ContainerSummary, Subject};
use crate::core::polling::{Fetcher, PollOptions, PollResult, PollingSession};
use crate::core::view_state::{ErrorPolicy, ViewState};
use crate::core::window::{Sample, SampleWindow};
use crate::utils::{containers_failure_message, STATS_FAILURE_MESSAGE};

pub struct LiveView<T> {
    session: PollingSession<T>,
    results: UnboundedReceiver<PollResult<T>>,
    state: ViewState<T>,
    policy: ErrorPolicy,
    failure_message: String,
    interval: Duration,
}

impl<T: Send + 'static> LiveView<T> {
    pub fn mount<F>(fetcher: F, options: PollOptions, policy: ErrorPolicy, failure_message: impl Into<String>) -> Self
    where
        F: Fetcher<Output = T>,
    {
        let (tx, results) = mpsc::unbounded_channel();
        let mut state = ViewState::Idle;
        state.begin();

        let session = PollingSession::start(fetcher, options, move |result| {
            // Receiver gone means the view is being torn down
            let _ = tx.send(result);
        });
        info!(subject = %session.subject(), ?policy, "view mounted");

        Self {
            session,
            results,
            state,
            policy,
            failure_message: failure_message.into(),
            interval: options.interval,
        }
    }
}

impl<T> LiveView<T> {
    /// Apply every queued result, calling `on_success` for each payload
    /// before it replaces the current state. Returns the number applied.
    pub fn pump_with(&mut self, mut on_success: impl FnMut(&T, DateTime<Local>)) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.results.try_recv() {
            if let PollResult::Success { payload, completed_at } = &result {
                on_success(payload, *completed_at);
            }
            self.state.apply(result, self.policy, &self.failure_message);
            applied += 1;
        }
        applied
    }

    pub fn pump(&mut self) -> usize {
        self.pump_with(|_, _| {})
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn subject(&self) -> &Subject {
        self.session.subject()
    }

    pub fn is_bound_to(&self, subject: &Subject) -> bool {
        self.session.subject() == subject
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_stopped(&self) -> bool {
        self.session.is_stopped()
    }

    /// Stop polling and drop anything not yet applied. Idempotent.
    pub fn stop(&mut self) {
        if self.session.is_stopped() {
            return;
        }
        self.session.stop();
        self.results.close();
        while self.results.try_recv().is_ok() {}
        info!(subject = %self.session.subject(), "view unmounted");
    }
}

impl<T> Drop for LiveView<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Inventory view
pub type ContainersView = LiveView<Vec<ContainerSummary>>;

pub fn mount_containers(client: &ApiClient, options: PollOptions, policy: ErrorPolicy) -> ContainersView {
    LiveView::mount(
        client.containers_fetcher(),
        options,
        policy,
        containers_failure_message(client.base_url()),
    )
}

/// Single-container view with its chart history
pub struct StatsView {
    live: LiveView<ContainerStats>,
    window: SampleWindow,
    container_id: ContainerId,
}

impl StatsView {
    pub fn mount(client: &ApiClient, id: ContainerId, options: PollOptions, policy: ErrorPolicy) -> Self {
        Self::mount_with(client.stats_fetcher(id.clone()), id, options, policy)
    }

    pub fn mount_with<F>(fetcher: F, id: ContainerId, options: PollOptions, policy: ErrorPolicy) -> Self
    where
        F: Fetcher<Output = ContainerStats>,
    {
        Self {
            live: LiveView::mount(fetcher, options, policy, STATS_FAILURE_MESSAGE),
            window: SampleWindow::new(),
            container_id: id,
        }
    }

    /// Apply queued results; every success also lands in the window
    pub fn pump(&mut self) -> usize {
        let window = &mut self.window;
        self.live
            .pump_with(|stats, taken_at| window.append(Sample::from_stats(stats, taken_at)))
    }

    pub fn state(&self) -> &ViewState<ContainerStats> {
        self.live.state()
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn container_id(&self) -> &ContainerId {
        &self.container_id
    }

    pub fn subject(&self) -> &Subject {
        self.live.subject()
    }

    pub fn is_bound_to(&self, subject: &Subject) -> bool {
        self.live.is_bound_to(subject)
    }

    pub fn interval(&self) -> Duration {
        self.live.interval()
    }

    pub fn stop(&mut self) {
        self.live.stop();
    }
}
