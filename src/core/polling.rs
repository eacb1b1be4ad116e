/// Live polling sessions
///
/// A `PollingSession` repeatedly runs a fetch for one subject and hands each
/// settled attempt to a single observer. The timer re-arms only after the
/// previous attempt settles, so at most one fetch per session is in flight.
///
/// Teardown is synchronous: once `stop()` returns (or the session is
/// dropped) the observer has been released and will never be called again,
/// even if a response arrives later.

use chrono::{DateTime, Local};
use futures::future::BoxFuture;
use rand::Rng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::core::error::{FetchError, FetchResult};
use crate::core::models::Subject;
use crate::utils::DEFAULT_TIMEOUT_MS;

/// A repeatable fetch bound to one subject
pub trait Fetcher: Send + Sync + 'static {
    type Output: Send + 'static;

    fn subject(&self) -> &Subject;

    fn fetch(&self) -> BoxFuture<'_, FetchResult<Self::Output>>;
}

/// Outcome handed to the observer for every settled attempt
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult<T> {
    Success {
        payload: T,
        completed_at: DateTime<Local>,
    },
    Failure(FetchError),
}

impl<T> PollResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, PollResult::Success { .. })
    }
}

/// Delay policy between attempts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RetryPolicy {
    /// Always wait one interval after the previous attempt settles
    Fixed,
    /// Double the wait after each consecutive failure, capped at `max`
    Backoff { max: Duration, jitter: bool },
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy::Fixed
    }
}

impl RetryPolicy {
    /// Delay before the next attempt given the failures seen in a row
    pub fn next_delay(&self, interval: Duration, consecutive_failures: u32) -> Duration {
        match *self {
            RetryPolicy::Fixed => interval,
            RetryPolicy::Backoff { max, jitter } => {
                if consecutive_failures == 0 {
                    return interval;
                }

                let cap = max.max(interval);
                let factor = 2u32.saturating_pow(consecutive_failures.min(16));
                let base = interval.saturating_mul(factor).min(cap);

                if jitter {
                    // Shave up to 20% off so the cap still holds
                    let shave = rand::thread_rng().gen_range(0.0..=0.2);
                    base.mul_f64(1.0 - shave)
                } else {
                    base
                }
            }
        }
    }
}

/// Cadence and limits of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollOptions {
    pub interval: Duration,
    pub attempt_timeout: Duration,
    pub retry: RetryPolicy,
}

impl PollOptions {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            attempt_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy::Fixed,
        }
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

type Observer<T> = Box<dyn FnMut(PollResult<T>) + Send>;
type ObserverSlot<T> = Arc<Mutex<Option<Observer<T>>>>;

pub struct PollingSession<T> {
    subject: Subject,
    cancel: CancellationToken,
    observer: ObserverSlot<T>,
    task: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> PollingSession<T> {
    /// Start polling: one fetch immediately, then one per interval after
    /// each attempt settles. Must be called inside a tokio runtime.
    ///
    /// The observer runs on the session task and must not call `stop()` on
    /// its own session.
    pub fn start<F, O>(fetcher: F, options: PollOptions, on_result: O) -> Self
    where
        F: Fetcher<Output = T>,
        O: FnMut(PollResult<T>) + Send + 'static,
    {
        let subject = fetcher.subject().clone();
        let cancel = CancellationToken::new();
        let observer: ObserverSlot<T> = Arc::new(Mutex::new(Some(Box::new(on_result))));

        info!(
            subject = %subject,
            interval_ms = options.interval.as_millis() as u64,
            "polling session started"
        );

        let task = tokio::spawn(run_session(
            fetcher,
            options,
            cancel.clone(),
            Arc::clone(&observer),
        ));

        Self {
            subject,
            cancel,
            observer,
            task: Some(task),
        }
    }
}

impl<T> PollingSession<T> {
    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancel the in-flight fetch and the pending timer. Idempotent.
    ///
    /// Blocks only while an observer call already in progress finishes.
    pub fn stop(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }

        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }

        // Any delivery that got the lock before cancel() completes first,
        // every later one sees the token and bails out
        let observer = self
            .observer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(observer);

        info!(subject = %self.subject, "polling session stopped");
    }
}

impl<T> Drop for PollingSession<T> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_session<F: Fetcher>(
    fetcher: F,
    options: PollOptions,
    cancel: CancellationToken,
    observer: ObserverSlot<F::Output>,
) {
    let mut consecutive_failures: u32 = 0;

    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            attempt = tokio::time::timeout(options.attempt_timeout, fetcher.fetch()) => {
                attempt.unwrap_or(Err(FetchError::Timeout(options.attempt_timeout)))
            }
        };

        let result = match outcome {
            Ok(payload) => {
                consecutive_failures = 0;
                Some(PollResult::Success {
                    payload,
                    completed_at: Local::now(),
                })
            }
            Err(err) if err.is_cancelled() => {
                if cancel.is_cancelled() {
                    break;
                }
                debug!(subject = %fetcher.subject(), "fetch cancelled upstream, dropping result");
                None
            }
            Err(err) => {
                consecutive_failures = consecutive_failures.saturating_add(1);
                warn!(
                    subject = %fetcher.subject(),
                    error = %err,
                    consecutive_failures,
                    "fetch failed"
                );
                Some(PollResult::Failure(err))
            }
        };

        if let Some(result) = result {
            if !deliver(&observer, &cancel, result) {
                break;
            }
        }

        let delay = options.retry.next_delay(options.interval, consecutive_failures);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    debug!(subject = %fetcher.subject(), "polling loop exited");
}

/// Hand a result to the observer unless the session was stopped.
/// Returns false once the session is torn down.
fn deliver<T>(observer: &ObserverSlot<T>, cancel: &CancellationToken, result: PollResult<T>) -> bool {
    let mut slot = observer.lock().unwrap_or_else(PoisonError::into_inner);

    // Checked under the lock so stop() cannot slip in between
    if cancel.is_cancelled() {
        return false;
    }

    match slot.as_mut() {
        Some(on_result) => {
            on_result(result);
            true
        }
        None => false,
    }
}
