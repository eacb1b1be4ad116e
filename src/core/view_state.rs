/// What a mounted view shows for its polling subject
///
/// `Idle → Loading` on mount, then every settled attempt moves the state
/// through `Ready` and `Error`. There is no way back to `Idle`: a view is
/// one-shot per subject.

use serde::{Deserialize, Serialize};

use crate::core::error::FetchError;
use crate::core::polling::PollResult;

/// How a failure after a success is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Keep showing the last good payload next to an error banner
    #[default]
    RetainStale,
    /// Replace the data with an error panel
    Replace,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error {
        /// User-facing message
        message: String,
        /// Underlying failure, for the detail line and the logs
        detail: String,
        /// Last good payload, only kept under `ErrorPolicy::RetainStale`
        stale: Option<T>,
    },
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Idle
    }
}

impl<T> ViewState<T> {
    /// `Idle → Loading`. Ignored once the view has started.
    pub fn begin(&mut self) {
        if matches!(self, ViewState::Idle) {
            *self = ViewState::Loading;
        }
    }

    /// Fold one settled attempt into the state
    pub fn apply(&mut self, result: PollResult<T>, policy: ErrorPolicy, message: &str) {
        let previous = std::mem::replace(self, ViewState::Loading);

        *self = match result {
            PollResult::Success { payload, .. } => ViewState::Ready(payload),
            PollResult::Failure(err) => {
                let stale = match (policy, previous) {
                    (ErrorPolicy::RetainStale, ViewState::Ready(data)) => Some(data),
                    (ErrorPolicy::RetainStale, ViewState::Error { stale, .. }) => stale,
                    _ => None,
                };
                Self::error(message, &err, stale)
            }
        };
    }

    fn error(message: &str, err: &FetchError, stale: Option<T>) -> Self {
        ViewState::Error {
            message: message.to_string(),
            detail: err.to_string(),
            stale,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Idle | ViewState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewState::Error { .. })
    }

    /// Data to display: the fresh payload, or the retained one on error
    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            ViewState::Error { stale, .. } => stale.as_ref(),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ViewState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn error_detail(&self) -> Option<&str> {
        match self {
            ViewState::Error { detail, .. } => Some(detail),
            _ => None,
        }
    }
}
