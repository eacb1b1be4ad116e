/// Fetch failure taxonomy for the polling pipeline
///
/// Every attempt made by a polling session settles either with a payload or
/// with one of these errors. `Cancelled` is produced when a session is torn
/// down mid-flight and is filtered before it can reach an observer.

use std::time::Duration;
use thiserror::Error;

/// Result alias for a single fetch attempt
pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("request failed: {reason}")]
    Network { reason: String },

    #[error("request timed out after {}", humantime::format_duration(*.0))]
    Timeout(Duration),

    #[error("backend returned HTTP {status}")]
    Status { status: u16 },

    #[error("unexpected response shape: {reason}")]
    Decode { reason: String },

    #[error("request cancelled")]
    Cancelled,
}

/// Coarse classification used by the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Backend unreachable, overloaded or answering with an error status
    Network,
    /// Backend answered but the body did not match the expected shape
    Decode,
    /// Superseded by a stop or a subject change, never shown to the user
    Cancelled,
}

impl FetchError {
    pub fn network(reason: impl Into<String>) -> Self {
        FetchError::Network { reason: reason.into() }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        FetchError::Decode { reason: reason.into() }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FetchError::Network { .. } | FetchError::Timeout(_) | FetchError::Status { .. } => {
                FailureKind::Network
            }
            FetchError::Decode { .. } => FailureKind::Decode,
            FetchError::Cancelled => FailureKind::Cancelled,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == FailureKind::Cancelled
    }
}
