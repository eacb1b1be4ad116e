/// Wire payloads of the dashboard API
///
/// `GET {base}/containers` and `GET {base}/stats/{id}` bodies, decoded with
/// serde and validated before they reach a polling observer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::FetchError;
use crate::utils::ContainerState;

/// Opaque container identifier as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Docker-style short form (first 12 characters)
    pub fn short(&self) -> &str {
        let end = self.0.char_indices().nth(12).map(|(i, _)| i).unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a polling session is bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    /// The whole container inventory
    AllContainers,
    /// Stats of a single container
    Container(ContainerId),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::AllContainers => f.write_str("containers"),
            Subject::Container(id) => write!(f, "container {}", id.short()),
        }
    }
}

/// One entry of the container inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSummary {
    pub id: ContainerId,
    pub name: String,
    pub image: String,
    pub status: String,
}

impl ContainerSummary {
    pub fn state(&self) -> ContainerState {
        ContainerState::from(self.status.as_str())
    }
}

/// Body of `GET /containers`
#[derive(Debug, Deserialize)]
struct ContainersResponse {
    // Missing or null means an empty inventory, not a malformed reply
    #[serde(default)]
    containers: Option<Vec<ContainerSummary>>,
}

/// Decode the inventory listing
pub fn decode_containers(body: &[u8]) -> Result<Vec<ContainerSummary>, FetchError> {
    let response: ContainersResponse =
        serde_json::from_slice(body).map_err(|e| FetchError::decode(e.to_string()))?;
    Ok(response.containers.unwrap_or_default())
}

/// Body of `GET /stats/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerStats {
    /// Omitted by the backend when the container no longer exists
    #[serde(default)]
    pub container_id: String,
    pub cpu_percent: f64,
    pub memory_usage: f64,
    pub memory_limit: f64,
    pub memory_percent: f64,
}

impl ContainerStats {
    pub fn memory_usage_bytes(&self) -> u64 {
        self.memory_usage as u64
    }

    pub fn memory_limit_bytes(&self) -> u64 {
        self.memory_limit as u64
    }

    fn validate(&self) -> Result<(), FetchError> {
        let fields = [
            ("cpu_percent", self.cpu_percent),
            ("memory_usage", self.memory_usage),
            ("memory_limit", self.memory_limit),
            ("memory_percent", self.memory_percent),
        ];

        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(FetchError::decode(format!("{} must be a non-negative number, got {}", name, value)));
            }
        }

        Ok(())
    }
}

/// Decode and validate a stats reading
pub fn decode_stats(body: &[u8]) -> Result<ContainerStats, FetchError> {
    let stats: ContainerStats =
        serde_json::from_slice(body).map_err(|e| FetchError::decode(e.to_string()))?;
    stats.validate()?;
    Ok(stats)
}
