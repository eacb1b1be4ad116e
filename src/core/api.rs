/// HTTP client for the dashboard backend
///
/// Wraps a `reqwest::Client` built once from an immutable `ApiConfig` and
/// exposes the two endpoints the dashboard polls, plus `Fetcher`
/// implementations binding them to a subject.

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::debug;

use crate::core::error::{FetchError, FetchResult};
use crate::core::models::{decode_containers, decode_stats, ContainerId, ContainerStats, ContainerSummary, Subject};
use crate::core::polling::Fetcher;
use crate::utils::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};

/// Connection settings, fixed for the lifetime of a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiConfig,
    base: Url,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| FetchError::network(format!("invalid base URL {}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::network(format!("invalid base URL {}", config.base_url)));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config, base })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Base URL plus `segments`, each percent-encoded as one path segment
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_bytes(&self, url: Url) -> FetchResult<Vec<u8>> {
        debug!(%url, "GET");

        let response = self
            .client
            .get(url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { status: status.as_u16() });
        }

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        Ok(body.to_vec())
    }

    fn map_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout(self.config.timeout)
        } else if err.is_decode() {
            FetchError::decode(err.to_string())
        } else {
            FetchError::network(err.to_string())
        }
    }

    /// `GET {base}/containers`
    pub async fn list_containers(&self) -> FetchResult<Vec<ContainerSummary>> {
        let body = self.get_bytes(self.url(&["containers"])).await?;
        decode_containers(&body)
    }

    /// `GET {base}/stats/{id}`
    pub async fn container_stats(&self, id: &ContainerId) -> FetchResult<ContainerStats> {
        let body = self.get_bytes(self.url(&["stats", id.as_str()])).await?;
        decode_stats(&body)
    }

    pub fn containers_fetcher(&self) -> ContainersFetcher {
        ContainersFetcher {
            client: self.clone(),
            subject: Subject::AllContainers,
        }
    }

    pub fn stats_fetcher(&self, id: ContainerId) -> StatsFetcher {
        StatsFetcher {
            client: self.clone(),
            subject: Subject::Container(id.clone()),
            id,
        }
    }
}

/// Polls the inventory listing
pub struct ContainersFetcher {
    client: ApiClient,
    subject: Subject,
}

impl Fetcher for ContainersFetcher {
    type Output = Vec<ContainerSummary>;

    fn subject(&self) -> &Subject {
        &self.subject
    }

    fn fetch(&self) -> BoxFuture<'_, FetchResult<Self::Output>> {
        self.client.list_containers().boxed()
    }
}

/// Polls the stats of one container
pub struct StatsFetcher {
    client: ApiClient,
    subject: Subject,
    id: ContainerId,
}

impl StatsFetcher {
    pub fn container_id(&self) -> &ContainerId {
        &self.id
    }
}

impl Fetcher for StatsFetcher {
    type Output = ContainerStats;

    fn subject(&self) -> &Subject {
        &self.subject
    }

    fn fetch(&self) -> BoxFuture<'_, FetchResult<Self::Output>> {
        self.client.container_stats(&self.id).boxed()
    }
}
