pub mod api;
pub mod binding;
pub mod error;
pub mod models;
pub mod polling;
pub mod view_state;
pub mod window;

pub use api::{ApiClient, ApiConfig};
pub use binding::{mount_containers, ContainersView, LiveView, StatsView};
pub use error::{FailureKind, FetchError, FetchResult};
pub use models::{ContainerId, ContainerStats, ContainerSummary, Subject};
pub use polling::{Fetcher, PollOptions, PollResult, PollingSession, RetryPolicy};
pub use view_state::{ErrorPolicy, ViewState};
pub use window::{Sample, SampleWindow};
