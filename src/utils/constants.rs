/// Dashboard defaults and user-facing strings

/// Backend base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";

/// Upper bound for a single fetch attempt
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Cadence of the single-container stats view
pub const DEFAULT_STATS_INTERVAL_MS: u64 = 2_500;

/// Cadence of the inventory view
pub const DEFAULT_CONTAINERS_INTERVAL_MS: u64 = 5_000;

/// Cap for the backoff retry policy
pub const DEFAULT_BACKOFF_MAX_MS: u64 = 30_000;

/// Samples kept for the stats charts
pub const WINDOW_CAPACITY: usize = 20;

/// Upper bound for `stats --samples`
pub const MAX_STATS_SAMPLES: u64 = 10_000;

pub const APP_NAME: &str = "cloudops-dash";
pub const APP_TITLE: &str = "CloudOps Dashboard";

/// Environment overrides (also read from a .env file)
pub const ENV_API_URL: &str = "CLOUDOPS_API_URL";
pub const ENV_TIMEOUT_MS: &str = "CLOUDOPS_TIMEOUT_MS";
pub const ENV_LOG: &str = "CLOUDOPS_LOG";

pub const STATS_FAILURE_MESSAGE: &str = "Failed to fetch container stats. Backend may be overloaded.";

pub fn containers_failure_message(base_url: &str) -> String {
    format!("Failed to fetch containers. Ensure backend is running on {}", base_url)
}

pub const NO_CONTAINERS_TITLE: &str = "No containers found";
pub const NO_CONTAINERS_MESSAGE: &str = "No Docker containers are running on this machine.";

/// Feature list shown on the About screen
pub const FEATURES: &[(&str, &str)] = &[
    (
        "Real-time Monitoring",
        "Track Docker container metrics with live updates",
    ),
    (
        "Live Charts",
        "Visualize CPU and memory usage over the last samples",
    ),
    (
        "Container Inventory",
        "View all your Docker containers with their status",
    ),
    (
        "Resilient Polling",
        "Keeps retrying on a fixed cadence when the backend is unavailable",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages() {
        assert_eq!(
            containers_failure_message("http://localhost:8000/api"),
            "Failed to fetch containers. Ensure backend is running on http://localhost:8000/api"
        );
        assert!(STATS_FAILURE_MESSAGE.ends_with("Backend may be overloaded."));
    }

    #[test]
    fn test_cadence_defaults() {
        assert!(DEFAULT_STATS_INTERVAL_MS < DEFAULT_CONTAINERS_INTERVAL_MS);
        assert!(DEFAULT_TIMEOUT_MS > DEFAULT_CONTAINERS_INTERVAL_MS);
        assert_eq!(WINDOW_CAPACITY, 20);
    }
}
