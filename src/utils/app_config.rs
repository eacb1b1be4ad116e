/// Application configuration management
/// Stores user preferences in <config dir>/cloudops-dash/config.toml
///
/// Precedence, highest first: command-line flags, environment, file, defaults.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::{ApiConfig, ErrorPolicy, PollOptions, RetryPolicy};
use crate::utils::constants::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSection,
    pub polling: PollingSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RetryMode {
    #[default]
    Fixed,
    Backoff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSection {
    pub stats_interval_ms: u64,
    pub containers_interval_ms: u64,
    pub error_policy: ErrorPolicy,
    pub retry: RetryMode,
    pub backoff_max_ms: u64,
    pub backoff_jitter: bool,
}

impl Default for PollingSection {
    fn default() -> Self {
        Self {
            stats_interval_ms: DEFAULT_STATS_INTERVAL_MS,
            containers_interval_ms: DEFAULT_CONTAINERS_INTERVAL_MS,
            error_policy: ErrorPolicy::default(),
            retry: RetryMode::default(),
            backoff_max_ms: DEFAULT_BACKOFF_MAX_MS,
            backoff_jitter: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    /// Log file for the TUI; defaults to the data directory
    pub file: Option<PathBuf>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl AppConfig {
    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join(APP_NAME);
        Ok(config_dir.join("config.toml"))
    }

    /// Default log file used by the TUI
    pub fn default_log_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("Failed to get data directory")?
            .join(APP_NAME);
        Ok(data_dir.join(format!("{}.log", APP_NAME)))
    }

    /// Load configuration from file, falling back to defaults when missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Resolve the effective configuration: file, then environment, then flags
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        let mut config = Self::load_from(&path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_MS) {
            self.api.timeout_ms = timeout
                .trim()
                .parse()
                .with_context(|| format!("{} must be a number of milliseconds", ENV_TIMEOUT_MS))?;
        }
        if let Some(level) = lookup(ENV_LOG) {
            self.logging.level = level;
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(url) = &overrides.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = overrides.timeout_ms {
            self.api.timeout_ms = timeout;
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("api.base_url must start with http:// or https:// (got '{}')", url);
        }
        if self.api.timeout_ms == 0 {
            bail!("api.timeout_ms must be greater than 0");
        }
        if self.polling.stats_interval_ms == 0 || self.polling.containers_interval_ms == 0 {
            bail!("polling intervals must be greater than 0");
        }
        if self.polling.retry == RetryMode::Backoff && self.polling.backoff_max_ms == 0 {
            bail!("polling.backoff_max_ms must be greater than 0");
        }
        Ok(())
    }

    /// Save configuration to `path`, creating the directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(
            self.api.base_url.trim(),
            Duration::from_millis(self.api.timeout_ms),
        )
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        match self.polling.retry {
            RetryMode::Fixed => RetryPolicy::Fixed,
            RetryMode::Backoff => RetryPolicy::Backoff {
                max: Duration::from_millis(self.polling.backoff_max_ms),
                jitter: self.polling.backoff_jitter,
            },
        }
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.polling.error_policy
    }

    pub fn stats_options(&self) -> PollOptions {
        self.options(self.polling.stats_interval_ms)
    }

    pub fn containers_options(&self) -> PollOptions {
        self.options(self.polling.containers_interval_ms)
    }

    fn options(&self, interval_ms: u64) -> PollOptions {
        PollOptions::new(Duration::from_millis(interval_ms))
            .with_attempt_timeout(Duration::from_millis(self.api.timeout_ms))
            .with_retry(self.retry_policy())
    }

    pub fn log_path(&self) -> Result<PathBuf> {
        match &self.logging.file {
            Some(file) => Ok(file.clone()),
            None => Self::default_log_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.polling.stats_interval_ms, 2_500);
        assert_eq!(config.polling.containers_interval_ms, 5_000);
        assert_eq!(config.error_policy(), ErrorPolicy::RetainStale);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[api]\nbase_url = \"http://10.0.0.5:8000/api\"\n\n[polling]\nerror_policy = \"replace\"\nretry = \"backoff\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:8000/api");
        assert_eq!(config.api.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.error_policy(), ErrorPolicy::Replace);
        assert_eq!(
            config.retry_policy(),
            RetryPolicy::Backoff {
                max: Duration::from_millis(DEFAULT_BACKOFF_MAX_MS),
                jitter: false
            }
        );
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = ").unwrap();
        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.polling.stats_interval_ms = 1_000;
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_precedence_env_then_flags() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_URL, "http://env-host:8000/api"),
            (ENV_TIMEOUT_MS, "3000"),
            (ENV_LOG, "debug"),
        ]);

        let mut config = AppConfig::default();
        config
            .apply_env(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.api.base_url, "http://env-host:8000/api");
        assert_eq!(config.api.timeout_ms, 3_000);
        assert_eq!(config.logging.level, "debug");

        config.apply_overrides(&Overrides {
            api_url: Some("https://flag-host/api".to_string()),
            timeout_ms: None,
        });
        assert_eq!(config.api.base_url, "https://flag-host/api");
        assert_eq!(config.api.timeout_ms, 3_000);
    }

    #[test]
    fn test_bad_env_timeout() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|key| (key == ENV_TIMEOUT_MS).then(|| "soon".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_validation() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.api.base_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.polling.stats_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_derived_options() {
        let mut config = AppConfig::default();
        config.api.timeout_ms = 4_000;

        let stats = config.stats_options();
        assert_eq!(stats.interval, Duration::from_millis(2_500));
        assert_eq!(stats.attempt_timeout, Duration::from_millis(4_000));
        assert_eq!(stats.retry, RetryPolicy::Fixed);

        assert_eq!(config.containers_options().interval, Duration::from_millis(5_000));

        let api = config.api_config();
        assert_eq!(api.base_url, DEFAULT_BASE_URL);
        assert_eq!(api.timeout, Duration::from_millis(4_000));
    }
}
