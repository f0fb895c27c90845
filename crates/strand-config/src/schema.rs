//! Configuration schema definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Workflow client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Identity reported to the service. Defaults to `<pid>@strand-client`.
    #[serde(default)]
    pub identity: Option<String>,

    /// Default deadline for result retrieval.
    #[serde(default = "default_result_timeout_secs")]
    pub result_timeout_secs: u64,

    /// Add the tracing decorator to the client chain.
    #[serde(default)]
    pub tracing: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            identity: None,
            result_timeout_secs: default_result_timeout_secs(),
            tracing: false,
        }
    }
}

impl ClientConfig {
    pub fn result_timeout(&self) -> Duration {
        Duration::from_secs(self.result_timeout_secs)
    }
}

fn default_namespace() -> String {
    "default".to_string()
}

fn default_result_timeout_secs() -> u64 {
    60
}

/// Workflow worker configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Warn once a signal buffer holds more records than this.
    #[serde(default)]
    pub buffered_signal_warn_threshold: Option<usize>,

    /// Add the tracing decorator to every instance's chains.
    #[serde(default)]
    pub tracing: bool,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    /// Write daily-rolling log files here in addition to stderr.
    #[serde(default)]
    pub directory: Option<String>,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_file_prefix() -> String {
    "strand".to_string()
}
