//! Wiring from configuration to client and worker options.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use strand_client::{TracingClientInterceptor, WorkflowClientOptions};
use strand_config::{Config, ConfigError, ConfigLoader, ConfigValidator};
use strand_worker::{TracingWorkerInterceptor, WorkflowInstanceOptions};

/// Load, validate and log a configuration file.
///
/// Validation warnings are logged; the first validation error is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config = ConfigLoader::load(path)?;
    let warnings = ConfigValidator::validate(&config)?.into_result()?;
    for warning in &warnings {
        warn!(path = %warning.path, "{}", warning.message);
    }
    info!(config = %path.display(), namespace = %config.client.namespace, "Configuration loaded");
    Ok(config)
}

/// Client options for `config.client`.
///
/// The tracing interceptor, when enabled, is the outermost layer so that
/// user interceptors added afterwards sit between it and the root invoker.
pub fn client_options(config: &Config) -> WorkflowClientOptions {
    let mut options = WorkflowClientOptions::new()
        .with_namespace(config.client.namespace.clone())
        .with_result_timeout(config.client.result_timeout());
    if let Some(identity) = &config.client.identity {
        options = options.with_identity(identity.clone());
    }
    if config.client.tracing {
        options = options.with_interceptor(Arc::new(TracingClientInterceptor::new()));
    }
    options
}

/// Instance options for `config.worker`.
pub fn worker_options(config: &Config) -> WorkflowInstanceOptions {
    let mut options = WorkflowInstanceOptions::default()
        .with_buffered_signal_warn_threshold(config.worker.buffered_signal_warn_threshold);
    if config.worker.tracing {
        options = options.with_interceptor(Arc::new(TracingWorkerInterceptor::new()));
    }
    options
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
