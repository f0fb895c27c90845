//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Result timeouts beyond this are almost always a unit mistake.
const MAX_REASONABLE_RESULT_TIMEOUT_SECS: u64 = 24 * 60 * 60;

const HIGH_SIGNAL_WARN_THRESHOLD: usize = 1_000_000;

const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Convert the first error into a `ConfigError`.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_client(config, &mut result);
        Self::validate_worker(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_client(config: &Config, result: &mut ValidationResult) {
        let client = &config.client;

        if client.namespace.trim().is_empty() {
            result.add_error(ValidationError::new(
                "client.namespace",
                "Namespace cannot be empty",
            ));
        }

        if let Some(identity) = &client.identity {
            if identity.trim().is_empty() {
                result.add_error(ValidationError::new(
                    "client.identity",
                    "Identity cannot be empty when set",
                ));
            }
        }

        if client.result_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "client.result_timeout_secs",
                "Result timeout must be greater than 0",
            ));
        } else if client.result_timeout_secs > MAX_REASONABLE_RESULT_TIMEOUT_SECS {
            result.add_warning(ValidationWarning::new(
                "client.result_timeout_secs",
                "Result timeout is longer than a day",
            ));
        }
    }

    fn validate_worker(config: &Config, result: &mut ValidationResult) {
        match config.worker.buffered_signal_warn_threshold {
            Some(0) => result.add_warning(ValidationWarning::new(
                "worker.buffered_signal_warn_threshold",
                "A threshold of 0 warns on the first buffered signal",
            )),
            Some(n) if n > HIGH_SIGNAL_WARN_THRESHOLD => {
                result.add_warning(ValidationWarning::new(
                    "worker.buffered_signal_warn_threshold",
                    format!("Threshold {} is unusually high", n),
                ))
            }
            _ => {}
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let logging = &config.logging;

        if !is_valid_filter(&logging.level) {
            result.add_error(ValidationError::new(
                "logging.level",
                format!(
                    "Invalid log filter '{}', expected one of: {}",
                    logging.level,
                    LEVELS.join(", ")
                ),
            ));
        }

        if logging.file_prefix.trim().is_empty() {
            result.add_error(ValidationError::new(
                "logging.file_prefix",
                "File prefix cannot be empty",
            ));
        }

        if let Some(dir) = &logging.directory {
            if dir.trim().is_empty() {
                result.add_error(ValidationError::new(
                    "logging.directory",
                    "Log directory cannot be empty when set",
                ));
            }
        }
    }
}

/// Checks comma separated `EnvFilter` directives: a bare level, a bare
/// target, or `target[span{field=value}]=level`.
fn is_valid_filter(filter: &str) -> bool {
    if filter.trim().is_empty() {
        return false;
    }
    filter
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .all(is_valid_directive)
}

fn is_valid_directive(directive: &str) -> bool {
    match split_level(directive) {
        Some((selector, level)) => {
            !selector.is_empty() && is_valid_level(level) && is_valid_selector(selector)
        }
        None => is_valid_selector(directive),
    }
}

/// Split at the last `=` outside span and field brackets.
fn split_level(directive: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    let mut split = None;
    for (i, c) in directive.char_indices() {
        match c {
            '[' | '{' => depth += 1,
            ']' | '}' => depth -= 1,
            '=' if depth == 0 => split = Some(i),
            _ => {}
        }
    }
    split.map(|i| (&directive[..i], &directive[i + 1..]))
}

fn is_valid_level(level: &str) -> bool {
    let level = level.to_ascii_lowercase();
    LEVELS.contains(&level.as_str()) || matches!(level.as_str(), "0" | "1" | "2" | "3" | "4" | "5")
}

fn is_valid_selector(selector: &str) -> bool {
    let (target, span) = match selector.find('[') {
        Some(i) => (&selector[..i], Some(&selector[i..])),
        None => (selector, None),
    };
    let target_ok = target
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'));
    let span_ok = span.is_none_or(|span| span.ends_with(']') && span.len() > 1);
    target_ok && span_ok && !(target.is_empty() && span.is_none())
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
