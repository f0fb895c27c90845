//! Invalid-argument errors raised while constructing call inputs.

use thiserror::Error;

/// A mandatory field of a call input was missing or empty.
///
/// Raised synchronously at construction time, before any RPC is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid argument: {message}")]
pub struct InvalidArgumentError {
    pub field: &'static str,
    pub message: String,
}

impl InvalidArgumentError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    /// Error for a required field that was not supplied.
    pub fn required(field: &'static str) -> Self {
        Self::new(field, format!("{field} is required"))
    }

    /// Check that a string field is present and not blank.
    pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            return Err(Self::required(field));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_message() {
        let err = InvalidArgumentError::required("workflow_id");
        assert_eq!(err.field, "workflow_id");
        assert!(err.to_string().contains("Invalid argument"));
        assert!(err.to_string().contains("workflow_id is required"));
    }

    #[test]
    fn test_require_non_empty() {
        assert!(InvalidArgumentError::require_non_empty("signal_name", "approve").is_ok());
        assert!(InvalidArgumentError::require_non_empty("signal_name", "").is_err());
        assert!(InvalidArgumentError::require_non_empty("signal_name", "   ").is_err());
    }
}
