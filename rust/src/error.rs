//! Error types shared by the generator, its configuration and its collaborators.

use thiserror::Error;

/// Errors that can occur while building a generator or producing an id.
#[derive(Error, Debug)]
pub enum IdError {
    /// A configuration constraint was violated. Raised only at creation time.
    #[error("{0}")]
    InvalidConfig(String),
    /// The entropy source could not provide random bytes.
    #[error("random source unavailable: {0}")]
    RandomSourceUnavailable(String),
    /// A configuration document was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl IdError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True for errors caused by the caller's configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::Json(_))
    }

    /// True for infrastructure failures that may succeed on a later call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RandomSourceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_displays_message_verbatim() {
        let err = IdError::invalid_config("segmentLength must be an integer");
        assert_eq!(err.to_string(), "segmentLength must be an integer");
        assert!(err.is_config_error());
        assert!(!err.is_retryable());
    }

    #[test]
    fn random_source_errors_are_retryable() {
        let err = IdError::RandomSourceUnavailable("no entropy".to_string());
        assert!(err.is_retryable());
        assert!(!err.is_config_error());
        assert!(err.to_string().contains("no entropy"));
    }

    #[test]
    fn json_errors_convert() {
        let err: IdError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, IdError::Json(_)));
        assert!(err.is_config_error());
    }
}
