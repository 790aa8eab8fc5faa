//! Error taxonomy shared by the resolvers and the remote clients.
//!
//! Only [`ConfigurationError`] and [`crate::ChatError`] ever reach a caller. Service
//! failures are classified here so they can be logged, then converted into
//! fallback behaviour by the resolver that owns the call.

use thiserror::Error;

/// Malformed input or missing static data. Fatal to the call that hit it.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("unsupported language code: {0:?} (expected one of en, as, mni, bn, hi)")]
    UnsupportedLanguage(String),
    #[error("missing required data: {0}")]
    MissingData(String),
    #[error("duplicate cultural entity id: {0}")]
    DuplicateId(String),
    #[error("invalid cultural dataset: {0}")]
    InvalidData(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Failure of an outbound translation service call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Short stable name used as the `kind` field in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Network(_) => "network",
            ServiceError::Timeout => "timeout",
            ServiceError::Authentication(_) => "authentication",
            ServiceError::RateLimited => "rate_limited",
            ServiceError::Http { .. } => "http",
            ServiceError::InvalidResponse(_) => "invalid_response",
            ServiceError::Unavailable(_) => "unavailable",
        }
    }

    /// Whether another attempt may succeed. A timeout abandons the call outright.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::Network(_) | ServiceError::RateLimited => true,
            ServiceError::Http { status, .. } => *status >= 500,
            ServiceError::Timeout
            | ServiceError::Authentication(_)
            | ServiceError::InvalidResponse(_)
            | ServiceError::Unavailable(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ServiceError::RateLimited.is_transient());
        assert!(ServiceError::Network("reset".into()).is_transient());
        assert!(ServiceError::Http { status: 503, message: "down".into() }.is_transient());
        assert!(!ServiceError::Http { status: 400, message: "bad".into() }.is_transient());
        assert!(!ServiceError::Timeout.is_transient());
        assert!(!ServiceError::Authentication("401".into()).is_transient());
    }

    #[test]
    fn unsupported_language_message_names_the_code() {
        let err = ConfigurationError::UnsupportedLanguage("fr".into());
        assert!(err.to_string().contains("\"fr\""));
    }
}
