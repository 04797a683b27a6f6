//! Ingestion error types

use papernest_common::errors::AppError;
use thiserror::Error;

/// Failures that abort a fetch or a whole ingestion cycle
#[derive(Error, Debug)]
pub enum IngestionError {
    /// Response body is not an Atom feed
    #[error("Feed decode error: {0}")]
    Decode(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    Fetch { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IngestionError {
    /// Short label used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::Fetch { .. } => "http_error",
            Self::Transport(_) => "transport_error",
            Self::Persistence(_) => "persistence_error",
            Self::Config(_) => "config_error",
        }
    }
}

impl From<AppError> for IngestionError {
    fn from(e: AppError) -> Self {
        IngestionError::Persistence(e.to_string())
    }
}

/// Why a single feed entry could not become a paper
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("Malformed identifier: {0:?}")]
    MalformedIdentifier(String),

    #[error("Cannot parse {field} timestamp {value:?}")]
    TimestampParse { field: &'static str, value: String },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },
}

impl EntryError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::MalformedIdentifier(_) => "identifier",
            Self::TimestampParse { .. } => "timestamp",
            Self::MissingField { .. } => "missing_field",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_from_app_error() {
        let err: IngestionError = AppError::PaperNotFound { id: "2301.12345".to_string() }.into();
        assert!(matches!(err, IngestionError::Persistence(ref m) if m.contains("2301.12345")));
        assert_eq!(err.kind(), "persistence_error");
    }

    #[test]
    fn test_entry_error_display() {
        let err = EntryError::TimestampParse {
            field: "published",
            value: "yesterday".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot parse published timestamp \"yesterday\"");
        assert_eq!(err.reason(), "timestamp");
    }
}
