#![forbid(unsafe_code)]

//! Error types for history operations.

use thiserror::Error;

/// Errors returned by [`HistoryManager`](crate::HistoryManager) operations.
///
/// A failed operation leaves the document, both history stacks, the active
/// batch, and the selection hint exactly as they were.
#[derive(Debug, Error)]
pub enum HistoryError {
    /// A mutation referenced an id that is not in the document.
    #[error("item '{id}' not found")]
    NotFound { id: String },
    /// `add` or `load` saw an id that already exists.
    #[error("item id '{id}' already exists")]
    DuplicateId { id: String },
    /// An update mutator returned an item with a different id.
    #[error("update changed item id from '{expected}' to '{actual}'")]
    IdentityMismatch { expected: String, actual: String },
    /// The item would encode to something `load` cannot read back.
    #[error("item '{id}' cannot be stored: {reason}")]
    InvalidItem { id: String, reason: String },
    /// Undo, redo, or load was attempted while a batch is open.
    #[error("operation not allowed while a batch is in progress")]
    BatchInProgress,
    /// `load` input could not be decoded.
    #[error("failed to parse document: {0}")]
    Parse(#[source] serde_json::Error),
    /// The document could not be encoded.
    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl HistoryError {
    pub(crate) fn not_found(id: &str) -> Self {
        Self::NotFound { id: id.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// Errors that can occur when loading a [`HistoryConfig`](crate::HistoryConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_item() {
        assert_eq!(
            HistoryError::not_found("a1").to_string(),
            "item 'a1' not found"
        );
        let e = HistoryError::IdentityMismatch {
            expected: "a".into(),
            actual: "b".into(),
        };
        assert_eq!(e.to_string(), "update changed item id from 'a' to 'b'");
    }

    #[test]
    fn parse_error_exposes_source() {
        let inner = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = HistoryError::Parse(inner);
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn validation_errors_joined() {
        let e = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(e.to_string(), "validation errors: a; b");
    }
}
