//! Error types for the content cache
//!
//! Provides unified error handling using thiserror.

use std::fmt;
use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::content::ContentKey;

// == Field Violation ==
/// A single schema violation reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Frontmatter field the violation refers to
    pub field: String,
    /// Human readable description of the problem
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Joins violations into a single `; `-separated line.
fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// == Load Error ==
/// Failure reported by a content loader.
#[derive(Error, Debug)]
pub enum LoadError {
    /// No backing content exists for the key
    #[error("content not found")]
    NotFound,

    /// The backing file exists but could not be read
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    /// The file was read but its frontmatter block is structurally broken
    #[error("malformed frontmatter: {0}")]
    Malformed(String),
}

// == Validation Error ==
/// Schema validation failure, carrying every violation found.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }
}

// == Content Error Enum ==
/// Error type returned to callers of the content cache.
#[derive(Error, Debug)]
pub enum ContentError {
    /// Requested key has no backing content
    #[error("Content not found: {0}")]
    NotFound(ContentKey),

    /// Storage read failure
    #[error("I/O error reading {key}: {source}")]
    Io {
        key: ContentKey,
        #[source]
        source: io::Error,
    },

    /// Frontmatter or body failed schema validation
    #[error("Invalid content in {key}: {}", join_violations(.violations))]
    InvalidContent {
        key: ContentKey,
        violations: Vec<FieldViolation>,
    },
}

impl ContentError {
    /// Builds the caller-facing error for a loader failure.
    pub fn from_load(key: &ContentKey, err: LoadError) -> Self {
        match err {
            LoadError::NotFound => ContentError::NotFound(key.clone()),
            LoadError::Io(source) => ContentError::Io {
                key: key.clone(),
                source,
            },
            LoadError::Malformed(message) => ContentError::InvalidContent {
                key: key.clone(),
                violations: vec![FieldViolation::new("frontmatter", message)],
            },
        }
    }

    /// Builds the caller-facing error for a validator failure.
    pub fn from_validation(key: &ContentKey, err: ValidationError) -> Self {
        ContentError::InvalidContent {
            key: key.clone(),
            violations: err.violations,
        }
    }

    /// Short machine-readable label for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentError::NotFound(_) => "not_found",
            ContentError::Io { .. } => "io",
            ContentError::InvalidContent { .. } => "invalid_content",
        }
    }

    /// Key the failed request was made for.
    pub fn key(&self) -> &ContentKey {
        match self {
            ContentError::NotFound(key) => key,
            ContentError::Io { key, .. } => key,
            ContentError::InvalidContent { key, .. } => key,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the content cache.
pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_from_load() {
        let key = ContentKey::new("notes/missing");
        let err = ContentError::from_load(&key, LoadError::NotFound);

        assert!(matches!(err, ContentError::NotFound(ref k) if k == &key));
        assert_eq!(err.kind(), "not_found");
        assert_eq!(err.to_string(), "Content not found: notes/missing");
    }

    #[test]
    fn test_io_from_load_keeps_source() {
        let key = ContentKey::new("locked");
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = ContentError::from_load(&key, LoadError::Io(io_err));

        match &err {
            ContentError::Io { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn test_malformed_becomes_invalid_content() {
        let key = ContentKey::new("broken");
        let err = ContentError::from_load(&key, LoadError::Malformed("unclosed".into()));

        match err {
            ContentError::InvalidContent { violations, .. } => {
                assert_eq!(violations, vec![FieldViolation::new("frontmatter", "unclosed")]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_content_message_lists_fields() {
        let key = ContentKey::new("page");
        let validation = ValidationError::new(vec![
            FieldViolation::new("title", "is required"),
            FieldViolation::new("date", "is required"),
        ]);
        let err = ContentError::from_validation(&key, validation);

        assert_eq!(
            err.to_string(),
            "Invalid content in page: title: is required; date: is required"
        );
        assert_eq!(err.key(), &key);
    }
}
