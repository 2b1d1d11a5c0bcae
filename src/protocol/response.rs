//! Response DTOs for the line protocol
//!
//! Every response serializes to a single JSON object with an `ok` flag.

use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::cache::ContentCacheStats;
use crate::content::{ContentKey, ContentRecord};
use crate::error::{ContentError, FieldViolation};
use crate::protocol::CommandError;

/// Any protocol response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Record(RecordResponse),
    Invalidated(InvalidateResponse),
    Stats(StatsResponse),
    Error(ErrorResponse),
}

impl Response {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Response::Error(_))
    }

    /// Serializes to one JSON line, falling back to an error object when the
    /// record itself can't be represented as JSON.
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            let fallback = ErrorResponse::new("serialization", err.to_string());
            serde_json::to_string(&fallback)
                .unwrap_or_else(|_| r#"{"ok":false,"kind":"serialization"}"#.to_string())
        })
    }
}

/// Response body for `get` and `refresh`
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    pub ok: bool,
    #[serde(serialize_with = "serialize_shared")]
    pub record: Arc<ContentRecord>,
}

impl RecordResponse {
    pub fn new(record: Arc<ContentRecord>) -> Self {
        Self { ok: true, record }
    }
}

fn serialize_shared<S: Serializer>(
    record: &Arc<ContentRecord>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    record.as_ref().serialize(serializer)
}

/// Response body for `invalidate` and `invalidate-all`
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<ContentKey>,
    /// Number of entries actually dropped
    pub removed: usize,
}

impl InvalidateResponse {
    pub fn single(key: ContentKey, removed: bool) -> Self {
        Self {
            ok: true,
            key: Some(key),
            removed: usize::from(removed),
        }
    }

    pub fn all(removed: usize) -> Self {
        Self {
            ok: true,
            key: None,
            removed,
        }
    }
}

/// Response body for `stats`
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub stats: ContentCacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: ContentCacheStats) -> Self {
        Self {
            ok: true,
            hit_rate: stats.store.hit_rate(),
            stats,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    /// Machine-readable error kind
    pub kind: String,
    /// Error message describing what went wrong
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<ContentKey>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<FieldViolation>,
}

impl ErrorResponse {
    pub fn new(kind: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            kind: kind.into(),
            error: error.into(),
            key: None,
            violations: Vec::new(),
        }
    }
}

impl From<&ContentError> for ErrorResponse {
    fn from(err: &ContentError) -> Self {
        let mut response = ErrorResponse::new(err.kind(), err.to_string());
        response.key = Some(err.key().clone());
        if let ContentError::InvalidContent { violations, .. } = err {
            response.violations = violations.clone();
        }
        response
    }
}

impl From<&CommandError> for ErrorResponse {
    fn from(err: &CommandError) -> Self {
        ErrorResponse::new("bad_command", err.to_string())
    }
}
