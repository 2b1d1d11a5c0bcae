//! Content keys
//!
//! A key names one content unit relative to the content root.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

/// File extension of content units on disk.
pub const CONTENT_EXTENSION: &str = "md";

// == Content Key ==
/// Stable identifier for a content unit, e.g. `notes/rust-ownership`.
///
/// Keys are normalized on construction so that `notes/rust`, `/notes/rust/`,
/// `notes//rust`, `notes/./rust` and `notes/rust.md` are all the same key.
/// `..` segments are kept so [`relative_path`](Self::relative_path) can
/// reject them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentKey(String);

impl ContentKey {
    pub fn new(raw: impl AsRef<str>) -> Self {
        let joined = raw
            .as_ref()
            .trim()
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != ".")
            .collect::<Vec<_>>()
            .join("/");
        let stem = joined.strip_suffix(".md").unwrap_or(&joined);
        Self(stem.trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative path of the backing file, or `None` if the key is empty or
    /// would resolve outside the content root.
    pub fn relative_path(&self) -> Option<PathBuf> {
        if self.0.is_empty() {
            return None;
        }

        let path = Path::new(&self.0);
        let contained = path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !contained {
            return None;
        }

        Some(PathBuf::from(format!("{}.{}", self.0, CONTENT_EXTENSION)))
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentKey {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for ContentKey {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl AsRef<str> for ContentKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
