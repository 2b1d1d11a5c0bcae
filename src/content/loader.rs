//! Content loading
//!
//! Reads one content unit from the file store and splits it into YAML
//! frontmatter and body. Loaders know nothing about caching.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde_yaml::{Mapping, Value};
use tracing::warn;

use super::{ContentKey, RawContent};
use crate::error::LoadError;

const DELIMITER: &str = "---";

// == Loader Contract ==
/// Source of raw content units.
pub trait ContentLoader: Send + Sync {
    fn load(&self, key: &ContentKey) -> Result<RawContent, LoadError>;
}

impl<F> ContentLoader for F
where
    F: Fn(&ContentKey) -> Result<RawContent, LoadError> + Send + Sync,
{
    fn load(&self, key: &ContentKey) -> Result<RawContent, LoadError> {
        self(key)
    }
}

// == Filesystem Loader ==
/// Loads `<root>/<key>.md` from disk.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file backing `key`, if the key stays inside the root.
    pub fn path_for(&self, key: &ContentKey) -> Option<PathBuf> {
        key.relative_path().map(|relative| self.root.join(relative))
    }
}

impl ContentLoader for FsLoader {
    fn load(&self, key: &ContentKey) -> Result<RawContent, LoadError> {
        let Some(path) = self.path_for(key) else {
            warn!(key = %key, "Rejected content key outside the content root");
            return Err(LoadError::NotFound);
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(LoadError::NotFound),
            Err(err) => return Err(LoadError::Io(err)),
        };

        parse_document(key.clone(), &text)
    }
}

// == Parsing ==
/// Splits a document into its frontmatter block and body.
///
/// A document whose first non-blank text is not a `---` line has no
/// frontmatter. The block ends at the next line consisting solely of `---`.
pub fn split_frontmatter(text: &str) -> Result<(Option<&str>, &str), LoadError> {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let Some(rest) = trimmed.strip_prefix(DELIMITER) else {
        return Ok((None, text));
    };

    let block = match rest.split_once('\n') {
        Some((line, block)) if line.trim().is_empty() => block,
        None if rest.trim().is_empty() => return Err(unclosed()),
        // `----` or `--- text` is markdown, not a delimiter
        _ => return Ok((None, text)),
    };

    let mut offset = 0;
    for line in block.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            let body = &block[offset + line.len()..];
            return Ok((Some(&block[..offset]), body.trim_start_matches(['\r', '\n'])));
        }
        offset += line.len();
    }

    Err(unclosed())
}

fn unclosed() -> LoadError {
    LoadError::Malformed("found opening '---' but no closing '---'".to_string())
}

/// Parses a whole document into raw content for `key`.
pub fn parse_document(key: ContentKey, text: &str) -> Result<RawContent, LoadError> {
    let (block, body) = split_frontmatter(text)?;

    let frontmatter = match block {
        Some(yaml) if !yaml.trim().is_empty() => parse_mapping(yaml)?,
        _ => Mapping::new(),
    };

    Ok(RawContent::new(key, frontmatter, body.replace("\r\n", "\n")))
}

fn parse_mapping(yaml: &str) -> Result<Mapping, LoadError> {
    let value: Value = serde_yaml::from_str(yaml)
        .map_err(|e| LoadError::Malformed(format!("invalid YAML: {}", e)))?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(LoadError::Malformed(
            "frontmatter must be a mapping of fields".to_string(),
        )),
    }
}
