//! Content records
//!
//! Raw loader output and the validated, immutable record built from it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use super::ContentKey;

// == Raw Content ==
/// Loader output: parsed but unvalidated frontmatter plus the body text.
#[derive(Debug, Clone, PartialEq)]
pub struct RawContent {
    pub key: ContentKey,
    pub frontmatter: serde_yaml::Mapping,
    pub body: String,
}

impl RawContent {
    pub fn new(key: ContentKey, frontmatter: serde_yaml::Mapping, body: impl Into<String>) -> Self {
        Self {
            key,
            frontmatter,
            body: body.into(),
        }
    }
}

// == Content Status ==
/// Publication state of a content unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Draft,
    #[default]
    Published,
    Archived,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 3] = [
        ContentStatus::Draft,
        ContentStatus::Published,
        ContentStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("unknown status '{}'", s.trim()))
    }
}

// == Frontmatter ==
/// Validated frontmatter fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frontmatter {
    pub title: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub status: ContentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes the schema does not know about, kept verbatim.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Frontmatter {
    /// Frontmatter with only the required fields set.
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date,
            updated: None,
            tags: Vec::new(),
            status: ContentStatus::default(),
            description: None,
            extra: BTreeMap::new(),
        }
    }
}

// == Content Record ==
/// A validated content unit. Never mutated once built; a refresh replaces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub key: ContentKey,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl ContentRecord {
    pub fn new(key: ContentKey, frontmatter: Frontmatter, body: impl Into<String>) -> Self {
        Self {
            key,
            frontmatter,
            body: body.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.frontmatter.title
    }

    pub fn is_published(&self) -> bool {
        self.frontmatter.status == ContentStatus::Published
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim().to_lowercase();
        self.frontmatter.tags.iter().any(|t| *t == wanted)
    }
}
