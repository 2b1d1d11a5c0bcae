//! Content validation
//!
//! Turns raw frontmatter into a typed [`ContentRecord`], applying defaults
//! and collecting every schema violation rather than stopping at the first.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_yaml::Value;

use super::{ContentRecord, ContentStatus, Frontmatter, RawContent};
use crate::error::{FieldViolation, ValidationError};

/// Accepted date layout for `date` and `updated`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// == Validator Contract ==
/// Schema check applied to every freshly loaded content unit.
pub trait ContentValidator: Send + Sync {
    fn validate(&self, raw: RawContent) -> Result<ContentRecord, ValidationError>;
}

impl<F> ContentValidator for F
where
    F: Fn(RawContent) -> Result<ContentRecord, ValidationError> + Send + Sync,
{
    fn validate(&self, raw: RawContent) -> Result<ContentRecord, ValidationError> {
        self(raw)
    }
}

// == Schema Validator ==
/// Validator for the garden's page schema.
///
/// | field         | rule                                                     |
/// |---------------|----------------------------------------------------------|
/// | `title`       | required non-blank string                                |
/// | `date`        | required `YYYY-MM-DD`                                    |
/// | `updated`     | optional `YYYY-MM-DD`, not before `date`                 |
/// | `tags`        | optional list (or single string), lowercased, de-duped   |
/// | `status`      | optional `draft` / `published` / `archived`              |
/// | `description` | optional string                                          |
///
/// Any other field is kept in [`Frontmatter::extra`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl ContentValidator for SchemaValidator {
    fn validate(&self, raw: RawContent) -> Result<ContentRecord, ValidationError> {
        let RawContent {
            key,
            frontmatter,
            body,
        } = raw;

        let mut violations = Vec::new();
        let mut fields = BTreeMap::new();
        for (name, value) in frontmatter {
            match name {
                Value::String(name) => {
                    fields.insert(name, value);
                }
                _ => violations.push(FieldViolation::new(
                    "frontmatter",
                    "field names must be strings",
                )),
            }
        }

        let title = match take_string(&mut fields, "title", &mut violations) {
            Some(title) if title.trim().is_empty() => {
                violations.push(FieldViolation::new("title", "must not be blank"));
                None
            }
            Some(title) => Some(title.trim().to_string()),
            None => {
                if !violations.iter().any(|v| v.field == "title") {
                    violations.push(FieldViolation::new("title", "is required"));
                }
                None
            }
        };

        let date = match take_string(&mut fields, "date", &mut violations) {
            Some(raw) => parse_date("date", &raw, &mut violations),
            None => {
                if !violations.iter().any(|v| v.field == "date") {
                    violations.push(FieldViolation::new("date", "is required"));
                }
                None
            }
        };

        let updated = take_string(&mut fields, "updated", &mut violations)
            .and_then(|raw| parse_date("updated", &raw, &mut violations));
        if let (Some(date), Some(updated)) = (date, updated) {
            if updated < date {
                violations.push(FieldViolation::new("updated", "must not precede date"));
            }
        }

        let tags = take_tags(&mut fields, &mut violations);

        let status = match take_string(&mut fields, "status", &mut violations) {
            Some(raw) => raw.parse::<ContentStatus>().unwrap_or_else(|_| {
                violations.push(FieldViolation::new(
                    "status",
                    "must be one of draft, published, archived",
                ));
                ContentStatus::default()
            }),
            None => ContentStatus::default(),
        };

        let description = take_string(&mut fields, "description", &mut violations)
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        match (title, date) {
            (Some(title), Some(date)) if violations.is_empty() => {
                let frontmatter = Frontmatter {
                    title,
                    date,
                    updated,
                    tags,
                    status,
                    description,
                    extra: fields,
                };
                Ok(ContentRecord::new(key, frontmatter, body))
            }
            _ => Err(ValidationError::new(violations)),
        }
    }
}

/// Removes `name` and returns it as a string. `null` counts as absent.
fn take_string(
    fields: &mut BTreeMap<String, Value>,
    name: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match fields.remove(name)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        // YAML reads `2024` or `true` as scalars; accept them as text
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => {
            violations.push(FieldViolation::new(name, "must be a string"));
            None
        }
    }
}

fn parse_date(
    field: &str,
    raw: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            violations.push(FieldViolation::new(
                field,
                format!("'{}' is not a YYYY-MM-DD date", raw.trim()),
            ));
            None
        }
    }
}

fn take_tags(
    fields: &mut BTreeMap<String, Value>,
    violations: &mut Vec<FieldViolation>,
) -> Vec<String> {
    let items = match fields.remove("tags") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Sequence(items)) => items,
        Some(single @ (Value::String(_) | Value::Number(_))) => vec![single],
        Some(_) => {
            violations.push(FieldViolation::new("tags", "must be a list of strings"));
            return Vec::new();
        }
    };

    let mut tags: Vec<String> = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let field = format!("tags[{}]", index);
        let text = match item {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => {
                violations.push(FieldViolation::new(field, "must be a string"));
                continue;
            }
        };

        let tag = text.trim().to_lowercase();
        if tag.is_empty() {
            violations.push(FieldViolation::new(field, "must not be blank"));
        } else if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{parse_document, ContentKey};

    fn validate(text: &str) -> Result<ContentRecord, ValidationError> {
        let raw = parse_document(ContentKey::new("page"), text).unwrap();
        SchemaValidator::new().validate(raw)
    }

    fn fields(err: &ValidationError) -> Vec<&str> {
        err.violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_valid_minimal_page() {
        let record = validate("---\ntitle: Hello\ndate: 2024-03-01\n---\nBody").unwrap();

        assert_eq!(record.title(), "Hello");
        assert_eq!(
            record.frontmatter.date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert_eq!(record.frontmatter.status, ContentStatus::Published);
        assert!(record.frontmatter.tags.is_empty());
        assert_eq!(record.body, "Body");
    }

    #[test]
    fn test_valid_full_page() {
        let text = "---
title: '  Tending the garden  '
date: 2024-03-01
updated: 2024-04-10
tags: [Gardening, notes, gardening, 2024]
status: Draft
description: How I keep notes
growth: seedling
---
Body";
        let record = validate(text).unwrap();
        let fm = &record.frontmatter;

        assert_eq!(fm.title, "Tending the garden");
        assert_eq!(fm.updated, NaiveDate::from_ymd_opt(2024, 4, 10));
        assert_eq!(fm.tags, vec!["gardening", "notes", "2024"]);
        assert_eq!(fm.status, ContentStatus::Draft);
        assert_eq!(fm.description.as_deref(), Some("How I keep notes"));
        assert_eq!(
            fm.extra.get("growth"),
            Some(&Value::String("seedling".into()))
        );
    }

    #[test]
    fn test_single_string_tag() {
        let record = validate("---\ntitle: T\ndate: 2024-01-01\ntags: Rust\n---\n").unwrap();
        assert_eq!(record.frontmatter.tags, vec!["rust"]);
    }

    #[test]
    fn test_missing_required_fields() {
        let err = validate("# no frontmatter").unwrap_err();
        assert_eq!(fields(&err), vec!["title", "date"]);
    }

    #[test]
    fn test_collects_all_violations() {
        let text = "---
title: '   '
date: March 1st
tags: [ok, '', {nested: map}]
status: seedling
---
";
        let err = validate(text).unwrap_err();

        assert_eq!(
            fields(&err),
            vec!["title", "date", "tags[1]", "tags[2]", "status"]
        );
    }

    #[test]
    fn test_title_wrong_type() {
        let err = validate("---\ntitle: [a, b]\ndate: 2024-01-01\n---\n").unwrap_err();
        assert_eq!(fields(&err), vec!["title"]);
        assert_eq!(err.violations[0].message, "must be a string");
    }

    #[test]
    fn test_updated_before_date() {
        let err =
            validate("---\ntitle: T\ndate: 2024-05-01\nupdated: 2024-04-01\n---\n").unwrap_err();
        assert_eq!(fields(&err), vec!["updated"]);
    }

    #[test]
    fn test_tags_wrong_type() {
        let err = validate("---\ntitle: T\ndate: 2024-01-01\ntags: {a: 1}\n---\n").unwrap_err();
        assert_eq!(fields(&err), vec!["tags"]);
    }

    #[test]
    fn test_null_optional_fields_are_absent() {
        let record =
            validate("---\ntitle: T\ndate: 2024-01-01\ntags: ~\nstatus:\ndescription: ''\n---\n")
                .unwrap();

        assert!(record.frontmatter.tags.is_empty());
        assert_eq!(record.frontmatter.status, ContentStatus::Published);
        assert_eq!(record.frontmatter.description, None);
    }

    #[test]
    fn test_non_string_field_name() {
        let err = validate("---\ntitle: T\ndate: 2024-01-01\n42: answer\n---\n").unwrap_err();
        assert_eq!(fields(&err), vec!["frontmatter"]);
    }
}
