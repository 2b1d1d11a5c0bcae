//! Content Module
//!
//! Keys, records, and the loader/validator contracts the cache is built on.

mod key;
mod loader;
mod record;
mod validator;

pub use key::{ContentKey, CONTENT_EXTENSION};
pub use loader::{parse_document, split_frontmatter, ContentLoader, FsLoader};
pub use record::{ContentRecord, ContentStatus, Frontmatter, RawContent};
pub use validator::{ContentValidator, SchemaValidator, DATE_FORMAT};
