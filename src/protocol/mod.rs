//! Line Protocol Module
//!
//! Text commands and JSON responses for driving a content cache over a
//! line-oriented stream such as stdin/stdout.
//!
//! # Commands
//! - `get <key>` - Fetch a record, loading it on a miss
//! - `refresh <key>` - Reload a record regardless of cache state
//! - `invalidate <key>` - Drop one cached record
//! - `invalidate-all` - Drop every cached record
//! - `stats` - Report cache statistics

pub mod command;
pub mod handler;
pub mod response;

pub use command::{Command, CommandError};
pub use handler::{execute, handle_line};
pub use response::{ErrorResponse, InvalidateResponse, RecordResponse, Response, StatsResponse};
