//! Command Handler
//!
//! Runs parsed commands against a content cache.

use tracing::debug;

use crate::cache::ContentCache;
use crate::content::{ContentLoader, ContentValidator};
use crate::protocol::{
    Command, ErrorResponse, InvalidateResponse, RecordResponse, Response, StatsResponse,
};

/// Executes one command. Cache errors become error responses; nothing here
/// fails the caller.
pub fn execute<L, V>(cache: &ContentCache<L, V>, command: Command) -> Response
where
    L: ContentLoader,
    V: ContentValidator,
{
    debug!(command = command.name(), "executing command");

    match command {
        Command::Get(key) => match cache.get(&key) {
            Ok(record) => Response::Record(RecordResponse::new(record)),
            Err(err) => Response::Error(ErrorResponse::from(&err)),
        },
        Command::Refresh(key) => match cache.refresh(&key) {
            Ok(record) => Response::Record(RecordResponse::new(record)),
            Err(err) => Response::Error(ErrorResponse::from(&err)),
        },
        Command::Invalidate(key) => {
            let removed = cache.invalidate(&key);
            Response::Invalidated(InvalidateResponse::single(key, removed))
        }
        Command::InvalidateAll => {
            Response::Invalidated(InvalidateResponse::all(cache.invalidate_all()))
        }
        Command::Stats => Response::Stats(StatsResponse::new(cache.stats())),
    }
}

/// Parses and executes one input line. Blank lines yield `None`.
pub fn handle_line<L, V>(cache: &ContentCache<L, V>, line: &str) -> Option<Response>
where
    L: ContentLoader,
    V: ContentValidator,
{
    if line.trim().is_empty() {
        return None;
    }

    let response = match line.parse::<Command>() {
        Ok(command) => execute(cache, command),
        Err(err) => Response::Error(ErrorResponse::from(&err)),
    };
    Some(response)
}
