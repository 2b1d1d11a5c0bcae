//! Command parsing for the line protocol.

use std::str::FromStr;

use thiserror::Error;

use crate::content::ContentKey;

/// A single parsed protocol command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get(ContentKey),
    Refresh(ContentKey),
    Invalidate(ContentKey),
    InvalidateAll,
    Stats,
}

/// Reasons a command line could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Command '{0}' requires a key")]
    MissingKey(&'static str),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),
}

impl Command {
    /// Protocol name of the command, as typed on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Get(_) => "get",
            Command::Refresh(_) => "refresh",
            Command::Invalidate(_) => "invalidate",
            Command::InvalidateAll => "invalidate-all",
            Command::Stats => "stats",
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or(CommandError::Empty)?;
        let arg = parts.next();
        if let Some(extra) = parts.next() {
            return Err(CommandError::UnexpectedArgument(extra.to_string()));
        }

        let command = match name.to_ascii_lowercase().as_str() {
            "get" => Command::Get(required_key("get", arg)?),
            "refresh" => Command::Refresh(required_key("refresh", arg)?),
            "invalidate" => Command::Invalidate(required_key("invalidate", arg)?),
            "invalidate-all" => no_argument(Command::InvalidateAll, arg)?,
            "stats" => no_argument(Command::Stats, arg)?,
            _ => return Err(CommandError::Unknown(name.to_string())),
        };
        Ok(command)
    }
}

fn required_key(command: &'static str, arg: Option<&str>) -> Result<ContentKey, CommandError> {
    let key = ContentKey::new(arg.ok_or(CommandError::MissingKey(command))?);
    if key.as_str().is_empty() {
        return Err(CommandError::MissingKey(command));
    }
    Ok(key)
}

fn no_argument(command: Command, arg: Option<&str>) -> Result<Command, CommandError> {
    match arg {
        Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
        None => Ok(command),
    }
}
