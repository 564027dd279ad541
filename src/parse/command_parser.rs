use chrono::NaiveDateTime;

use crate::model::task::Priority;
use crate::parse::timestamp::parse_timestamp;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPlain {
        description: String,
    },
    AddDeadline {
        description: String,
        due: NaiveDateTime,
    },
    AddRanged {
        description: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    /// Task numbers are 1-based and checked against the list at execution
    Mark(i64),
    Unmark(i64),
    Delete(i64),
    SetPriority {
        index: i64,
        priority: Priority,
    },
    List,
    Find(String),
    Welcome,
    Exit,
}

impl Command {
    /// Whether executing this command changes the task list
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::AddPlain { .. }
                | Command::AddDeadline { .. }
                | Command::AddRanged { .. }
                | Command::Mark(_)
                | Command::Unmark(_)
                | Command::Delete(_)
                | Command::SetPriority { .. }
        )
    }
}

/// Error type for command text that does not match the grammar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Command cannot be empty")]
    Empty,
    #[error("Input is not valid UTF-8")]
    InvalidEncoding,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("Please use format: deadline <description> /by yyyy-MM-dd HHmm")]
    DeadlineUsage,
    #[error("Please use format: event <description> /from yyyy-MM-dd HHmm /to yyyy-MM-dd HHmm")]
    EventUsage,
    #[error("Invalid date '{0}'. Use: yyyy-MM-dd HHmm (e.g., 2019-12-02 1800)")]
    InvalidTimestamp(String),
    #[error("Please give the number of the task to {0}")]
    MissingIndex(&'static str),
    #[error("'{0}' is not a valid task number")]
    InvalidIndex(String),
    #[error("Please use format: priority <task number> <high|medium|low>")]
    PriorityUsage,
    #[error("Invalid priority '{0}'. Use: high, medium, or low")]
    UnknownPriority(String),
    #[error("Please enter a keyword to search for")]
    MissingKeyword,
}

/// Parse one line of user input into a [`Command`].
///
/// The first whitespace-delimited word (case-insensitive) picks the command;
/// the rest of the line is its argument text.
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Err(ParseError::Empty);
    }

    let (keyword, args) = match line.split_once(char::is_whitespace) {
        Some((keyword, args)) => (keyword, args.trim()),
        None => (line, ""),
    };

    match keyword.to_lowercase().as_str() {
        "todo" => Ok(Command::AddPlain {
            description: args.to_string(),
        }),
        "deadline" => parse_deadline(args),
        "event" => parse_event(args),
        "mark" => parse_index(args, "mark").map(Command::Mark),
        "unmark" => parse_index(args, "unmark").map(Command::Unmark),
        "delete" => parse_index(args, "delete").map(Command::Delete),
        "priority" => parse_priority(args),
        "find" => {
            if args.is_empty() {
                Err(ParseError::MissingKeyword)
            } else {
                Ok(Command::Find(args.to_string()))
            }
        }
        "list" => Ok(Command::List),
        "welcome" => Ok(Command::Welcome),
        "bye" => Ok(Command::Exit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// `<description> /by <timestamp>`
fn parse_deadline(args: &str) -> Result<Command, ParseError> {
    let (description, due) = args.split_once("/by").ok_or(ParseError::DeadlineUsage)?;
    let (description, due) = (description.trim(), due.trim());
    if description.is_empty() || due.is_empty() {
        return Err(ParseError::DeadlineUsage);
    }
    Ok(Command::AddDeadline {
        description: description.to_string(),
        due: timestamp_arg(due)?,
    })
}

/// `<description> /from <timestamp> /to <timestamp>`
fn parse_event(args: &str) -> Result<Command, ParseError> {
    let (description, range) = args.split_once("/from").ok_or(ParseError::EventUsage)?;
    let (start, end) = range.split_once("/to").ok_or(ParseError::EventUsage)?;
    let (description, start, end) = (description.trim(), start.trim(), end.trim());
    if description.is_empty() || start.is_empty() || end.is_empty() {
        return Err(ParseError::EventUsage);
    }
    Ok(Command::AddRanged {
        description: description.to_string(),
        start: timestamp_arg(start)?,
        end: timestamp_arg(end)?,
    })
}

/// `<task number> <high|medium|low>`
fn parse_priority(args: &str) -> Result<Command, ParseError> {
    let mut words = args.split_whitespace();
    let (Some(index), Some(level), None) = (words.next(), words.next(), words.next()) else {
        return Err(ParseError::PriorityUsage);
    };
    let index = parse_index(index, "prioritise")?;
    let priority =
        Priority::parse_name(level).ok_or_else(|| ParseError::UnknownPriority(level.to_string()))?;
    Ok(Command::SetPriority { index, priority })
}

fn parse_index(args: &str, action: &'static str) -> Result<i64, ParseError> {
    if args.is_empty() {
        return Err(ParseError::MissingIndex(action));
    }
    args.parse::<i64>()
        .map_err(|_| ParseError::InvalidIndex(args.to_string()))
}

fn timestamp_arg(text: &str) -> Result<NaiveDateTime, ParseError> {
    parse_timestamp(text).ok_or_else(|| ParseError::InvalidTimestamp(text.to_string()))
}
