use crate::model::task::{Priority, Task, ValidationError};
use crate::parse::task_serializer::FIELD_SEPARATOR;
use crate::parse::timestamp::parse_timestamp;

/// Error type for a stored task line that cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("expected at least 3 fields, found {0}")]
    TooFewFields(usize),
    #[error("unknown task type: {0}")]
    UnknownType(String),
    #[error("invalid done flag '{0}' (expected 0 or 1)")]
    InvalidDoneFlag(String),
    #[error("invalid priority '{0}' (expected 0, 1 or 2)")]
    InvalidPriority(String),
    #[error("missing timestamp for {0} task")]
    MissingTimestamp(&'static str),
    #[error("invalid timestamp '{0}' (expected yyyy-MM-dd HHmm)")]
    InvalidTimestamp(String),
    #[error("empty description")]
    EmptyDescription,
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A stored line that was left out of a load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedLine {
    /// 1-based line number in the source
    pub line_no: usize,
    pub text: String,
    pub error: FormatError,
}

/// Decode one stored task line.
///
/// Two shapes are accepted. The current one carries a priority ordinal
/// after the done flag; the older one has no priority field and decodes
/// as medium priority. Timestamps are taken from the end of the line so a
/// description containing the separator still decodes intact.
pub fn decode_line(line: &str) -> Result<Task, FormatError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < 3 {
        return Err(FormatError::TooFewFields(fields.len()));
    }

    let tag = fields[0].trim();
    let timestamp_count = match tag {
        "T" => 0,
        "D" => 1,
        "E" => 2,
        _ => return Err(FormatError::UnknownType(tag.to_string())),
    };

    let done = match fields[1].trim() {
        "0" => false,
        "1" => true,
        other => return Err(FormatError::InvalidDoneFlag(other.to_string())),
    };

    let rest = &fields[2..];
    if rest.len() < timestamp_count + 1 {
        return Err(FormatError::MissingTimestamp(kind_name(tag)));
    }
    let (head, stamps) = rest.split_at(rest.len() - timestamp_count);

    let (priority, description_fields) = match head {
        [ordinal, description @ ..] if !description.is_empty() && is_ordinal_field(ordinal) => {
            let priority = ordinal
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(Priority::from_ordinal)
                .ok_or_else(|| FormatError::InvalidPriority(ordinal.trim().to_string()))?;
            (priority, description)
        }
        _ => (Priority::Medium, head),
    };

    let description = description_fields.join(FIELD_SEPARATOR);
    if description.trim().is_empty() {
        return Err(FormatError::EmptyDescription);
    }

    let task = match stamps {
        [] => Task::plain(&description)?,
        [due] => Task::deadline(&description, timestamp_field(due)?)?,
        [start, end, ..] => Task::ranged(
            &description,
            timestamp_field(start)?,
            timestamp_field(end)?,
        )?,
    };

    Ok(task.with_done(done).with_priority(priority))
}

/// Decode every line of a task file. Blank lines are ignored. A line that
/// fails to decode is returned in the dropped list and does not affect the
/// lines around it.
pub fn decode_all<'a, I>(lines: I) -> (Vec<Task>, Vec<DroppedLine>)
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tasks = Vec::new();
    let mut dropped = Vec::new();

    for (idx, line) in lines.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode_line(line) {
            Ok(task) => tasks.push(task),
            Err(error) => dropped.push(DroppedLine {
                line_no: idx + 1,
                text: line.to_string(),
                error,
            }),
        }
    }

    (tasks, dropped)
}

fn is_ordinal_field(field: &str) -> bool {
    let field = field.trim();
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn timestamp_field(field: &str) -> Result<chrono::NaiveDateTime, FormatError> {
    parse_timestamp(field).ok_or_else(|| FormatError::InvalidTimestamp(field.trim().to_string()))
}

fn kind_name(tag: &str) -> &'static str {
    match tag {
        "D" => "deadline",
        "E" => "event",
        _ => "todo",
    }
}
