use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::parse::timestamp::format_display;

/// Task priority. The ordinal (low = 0) is what the task file stores.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn ordinal(self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Priority> {
        match ordinal {
            0 => Some(Priority::Low),
            1 => Some(Priority::Medium),
            2 => Some(Priority::High),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Parse `high`, `medium` or `low`, ignoring case
    pub fn parse_name(s: &str) -> Option<Priority> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for task construction
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The description of a task cannot be empty")]
    EmptyDescription,
    #[error("The description of a task cannot contain line breaks or control characters")]
    ControlCharacter,
    #[error("End time must be after start time")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// The variant-specific part of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// A plain todo with no dates
    Plain,
    /// Due by a single point in time
    Deadline { due: NaiveDateTime },
    /// Occupies a time range; `start <= end` always holds
    Ranged {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl TaskKind {
    /// Single-letter tag used in the task file and the display form
    pub fn tag(self) -> char {
        match self {
            TaskKind::Plain => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Ranged { .. } => 'E',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TaskKind::Plain => "todo",
            TaskKind::Deadline { .. } => "deadline",
            TaskKind::Ranged { .. } => "event",
        }
    }
}

/// A single task. Fields are private so the constructor invariants
/// (trimmed non-empty description, ordered range) cannot be bypassed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    priority: Priority,
    kind: TaskKind,
}

impl Task {
    fn new(description: &str, kind: TaskKind) -> Result<Self, ValidationError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        // A stored task is exactly one line
        if description.chars().any(char::is_control) {
            return Err(ValidationError::ControlCharacter);
        }
        if let TaskKind::Ranged { start, end } = kind
            && start > end
        {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(Task {
            description: description.to_string(),
            done: false,
            priority: Priority::default(),
            kind,
        })
    }

    pub fn plain(description: &str) -> Result<Self, ValidationError> {
        Task::new(description, TaskKind::Plain)
    }

    pub fn deadline(description: &str, due: NaiveDateTime) -> Result<Self, ValidationError> {
        Task::new(description, TaskKind::Deadline { due })
    }

    pub fn ranged(
        description: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        Task::new(description, TaskKind::Ranged { start, end })
    }

    /// Builder-style completion flag, used when restoring stored tasks
    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Builder-style priority, used when restoring stored tasks
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn mark_not_done(&mut self) {
        self.done = false;
    }

    /// Set the priority, returning the previous one
    pub fn set_priority(&mut self, priority: Priority) -> Priority {
        std::mem::replace(&mut self.priority, priority)
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn due(&self) -> Option<NaiveDateTime> {
        match self.kind {
            TaskKind::Deadline { due } => Some(due),
            _ => None,
        }
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        match self.kind {
            TaskKind::Ranged { start, .. } => Some(start),
            _ => None,
        }
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        match self.kind {
            TaskKind::Ranged { end, .. } => Some(end),
            _ => None,
        }
    }

    /// The checkbox character: `X` when done, a space otherwise
    pub fn status_char(&self) -> char {
        if self.done { 'X' } else { ' ' }
    }
}

/// Human-readable form, e.g. `[D][X] return book (by: Dec 02 2019, 6:00PM)`
impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}] {}",
            self.kind.tag(),
            self.status_char(),
            self.description
        )?;
        if self.priority != Priority::Medium {
            write!(f, " #{}", self.priority)?;
        }
        match self.kind {
            TaskKind::Plain => Ok(()),
            TaskKind::Deadline { due } => write!(f, " (by: {})", format_display(due)),
            TaskKind::Ranged { start, end } => write!(
                f,
                " (from: {} to: {})",
                format_display(start),
                format_display(end)
            ),
        }
    }
}
