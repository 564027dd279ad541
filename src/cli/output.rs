use serde::Serialize;

use crate::model::task::{Priority, Task};
use crate::ops::dispatch::CommandError;
use crate::parse::format_timestamp;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct TaskJson {
    /// 1-based number in the full list
    pub index: usize,
    /// `todo`, `deadline` or `event`
    pub kind: &'static str,
    pub description: String,
    pub done: bool,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

pub fn task_to_json(index: usize, task: &Task) -> TaskJson {
    TaskJson {
        index,
        kind: task.kind().name(),
        description: task.description().to_string(),
        done: task.is_done(),
        priority: task.priority(),
        due: task.due().map(format_timestamp),
        start: task.start().map(format_timestamp),
        end: task.end().map(format_timestamp),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// How a failed command is shown inside the interactive loop
pub fn format_command_error(err: &CommandError) -> String {
    format!("Error! {}", err)
}
