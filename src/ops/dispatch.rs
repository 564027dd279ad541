use crate::io::storage::{Storage, StorageError};
use crate::model::config::FindNumbering;
use crate::model::task::{Priority, Task, ValidationError};
use crate::model::task_list::{RangeError, TaskList};
use crate::ops::search::find_tasks;
use crate::parse::{Command, ParseError, parse};

const WELCOME: &str = "Hello! I'm Taskline\nWhat can I do for you?";
const FAREWELL: &str = "Bye. Hope to see you again soon!";

/// Error type for a line that could not be carried out. None of these
/// change the task list.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error("invalid search keyword: {0}")]
    Search(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    /// Terminal: the read loop stops after `bye`
    Exited,
}

/// The outcome of a successful command
#[derive(Debug)]
pub struct Reply {
    pub message: String,
    /// Set when the command changed the list but the save failed. The
    /// in-memory change stands either way.
    pub save_error: Option<StorageError>,
}

impl Reply {
    fn text(message: impl Into<String>) -> Self {
        Reply {
            message: message.into(),
            save_error: None,
        }
    }

    /// The message plus a warning line if the save failed
    pub fn render(&self) -> String {
        match &self.save_error {
            Some(e) => format!("{}\nwarning: could not save tasks: {}", self.message, e),
            None => self.message.clone(),
        }
    }
}

/// The task list together with where it is saved. Commands are applied
/// one at a time; every successful change is written out before the
/// next command runs.
#[derive(Debug)]
pub struct Session {
    tasks: TaskList,
    storage: Storage,
    state: SessionState,
    find_numbering: FindNumbering,
}

impl Session {
    pub fn new(tasks: TaskList, storage: Storage) -> Self {
        Session {
            tasks,
            storage,
            state: SessionState::Running,
            find_numbering: FindNumbering::default(),
        }
    }

    pub fn with_find_numbering(mut self, numbering: FindNumbering) -> Self {
        self.find_numbering = numbering;
        self
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_exited(&self) -> bool {
        self.state == SessionState::Exited
    }

    /// Parse and execute one input line
    pub fn handle_line(&mut self, line: &str) -> Result<Reply, CommandError> {
        let command = parse(line)?;
        self.execute(command)
    }

    /// Execute a parsed command. A command that changes the list is saved
    /// before this returns; a failed save is reported in the reply.
    pub fn execute(&mut self, command: Command) -> Result<Reply, CommandError> {
        let mutating = command.is_mutating();
        let message = self.apply(command)?;
        if !mutating {
            return Ok(Reply::text(message));
        }
        Ok(Reply {
            message,
            save_error: self.storage.save(self.tasks.as_slice()).err(),
        })
    }

    fn apply(&mut self, command: Command) -> Result<String, CommandError> {
        let message = match command {
            Command::AddPlain { description } => self.add(Task::plain(&description)?),
            Command::AddDeadline { description, due } => {
                self.add(Task::deadline(&description, due)?)
            }
            Command::AddRanged {
                description,
                start,
                end,
            } => self.add(Task::ranged(&description, start, end)?),
            Command::Mark(index) => {
                let task = self.tasks.get_mut(index)?;
                task.mark_done();
                format!("Nice! I've marked this task as done:\n  {}", task)
            }
            Command::Unmark(index) => {
                let task = self.tasks.get_mut(index)?;
                task.mark_not_done();
                format!("OK, I've marked this task as not done yet:\n  {}", task)
            }
            Command::Delete(index) => {
                let removed = self.tasks.remove(index)?;
                format!(
                    "Noted. I've removed this task:\n  {}\nNow you have {} tasks in the list.",
                    removed,
                    self.tasks.len()
                )
            }
            Command::SetPriority { index, priority } => {
                let task = self.tasks.get_mut(index)?;
                let old = task.set_priority(priority);
                if old == priority {
                    format!("Task {} already has {} priority:\n  {}", index, priority, task)
                } else {
                    let from = match old {
                        Priority::Medium => format!("{} (default)", old),
                        _ => old.to_string(),
                    };
                    format!(
                        "Priority updated for task {}:\n  From: {}\n  To: {}\n  {}",
                        index, from, priority, task
                    )
                }
            }
            Command::List => self.render_list(),
            Command::Find(keyword) => self.render_find(&keyword)?,
            Command::Welcome => WELCOME.to_string(),
            Command::Exit => {
                self.state = SessionState::Exited;
                FAREWELL.to_string()
            }
        };
        Ok(message)
    }

    fn add(&mut self, task: Task) -> String {
        let message = format!(
            "Got it. I've added this task:\n  {}\nNow you have {} tasks in the list.",
            task,
            self.tasks.len() + 1
        );
        self.tasks.push(task);
        message
    }

    fn render_list(&self) -> String {
        if self.tasks.is_empty() {
            return "Your task list is empty!".to_string();
        }
        render_numbered("Here are the tasks in your list:", self.tasks.numbered())
    }

    fn render_find(&self, keyword: &str) -> Result<String, CommandError> {
        let hits = find_tasks(&self.tasks, keyword)?;
        if hits.is_empty() {
            return Ok(format!("No tasks found containing: {}", keyword));
        }
        let header = "Here are the matching tasks in your list:";
        Ok(match self.find_numbering {
            FindNumbering::Original => render_numbered(header, hits.into_iter()),
            FindNumbering::Sequential => render_numbered(
                header,
                hits.into_iter().enumerate().map(|(i, (_, t))| (i + 1, t)),
            ),
        })
    }
}

fn render_numbered<'a>(header: &str, entries: impl Iterator<Item = (usize, &'a Task)>) -> String {
    entries.fold(header.to_string(), |out, (number, task)| {
        out + &format!("\n {}.{}", number, task)
    })
}
