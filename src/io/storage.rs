use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery;
use crate::model::config::{CorruptLinePolicy, StorageConfig};
use crate::model::task::Task;
use crate::model::task_list::TaskList;
use crate::parse::{DroppedLine, decode_all, encode_all};

/// Error type for task file I/O
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} corrupt line(s) in {path}: {}", .lines.len(), describe_dropped(.lines))]
    Corrupt {
        path: PathBuf,
        lines: Vec<DroppedLine>,
    },
}

fn describe_dropped(lines: &[DroppedLine]) -> String {
    lines
        .iter()
        .map(|d| format!("line {}: {}", d.line_no, d.error))
        .collect::<Vec<_>>()
        .join("; ")
}

/// The result of loading the task file
#[derive(Debug, Default)]
pub struct Loaded {
    pub tasks: TaskList,
    /// Lines left out under the skip policy (already written to the recovery log)
    pub dropped: Vec<DroppedLine>,
}

/// The task file inside a data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    path: PathBuf,
    policy: CorruptLinePolicy,
}

impl Storage {
    pub fn new(data_dir: &Path, config: &StorageConfig) -> Self {
        Storage {
            data_dir: data_dir.to_path_buf(),
            path: data_dir.join(&config.file),
            policy: config.on_corrupt,
        }
    }

    pub fn with_policy(mut self, policy: CorruptLinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the task list. A missing file is an empty list.
    pub fn load(&self) -> Result<Loaded, StorageError> {
        if !self.path.exists() {
            return Ok(Loaded::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| StorageError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;

        let (tasks, dropped) = decode_all(content.lines());
        if !dropped.is_empty() {
            match self.policy {
                CorruptLinePolicy::Skip => {
                    recovery::log_dropped_lines(&self.data_dir, &self.source_name(), &dropped);
                }
                CorruptLinePolicy::Abort => {
                    return Err(StorageError::Corrupt {
                        path: self.path.clone(),
                        lines: dropped,
                    });
                }
            }
        }

        Ok(Loaded {
            tasks: TaskList::from_tasks(tasks),
            dropped,
        })
    }

    /// Rewrite the whole task file. The parent directory is created if
    /// needed. On failure the content is kept in the recovery log.
    pub fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let mut content = encode_all(tasks).join("\n");
        if !content.is_empty() {
            content.push('\n');
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = fs::create_dir_all(parent)
        {
            return Err(self.write_failed(e, &content));
        }
        if let Err(e) = recovery::atomic_write(&self.path, content.as_bytes()) {
            return Err(self.write_failed(e, &content));
        }
        Ok(())
    }

    fn write_failed(&self, error: std::io::Error, content: &str) -> StorageError {
        recovery::log_failed_save(&self.data_dir, &self.path, &error, content);
        StorageError::WriteError {
            path: self.path.clone(),
            source: error,
        }
    }

    fn source_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}
