use serde::{Deserialize, Serialize};

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Task file name, relative to the data directory
    #[serde(default = "default_file")]
    pub file: String,
    #[serde(default)]
    pub on_corrupt: CorruptLinePolicy,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            file: default_file(),
            on_corrupt: CorruptLinePolicy::default(),
        }
    }
}

/// What loading does with a task line that cannot be decoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptLinePolicy {
    /// Drop the line, keep loading, and record it in the recovery log
    #[default]
    Skip,
    /// Refuse to load and report every bad line in one error
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub find_numbering: FindNumbering,
}

/// How `find` numbers its matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindNumbering {
    /// Each match keeps its number in the full list, so it can be fed to mark/delete
    #[default]
    Original,
    /// Matches are renumbered 1..k
    Sequential,
}

fn default_file() -> String {
    "tasks.txt".to_string()
}
