use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

pub const CONFIG_FILE_NAME: &str = "config.toml";

const CONFIG_TEMPLATE: &str = r##"# taskline configuration

[storage]
# Task file, relative to this directory
file = "tasks.txt"

# What to do with a task line that cannot be read:
#   "skip"  - leave it out, keep loading, and record it in .recovery.log
#   "abort" - refuse to start and list every bad line
on_corrupt = "skip"

[display]
# How `find` numbers its results:
#   "original"   - the number each task has in `list`
#   "sequential" - 1, 2, 3... over the matches only
find_numbering = "original"
"##;

/// Error type for config I/O
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("{path} already exists (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Read config.toml from the data directory. A missing file means defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_path(data_dir);
    if !path.exists() {
        return Ok(Config::default());
    }
    let text = fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })
}

/// Create the data directory and write the commented config template.
/// Returns the path written.
pub fn write_config_template(data_dir: &Path, force: bool) -> Result<PathBuf, ConfigError> {
    let path = config_path(data_dir);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists { path });
    }
    fs::create_dir_all(data_dir)
        .and_then(|_| fs::write(&path, CONFIG_TEMPLATE))
        .map_err(|e| ConfigError::WriteError {
            path: path.clone(),
            source: e,
        })?;
    Ok(path)
}
