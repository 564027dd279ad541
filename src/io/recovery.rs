use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::parse::DroppedLine;

/// Entries older than this many days are removed by a default prune.
pub const PRUNE_AGE_DAYS: i64 = 30;

const LOG_FILE_NAME: &str = ".recovery.log";

const FILE_HEADER: &str = "\
<!-- taskline recovery log
     Task lines that could not be loaded, and task lists that could not
     be saved, are kept here so nothing is silently lost.
     View with: tl recovery
     Prune with: tl recovery prune -->

---
";

/// Separator between the heading timestamp and the kind
const HEADING_DASH: &str = " \u{2014} ";

/// What kind of data an entry preserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryKind {
    /// Stored lines that a load could not decode
    Load,
    /// Task file content that a save could not write
    Save,
}

impl RecoveryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecoveryKind::Load => "load",
            RecoveryKind::Save => "save",
        }
    }
}

impl fmt::Display for RecoveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecoveryKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [RecoveryKind::Load, RecoveryKind::Save]
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or(())
    }
}

/// One preserved block of task data, with enough context to restore it
/// by hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryEntry {
    pub recorded_at: DateTime<Utc>,
    pub kind: RecoveryKind,
    pub summary: String,
    /// `key: value` lines shown under the heading
    pub details: Vec<(String, String)>,
    /// The raw task lines
    pub content: String,
}

/// Serialized form for `tl recovery --json`
#[derive(Debug, Serialize)]
pub struct RecoveryEntryJson<'a> {
    pub recorded_at: String,
    pub kind: RecoveryKind,
    pub summary: &'a str,
    pub details: BTreeMap<&'a str, &'a str>,
    pub content: &'a str,
}

/// Which entries a prune removes
#[derive(Debug, Clone, Copy)]
pub enum PruneScope {
    All,
    OlderThan(DateTime<Utc>),
}

pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LOG_FILE_NAME)
}

/// Write `content` to `path` through a temp file in the same directory,
/// then rename it into place.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl RecoveryEntry {
    fn stamp(&self) -> String {
        self.recorded_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// The block appended to the log file. Also what `tl recovery` prints.
    pub fn render(&self) -> String {
        let mut out = format!(
            "## {}{}{}: {}\n\n",
            self.stamp(),
            HEADING_DASH,
            self.kind,
            self.summary
        );
        for (key, value) in &self.details {
            out += &format!("{key}: {value}\n");
        }
        if !self.content.is_empty() {
            out += "\n```text\n";
            out += self.content.trim_end_matches('\n');
            out += "\n```\n";
        }
        out += "\n---\n";
        out
    }

    pub fn to_json(&self) -> RecoveryEntryJson<'_> {
        RecoveryEntryJson {
            recorded_at: self.stamp(),
            kind: self.kind,
            summary: &self.summary,
            details: self
                .details
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            content: &self.content,
        }
    }
}

/// Append an entry to the log. A failure to log never fails the caller;
/// it is reported on stderr instead.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(data_dir, &entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn append_entry(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    fs::create_dir_all(data_dir)?;
    let path = recovery_log_path(data_dir);
    let needs_header = fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.render().as_bytes())
}

/// Record lines that a load left out. Loading the same unchanged file
/// again does not add another entry.
pub fn log_dropped_lines(data_dir: &Path, source: &str, dropped: &[DroppedLine]) {
    if dropped.is_empty() {
        return;
    }
    let details = std::iter::once(("Source".to_string(), source.to_string()))
        .chain(
            dropped
                .iter()
                .map(|d| (format!("Line {}", d.line_no), d.error.to_string())),
        )
        .collect();
    let content = dropped
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    if latest_load_content(data_dir, source).as_deref() == Some(content.as_str()) {
        return;
    }

    log_recovery(
        data_dir,
        RecoveryEntry {
            recorded_at: Utc::now(),
            kind: RecoveryKind::Load,
            summary: format!("{} line(s) dropped", dropped.len()),
            details,
            content,
        },
    );
}

/// Content of the newest `load` entry for `source`, if any
fn latest_load_content(data_dir: &Path, source: &str) -> Option<String> {
    read_recovery_entries(data_dir, None)
        .into_iter()
        .find(|entry| {
            entry.kind == RecoveryKind::Load
                && entry
                    .details
                    .iter()
                    .any(|(key, value)| key == "Source" && value == source)
        })
        .map(|entry| entry.content)
}

/// Record the content of a save that failed.
pub fn log_failed_save(data_dir: &Path, target: &Path, error: &io::Error, content: &str) {
    log_recovery(
        data_dir,
        RecoveryEntry {
            recorded_at: Utc::now(),
            kind: RecoveryKind::Save,
            summary: "task file write failed".to_string(),
            details: vec![
                ("Target".to_string(), target.display().to_string()),
                ("Error".to_string(), error.to_string()),
            ],
            content: content.to_string(),
        },
    );
}

/// Read entries, most recent first. A missing log reads as empty.
pub fn read_recovery_entries(data_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let Ok(text) = fs::read_to_string(recovery_log_path(data_dir)) else {
        return Vec::new();
    };
    let entries = parse_entries(&text).into_iter().rev();
    match limit {
        Some(n) => entries.take(n).collect(),
        None => entries.collect(),
    }
}

/// Remove entries from the log, returning how many were removed.
pub fn prune_recovery(data_dir: &Path, scope: PruneScope) -> io::Result<usize> {
    let path = recovery_log_path(data_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let (kept, removed): (Vec<_>, Vec<_>) =
        parse_entries(&text)
            .into_iter()
            .partition(|entry| match scope {
                PruneScope::All => false,
                PruneScope::OlderThan(cutoff) => entry.recorded_at >= cutoff,
            });

    let rewritten = kept
        .iter()
        .fold(FILE_HEADER.to_string(), |acc, entry| acc + &entry.render());
    atomic_write(&path, rewritten.as_bytes())?;
    Ok(removed.len())
}

/// Entries are `## ` headings followed by `key: value` lines, an optional
/// fenced block of task lines, and a `---` terminator. Anything else is
/// ignored.
fn parse_entries(text: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let Some((recorded_at, kind, summary)) = line.strip_prefix("## ").and_then(parse_heading)
        else {
            continue;
        };

        let mut details = Vec::new();
        let mut content: Vec<&str> = Vec::new();
        let mut fenced = false;

        for line in lines.by_ref() {
            match (fenced, line) {
                (true, "```") => fenced = false,
                (true, _) => content.push(line),
                (false, "---") => break,
                (false, _) if line.starts_with("```") => fenced = true,
                (false, _) => {
                    if let Some((key, value)) = line.split_once(": ") {
                        details.push((key.to_string(), value.to_string()));
                    }
                }
            }
        }

        entries.push(RecoveryEntry {
            recorded_at,
            kind,
            summary,
            details,
            content: content.join("\n"),
        });
    }

    entries
}

/// `<rfc3339> — <kind>: <summary>`
fn parse_heading(heading: &str) -> Option<(DateTime<Utc>, RecoveryKind, String)> {
    let (stamp, rest) = heading.split_once(HEADING_DASH)?;
    let recorded_at = DateTime::parse_from_rfc3339(stamp).ok()?.with_timezone(&Utc);
    let (kind, summary) = rest.split_once(": ")?;
    Some((recorded_at, kind.parse().ok()?, summary.to_string()))
}
