//! Integration tests for the `tl` CLI.
//!
//! Each test works in a temp directory, runs `tl` as a subprocess, and
//! checks stdout/stderr and the files left behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use pretty_assertions::assert_eq;

/// Path to the built `tl` binary.
fn tl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tl"))
}

/// Run `tl` in `dir`, returning (stdout, stderr, success).
fn run_tl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tl_bin())
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run tl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tl` expecting success, return stdout.
fn run_tl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tl(dir, args);
    if !success {
        panic!(
            "tl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run the interactive session with `input` on stdin.
fn run_interactive(dir: &Path, args: &[&str], input: &str) -> (String, String, bool) {
    let mut child = Command::new(tl_bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run tl");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn task_file(dir: &Path) -> String {
    fs::read_to_string(dir.join("data/tasks.txt")).unwrap()
}

// ---------------------------------------------------------------------------
// Interactive session
// ---------------------------------------------------------------------------

#[test]
fn test_interactive_session_persists() {
    let tmp = tempfile::TempDir::new().unwrap();

    let (out, _, success) = run_interactive(
        tmp.path(),
        &[],
        "todo read book\ndeadline return book /by 2019-12-02 1800\nmark 2\nlist\nbye\n",
    );
    assert!(success);
    assert!(out.starts_with("Hello! I'm Taskline\n"));
    assert!(out.contains(
        "Here are the tasks in your list:\n 1.[T][ ] read book\n 2.[D][X] return book (by: Dec 02 2019, 6:00PM)\n"
    ));
    assert!(out.ends_with("Bye. Hope to see you again soon!\n\n"));

    assert_eq!(
        task_file(tmp.path()),
        "T | 0 | 1 | read book\nD | 1 | 1 | return book | 2019-12-02 1800\n"
    );

    // A second session sees the saved tasks
    let (out, _, _) = run_interactive(tmp.path(), &[], "list\n");
    assert!(out.contains(" 2.[D][X] return book"));
}

#[test]
fn test_interactive_errors_are_reported_inline() {
    let tmp = tempfile::TempDir::new().unwrap();

    let (out, _, success) = run_interactive(
        tmp.path(),
        &[],
        "event trip /from 2019-12-01 0900 /to 2019-11-30 1000\nlist\nbye\n",
    );
    assert!(success);
    assert!(out.contains("Error! End time must be after start time\n"));
    assert!(out.contains("Your task list is empty!"));
}

#[test]
fn test_interactive_skips_corrupt_lines() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("tasks.txt"),
        "T | 0 | 1 | first\n???\nT | 1 | second\n",
    )
    .unwrap();

    let (out, err, success) = run_interactive(tmp.path(), &[], "list\nbye\n");
    assert!(success);
    assert!(err.contains("warning: skipped line 2 of "));
    assert!(out.contains(" 1.[T][ ] first\n 2.[T][X] second\n"));

    let log = fs::read_to_string(data.join(".recovery.log")).unwrap();
    assert!(log.contains("???"));

    // Starting again on the same file does not grow the log
    run_interactive(tmp.path(), &[], "bye\n");
    run_tl_ok(tmp.path(), &["run", "list"]);
    assert_eq!(fs::read_to_string(data.join(".recovery.log")).unwrap(), log);
}

#[test]
fn test_strict_refuses_corrupt_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("tasks.txt"), "T | 0 | 1 | first\n???\n").unwrap();

    let (_, err, success) = run_tl(tmp.path(), &["--strict", "run", "list"]);
    assert!(!success);
    assert!(err.contains("error: 1 corrupt line(s) in "));
    // The file is left untouched
    assert_eq!(
        fs::read_to_string(data.join("tasks.txt")).unwrap(),
        "T | 0 | 1 | first\n???\n"
    );
}

// ---------------------------------------------------------------------------
// One-shot commands
// ---------------------------------------------------------------------------

#[test]
fn test_run_add_and_list() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_tl_ok(tmp.path(), &["run", "todo", "read", "book"]);
    assert_eq!(
        out,
        "Got it. I've added this task:\n  [T][ ] read book\nNow you have 1 tasks in the list.\n"
    );

    let out = run_tl_ok(tmp.path(), &["run", "list"]);
    assert_eq!(out, "Here are the tasks in your list:\n 1.[T][ ] read book\n");
}

#[test]
fn test_run_delete_out_of_range_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tl_ok(tmp.path(), &["run", "todo", "a"]);
    run_tl_ok(tmp.path(), &["run", "todo", "b"]);

    let (_, err, success) = run_tl(tmp.path(), &["run", "delete", "5"]);
    assert!(!success);
    assert_eq!(
        err,
        "error: Invalid task number! Please choose between 1 and 2\n"
    );
    assert_eq!(task_file(tmp.path()), "T | 0 | 1 | a\nT | 0 | 1 | b\n");
}

#[test]
fn test_run_rejects_multi_line_description() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tl_ok(tmp.path(), &["run", "todo", "keep"]);

    let (_, err, success) = run_tl(tmp.path(), &["run", "todo", "first line\nsecond line"]);
    assert!(!success);
    assert!(err.starts_with("error: The description of a task cannot contain line breaks"));

    // The file still holds exactly the one task and reloads cleanly
    assert_eq!(task_file(tmp.path()), "T | 0 | 1 | keep\n");
    let (out, err, _) = run_tl(tmp.path(), &["run", "list"]);
    assert_eq!(out, "Here are the tasks in your list:\n 1.[T][ ] keep\n");
    assert_eq!(err, "");
}

#[test]
fn test_run_unknown_command_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, err, success) = run_tl(tmp.path(), &["run", "dance"]);
    assert!(!success);
    assert_eq!(err, "error: unknown command: dance\n");
}

#[test]
fn test_run_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tl_ok(tmp.path(), &["run", "todo", "buy", "milk"]);
    run_tl_ok(
        tmp.path(),
        &["run", "event", "trip", "/from", "2019-12-01", "0900", "/to", "2019-12-03", "1000"],
    );
    run_tl_ok(tmp.path(), &["run", "priority", "2", "high"]);

    let out = run_tl_ok(tmp.path(), &["--json", "run", "list"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[1]["index"], 2);
    assert_eq!(arr[1]["kind"], "event");
    assert_eq!(arr[1]["priority"], "high");
    assert_eq!(arr[1]["start"], "2019-12-01 0900");
}

#[test]
fn test_run_find_json_keeps_list_numbers() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tl_ok(tmp.path(), &["run", "todo", "buy", "milk"]);
    run_tl_ok(tmp.path(), &["run", "todo", "read", "book"]);

    let out = run_tl_ok(tmp.path(), &["--json", "run", "find", "BOOK"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["index"], 2);
    assert_eq!(arr[0]["description"], "read book");
}

#[test]
fn test_custom_data_dir_and_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("elsewhere");
    fs::create_dir_all(&data).unwrap();
    fs::write(
        data.join("config.toml"),
        "[storage]\nfile = \"mine.txt\"\n\n[display]\nfind_numbering = \"sequential\"\n",
    )
    .unwrap();

    let dir_arg = data.to_string_lossy().to_string();
    run_tl_ok(tmp.path(), &["-C", &dir_arg, "run", "todo", "buy", "milk"]);
    run_tl_ok(tmp.path(), &["-C", &dir_arg, "run", "todo", "read", "book"]);
    assert_eq!(
        fs::read_to_string(data.join("mine.txt")).unwrap(),
        "T | 0 | 1 | buy milk\nT | 0 | 1 | read book\n"
    );

    let out = run_tl_ok(tmp.path(), &["-C", &dir_arg, "run", "find", "book"]);
    assert_eq!(out, "Here are the matching tasks in your list:\n 1.[T][ ] read book\n");
}

// ---------------------------------------------------------------------------
// init / recovery
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_config_and_task_file() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tl_ok(tmp.path(), &["init"]);
    assert!(out.starts_with("Initialized taskline in data"));
    assert!(tmp.path().join("data/config.toml").exists());
    assert_eq!(task_file(tmp.path()), "");

    let (_, err, success) = run_tl(tmp.path(), &["init"]);
    assert!(!success);
    assert!(err.contains("already exists"));

    run_tl_ok(tmp.path(), &["init", "--force"]);
}

#[test]
fn test_init_keeps_existing_tasks() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tl_ok(tmp.path(), &["run", "todo", "keep"]);
    run_tl_ok(tmp.path(), &["init"]);
    assert_eq!(task_file(tmp.path()), "T | 0 | 1 | keep\n");
}

#[test]
fn test_recovery_list_and_prune() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("tasks.txt"), "garbage line\n").unwrap();

    let out = run_tl_ok(tmp.path(), &["recovery"]);
    assert_eq!(out, "No recovery entries.\n");

    // Loading drops the line into the recovery log
    run_tl_ok(tmp.path(), &["run", "list"]);

    let out = run_tl_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("load: 1 line(s) dropped"));
    assert!(out.contains("garbage line"));

    let out = run_tl_ok(tmp.path(), &["--json", "recovery"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed[0]["kind"], "load");

    let out = run_tl_ok(tmp.path(), &["recovery", "prune", "--all"]);
    assert_eq!(out, "Pruned 1 recovery entries\n");
    let out = run_tl_ok(tmp.path(), &["recovery"]);
    assert_eq!(out, "No recovery entries.\n");
}

#[test]
fn test_recovery_path() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tl_ok(tmp.path(), &["recovery", "path"]);
    assert_eq!(out.trim_end(), Path::new("data").join(".recovery.log").display().to_string());
}
