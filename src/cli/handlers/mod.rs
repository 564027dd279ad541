mod init;
pub use init::cmd_init;

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::cli::commands::*;
use crate::cli::output::task_to_json;
use crate::cli::repl::run_interactive;
use crate::io::config_io;
use crate::io::recovery::{self, PruneScope};
use crate::io::storage::Storage;
use crate::model::config::CorruptLinePolicy;
use crate::ops::dispatch::Session;
use crate::ops::search::find_tasks;
use crate::parse::{Command, parse};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = PathBuf::from(&cli.data_dir);

    match cli.command {
        None => cmd_interactive(&data_dir, cli.strict),
        Some(Commands::Init(args)) => cmd_init(&data_dir, args),
        Some(Commands::Run(args)) => cmd_run(&data_dir, args, cli.strict, cli.json),
        Some(Commands::Recovery(args)) => cmd_recovery(&data_dir, args, cli.json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read config, load the task file, and report any lines that were skipped.
fn open_session(data_dir: &Path, strict: bool) -> Result<Session, Box<dyn std::error::Error>> {
    let config = config_io::read_config(data_dir)?;
    let mut storage = Storage::new(data_dir, &config.storage);
    if strict {
        storage = storage.with_policy(CorruptLinePolicy::Abort);
    }

    let loaded = storage.load()?;
    for dropped in &loaded.dropped {
        eprintln!(
            "warning: skipped line {} of {}: {}",
            dropped.line_no,
            storage.path().display(),
            dropped.error
        );
    }
    if !loaded.dropped.is_empty() {
        eprintln!(
            "warning: skipped lines were kept in {}",
            recovery::recovery_log_path(data_dir).display()
        );
    }

    Ok(Session::new(loaded.tasks, storage).with_find_numbering(config.display.find_numbering))
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_interactive(data_dir: &Path, strict: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(data_dir, strict)?;
    run_interactive(&mut session, io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}

fn cmd_run(
    data_dir: &Path,
    args: RunArgs,
    strict: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session(data_dir, strict)?;
    let command = parse(&args.words.join(" "))?;

    if json {
        let entries = match &command {
            Command::List => Some(session.tasks().numbered().collect::<Vec<_>>()),
            Command::Find(keyword) => Some(find_tasks(session.tasks(), keyword)?),
            _ => None,
        };
        if let Some(entries) = entries {
            let tasks: Vec<_> = entries
                .into_iter()
                .map(|(index, task)| task_to_json(index, task))
                .collect();
            println!("{}", serde_json::to_string_pretty(&tasks)?);
            return Ok(());
        }
    }

    let reply = session.execute(command)?;
    println!("{}", reply.message);
    match reply.save_error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn cmd_recovery(
    data_dir: &Path,
    args: RecoveryCmd,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        None => {
            let entries = recovery::read_recovery_entries(data_dir, Some(args.limit));
            if json {
                let values: Vec<_> = entries.iter().map(|e| e.to_json()).collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else if entries.is_empty() {
                println!("No recovery entries.");
            } else {
                for entry in &entries {
                    print!("{}", entry.render());
                }
            }
        }
        Some(RecoveryAction::Prune(prune)) => {
            let scope = if prune.all {
                PruneScope::All
            } else {
                PruneScope::OlderThan(Utc::now() - chrono::Duration::days(prune.days))
            };
            let removed = recovery::prune_recovery(data_dir, scope)?;
            println!("Pruned {} recovery entries", removed);
        }
        Some(RecoveryAction::Path) => {
            println!("{}", recovery::recovery_log_path(data_dir).display());
        }
    }
    Ok(())
}
