use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("taskline v", env!("CARGO_PKG_VERSION"), " - tasks, one line at a time"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON (list and find under `run`, and `recovery`)
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the task file and config.toml
    #[arg(short = 'C', long = "data-dir", global = true, default_value = "data")]
    pub data_dir: String,

    /// Refuse to load a task file that has unreadable lines
    #[arg(long, global = true)]
    pub strict: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory and a commented config.toml
    Init(InitArgs),
    /// Run a single command line, e.g. `tl run todo read book`
    Run(RunArgs),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct RunArgs {
    /// The command and its arguments; joined with spaces into one line
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show
    #[arg(long, default_value = "10")]
    pub limit: usize,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this many days
    #[arg(long, default_value_t = crate::io::recovery::PRUNE_AGE_DAYS)]
    pub days: i64,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
