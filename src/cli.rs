use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "A small persistent task list", long_about = None)]
pub struct Cli {
    /// Path to the task database file
    #[arg(long, global = true, env = "TASKLIST_DB", value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, env = "TASKLIST_LOG", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotating log files
    #[arg(long, global = true, env = "TASKLIST_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Add a new task
    Add {
        #[arg(value_name = "TEXT", required = true)]
        text: Vec<String>,
    },
    /// Toggle a task between open and completed
    #[command(alias = "done")]
    Toggle {
        /// Task number as shown by `list`
        #[arg(value_name = "NUMBER")]
        number: usize,
    },
    /// Delete a task
    #[command(alias = "rm")]
    Delete {
        /// Task number as shown by `list`
        #[arg(value_name = "NUMBER")]
        number: usize,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// Remove all completed tasks
    ClearCompleted,
    /// Delete every task (WARNING: cannot be undone)
    Reset {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
    /// List all tasks
    #[command(alias = "ls")]
    List,
    /// Launch TUI interface
    Tui,
    /// Print shell completions
    Completions {
        #[arg(value_enum, value_name = "SHELL")]
        shell: Shell,
    },
}
