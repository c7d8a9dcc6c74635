mod cli;
mod commands;
mod config;
mod database;
mod input;
mod logging;
mod models;
mod task_list;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use config::Config;
use database::Database;
use std::io;
use task_list::TaskList;
use ui::run_tui;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "tasklist", &mut io::stdout());
        return Ok(());
    }

    let config = Config::from_cli(&cli);
    let _logger = match logging::init_logging(&config.log_level, &config.log_dir) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: logging disabled: {:#}", e);
            None
        }
    };

    let db = Database::open(&config.db_path)?;
    let mut list = TaskList::load(db);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Some(Commands::Add { text }) => {
            commands::add(&mut list, &text, &mut stdout)?;
        }
        Some(Commands::Toggle { number }) => {
            commands::toggle(&mut list, number, &mut stdout)?;
        }
        Some(Commands::Delete { number, yes }) => {
            let mut stdin = io::stdin().lock();
            commands::delete(&mut list, number, yes, &mut stdin, &mut stdout)?;
        }
        Some(Commands::ClearCompleted) => {
            commands::clear_completed(&mut list, &mut stdout)?;
        }
        Some(Commands::Reset { yes }) => {
            let mut stdin = io::stdin().lock();
            commands::reset(&mut list, yes, &mut stdin, &mut stdout)?;
        }
        Some(Commands::List) => {
            commands::write_listing(&list, &mut stdout)?;
        }
        Some(Commands::Completions { .. }) => {}
        Some(Commands::Tui) | None => {
            // Default behavior: launch TUI
            drop(stdout);
            run_tui(list)?;
        }
    }

    Ok(())
}
