use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::logging::default_log_level;

const DB_FILE_NAME: &str = ".tasklist.db";
const APP_DIR_NAME: &str = ".tasklist";

/// Runtime settings resolved from flags, environment and defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let home_dir = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Self::resolve(
            cli.db.clone(),
            cli.log_dir.clone(),
            cli.log_level.clone(),
            Path::new(&home_dir),
        )
    }

    fn resolve(
        db_path: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
        home_dir: &Path,
    ) -> Self {
        Config {
            db_path: db_path.unwrap_or_else(|| home_dir.join(DB_FILE_NAME)),
            log_dir: log_dir.unwrap_or_else(|| home_dir.join(APP_DIR_NAME).join("logs")),
            log_level: log_level.unwrap_or_else(|| default_log_level().to_string()),
        }
    }
}
