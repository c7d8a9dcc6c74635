use anyhow::{Context, Result};
use log::{debug, info, warn};
use rusqlite::{params, Connection};
use std::fs;
use std::path::Path;

use crate::models::Task;

/// Key of the slot that holds the serialized task list.
pub const TASKS_KEY: &str = "tasks";

/// Single-table key-value store backing the task list.
///
/// The whole task list lives in one row as a JSON array and is rewritten
/// wholesale on every save.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("failed to open task database at {}", path.display()))?;
        info!("event=db_open module=database status=ok mode=file path={}", path.display());
        Self::bootstrap(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        debug!("event=db_open module=database status=ok mode=memory");
        Self::bootstrap(conn)
    }

    fn bootstrap(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )
        .context("failed to create kv_store table")?;

        Ok(Database { conn })
    }

    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        match self.conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            [key],
            |row| row.get::<_, String>(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read key '{}'", key)),
        }
    }

    pub fn set_value(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, updated_at],
            )
            .with_context(|| format!("failed to write key '{}'", key))?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub fn delete_value(&self, key: &str) -> Result<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1", [key])
            .with_context(|| format!("failed to delete key '{}'", key))?;
        Ok(rows_affected > 0)
    }

    /// Reads the persisted task list.
    ///
    /// A missing slot, a read failure and an unparsable blob all yield an
    /// empty list; the cause is only logged.
    pub fn load_tasks(&self) -> Vec<Task> {
        let blob = match self.get_value(TASKS_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!("event=tasks_load module=database status=empty reason=missing");
                return Vec::new();
            }
            Err(e) => {
                warn!("event=tasks_load module=database status=error error={:#}", e);
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Vec<serde_json::Value>>(&blob) {
            Ok(records) => records,
            Err(e) => {
                warn!("event=tasks_load module=database status=error reason=parse error={}", e);
                return Vec::new();
            }
        };

        // A single unreadable record is dropped on its own so it cannot take
        // the rest of the list with it.
        let total = records.len();
        let tasks: Vec<Task> = records
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| match serde_json::from_value::<Task>(record) {
                Ok(task) => Some(task),
                Err(e) => {
                    warn!(
                        "event=tasks_load module=database status=skipped position={} error={}",
                        i, e
                    );
                    None
                }
            })
            .collect();

        debug!(
            "event=tasks_load module=database status=ok count={} skipped={}",
            tasks.len(),
            total - tasks.len()
        );
        tasks
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        let blob = serde_json::to_string(tasks).context("failed to serialize tasks")?;
        self.set_value(TASKS_KEY, &blob)?;
        debug!("event=tasks_save module=database status=ok count={}", tasks.len());
        Ok(())
    }

    pub fn clear_tasks(&self) -> Result<()> {
        if self.delete_value(TASKS_KEY)? {
            info!("event=tasks_clear module=database status=ok");
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}
