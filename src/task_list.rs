use anyhow::Result;
use log::info;

use crate::database::Database;
use crate::models::{Task, TaskStats};

/// In-memory task sequence plus the store it mirrors.
///
/// Every mutation builds the next sequence, persists it and only then
/// replaces `tasks`, so a failed save leaves memory matching storage.
pub struct TaskList {
    db: Database,
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn load(db: Database) -> Self {
        let tasks = db.load_tasks();
        info!("event=tasks_loaded module=task_list count={}", tasks.len());
        TaskList { db, tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Task> {
        self.tasks.get(position)
    }

    pub fn stats(&self) -> TaskStats {
        TaskStats::from_tasks(&self.tasks)
    }

    /// Appends a task; whitespace-only text is ignored and returns `false`.
    ///
    /// The stored text is always a single line, see [`normalize_text`].
    pub fn add_task(&mut self, raw_text: &str) -> Result<bool> {
        let text = normalize_text(raw_text);
        if text.is_empty() {
            return Ok(false);
        }

        let mut next = self.tasks.clone();
        next.push(Task::new(&text));
        self.commit(next)?;
        info!("event=task_add module=task_list position={}", self.tasks.len() - 1);
        Ok(true)
    }

    /// Flips completion at `position`; out-of-range positions are a no-op.
    pub fn toggle_task(&mut self, position: usize) -> Result<bool> {
        if position >= self.tasks.len() {
            return Ok(false);
        }

        let mut next = self.tasks.clone();
        next[position].completed = !next[position].completed;
        let completed = next[position].completed;
        self.commit(next)?;
        info!(
            "event=task_toggle module=task_list position={} completed={}",
            position, completed
        );
        Ok(true)
    }

    /// Removes the task at `position` if `confirm` accepts it.
    ///
    /// `confirm` is not called for out-of-range positions.
    pub fn delete_task<F>(&mut self, position: usize, confirm: F) -> Result<bool>
    where
        F: FnOnce(&Task) -> bool,
    {
        let Some(task) = self.tasks.get(position) else {
            return Ok(false);
        };
        if !confirm(task) {
            info!("event=task_delete module=task_list status=declined position={}", position);
            return Ok(false);
        }

        let mut next = self.tasks.clone();
        next.remove(position);
        self.commit(next)?;
        info!("event=task_delete module=task_list status=ok position={}", position);
        Ok(true)
    }

    /// Drops every completed task in one save. Returns how many were removed.
    pub fn clear_completed(&mut self) -> Result<usize> {
        let next: Vec<Task> = self.tasks.iter().filter(|t| !t.completed).cloned().collect();
        let removed = self.tasks.len() - next.len();
        if removed == 0 {
            return Ok(0);
        }

        self.commit(next)?;
        info!("event=tasks_clear_completed module=task_list removed={}", removed);
        Ok(removed)
    }

    /// Empties the list and removes the persisted slot. Returns how many
    /// tasks were dropped.
    pub fn clear_all(&mut self) -> Result<usize> {
        self.db.clear_tasks()?;
        let removed = self.tasks.len();
        self.tasks.clear();
        info!("event=tasks_reset module=task_list removed={}", removed);
        Ok(removed)
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<()> {
        self.db.save_tasks(&next)?;
        self.tasks = next;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn database(&self) -> &Database {
        &self.db
    }
}

/// Folds each run of control characters (newlines, tabs, escapes) into one
/// space and trims the result. Rows in both views are one line per task.
pub fn normalize_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut in_break = false;
    for c in raw.chars() {
        if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}') {
            if !in_break {
                text.push(' ');
                in_break = true;
            }
        } else {
            text.push(c);
            in_break = false;
        }
    }
    text.trim().to_string()
}
