use anyhow::Result;
use std::io::{BufRead, Write};

use crate::task_list::TaskList;

pub const EMPTY_LISTING: &str = "No tasks yet. Add one with: tasklist add <TEXT>";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";
const RESET_PROMPT: &str = "Delete ALL tasks?";

/// Maps a 1-based task number to a position in `list`.
pub fn position_from_number(number: usize, len: usize) -> Option<usize> {
    (1..=len).contains(&number).then(|| number - 1)
}

pub fn write_listing(list: &TaskList, out: &mut impl Write) -> Result<()> {
    if list.is_empty() {
        writeln!(out, "{}", EMPTY_LISTING)?;
        return Ok(());
    }

    for (i, task) in list.tasks().iter().enumerate() {
        let checkbox = if task.completed { "[x]" } else { "[ ]" };
        writeln!(out, "{:>3}. {} {}", i + 1, checkbox, task.text)?;
    }

    let stats = list.stats();
    writeln!(out)?;
    writeln!(out, "Total: {}  Completed: {}", stats.total, stats.completed)?;
    Ok(())
}

pub fn add(list: &mut TaskList, words: &[String], out: &mut impl Write) -> Result<()> {
    if list.add_task(&words.join(" "))? {
        write_listing(list, out)?;
    } else {
        writeln!(out, "Task text is empty; nothing added.")?;
    }
    Ok(())
}

pub fn toggle(list: &mut TaskList, number: usize, out: &mut impl Write) -> Result<()> {
    let Some(position) = position_from_number(number, list.len()) else {
        writeln!(out, "No task number {}.", number)?;
        return Ok(());
    };

    list.toggle_task(position)?;
    write_listing(list, out)
}

/// Deletes task `number`, asking on `input` unless `skip_confirm` is set.
pub fn delete(
    list: &mut TaskList,
    number: usize,
    skip_confirm: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    let Some(position) = position_from_number(number, list.len()) else {
        writeln!(out, "No task number {}.", number)?;
        return Ok(());
    };

    let deleted = list.delete_task(position, |task| {
        skip_confirm || ask_task_confirmation(&task.text, input, out)
    })?;

    if deleted {
        write_listing(list, out)?;
    } else {
        writeln!(out, "Delete cancelled.")?;
    }
    Ok(())
}

pub fn clear_completed(list: &mut TaskList, out: &mut impl Write) -> Result<()> {
    let removed = list.clear_completed()?;
    writeln!(out, "Removed {} completed task(s).", removed)?;
    write_listing(list, out)
}

pub fn reset(
    list: &mut TaskList,
    skip_confirm: bool,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    if list.is_empty() {
        writeln!(out, "{}", EMPTY_LISTING)?;
        return Ok(());
    }
    if !skip_confirm && !ask_user_confirmation(RESET_PROMPT, input, out) {
        writeln!(out, "Reset cancelled.")?;
        return Ok(());
    }

    let removed = list.clear_all()?;
    writeln!(out, "Deleted {} task(s).", removed)?;
    Ok(())
}

fn ask_task_confirmation(task_text: &str, input: &mut impl BufRead, out: &mut impl Write) -> bool {
    let question = format!("{} \"{}\"", DELETE_PROMPT, task_text);
    ask_user_confirmation(&question, input, out)
}

// Read failures count as "no".
fn ask_user_confirmation(question: &str, input: &mut impl BufRead, out: &mut impl Write) -> bool {
    if write!(out, "{} (y/n): ", question)
        .and_then(|_| out.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use std::io::Cursor;

    fn list_with(texts: &[&str]) -> TaskList {
        let mut list = TaskList::load(Database::open_in_memory().unwrap());
        for text in texts {
            list.add_task(text).unwrap();
        }
        list
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn number_mapping_is_one_based() {
        assert_eq!(position_from_number(1, 2), Some(0));
        assert_eq!(position_from_number(2, 2), Some(1));
        assert_eq!(position_from_number(0, 2), None);
        assert_eq!(position_from_number(3, 2), None);
        assert_eq!(position_from_number(1, 0), None);
    }

    #[test]
    fn listing_of_empty_list_shows_placeholder_only() {
        let list = list_with(&[]);
        let mut out = Vec::new();
        write_listing(&list, &mut out).unwrap();
        assert_eq!(output(out), format!("{}\n", EMPTY_LISTING));
    }

    #[test]
    fn listing_shows_rows_and_stats() {
        let mut list = list_with(&["Buy milk", "Walk dog"]);
        list.toggle_task(0).unwrap();

        let mut out = Vec::new();
        write_listing(&list, &mut out).unwrap();
        let text = output(out);
        assert!(text.contains("  1. [x] Buy milk\n"));
        assert!(text.contains("  2. [ ] Walk dog\n"));
        assert!(text.ends_with("Total: 2  Completed: 1\n"));
    }

    #[test]
    fn add_joins_words() {
        let mut list = list_with(&[]);
        let mut out = Vec::new();
        add(&mut list, &["Buy".to_string(), "milk".to_string()], &mut out).unwrap();

        assert_eq!(list.tasks()[0].text, "Buy milk");
        assert!(output(out).contains("[ ] Buy milk"));
    }

    #[test]
    fn added_multiline_text_lists_as_one_row() {
        let mut list = list_with(&[]);
        let mut out = Vec::new();
        add(&mut list, &["Buy milk\n  2. [x] Fake row".to_string()], &mut out).unwrap();

        let text = output(out);
        let rows: Vec<&str> = text.lines().filter(|l| l.contains(". [")).collect();
        assert_eq!(rows, ["  1. [ ] Buy milk   2. [x] Fake row"]);
        assert!(text.ends_with("Total: 1  Completed: 0\n"));
    }

    #[test]
    fn add_blank_reports_nothing_added() {
        let mut list = list_with(&[]);
        let mut out = Vec::new();
        add(&mut list, &["  ".to_string()], &mut out).unwrap();

        assert!(list.is_empty());
        assert!(output(out).contains("nothing added"));
    }

    #[test]
    fn toggle_unknown_number_is_reported() {
        let mut list = list_with(&["only"]);
        let mut out = Vec::new();
        toggle(&mut list, 5, &mut out).unwrap();

        assert_eq!(output(out), "No task number 5.\n");
        assert!(!list.tasks()[0].completed);
    }

    #[test]
    fn delete_asks_and_accepts_yes() {
        let mut list = list_with(&["Buy milk", "Walk dog"]);
        let mut input = Cursor::new(b"y\n".to_vec());
        let mut out = Vec::new();
        delete(&mut list, 1, false, &mut input, &mut out).unwrap();

        let text = output(out);
        assert!(text.starts_with("Are you sure you want to delete this task? \"Buy milk\" (y/n): "));
        assert_eq!(list.len(), 1);
        assert_eq!(list.tasks()[0].text, "Walk dog");
    }

    #[test]
    fn delete_declined_on_no_or_eof() {
        let mut list = list_with(&["Buy milk"]);

        let mut out = Vec::new();
        delete(&mut list, 1, false, &mut Cursor::new(b"n\n".to_vec()), &mut out).unwrap();
        assert!(output(out).contains("Delete cancelled."));

        let mut out = Vec::new();
        delete(&mut list, 1, false, &mut Cursor::new(Vec::new()), &mut out).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn delete_with_yes_skips_prompt() {
        let mut list = list_with(&["Buy milk"]);
        let mut out = Vec::new();
        delete(&mut list, 1, true, &mut Cursor::new(Vec::new()), &mut out).unwrap();

        let text = output(out);
        assert!(!text.contains("(y/n)"));
        assert!(text.contains(EMPTY_LISTING));
        assert!(list.is_empty());
    }

    #[test]
    fn reset_asks_before_deleting_everything() {
        let mut list = list_with(&["a", "b"]);

        let mut out = Vec::new();
        reset(&mut list, false, &mut Cursor::new(b"no\n".to_vec()), &mut out).unwrap();
        assert!(output(out).ends_with("Reset cancelled.\n"));
        assert_eq!(list.len(), 2);

        let mut out = Vec::new();
        reset(&mut list, false, &mut Cursor::new(b"YES\n".to_vec()), &mut out).unwrap();
        assert_eq!(output(out), "Delete ALL tasks? (y/n): Deleted 2 task(s).\n");
        assert!(list.is_empty());
    }

    #[test]
    fn clear_completed_reports_count() {
        let mut list = list_with(&["a", "b"]);
        list.toggle_task(1).unwrap();

        let mut out = Vec::new();
        clear_completed(&mut list, &mut out).unwrap();
        assert!(output(out).starts_with("Removed 1 completed task(s).\n"));
        assert_eq!(list.len(), 1);
    }
}
