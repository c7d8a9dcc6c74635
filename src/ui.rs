use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

use crate::commands::DELETE_PROMPT;
use crate::input::InputField;
use crate::models::Mode;
use crate::task_list::TaskList;

pub const EMPTY_PLACEHOLDER: &str = "No tasks yet. Add one above!";

pub struct App {
    list: TaskList,
    pub list_state: ListState,
    pub input: InputField,
    pub mode: Mode,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(list: TaskList) -> Self {
        let mut app = App {
            list,
            list_state: ListState::default(),
            input: InputField::new(),
            mode: Mode::Normal,
            status_message: None,
            should_quit: false,
        };
        app.clamp_selection();
        app
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    fn clamp_selection(&mut self) {
        let len = self.list.len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    pub fn next_item(&mut self) {
        let len = self.list.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous_item(&mut self) {
        let len = self.list.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    fn report(&mut self, action: &str, err: anyhow::Error) {
        error!("event=tui_action module=ui action={} status=error error={:#}", action, err);
        self.status_message = Some(format!("Could not {}: {:#}", action, err));
    }

    pub fn submit_input(&mut self) {
        match self.list.add_task(self.input.value()) {
            Ok(true) => {
                self.input.clear();
                self.list_state.select(Some(self.list.len() - 1));
            }
            Ok(false) => {}
            Err(e) => self.report("add task", e),
        }
    }

    pub fn toggle_selected(&mut self) {
        let Some(i) = self.list_state.selected() else {
            return;
        };
        if let Err(e) = self.list.toggle_task(i) {
            self.report("toggle task", e);
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(i) = self.list_state.selected().filter(|&i| i < self.list.len()) {
            self.mode = Mode::ConfirmDelete(i);
        }
    }

    /// Answers an open delete confirmation.
    pub fn resolve_delete(&mut self, accepted: bool) {
        let Mode::ConfirmDelete(position) = self.mode else {
            return;
        };
        self.mode = Mode::Normal;

        if let Err(e) = self.list.delete_task(position, |_| accepted) {
            self.report("delete task", e);
        }
        self.clamp_selection();
    }

    pub fn clear_completed(&mut self) {
        match self.list.clear_completed() {
            Ok(0) => {}
            Ok(removed) => {
                self.status_message = Some(format!("Removed {} completed task(s)", removed));
            }
            Err(e) => self.report("clear completed tasks", e),
        }
        self.clamp_selection();
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        self.status_message = None;

        match self.mode {
            Mode::ConfirmDelete(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => self.resolve_delete(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => self.resolve_delete(false),
                _ => {}
            },
            Mode::Editing => self.handle_editing_key(key),
            Mode::Normal => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                KeyCode::Char('a') | KeyCode::Char('i') => self.mode = Mode::Editing,
                KeyCode::Down | KeyCode::Char('j') => self.next_item(),
                KeyCode::Up | KeyCode::Char('k') => self.previous_item(),
                KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Enter => self.toggle_selected(),
                KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
                KeyCode::Char('c') => self.clear_completed(),
                _ => {}
            },
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => self.input.delete_char(),
            KeyCode::Delete => self.input.delete_forward(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_to_start(),
            KeyCode::End => self.input.move_to_end(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.insert_char(c)
            }
            _ => {}
        }
    }
}

pub fn run_tui(list: TaskList) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("event=tui_start module=ui");
    let mut app = App::new(list);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("event=tui_exit module=ui status=error error={}", err);
        return Err(err.into());
    }
    info!("event=tui_exit module=ui status=ok count={}", app.list().len());
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_input(f, app, chunks[0]);
    render_tasks(f, app, chunks[1]);
    render_stats(f, app, chunks[2]);
    render_help(f, app, chunks[3]);

    if let Mode::ConfirmDelete(position) = app.mode {
        render_confirm_delete(f, app, position);
    }
}

fn render_input(f: &mut Frame, app: &App, area: Rect) {
    let editing = app.mode == Mode::Editing;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title("New Task")
        .border_style(border_style);

    let inner_width = area.width.saturating_sub(2);
    let (shown, cursor_col) = app.input.visible(inner_width);

    let content = if app.input.is_empty() && !editing {
        Line::from(Span::styled(
            "Press 'a' to add a task",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(shown)
    };

    f.render_widget(Paragraph::new(content).block(block), area);

    if editing && inner_width > 0 {
        f.set_cursor_position((area.x + 1 + cursor_col, area.y + 1));
    }
}

fn render_tasks(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Tasks");

    if app.list.is_empty() {
        let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
            .block(block)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = app
        .list
        .tasks()
        .iter()
        .map(|task| {
            let (checkbox, text_style) = if task.completed {
                (
                    "[x] ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::CROSSED_OUT),
                )
            } else {
                ("[ ] ", Style::default().fg(Color::White))
            };

            ListItem::new(Line::from(vec![
                Span::styled(checkbox, Style::default().fg(Color::Cyan)),
                Span::styled(task.text.clone(), text_style),
            ]))
        })
        .collect();

    let tasks_list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    f.render_stateful_widget(tasks_list, area, &mut app.list_state);
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats = app.list.stats();
    let line = Line::from(vec![
        Span::styled(format!("Total: {}", stats.total), Style::default().fg(Color::White)),
        Span::raw("    "),
        Span::styled(
            format!("Completed: {}", stats.completed),
            Style::default().fg(Color::Green),
        ),
    ]);

    let paragraph = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title("Stats"));
    f.render_widget(paragraph, area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(message) = &app.status_message {
        Line::from(Span::styled(message.clone(), Style::default().fg(Color::Red)))
    } else {
        let help = match app.mode {
            Mode::Normal => "a: Add | ↑/↓: Move | Space: Toggle | d: Delete | c: Clear completed | q: Quit",
            Mode::Editing => "Enter: Add task | Esc: Stop editing",
            Mode::ConfirmDelete(_) => "y: Delete | n: Cancel",
        };
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray)))
    };

    f.render_widget(Paragraph::new(line), area);
}

fn render_confirm_delete(f: &mut Frame, app: &App, position: usize) {
    let task_text = app
        .list
        .get(position)
        .map(|task| task.text.as_str())
        .unwrap_or_default();

    let popup_area = centered_rect(60, 40, f.area());
    let block = Block::default()
        .title("Delete Task")
        .borders(Borders::ALL)
        .style(Style::default().bg(Color::DarkGray));
    let content = Paragraph::new(format!(
        "{}\n\n\"{}\"\n\ny: Delete   n: Cancel",
        DELETE_PROMPT, task_text
    ))
    .block(block)
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: false })
    .style(Style::default().fg(Color::White));

    f.render_widget(Clear, popup_area);
    f.render_widget(content, popup_area);
}

// Helper function to create centered rectangles for popups
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
