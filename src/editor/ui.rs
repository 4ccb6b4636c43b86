//! TUI event loop for the checklist editor.

use super::app::App;
use super::external::{open_viewer, run_external, TerminalGuard};
use super::EVENT_POLL_MS;
use crate::catalog::Catalog;
use crate::form::Status;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use std::io;
use std::path::Path;
use std::time::Duration;

pub(super) fn run_tui(catalog: &Catalog, out: &Path) -> Result<()> {
    let mut app = App::new(catalog, out)?;

    let mut guard = TerminalGuard::enter()?;
    let mut terminal = {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        ratatui::Terminal::new(backend).context("init terminal")?
    };

    loop {
        terminal
            .draw(|frame| app.draw(frame))
            .context("draw editor ui")?;

        if !event::poll(Duration::from_millis(EVENT_POLL_MS)).context("poll event")? {
            continue;
        }
        let Event::Key(key) = event::read().context("read event")? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // The footer input line captures everything while it is open.
        if app.input.is_some() {
            handle_input_key(&mut app, key);
            continue;
        }

        let Some(action) = action_from_key(key) else {
            continue;
        };
        match action {
            Action::Quit => {
                if app.show_help {
                    app.toggle_help();
                } else {
                    break;
                }
            }
            Action::NextTab => app.next_tab(),
            Action::PrevTab => app.prev_tab(),
            Action::Up => app.move_selection(-1),
            Action::Down => app.move_selection(1),
            Action::PageUp => app.move_selection(-10),
            Action::PageDown => app.move_selection(10),
            Action::StatusOk => app.set_status_selected(Some(Status::Ok)),
            Action::StatusNotOk => app.set_status_selected(Some(Status::NotOk)),
            Action::StatusNa => app.set_status_selected(Some(Status::Na)),
            Action::StatusClear => app.set_status_selected(None),
            Action::Edit => app.begin_edit(),
            Action::AttachPhoto => app.begin_photo_edit(),
            Action::ClearPhoto => app.clear_photo_selected(),
            Action::ViewPhoto => {
                match app
                    .selected_preview()
                    .map(|handle| handle.path().to_path_buf())
                {
                    Some(path) => {
                        if let Err(err) =
                            run_external(&mut guard, &mut terminal, || open_viewer(&path))
                        {
                            app.set_message(format!("view photo failed: {err}"));
                        }
                    }
                    None => app.set_message("no photo attached".to_string()),
                }
            }
            Action::AddInstance => app.add_instance_selected(),
            Action::RemoveInstance => app.remove_instance_selected(),
            Action::Submit => app.submit(),
            Action::ToggleHelp => app.toggle_help(),
        }
    }

    drop(guard);
    terminal.show_cursor().ok();
    Ok(())
}

fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Char(c) => app.input_push(c),
        _ => {}
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Action {
    Quit,
    NextTab,
    PrevTab,
    Up,
    Down,
    PageUp,
    PageDown,
    StatusOk,
    StatusNotOk,
    StatusNa,
    StatusClear,
    Edit,
    AttachPhoto,
    ViewPhoto,
    ClearPhoto,
    AddInstance,
    RemoveInstance,
    Submit,
    ToggleHelp,
}

fn action_from_key(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Tab => Some(Action::NextTab),
        KeyCode::BackTab => Some(Action::PrevTab),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Char('o') => Some(Action::StatusOk),
        KeyCode::Char('x') => Some(Action::StatusNotOk),
        KeyCode::Char('n') => Some(Action::StatusNa),
        KeyCode::Char('u') => Some(Action::StatusClear),
        KeyCode::Enter | KeyCode::Char('e') => Some(Action::Edit),
        KeyCode::Char('p') => Some(Action::AttachPhoto),
        KeyCode::Char('v') => Some(Action::ViewPhoto),
        KeyCode::Char('d') => Some(Action::ClearPhoto),
        KeyCode::Char('+') => Some(Action::AddInstance),
        KeyCode::Char('-') => Some(Action::RemoveInstance),
        KeyCode::Char('S') => Some(Action::Submit),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        _ => None,
    }
}
