//! External photo viewer integration.
//!
//! Zooming a photo hands the preview file to the user's image viewer while
//! the terminal session is suspended; the editor redraws when it returns.
//! The viewer only ever sees the preview copy, never the original file.

use anyhow::{bail, Context, Result};
use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use std::io;
use std::path::Path;
use std::process::Command;

pub(super) fn open_viewer(path: &Path) -> Result<()> {
    let program = std::env::var("SAUDIT_VIEWER")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| "xdg-open".to_string());
    let status = Command::new(&program)
        .arg(path)
        .status()
        .with_context(|| format!("run viewer {program}"))?;
    if !status.success() {
        bail!("viewer {program} exited with failure");
    }
    Ok(())
}

/// Run a blocking external program with the TUI suspended around it.
pub(super) fn run_external<F>(
    guard: &mut TerminalGuard,
    terminal: &mut ratatui::Terminal<CrosstermBackend<io::Stdout>>,
    f: F,
) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    guard.suspend();
    let result = f();
    guard.resume();
    terminal.clear().ok();
    result
}

/// Raw-mode/alternate-screen ownership for the editor session.
///
/// Dropping the guard restores the terminal, so an early return or panic
/// unwinding cannot leave the shell in raw mode.
pub(super) struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub(super) fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        execute!(io::stdout(), EnterAlternateScreen, Hide).context("enter alternate screen")?;
        Ok(Self { active: true })
    }

    pub(super) fn suspend(&mut self) {
        if self.active {
            disable_raw_mode().ok();
            execute!(io::stdout(), LeaveAlternateScreen, Show).ok();
            self.active = false;
        }
    }

    pub(super) fn resume(&mut self) {
        if !self.active {
            execute!(io::stdout(), EnterAlternateScreen, Hide).ok();
            enable_raw_mode().ok();
            self.active = true;
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        self.suspend();
    }
}
