//! Interactive checklist editor.
//!
//! The editor is the single mutator: every key event dispatches at most one
//! engine operation, then validation recomputes over the whole tree before
//! the next draw. Tabs follow the walk order of the paper form.

mod app;
mod external;
mod ui;
mod view;

use crate::catalog::Catalog;
use anyhow::{bail, Result};
use std::io::{self, IsTerminal};
use std::path::Path;

const EVENT_POLL_MS: u64 = 200;

/// Editor tabs.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Tab {
    Header,
    Sections,
    FollowUp,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Header, Tab::Sections, Tab::FollowUp];

    fn index(self) -> usize {
        match self {
            Tab::Header => 0,
            Tab::Sections => 1,
            Tab::FollowUp => 2,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tab::Header => "Header",
            Tab::Sections => "Assessment",
            Tab::FollowUp => "Follow-up",
        }
    }
}

/// Run the editor for one session.
pub fn run(catalog: &Catalog, out: &Path) -> Result<()> {
    if !io::stdout().is_terminal() || !io::stdin().is_terminal() {
        bail!("fill needs an interactive terminal; use `saudit catalog` for non-interactive output");
    }
    ui::run_tui(catalog, out)
}
