//! Interactive terminal client.
//!
//! Provides:
//! - The horse list with retry on load failure
//! - Horse details with parent navigation and share links
//! - The registration form with parent pickers and photo attachment
//! - A pannable, zoomable lineage diagram

mod app;
mod clipboard;
mod components;
mod event;
mod ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;

use app::App;
use color_eyre::eyre::Result;
use pedigree_core::{Config, Controller, StartupQuery, SupabaseStore};

/// Run the TUI application.
pub async fn run(config: Config, store: SupabaseStore, query: StartupQuery) -> Result<()> {
    tracing::info!(shared = query.shared, "Starting terminal client");
    let controller = Controller::new(store, &config, query);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, controller);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
