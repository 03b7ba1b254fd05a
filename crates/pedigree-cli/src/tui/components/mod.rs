//! Widgets for each view.

pub mod details;
pub mod form;
pub mod list;
pub mod status;
pub mod tree;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders},
};

/// Rounded panel used by every view.
pub fn panel(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}
