//! Horse list component.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Row, Table, TableState, Wrap},
};

use pedigree_core::LoadState;

use super::panel;
use crate::tui::app::App;

/// Render the horse list, or why it is empty.
pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let horses = app.controller.horses();

    match app.controller.load_state() {
        LoadState::Failed { message } => render_failure(message, frame, area),
        LoadState::Pending => {
            let text = Paragraph::new("Loading horses...")
                .style(Style::default().fg(Color::DarkGray))
                .block(panel("Horses"));
            frame.render_widget(text, area);
        }
        LoadState::Ready if horses.is_empty() => {
            let text = Paragraph::new(vec![
                Line::from("No horses registered yet."),
                Line::from(Span::styled(
                    "Press [a] to register the first one.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(panel("Horses"));
            frame.render_widget(text, area);
        }
        LoadState::Ready => {
            let rows: Vec<Row> = horses
                .iter()
                .map(|horse| {
                    let (father, mother) = app.controller.parents(horse);
                    Row::new(vec![
                        horse.name.clone(),
                        horse.breed.clone(),
                        horse.age.map(|a| a.to_string()).unwrap_or_default(),
                        horse.sex.map(|s| s.to_string()).unwrap_or_default(),
                        father.label().to_string(),
                        mother.label().to_string(),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Percentage(22),
                Constraint::Percentage(18),
                Constraint::Length(5),
                Constraint::Length(8),
                Constraint::Percentage(20),
                Constraint::Percentage(20),
            ];
            let header = Row::new(vec!["Name", "Breed", "Age", "Sex", "Father", "Mother"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

            let table = Table::new(rows, widths)
                .header(header)
                .block(panel(&format!("Horses ({})", horses.len())))
                .row_highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("▶ ");

            let mut state = TableState::default().with_selected(Some(app.selected));
            frame.render_stateful_widget(table, area, &mut state);
        }
    }
}

/// Fetch error with the retry key; also shown for deep links that never loaded.
pub fn render_failure(message: &str, frame: &mut Frame, area: Rect) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            "Could not load horses",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press [r] to retry.",
            Style::default().fg(Color::Yellow),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(panel("Horses"));
    frame.render_widget(text, area);
}
