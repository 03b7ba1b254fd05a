//! Horse details component.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use pedigree_core::{Detail, Horse, HorseId, LoadState, ParentLink};

use super::{list, panel};
use crate::tui::app::App;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    match app.controller.detail() {
        Some(Detail::Found(horse)) => render_horse(app, horse, frame, area),
        Some(Detail::NotFound(id)) => {
            render_missing(app.controller.load_state(), id, frame, area)
        }
        None => {}
    }
}

fn render_horse(app: &App, horse: &Horse, frame: &mut Frame, area: Rect) {
    let block = panel(&horse.name);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [photo_area, info_area] =
        Layout::horizontal([Constraint::Length(26), Constraint::Min(20)]).areas(inner);

    let photo = match &horse.photo_url {
        Some(url) => Paragraph::new(vec![
            Line::from("Photo on file"),
            Line::from(Span::styled(url.clone(), Style::default().fg(Color::DarkGray))),
        ]),
        None => Paragraph::new(vec![
            Line::from(""),
            Line::from("No photo").centered(),
        ])
        .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(
        photo.wrap(Wrap { trim: true }).block(panel("Photo")),
        photo_area.inner(ratatui::layout::Margin::new(1, 0)),
    );

    let (father, mother) = app.controller.parents(horse);
    let unknown = || "Unknown".to_string();
    let lines = vec![
        field_line("Breed", horse.breed.clone()),
        field_line("Age", horse.age.map(|a| a.to_string()).unwrap_or_else(unknown)),
        field_line("Sex", horse.sex.map(|s| s.to_string()).unwrap_or_else(unknown)),
        Line::from(""),
        parent_line("Father", 'f', &father),
        parent_line("Mother", 'm', &mother),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        info_area.inner(ratatui::layout::Margin::new(1, 1)),
    );
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<8}", label), Style::default().fg(Color::Cyan)),
        Span::raw(value),
    ])
}

/// Parent row; registered parents get a key hint for opening them.
fn parent_line(label: &str, key: char, link: &ParentLink<'_>) -> Line<'static> {
    let mut line = field_line(label, link.label().to_string());
    if let ParentLink::Known(_) = link {
        line.push_span(Span::styled(
            format!("  [{}] open", key),
            Style::default().fg(Color::DarkGray),
        ));
    }
    line
}

/// Panel for an id that did not resolve. A failed load is reported as such,
/// with its retry key, rather than as a missing horse.
fn render_missing(state: &LoadState, id: &HorseId, frame: &mut Frame, area: Rect) {
    let lines = match state {
        LoadState::Failed { message } => return list::render_failure(message, frame, area),
        LoadState::Pending => vec![Line::from("Loading horses...")],
        LoadState::Ready => vec![
            Line::from(Span::styled(
                "Horse not found",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(format!("No horse with id '{}' is registered.", id)),
            Line::from(Span::styled(
                "Press [Esc] to go back to the list.",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(panel("Details")),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn draw_missing(state: &LoadState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal
            .draw(|frame| render_missing(state, &HorseId::new("42"), frame, frame.area()))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_failed_load_shows_error_and_retry() {
        let text = draw_missing(&LoadState::Failed {
            message: "Network error: connection refused".to_string(),
        });

        assert!(text.contains("Could not load horses"));
        assert!(text.contains("Network error: connection refused"));
        assert!(text.contains("Press [r] to retry."));
        assert!(!text.contains("Horse not found"));
    }

    #[test]
    fn test_loaded_collection_without_id_shows_not_found() {
        let text = draw_missing(&LoadState::Ready);

        assert!(text.contains("Horse not found"));
        assert!(text.contains("No horse with id '42' is registered."));
        assert!(!text.contains("retry"));
    }

    #[test]
    fn test_pending_load_shows_loading() {
        assert!(draw_missing(&LoadState::Pending).contains("Loading horses..."));
    }
}
