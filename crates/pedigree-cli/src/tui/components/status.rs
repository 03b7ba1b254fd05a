//! Header and status bar.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use pedigree_core::View;

use crate::tui::app::App;

/// Render the header: app name, current view and the shared badge.
pub fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " Pedigree ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("› ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.controller.view().title()),
    ];
    if app.controller.is_shared() {
        spans.push(Span::styled(
            "  [shared view]",
            Style::default().fg(Color::Magenta),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(header, area);
}

/// Render the notice line and key hints.
pub fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let message = if let Some(busy) = app.busy {
        Line::from(Span::styled(busy, Style::default().fg(Color::Yellow)))
    } else if let Some(notice) = app.controller.notice() {
        let mut spans = vec![Span::styled(
            notice.message.clone(),
            Style::default().fg(Color::Green),
        )];
        if let Some(link) = &notice.link {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                link.clone(),
                Style::default().add_modifier(Modifier::UNDERLINED),
            ));
        }
        Line::from(spans)
    } else {
        Line::from("")
    };

    let hints = Line::from(Span::styled(
        key_hints(app.controller.view(), app.controller.can_mutate()),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(vec![message, hints]), area);
}

fn key_hints(view: &View, can_mutate: bool) -> &'static str {
    match view {
        View::List if can_mutate => "[j/k] Move  [Enter] Open  [a] Add  [r] Reload  [q] Quit",
        View::List => "[j/k] Move  [Enter] Open  [r] Reload  [q] Quit",
        View::Details(_) => {
            "[t] Lineage  [s] Share  [f/m] Parent  [r] Retry  [Esc] Back  [q] Quit"
        }
        View::Add => "[Tab] Next  [←/→] Choose  [Enter] Load photo  [Ctrl+S] Save  [Esc] Cancel",
        View::LineageTree(_) => {
            "[hjkl] Pan  [+/-] Zoom  [0] Reset  [Tab] Focus  [Enter] Open  [Esc] Back"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_list_hides_add() {
        assert!(key_hints(&View::List, true).contains("[a] Add"));
        assert!(!key_hints(&View::List, false).contains("[a] Add"));
    }

    #[test]
    fn test_details_offer_retry() {
        let details = View::Details(pedigree_core::HorseId::new("42"));
        assert!(key_hints(&details, false).contains("[r] Retry"));
    }
}
