//! UI rendering for the TUI.

use ratatui::{layout::Margin, prelude::*};

use pedigree_core::View;

use super::app::App;
use super::components::{details, form, list, status, tree};

/// Header, body and status areas.
pub fn areas(screen: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(6),    // Current view
        Constraint::Length(2), // Notice and key hints
    ])
    .areas(screen)
}

/// Inside of the bordered lineage panel, where tree cells are drawn.
pub fn tree_canvas(screen: Rect) -> Rect {
    let [_, body, _] = areas(screen);
    body.inner(Margin::new(1, 1))
}

/// Render the entire UI.
pub fn render(app: &App, frame: &mut Frame) {
    let [header, body, footer] = areas(frame.area());

    status::render_header(app, frame, header);

    match app.controller.view() {
        View::List => list::render(app, frame, body),
        View::Details(_) => details::render(app, frame, body),
        View::Add => form::render(app, frame, body),
        View::LineageTree(_) => tree::render(app, frame, body),
    }

    status::render_footer(app, frame, footer);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_sits_inside_body() {
        let screen = Rect::new(0, 0, 100, 30);
        let [_, body, _] = areas(screen);
        let canvas = tree_canvas(screen);

        assert_eq!(body, Rect::new(0, 2, 100, 26));
        assert_eq!(canvas, Rect::new(1, 3, 98, 24));
    }
}
