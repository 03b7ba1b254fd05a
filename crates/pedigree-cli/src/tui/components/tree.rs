//! Lineage diagram component.
//!
//! Cards and connectors are painted straight into the frame buffer so the
//! diagram can be panned past the panel edges and clipped there.

use std::collections::BTreeMap;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use pedigree_core::{Detail, LayoutConfig};

use super::panel;
use crate::tui::app::{App, TreeView};

const UP: u8 = 1;
const DOWN: u8 = 2;
const LEFT: u8 = 4;
const RIGHT: u8 = 8;

/// Card spacing in terminal cells; the zoom range comes from `config`.
pub fn cell_layout(config: &LayoutConfig) -> LayoutConfig {
    LayoutConfig {
        node_width: 24.0,
        node_height: 4.0,
        level_gap: 6.0,
        sibling_gap: 1.0,
        ..*config
    }
}

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let title = match app.controller.detail() {
        Some(Detail::Found(horse)) => format!("Lineage of {}", horse.name),
        _ => "Lineage".to_string(),
    };
    let block = panel(&title);
    let canvas = block.inner(area);
    frame.render_widget(block, area);

    let Some(tree) = &app.tree else {
        let text = Paragraph::new(vec![
            Line::from("No lineage to show."),
            Line::from(Span::styled(
                "The horse could not be found. Press [Esc] to go back.",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .wrap(Wrap { trim: true });
        frame.render_widget(text, canvas);
        return;
    };

    let buf = frame.buffer_mut();
    draw_connectors(tree, canvas, buf);
    for index in 0..tree.layout.nodes.len() {
        draw_card(tree, index, canvas, buf);
    }

    let zoom = format!(" {:.0}% ", tree.viewport.scale * 100.0);
    let zoom_width = zoom.chars().count() as u16;
    if canvas.width > zoom_width && canvas.height > 0 {
        buf.set_string(
            canvas.right() - zoom_width,
            canvas.bottom() - 1,
            zoom,
            Style::default().fg(Color::DarkGray),
        );
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Unclipped card bounds in canvas-relative cells: `(left, top, right, bottom)`.
fn card_bounds(tree: &TreeView, index: usize) -> Option<(f64, f64, f64, f64)> {
    let node = tree.layout.nodes.get(index)?;
    let scale = tree.viewport.scale;
    let (x, y) = tree.viewport.to_screen(node.x, node.y);
    Some((
        x.round(),
        y.round(),
        (x + tree.layout.node_width * scale).round(),
        (y + tree.layout.node_height * scale).round(),
    ))
}

/// Screen area of a card, clipped to the canvas.
pub fn card_area(tree: &TreeView, index: usize, canvas: Rect) -> Option<Rect> {
    let (left, top, right, bottom) = card_bounds(tree, index)?;
    let left = (f64::from(canvas.x) + left).max(f64::from(canvas.left()));
    let top = (f64::from(canvas.y) + top).max(f64::from(canvas.top()));
    let right = (f64::from(canvas.x) + right).min(f64::from(canvas.right()));
    let bottom = (f64::from(canvas.y) + bottom).min(f64::from(canvas.bottom()));

    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Box-drawing glyphs for a set of elbow connectors.
///
/// Each connector runs from `(x1, y1)` to `(x2, y2)` with a vertical
/// segment halfway across; crossings merge into tee glyphs.
pub fn connector_cells(connectors: &[(i32, i32, i32, i32)]) -> BTreeMap<(i32, i32), char> {
    let mut masks: BTreeMap<(i32, i32), u8> = BTreeMap::new();

    for &(x1, y1, x2, y2) in connectors {
        let mid = (x1 + x2) / 2;
        horizontal(&mut masks, y1, x1, mid);
        vertical(&mut masks, mid, y1, y2);
        horizontal(&mut masks, y2, mid, x2);
    }

    masks
        .into_iter()
        .filter(|(_, mask)| *mask != 0)
        .map(|(cell, mask)| (cell, glyph(mask)))
        .collect()
}

fn horizontal(masks: &mut BTreeMap<(i32, i32), u8>, y: i32, xa: i32, xb: i32) {
    let (from, to) = (xa.min(xb), xa.max(xb));
    if from == to {
        return;
    }
    for x in from..=to {
        let mask = masks.entry((x, y)).or_default();
        if x > from {
            *mask |= LEFT;
        }
        if x < to {
            *mask |= RIGHT;
        }
    }
}

fn vertical(masks: &mut BTreeMap<(i32, i32), u8>, x: i32, ya: i32, yb: i32) {
    let (from, to) = (ya.min(yb), ya.max(yb));
    if from == to {
        return;
    }
    for y in from..=to {
        let mask = masks.entry((x, y)).or_default();
        if y > from {
            *mask |= UP;
        }
        if y < to {
            *mask |= DOWN;
        }
    }
}

fn glyph(mask: u8) -> char {
    match mask {
        m if m == LEFT | UP => '┘',
        m if m == LEFT | DOWN => '┐',
        m if m == RIGHT | UP => '└',
        m if m == RIGHT | DOWN => '┌',
        m if m == LEFT | UP | DOWN => '┤',
        m if m == RIGHT | UP | DOWN => '├',
        m if m == LEFT | RIGHT | UP => '┴',
        m if m == LEFT | RIGHT | DOWN => '┬',
        m if m == LEFT | RIGHT | UP | DOWN => '┼',
        m if m & (UP | DOWN) != 0 && m & (LEFT | RIGHT) == 0 => '│',
        _ => '─',
    }
}

// =============================================================================
// Painting
// =============================================================================

fn draw_connectors(tree: &TreeView, canvas: Rect, buf: &mut Buffer) {
    let row_of = |top: f64, bottom: f64| ((top + bottom) / 2.0).floor() as i32;

    let connectors: Vec<(i32, i32, i32, i32)> = tree
        .layout
        .links
        .iter()
        .filter_map(|link| {
            let (_, top, right, bottom) = card_bounds(tree, link.parent)?;
            let (left2, top2, _, bottom2) = card_bounds(tree, link.child)?;
            Some((
                right as i32,
                row_of(top, bottom),
                left2 as i32 - 1,
                row_of(top2, bottom2),
            ))
        })
        .collect();

    let style = Style::default().fg(Color::DarkGray);
    for ((x, y), ch) in connector_cells(&connectors) {
        let (Ok(dx), Ok(dy)) = (u16::try_from(x), u16::try_from(y)) else {
            continue;
        };
        if dx >= canvas.width || dy >= canvas.height {
            continue;
        }
        if let Some(cell) = buf.cell_mut((canvas.x + dx, canvas.y + dy)) {
            cell.set_char(ch).set_style(style);
        }
    }
}

fn draw_card(tree: &TreeView, index: usize, canvas: Rect, buf: &mut Buffer) {
    let (Some(area), Some(node)) = (card_area(tree, index, canvas), tree.layout.nodes.get(index))
    else {
        return;
    };

    let border = if index == tree.focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if index == 0 {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };

    // Too small for a border: name only.
    if area.height < 3 || area.width < 4 {
        buf.set_stringn(area.x, area.y, &node.name, usize::from(area.width), border);
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    let inner = block.inner(area);
    Widget::render(ratatui::widgets::Clear, area, buf);
    Widget::render(block, area, buf);

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            node.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            node.breed.clone(),
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    Widget::render(text, inner, buf);
}
