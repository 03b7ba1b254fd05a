//! Registration form component.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use pedigree_core::{form::NO_PARENT_LABEL, FormField, ParentRole, PhotoPreview};

use super::panel;
use crate::tui::app::App;

pub fn render(app: &App, frame: &mut Frame, area: Rect) {
    let form = app.controller.form();
    let mut lines: Vec<Line> = Vec::new();

    for field in FormField::ALL {
        let focused = field == app.focus;
        let marker = if field.is_required() { "*" } else { " " };
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        let mut spans = vec![
            Span::styled(if focused { "▶ " } else { "  " }, label_style),
            Span::styled(format!("{:<7}{} ", field.label(), marker), label_style),
        ];
        spans.extend(field_value(app, field, focused));
        lines.push(Line::from(spans));

        if field == FormField::Photo {
            if let Some(photo) = &form.photo {
                lines.push(detail_line(&preview_summary(&photo.file_name, &photo.preview)));
            }
        }
    }

    lines.push(Line::from(""));
    let missing = form.missing_fields();
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.label()).collect();
        lines.push(Line::from(Span::styled(
            format!("Still required: {}", names.join(", ")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    for error in [app.photo_error.as_deref(), app.controller.submit_error()]
        .into_iter()
        .flatten()
    {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel("Register Horse"));
    frame.render_widget(paragraph, area);
}

fn field_value(app: &App, field: FormField, focused: bool) -> Vec<Span<'static>> {
    let form = app.controller.form();
    let cursor = if focused { "_" } else { "" };

    match field {
        FormField::Sex => picker(
            if form.sex.is_empty() { "Choose" } else { form.sex.as_str() },
            focused,
        ),
        FormField::Father => picker(&parent_name(app, ParentRole::Father), focused),
        FormField::Mother => picker(&parent_name(app, ParentRole::Mother), focused),
        FormField::Photo => vec![Span::raw(format!("{}{}", app.photo_path, cursor))],
        field => vec![Span::raw(format!("{}{}", form.value(field), cursor))],
    }
}

/// Choice widget: arrows only while focused.
fn picker(label: &str, focused: bool) -> Vec<Span<'static>> {
    if focused {
        vec![
            Span::styled("◀ ", Style::default().fg(Color::DarkGray)),
            Span::raw(label.to_string()),
            Span::styled(" ▶", Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![Span::raw(label.to_string())]
    }
}

/// Name of the picked parent, or the "none" label.
fn parent_name(app: &App, role: ParentRole) -> String {
    let id = app.controller.form().value(role.field());
    if id.is_empty() {
        return NO_PARENT_LABEL.to_string();
    }
    app.controller
        .parent_candidates(role)
        .into_iter()
        .find(|horse| horse.id.as_str() == id)
        .map(|horse| horse.name.clone())
        .unwrap_or_else(|| id.to_string())
}

fn detail_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("{:<12}{}", "", text),
        Style::default().fg(Color::DarkGray),
    ))
}

/// One-line description of an attached photo, e.g. `bay.png: PNG 640x480, 12.3 KB`.
pub fn preview_summary(file_name: &str, preview: &PhotoPreview) -> String {
    format!(
        "{}: {} {}x{}, {:.1} KB",
        file_name,
        preview.format.label(),
        preview.width,
        preview.height,
        preview.size as f64 / 1024.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pedigree_core::form::ImageFormat;

    #[test]
    fn test_preview_summary() {
        let preview = PhotoPreview {
            format: ImageFormat::Png,
            width: 640,
            height: 480,
            size: 12_595,
            data_url: String::new(),
        };
        assert_eq!(
            preview_summary("bay.png", &preview),
            "bay.png: PNG 640x480, 12.3 KB"
        );
    }
}
