//! Read-only summary shown on the confirmation step

use crate::app::App;
use crate::state::build_summary;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Draw every collected value, grouped by step. Values arrive sanitized.
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let sections = build_summary(app.schema(), app.wizard.draft());

    let mut lines = Vec::new();
    for section in &sections {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        for entry in &section.entries {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {}: ", entry.label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(entry.value.as_str()),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}
