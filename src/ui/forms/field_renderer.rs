//! Field rendering utilities for the wizard form

use crate::state::{sanitize, FieldOption, FieldRule, FieldSpec};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows taken by a field, including its error line when shown
pub fn field_height(spec: &FieldSpec, has_error: bool) -> u16 {
    let body = match &spec.rule {
        FieldRule::Text(_) if spec.is_multiline => 5,
        FieldRule::Text(_) | FieldRule::Consent { .. } | FieldRule::Toggle => 3,
        FieldRule::Choice(_) | FieldRule::CheckboxGroup(_) => spec.rule.options().len() as u16 + 2,
    };
    body + u16::from(has_error)
}

fn border_style(is_active: bool, has_error: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else if has_error {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Draw a text field; the value is sanitized before display
pub fn draw_text_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    is_active: bool,
    is_multiline: bool,
    has_error: bool,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let cursor = if is_active { "▌" } else { "" };

    let content = if value.is_empty() && !is_active {
        Paragraph::new(Span::styled("(vacío)", style))
    } else if is_multiline {
        let mut lines: Vec<Line> = value
            .split('\n')
            .map(|l| Line::from(sanitize(l)))
            .collect();
        if let Some(last) = lines.last_mut() {
            last.spans
                .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(sanitize(value), style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style(is_active, has_error));

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Draw a single-choice (radio) or multi-choice (checkbox) option list
#[allow(clippy::too_many_arguments)]
pub fn draw_option_list(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    options: &[FieldOption],
    selected: &[&str],
    cursor: Option<usize>,
    multiple: bool,
    has_error: bool,
) {
    let lines: Vec<Line> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let checked = selected.contains(&option.code);
            let mark = match (multiple, checked) {
                (true, true) => "[x]",
                (true, false) => "[ ]",
                (false, true) => "(•)",
                (false, false) => "( )",
            };
            let is_cursor = cursor == Some(i);
            let prefix = if is_cursor { "▸ " } else { "  " };
            let style = if is_cursor {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if checked {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(Span::styled(
                format!("{prefix}{mark} {}", option.label),
                style,
            ))
        })
        .collect();

    let block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style(cursor.is_some(), has_error));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw a single checkbox (consent or toggle)
pub fn draw_flag_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    checked: bool,
    is_active: bool,
    has_error: bool,
) {
    let mark = if checked { "[x]" } else { "[ ]" };
    let style = if is_active {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(is_active, has_error));

    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {mark} {label}"), style)).block(block),
        area,
    );
}

/// Draw a validation message under a field
pub fn draw_error_line(frame: &mut Frame, area: Rect, message: &str) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" ⚠ {}", sanitize(message)),
            Style::default().fg(Color::Red),
        )),
        area,
    );
}
