//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::{NEXT, PREVIOUS, SAVE};
use crate::state::{sanitize, FieldRule};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Header height: bordered title line plus progress gauge
const HEADER_HEIGHT: u16 = 4;

/// Split the screen into header, body and status bar
pub fn create_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT), // Header
            Constraint::Min(0),                // Content
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Draw the step title and the progress gauge
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let nav = &app.state.nav;

    let block = Block::default()
        .title(" Registro ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            nav.title,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", nav.progress_label()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), rows[0]);

    let ratio = app.state.progress.value(app.state.now()).clamp(0.0, 1.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .label(nav.progress_label())
        .ratio(ratio);
    frame.render_widget(gauge, rows[1]);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::raw(" ")];

    // Context hints
    spans.push(Span::styled(
        get_hints(app),
        Style::default().fg(Color::Gray),
    ));

    // Status message
    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(sanitize(msg), Style::default().fg(Color::Green)));
    }

    // Persistent warning (storage problems)
    if let Some(warning) = &app.state.warning {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            sanitize(warning),
            Style::default().fg(Color::Yellow),
        ));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);

    // Quit hint on the right
    let quit_hint = " ^C:salir ";
    let quit_area = Rect {
        x: area.x + area.width.saturating_sub(quit_hint.len() as u16),
        y: area.y,
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for whatever has focus
fn get_hints(app: &App) -> String {
    let state = &app.state;
    if state.on_action_panel() {
        return "←/→:botón  Enter:activar  Tab:campos".to_string();
    }

    let editing = state
        .active_field_name()
        .and_then(|name| app.schema().rule(name))
        .map(|rule| match rule {
            FieldRule::Text(_) => "escribe para editar",
            FieldRule::Choice(_) => "↑/↓:opción  Espacio:elegir",
            FieldRule::CheckboxGroup(_) => "↑/↓:opción  Espacio:marcar",
            FieldRule::Consent { .. } | FieldRule::Toggle => "Espacio:marcar",
        })
        .unwrap_or_default();

    let forward = if state.nav.is_terminal { "enviar" } else { "siguiente" };
    let mut hints = format!("Tab:campo  {editing}  {}:{forward}", NEXT.label());
    if state.nav.show_previous {
        hints.push_str(&format!("  {}:anterior", PREVIOUS.label()));
    }
    hints.push_str(&format!("  {}:guardar", SAVE.label()));
    hints
}
