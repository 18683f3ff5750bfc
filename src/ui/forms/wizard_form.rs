//! Wizard step rendering: fields on the left, actions on the right

use super::field_renderer::{
    draw_error_line, draw_flag_field, draw_option_list, draw_text_field, field_height,
};
use crate::app::App;
use crate::state::{FieldRule, FieldSpec, WizardAction};
use crate::ui::components::{render_action_button, BUTTON_HEIGHT};
use crate::ui::summary_panel;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};

/// Draw the current step with its action panel
pub fn draw_step(frame: &mut Frame, area: Rect, app: &App) {
    // Split into form (left) and action panel (right)
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Form area
            Constraint::Length(24), // Action panel
        ])
        .split(area);

    draw_form(frame, main_chunks[0], app);
    draw_action_panel(frame, main_chunks[1], app);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let nav = &app.state.nav;
    let border_color = if app.state.on_action_panel() {
        Color::DarkGray
    } else {
        Color::Cyan
    };

    let block = Block::default()
        .title(format!(" {} ", nav.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // The summary step shows every collected value above its own fields
    let fields_area = if nav.is_terminal {
        let fields_height: u16 = step_fields(app)
            .map(|spec| field_height(spec, app.state.error_for(spec.name).is_some()))
            .sum();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(fields_height)])
            .split(inner);
        summary_panel::draw(frame, chunks[0], app);
        chunks[1]
    } else {
        inner
    };

    draw_fields(frame, fields_area, app);
}

fn step_fields<'a>(app: &'a App) -> impl Iterator<Item = &'a FieldSpec> + 'a {
    app.state
        .nav
        .fields
        .iter()
        .filter_map(|name| app.schema().field(name))
}

fn draw_fields(frame: &mut Frame, area: Rect, app: &App) {
    let specs: Vec<&FieldSpec> = step_fields(app).collect();
    let mut constraints: Vec<Constraint> = specs
        .iter()
        .map(|spec| {
            Constraint::Length(field_height(
                spec,
                app.state.error_for(spec.name).is_some(),
            ))
        })
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (index, (spec, chunk)) in specs.iter().zip(chunks.iter()).enumerate() {
        draw_field(frame, *chunk, app, spec, app.state.active_field == index);
    }
}

fn draw_field(frame: &mut Frame, area: Rect, app: &App, spec: &FieldSpec, is_active: bool) {
    let error = app.state.error_for(spec.name);
    let (field_area, error_area) = match error {
        Some(_) if area.height > 1 => (
            Rect {
                height: area.height - 1,
                ..area
            },
            Some(Rect {
                y: area.y + area.height - 1,
                height: 1,
                ..area
            }),
        ),
        _ => (area, None),
    };
    let has_error = error.is_some();
    let value = app.wizard.value(spec.name);

    match &spec.rule {
        FieldRule::Text(_) => draw_text_field(
            frame,
            field_area,
            spec.label,
            value.map(|v| v.as_text()).unwrap_or_default(),
            is_active,
            spec.is_multiline,
            has_error,
        ),
        FieldRule::Choice(_) => {
            let code = value.map(|v| v.as_text().trim()).unwrap_or_default();
            draw_option_list(
                frame,
                field_area,
                spec.label,
                spec.rule.options(),
                &[code],
                is_active.then_some(app.state.option_cursor),
                false,
                has_error,
            );
        }
        FieldRule::CheckboxGroup(_) => {
            let codes: Vec<&str> = value
                .map(|v| v.as_choices().iter().map(String::as_str).collect())
                .unwrap_or_default();
            draw_option_list(
                frame,
                field_area,
                spec.label,
                spec.rule.options(),
                &codes,
                is_active.then_some(app.state.option_cursor),
                true,
                has_error,
            );
        }
        FieldRule::Consent { .. } | FieldRule::Toggle => draw_flag_field(
            frame,
            field_area,
            spec.label,
            value.is_some_and(|v| v.as_flag()),
            is_active,
            has_error,
        ),
    }

    if let (Some(message), Some(error_area)) = (error, error_area) {
        draw_error_line(frame, error_area, message);
    }
}

/// Draw the action panel sidebar
fn draw_action_panel(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.state.on_action_panel();
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Acciones ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let actions = app.state.actions();
    let mut constraints = vec![Constraint::Length(BUTTON_HEIGHT); actions.len()];
    constraints.push(Constraint::Min(0));
    let button_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner_area);

    // Render buttons (primary action first)
    for (index, action) in actions.iter().enumerate() {
        let accent = match action {
            WizardAction::Next | WizardAction::Submit => Color::Green,
            WizardAction::Previous => Color::Blue,
            WizardAction::SaveDraft => Color::Yellow,
            WizardAction::StartOver => Color::Gray,
        };
        render_action_button(
            frame,
            button_chunks[index],
            action.label(),
            is_focused && app.state.selected_button == index,
            !app.state.submitting,
            Some(accent),
        );
    }
}
