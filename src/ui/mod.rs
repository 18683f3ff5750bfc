//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;
mod summary_panel;

use crate::app::App;
use crate::state::Modal;
use components::{
    render_error_dialog, render_submit_failed_dialog, render_submitted_dialog,
    render_submitting_dialog,
};
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, body_area, status_area) = layout::create_layout(frame.area());

    layout::draw_header(frame, header_area, app);
    forms::draw_step(frame, body_area, app);
    layout::draw_status_bar(frame, status_area, app);

    // Overlays, most urgent last
    match &app.state.modal {
        Modal::SubmitFailed(message) => render_submit_failed_dialog(frame, message),
        Modal::Submitted(form) => render_submitted_dialog(frame, form),
        Modal::None => {}
    }
    if app.state.submitting {
        render_submitting_dialog(frame);
    }
    if let Some(error) = app.state.errors.first() {
        render_error_dialog(frame, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WizardConfig;
    use crate::state::{FakeClock, FieldValue, FormSchema};
    use crate::storage::memory::MemoryStore;
    use crate::submission::MockSubmissionClient;
    use chrono::{TimeZone, Utc};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn app() -> App {
        App::with_parts(
            Arc::new(FormSchema::registration().unwrap()),
            Arc::new(FakeClock::new(
                Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            )),
            Box::new(MemoryStore::new()),
            Box::new(MockSubmissionClient::new()),
            &WizardConfig::default(),
        )
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_first_step_hides_previous_button() {
        let screen = render(&app());
        assert!(screen.contains("Paso 1 de 4"));
        assert!(screen.contains("Siguiente"));
        assert!(!screen.contains("Anterior"));
        assert!(screen.contains("Nombre"));
    }

    #[test]
    fn test_summary_step_shows_values_and_submit() {
        let mut app = app();
        app.wizard
            .set_value("firstName", FieldValue::Text("Ana".to_string()));
        app.wizard
            .set_value("country", FieldValue::Text("pe".to_string()));
        app.wizard.jump_to(4, &mut app.state);

        let screen = render(&app);
        assert!(screen.contains("Enviar"));
        assert!(screen.contains("Anterior"));
        assert!(screen.contains("Perú"));
        assert!(screen.contains("No especificado"));
    }

    #[test]
    fn test_escape_sequences_are_not_rendered_raw() {
        let mut app = app();
        app.wizard
            .set_value("city", FieldValue::Text("Lima\u{1b}[2J".to_string()));
        app.wizard.jump_to(4, &mut app.state);

        let screen = render(&app);
        assert!(screen.contains("Lima\\u{1b}[2J"));
        assert!(!screen.contains('\u{1b}'));
    }

    #[test]
    fn test_error_dialog_is_drawn() {
        let mut app = app();
        app.push_error("algo falló");
        let screen = render(&app);
        assert!(screen.contains("algo falló"));
    }
}
