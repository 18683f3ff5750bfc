//! Error dialog components

use super::base::{key_span, render_dialog, DialogConfig};
use ratatui::{style::Color, text::Span, Frame};

/// Render an error dialog overlay centered on the screen
pub fn render_error_dialog(frame: &mut Frame, error_message: &str) {
    let hint = vec![
        Span::raw("Pulsa "),
        key_span("Enter"),
        Span::raw(" o "),
        key_span("Esc"),
        Span::raw(" para cerrar"),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: "Error",
            title_color: Color::Red,
            border_color: Color::Red,
            message: error_message,
            hint: Some(hint),
            ..Default::default()
        },
    );
}

/// Render the retry dialog shown after a failed submission
pub fn render_submit_failed_dialog(frame: &mut Frame, error_message: &str) {
    let message = format!(
        "No se pudo enviar el formulario: {error_message}\nTus datos se conservan."
    );
    let hint = vec![
        key_span("r"),
        Span::raw(" reintentar  "),
        key_span("Esc"),
        Span::raw(" volver"),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: "Envío fallido",
            title_color: Color::Red,
            border_color: Color::Red,
            message: &message,
            hint: Some(hint),
            ..Default::default()
        },
    );
}
