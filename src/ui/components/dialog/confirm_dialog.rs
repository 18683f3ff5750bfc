//! Submission progress and confirmation dialogs

use super::base::{key_span, render_dialog, DialogConfig};
use crate::state::{sanitize, SubmittedForm};
use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    Frame,
};

/// Render the overlay shown while a submission is in flight
pub fn render_submitting_dialog(frame: &mut Frame) {
    render_dialog(
        frame,
        DialogConfig {
            title: "Enviando",
            title_color: Color::Yellow,
            border_color: Color::Yellow,
            message: "Enviando tu registro…",
            max_width: 40,
            ..Default::default()
        },
    );
}

/// Render the confirmation modal for an accepted submission
pub fn render_submitted_dialog(frame: &mut Frame, form: &SubmittedForm) {
    let label = Style::default().fg(Color::DarkGray);
    let mut details = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Referencia: ", label),
            Span::styled(
                form.receipt.reference.clone(),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::styled("Recibido: ", label),
            Span::raw(
                form.receipt
                    .received_at
                    .format("%d/%m/%Y %H:%M:%S UTC")
                    .to_string(),
            ),
        ]),
    ];
    if let Some(path) = &form.export_path {
        details.push(Line::from(vec![
            Span::styled("Exportado: ", label),
            Span::styled(
                sanitize(&path.display().to_string()),
                Style::default().fg(Color::Green),
            ),
        ]));
    }

    let hint = vec![
        key_span("e"),
        Span::raw(" exportar  "),
        key_span("c"),
        Span::raw(" copiar  "),
        key_span("Enter"),
        Span::raw(" cerrar"),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: "¡Registro enviado!",
            title_color: Color::Green,
            border_color: Color::Green,
            message: "Tu registro se ha enviado correctamente. El borrador se ha borrado.",
            details,
            hint: Some(hint),
            max_width: 64,
        },
    );
}
