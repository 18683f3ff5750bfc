//! Reusable UI components

mod button;
mod dialog;

pub use button::{render_action_button, BUTTON_HEIGHT};
pub use dialog::{
    render_error_dialog, render_submit_failed_dialog, render_submitted_dialog,
    render_submitting_dialog,
};
