//! Dialog components for TUI

mod base;
mod confirm_dialog;
mod error_dialog;

pub use confirm_dialog::{render_submitted_dialog, render_submitting_dialog};
pub use error_dialog::{render_error_dialog, render_submit_failed_dialog};
