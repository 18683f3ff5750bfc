//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `wizard_form`: The current step with its action panel

mod field_renderer;
mod wizard_form;

pub use wizard_form::draw_step;
