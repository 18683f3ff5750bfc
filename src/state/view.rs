//! View binding used by the wizard
//!
//! The wizard never reaches into the screen; it reports what changed through
//! this trait. `AppState` implements it for the TUI, tests use a recorder.

use super::forms::StepDescriptor;

/// Navigation chrome for the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepNavigation {
    pub step: usize,
    pub total: usize,
    pub title: &'static str,
    pub fields: Vec<&'static str>,
    /// "Anterior" is hidden on the first step
    pub show_previous: bool,
    pub next_label: &'static str,
    pub is_terminal: bool,
}

impl StepNavigation {
    pub fn new(descriptor: &StepDescriptor, total: usize) -> Self {
        let step = descriptor.number;
        let is_terminal = step >= total;
        Self {
            step,
            total,
            title: descriptor.title,
            fields: descriptor.fields.clone(),
            show_previous: step > 1,
            next_label: if is_terminal { "Enviar" } else { "Siguiente" },
            is_terminal,
        }
    }

    pub fn progress_label(&self) -> String {
        format!("Paso {} de {}", self.step, self.total)
    }

    /// Completed fraction in [0, 1]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.step as f64 / self.total as f64
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait WizardView {
    /// Show the given step and its navigation chrome
    fn render_step(&mut self, nav: &StepNavigation);
    fn show_field_error(&mut self, field: &str, message: &str);
    fn clear_field_error(&mut self, field: &str);
    fn clear_all_errors(&mut self);
    fn focus_field(&mut self, field: &str);
    /// Non-blocking problem the user should know about
    fn show_warning(&mut self, message: &str);
    fn show_status(&mut self, message: &str);
}

#[cfg(test)]
pub mod recording {
    use super::*;
    use std::collections::BTreeMap;

    /// Keeps the last state the wizard pushed, for assertions
    #[derive(Debug, Default)]
    pub struct RecordingView {
        pub nav: Option<StepNavigation>,
        pub errors: BTreeMap<String, String>,
        pub focused: Option<String>,
        pub warnings: Vec<String>,
        pub statuses: Vec<String>,
        pub renders: usize,
    }

    impl WizardView for RecordingView {
        fn render_step(&mut self, nav: &StepNavigation) {
            self.nav = Some(nav.clone());
            self.renders += 1;
        }

        fn show_field_error(&mut self, field: &str, message: &str) {
            self.errors.insert(field.to_string(), message.to_string());
        }

        fn clear_field_error(&mut self, field: &str) {
            self.errors.remove(field);
        }

        fn clear_all_errors(&mut self) {
            self.errors.clear();
        }

        fn focus_field(&mut self, field: &str) {
            self.focused = Some(field.to_string());
        }

        fn show_warning(&mut self, message: &str) {
            self.warnings.push(message.to_string());
        }

        fn show_status(&mut self, message: &str) {
            self.statuses.push(message.to_string());
        }
    }
}
