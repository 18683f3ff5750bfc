//! Application state definitions

use super::scheduler::Clock;
use super::view::{StepNavigation, WizardView};
use crate::submission::SubmissionReceipt;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Buttons of the action panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Previous,
    Next,
    Submit,
    SaveDraft,
    StartOver,
}

impl WizardAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Previous => "Anterior",
            Self::Next => "Siguiente",
            Self::Submit => "Enviar",
            Self::SaveDraft => "Guardar borrador",
            Self::StartOver => "Empezar de nuevo",
        }
    }

    /// Buttons shown for a step, primary action first
    pub fn for_step(nav: &StepNavigation) -> Vec<Self> {
        let mut actions = vec![if nav.is_terminal {
            Self::Submit
        } else {
            Self::Next
        }];
        if nav.show_previous {
            actions.push(Self::Previous);
        }
        actions.push(Self::SaveDraft);
        actions.push(Self::StartOver);
        actions
    }
}

/// Data kept after a successful submission for the confirmation modal
#[derive(Debug, Clone)]
pub struct SubmittedForm {
    pub session_id: String,
    pub receipt: SubmissionReceipt,
    pub export: serde_json::Value,
    pub export_path: Option<PathBuf>,
}

/// Modal overlay currently shown
#[derive(Debug, Clone, Default)]
pub enum Modal {
    #[default]
    None,
    /// Submission failed; `r` retries
    SubmitFailed(String),
    /// Submission accepted
    Submitted(Box<SubmittedForm>),
}

/// Eased progress bar between two step ratios
#[derive(Debug, Clone)]
pub struct ProgressAnimation {
    from: f64,
    to: f64,
    started: Instant,
}

impl ProgressAnimation {
    const DURATION: Duration = Duration::from_millis(350);

    pub fn new(ratio: f64, now: Instant) -> Self {
        Self {
            from: ratio,
            to: ratio,
            started: now,
        }
    }

    /// Animate from the currently displayed ratio to `ratio`
    pub fn retarget(&mut self, ratio: f64, now: Instant) {
        self.from = self.value(now);
        self.to = ratio;
        self.started = now;
    }

    pub fn value(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started);
        let progress = (elapsed.as_secs_f32() / Self::DURATION.as_secs_f32()).min(1.0);
        let eased = simple_easing::cubic_out(progress) as f64;
        self.from + (self.to - self.from) * eased
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) < Self::DURATION && self.from != self.to
    }
}

/// Main application state; the TUI side of [`WizardView`]
#[derive(Debug)]
pub struct AppState {
    pub nav: StepNavigation,
    pub field_errors: HashMap<String, String>,

    // Focus: an index into `nav.fields`, or the action panel when equal to
    // the field count
    pub active_field: usize,
    /// Highlighted option inside a choice or checkbox group
    pub option_cursor: usize,
    pub selected_button: usize,

    // Messages
    pub status_message: Option<String>,
    pub warning: Option<String>,
    pub errors: Vec<String>,

    pub modal: Modal,
    /// Set when a submission was requested and not yet answered
    pub submitting: bool,
    pub progress: ProgressAnimation,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        Self {
            nav: StepNavigation {
                step: 1,
                total: 1,
                title: "",
                fields: Vec::new(),
                show_previous: false,
                next_label: "Siguiente",
                is_terminal: false,
            },
            field_errors: HashMap::new(),
            active_field: 0,
            option_cursor: 0,
            selected_button: 0,
            status_message: None,
            warning: None,
            errors: Vec::new(),
            modal: Modal::None,
            submitting: false,
            progress: ProgressAnimation::new(0.0, now),
            clock,
        }
    }

    /// Current monotonic time, for animations
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    /// Number of focus stops: every field plus the action panel
    pub fn focus_count(&self) -> usize {
        self.nav.fields.len() + 1
    }

    pub fn on_action_panel(&self) -> bool {
        self.active_field >= self.nav.fields.len()
    }

    /// Name of the focused field, if focus is on a field
    pub fn active_field_name(&self) -> Option<&'static str> {
        self.nav.fields.get(self.active_field).copied()
    }

    /// Move to next focus stop
    pub fn next_field(&mut self) {
        self.active_field = (self.active_field + 1) % self.focus_count();
        self.option_cursor = 0;
    }

    /// Move to previous focus stop
    pub fn prev_field(&mut self) {
        if self.active_field == 0 {
            self.active_field = self.focus_count() - 1;
        } else {
            self.active_field -= 1;
        }
        self.option_cursor = 0;
    }

    pub fn actions(&self) -> Vec<WizardAction> {
        WizardAction::for_step(&self.nav)
    }

    pub fn selected_action(&self) -> Option<WizardAction> {
        self.actions().get(self.selected_button).copied()
    }

    pub fn next_button(&mut self) {
        let count = self.actions().len();
        self.selected_button = (self.selected_button + 1) % count;
    }

    pub fn prev_button(&mut self) {
        let count = self.actions().len();
        if self.selected_button == 0 {
            self.selected_button = count - 1;
        } else {
            self.selected_button -= 1;
        }
    }

    pub fn move_option_cursor(&mut self, delta: isize, option_count: usize) {
        if option_count == 0 {
            return;
        }
        let count = option_count as isize;
        self.option_cursor = ((self.option_cursor as isize + delta).rem_euclid(count)) as usize;
    }

    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn dismiss_error(&mut self) {
        if !self.errors.is_empty() {
            self.errors.remove(0);
        }
    }
}

impl WizardView for AppState {
    fn render_step(&mut self, nav: &StepNavigation) {
        let changed_step = nav.step != self.nav.step || nav.total != self.nav.total;
        if changed_step {
            let now = self.clock.now();
            self.progress.retarget(nav.ratio(), now);
            self.active_field = 0;
            self.option_cursor = 0;
            self.selected_button = 0;
        }
        self.nav = nav.clone();
    }

    fn show_field_error(&mut self, field: &str, message: &str) {
        self.field_errors
            .insert(field.to_string(), message.to_string());
    }

    fn clear_field_error(&mut self, field: &str) {
        self.field_errors.remove(field);
    }

    fn clear_all_errors(&mut self) {
        self.field_errors.clear();
    }

    fn focus_field(&mut self, field: &str) {
        if let Some(index) = self.nav.fields.iter().position(|f| *f == field) {
            self.active_field = index;
            self.option_cursor = 0;
        }
    }

    fn show_warning(&mut self, message: &str) {
        self.warning = Some(message.to_string());
    }

    fn show_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::StepDescriptor;
    use crate::state::scheduler::FakeClock;
    use chrono::Utc;

    fn nav(step: usize, fields: Vec<&'static str>) -> StepNavigation {
        StepNavigation::new(
            &StepDescriptor {
                number: step,
                title: "Paso",
                fields,
            },
            4,
        )
    }

    fn state_on(step: usize) -> AppState {
        let mut state = AppState::new(Arc::new(FakeClock::new(Utc::now())));
        state.render_step(&nav(step, vec!["a", "b"]));
        state
    }

    #[test]
    fn test_actions_for_first_step() {
        let actions = WizardAction::for_step(&nav(1, vec![]));
        assert_eq!(
            actions,
            [
                WizardAction::Next,
                WizardAction::SaveDraft,
                WizardAction::StartOver
            ]
        );
    }

    #[test]
    fn test_actions_for_terminal_step() {
        let actions = WizardAction::for_step(&nav(4, vec![]));
        assert_eq!(actions[0], WizardAction::Submit);
        assert!(actions.contains(&WizardAction::Previous));
    }

    #[test]
    fn test_focus_cycles_through_action_panel() {
        let mut state = state_on(1);
        assert_eq!(state.active_field_name(), Some("a"));
        state.next_field();
        state.next_field();
        assert!(state.on_action_panel());
        state.next_field();
        assert_eq!(state.active_field, 0);
        state.prev_field();
        assert!(state.on_action_panel());
    }

    #[test]
    fn test_focus_field_by_name() {
        let mut state = state_on(2);
        state.focus_field("b");
        assert_eq!(state.active_field, 1);
        state.focus_field("unknown");
        assert_eq!(state.active_field, 1);
    }

    #[test]
    fn test_step_change_resets_focus() {
        let mut state = state_on(1);
        state.active_field = 2;
        state.selected_button = 1;
        state.render_step(&nav(2, vec!["c"]));
        assert_eq!(state.active_field, 0);
        assert_eq!(state.selected_button, 0);
    }

    #[test]
    fn test_button_wraps() {
        let mut state = state_on(1);
        state.prev_button();
        assert_eq!(state.selected_action(), Some(WizardAction::StartOver));
        state.next_button();
        assert_eq!(state.selected_action(), Some(WizardAction::Next));
    }

    #[test]
    fn test_option_cursor_wraps() {
        let mut state = state_on(1);
        state.move_option_cursor(-1, 6);
        assert_eq!(state.option_cursor, 5);
        state.move_option_cursor(1, 6);
        assert_eq!(state.option_cursor, 0);
        state.move_option_cursor(1, 0);
        assert_eq!(state.option_cursor, 0);
    }

    #[test]
    fn test_error_queue() {
        let mut state = state_on(1);
        state.push_error("uno".to_string());
        state.push_error("dos".to_string());
        state.dismiss_error();
        assert_eq!(state.errors, ["dos"]);
        state.dismiss_error();
        assert!(!state.has_errors());
    }

    #[test]
    fn test_step_change_animates_on_injected_clock() {
        let clock = Arc::new(FakeClock::new(Utc::now()));
        let mut state = AppState::new(clock.clone());
        state.render_step(&nav(1, vec!["a"]));
        clock.advance(Duration::from_secs(1));
        let settled = state.progress.value(state.now());
        assert!((settled - 0.25).abs() < f64::EPSILON);

        state.render_step(&nav(2, vec!["b"]));
        assert!(state.progress.is_animating(state.now()));
        assert!((state.progress.value(state.now()) - 0.25).abs() < f64::EPSILON);

        clock.advance(Duration::from_millis(350));
        assert!(!state.progress.is_animating(state.now()));
        assert!((state.progress.value(state.now()) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_animation_settles() {
        let start = Instant::now();
        let mut progress = ProgressAnimation::new(0.25, start);
        progress.retarget(0.5, start);
        assert!(progress.is_animating(start + Duration::from_millis(10)));
        let settled = progress.value(start + Duration::from_secs(1));
        assert!((settled - 0.5).abs() < f64::EPSILON);
        assert!(!progress.is_animating(start + Duration::from_secs(1)));
    }
}
