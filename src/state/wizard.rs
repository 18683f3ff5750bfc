//! Step navigation controller
//!
//! Owns the current step, the in-memory draft and the persistence manager.
//! Steps are 1-based; step `N` (the last) is the summary step where the form
//! is submitted.

use super::draft::{DraftState, SessionRecord};
use super::forms::{validate_field, FieldRule, FieldValue, FieldVerdict, FormSchema};
use super::scheduler::Clock;
use super::view::{StepNavigation, WizardView};
use crate::storage::DraftPersistence;
use std::sync::Arc;

/// What a navigation request did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTransition {
    Moved { from: usize, to: usize },
    /// Validation failed; the step did not change
    Blocked {
        field: &'static str,
        message: String,
    },
    /// Already at the boundary in that direction
    Unchanged,
}

pub struct Wizard {
    schema: Arc<FormSchema>,
    clock: Arc<dyn Clock>,
    persistence: DraftPersistence,
    session: SessionRecord,
    draft: DraftState,
    step: usize,
}

impl Wizard {
    /// Load persisted state and render the starting step.
    ///
    /// A draft from the current session is restored and the wizard jumps to
    /// its saved step; anything else starts fresh at step 1.
    pub fn start(
        schema: Arc<FormSchema>,
        clock: Arc<dyn Clock>,
        mut persistence: DraftPersistence,
        view: &mut dyn WizardView,
    ) -> Self {
        let now = clock.utc_now();
        let loaded = persistence.load(now);

        if let Some(err) = &loaded.write_error {
            view.show_warning(&format!(
                "No se pudo guardar la sesión, el borrador no se conservará: {err}"
            ));
        }

        let restored = loaded.draft;
        let draft = restored
            .clone()
            .unwrap_or_else(|| DraftState::new(loaded.session.session_id.clone(), now));

        let mut wizard = Self {
            schema,
            clock,
            persistence,
            session: loaded.session,
            draft,
            step: 1,
        };

        match restored {
            Some(saved) => {
                tracing::info!(
                    step = saved.current_step,
                    fields = saved.values.len(),
                    "restored draft"
                );
                wizard.jump_to(saved.current_step, view);
                view.show_status("Borrador restaurado");
            }
            None => wizard.render(view),
        }
        wizard
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.schema.total_steps()
    }

    pub fn is_terminal(&self) -> bool {
        self.step >= self.total_steps()
    }

    pub fn draft(&self) -> &DraftState {
        &self.draft
    }

    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.draft.value(field)
    }

    pub fn navigation(&self) -> StepNavigation {
        match self.schema.step(self.step) {
            Some(descriptor) => StepNavigation::new(descriptor, self.total_steps()),
            None => StepNavigation {
                step: self.step,
                total: self.total_steps(),
                title: "",
                fields: Vec::new(),
                show_previous: self.step > 1,
                next_label: "Siguiente",
                is_terminal: self.is_terminal(),
            },
        }
    }

    /// Record an edit in the draft
    pub fn set_value(&mut self, field: &str, value: FieldValue) {
        self.draft.set_value(field, value);
    }

    /// Apply an in-place edit, starting from the field's empty shape
    pub fn edit_value(&mut self, field: &str, edit: impl FnOnce(&mut FieldValue)) {
        let mut value = self
            .draft
            .value(field)
            .cloned()
            .unwrap_or_else(|| self.empty_value(field));
        edit(&mut value);
        self.set_value(field, value);
    }

    /// Empty value of the right shape for a field
    pub fn empty_value(&self, field: &str) -> FieldValue {
        match self.schema.rule(field) {
            Some(FieldRule::CheckboxGroup(_)) => FieldValue::Choices(Vec::new()),
            Some(FieldRule::Consent { .. } | FieldRule::Toggle) => FieldValue::Flag(false),
            _ => FieldValue::Text(String::new()),
        }
    }

    /// Validate one field against its rule; unknown fields are valid
    pub fn validate_field(&self, field: &str) -> FieldVerdict {
        match self.schema.rule(field) {
            Some(rule) => validate_field(field, self.draft.value(field), rule),
            None => FieldVerdict::Valid,
        }
    }

    /// Re-validate a single field and update its error display
    pub fn refresh_field(&self, field: &str, view: &mut dyn WizardView) -> bool {
        match self.validate_field(field) {
            FieldVerdict::Valid => {
                view.clear_field_error(field);
                true
            }
            FieldVerdict::Invalid { message, .. } => {
                view.show_field_error(field, &message);
                false
            }
        }
    }

    /// Validate the current step and report every failure to the view.
    /// Returns the first failing field, if any.
    fn check_current_step(&self, view: &mut dyn WizardView) -> Option<(&'static str, String)> {
        let fields = self
            .schema
            .step(self.step)
            .map(|d| d.fields.clone())
            .unwrap_or_default();

        let mut first_failure = None;
        for field in fields {
            let ok = self.refresh_field(field, view);
            if !ok && first_failure.is_none() {
                first_failure = Some(field);
            }
        }

        let field = first_failure?;
        let message = self.validate_field(field).message()?.to_string();
        view.focus_field(field);
        view.show_status(&message);
        Some((field, message))
    }

    /// Move forward when every field of the current step is valid
    pub fn advance(&mut self, view: &mut dyn WizardView) -> StepTransition {
        if let Some((field, message)) = self.check_current_step(view) {
            tracing::debug!(step = self.step, field, "advance blocked by validation");
            return StepTransition::Blocked { field, message };
        }

        let from = self.step;
        let to = (from + 1).min(self.total_steps());
        if to == from {
            return StepTransition::Unchanged;
        }

        self.step = to;
        self.render(view);
        self.save(view);
        tracing::info!(from, to, "advanced step");
        StepTransition::Moved { from, to }
    }

    /// Move back one step. Never validates.
    ///
    /// Errors shown for the step being left are dropped, and the new step
    /// is left for the next auto-save to persist.
    pub fn retreat(&mut self, view: &mut dyn WizardView) -> StepTransition {
        let from = self.step;
        let to = from.saturating_sub(1).max(1);
        if to == from {
            return StepTransition::Unchanged;
        }
        let left = self.schema.step(from).map(|d| d.fields.as_slice());
        for field in left.unwrap_or_default() {
            view.clear_field_error(field);
        }
        self.step = to;
        self.draft.set_step(to);
        self.render(view);
        tracing::info!(from, to, "went back a step");
        StepTransition::Moved { from, to }
    }

    /// Set the step directly, trusting previously saved state
    pub fn jump_to(&mut self, step: usize, view: &mut dyn WizardView) {
        self.step = step.clamp(1, self.total_steps().max(1));
        self.render(view);
    }

    /// Validate the summary step before submission
    pub fn check_submission(&self, view: &mut dyn WizardView) -> Result<(), StepTransition> {
        match self.check_current_step(view) {
            Some((field, message)) => Err(StepTransition::Blocked { field, message }),
            None => Ok(()),
        }
    }

    /// Persist the draft. Failures are logged and shown as a warning.
    pub fn save(&mut self, view: &mut dyn WizardView) -> bool {
        let now = self.clock.utc_now();
        match self
            .persistence
            .save(&mut self.draft, self.step, &mut self.session, now)
        {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("Failed to save draft: {err}");
                view.show_warning(&format!("No se pudo guardar el borrador: {err}"));
                false
            }
        }
    }

    /// Periodic save; skipped on the summary step and when nothing changed
    pub fn autosave(&mut self, view: &mut dyn WizardView) -> bool {
        if self.is_terminal() || !self.draft.dirty {
            return false;
        }
        tracing::debug!("auto-saving draft");
        self.save(view)
    }

    /// Final save when the application closes
    pub fn flush(&mut self, view: &mut dyn WizardView) -> bool {
        if !self.draft.has_progress() {
            return false;
        }
        self.save(view)
    }

    /// Drop the draft, both in storage and in memory, and go back to step 1
    pub fn reset(&mut self, view: &mut dyn WizardView) {
        if let Err(err) = self.persistence.clear() {
            tracing::warn!("Failed to clear draft: {err}");
            view.show_warning(&format!("No se pudo borrar el borrador: {err}"));
        }
        self.draft = DraftState::new(self.session.session_id.clone(), self.clock.utc_now());
        self.step = 1;
        view.clear_all_errors();
        self.render(view);
    }

    /// Called after a successful submission
    pub fn complete(&mut self, view: &mut dyn WizardView) {
        tracing::info!(session = %self.session.session_id, "submission accepted, clearing draft");
        self.reset(view);
    }

    fn render(&self, view: &mut dyn WizardView) {
        view.render_step(&self.navigation());
    }
}
