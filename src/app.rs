//! Application state and core logic

use crate::config::WizardConfig;
use crate::export::{build_export, copy_to_clipboard, write_export};
use crate::platform;
use crate::state::{
    AppState, Clock, Debouncer, FieldRule, FieldValue, FormSchema, Modal, ScheduledTask,
    StepTransition, SubmittedForm, SystemClock, Wizard, WizardAction, WizardView,
};
use crate::storage::{DisabledStore, DraftPersistence, FileStore, KeyValueStore};
use crate::submission::{SimulatedSubmission, SubmissionClient, SubmissionPayload};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Step controller owning the draft
    pub wizard: Wizard,
    schema: Arc<FormSchema>,
    clock: Arc<dyn Clock>,
    submission: Box<dyn SubmissionClient>,
    /// Per-field validation after typing pauses
    debouncer: Debouncer,
    autosave: ScheduledTask,
    export_dir: PathBuf,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance from the user configuration
    pub fn new(config: &WizardConfig) -> Result<Self> {
        let schema = Arc::new(FormSchema::registration()?);
        let submission = SimulatedSubmission::new(
            config.submission_latency(),
            config.simulated_failures(),
        );
        Ok(Self::with_parts(
            schema,
            Arc::new(SystemClock),
            open_store(config),
            Box::new(submission),
            config,
        ))
    }

    /// Assemble the app from explicit collaborators
    pub fn with_parts(
        schema: Arc<FormSchema>,
        clock: Arc<dyn Clock>,
        store: Box<dyn KeyValueStore>,
        submission: Box<dyn SubmissionClient>,
        config: &WizardConfig,
    ) -> Self {
        let now = clock.now();
        let mut state = AppState::new(clock.clone());
        let persistence = DraftPersistence::new(store, config.session_ttl());
        let wizard = Wizard::start(schema.clone(), clock.clone(), persistence, &mut state);

        Self {
            state,
            wizard,
            schema,
            clock,
            submission,
            debouncer: Debouncer::new(config.validation_debounce()),
            autosave: ScheduledTask::every(config.autosave_interval(), now),
            export_dir: config.export_dir(),
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Save what is worth keeping and stop the event loop
    pub fn quit(&mut self) {
        self.debouncer.cancel();
        self.autosave.cancel();
        self.wizard.flush(&mut self.state);
        self.quit = true;
    }

    /// Run due scheduled work: debounced validation and auto-save
    pub fn tick(&mut self, now: Instant) {
        if let Some(field) = self.debouncer.poll(now) {
            if self.state.nav.fields.iter().any(|f| *f == field) {
                self.wizard.refresh_field(&field, &mut self.state);
            }
        }

        if self.autosave.fire_if_due(now) && self.wizard.autosave(&mut self.state) {
            self.state.show_status("Borrador guardado automáticamente");
        }
    }

    /// Handle a key press
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return Ok(());
        }

        // Global quit: Ctrl+C
        if platform::QUIT.matches(&key) {
            self.quit();
            return Ok(());
        }

        // A submission is in flight; the loop resolves it before more input
        if self.state.submitting {
            return Ok(());
        }

        match self.state.modal {
            Modal::SubmitFailed(_) => return self.handle_failure_dialog_key(key),
            Modal::Submitted(_) => return self.handle_confirmation_key(key),
            Modal::None => {}
        }

        // Clear any status messages on key press
        self.state.status_message = None;

        match key.code {
            _ if platform::SAVE.matches(&key) => self.trigger(WizardAction::SaveDraft),
            _ if platform::NEXT.matches(&key) => self.forward(),
            KeyCode::PageDown => self.forward(),
            _ if platform::PREVIOUS.matches(&key) => self.trigger(WizardAction::Previous),
            KeyCode::PageUp => self.trigger(WizardAction::Previous),
            KeyCode::Tab => self.state.next_field(),
            KeyCode::BackTab => self.state.prev_field(),
            // Unbound chords never reach the fields as typed text
            _ if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER) => {}
            _ if self.state.on_action_panel() => self.handle_action_panel_key(key),
            _ => self.handle_field_key(key),
        }
        Ok(())
    }

    /// Keys while the action panel has focus
    fn handle_action_panel_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Up | KeyCode::Char('k') => self.state.prev_button(),
            KeyCode::Right | KeyCode::Down | KeyCode::Char('j') => self.state.next_button(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(action) = self.state.selected_action() {
                    self.trigger(action);
                }
            }
            _ => {}
        }
    }

    /// Keys while a field has focus; editing depends on the field's rule
    fn handle_field_key(&mut self, key: KeyEvent) {
        let Some(field) = self.state.active_field_name() else {
            return;
        };
        let Some(spec) = self.schema.field(field) else {
            return;
        };
        let option_count = spec.rule.options().len();

        match (&spec.rule, key.code) {
            (FieldRule::Text(_), KeyCode::Char(c)) => {
                self.wizard.edit_value(field, |v| v.push_char(c));
                self.debouncer.touch(field, self.clock.now());
            }
            (FieldRule::Text(_), KeyCode::Backspace) => {
                self.wizard.edit_value(field, |v| v.pop_char());
                self.debouncer.touch(field, self.clock.now());
            }
            (FieldRule::Text(_), KeyCode::Enter) if spec.is_multiline => {
                self.wizard.edit_value(field, |v| v.push_char('\n'));
                self.debouncer.touch(field, self.clock.now());
            }
            (FieldRule::Choice(_) | FieldRule::CheckboxGroup(_), KeyCode::Up | KeyCode::Left) => {
                self.state.move_option_cursor(-1, option_count);
            }
            (
                FieldRule::Choice(_) | FieldRule::CheckboxGroup(_),
                KeyCode::Down | KeyCode::Right,
            ) => {
                self.state.move_option_cursor(1, option_count);
            }
            (FieldRule::Choice(_), KeyCode::Char(' ') | KeyCode::Enter) => {
                if let Some(option) = spec.rule.options().get(self.state.option_cursor) {
                    self.wizard
                        .set_value(field, FieldValue::Text(option.code.to_string()));
                    self.wizard.refresh_field(field, &mut self.state);
                }
            }
            (FieldRule::CheckboxGroup(_), KeyCode::Char(' ')) => {
                if let Some(option) = spec.rule.options().get(self.state.option_cursor) {
                    let code = option.code;
                    self.wizard.edit_value(field, |v| v.toggle(Some(code)));
                    self.wizard.refresh_field(field, &mut self.state);
                }
            }
            (FieldRule::Consent { .. } | FieldRule::Toggle, KeyCode::Char(' ')) => {
                self.wizard.edit_value(field, |v| v.toggle(None));
                self.wizard.refresh_field(field, &mut self.state);
            }
            (_, KeyCode::Enter) => self.state.next_field(),
            _ => {}
        }
    }

    /// Primary forward action: next step, or submit on the last one
    fn forward(&mut self) {
        let action = if self.wizard.is_terminal() {
            WizardAction::Submit
        } else {
            WizardAction::Next
        };
        self.trigger(action);
    }

    fn trigger(&mut self, action: WizardAction) {
        match action {
            WizardAction::Next => {
                if let StepTransition::Moved { .. } = self.wizard.advance(&mut self.state) {
                    self.debouncer.cancel();
                }
            }
            WizardAction::Previous => {
                if let StepTransition::Moved { .. } = self.wizard.retreat(&mut self.state) {
                    self.debouncer.cancel();
                }
            }
            WizardAction::Submit => self.request_submit(),
            WizardAction::SaveDraft => {
                if self.wizard.save(&mut self.state) {
                    self.state.show_status("Borrador guardado");
                }
            }
            WizardAction::StartOver => {
                self.debouncer.cancel();
                self.wizard.reset(&mut self.state);
                self.state.show_status("Formulario reiniciado");
            }
        }
    }

    /// Validate the summary step and mark a submission as pending.
    /// The event loop draws the pending state, then calls [`App::submit`].
    pub fn request_submit(&mut self) {
        if self.wizard.check_submission(&mut self.state).is_err() {
            return;
        }
        self.state.modal = Modal::None;
        self.state.submitting = true;
    }

    /// Send the pending submission
    pub async fn submit(&mut self) {
        if !self.state.submitting {
            return;
        }

        let session_id = self.wizard.session_id().to_string();
        let payload = SubmissionPayload {
            session_id: session_id.clone(),
            data: build_export(&self.schema, self.wizard.draft(), self.clock.utc_now()),
        };

        tracing::info!(session = %session_id, "submitting registration");
        let result = self.submission.submit(&payload).await;
        self.state.submitting = false;

        match result {
            Ok(receipt) => {
                tracing::info!(reference = %receipt.reference, "registration accepted");
                self.debouncer.cancel();
                self.wizard.complete(&mut self.state);
                self.state.modal = Modal::Submitted(Box::new(SubmittedForm {
                    session_id,
                    receipt,
                    export: payload.data,
                    export_path: None,
                }));
            }
            Err(err) => {
                tracing::warn!("Submission failed: {err}");
                self.state.modal = Modal::SubmitFailed(err.to_string());
            }
        }
    }

    /// Keys in the submission failure dialog: `r` retries, Esc/Enter closes
    fn handle_failure_dialog_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_submit(),
            KeyCode::Esc | KeyCode::Enter => self.state.modal = Modal::None,
            _ => {}
        }
        Ok(())
    }

    /// Keys in the confirmation modal: export, copy or close
    fn handle_confirmation_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_submitted(),
            KeyCode::Char('c') | KeyCode::Char('C') => self.copy_submitted(),
            KeyCode::Esc | KeyCode::Enter => self.state.modal = Modal::None,
            _ => {}
        }
        Ok(())
    }

    fn export_submitted(&mut self) {
        let now = self.clock.utc_now();
        let Modal::Submitted(form) = &mut self.state.modal else {
            return;
        };
        match write_export(&self.export_dir, &form.session_id, &form.export, now) {
            Ok(path) => {
                let message = format!("Exportado a {}", path.display());
                form.export_path = Some(path);
                self.state.show_status(&message);
            }
            Err(err) => {
                tracing::warn!("Export failed: {err}");
                self.push_error(format!("No se pudo exportar: {err}"));
            }
        }
    }

    fn copy_submitted(&mut self) {
        let Modal::Submitted(form) = &self.state.modal else {
            return;
        };
        match copy_to_clipboard(&form.export) {
            Ok(()) => self.state.show_status("Copiado al portapapeles"),
            Err(err) => {
                tracing::warn!("Clipboard copy failed: {err}");
                self.push_error(format!("No se pudo copiar: {err}"));
            }
        }
    }
}

/// Open the storage file, falling back to a disabled store
fn open_store(config: &WizardConfig) -> Box<dyn KeyValueStore> {
    if config.storage_quota() == 0 {
        tracing::info!("draft persistence disabled by configuration");
        return Box::new(DisabledStore::new("desactivado en la configuración"));
    }
    let Some(path) = config.storage_path() else {
        tracing::warn!("no data directory available, drafts will not be saved");
        return Box::new(DisabledStore::new("sin directorio de datos"));
    };
    match FileStore::open(&path, config.storage_quota()) {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "using draft storage");
            Box::new(store)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), "Failed to open storage: {err}");
            Box::new(DisabledStore::new(err.to_string()))
        }
    }
}
