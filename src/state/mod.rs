//! Application state module

mod app_state;
mod draft;
mod forms;
mod scheduler;
mod summary;
mod view;
mod wizard;

pub use app_state::*;
pub use draft::{DraftState, SessionRecord};
pub use forms::*;
pub use scheduler::{Clock, Debouncer, ScheduledTask, SystemClock};
pub use summary::{build_summary, display_value, sanitize, SummaryEntry, SummarySection};
pub use view::{StepNavigation, WizardView};
pub use wizard::{StepTransition, Wizard};

#[cfg(test)]
pub use scheduler::FakeClock;
#[cfg(test)]
pub use view::recording::RecordingView;
