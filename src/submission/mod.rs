//! Submission of completed registrations

mod simulated;
mod traits;

pub use simulated::SimulatedSubmission;
pub use traits::{SubmissionClient, SubmissionError, SubmissionPayload, SubmissionReceipt};

#[cfg(test)]
pub use traits::MockSubmissionClient;
