//! Trait abstraction for the submission backend to enable mocking in tests

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by a submission backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    /// The backend refused the registration
    #[error("la solicitud fue rechazada: {0}")]
    Rejected(String),

    /// The backend could not be reached
    #[error("el servicio no está disponible: {0}")]
    Unavailable(String),
}

/// Data sent on submit: the export document of the draft
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub session_id: String,
    pub data: serde_json::Value,
}

/// Acknowledgement of an accepted registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub reference: String,
    pub received_at: DateTime<Utc>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    /// Send a completed registration
    async fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmissionError>;
}
