//! Simulated submission backend
//!
//! There is no real server: submissions sleep for a configurable latency and
//! succeed, except for the first `failures` attempts, which report the
//! service as unavailable. This keeps the retry path reachable without
//! randomness. A payload without accepted terms is rejected outright, the
//! way a real backend re-checks consent on its side.

use super::traits::{SubmissionClient, SubmissionError, SubmissionPayload, SubmissionReceipt};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use uuid::Uuid;

pub struct SimulatedSubmission {
    latency: Duration,
    remaining_failures: AtomicU32,
}

impl SimulatedSubmission {
    pub fn new(latency: Duration, failures: u32) -> Self {
        Self {
            latency,
            remaining_failures: AtomicU32::new(failures),
        }
    }
}

#[async_trait]
impl SubmissionClient for SimulatedSubmission {
    async fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        tokio::time::sleep(self.latency).await;

        if payload.data.get("terms").and_then(serde_json::Value::as_bool) != Some(true) {
            tracing::warn!(session = %payload.session_id, "submission without accepted terms");
            return Err(SubmissionError::Rejected(
                "no se aceptaron los términos y condiciones".to_string(),
            ));
        }

        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            tracing::warn!(session = %payload.session_id, "simulated submission failure");
            return Err(SubmissionError::Unavailable(
                "inténtalo de nuevo en unos segundos".to_string(),
            ));
        }

        let reference = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        Ok(SubmissionReceipt {
            reference: format!("REG-{reference}"),
            received_at: Utc::now(),
        })
    }
}
