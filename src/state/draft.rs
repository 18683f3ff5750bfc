//! Persisted draft and session records

use super::forms::FieldValue;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Partially completed form, persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftState {
    pub values: BTreeMap<String, FieldValue>,
    pub current_step: usize,
    pub session_id: String,
    pub last_updated: DateTime<Utc>,
    /// Edited since the last successful save
    #[serde(skip)]
    pub dirty: bool,
}

impl DraftState {
    pub fn new(session_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            values: BTreeMap::new(),
            current_step: 1,
            session_id: session_id.into(),
            last_updated: now,
            dirty: false,
        }
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    pub fn set_value(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
        self.dirty = true;
    }

    /// Record a step change made outside of a save
    pub fn set_step(&mut self, step: usize) {
        if self.current_step != step {
            self.current_step = step;
            self.dirty = true;
        }
    }

    /// Whether there is anything worth persisting
    pub fn has_progress(&self) -> bool {
        self.current_step > 1 || self.values.values().any(|v| !v.is_empty())
    }
}

/// Correlates a session id with its last access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: String,
    pub last_access: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            last_access: now,
        }
    }

    /// Stale records belong to an abandoned session
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now.signed_duration_since(self.last_access) > ttl
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_access = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_draft_json_layout() {
        let mut draft = DraftState::new("s-1", at(10));
        draft.current_step = 2;
        draft.set_value("firstName", FieldValue::Text("Ana".to_string()));

        let json: serde_json::Value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "values": {"firstName": "Ana"},
                "currentStep": 2,
                "sessionId": "s-1",
                "lastUpdated": "2026-03-01T10:00:00Z",
            })
        );
    }

    #[test]
    fn test_dirty_not_persisted() {
        let mut draft = DraftState::new("s-1", at(10));
        draft.set_value("email", FieldValue::Text("ana@x.com".to_string()));
        assert!(draft.dirty);

        let json = serde_json::to_string(&draft).unwrap();
        let parsed: DraftState = serde_json::from_str(&json).unwrap();
        assert!(!parsed.dirty);
        assert_eq!(parsed.values, draft.values);
    }

    #[test]
    fn test_has_progress() {
        let mut draft = DraftState::new("s-1", at(10));
        assert!(!draft.has_progress());
        draft.set_value("firstName", FieldValue::Text(String::new()));
        assert!(!draft.has_progress());
        draft.set_value("firstName", FieldValue::Text("A".to_string()));
        assert!(draft.has_progress());
    }

    #[test]
    fn test_step_change_marks_dirty() {
        let mut draft = DraftState::new("s-1", at(10));
        draft.set_step(1);
        assert!(!draft.dirty);
        draft.set_step(2);
        assert!(draft.dirty);
        assert_eq!(draft.current_step, 2);
    }

    #[test]
    fn test_session_staleness() {
        let record = SessionRecord::new(at(0));
        assert!(!record.is_stale(at(12), Duration::hours(24)));
        assert!(record.is_stale(at(12), Duration::hours(6)));
    }

    #[test]
    fn test_new_sessions_get_distinct_ids() {
        assert_ne!(
            SessionRecord::new(at(0)).session_id,
            SessionRecord::new(at(0)).session_id
        );
    }
}
