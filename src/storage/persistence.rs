//! Draft persistence: save, load and clear the draft and its session record

use super::traits::{KeyValueStore, StorageError};
use crate::state::{DraftState, SessionRecord};
use chrono::{DateTime, Duration, Utc};

pub const DRAFT_KEY: &str = "wizard_draft_v1";
pub const SESSION_KEY: &str = "wizard_session_v1";

/// Result of reading persisted state at startup
#[derive(Debug)]
pub struct LoadedDraft {
    /// Session the wizard runs under (reused or freshly created)
    pub session: SessionRecord,
    /// Draft belonging to `session`, if one was found
    pub draft: Option<DraftState>,
    /// Set when the session record could not be written back
    pub write_error: Option<StorageError>,
}

pub struct DraftPersistence {
    store: Box<dyn KeyValueStore>,
    session_ttl: Duration,
}

impl DraftPersistence {
    pub fn new(store: Box<dyn KeyValueStore>, session_ttl: Duration) -> Self {
        Self { store, session_ttl }
    }

    /// Resolve the current session and restore its draft, if any.
    ///
    /// Read failures and unparseable records count as "nothing stored".
    pub fn load(&mut self, now: DateTime<Utc>) -> LoadedDraft {
        let session = match self.read::<SessionRecord>(SESSION_KEY) {
            Some(mut record) if !record.is_stale(now, self.session_ttl) => {
                record.touch(now);
                record
            }
            Some(stale) => {
                tracing::info!(session = %stale.session_id, "session expired, starting a new one");
                SessionRecord::new(now)
            }
            None => SessionRecord::new(now),
        };

        let write_error = self.write_session(&session).err();
        if let Some(err) = &write_error {
            tracing::warn!("Failed to record session: {err}");
        }

        let draft = self
            .read::<DraftState>(DRAFT_KEY)
            .filter(|draft| {
                let matches = draft.session_id == session.session_id;
                if !matches {
                    tracing::info!(
                        draft_session = %draft.session_id,
                        "ignoring draft from another session"
                    );
                }
                matches
            });

        LoadedDraft {
            session,
            draft,
            write_error,
        }
    }

    /// Merge bookkeeping into `draft` and write both records
    pub fn save(
        &mut self,
        draft: &mut DraftState,
        step: usize,
        session: &mut SessionRecord,
        now: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        draft.current_step = step;
        draft.session_id = session.session_id.clone();
        draft.last_updated = now;
        session.touch(now);

        let json = serde_json::to_string(draft)?;
        self.store.set(DRAFT_KEY, &json)?;
        self.write_session(session)?;

        draft.dirty = false;
        tracing::debug!(step, session = %session.session_id, "draft saved");
        Ok(())
    }

    /// Remove both records. Both removals are attempted; the first error wins.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let draft = self.store.remove(DRAFT_KEY);
        let session = self.store.remove(SESSION_KEY);
        draft.and(session)
    }

    fn write_session(&mut self, session: &SessionRecord) -> Result<(), StorageError> {
        let json = serde_json::to_string(session)?;
        self.store.set(SESSION_KEY, &json)
    }

    fn read<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key, "Failed to read stored value: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, "Discarding unreadable stored value: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldValue;
    use crate::storage::memory::MemoryStore;
    use crate::storage::traits::MockKeyValueStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
    }

    fn persistence(store: &MemoryStore) -> DraftPersistence {
        DraftPersistence::new(Box::new(store.clone()), Duration::hours(24))
    }

    #[test]
    fn test_first_load_creates_session() {
        let store = MemoryStore::new();
        let loaded = persistence(&store).load(at(8));
        assert!(loaded.draft.is_none());
        assert!(loaded.write_error.is_none());

        let stored: SessionRecord =
            serde_json::from_str(&store.raw(SESSION_KEY).unwrap()).unwrap();
        assert_eq!(stored, loaded.session);
    }

    #[test]
    fn test_save_then_load_restores_draft() {
        let store = MemoryStore::new();
        let mut first = persistence(&store);
        let mut loaded = first.load(at(8));

        let mut draft = DraftState::new(loaded.session.session_id.clone(), at(8));
        draft.set_value("firstName", FieldValue::Text("Ana".to_string()));
        first
            .save(&mut draft, 2, &mut loaded.session, at(9))
            .unwrap();
        assert!(!draft.dirty);

        let reloaded = persistence(&store).load(at(10));
        assert_eq!(reloaded.session.session_id, loaded.session.session_id);
        let restored = reloaded.draft.unwrap();
        assert_eq!(restored.current_step, 2);
        assert_eq!(restored.values, draft.values);
        assert_eq!(restored.last_updated, at(9));
    }

    #[test]
    fn test_mismatched_session_is_not_restored() {
        let store = MemoryStore::new();
        let mut draft = DraftState::new("old-session", at(8));
        draft.current_step = 3;
        store.insert_raw(DRAFT_KEY, &serde_json::to_string(&draft).unwrap());
        store.insert_raw(
            SESSION_KEY,
            &serde_json::to_string(&SessionRecord {
                session_id: "new-session".to_string(),
                last_access: at(8),
            })
            .unwrap(),
        );

        let loaded = persistence(&store).load(at(9));
        assert_eq!(loaded.session.session_id, "new-session");
        assert!(loaded.draft.is_none());
    }

    #[test]
    fn test_stale_session_starts_fresh() {
        let store = MemoryStore::new();
        let mut first = persistence(&store);
        let mut loaded = first.load(at(0));
        let mut draft = DraftState::new(loaded.session.session_id.clone(), at(0));
        first.save(&mut draft, 2, &mut loaded.session, at(0)).unwrap();

        let later = Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap();
        let reloaded = persistence(&store).load(later);
        assert_ne!(reloaded.session.session_id, loaded.session.session_id);
        assert!(reloaded.draft.is_none());
    }

    #[test]
    fn test_corrupt_draft_is_ignored() {
        let store = MemoryStore::new();
        store.insert_raw(DRAFT_KEY, "{broken");
        let loaded = persistence(&store).load(at(8));
        assert!(loaded.draft.is_none());
    }

    #[test]
    fn test_clear_removes_both_keys() {
        let store = MemoryStore::new();
        let mut p = persistence(&store);
        let mut loaded = p.load(at(8));
        let mut draft = DraftState::new(loaded.session.session_id.clone(), at(8));
        p.save(&mut draft, 1, &mut loaded.session, at(8)).unwrap();

        p.clear().unwrap();
        assert!(store.raw(DRAFT_KEY).is_none());
        assert!(store.raw(SESSION_KEY).is_none());
    }

    #[test]
    fn test_quota_failure_keeps_draft_dirty() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get().returning(|_| Ok(None));
        mock.expect_set().returning(|_, value| {
            Err(StorageError::QuotaExceeded {
                needed: value.len(),
                quota: 0,
            })
        });

        let mut p = DraftPersistence::new(Box::new(mock), Duration::hours(24));
        let loaded = p.load(at(8));
        assert!(matches!(
            loaded.write_error,
            Some(StorageError::QuotaExceeded { .. })
        ));

        let mut session = loaded.session;
        let mut draft = DraftState::new(session.session_id.clone(), at(8));
        draft.set_value("email", FieldValue::Text("ana@x.com".to_string()));
        assert!(p.save(&mut draft, 1, &mut session, at(9)).is_err());
        assert!(draft.dirty);
    }

    #[test]
    fn test_clear_attempts_both_removals() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_remove()
            .withf(|key| key.contains("draft"))
            .times(1)
            .returning(|_| Err(StorageError::Unavailable("locked".to_string())));
        mock.expect_remove()
            .withf(|key| key.contains("session"))
            .times(1)
            .returning(|_| Ok(()));

        let mut p = DraftPersistence::new(Box::new(mock), Duration::hours(24));
        assert!(matches!(p.clear(), Err(StorageError::Unavailable(_))));
    }
}
