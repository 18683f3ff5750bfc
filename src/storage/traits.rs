//! Trait abstraction for key-value storage to enable mocking in tests

use thiserror::Error;

/// Why a storage operation was rejected
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage quota exceeded ({needed} of {quota} bytes)")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String-to-string persistence in the shape of browser local storage
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Store that rejects every write, used when persistence is switched off or
/// the backing file cannot be opened
#[derive(Debug, Clone)]
pub struct DisabledStore {
    reason: String,
}

impl DisabledStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl KeyValueStore for DisabledStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable(self.reason.clone()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_store_rejects_writes() {
        let mut store = DisabledStore::new("disabled in config");
        let err = store.set("k", "v").unwrap_err();
        assert_eq!(err.to_string(), "storage is unavailable: disabled in config");
        assert!(store.get("k").unwrap().is_none());
        assert!(store.remove("k").is_ok());
    }

    #[test]
    fn test_quota_error_message() {
        let err = StorageError::QuotaExceeded {
            needed: 10,
            quota: 5,
        };
        assert_eq!(err.to_string(), "storage quota exceeded (10 of 5 bytes)");
    }
}
