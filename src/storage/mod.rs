//! Draft storage: key-value backends and the persistence manager

mod file_store;
#[cfg(test)]
pub mod memory;
mod persistence;
mod traits;

pub use file_store::{FileStore, DEFAULT_QUOTA_BYTES};
pub use persistence::{DraftPersistence, LoadedDraft, DRAFT_KEY, SESSION_KEY};
pub use traits::{DisabledStore, KeyValueStore, StorageError};

#[cfg(test)]
pub use traits::MockKeyValueStore;
