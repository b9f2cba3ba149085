use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use branched_core::{normalize_email, AddOutcome, StorageError, WaitlistEmail, WaitlistStorage};
use std::collections::HashSet;
use tracing::debug;

pub const DEFAULT_WAITLIST_KEY: &str = "branched_waitlist";

/// The waitlist set kept as one JSON list under a single key.
///
/// Reads normalize and deduplicate whatever is stored. The read-then-write in
/// [`KvWaitlist::append`] is not atomic across processes.
pub struct KvWaitlist<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> KvWaitlist<K> {
    pub fn new(kv: K) -> Self {
        Self::with_key(kv, DEFAULT_WAITLIST_KEY)
    }

    pub fn with_key(kv: K, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn load(&self) -> Result<Vec<String>> {
        let Some(raw) = self.kv.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        let entries: Vec<String> =
            serde_json::from_str(&raw).map_err(|source| StoreError::CorruptEntry {
                key: self.key.clone(),
                source,
            })?;
        Ok(dedup_normalized(&entries))
    }

    /// Adds `email` unless it is already stored.
    pub fn append(&self, email: &WaitlistEmail) -> Result<AddOutcome> {
        let mut entries = self.load()?;
        if entries.iter().any(|entry| entry == email.as_str()) {
            debug!(key = %self.key, "waitlist entry already present");
            return Ok(AddOutcome::AlreadyPresent);
        }
        entries.push(email.as_str().to_string());
        let encoded = serde_json::to_string(&entries)?;
        self.kv.set_item(&self.key, &encoded)?;
        debug!(key = %self.key, count = entries.len(), "waitlist entry written");
        Ok(AddOutcome::Added)
    }
}

impl<K: KeyValueStore> WaitlistStorage for KvWaitlist<K> {
    fn list_emails(&self) -> std::result::Result<Vec<String>, StorageError> {
        self.load()
            .map_err(|err| StorageError::new(format!("read waitlist {}", self.key()), err))
    }

    fn add_email(&self, email: &WaitlistEmail) -> std::result::Result<AddOutcome, StorageError> {
        self.append(email)
            .map_err(|err| StorageError::new(format!("write waitlist {}", self.key()), err))
    }
}

fn dedup_normalized(entries: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .filter_map(|entry| normalize_email(entry))
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}
