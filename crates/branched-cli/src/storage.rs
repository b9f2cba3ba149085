use anyhow::{Context as _, Result};
use branched_config::{StorageBackend, StorageConfig};
use branched_core::WaitlistStorage;
use branched_store::{paths, FileKv, KvWaitlist, MemoryKv, Store};
use std::path::PathBuf;
use tracing::debug;

/// The backend selected for this run, kept alive while the waitlist borrows it.
pub enum OpenedStorage {
    Sqlite(Store),
    File(FileKv),
    Memory(MemoryKv),
}

impl OpenedStorage {
    pub fn backend(&self) -> StorageBackend {
        match self {
            OpenedStorage::Sqlite(_) => StorageBackend::Sqlite,
            OpenedStorage::File(_) => StorageBackend::File,
            OpenedStorage::Memory(_) => StorageBackend::Memory,
        }
    }

    pub fn sqlite(&self) -> Option<&Store> {
        match self {
            OpenedStorage::Sqlite(store) => Some(store),
            OpenedStorage::File(_) | OpenedStorage::Memory(_) => None,
        }
    }

    pub fn waitlist(&self, key: &str) -> Box<dyn WaitlistStorage + '_> {
        match self {
            OpenedStorage::Sqlite(store) => Box::new(KvWaitlist::with_key(store.kv(), key)),
            OpenedStorage::File(kv) => Box::new(KvWaitlist::with_key(kv, key)),
            OpenedStorage::Memory(kv) => Box::new(KvWaitlist::with_key(kv, key)),
        }
    }
}

/// `--data-path` beats `storage.path` from config, which beats the XDG default.
pub fn open(config: &StorageConfig, data_path: Option<PathBuf>) -> Result<OpenedStorage> {
    let custom = data_path.or_else(|| config.path.clone());
    match config.backend {
        StorageBackend::Sqlite => {
            let path = paths::resolve_path(custom, paths::db_path)
                .with_context(|| "resolve database path")?;
            debug!(path = %path.display(), "database path resolved");
            let store = Store::open(&path)
                .with_context(|| format!("open database {}", path.display()))?;
            store.migrate().with_context(|| "run migrations")?;
            Ok(OpenedStorage::Sqlite(store))
        }
        StorageBackend::File => {
            let path = paths::resolve_path(custom, paths::json_path)
                .with_context(|| "resolve waitlist file path")?;
            let kv = FileKv::open(&path)
                .with_context(|| format!("open waitlist file {}", path.display()))?;
            debug!(path = %kv.path().display(), "waitlist file opened");
            Ok(OpenedStorage::File(kv))
        }
        StorageBackend::Memory => {
            if custom.is_some() {
                debug!("memory backend ignores the data path");
            }
            Ok(OpenedStorage::Memory(MemoryKv::new()))
        }
    }
}
