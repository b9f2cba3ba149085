use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("migration error: {0}")]
    Migration(String),
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("invalid backup path (matches database): {0}")]
    InvalidBackupPath(PathBuf),
    #[error("corrupt entry {key}: {source}")]
    CorruptEntry {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("corrupt store file {path}: {source}")]
    CorruptFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    Json,
    MissingHomeDir,
    Migration,
    InvalidDataPath,
    InvalidBackupPath,
    CorruptEntry,
    CorruptFile,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::Json(_) => StoreErrorKind::Json,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::Migration(_) => StoreErrorKind::Migration,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::InvalidBackupPath(_) => StoreErrorKind::InvalidBackupPath,
            StoreError::CorruptEntry { .. } => StoreErrorKind::CorruptEntry,
            StoreError::CorruptFile { .. } => StoreErrorKind::CorruptFile,
        }
    }
}
