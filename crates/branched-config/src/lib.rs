use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use branched_core::copy;
use branched_core::LookupPolicy;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "branched";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_STORAGE_KEY: &str = "branched_waitlist";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub waitlist: WaitlistConfig,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub path: Option<PathBuf>,
    pub key: String,
}

#[derive(Debug, Clone)]
pub struct WaitlistConfig {
    pub lookup_policy: LookupPolicy,
    pub success_message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::File => "file",
            StorageBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StorageBackend::Sqlite),
            "file" => Ok(StorageBackend::File),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::default(),
                path: None,
                key: DEFAULT_STORAGE_KEY.to_string(),
            },
            waitlist: WaitlistConfig {
                lookup_policy: LookupPolicy::default(),
                success_message: copy::SUCCESS.to_string(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid storage backend: {0} (expected sqlite|file|memory)")]
    InvalidBackend(String),
    #[error("invalid storage key: {0:?}")]
    InvalidStorageKey(String),
    #[error("invalid storage path: {0}")]
    InvalidStoragePath(PathBuf),
    #[error("waitlist success_message cannot be empty")]
    EmptySuccessMessage,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    storage: Option<StorageFile>,
    waitlist: Option<WaitlistFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorageFile {
    backend: Option<StorageBackend>,
    path: Option<PathBuf>,
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WaitlistFile {
    lookup_policy: Option<LookupPolicy>,
    success_message: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

/// Storage keys name a single entry, so they must be non-empty and blank-free.
pub fn validate_storage_key(key: &str) -> Result<String> {
    let trimmed = key.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidStorageKey(key.to_string()));
    }
    Ok(trimmed.to_string())
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(storage) = parsed.storage {
        if let Some(backend) = storage.backend {
            config.storage.backend = backend;
        }
        if let Some(path) = storage.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidStoragePath(path));
            }
            config.storage.path = Some(path);
        }
        if let Some(key) = storage.key {
            config.storage.key = validate_storage_key(&key)?;
        }
    }

    if let Some(waitlist) = parsed.waitlist {
        if let Some(policy) = waitlist.lookup_policy {
            config.waitlist.lookup_policy = policy;
        }
        if let Some(message) = waitlist.success_message {
            let message = message.trim();
            if message.is_empty() {
                return Err(ConfigError::EmptySuccessMessage);
            }
            config.waitlist.success_message = message.to_string();
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
