use crate::error::{Result, StoreError};
use crate::kv::KeyValueStore;
use crate::paths;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A JSON object file mapping keys to string values.
///
/// Every read goes back to disk. Writes replace the file through a `.tmp` sibling.
#[derive(Debug, Clone)]
pub struct FileKv {
    path: PathBuf,
}

impl FileKv {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        paths::ensure_parent_dir(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents).map_err(|source| StoreError::CorruptFile {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let mut encoded = serde_json::to_vec_pretty(entries)?;
        encoded.push(b'\n');
        fs::write(&tmp, encoded)?;
        paths::restrict_file_permissions(&tmp)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileKv {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}
