use crate::error::{Result, StoreError};
use crate::paths;
use rusqlite::backup::Backup;
use rusqlite::Connection;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const PAGES_PER_STEP: i32 = 128;
const PAUSE_BETWEEN_STEPS: Duration = Duration::from_millis(10);
const SIDECAR_SUFFIXES: [&str; 2] = ["-wal", "-shm"];

/// Online copy of the live database. The target must not alias the database or its sidecars.
pub fn backup_to(conn: &Connection, path: &Path) -> Result<()> {
    paths::ensure_parent_dir(path)?;
    let target = absolute_target(path)?;
    if let Some(live) = live_db_path(conn)? {
        let live = fs::canonicalize(&live)?;
        if aliases_live_db(&target, &live)? {
            return Err(StoreError::InvalidBackupPath(path.to_path_buf()));
        }
    }

    let mut dest = Connection::open(&target)?;
    Backup::new(conn, &mut dest)?.run_to_completion(PAGES_PER_STEP, PAUSE_BETWEEN_STEPS, None)?;
    paths::restrict_file_permissions(&target)?;
    debug!(path = %target.display(), "database backup written");
    Ok(())
}

fn absolute_target(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(fs::canonicalize(path)?);
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidBackupPath(path.to_path_buf()))?;
    Ok(fs::canonicalize(parent)?.join(file_name))
}

fn live_db_path(conn: &Connection) -> Result<Option<PathBuf>> {
    Ok(conn
        .path()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from))
}

fn aliases_live_db(target: &Path, live: &Path) -> Result<bool> {
    if target == live {
        return Ok(true);
    }
    let sidecar = SIDECAR_SUFFIXES.iter().any(|suffix| {
        let mut candidate = OsString::from(live.as_os_str());
        candidate.push(suffix);
        target == Path::new(&candidate)
    });
    if sidecar {
        return Ok(true);
    }
    same_inode(target, live)
}

#[cfg(unix)]
fn same_inode(target: &Path, live: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;
    if !target.exists() || !live.exists() {
        return Ok(false);
    }
    let target_meta = fs::metadata(target)?;
    let live_meta = fs::metadata(live)?;
    Ok(target_meta.dev() == live_meta.dev() && target_meta.ino() == live_meta.ino())
}

#[cfg(not(unix))]
fn same_inode(_target: &Path, _live: &Path) -> Result<bool> {
    Ok(false)
}
