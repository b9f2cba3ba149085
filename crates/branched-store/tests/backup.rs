use branched_store::error::StoreError;
use branched_store::{KeyValueStore, KvWaitlist, Store};
use branched_core::WaitlistStorage;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn backup_creates_readable_snapshot() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("branched.sqlite3");
    let backup_path = temp.path().join("backups").join("snapshot.sqlite3");

    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");
    store
        .kv()
        .set_item("branched_waitlist", r#"["ada@example.com"]"#)
        .expect("seed waitlist");

    store.backup_to(&backup_path).expect("backup");
    assert!(backup_path.exists());

    let backup = Store::open(&backup_path).expect("open backup");
    let emails = KvWaitlist::new(backup.kv())
        .list_emails()
        .expect("list emails");
    assert_eq!(emails, vec!["ada@example.com".to_string()]);
}

#[test]
fn backup_rejects_database_path() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("branched.sqlite3");
    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");

    let err = store.backup_to(&db_path).expect_err("backup should fail");
    assert!(matches!(err, StoreError::InvalidBackupPath(_)));
}

#[test]
fn backup_rejects_sidecar_paths() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("branched.sqlite3");
    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");

    for suffix in ["-wal", "-shm"] {
        let sidecar = PathBuf::from(format!("{}{}", db_path.display(), suffix));
        let err = store.backup_to(&sidecar).expect_err("backup should fail");
        assert!(matches!(err, StoreError::InvalidBackupPath(_)));
    }
}
