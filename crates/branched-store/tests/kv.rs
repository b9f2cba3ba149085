use branched_store::{FileKv, KeyValueStore, Store};
use tempfile::TempDir;

#[test]
fn sqlite_kv_upserts_values() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    let kv = store.kv();

    assert_eq!(kv.get_item("branched_waitlist").expect("get"), None);
    kv.set_item("branched_waitlist", "[]").expect("set");
    kv.set_item("branched_waitlist", r#"["a@b.com"]"#)
        .expect("overwrite");

    assert_eq!(
        kv.get_item("branched_waitlist").expect("get").as_deref(),
        Some(r#"["a@b.com"]"#)
    );
    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(1) FROM kv_entries;", [], |row| row.get(0))
        .expect("count");
    assert_eq!(rows, 1);
}

#[test]
fn sqlite_kv_persists_across_reopen() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("branched.sqlite3");

    {
        let store = Store::open(&db_path).expect("open store");
        store.migrate().expect("migrate");
        store.kv().set_item("theme", "dark").expect("set");
    }

    let store = Store::open(&db_path).expect("reopen store");
    store.migrate().expect("migrate");
    assert_eq!(
        store.kv().get_item("theme").expect("get").as_deref(),
        Some("dark")
    );
}

#[cfg(unix)]
#[test]
fn sqlite_file_is_private() {
    use std::os::unix::fs::PermissionsExt;
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("data").join("branched.sqlite3");
    let store = Store::open(&db_path).expect("open store");
    store.migrate().expect("migrate");

    let mode = std::fs::metadata(&db_path)
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o077, 0);
}

#[test]
fn file_kv_persists_across_reopen() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("waitlist.json");

    FileKv::open(&path)
        .expect("open")
        .set_item("branched_waitlist", r#"["a@b.com"]"#)
        .expect("set");

    let reopened = FileKv::open(&path).expect("reopen");
    assert_eq!(
        reopened
            .get_item("branched_waitlist")
            .expect("get")
            .as_deref(),
        Some(r#"["a@b.com"]"#)
    );
}
