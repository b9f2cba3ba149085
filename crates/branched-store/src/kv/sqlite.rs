use crate::error::Result;
use crate::kv::KeyValueStore;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

pub struct KvRepo<'a> {
    conn: &'a Connection,
}

impl<'a> KvRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for KvRepo<'_> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at;",
            params![key, value, Utc::now().timestamp()],
        )?;
        Ok(())
    }
}
