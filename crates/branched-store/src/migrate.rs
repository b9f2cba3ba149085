use crate::error::{Result, StoreError};
use rusqlite::{Connection, OptionalExtension, Transaction};
use tracing::debug;

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_init.sql",
    include_str!("../migrations/001_init.sql"),
)];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    ensure_schema_table(&tx)?;
    let current = read_version(&tx)?;
    let latest = MIGRATIONS.len() as i64;

    if current > latest {
        return Err(StoreError::Migration(format!(
            "db version {} newer than available migrations {}",
            current, latest
        )));
    }

    for (version, (name, sql)) in (1..).zip(MIGRATIONS.iter()) {
        if current >= version {
            continue;
        }
        debug!(migration = *name, version, "applying migration");
        tx.execute_batch(sql)?;
        write_version(&tx, version)?;
    }

    tx.commit()?;
    Ok(())
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    let version: Option<i64> = conn
        .query_row("SELECT version FROM branched_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .optional()
        .or_else(|err| match err {
            rusqlite::Error::SqliteFailure(_, Some(ref msg)) if msg.contains("no such table") => {
                Ok(None)
            }
            other => Err(other),
        })?;
    Ok(version.unwrap_or(0))
}

fn ensure_schema_table(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch("CREATE TABLE IF NOT EXISTS branched_schema (version INTEGER NOT NULL);")?;

    let existing: Option<i64> = tx
        .query_row("SELECT version FROM branched_schema LIMIT 1;", [], |row| {
            row.get(0)
        })
        .optional()?;

    if existing.is_none() {
        tx.execute("INSERT INTO branched_schema (version) VALUES (0);", [])?;
    }

    Ok(())
}

fn read_version(tx: &Transaction<'_>) -> Result<i64> {
    let version: i64 =
        tx.query_row("SELECT version FROM branched_schema LIMIT 1;", [], |row| {
            row.get(0)
        })?;
    Ok(version)
}

fn write_version(tx: &Transaction<'_>, version: i64) -> Result<()> {
    let updated = tx.execute("UPDATE branched_schema SET version = ?1;", [version])?;
    if updated != 1 {
        return Err(StoreError::Migration(format!(
            "expected single schema row, updated {}",
            updated
        )));
    }
    Ok(())
}
