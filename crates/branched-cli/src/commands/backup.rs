use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use branched_store::error::StoreError;
use branched_store::paths;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct BackupReport {
    output: String,
    size_bytes: u64,
}

pub fn backup(ctx: &Context<'_>, args: BackupArgs) -> Result<()> {
    let Some(store) = ctx.storage.sqlite() else {
        return Err(invalid_input(format!(
            "backup needs the sqlite backend (current: {})",
            ctx.storage.backend()
        )));
    };
    let out = match args.out {
        Some(path) => path,
        None => paths::backup_path()?,
    };

    match store.backup_to(&out) {
        Ok(()) => {}
        Err(err @ StoreError::InvalidBackupPath(_)) => {
            return Err(err)
                .with_context(|| format!("backup path matches database: {}", out.display()));
        }
        Err(err) => {
            return Err(err).with_context(|| format!("backup database to {}", out.display()));
        }
    }

    let size = fs::metadata(&out)
        .with_context(|| format!("stat backup file {}", out.display()))?
        .len();

    if ctx.json {
        return print_json(&BackupReport {
            output: out.display().to_string(),
            size_bytes: size,
        });
    }

    println!("Backup written to {}", out.display());
    Ok(())
}
