mod commands;
mod error;
mod storage;

use anyhow::{Context as _, Result};
use branched_config as config;
use branched_config::StorageBackend;
use branched_core::Waitlist;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{backup, completions, signup, waitlist, Context};
use crate::error::{exit_code_for, report_error};

#[derive(Debug, Parser)]
#[command(name = "branched", version, about = "branched.chat waitlist CLI")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database or JSON file holding the waitlist
    #[arg(long, global = true)]
    data_path: Option<PathBuf>,
    /// Storage backend: sqlite, file or memory
    #[arg(long, global = true)]
    backend: Option<StorageBackend>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add an email address to the waitlist
    Join(waitlist::JoinArgs),
    /// Report whether an address is already registered
    Check(waitlist::CheckArgs),
    List(waitlist::ListArgs),
    /// Interactive signup form reading addresses from stdin
    Signup(signup::SignupArgs),
    Backup(backup::BackupArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        data_path,
        backend,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let mut app_config =
                config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }
            if let Some(backend) = backend {
                app_config.storage.backend = backend;
            }

            let opened = storage::open(&app_config.storage, data_path)?;
            let waitlist = Waitlist::new(opened.waitlist(&app_config.storage.key))
                .with_policy(app_config.waitlist.lookup_policy)
                .with_success_message(app_config.waitlist.success_message.clone());
            debug!(
                backend = %opened.backend(),
                key = %app_config.storage.key,
                policy = ?waitlist.policy(),
                "waitlist ready"
            );

            let ctx = Context {
                waitlist: &waitlist,
                storage: &opened,
                json,
            };

            match command {
                Command::Join(args) => waitlist::join(&ctx, args),
                Command::Check(args) => waitlist::check(&ctx, args),
                Command::List(args) => waitlist::list(&ctx, args),
                Command::Signup(args) => signup::signup(&ctx, args),
                Command::Backup(args) => backup::backup(&ctx, args),
                Command::Completions(_) => {
                    unreachable!("completions command handled before storage initialization")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
