use anyhow::Error;
use branched_config::ConfigError;
use branched_core::{CoreError, FormError, SubmitError, SubmitErrorKind};
use branched_store::error::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_ALREADY_REGISTERED: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("aborted: {0}")]
    Aborted(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn aborted(message: impl Into<String>) -> Error {
    CliError::Aborted(message.into()).into()
}

/// Wraps a rejected submission so the short report shows the form's message.
pub fn submit_failure(err: SubmitError) -> Error {
    let message = err.user_message();
    Error::new(err).context(message)
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    ExitCode::from(exit_status_for(err))
}

fn exit_status_for(err: &Error) -> u8 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::Aborted(_) => EXIT_FAILURE,
            };
        }
        if let Some(submit_err) = cause.downcast_ref::<SubmitError>() {
            return submit_exit_code(submit_err.kind());
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return store_exit_code(store_err);
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return config_exit_code(config_err);
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return EXIT_INVALID_INPUT;
        }
        if let Some(_form_err) = cause.downcast_ref::<FormError>() {
            return EXIT_FAILURE;
        }
    }
    EXIT_FAILURE
}

fn submit_exit_code(kind: SubmitErrorKind) -> u8 {
    match kind {
        SubmitErrorKind::InvalidFormat => EXIT_INVALID_INPUT,
        SubmitErrorKind::AlreadyRegistered => EXIT_ALREADY_REGISTERED,
        SubmitErrorKind::Persistence => EXIT_FAILURE,
    }
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::InvalidDataPath | StoreErrorKind::InvalidBackupPath => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::CorruptEntry
        | StoreErrorKind::CorruptFile
        | StoreErrorKind::Json
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidBackend(_)
        | ConfigError::InvalidStorageKey(_)
        | ConfigError::InvalidStoragePath(_)
        | ConfigError::EmptySuccessMessage
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}
