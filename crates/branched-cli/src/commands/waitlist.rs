use crate::commands::{print_json, Context};
use crate::error::submit_failure;
use anyhow::Result;
use branched_core::{SubmitError, SubmitErrorKind, WaitlistEmail};
use clap::Args;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Args)]
pub struct JoinArgs {
    pub email: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    pub email: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum SubmitReport<'a> {
    Success {
        email: &'a str,
        message: &'a str,
    },
    Error {
        kind: SubmitErrorKind,
        message: &'a str,
    },
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    email: &'a str,
    registered: bool,
}

pub fn join(ctx: &Context<'_>, args: JoinArgs) -> Result<()> {
    let registration = ctx
        .waitlist
        .submit(&args.email)
        .map_err(|err| failure(ctx, err))?;

    if ctx.json {
        return print_json(&SubmitReport::Success {
            email: registration.email.as_str(),
            message: &registration.message,
        });
    }

    println!("{}", registration.message);
    Ok(())
}

pub fn check(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let email = WaitlistEmail::parse(&args.email)
        .map_err(|err| failure(ctx, SubmitError::from(err)))?;
    let registered = ctx
        .waitlist
        .contains(email.as_str())
        .map_err(|err| failure(ctx, err))?;

    if ctx.json {
        return print_json(&CheckReport {
            email: email.as_str(),
            registered,
        });
    }

    if registered {
        println!("{} is on the waitlist", email);
    } else {
        println!("{} is not on the waitlist", email);
    }
    Ok(())
}

pub fn list(ctx: &Context<'_>, _args: ListArgs) -> Result<()> {
    let emails = ctx
        .waitlist
        .registered()
        .map_err(|err| failure(ctx, err))?;

    if ctx.json {
        return print_json(&emails);
    }

    if emails.is_empty() {
        println!("no registrations");
        return Ok(());
    }

    for email in &emails {
        println!("{}", email);
    }
    println!("{} registered", emails.len());
    Ok(())
}

/// Emits the JSON error report when asked, then hands back the error for the exit code.
fn failure(ctx: &Context<'_>, err: SubmitError) -> anyhow::Error {
    if ctx.json {
        let report = SubmitReport::Error {
            kind: err.kind(),
            message: err.user_message(),
        };
        if let Err(print_err) = print_json(&report) {
            warn!(error = %print_err, "could not write error report");
        }
    }
    submit_failure(err)
}
