use crate::commands::Context;
use crate::error::aborted;
use anyhow::{Context as _, Result};
use branched_core::{copy, SubmissionStatus, WaitlistForm};
use clap::Args;
use std::io::{self, BufRead, Write};
use tracing::debug;

#[derive(Debug, Args)]
pub struct SignupArgs {}

/// Drives one form instance from stdin. Each line replaces the input and submits it.
pub fn signup(ctx: &Context<'_>, _args: SignupArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut form = WaitlistForm::new();

    if !ctx.json {
        writeln!(stdout, "{}", copy::TAGLINE)?;
    }

    let mut lines = stdin.lock().lines();
    loop {
        if !ctx.json {
            write!(stdout, "email [{}]: ", copy::PLACEHOLDER)?;
            stdout.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.with_context(|| "read signup input")?;

        form.edit(line.trim())?;
        let status = form.submit(ctx.waitlist)?;
        debug!(status = status.label(), "form status");
        render_status(&mut stdout, status, ctx.json)?;

        if form.is_complete() {
            return Ok(());
        }
    }

    if !ctx.json {
        writeln!(stdout)?;
    }
    Err(aborted("input closed before joining the waitlist"))
}

fn render_status(out: &mut impl Write, status: &SubmissionStatus, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer(&mut *out, status)?;
        writeln!(out)?;
        return Ok(());
    }
    match status {
        SubmissionStatus::Idle | SubmissionStatus::Loading => {}
        SubmissionStatus::Success { message } => writeln!(out, "{}", message)?,
        SubmissionStatus::Error { message } => writeln!(out, "! {}", message)?,
    }
    Ok(())
}
