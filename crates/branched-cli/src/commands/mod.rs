use crate::storage::OpenedStorage;
use anyhow::Result;
use branched_core::{Waitlist, WaitlistStorage};
use serde::Serialize;
use std::io::{self, Write};

pub mod backup;
pub mod completions;
pub mod signup;
pub mod waitlist;

pub struct Context<'a> {
    pub waitlist: &'a Waitlist<Box<dyn WaitlistStorage + 'a>>,
    pub storage: &'a OpenedStorage,
    pub json: bool,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
