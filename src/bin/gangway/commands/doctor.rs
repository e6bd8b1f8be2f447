//! Implementation of `gangway doctor`.

use anyhow::Result;

use gangway::ops::{doctor, format_report};

pub fn execute() -> Result<()> {
    let report = doctor();
    print!("{}", format_report(&report));
    Ok(())
}
