//! Range CLI command.

use chrono::NaiveDateTime;
use clap::Parser;

/// Fetch appointments for an arbitrary window.
#[derive(Debug, Parser)]
pub struct RangeCommand {
    /// Window start, e.g. 2024-03-11T00:00:00.
    #[arg(long)]
    pub start: NaiveDateTime,

    /// Window end, e.g. 2024-03-17T23:59:59.
    #[arg(long)]
    pub end: NaiveDateTime,
}
