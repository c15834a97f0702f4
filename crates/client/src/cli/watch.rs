//! Watch CLI command.

use chrono::NaiveDate;
use clap::Parser;

/// Re-print a week every time the cache reports a change, until Ctrl+C.
#[derive(Debug, Parser)]
pub struct WatchCommand {
    /// Any date within the week (defaults to today).
    #[arg(long)]
    pub date: Option<NaiveDate>,
}
