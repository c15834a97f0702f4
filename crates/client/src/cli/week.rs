//! Week CLI command.

use chrono::NaiveDate;
use clap::Parser;

/// Show the appointments of the week containing a date.
#[derive(Debug, Parser)]
pub struct WeekCommand {
    /// Any date within the week (defaults to today).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Wait this long after loading so prefetching can warm nearby weeks.
    #[arg(long, default_value_t = 0)]
    pub settle_ms: u64,
}
