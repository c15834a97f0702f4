//! CLI command definitions.

pub mod range;
pub mod watch;
pub mod week;

use clap::{Parser, Subcommand, ValueEnum};

use crate::client::DEFAULT_BASE_URL;

/// Browse CRM appointments week by week through the agenda cache.
#[derive(Debug, Parser)]
#[command(name = "agenda-client")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// CRM base URL.
    #[arg(long, env = "AGENDA_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Serve generated demo appointments instead of calling the CRM.
    #[arg(long)]
    pub demo: bool,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output and logs below warnings.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the appointments of one week.
    Week(week::WeekCommand),
    /// Fetch an arbitrary date range.
    Range(range::RangeCommand),
    /// Re-print a week whenever the cache changes.
    Watch(watch::WatchCommand),
}
