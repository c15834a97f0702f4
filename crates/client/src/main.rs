//! agenda-client CLI entry point.

use std::sync::Arc;
use std::time::Duration;

use agenda::source::mock_data::generate_demo_appointments;
use agenda::{CacheConfig, InMemorySource, WeekCache};
use agenda_client::cli::{Cli, Commands, OutputFormat};
use agenda_client::output::{format_output, format_week_report, pretty, WeekReport};
use agenda_client::CrmClient;
use agenda_core::cache::AppointmentSource;
use chrono::{Local, NaiveDate};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Weeks of demo data generated on each side of today.
const DEMO_WEEKS: i64 = 12;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let default_filter = if cli.quiet {
        "warn"
    } else {
        "agenda=debug,agenda_client=debug"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let today = Local::now().date_naive();
    let source: Arc<dyn AppointmentSource> = if cli.demo {
        tracing::info!("Serving demo appointments");
        Arc::new(InMemorySource::with_appointments(
            generate_demo_appointments(today, DEMO_WEEKS),
        ))
    } else {
        let client = CrmClient::new(&cli.base_url);
        tracing::info!(base_url = client.base_url(), "Using CRM appointment API");
        Arc::new(client)
    };
    let cache = WeekCache::new(source, CacheConfig::from_env());

    match cli.command {
        Commands::Week(week) => {
            cache.select_week(week.date.unwrap_or(today)).await;
            if week.settle_ms > 0 {
                tokio::time::sleep(Duration::from_millis(week.settle_ms)).await;
            }
            println!("{}", format_week_report(&week_report(&cache)?, cli.format));
        }
        Commands::Range(range) => {
            if range.end < range.start {
                anyhow::bail!("--end must not be before --start");
            }
            let events = cache.fetch_by_date_range(range.start, range.end).await;
            if let Some(error) = cache.error() {
                anyhow::bail!(error);
            }
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&events, cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_events(&events)),
            }
        }
        Commands::Watch(watch) => {
            let date = watch.date.unwrap_or(today);
            watch_week(&cache, date, cli.format, cli.quiet).await?;
        }
    }

    cache.shutdown();
    Ok(())
}

fn week_report(cache: &WeekCache) -> anyhow::Result<WeekReport> {
    let week = cache
        .current_week()
        .ok_or_else(|| anyhow::anyhow!("no week selected"))?;
    Ok(WeekReport {
        week,
        appointments: cache.appointments().to_vec(),
        error: cache.error(),
        stats: cache.cache_stats(),
    })
}

async fn watch_week(
    cache: &WeekCache,
    date: NaiveDate,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut changes = cache.subscribe();
    cache.select_week(date).await;
    if !quiet {
        eprintln!("Watching week of {}, press Ctrl+C to stop...", date);
    }

    let mut last_printed = None;
    loop {
        let version = *changes.borrow_and_update();
        if last_printed != Some(version) {
            println!("{}", format_week_report(&week_report(cache)?, format));
            last_printed = Some(version);
        }

        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = signal::ctrl_c() => {
                tracing::info!("Stopping watch");
                return Ok(());
            }
        }
    }
}
