use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod calendar;
mod config;
mod cost;
mod error;
mod export;
mod jitter;
mod logging;
mod models;
mod performance;
mod rating;
mod report;
mod selection;
mod snapshot;
mod usage;

use config::GeneratorConfig;
use export::Dataset;
use selection::DateSelection;
use snapshot::DashboardSnapshot;

#[derive(Parser)]
#[command(name = "dashboard-metrics")]
#[command(about = "Synthetic metrics for the counseling product dashboard", long_about = None)]
struct Cli {
    /// Length of the daily series
    #[arg(long, global = true, default_value_t = config::DEFAULT_DAYS)]
    days: usize,
    /// Length of the monthly series
    #[arg(long, global = true, default_value_t = config::DEFAULT_MONTHS)]
    months: usize,
    /// Seed for the generators; a fresh one is drawn and logged when omitted
    #[arg(long, global = true, env = "DASHBOARD_SEED")]
    seed: Option<u64>,
    /// Treat this day (YYYY-MM-DD) as today
    #[arg(long, global = true, value_parser = config::parse_date)]
    today: Option<NaiveDate>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every generated series as one JSON document
    Generate {
        #[arg(long, default_value = "snapshot.json")]
        out: PathBuf,
    },
    /// Write one series as CSV
    Export {
        /// ratings, evaluations, ab-trend, usage, costs, performance, hourly or alerts
        #[arg(long)]
        dataset: Dataset,
        #[arg(long)]
        out: PathBuf,
    },
    /// Generate a markdown report for one day
    Report {
        /// Day to report on; falls back to the most recent day when outside the series
        #[arg(long, value_parser = config::parse_date)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Print the current alert status and recent alerts
    Alerts,
}

fn main() -> anyhow::Result<()> {
    logging::init_tracing_subscriber();
    let cli = Cli::parse();

    let config = GeneratorConfig::new(cli.days, cli.months, cli.seed, cli.today)
        .context("invalid generator configuration")?;
    let snapshot = DashboardSnapshot::generate(&config);
    tracing::info!(
        seed = snapshot.seed,
        run_id = %snapshot.run_id,
        today = %config.today,
        "generated dashboard snapshot"
    );

    match cli.command {
        Commands::Generate { out } => {
            export::export_json(&snapshot, &out)?;
            println!("Snapshot written to {}.", out.display());
        }
        Commands::Export { dataset, out } => {
            let rows = export::export_csv(&snapshot, dataset, &out)?;
            println!("Wrote {rows} {dataset} rows to {}.", out.display());
        }
        Commands::Report { date, out } => {
            let mut selection = DateSelection::new(config.today);
            if let Some(date) = date {
                selection.select(date);
            }
            let report = report::build_report(&snapshot, &selection)?;
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Alerts => {
            let mut output = String::new();
            report::write_alerts(&mut output, &snapshot.alert_status);
            print!("{output}");
        }
    }

    Ok(())
}
