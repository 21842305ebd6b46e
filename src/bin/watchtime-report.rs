use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use watchtime::activity::{Identity, Report, WatchReportEngine};
use watchtime::config::Config;
use watchtime::youtube::{Credential, YouTubeClient};

#[derive(Parser)]
#[command(name = "watchtime-report")]
#[command(about = "Print the daily watch-time report for a YouTube account", long_about = None)]
struct Cli {
    /// YouTube access token; without one the report is demo data
    #[arg(long, env = "YOUTUBE_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Seed for the synthetic filler
    #[arg(long)]
    seed: Option<u64>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let mut settings = config.report.engine_settings();
    if cli.seed.is_some() {
        settings.synthetic_seed = cli.seed;
    }

    let client = YouTubeClient::from_config(&config.youtube)
        .context("failed to build YouTube API client")?;
    let engine = WatchReportEngine::new(Arc::new(client), settings);

    let identity = match cli.token {
        Some(token) if !token.trim().is_empty() => Identity::Authenticated(Credential::new(token.trim())),
        _ => Identity::Anonymous,
    };

    let report = engine.get_watch_report(&identity).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }

    Ok(())
}

fn print_table(report: &Report) {
    println!("{}", report.message);
    println!(
        "records: {} (real: {}, demo: {}, mixed: {})",
        report.watch_history.len(),
        report.summary.real_data_count,
        report.summary.is_demo,
        report.summary.is_mixed
    );
    if let Some(ref error) = report.error {
        println!("error: {error}");
    }
    println!();
    println!("{:>4}  {:<10}  {:>7}", "day", "date", "minutes");
    for row in &report.table {
        println!("{:>4}  {:<10}  {:>7}", row.day, row.date.to_string(), row.minutes);
    }
    let total: i64 = report.table.iter().map(|r| r.minutes).sum();
    println!("{:>4}  {:<10}  {:>7}", "", "total", total);
}
