//! next-departure CLI
//!
//! Looks up the next departure at a NaPTAN stop via the Traveline NextBuses
//! SIRI service.

#![allow(clippy::print_stdout)]

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use application::{DepartureInfo, DeparturePort, DepartureService};
use chrono::{DateTime, FixedOffset, Local};
use clap::Parser;
use integration_traveline::HttpTravelineClient;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;

/// Next departure lookup
#[derive(Parser)]
#[command(name = "next-departure")]
#[command(author, version, about = "Show the next departure at a public transport stop", long_about = None)]
struct Cli {
    /// NaPTAN stop code (e.g. 020035811)
    stop_code: String,

    /// Reference time as RFC3339 (defaults to now)
    #[arg(long, value_parser = parse_reference_time)]
    at: Option<DateTime<FixedOffset>>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the SIRI endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Traveline requestor reference
    #[arg(long, env = "TRAVELINE_REQUESTOR_REF")]
    requestor_ref: Option<String>,

    /// Traveline API key
    #[arg(long, env = "TRAVELINE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Print the departure as JSON
    #[arg(long)]
    json: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn parse_reference_time(value: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(value).map_err(|e| format!("invalid RFC3339 time: {e}"))
}

/// Apply command-line overrides on top of the loaded configuration
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(endpoint) = &cli.endpoint {
        config.traveline.endpoint.clone_from(endpoint);
    }
    if let Some(requestor_ref) = &cli.requestor_ref {
        config.traveline.requestor_ref.clone_from(requestor_ref);
    }
    if let Some(api_key) = &cli.api_key {
        config.traveline.api_key.clone_from(api_key);
    }
}

/// Render a departure for the terminal
fn render_departure(departure: &DepartureInfo) -> String {
    let mut out = format!(
        "🚌 {} {} → {}\n   Scheduled: {}",
        departure.vehicle_mode,
        departure.line_name,
        departure.direction_name,
        departure.aimed_departure_time.format("%H:%M:%S")
    );

    if let Some(expected) = departure.expected_departure_time {
        out.push_str(&format!("\n   Expected:  {}", expected.format("%H:%M:%S")));
    }

    match departure.delay_minutes() {
        Some(0) => out.push_str("\n   On time"),
        Some(delay) if delay > 0 => out.push_str(&format!("\n   ⚠️ {delay} min late")),
        Some(delay) => out.push_str(&format!("\n   {} min early", delay.abs())),
        None => {},
    }

    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(
            cli.verbose,
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = AppConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    debug!(traveline = ?config.traveline, "Configuration loaded");

    let client = HttpTravelineClient::new(&config.traveline)
        .context("Failed to initialize Traveline client")?;
    let service = DepartureService::new(Arc::new(client));

    let when = cli.at.unwrap_or_else(|| Local::now().fixed_offset());
    info!(stop_code = %cli.stop_code, %when, "Looking up next departure");

    match service.next_departure(&cli.stop_code, when).await {
        Ok(departure) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&departure)?);
            } else {
                println!("{}", render_departure(&departure));
            }
        },
        Err(e) if e.is_no_departures() => {
            println!("No upcoming departures at stop {}", cli.stop_code);
        },
        Err(e) => {
            let hint = if e.is_retryable() {
                " (service unavailable, try again later)"
            } else {
                ""
            };
            return Err(anyhow::Error::new(e).context(format!(
                "Failed to get next departure for stop {}{hint}",
                cli.stop_code
            )));
        },
    }

    Ok(())
}
