// In app/src/main.rs

use anyhow::{Context, Result};
use api_client::{CandleProvider, SyntheticFeed};
use app_config::Settings;
use clap::{Args, Parser, Subcommand};
use core_types::Interval;
use engine::{ChartSession, LoadOutcome};
use indicator::Recompute;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::prelude::*;

mod panel;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A volatility-band trend signal for Binance Futures.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Loads a chart once and prints the current signal.
    Analyze(ChartArgs),

    /// Loads a chart and keeps refreshing it until Ctrl-C.
    Watch {
        #[command(flatten)]
        chart: ChartArgs,

        /// Seconds between refreshes (defaults to `chart.refresh_secs`).
        #[arg(long)]
        every: Option<u64>,
    },

    /// Prints the share message for the current signal as JSON.
    Share(ChartArgs),

    /// Lists the symbols from the ticker file.
    Symbols {
        /// Only show symbols whose name contains this text (e.g. "eth").
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// The trading symbol to chart (e.g., "BTCUSDT").
    #[arg(short, long)]
    symbol: Option<String>,

    /// The candle interval (1m, 5m, 15m, 30m, 1h or 4h).
    #[arg(short, long)]
    interval: Option<Interval>,

    /// Use generated candles instead of calling Binance.
    #[arg(long)]
    offline: bool,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments.
    let cli = Cli::parse();

    let settings = app_config::load_settings().context("Failed to load configuration")?;

    let level = tracing::Level::from_str(&settings.app.log_level).unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new()
            .with_target("hyper_util", tracing::Level::WARN) // Connection pool chatter
            .with_target("reqwest", tracing::Level::WARN)
            .with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Starting Anomal application");

    // Match on the parsed command and call the appropriate handler.
    match cli.command {
        Commands::Analyze(chart) => {
            handle_analyze(&settings, chart).await?;
        }
        Commands::Watch { chart, every } => {
            let every = every.unwrap_or(settings.chart.refresh_secs);
            handle_watch(&settings, chart, Duration::from_secs(every.max(1))).await?;
        }
        Commands::Share(chart) => {
            handle_share(&settings, chart).await?;
        }
        Commands::Symbols { search } => {
            handle_symbols(&settings, search.as_deref());
        }
    }

    tracing::info!("Anomal application has finished successfully.");

    Ok(())
}

// --- Chart Setup ---

/// Resolves symbol and interval, picks the candle source and loads the chart.
/// Returns the session and the name of the source the candles came from.
async fn open_chart(settings: &Settings, args: ChartArgs) -> Result<(ChartSession, &'static str)> {
    let symbols = app_config::load_symbols(&settings.chart.tickers_path);
    let requested = args.symbol.or_else(|| settings.chart.default_symbol.clone());
    let symbol = app_config::select_symbol(&symbols, requested.as_deref())
        .context("The symbol list is empty")?;
    let interval = args.interval.unwrap_or(settings.chart.default_interval);

    let provider: Box<dyn CandleProvider> = if args.offline {
        Box::new(SyntheticFeed::new())
    } else {
        Box::new(api_client::new(&settings.binance)?)
    };

    let mut session = ChartSession::new(provider, settings.chart.min_candles);
    let source = match session.load(&symbol, interval).await {
        LoadOutcome::Loaded { source, recompute } => {
            tracing::info!(symbol = %symbol, %interval, source, ?recompute, "Chart loaded.");
            source
        }
        LoadOutcome::Unchanged => "cached",
    };

    Ok((session, source))
}

// --- Subcommand Logic ---

async fn handle_analyze(settings: &Settings, args: ChartArgs) -> Result<()> {
    let (session, source) = open_chart(settings, args).await?;
    let report = session.report().context("No chart loaded")?;
    println!("{}", panel::render(&report, source));
    Ok(())
}

async fn handle_watch(settings: &Settings, args: ChartArgs, every: Duration) -> Result<()> {
    let (mut session, source) = open_chart(settings, args).await?;
    if let Some(report) = session.report() {
        println!("{}", panel::render(&report, source));
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C.");
            std::future::pending::<()>().await;
        }
    };

    let mut stop_reported = session.state().stop_loss_hit;
    engine::watch(&mut session, every, shutdown, |session, outcome| {
        let Some(report) = session.report() else {
            return;
        };
        let stop_hit = report.state.stop_loss_hit;
        if matches!(outcome, Recompute::Triggered(_)) || stop_hit != stop_reported {
            println!("{}", panel::render(&report, source));
        } else {
            println!("{}", panel::status_line(&report, outcome));
        }
        stop_reported = stop_hit;
    })
    .await
}

async fn handle_share(settings: &Settings, args: ChartArgs) -> Result<()> {
    let (session, _) = open_chart(settings, args).await?;
    let report = session.report().context("No chart loaded")?;
    if !report.state.has_signal() {
        anyhow::bail!("No signal to share for {} {}", report.symbol, report.interval);
    }
    let payload = serde_json::to_string_pretty(&report.share_payload())?;
    println!("{payload}");
    Ok(())
}

fn handle_symbols(settings: &Settings, search: Option<&str>) {
    let symbols = app_config::load_symbols(&settings.chart.tickers_path);
    let matches = app_config::filter_symbols(&symbols, search.unwrap_or(""));
    if matches.is_empty() {
        println!("No symbols found");
        return;
    }
    for symbol in matches {
        println!("{:<12} {}", symbol.0, symbol.display_name());
    }
}
