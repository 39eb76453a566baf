//! algoscan command line
//!
//! - `scan`: one-time ranked scan of the configured universe
//! - `monitor`: repeated scans with alerts for the best opportunities
//! - `analyse`: technical analysis of a single ticker, optionally with an advisor

use algoscan::common::time::parse_duration;
use algoscan::config::{self, ScanConfig};
use algoscan::core::{CallbackError, MarketScanner, SymbolAnalyzer, WatchList, WatchScheduler};
use algoscan::logging;
use algoscan::metrics::Metrics;
use algoscan::output::{Printer, PrinterExt, TerminalPrinter, Tone};
use algoscan::services::market_data::{MarketDataProvider, Timeframe};
use algoscan::services::{AdvisorConfig, ChartServiceClient, GeminiAdvisor};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const MIN_REFRESH: Duration = Duration::from_secs(5);
const SCAN_TOP_N: usize = 10;

#[derive(Parser, Debug)]
#[command(name = "algoscan")]
#[command(version)]
#[command(about = "Technical-analysis market scanner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    #[value(alias = "once", alias = "one-time")]
    Onetime,
    #[value(alias = "continue", alias = "cont")]
    Continuous,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the market once and print the ranked results
    Scan {
        /// Path to the scan configuration
        #[arg(short, long)]
        config: PathBuf,

        /// How many results to print
        #[arg(short = 'n', long, default_value_t = SCAN_TOP_N)]
        top: usize,
    },

    /// Monitor the market, rescanning on an interval
    Monitor {
        /// Path to the scan configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Scan refresh rate (e.g. 30s, 10m, 1h)
        #[arg(short, long, default_value = "10m", value_parser = parse_duration)]
        refresh: Duration,

        /// How long the monitor should run for
        #[arg(short, long, default_value = "1h", value_parser = parse_duration)]
        life: Duration,
    },

    /// Analyse a single ticker
    #[command(alias = "analysis")]
    Analyse {
        /// Path to the scan configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Ticker to analyse
        #[arg(short, long)]
        ticker: String,

        /// Time frame of the series (1d, 1m, 3m, 6m, 1y, 3y, 5y)
        #[arg(short = 'f', long, default_value = "1d")]
        timeframe: Timeframe,

        /// Run once or keep refreshing
        #[arg(short, long, value_enum, default_value_t = Mode::Onetime)]
        mode: Mode,

        /// Refresh rate in continuous mode
        #[arg(short, long, default_value = "10m", value_parser = parse_duration)]
        refresh: Duration,

        /// How long continuous mode should run for
        #[arg(short, long, default_value = "1h", value_parser = parse_duration)]
        life: Duration,

        /// Path to the advisor configuration
        #[arg(short, long)]
        assistant: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let env = config::get_environment();
    info!(environment = %env, "Starting algoscan");

    match cli.command {
        Commands::Scan { config, top } => run_scan(config, top).await,
        Commands::Monitor {
            config,
            refresh,
            life,
        } => run_monitor(config, refresh, life).await,
        Commands::Analyse {
            config,
            ticker,
            timeframe,
            mode,
            refresh,
            life,
            assistant,
        } => run_analyse(config, ticker, timeframe, mode, refresh, life, assistant).await,
    }
}

fn load_config(path: &Path) -> Result<ScanConfig> {
    let cfg = ScanConfig::load(path)
        .with_context(|| format!("failed to load configuration from {}", path.display()))?;
    info!(
        strategies = cfg.strategies.len(),
        universe = cfg.universe.len(),
        "Configuration loaded"
    );
    Ok(cfg)
}

fn market_data() -> Result<Arc<dyn MarketDataProvider>> {
    let client = ChartServiceClient::new().context("failed to build market data client")?;
    Ok(Arc::new(client))
}

fn clamp_refresh(refresh: Duration, printer: &dyn Printer) -> Duration {
    if refresh < MIN_REFRESH {
        warn!(
            requested = ?refresh,
            "Refresh rate too low, defaulting to {:?}", MIN_REFRESH
        );
        printer.colored(
            Tone::Caution,
            format!(
                "Refresh rate of {:?} is too low, defaulting to {:?}",
                refresh, MIN_REFRESH
            ),
        );
        return MIN_REFRESH;
    }
    refresh
}

/// Cancel `token` on ctrl-c.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down...");
            token.cancel();
        }
    });
}

/// Keep `scheduler` running for `life`, or until interrupted.
async fn run_for(scheduler: &WatchScheduler, life: Duration, cancel: &CancellationToken) -> Result<()> {
    scheduler
        .start()
        .await
        .map_err(|e| anyhow!("failed to start scheduler: {}", e))?;

    tokio::select! {
        _ = tokio::time::sleep(life) => info!(life = ?life, "Lifespan elapsed"),
        _ = cancel.cancelled() => {}
    }

    cancel.cancel();
    scheduler.stop().await;
    Ok(())
}

async fn run_scan(config_path: PathBuf, top: usize) -> Result<()> {
    let cfg = load_config(&config_path)?;
    let printer: Arc<dyn Printer> = Arc::new(TerminalPrinter::new());
    let metrics = Metrics::new()?;
    let scanner = MarketScanner::new(market_data()?, &cfg, printer.clone()).with_metrics(metrics.clone());

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    printer.line("=== ONE-TIME MARKET SCAN ===");
    let scores = scanner.scan_market(&cancel).await?;
    scanner.generate_report(&scores, top);

    debug!(metrics = %metrics.render(), "Scan metrics");
    Ok(())
}

async fn run_monitor(config_path: PathBuf, refresh: Duration, life: Duration) -> Result<()> {
    let cfg = load_config(&config_path)?;
    let printer: Arc<dyn Printer> = Arc::new(TerminalPrinter::new().with_clear_on_reset(true));
    let refresh = clamp_refresh(refresh, printer.as_ref());
    let metrics = Metrics::new()?;
    let scanner = Arc::new(
        MarketScanner::new(market_data()?, &cfg, printer.clone()).with_metrics(metrics.clone()),
    );
    let watchlist = Arc::new(WatchList::new(scanner, printer.clone()));

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    printer.colored(
        Tone::Caution,
        format!("Starting market monitoring (updates every {:?})", refresh),
    );
    // first cycle right away, the scheduler takes over from the next interval
    if let Err(e) = watchlist.refresh(&cancel).await {
        warn!(error = %e, "Initial scan failed");
    }

    let tick_watchlist = watchlist.clone();
    let scheduler = WatchScheduler::new(
        refresh,
        WatchScheduler::callback(move |token| {
            let watchlist = tick_watchlist.clone();
            async move {
                watchlist.refresh(&token).await?;
                Ok::<(), CallbackError>(())
            }
        }),
    )
    .map_err(|e| anyhow!(e))?;

    run_for(&scheduler, life, &cancel).await?;
    printer.line("Stopping market monitoring");

    info!(latest = watchlist.latest().await.len(), "Monitor stopped");
    debug!(metrics = %metrics.render(), "Monitor metrics");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn run_analyse(
    config_path: PathBuf,
    ticker: String,
    timeframe: Timeframe,
    mode: Mode,
    refresh: Duration,
    life: Duration,
    assistant: Option<PathBuf>,
) -> Result<()> {
    let cfg = load_config(&config_path)?;
    let continuous = mode == Mode::Continuous;
    let printer: Arc<dyn Printer> =
        Arc::new(TerminalPrinter::new().with_clear_on_reset(continuous));

    let mut analyzer = SymbolAnalyzer::new(market_data()?, cfg.strategies.clone(), printer.clone())
        .with_max_risk(cfg.filters.max_risk);
    if let Some(path) = assistant {
        let advisor_cfg = AdvisorConfig::load(&path)
            .with_context(|| format!("failed to load advisor configuration from {}", path.display()))?;
        analyzer = analyzer.with_advisor(Arc::new(GeminiAdvisor::new(advisor_cfg)));
    }
    let ticker = ticker.to_uppercase();

    if !continuous {
        analyzer.analyse(&ticker, timeframe).await?;
        return Ok(());
    }

    let refresh = clamp_refresh(refresh, printer.as_ref());
    printer.colored(
        Tone::Caution,
        format!("Starting market analysis for {} (updates every {:?})", ticker, refresh),
    );

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let analyzer = Arc::new(analyzer);
    if let Err(e) = analyzer.analyse(&ticker, timeframe).await {
        warn!(ticker = %ticker, error = %e, "Initial analysis failed");
        printer.colored(Tone::Negative, format!("Analysis failed: {}", e));
    }

    let scheduler = WatchScheduler::new(
        refresh,
        WatchScheduler::callback(move |_token| {
            let analyzer = analyzer.clone();
            let ticker = ticker.clone();
            async move {
                analyzer.analyse(&ticker, timeframe).await?;
                Ok::<(), CallbackError>(())
            }
        }),
    )
    .map_err(|e| anyhow!(e))?;

    run_for(&scheduler, life, &cancel).await
}
