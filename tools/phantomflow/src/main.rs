//! PhantomFlow synthetic traffic generator
//!
//! Fires randomized analytics click events at a collector endpoint from a
//! pool of concurrent workers, bounded by request count and/or duration.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use phantomflow_engine::diagnostics::{install_prometheus, spawn_diagnostics, DiagnosticsState};
use phantomflow_engine::{default_worker_count, LoadGenerator, RunConfig, RunPlan};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str =
    "Usage: phantomflow [ENDPOINT] [-n total_requests] [-d duration_seconds] [-c concurrent_workers]";

const USAGE_EXIT_CODE: i32 = 1;

#[derive(Debug, Parser)]
#[command(name = "phantomflow")]
#[command(about = "Concurrent synthetic click-event traffic generator")]
#[command(version)]
struct Cli {
    /// Target collector URL
    #[arg(value_name = "ENDPOINT")]
    endpoint: Option<String>,

    /// Total number of requests (0 for duration-based)
    #[arg(short = 'n', value_name = "TOTAL_REQUESTS", default_value_t = 0)]
    total_requests: u64,

    /// Duration in seconds (0 for request-based)
    #[arg(short = 'd', value_name = "DURATION_SECONDS", default_value_t = 0)]
    duration: u64,

    /// Number of concurrent workers (default: CPU cores * 2)
    #[arg(short = 'c', value_name = "CONCURRENT_WORKERS")]
    workers: Option<usize>,

    /// Optional TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Explicit base seed for worker generators
    #[arg(long)]
    seed: Option<u64>,

    /// Do not start the local diagnostic endpoint
    #[arg(long, default_value_t = false)]
    no_diagnostics: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let endpoint = match target_endpoint(&cli) {
        Ok(endpoint) => endpoint,
        Err(usage) => {
            println!("{usage}");
            std::process::exit(USAGE_EXIT_CODE);
        }
    };

    if let Err(err) = run(cli, endpoint).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

/// The collector URL, or the usage line when none was given.
fn target_endpoint(cli: &Cli) -> std::result::Result<String, &'static str> {
    cli.endpoint.clone().ok_or(USAGE)
}

async fn run(cli: Cli, endpoint: String) -> Result<()> {
    let mut config = RunConfig::load(cli.config.as_deref()).context("load configuration")?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.no_diagnostics {
        config.diagnostics.enabled = false;
    }

    init_logging(&config)?;
    debug!(?config, "configuration loaded");

    let plan = RunPlan {
        endpoint,
        total_requests: cli.total_requests,
        duration: Duration::from_secs(cli.duration),
        workers: cli.workers.unwrap_or_else(default_worker_count),
    };
    let generator = LoadGenerator::new(plan, &config).context("invalid run configuration")?;

    if config.diagnostics.enabled {
        let state = DiagnosticsState::new(
            generator.plan().endpoint.clone(),
            generator.plan().workers,
            generator.counters(),
            install_prometheus(),
        );
        spawn_diagnostics(config.diagnostics.listen.clone(), state);
    }

    println!("{}", banner(generator.plan()));

    let summary = generator.run().await.context("load run aborted")?;
    println!("\n{summary}");
    Ok(())
}

fn banner(plan: &RunPlan) -> String {
    let mut lines = vec![
        format!("Target: {}", plan.endpoint),
        format!("Workers: {}", plan.workers),
    ];
    if plan.total_requests > 0 {
        lines.push(format!("Total Requests: {}", plan.total_requests));
    }
    if !plan.duration.is_zero() {
        lines.push(format!("Duration: {} seconds", plan.duration.as_secs()));
    }
    if plan.total_requests == 0 && plan.duration.is_zero() {
        lines.push("Bound: none (runs until interrupted)".to_string());
    }
    lines.join("\n")
}

fn init_logging(config: &RunConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let installed = if config.log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}
