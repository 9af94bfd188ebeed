use std::io::{self, IsTerminal, Read};

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use incident_triage::{
    config::{Config, LogFormat},
    triage::{validate_incident, Pipeline, ProgressObserver, StageEvent, StageStatus},
};

/// Network root-cause analyst: classify an incident, retrieve knowledge, and
/// generate a report.
#[derive(Parser, Debug)]
#[command(name = "incident-triage", version, about)]
struct Cli {
    /// Incident description (read from stdin when omitted)
    incident: Option<String>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Do not print stage progress
    #[arg(long, short)]
    quiet: bool,
}

/// Prints one progress line per stage to stderr
struct StderrProgress;

impl ProgressObserver for StderrProgress {
    fn on_stage(&self, event: &StageEvent) {
        let marker = match event.status {
            StageStatus::Completed => "ok",
            StageStatus::Failed => "FAILED",
        };
        eprintln!(
            "[{}] {:<12} {:<6} {}",
            event.timestamp.format("%H:%M:%S%.3f"),
            event.stage,
            marker,
            event.summary
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.generator.model,
        "Incident triage starting"
    );

    let raw = match cli.incident {
        Some(text) => text,
        None => read_stdin()?,
    };

    let incident = match validate_incident(&raw) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let pipeline = match Pipeline::from_config(&config) {
        Ok(p) => p,
        Err(e) => {
            error!(error = %e, "Failed to initialize generation client");
            return Err(e.into());
        }
    };

    let report = if cli.quiet {
        pipeline.run(incident).await
    } else {
        pipeline.run_with_observer(incident, &StderrProgress).await
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.result().is_success() {
        println!("### Analysis Report ({})\n", report.category());
        println!("{}", report.render());
    } else {
        eprintln!("{}", report.render());
    }

    if !report.result().is_success() {
        std::process::exit(2);
    }

    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Describe the network incident, then press Ctrl-D:");
    }
    let mut buf = String::new();
    stdin.read_to_string(&mut buf)?;
    Ok(buf)
}

/// Initialize tracing/logging
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
