//! pointsctl - Points Cleaner CLI
//!
//! Streams raw sensor samples (one per line) through a points cleaner and
//! writes the cleaned values to stdout.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod config;
mod error;
mod output;
mod stream;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use points_cleaner::PointsCleaner;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{TuningArgs, describe_auto_center, resolve_config};
use crate::error::CliError;
use crate::stream::{StreamOptions, StreamSummary, run_stream};

#[derive(Parser, Debug)]
#[command(name = "pointsctl")]
#[command(about = "Points Cleaner CLI - Clean noisy scalar sensor samples")]
#[command(version)]
#[command(long_about = "
pointsctl reads one raw sample per line (stdin by default), runs each sample
through a consensus-gated points cleaner and prints one cleaned value per
sample. While auto-center is calibrating it prints `pending`.

Parameters come from the built-in defaults, then an optional JSON/YAML config
file, then the individual flags below.
")]
struct Cli {
    /// JSON or YAML cleaner configuration
    #[arg(short, long, env = "POINTSCTL_CONFIG")]
    config: Option<PathBuf>,

    #[command(flatten)]
    tuning: TuningArgs,

    /// Sample file (defaults to stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Emit one JSON object per sample
    #[arg(long)]
    json: bool,

    /// Log and skip unparsable or non-finite samples instead of failing
    #[arg(long)]
    skip_invalid: bool,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("pointsctl={log_level},points_cleaner={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match execute(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            if cli.json {
                output::print_error_json(&e, code);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(code)
        }
    }
}

fn execute(cli: &Cli) -> Result<StreamSummary> {
    let config = resolve_config(cli.config.as_deref(), &cli.tuning)?;
    let mut cleaner = PointsCleaner::from_config(&config).map_err(CliError::from)?;
    info!(
        window_size = config.window_size,
        required_matches = cleaner.required_matches(),
        auto_center = %describe_auto_center(&config),
        "cleaner ready"
    );

    let options = StreamOptions {
        json: cli.json,
        skip_invalid: cli.skip_invalid,
    };

    let stdout = io::stdout();
    let mut writer = io::BufWriter::new(stdout.lock());

    let summary = match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .map_err(CliError::from)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            run_stream(&mut cleaner, BufReader::new(file), &mut writer, options)?
        }
        None => run_stream(&mut cleaner, io::stdin().lock(), &mut writer, options)?,
    };

    info!(
        processed = summary.processed,
        pending = summary.pending,
        skipped = summary.skipped,
        "done"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["pointsctl"])?;
        assert!(cli.config.is_none());
        assert!(cli.input.is_none());
        assert!(!cli.json);
        assert!(!cli.skip_invalid);
        assert_eq!(cli.verbose, 0);
        assert!(cli.tuning.window_size.is_none());
        Ok(())
    }

    #[test]
    fn parse_tuning_flags() -> TestResult {
        let cli = Cli::try_parse_from([
            "pointsctl",
            "--window-size",
            "8",
            "--match-fraction",
            "0.75",
            "--auto-center-lead-in",
            "5",
            "--json",
            "-vv",
        ])?;
        assert_eq!(cli.tuning.window_size, Some(8));
        assert_eq!(cli.tuning.match_fraction, Some(0.75));
        assert_eq!(cli.tuning.auto_center_lead_in, Some(5));
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn parse_rejects_non_numeric_window() {
        let result = Cli::try_parse_from(["pointsctl", "--window-size", "many"]);
        assert!(result.is_err());
    }
}
