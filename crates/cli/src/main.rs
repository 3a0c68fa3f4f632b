//! VisReg CLI - Main Entry Point
//!
//! Thin command-line front-end over the comparator: compare a capture
//! against its baseline, update a baseline explicitly, and manage the
//! store. A failed comparison exits non-zero so test harnesses can
//! assert on it.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use visreg_core::{BaselineStore, Comparator, ComparisonResult, VisualConfig};

/// VisReg - Screenshot Visual Regression Comparison
#[derive(Parser)]
#[command(name = "visreg")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Baseline directory (overrides the config file)
    #[arg(long, global = true)]
    baseline_dir: Option<PathBuf>,

    /// Emit results as JSON instead of human-readable text
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a capture against its named baseline
    Compare {
        /// Logical baseline name (e.g. homepage_layout)
        name: String,

        /// Path to the captured PNG
        capture: PathBuf,

        /// Acceptance threshold override (0.0 - 1.0)
        #[arg(long)]
        threshold: Option<f64>,
    },

    /// Overwrite the stored baseline for a name
    Update {
        /// Logical baseline name
        name: String,

        /// Path to the capture to promote to baseline
        capture: PathBuf,
    },

    /// List stored baseline names
    List,

    /// Delete rendered diff images
    Clean,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .init();

    let mut config = match &cli.config {
        Some(path) => VisualConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => VisualConfig::default(),
    };
    if let Some(dir) = &cli.baseline_dir {
        config.baseline_dir = dir.clone();
    }
    debug!("Using baseline directory {}", config.baseline_dir.display());

    let store = BaselineStore::open(&config.baseline_dir)?;
    let comparator = Comparator::new(store, config)?;

    match cli.command {
        Commands::Compare {
            name,
            capture,
            threshold,
        } => {
            let bytes = std::fs::read(&capture)
                .with_context(|| format!("failed to read capture {}", capture.display()))?;
            let result = match threshold {
                Some(t) => comparator.compare_with_threshold(&name, &bytes, t)?,
                None => comparator.compare(&name, &bytes)?,
            };

            print_result(&result, cli.json)?;
            if !result.passed {
                std::process::exit(1);
            }
        }
        Commands::Update { name, capture } => {
            comparator.update_baseline_from_file(&name, &capture)?;
            if !cli.json {
                println!("Baseline '{}' updated from {}", name, capture.display());
            }
        }
        Commands::List => {
            let names = comparator.store().list()?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&names)?);
            } else {
                for name in names {
                    println!("{}", name);
                }
            }
        }
        Commands::Clean => {
            comparator.clean_diffs()?;
            if !cli.json {
                println!("Diff images cleaned");
            }
        }
    }

    Ok(())
}

fn print_result(result: &ComparisonResult, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if result.baseline_created {
        println!("✓ {} - baseline created", result.name);
        return Ok(());
    }

    let marker = if result.passed { "✓" } else { "✗" };
    println!(
        "{} {} - similarity {:.4} (threshold {:.2}), {:.2}% pixels differ",
        marker, result.name, result.similarity, result.threshold, result.diff_percent
    );
    if let Some(path) = &result.diff_image_path {
        println!("  diff image: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}

