//! RuVector Semantic CLI
//!
//! Hosts a [`SemanticPointerSystem`] behind a line-oriented JSON protocol
//! and runs the scripted cleanup demonstration.
//!
//! ## Commands
//!
//! - `ruvector-semantic serve` - read JSON commands from stdin, one per line
//! - `ruvector-semantic demo` - noise/cleanup walkthrough on a colour vocabulary

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ruvector_semantic::{SemanticConfig, SemanticPointerSystem};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Semantic pointer algebra and cleanup memory
#[derive(Parser)]
#[command(name = "ruvector-semantic")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pointer dimensionality (overrides the config file)
    #[arg(long, global = true)]
    dim: Option<usize>,

    /// Neurons per pool (overrides the config file)
    #[arg(long, global = true)]
    neurons: Option<usize>,

    /// Random seed (overrides the config file)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON commands over stdin/stdout
    Serve,

    /// Run the noise and cleanup demonstration
    Demo {
        /// Noise level applied to RED before cleanup
        #[arg(long, default_value_t = 0.5)]
        noise: f64,

        /// Settling budget
        #[arg(long, default_value_t = 100)]
        max_iterations: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries protocol output
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(dim) = cli.dim {
        config.dimensionality = dim;
    }
    if let Some(neurons) = cli.neurons {
        config.neurons_per_pool = neurons;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }

    match cli.command {
        Commands::Serve => {
            let system = SemanticPointerSystem::new(config).context("invalid configuration")?;
            commands::serve::run(system)
        }
        Commands::Demo {
            noise,
            max_iterations,
        } => commands::demo::run(config, noise, max_iterations),
    }
}

fn load_config(path: Option<&Path>) -> Result<SemanticConfig> {
    let Some(path) = path else {
        return Ok(SemanticConfig::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse config {}", path.display()))
}
