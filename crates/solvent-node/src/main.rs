//! Solvent bank oracle: entry point.
//!
//! Subcommands: init, keygen, pubkey, commit, prove, register, attest,
//! verify, verify-token. Request-shaped commands read and print the JSON
//! request/response shapes so any transport can sit in front of them.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use solvent_node::config::LoggingConfig;
use solvent_node::SolventConfig;

/// Solvent: confidential income-threshold attestation.
#[derive(Parser, Debug)]
#[command(name = "solvent-node", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "solvent.toml", global = true)]
    config: PathBuf,

    /// Override the data directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Override the log format (text, json).
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Generate an Ed25519 key file.
    Keygen(commands::keygen::KeygenArgs),
    /// Print the bank's public key.
    Pubkey,
    /// Commit to a value with a fresh blinding (prover side).
    Commit(commands::commit::CommitArgs),
    /// Produce a threshold proof, locally or delegated to the oracle.
    Prove(commands::prove::ProveArgs),
    /// Register a prover's public key.
    Register(commands::register::RegisterArgs),
    /// Attest a single-commitment threshold proof.
    Attest(commands::attest::AttestArgs),
    /// Verify a composite rent proof and issue a token.
    Verify(commands::verify::VerifyArgs),
    /// Check an attestation token offline.
    VerifyToken(commands::verify_token::VerifyTokenArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = SolventConfig::load(&cli.config)?;
    if let Some(ref data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
    }
    init_tracing(&config.logging);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config, &config),
        Commands::Keygen(args) => commands::keygen::run(args, &config),
        Commands::Pubkey => commands::keygen::run_pubkey(&config),
        Commands::Commit(args) => commands::commit::run(args),
        Commands::Prove(args) => commands::prove::run(args, &config).await,
        Commands::Register(args) => commands::register::run(args, &config).await,
        Commands::Attest(args) => commands::attest::run(args, &config).await,
        Commands::Verify(args) => commands::verify::run(args, &config).await,
        Commands::VerifyToken(args) => commands::verify_token::run(args, &config),
    }
}

/// Logs go to stderr; stdout carries the JSON responses.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
