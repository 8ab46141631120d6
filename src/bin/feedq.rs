//! CLI entry point for the `feedq` command-line tool.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use feed_lookup::cli::commands;
use feed_lookup::{LookupConfig, LookupError, Owner};

#[derive(Parser)]
#[command(
    name = "feedq",
    about = "feedq — find the latest update of an owner-signed feed"
)]
struct Cli {
    /// Output format: "text" (default) or "json"
    #[arg(long, default_value = "text")]
    format: String,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the identifier and address of one epoch of a feed
    Address {
        /// Owner identity, 20 bytes hex
        #[arg(long)]
        owner: Owner,
        /// Feed topic
        #[arg(long)]
        topic: String,
        /// Epoch anchor (start of interval, unix seconds)
        #[arg(long, default_value = "0")]
        anchor: u64,
        /// Epoch level, 0-32
        #[arg(long, default_value = "0")]
        level: u8,
    },
    /// Find the latest update at or before a time
    Lookup {
        /// Directory holding one file per record, named by hex address
        #[arg(long)]
        store: PathBuf,
        /// Owner identity, 20 bytes hex
        #[arg(long)]
        owner: Owner,
        /// Feed topic
        #[arg(long)]
        topic: String,
        /// Requested time in unix seconds (default: now)
        #[arg(long)]
        at: Option<u64>,
        /// Print the payload as hex
        #[arg(long)]
        hex: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.format == "json";

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).init();

    let config = match &cli.config {
        Some(path) => match LookupConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(2);
            }
        },
        None => LookupConfig::default(),
    };

    let result = match cli.command {
        Commands::Address {
            owner,
            topic,
            anchor,
            level,
        } => commands::cmd_address(&config, &owner, &topic, anchor, level, json),
        Commands::Lookup {
            store,
            owner,
            topic,
            at,
            hex,
        } => commands::cmd_lookup(&config, &store, &owner, &topic, at, hex, json).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let code = match &e {
            LookupError::Io(_) => 1,
            LookupError::Config(_) => 2,
            LookupError::InvalidIdentity(_)
            | LookupError::InvalidTopic(_)
            | LookupError::InvalidLevel { .. }
            | LookupError::InvalidAnchor { .. }
            | LookupError::InvalidHex(_) => 3,
            LookupError::NotFound(_) => 4,
            _ => 5,
        };
        process::exit(code);
    }
}
