//! Vocab Enrich - fill vocabulary spreadsheets from public word APIs
//!
//! Usage:
//!   vocab-enrich syn-ant [INPUT] [OUTPUT]
//!   vocab-enrich definitions [INPUT] [OUTPUT] [--limit N] [--max-workers N]
//!                            [--timeout SECS] [--checkpoint-every N]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;
use vocab_enrich_core::EnrichConfig;

#[derive(Parser)]
#[command(name = "vocab-enrich")]
#[command(about = "Enrich vocabulary spreadsheets with thesaurus and dictionary data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Config file (defaults to ./vocab-enrich.toml when present)
    #[arg(long, global = true, env = "VOCAB_ENRICH_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add synonyms and antonyms from the Datamuse thesaurus
    SynAnt {
        /// Input spreadsheet (.xlsx or .csv) with a 'word' column
        #[arg(default_value = "vocab_from_images_batch.xlsx")]
        input: PathBuf,

        /// Output spreadsheet
        #[arg(default_value = "vocab_with_syn_ant.xlsx")]
        output: PathBuf,
    },

    /// Add definitions and examples from dictionaryapi.dev
    Definitions {
        /// Input spreadsheet (.xlsx or .csv) with a 'word' column
        #[arg(default_value = "vocab_with_syn_ant.xlsx")]
        input: PathBuf,

        /// Output spreadsheet
        #[arg(default_value = "vocab_with_defs.xlsx")]
        output: PathBuf,

        /// Limit number of rows for a quick run (0 = all)
        #[arg(long, default_value = "0")]
        limit: usize,

        /// Concurrent lookups
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        max_workers: Option<u64>,

        /// Per-request timeout in seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        /// Write a checkpoint every N completed lookups (0 = only at the end)
        #[arg(long)]
        checkpoint_every: Option<usize>,
    },
}

fn init_tracing(log_level: &str) {
    let level = match log_level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let level = level.as_str().to_lowercase();

    // Keep HTTP internals quiet unless something goes wrong
    let filter = EnvFilter::new(format!(
        "vocab_enrich={level},vocab_enrich_core={level},reqwest=warn,hyper=warn"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = EnrichConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::SynAnt { input, output } => {
            config.validate()?;
            cli::syn_ant::handle(&config, &input, &output).await
        }
        Commands::Definitions {
            input,
            output,
            limit,
            max_workers,
            timeout,
            checkpoint_every,
        } => {
            if let Some(workers) = max_workers {
                config.definitions.max_workers = workers as usize;
            }
            if let Some(secs) = timeout {
                config.definitions.timeout_secs = secs;
            }
            if let Some(every) = checkpoint_every {
                config.definitions.checkpoint_every = every;
            }
            config.validate()?;
            cli::definitions::handle(&config, &input, &output, limit).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    debug!("vocab-enrich v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
