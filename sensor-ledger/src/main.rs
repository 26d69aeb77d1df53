use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use sensor_ledger::{commands, config, telemetry};

#[derive(Parser)]
#[command(name = "sensor-ledger")]
#[command(about = "A peer-validated ledger of sensor temperature readings", long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.sensor-ledger/config.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and seed the ledger
    Init {
        /// Overwrite the seed record of an existing ledger
        #[arg(long)]
        force: bool,
    },

    /// Call a contract function by name
    Invoke {
        /// Function name (queryTemp, initLedger, createTemp, queryAllTemps)
        function: String,

        /// Function arguments, passed through as strings
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Record a reading and the two peer votes on it
    Create {
        /// Sequence number of the reading
        sequence: String,

        /// Temperature as a decimal string
        #[arg(allow_hyphen_values = true)]
        temperature: String,

        /// Vote of the first peer (accept or reject)
        peer_vote1: String,

        /// Vote of the second peer (accept or reject)
        peer_vote2: String,
    },

    /// Show the record at a sequence number
    Query {
        /// Sequence number to look up
        sequence: String,
    },

    /// Show every record in the scan range
    QueryAll,

    /// Count fault outcomes across the ledger
    Report {
        /// Also write the summary line to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show config and ledger status
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path);

    // A broken config still gets reported through the command itself
    let logging = config::Config::load_or_default(&config_path)
        .map(|c| c.logging)
        .unwrap_or_default();
    telemetry::init_tracing(&logging, cli.verbose)?;

    match cli.command {
        Commands::Init { force } => commands::init::run(&config_path, force),
        Commands::Invoke { function, args } => commands::invoke::run(&config_path, &function, &args),
        Commands::Create {
            sequence,
            temperature,
            peer_vote1,
            peer_vote2,
        } => commands::create::run(&config_path, &sequence, &temperature, &peer_vote1, &peer_vote2),
        Commands::Query { sequence } => commands::query::run(&config_path, &sequence),
        Commands::QueryAll => commands::query::run_all(&config_path),
        Commands::Report { output } => commands::report::run(&config_path, output.as_deref()),
        Commands::Status => commands::status::run(&config_path),
    }
}
