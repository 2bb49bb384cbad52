use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lcc")]
#[command(about = "Ledger conformance checker: check:data results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> network -> overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Compute, print and persist the final check:data results.
    /// Exits non-zero when the outcome carries an error.
    Results {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Counter snapshot JSON (counter name -> integer or decimal string)
        #[arg(long)]
        counters: Option<String>,

        /// Run outcome JSON: {"error": {...}} or {"end_condition": {...}}
        #[arg(long)]
        outcome: Option<String>,

        /// Treat unused config keys as an error
        #[arg(long, default_value_t = false)]
        strict_config: bool,
    },

    /// Fetch the tip from `online_url` and print live status (stats + progress)
    Progress {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Counter snapshot JSON
        #[arg(long)]
        counters: String,
    },

    /// Fetch and print the status document published by a running checker
    Status {
        #[arg(long)]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
            let loaded = lcc_config::load_layered_yaml(&path_refs)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Results {
            config_paths,
            counters,
            outcome,
            strict_config,
        } => {
            commands::results::run_results(config_paths, counters, outcome, strict_config)?;
        }

        Commands::Progress {
            config_paths,
            counters,
        } => {
            commands::status::run_progress(config_paths, counters).await?;
        }

        Commands::Status { url } => {
            commands::status::run_status(url).await?;
        }
    }

    Ok(())
}

// Logs go to stderr so JSON on stdout stays machine readable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
