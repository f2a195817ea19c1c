//! Point-in-time restore for versioned S3 buckets
//!
//! Provides CLI interface for restoring objects to the version in effect at a
//! given time, and for listing those versions without modifying anything.

// s3restore/src/main.rs
mod catalog;
mod config;
mod errors;
mod restore;
mod utils;

use anyhow::{Context, Result};
use catalog::s3_store::S3VersionStore;
use clap::{Args, Parser, Subcommand};
use config::{AppConfig, OperationConfig, TargetConfig};
use restore::FailurePolicy;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "s3restore",
    version,
    about = "Restore objects in a versioned S3 bucket to a point in time",
    arg_required_else_help = true
)]
struct Cli {
    /// JSON config file (default: ./config.json if present)
    #[arg(global = true, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// AWS region, overriding the config file and environment
    #[arg(global = true, long)]
    region: Option<String>,

    /// S3-compatible endpoint URL, overriding the config file
    #[arg(global = true, long, value_name = "URL")]
    endpoint_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Bucket holding the versioned objects
    #[arg(long)]
    bucket: String,

    /// Restore point, in seconds since the Unix epoch
    #[arg(long)]
    timestamp: String,

    /// Only consider keys starting with this prefix
    #[arg(long, default_value = "")]
    prefix: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Restore every object to the version in effect at the timestamp
    Restore {
        #[command(flatten)]
        target: TargetArgs,

        /// Attempt every restoration even if some fail, then report failures
        #[arg(long)]
        keep_going: bool,
    },
    /// List the version of every object in effect at the timestamp
    List {
        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Main entry point for the restore tool
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    init_tracing();

    // Usage errors exit with status 2 from inside clap.
    let cli = Cli::parse();

    match run_app(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "s3restore=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run_app(cli: Cli) -> Result<()> {
    let mut app_config = AppConfig::load(cli.config.as_deref())
        .context("Failed to load application configuration")?
        .with_overrides(cli.region, cli.endpoint_url)
        .context("Invalid command-line storage options")?;

    app_config.operation = Some(build_operation(cli.command)?);
    let store = S3VersionStore::connect(&app_config.storage).await;

    match &app_config.operation {
        Some(OperationConfig::Restore { .. }) => {
            restore::run_restore_flow(&app_config, &store)
                .await
                .context("Restore process failed")?;
            println!("✅ Operation completed successfully.");
        }
        Some(OperationConfig::List(_)) => {
            let stdout = std::io::stdout();
            restore::run_list_flow(&app_config, &store, &mut stdout.lock())
                .await
                .context("List process failed")?;
        }
        None => anyhow::bail!("No operation selected"),
    }
    Ok(())
}

fn build_operation(command: Commands) -> Result<OperationConfig> {
    Ok(match command {
        Commands::Restore { target, keep_going } => OperationConfig::Restore {
            target: build_target(target)?,
            policy: if keep_going {
                FailurePolicy::ContinueOnError
            } else {
                FailurePolicy::FailFast
            },
        },
        Commands::List { target } => OperationConfig::List(build_target(target)?),
    })
}

fn build_target(args: TargetArgs) -> Result<TargetConfig> {
    let timestamp = utils::parse_timestamp(&args.timestamp).context("Invalid --timestamp")?;
    Ok(TargetConfig {
        bucket: args.bucket,
        prefix: args.prefix,
        timestamp,
    })
}
