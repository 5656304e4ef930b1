//! dbt - PostgreSQL target copy tool
//!
//! Clones one configured database over another with pg_dump/pg_restore and
//! opens psql sessions against named targets.

// dbt/src/main.rs
mod backup;
mod config;
mod copy;
mod errors;
mod restore;
mod session;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backup::{DumpCache, DEFAULT_DUMP_ROOT};
use config::AppConfig;
use copy::CopyRequest;
use errors::AppError;
use utils::SystemRunner;

#[derive(Parser)]
#[command(name = "dbt")]
#[command(about = "Copy, connect to and run SQL against configured PostgreSQL targets")]
#[command(version)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, global = true, env = "DBT_CONFIG", default_value = "conf.json")]
    config: PathBuf,

    /// Directory holding cached dumps, one subdirectory per source
    #[arg(long, global = true, env = "DBT_DUMP_DIR", default_value = DEFAULT_DUMP_ROOT)]
    dump_dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy database
    Copy {
        /// Source DB
        #[arg(long = "from")]
        source: String,
        /// Target DB
        #[arg(long = "to")]
        target: String,
        /// Use existing dump if available
        #[arg(long)]
        use_cache: bool,
    },

    /// Connect to database
    Connect {
        /// Target DB
        #[arg(long = "to")]
        target: String,
    },

    /// Run SQL file on database
    Run {
        /// Target DB
        #[arg(long = "on")]
        target: String,
        /// SQL file to run
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run_app(cli) {
        Ok(_) => {
            println!("✅ Operation completed successfully.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Error: {:?}", e);
            ExitCode::from(exit_status_for(&e))
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "dbt=debug" } else { "dbt=info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn run_app(cli: Cli) -> Result<()> {
    let app_config = AppConfig::load_from_json(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    let runner = SystemRunner;

    match cli.command {
        Commands::Copy {
            source,
            target,
            use_cache,
        } => {
            let cache = DumpCache::new(cli.dump_dir);
            let request = CopyRequest {
                source,
                target,
                use_cache,
            };
            copy::run_copy_flow(&app_config, &cache, &request, &runner).with_context(|| {
                format!("Copy {} -> {} failed", request.source, request.target)
            })?;
        }
        Commands::Connect { target } => {
            session::connect(&app_config, &target, &runner)
                .with_context(|| format!("Session on {} failed", target))?;
        }
        Commands::Run { target, file } => {
            session::run_file(&app_config, &target, &file, &runner)
                .with_context(|| format!("Running {} on {} failed", file.display(), target))?;
        }
    }
    Ok(())
}

/// A failing external tool's own exit status becomes ours; anything else is 1.
fn exit_status_for(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<AppError>() {
        Some(AppError::ProcessFailure {
            code: Some(code), ..
        }) => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
        _ => 1,
    }
}
