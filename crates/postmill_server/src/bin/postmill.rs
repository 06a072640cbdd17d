//! Postmill - social media content automation server.

use clap::{Parser, Subcommand};
use postmill_server::{AppConfig, build_engine, init_logging, serve};
use std::path::PathBuf;
use tracing::{info, warn};

/// Postmill - scheduled generation and publishing of social media posts
#[derive(Parser, Debug)]
#[command(name = "postmill")]
#[command(about = "Scheduled generation and publishing of social media posts", long_about = None)]
#[command(version)]
struct Cli {
    /// Command to execute
    #[command(subcommand)]
    command: Commands,

    /// Configuration file layered over the defaults
    #[arg(short, long, global = true, env = "POSTMILL_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the HTTP API and run the engine on an interval
    Serve {
        /// Listen address, overriding server.bind
        #[arg(long)]
        bind: Option<String>,

        /// Start with automation active
        #[arg(long)]
        active: bool,
    },

    /// Run a single engine pass over the configured schedules and print the report
    RunOnce,

    /// Validate configuration and print warnings
    CheckConfig {
        /// Also print the effective configuration with secrets masked
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        "debug".to_string()
    } else {
        config.logging.level.clone()
    };
    init_logging(&level, cli.json_logs || config.logging.json)?;

    match cli.command {
        Commands::Serve { bind, active } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.server.start_active |= active;
            for warning in config.validate() {
                warn!("{}", warning);
            }
            let engine = build_engine(&config)?;
            info!(
                active = engine.is_active(),
                schedules = engine.schedules().list().len(),
                "Engine ready"
            );
            serve(&config, engine).await?;
        }
        Commands::RunOnce => {
            let engine = build_engine(&config)?;
            engine.start();
            let report = engine.run_once().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::CheckConfig { show } => {
            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration OK");
            } else {
                for warning in &warnings {
                    println!("warning: {}", warning);
                }
            }
            if show {
                println!("\n{}", toml::to_string_pretty(&config.redacted())?);
            }
        }
    }

    Ok(())
}
