use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;

mod commands;

use commands::replay;

#[derive(Parser)]
#[command(name = "srk")]
#[command(about = "Restore reconciliation tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> env -> local overrides...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Replay a scripted sequence of queue activity through a restore controller
    Replay {
        /// JSON file holding an array of steps
        #[arg(long)]
        script: String,

        /// Layered config paths in merge order
        #[arg(long = "config")]
        config_paths: Vec<String>,

        /// What to do with config keys nothing reads (WARN | FAIL)
        #[arg(long, default_value = "WARN")]
        unused_keys: String,
    },
}

fn main() -> Result<()> {
    // Silent if the file does not exist.
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => {
            init_tracing(None);
            let loaded = srk_config::load_layered_yaml(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Replay {
            script,
            config_paths,
            unused_keys,
        } => {
            let policy = commands::parse_unused_key_policy(&unused_keys)?;
            let loaded = commands::load_config(&config_paths, policy)?;
            init_tracing(loaded.settings.log_filter.as_deref());

            let steps = replay::load_script(&script)?;
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            replay::run_script(&steps, &loaded.settings, loaded.config_hash.as_deref(), &mut out)?;
            out.flush().context("flush stdout failed")?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// the configured filter.
fn init_tracing(config_filter: Option<&str>) {
    let fallback = config_filter.unwrap_or("info").to_string();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()),
        )
        .init();
}
