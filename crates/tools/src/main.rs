use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use contract_manager_tools::{Config, Manifest};

#[derive(Parser)]
#[command(name = "contract-manager")]
#[command(about = "Companion tools for the ContractManager registry contract")]
struct Cli {
    /// Print the resolved configuration before running (same as SOROBAN_DEBUG)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved network and registry configuration
    Config {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check a batch manifest against the registry rules
    Check {
        /// Manifest file (TOML, `[[entry]]` tables)
        manifest: PathBuf,
    },
    /// Print the `add_contracts` arguments for a manifest
    BatchArgs {
        /// Manifest file (TOML, `[[entry]]` tables)
        manifest: PathBuf,
        /// Admin address signing the call; defaults to SOROBAN_ACCOUNT
        #[arg(short, long)]
        caller: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load().context("loading configuration")?;
    config.debug |= cli.debug;
    if config.debug {
        config.print_summary();
    }

    match cli.command {
        Commands::Config { json } => {
            if json {
                println!("{}", config.to_json()?);
            } else {
                config.print_summary();
            }
            Ok(())
        }
        Commands::Check { manifest } => {
            let loaded = load_manifest(&manifest).await?;
            let findings = loaded.check();
            if findings.is_empty() {
                println!(
                    "{}: {} entries ok",
                    manifest.display(),
                    loaded.entries.len()
                );
                return Ok(());
            }
            for finding in &findings {
                eprintln!("{finding}");
            }
            bail!(
                "{} of {} entries would be rejected; the whole batch would roll back",
                findings.len(),
                loaded.entries.len()
            )
        }
        Commands::BatchArgs { manifest, caller } => {
            let loaded = load_manifest(&manifest).await?;
            let caller = caller
                .or_else(|| config.source_account.clone())
                .context("no caller given and SOROBAN_ACCOUNT is not set")?;
            let args = loaded.batch_args(&caller)?;
            let contract_id = config.require_contract_id()?;
            eprintln!("registry contract: {contract_id} ({})", config.network);
            println!("{}", serde_json::to_string_pretty(&args)?);
            Ok(())
        }
    }
}

async fn load_manifest(path: &Path) -> Result<Manifest> {
    Manifest::load(path)
        .await
        .with_context(|| format!("reading manifest {}", path.display()))
}
