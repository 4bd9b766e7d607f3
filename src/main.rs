//! # terraform-provider-sakura
//!
//! Provider binary. Each invocation reads one JSON request from stdin and writes
//! one JSON response to stdout.
//!
//! ```bash
//! echo '{"operation":"get_schema"}' | terraform-provider-sakura
//! terraform-provider-sakura schema
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use terraform_provider_sakura::observability::init_tracing;
use terraform_provider_sakura::plugin::{self, server::provider_schema};
use terraform_provider_sakura::SakuraProvider;

#[derive(Parser)]
#[command(name = "terraform-provider-sakura")]
#[command(about = "Terraform provider for Sakura Cloud KMS and Secret Manager", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one request from stdin (default)
    Serve,
    /// Print the provider schema as JSON
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let provider = SakuraProvider::new(env!("CARGO_PKG_VERSION"));
    debug!(version = env!("CARGO_PKG_VERSION"), "starting provider");

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => plugin::serve(&provider, tokio::io::stdin(), tokio::io::stdout())
            .await
            .context("failed to handle provider request"),
        Commands::Schema => {
            let schema = serde_json::to_string_pretty(&provider_schema(&provider))
                .context("failed to encode provider schema")?;
            println!("{schema}");
            Ok(())
        }
    }
}
