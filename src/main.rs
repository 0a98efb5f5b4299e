//! Command-line interface for ddbimport
//!
//! # Usage Examples
//!
//! ```bash
//! # Import a local file with 16 writers
//! ddbimport --table-region eu-west-2 --table-name ddbimport \
//!   --input-file data.csv --numeric-fields year --boolean-fields active \
//!   --concurrency 16
//!
//! # Stream an S3 object through local writers
//! ddbimport --table-region eu-west-2 --table-name ddbimport \
//!   --bucket-region eu-west-2 --bucket-name imports --bucket-key data.tsv \
//!   --delimiter tab
//!
//! # Let the ddbimport Step Function carry out the import
//! ddbimport --table-region eu-west-2 --table-name ddbimport \
//!   --bucket-region eu-west-2 --bucket-name imports --bucket-key data.csv \
//!   --remote --remote-timeout 2h
//! ```

use clap::{CommandFactory, Parser};
use ddbimport::{execute, ImportArgs, ImportPlan};
use sfn_remote::CancellationToken;
use tracing::warn;

#[derive(Parser)]
#[command(name = "ddbimport")]
#[command(about = "Import CSV files into DynamoDB")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    import: ImportArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let plan = match cli.import.into_plan() {
        Ok(plan) => plan,
        Err(e) => {
            let mut command = Cli::command();
            eprintln!("{}", command.render_usage());
            eprintln!();
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let cancel = CancellationToken::new();
    // Local imports keep the default Ctrl-C behaviour
    if matches!(plan, ImportPlan::Remote(_)) {
        let ctrl_c = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, no longer waiting for the execution");
                ctrl_c.cancel();
            }
        });
    }

    execute(plan, cancel).await?;
    Ok(())
}
