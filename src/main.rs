//! nft-bulk-minter
//!
//! Mints every row of a metadata file through a Chia wallet, one NFT at a
//! time, waiting for each mint to land on chain before submitting the next.
//!
//! ```text
//! nft-bulk-minter --config minter.toml --metadata-file drop.csv --start 12
//! ```
//!
//! Exit status is 0 when every queued item was resolved and 1 when the run
//! was cancelled or could not start.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use nft_bulk_minter::config::{finalize_config, read_config, MinterConfig};
use nft_bulk_minter::observability::{logging, metrics};
use nft_bulk_minter::{run_batch, RunOutcome, RunSummary};

#[derive(Parser)]
#[command(name = "nft-bulk-minter")]
#[command(about = "Queued NFT minting through a Chia wallet", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Metadata file, one NFT per row after the template row
    #[arg(short, long)]
    metadata_file: Option<PathBuf>,

    #[arg(long)]
    wallet_id: Option<u32>,

    #[arg(long)]
    royalty_address: Option<String>,

    #[arg(long)]
    royalty_percentage: Option<u16>,

    /// Fee per mint in mojos
    #[arg(long)]
    fee: Option<u64>,

    /// Send each NFT to the target address in column 9
    #[arg(long)]
    targets: bool,

    /// First row to mint (1 = first row after the template)
    #[arg(short, long, allow_negative_numbers = true)]
    start: Option<i64>,

    /// Persist the cursor here after every item and resume from it
    #[arg(long)]
    cursor_file: Option<PathBuf>,

    /// Seconds between confirmation polls
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up on a mint after this many unresolved polls
    #[arg(long)]
    max_poll_ticks: Option<u32>,

    /// Wallet RPC endpoint
    #[arg(long)]
    endpoint: Option<String>,

    /// Answer every checkpoint automatically
    #[arg(short, long)]
    yes: bool,

    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut MinterConfig) {
        if let Some(path) = self.metadata_file {
            config.batch.metadata_file = path;
        }
        if let Some(wallet_id) = self.wallet_id {
            config.mint.wallet_id = wallet_id;
        }
        if let Some(address) = self.royalty_address {
            config.mint.royalty_address = address;
        }
        if let Some(percentage) = self.royalty_percentage {
            config.mint.royalty_percentage = percentage;
        }
        if let Some(fee) = self.fee {
            config.mint.fee = fee;
        }
        if self.targets {
            config.batch.targets = true;
        }
        if self.start.is_some() {
            config.batch.start = self.start;
        }
        if self.cursor_file.is_some() {
            config.batch.cursor_file = self.cursor_file;
        }
        if let Some(secs) = self.poll_interval {
            config.batch.poll_interval_secs = secs;
        }
        if self.max_poll_ticks.is_some() {
            config.batch.max_poll_ticks = self.max_poll_ticks;
        }
        if let Some(endpoint) = self.endpoint {
            config.wallet_rpc.endpoint = endpoint;
        }
        if self.yes {
            config.checkpoint.interactive = false;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match read_config(cli.config.as_deref()) {
        Ok(mut config) => {
            cli.apply(&mut config);
            finalize_config(config)
        }
        Err(e) => Err(e),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_level);
    tracing::info!("nft-bulk-minter v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    match run_batch(&config).await {
        Ok(summary) => {
            print_summary(&summary);
            match summary.outcome {
                RunOutcome::Completed => ExitCode::SUCCESS,
                RunOutcome::Cancelled => ExitCode::FAILURE,
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Minting run aborted");
            ExitCode::FAILURE
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("Submitted: {}", summary.submitted);
    println!("Minted:    {}", summary.minted.len());
    for item in &summary.minted {
        println!("  #{} {} at height {}", item.index, item.remote_id, item.height);
    }
    if !summary.failed.is_empty() {
        println!("Failed:    {} (monitor the wallet for these)", summary.failed.len());
        for item in &summary.failed {
            println!("  #{} {} {}", item.index, item.remote_id, item.reason);
        }
    }
    println!("Next cursor: {}", summary.final_cursor);
}
