//! CLI for the bscope BSC address-activity explorer.
//!
//! Pipeline: ingest history -> registry side effects -> creator crawl -> report.

use alloy_primitives::Address;
use bscope_core::error::BscopeError;
use bscope_core::types::HistoryPage;
use bscope_explorer::Explorer;
use bscope_provider::wire::parse_address;
use bscope_provider::{BackendClient, ChainSource};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "bscope", version, about = "BSC address activity explorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch and print merged native + token history for an address.
    History {
        #[arg(short, long, env = "BSCOPE_BACKEND_URL")]
        backend_url: String,

        #[arg(short, long)]
        address: String,

        #[arg(long, default_value_t = 1)]
        page: u64,

        #[arg(long, default_value_t = 500)]
        page_size: u64,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Ingest history, then resolve contract creators with bounded
    /// concurrency and print what the queried address deployed.
    Creators {
        #[arg(short, long, env = "BSCOPE_BACKEND_URL")]
        backend_url: String,

        #[arg(short, long)]
        address: String,

        #[arg(long, default_value_t = 500)]
        page_size: u64,

        /// Override the backend-configured concurrency limit.
        #[arg(long)]
        concurrency: Option<usize>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Look up metadata and creator for a single contract.
    Contract {
        #[arg(short, long, env = "BSCOPE_BACKEND_URL")]
        backend_url: String,

        #[arg(short, long)]
        address: String,
    },

    /// Burn verification: check a tx hash, or the backend's current status.
    BurnStatus {
        #[arg(short, long, env = "BSCOPE_BACKEND_URL")]
        backend_url: String,

        #[arg(long)]
        tx_hash: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::History {
            backend_url,
            address,
            page,
            page_size,
            json,
        } => {
            let address = cli_address(&address)?;
            let client = BackendClient::new(&backend_url)?;
            let mut explorer = Explorer::new(Arc::new(client));

            let history = explorer.fetch_transactions(address, page, page_size).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else {
                render_history(&history);
            }
        }

        Commands::Creators {
            backend_url,
            address,
            page_size,
            concurrency,
            json,
        } => {
            let address = cli_address(&address)?;
            let client = BackendClient::new(&backend_url)?;
            let mut explorer = Explorer::new(Arc::new(client));

            match concurrency {
                Some(limit) => explorer = explorer.with_concurrency(limit),
                None => {
                    if let Err(e) = explorer.load_runtime_config().await {
                        tracing::warn!(error = %e, "config fetch failed, using defaults");
                    }
                }
            }

            explorer.fetch_transactions(address, 1, page_size).await?;
            tracing::info!(
                contracts = explorer.registry().len(),
                "history ingested, starting creator crawl"
            );

            // Poll the shared handle the way a UI would while the crawl runs.
            let progress = explorer.progress_handle();
            let ticker = tokio::spawn(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    let snapshot = progress.snapshot();
                    if !snapshot.is_querying {
                        break;
                    }
                    tracing::info!(
                        completed = snapshot.completed,
                        total = snapshot.total,
                        with_creator = snapshot.with_creator,
                        "crawl progress"
                    );
                }
            });

            let final_progress = explorer.query_all_contract_creators().await?;
            let _ = ticker.await;

            let created = explorer.created_contracts(address).clone();
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "progress": final_progress,
                        "created": created,
                    }))?
                );
            } else {
                println!(
                    "Crawled {}/{} contracts, {} with a known creator.",
                    final_progress.completed, final_progress.total, final_progress.with_creator
                );
                if created.is_empty() {
                    println!("No contracts created by {address}.");
                } else {
                    println!("Contracts created by {address}:");
                    for record in created.values() {
                        println!(
                            "  {}  {} ({})",
                            record.address,
                            record.name.as_deref().unwrap_or("Unknown Token"),
                            record.symbol.as_deref().unwrap_or("UNKNOWN"),
                        );
                    }
                }
            }
        }

        Commands::Contract {
            backend_url,
            address,
        } => {
            let contract = cli_address(&address)?;
            let client = BackendClient::new(&backend_url)?;
            let info = client.contract_info(contract).await?;

            println!("Contract {contract}");
            match info.resolved_creator() {
                Some(creator) => println!("  creator:       {creator}"),
                None => println!("  creator:       unknown"),
            }
            println!("  bytecode size: {}", info.bytecode_size);
            println!("  balance:       {}", info.balance);
            println!("  total supply:  {}", info.total_supply);
            println!("  verified:      {}", !info.source_code.is_empty());
        }

        Commands::BurnStatus {
            backend_url,
            tx_hash,
        } => {
            let client = BackendClient::new(&backend_url)?;
            match tx_hash {
                Some(hash) => {
                    let result = client.verify_burn(&hash).await?;
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                None => {
                    let status = client.verification_status().await?;
                    println!(
                        "verified: {}  tx: {}  from: {}",
                        status.verified, status.tx_hash, status.from
                    );
                }
            }
        }
    }

    Ok(())
}

fn cli_address(raw: &str) -> Result<Address, BscopeError> {
    parse_address(raw).ok_or_else(|| BscopeError::InvalidInput(format!("invalid address: {raw}")))
}

fn render_history(history: &HistoryPage) {
    let p = &history.pagination;
    println!(
        "page {} (size {}), {} records{}{}",
        p.current_page,
        p.page_size,
        p.total_records,
        if p.has_previous_page { ", prev" } else { "" },
        if p.has_next_page { ", next" } else { "" },
    );
    println!(
        "{:<66} {:>12} {:>4}  {}",
        "hash", "time", "dir", "value"
    );
    for tx in &history.transactions {
        println!(
            "{:<66} {:>12} {:>4}  {}",
            tx.hash,
            tx.time_stamp,
            tx.direction.as_str(),
            tx.display_value,
        );
    }
}
