//! CLI for poking a running leader
//!
//! Drives the client RPC surface: reserving blobs, committing manifests,
//! and resolving blob/block lookups. Block payloads travel between clients
//! and peers directly and are not this tool's business.

use clap::{Parser, Subcommand};
use minidfs::client::LeaderClient;
use minidfs::{BlobId, BlockId};

/// CLI arguments.
#[derive(Parser)]
#[command(name = "minidfs")]
#[command(about = "minidfs client CLI")]
#[command(version)]
struct Cli {
    /// Leader client RPC address
    #[arg(long, default_value = "127.0.0.1:5050")]
    leader: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reserve a blob of N blocks, print each block's write targets, commit
    CreateBlob {
        /// Number of blocks to reserve
        #[arg(long, default_value = "1")]
        blocks: usize,
    },

    /// Print the ordered block list of a committed blob
    GetBlob {
        /// Blob id
        blob_id: String,
    },

    /// Print the peers currently holding a block
    GetBlock {
        /// Block id
        block_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut client = LeaderClient::connect(cli.leader.as_str()).await?;

    match cli.command {
        Commands::CreateBlob { blocks } => {
            let blob_id = client.create_blob().await?;
            println!("blob {}", blob_id);
            for _ in 0..blocks {
                let fwd = client.append().await?;
                println!("  block {} -> {}", fwd.block_id, fwd.nodes.join(", "));
            }
            client.commit().await?;
            println!("committed");
        }
        Commands::GetBlob { blob_id } => {
            let blocks = client.get_blob(&BlobId::from(blob_id)).await?;
            if blocks.is_empty() {
                println!("(unknown blob)");
            }
            for block in blocks {
                println!("{}", block);
            }
        }
        Commands::GetBlock { block_id } => {
            let nodes = client.get_block(&BlockId::from(block_id)).await?;
            if nodes.is_empty() {
                println!("(no peers hold this block)");
            }
            for node in nodes {
                println!("{}", node);
            }
        }
    }

    Ok(())
}
