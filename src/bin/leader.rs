//! Leader binary

use clap::{Parser, Subcommand};
use minidfs::{LeaderConfig, LeaderServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "minidfs-leader")]
#[command(about = "minidfs metadata leader")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the leader server
    Serve {
        /// Config file (CLI flags override its values)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Bind address for client RPC
        #[arg(long)]
        client_bind: Option<String>,

        /// Bind address for peer RPC
        #[arg(long)]
        peer_bind: Option<String>,

        /// Manifest database directory
        #[arg(long)]
        db: Option<PathBuf>,

        /// Target replicas per block
        #[arg(long)]
        replication_factor: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            client_bind,
            peer_bind,
            db,
            replication_factor,
        } => {
            let mut config = match config {
                Some(path) => LeaderConfig::from_file(path)?,
                None => LeaderConfig::default(),
            };
            if let Some(bind) = client_bind {
                config.client_bind = bind.parse()?;
            }
            if let Some(bind) = peer_bind {
                config.peer_bind = bind.parse()?;
            }
            if let Some(db) = db {
                config.db_path = db;
            }
            if let Some(factor) = replication_factor {
                config.replication_factor = factor;
            }
            config.validate()?;

            let server = LeaderServer::bind(&config).await?;
            server.serve().await?;
        }
    }

    Ok(())
}
