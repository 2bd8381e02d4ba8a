//! # minidfs
//!
//! A small distributed blob store in the single-master mold: one metadata
//! leader coordinates any number of storage peers.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │                Leader                   │
//! │  blob manifests (RocksDB)               │
//! │  block ↔ peer placement (in memory)     │
//! │  replication/deletion intents           │
//! └───────┬─────────────────────┬───────────┘
//!         │ client RPC          │ peer RPC (register, heartbeat)
//!   ┌─────▼─────┐        ┌──────▼──────┐
//!   │  Clients  │        │    Peers    │
//!   │ create/   │        │ hold blocks │
//!   │ append/   │───────▶│ on disk,    │
//!   │ commit    │ blocks │ forward and │
//!   └───────────┘        │ delete on   │
//!                        │ command     │
//!                        └─────────────┘
//! ```
//!
//! Clients write blocks directly to peers; the leader only hands out
//! placements. Peers report inventory changes in heartbeats, and the
//! leader's monitor drives every block toward the configured replication
//! factor by piggybacking commands on heartbeat responses.
//!
//! ## Usage
//!
//! ### Start the leader
//! ```bash
//! minidfs-leader serve \
//!   --client-bind 0.0.0.0:5050 \
//!   --peer-bind 0.0.0.0:5051 \
//!   --db ./leader-data \
//!   --replication-factor 2
//! ```
//!
//! ### Use the CLI
//! ```bash
//! # Reserve a blob of three blocks and print the write targets
//! minidfs create-blob --blocks 3
//!
//! # Look up a committed blob
//! minidfs get-blob <blob-id>
//!
//! # Find the peers holding a block
//! minidfs get-block <block-id>
//! ```

pub mod client;
pub mod common;
pub mod leader;

// Re-export commonly used types
pub use common::{BlobId, BlockId, Error, LeaderConfig, NodeId, Result};
pub use leader::{Leader, LeaderServer};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
