//! Leader implementation
//!
//! The leader is responsible for:
//! - Blob manifests (blob → ordered blocks, durable)
//! - Block placement (block ↔ peers, in memory)
//! - Peer lifecycle (registration, heartbeats, expiry)
//! - Driving every block toward the replication factor via
//!   replication/deletion intents delivered on heartbeat responses

pub mod client_session;
pub mod intents;
pub mod manifest;
pub mod peer_session;
pub mod server;
pub mod state;

pub use server::LeaderServer;
pub use state::Leader;
