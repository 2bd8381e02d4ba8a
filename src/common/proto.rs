//! Wire messages for the leader's two RPC surfaces
//!
//! Both surfaces speak newline-framed JSON (see [`crate::common::wire`]).
//! Requests and responses are externally tagged serde enums; field names
//! keep the Go-style capitalization the storage peers already speak.

use crate::common::{BlobId, BlockId, NodeId};
use serde::{Deserialize, Serialize};

// === Client surface ===

/// Requests a client may send over the client listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientRequest {
    /// Start a new blob; the session enters the creating state.
    CreateBlob,
    /// Mint the next block of the blob under creation and pick write targets.
    Append,
    /// Persist the manifest of the blob under creation.
    Commit,
    /// Ordered block list of a committed blob.
    GetBlob(BlobId),
    /// Addresses of the peers currently holding a block.
    GetBlock(BlockId),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientResponse {
    BlobCreated(BlobId),
    AppendTarget(ForwardBlock),
    Committed,
    BlobBlocks(Vec<BlockId>),
    BlockNodes(Vec<String>),
    Error(String),
}

/// One block plus the addresses it should land on, first address first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardBlock {
    #[serde(rename = "BlockID")]
    pub block_id: BlockId,
    #[serde(rename = "Nodes")]
    pub nodes: Vec<String>,
}

// === Peer surface ===

/// Requests a storage peer may send over the peer listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PeerRequest {
    /// Join the cluster; the address is assembled from the observed remote
    /// host and this port.
    Register { port: String },
    Heartbeat(HeartbeatMsg),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PeerResponse {
    Registered(NodeId),
    Heartbeat(HeartbeatResponse),
    Error(String),
}

/// Liveness, utilization, and inventory deltas, peer → leader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatMsg {
    #[serde(rename = "NodeID")]
    pub node_id: NodeId,
    #[serde(rename = "SpaceUsed")]
    pub space_used: u64,
    #[serde(rename = "NewBlocks", default)]
    pub new_blocks: Vec<BlockId>,
    #[serde(rename = "DeadBlocks", default)]
    pub dead_blocks: Vec<BlockId>,
}

/// Leader commands piggybacked on the heartbeat reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    /// The leader has forgotten this NodeID; the peer must re-register and
    /// re-announce its blocks under the fresh identity.
    #[serde(rename = "NeedToRegister")]
    pub need_to_register: bool,
    /// Blocks the peer should delete from local disk.
    #[serde(rename = "InvalidateBlocks", default)]
    pub invalidate_blocks: Vec<BlockId>,
    /// Blocks the peer should forward to other peers.
    #[serde(rename = "ToReplicate", default)]
    pub to_replicate: Vec<ForwardBlock>,
}
