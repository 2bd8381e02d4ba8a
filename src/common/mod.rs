//! Common types shared across minidfs

pub mod config;
pub mod error;
pub mod id;
pub mod proto;
pub mod wire;

pub use config::LeaderConfig;
pub use error::{Error, Result};
pub use id::{BlobId, BlockId, NodeId};
