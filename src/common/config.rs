//! Configuration for the minidfs leader

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Leader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderConfig {
    /// Bind address for the client RPC listener
    pub client_bind: SocketAddr,

    /// Bind address for the peer RPC listener
    pub peer_bind: SocketAddr,

    /// RocksDB path for blob manifests
    pub db_path: PathBuf,

    /// Target number of peers holding each block
    #[serde(default = "default_replication_factor")]
    pub replication_factor: usize,

    /// Monitor sweep period
    #[serde(default = "default_monitor_period")]
    pub monitor_period_ms: u64,

    /// How long a peer may stay silent before it is forgotten
    #[serde(default = "default_peer_timeout")]
    pub peer_timeout_ms: u64,

    /// How long a replication/deletion intent stays live before the monitor
    /// re-plans it
    #[serde(default = "default_intent_ttl")]
    pub intent_ttl_ms: u64,
}

fn default_replication_factor() -> usize {
    2
}
fn default_monitor_period() -> u64 {
    2_000
}
fn default_peer_timeout() -> u64 {
    20_000
}
fn default_intent_ttl() -> u64 {
    20_000
}

impl Default for LeaderConfig {
    fn default() -> Self {
        Self {
            client_bind: "0.0.0.0:5050".parse().unwrap(),
            peer_bind: "0.0.0.0:5051".parse().unwrap(),
            db_path: PathBuf::from("./leader-data"),
            replication_factor: default_replication_factor(),
            monitor_period_ms: default_monitor_period(),
            peer_timeout_ms: default_peer_timeout(),
            intent_ttl_ms: default_intent_ttl(),
        }
    }
}

impl LeaderConfig {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LeaderConfig = serde_json::from_str(&content)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Save to file
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| crate::Error::Internal(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.replication_factor == 0 {
            return Err(crate::Error::InvalidConfig(
                "replication_factor must be at least 1".into(),
            ));
        }
        if self.monitor_period_ms == 0 {
            return Err(crate::Error::InvalidConfig(
                "monitor_period_ms must be non-zero".into(),
            ));
        }
        // A lost command is only retried once its intent ages out; a TTL
        // shorter than the sweep period would expire intents before the
        // monitor can see them through.
        if self.intent_ttl_ms < self.monitor_period_ms {
            return Err(crate::Error::InvalidConfig(
                "intent_ttl_ms must not be shorter than monitor_period_ms".into(),
            ));
        }
        Ok(())
    }

    pub fn monitor_period(&self) -> Duration {
        Duration::from_millis(self.monitor_period_ms)
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms)
    }

    pub fn intent_ttl(&self) -> Duration {
        Duration::from_millis(self.intent_ttl_ms)
    }
}
