//! Durable blob manifests using RocksDB
//!
//! A manifest maps a blob id to the ordered list of block ids committed for
//! it. The store performs no locking of its own; every call happens under
//! the leader mutex.

use crate::common::{BlobId, BlockId, Result};
use rocksdb::{Options, DB};
use std::path::Path;

/// Manifest store
pub struct ManifestStore {
    db: DB,
}

impl ManifestStore {
    /// Open or create the manifest store
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, path)?;

        Ok(Self { db })
    }

    /// Append one block to a blob's manifest, creating it if absent
    pub fn append(&self, blob: &BlobId, block: &BlockId) -> Result<()> {
        let mut blocks = self.get(blob)?;
        blocks.push(block.clone());
        let value = bincode::serialize(&blocks)
            .map_err(|e| crate::Error::Internal(format!("Serialize error: {}", e)))?;
        self.db.put(blob.as_str().as_bytes(), value)?;
        Ok(())
    }

    /// Ordered blocks of a blob; empty when the blob is unknown
    pub fn get(&self, blob: &BlobId) -> Result<Vec<BlockId>> {
        match self.db.get(blob.as_str().as_bytes())? {
            Some(bytes) => bincode::deserialize(&bytes)
                .map_err(|e| crate::Error::ManifestCorrupted(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    /// Flush to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}
