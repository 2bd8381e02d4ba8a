//! Error types for minidfs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Protocol Errors ===
    #[error("Not allowed in current session state")]
    SessionState,

    #[error("Malformed request: {0}")]
    Protocol(String),

    #[error("Connection closed by remote")]
    ConnectionClosed,

    #[error("Leader error: {0}")]
    Remote(String),

    // === Manifest Errors ===
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("Manifest corrupted: {0}")]
    ManifestCorrupted(String),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Does this error compromise the durable manifest store?
    ///
    /// The leader cannot keep coordinating once one of these surfaces; the
    /// server shuts the process down instead of answering the request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RocksDb(_) | Error::ManifestCorrupted(_))
    }

    /// Is this error reported in-band to the remote caller, leaving the
    /// connection open?
    pub fn is_protocol(&self) -> bool {
        matches!(self, Error::SessionState | Error::Protocol(_))
    }
}

// Implement From for common error types
impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
