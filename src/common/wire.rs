//! Newline-delimited JSON framing
//!
//! One request or response per line. Used by both RPC surfaces and by the
//! typed clients; the session loops in `leader::server` pair one
//! `read_frame` with one `write_frame` per RPC.

use crate::common::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Read one frame. `Ok(None)` means the remote closed the connection
/// cleanly between frames.
pub async fn read_frame<T, R>(reader: &mut R) -> Result<Option<T>>
where
    T: DeserializeOwned,
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let n = reader.read_line(&mut line).await?;
    if n == 0 {
        return Ok(None);
    }
    let msg = serde_json::from_str(line.trim_end())
        .map_err(|e| Error::Protocol(format!("bad frame: {}", e)))?;
    Ok(Some(msg))
}

/// Serialize one frame and flush it.
pub async fn write_frame<T, W>(writer: &mut W, msg: &T) -> Result<()>
where
    T: Serialize,
    W: AsyncWrite + Unpin,
{
    let mut buf = serde_json::to_vec(msg)
        .map_err(|e| Error::Internal(format!("serialize frame: {}", e)))?;
    buf.push(b'\n');
    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}
