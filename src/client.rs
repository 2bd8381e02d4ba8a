//! Typed clients for the leader's two RPC surfaces
//!
//! `LeaderClient` drives the client listener (blob lifecycle and lookups);
//! `PeerClient` drives the peer listener (register/heartbeat). Peers open a
//! fresh connection per heartbeat cycle, so both clients are cheap to
//! construct.

use crate::common::proto::{
    ClientRequest, ClientResponse, ForwardBlock, HeartbeatMsg, HeartbeatResponse, PeerRequest,
    PeerResponse,
};
use crate::common::{wire, BlobId, BlockId, Error, NodeId, Result};
use tokio::io::BufReader;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

pub struct LeaderClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl LeaderClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
        })
    }

    async fn call(&mut self, request: &ClientRequest) -> Result<ClientResponse> {
        wire::write_frame(&mut self.writer, request).await?;
        match wire::read_frame(&mut self.reader).await? {
            Some(ClientResponse::Error(message)) => Err(Error::Remote(message)),
            Some(response) => Ok(response),
            None => Err(Error::ConnectionClosed),
        }
    }

    pub async fn create_blob(&mut self) -> Result<BlobId> {
        match self.call(&ClientRequest::CreateBlob).await? {
            ClientResponse::BlobCreated(blob_id) => Ok(blob_id),
            other => Err(unexpected(&other)),
        }
    }

    /// Mint the next block and learn where to stream it; the first address
    /// is the entry point of the forwarding chain.
    pub async fn append(&mut self) -> Result<ForwardBlock> {
        match self.call(&ClientRequest::Append).await? {
            ClientResponse::AppendTarget(fwd) => Ok(fwd),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn commit(&mut self) -> Result<()> {
        match self.call(&ClientRequest::Commit).await? {
            ClientResponse::Committed => Ok(()),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn get_blob(&mut self, blob_id: &BlobId) -> Result<Vec<BlockId>> {
        match self.call(&ClientRequest::GetBlob(blob_id.clone())).await? {
            ClientResponse::BlobBlocks(blocks) => Ok(blocks),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn get_block(&mut self, block_id: &BlockId) -> Result<Vec<String>> {
        match self.call(&ClientRequest::GetBlock(block_id.clone())).await? {
            ClientResponse::BlockNodes(nodes) => Ok(nodes),
            other => Err(unexpected(&other)),
        }
    }
}

pub struct PeerClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl PeerClient {
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half),
            writer,
        })
    }

    async fn call(&mut self, request: &PeerRequest) -> Result<PeerResponse> {
        wire::write_frame(&mut self.writer, request).await?;
        match wire::read_frame(&mut self.reader).await? {
            Some(PeerResponse::Error(message)) => Err(Error::Remote(message)),
            Some(response) => Ok(response),
            None => Err(Error::ConnectionClosed),
        }
    }

    /// Join the cluster, advertising the port this peer serves blocks on.
    pub async fn register(&mut self, port: &str) -> Result<NodeId> {
        let request = PeerRequest::Register { port: port.into() };
        match self.call(&request).await? {
            PeerResponse::Registered(node_id) => Ok(node_id),
            other => Err(unexpected(&other)),
        }
    }

    pub async fn heartbeat(&mut self, msg: HeartbeatMsg) -> Result<HeartbeatResponse> {
        match self.call(&PeerRequest::Heartbeat(msg)).await? {
            PeerResponse::Heartbeat(response) => Ok(response),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(response: &impl std::fmt::Debug) -> Error {
    Error::Protocol(format!("unexpected response: {:?}", response))
}
