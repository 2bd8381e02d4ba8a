//! Leader server
//!
//! Two TCP listeners (clients and peers), one task per accepted connection,
//! plus the long-lived monitor task. All shared state lives in the
//! `Arc<Leader>` handed to every task.

use crate::common::proto::{ClientResponse, PeerResponse};
use crate::common::{wire, LeaderConfig, Result};
use crate::leader::client_session::ClientSession;
use crate::leader::peer_session::PeerSession;
use crate::leader::state::Leader;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

pub struct LeaderServer {
    leader: Arc<Leader>,
    client_listener: TcpListener,
    peer_listener: TcpListener,
    monitor_period: Duration,
}

impl LeaderServer {
    /// Open the leader state and bind both listeners.
    pub async fn bind(config: &LeaderConfig) -> Result<Self> {
        let leader = Arc::new(Leader::open(config)?);
        let client_listener = TcpListener::bind(config.client_bind).await?;
        let peer_listener = TcpListener::bind(config.peer_bind).await?;

        tracing::info!("Starting leader");
        tracing::info!("  Client RPC: {}", client_listener.local_addr()?);
        tracing::info!("  Peer RPC: {}", peer_listener.local_addr()?);
        tracing::info!("  Replication factor: {}", config.replication_factor);

        Ok(Self {
            leader,
            client_listener,
            peer_listener,
            monitor_period: config.monitor_period(),
        })
    }

    /// Actual client listener address (useful with a port-0 bind).
    pub fn client_addr(&self) -> Result<SocketAddr> {
        Ok(self.client_listener.local_addr()?)
    }

    /// Actual peer listener address.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        Ok(self.peer_listener.local_addr()?)
    }

    /// Accept connections forever.
    pub async fn serve(self) -> Result<()> {
        let monitor_leader = self.leader.clone();
        let period = self.monitor_period;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                monitor_leader.sweep();
            }
        });

        loop {
            tokio::select! {
                conn = self.client_listener.accept() => {
                    let (stream, addr) = conn?;
                    let leader = self.leader.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve_client(leader, stream).await {
                            tracing::debug!(client = %addr, error = %e, "client session ended");
                        }
                    });
                }
                conn = self.peer_listener.accept() => {
                    let (stream, addr) = conn?;
                    let leader = self.leader.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve_peer(leader, stream, addr.ip()).await {
                            tracing::debug!(peer = %addr, error = %e, "peer session ended");
                        }
                    });
                }
            }
        }
    }
}

async fn serve_client(leader: Arc<Leader>, stream: TcpStream) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut session = ClientSession::new(leader);

    while let Some(request) = wire::read_frame(&mut reader).await? {
        let response = match session.handle(request) {
            Ok(response) => response,
            Err(e) if e.is_fatal() => {
                tracing::error!(error = %e, "manifest store failure; shutting down");
                std::process::exit(1);
            }
            Err(e) => ClientResponse::Error(e.to_string()),
        };
        wire::write_frame(&mut write_half, &response).await?;
    }
    Ok(())
}

async fn serve_peer(leader: Arc<Leader>, stream: TcpStream, remote_ip: IpAddr) -> Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut session = PeerSession::new(leader, remote_ip);

    while let Some(request) = wire::read_frame(&mut reader).await? {
        let response = match session.handle(request) {
            Ok(response) => response,
            Err(e) if e.is_fatal() => {
                tracing::error!(error = %e, "manifest store failure; shutting down");
                std::process::exit(1);
            }
            Err(e) => PeerResponse::Error(e.to_string()),
        };
        wire::write_frame(&mut write_half, &response).await?;
    }
    Ok(())
}
