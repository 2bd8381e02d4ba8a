//! Peer-facing RPC handler
//!
//! Stateless across requests: registration mints an identity, and every
//! heartbeat is self-contained. Leader commands ride back on the heartbeat
//! response; there is no leader-initiated channel to the peers.

use crate::common::proto::{PeerRequest, PeerResponse};
use crate::common::{Error, Result};
use crate::leader::state::Leader;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

pub struct PeerSession {
    leader: Arc<Leader>,
    /// Host the connection arrived from; combined with the advertised port
    /// to form the peer's data address.
    remote_ip: IpAddr,
}

impl PeerSession {
    pub fn new(leader: Arc<Leader>, remote_ip: IpAddr) -> Self {
        Self { leader, remote_ip }
    }

    pub fn handle(&mut self, request: PeerRequest) -> Result<PeerResponse> {
        match request {
            PeerRequest::Register { port } => self.register(&port),
            PeerRequest::Heartbeat(msg) => {
                Ok(PeerResponse::Heartbeat(self.leader.process_heartbeat(&msg)))
            }
        }
    }

    fn register(&self, port: &str) -> Result<PeerResponse> {
        let port: u16 = port
            .parse()
            .map_err(|_| Error::Protocol(format!("invalid port '{}'", port)))?;
        let address = SocketAddr::new(self.remote_ip, port).to_string();
        let node_id = self.leader.register_peer(address.clone());
        tracing::info!(node = %node_id, address = %address, "peer registered");
        Ok(PeerResponse::Registered(node_id))
    }
}
