//! Client-facing RPC session
//!
//! One session per connection, with two states: idle, or accumulating
//! blocks for exactly one blob. Any RPC arriving in the wrong state fails
//! with a protocol error and leaves the state unchanged. A session that
//! disconnects mid-creation abandons its blocks; nothing was committed.

use crate::common::proto::{ClientRequest, ClientResponse, ForwardBlock};
use crate::common::{BlobId, BlockId, Error, Result};
use crate::leader::state::Leader;
use std::sync::Arc;

enum SessionState {
    Start,
    Creating {
        blob_id: BlobId,
        blocks: Vec<BlockId>,
    },
}

pub struct ClientSession {
    leader: Arc<Leader>,
    state: SessionState,
}

impl ClientSession {
    pub fn new(leader: Arc<Leader>) -> Self {
        Self {
            leader,
            state: SessionState::Start,
        }
    }

    pub fn handle(&mut self, request: ClientRequest) -> Result<ClientResponse> {
        match request {
            ClientRequest::CreateBlob => self.create_blob(),
            ClientRequest::Append => self.append(),
            ClientRequest::Commit => self.commit(),
            ClientRequest::GetBlob(blob_id) => self.get_blob(&blob_id),
            ClientRequest::GetBlock(block_id) => self.get_block(&block_id),
        }
    }

    fn create_blob(&mut self) -> Result<ClientResponse> {
        if !matches!(self.state, SessionState::Start) {
            return Err(Error::SessionState);
        }
        let blob_id = BlobId::generate();
        self.state = SessionState::Creating {
            blob_id: blob_id.clone(),
            blocks: Vec::new(),
        };
        Ok(ClientResponse::BlobCreated(blob_id))
    }

    fn append(&mut self) -> Result<ClientResponse> {
        let SessionState::Creating { blocks, .. } = &mut self.state else {
            return Err(Error::SessionState);
        };
        let block_id = BlockId::generate();
        blocks.push(block_id.clone());
        let nodes = self.leader.choose_write_targets();
        Ok(ClientResponse::AppendTarget(ForwardBlock { block_id, nodes }))
    }

    fn commit(&mut self) -> Result<ClientResponse> {
        match std::mem::replace(&mut self.state, SessionState::Start) {
            SessionState::Creating { blob_id, blocks } => {
                self.leader.commit_blob(&blob_id, &blocks)?;
                tracing::info!(blob = %blob_id, blocks = blocks.len(), "committed blob");
                Ok(ClientResponse::Committed)
            }
            SessionState::Start => Err(Error::SessionState),
        }
    }

    fn get_blob(&self, blob_id: &BlobId) -> Result<ClientResponse> {
        if !matches!(self.state, SessionState::Start) {
            return Err(Error::SessionState);
        }
        Ok(ClientResponse::BlobBlocks(self.leader.get_blob(blob_id)?))
    }

    fn get_block(&self, block_id: &BlockId) -> Result<ClientResponse> {
        if !matches!(self.state, SessionState::Start) {
            return Err(Error::SessionState);
        }
        Ok(ClientResponse::BlockNodes(
            self.leader.get_block_addresses(block_id),
        ))
    }
}
