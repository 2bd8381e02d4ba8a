//! Time-bounded replication and deletion intents
//!
//! An intent records a planned action so the monitor does not issue the same
//! command twice while a peer is still working on it. Commands are delivered
//! at most once (the `sent` flag); recovery from a lost command is purely
//! TTL-based. Expiry is lazy: `in_progress` purges stale entries as a side
//! effect, which is what lets the next sweep re-plan the action.

use crate::common::{BlockId, NodeId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct ReplicationEntry {
    started_at: Instant,
    sent: bool,
    available_from: Vec<NodeId>,
    forward_to: Vec<NodeId>,
}

/// At most one active entry per block.
pub struct ReplicationIntents {
    ttl: Duration,
    entries: HashMap<BlockId, ReplicationEntry>,
}

impl ReplicationIntents {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Record a planned replication. Callers must consult `in_progress`
    /// first; a second active intent for the same block is a logic error.
    pub fn add(&mut self, block: BlockId, from: Vec<NodeId>, to: Vec<NodeId>) {
        assert!(
            !self.in_progress(&block),
            "already replicating block '{}'",
            block
        );
        self.entries.insert(
            block,
            ReplicationEntry {
                started_at: Instant::now(),
                sent: false,
                available_from: from,
                forward_to: to,
            },
        );
    }

    /// Commands for `node`: every unsent intent listing it as a source.
    /// Returned intents are flagged so the command is delivered only once.
    pub fn get(&mut self, node: &NodeId) -> Vec<(BlockId, Vec<NodeId>)> {
        let mut actions = Vec::new();
        for (block, entry) in self.entries.iter_mut() {
            if entry.sent {
                continue;
            }
            if entry.available_from.contains(node) {
                entry.sent = true;
                actions.push((block.clone(), entry.forward_to.clone()));
            }
        }
        actions
    }

    /// Is a live intent recorded for this block? Purges the entry when it
    /// has aged past the TTL.
    pub fn in_progress(&mut self, block: &BlockId) -> bool {
        match self.entries.get(block) {
            Some(entry) if entry.started_at.elapsed() < self.ttl => true,
            Some(_) => {
                self.entries.remove(block);
                false
            }
            None => false,
        }
    }
}

struct DeletionEntry {
    started_at: Instant,
    sent: bool,
    block: BlockId,
    node: NodeId,
}

/// At most one active entry per (block, node) pair.
pub struct DeletionIntents {
    ttl: Duration,
    entries: Vec<DeletionEntry>,
}

impl DeletionIntents {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Vec::new(),
        }
    }

    /// Record one planned deletion per listed node.
    pub fn add(&mut self, block: &BlockId, from: &[NodeId]) {
        for node in from {
            assert!(
                !self.pair_live(block, node),
                "already deleting block '{}' from '{}'",
                block,
                node
            );
            self.entries.push(DeletionEntry {
                started_at: Instant::now(),
                sent: false,
                block: block.clone(),
                node: node.clone(),
            });
        }
    }

    fn pair_live(&self, block: &BlockId, node: &NodeId) -> bool {
        self.entries.iter().any(|e| {
            e.block == *block && e.node == *node && e.started_at.elapsed() < self.ttl
        })
    }

    /// Live intents targeting `node`. Used to discount its utilization:
    /// blocks about to be deleted will free space.
    pub fn count(&self, node: &NodeId) -> usize {
        self.entries
            .iter()
            .filter(|e| e.node == *node && e.started_at.elapsed() < self.ttl)
            .count()
    }

    /// Commands for `node`: every not-yet-sent intent targeting it. Flags
    /// the entries and refreshes their timestamps.
    pub fn get(&mut self, node: &NodeId) -> Vec<BlockId> {
        let mut deletions = Vec::new();
        for entry in self.entries.iter_mut() {
            if entry.sent || entry.node != *node {
                continue;
            }
            entry.sent = true;
            entry.started_at = Instant::now();
            deletions.push(entry.block.clone());
        }
        deletions
    }

    /// The peer reported the block gone; drop every matching entry.
    pub fn done(&mut self, node: &NodeId, block: &BlockId) {
        self.entries.retain(|e| !(e.node == *node && e.block == *block));
    }

    /// Is any live intent recorded for this block? Purges aged-out entries
    /// for it.
    pub fn in_progress(&mut self, block: &BlockId) -> bool {
        let ttl = self.ttl;
        let mut live = false;
        self.entries.retain(|e| {
            if e.block != *block {
                return true;
            }
            if e.started_at.elapsed() < ttl {
                live = true;
                true
            } else {
                false
            }
        });
        live
    }
}
