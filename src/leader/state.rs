//! In-memory coordination state for the leader
//!
//! One mutex guards everything mutable: the peer table, the block placement
//! maps, the intent tables, and the manifest store handle (the store is
//! single-writer, so its calls stay under the lock too). RPC sessions and
//! the monitor sweep take the lock, do in-memory work, and release it before
//! touching the network.
//!
//! Placement and inventory are the same relation indexed both ways; every
//! mutation touches both maps in the same critical section.

use crate::common::proto::{ForwardBlock, HeartbeatMsg, HeartbeatResponse};
use crate::common::{BlobId, BlockId, LeaderConfig, NodeId, Result};
use crate::leader::intents::{DeletionIntents, ReplicationIntents};
use crate::leader::manifest::ManifestStore;
use rand::seq::SliceRandom;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Everything the leader knows about one registered peer.
struct PeerInfo {
    address: String,
    last_seen: Instant,
    /// Reported block count, optimistically bumped when the peer is chosen
    /// as a write target.
    utilization: u64,
}

#[derive(Clone, Copy, PartialEq)]
enum UtilizationOrder {
    LeastUsed,
    MostUsed,
}

struct LeaderInner {
    peers: HashMap<NodeId, PeerInfo>,
    /// block → peers holding it. An entry with an empty set is a block that
    /// has been declared lost; it is kept, not forgotten.
    placements: HashMap<BlockId, HashSet<NodeId>>,
    /// peer → blocks it holds. Inverse of `placements` at all times.
    inventory: HashMap<NodeId, HashSet<BlockId>>,
    replication_intents: ReplicationIntents,
    deletion_intents: DeletionIntents,
    manifests: ManifestStore,
}

/// The leader's coordination engine.
///
/// Shared between all RPC sessions and the monitor task as `Arc<Leader>`.
pub struct Leader {
    inner: Mutex<LeaderInner>,
    replication_factor: usize,
    peer_timeout: Duration,
}

impl Leader {
    /// Open the manifest store and start with an empty cluster view.
    pub fn open(config: &LeaderConfig) -> Result<Self> {
        let manifests = ManifestStore::open(&config.db_path)?;
        tracing::info!(path = %config.db_path.display(), "manifest store open");

        Ok(Self {
            inner: Mutex::new(LeaderInner {
                peers: HashMap::new(),
                placements: HashMap::new(),
                inventory: HashMap::new(),
                replication_intents: ReplicationIntents::new(config.intent_ttl()),
                deletion_intents: DeletionIntents::new(config.intent_ttl()),
                manifests,
            }),
            replication_factor: config.replication_factor,
            peer_timeout: config.peer_timeout(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, LeaderInner> {
        self.inner.lock().unwrap()
    }

    /// Mint a NodeId for a newly joined peer.
    pub fn register_peer(&self, address: String) -> NodeId {
        let node = NodeId::generate();
        self.lock().peers.insert(
            node.clone(),
            PeerInfo {
                address,
                last_seen: Instant::now(),
                utilization: 0,
            },
        );
        node
    }

    /// Refresh a peer's liveness and utilization. `false` means the leader
    /// has forgotten this id and the peer must re-register.
    pub fn heartbeat(&self, node: &NodeId, utilization: u64) -> bool {
        self.lock().heartbeat(node, utilization)
    }

    /// Apply a peer's reported new blocks.
    pub fn has_blocks(&self, node: &NodeId, blocks: &[BlockId]) {
        self.lock().has_blocks(node, blocks);
    }

    /// Apply a peer's reported removed blocks, closing matching deletion
    /// intents.
    pub fn doesnt_have_blocks(&self, node: &NodeId, blocks: &[BlockId]) {
        self.lock().doesnt_have_blocks(node, blocks);
    }

    /// Ordered block list of a committed blob; empty when unknown.
    pub fn get_blob(&self, blob: &BlobId) -> Result<Vec<BlockId>> {
        self.lock().manifests.get(blob)
    }

    /// Addresses of all peers currently holding the block, in no particular
    /// order.
    pub fn get_block_addresses(&self, block: &BlockId) -> Vec<String> {
        let inner = self.lock();
        let Some(holders) = inner.placements.get(block) else {
            return Vec::new();
        };
        holders
            .iter()
            .filter_map(|n| inner.peers.get(n).map(|p| p.address.clone()))
            .collect()
    }

    /// Persist a blob's manifest, block by block, in order.
    pub fn commit_blob(&self, blob: &BlobId, blocks: &[BlockId]) -> Result<()> {
        let inner = self.lock();
        for block in blocks {
            inner.manifests.append(blob, block)?;
        }
        Ok(())
    }

    /// Pick up to replication-factor least-utilized peers for a fresh block.
    /// The chosen peers' utilization is bumped before the lock is released,
    /// so concurrent writers spread instead of piling on the same peers.
    pub fn choose_write_targets(&self) -> Vec<String> {
        let mut inner = self.lock();
        let chosen: Vec<NodeId> = inner
            .nodes_by_utilization(UtilizationOrder::LeastUsed)
            .into_iter()
            .take(self.replication_factor)
            .collect();

        let mut addrs = Vec::with_capacity(chosen.len());
        for node in chosen {
            if let Some(peer) = inner.peers.get_mut(&node) {
                peer.utilization += 1;
                addrs.push(peer.address.clone());
            }
        }
        addrs
    }

    /// Process one heartbeat atomically: liveness refresh, inventory deltas
    /// (new before dead), then drain of any pending commands for this peer.
    pub fn process_heartbeat(&self, msg: &HeartbeatMsg) -> HeartbeatResponse {
        let mut inner = self.lock();

        if !inner.heartbeat(&msg.node_id, msg.space_used) {
            return HeartbeatResponse {
                need_to_register: true,
                ..Default::default()
            };
        }
        tracing::debug!(node = %msg.node_id, space_used = msg.space_used, "heartbeat");

        inner.has_blocks(&msg.node_id, &msg.new_blocks);
        inner.doesnt_have_blocks(&msg.node_id, &msg.dead_blocks);

        let invalidate_blocks = inner.deletion_intents.get(&msg.node_id);
        let to_replicate = inner
            .replication_intents
            .get(&msg.node_id)
            .into_iter()
            .map(|(block_id, to)| ForwardBlock {
                block_id,
                // Resolve addresses now: a peer expired since planning has
                // already left the peer table, so it simply drops out.
                nodes: to
                    .iter()
                    .filter_map(|n| inner.peers.get(n).map(|p| p.address.clone()))
                    .collect(),
            })
            .collect();

        HeartbeatResponse {
            need_to_register: false,
            invalidate_blocks,
            to_replicate,
        }
    }

    /// One monitor pass: expire silent peers, then drive every block toward
    /// the replication factor.
    pub fn sweep(&self) {
        let mut inner = self.lock();
        inner.expire_peers(self.peer_timeout);
        inner.plan_repairs(self.replication_factor);
    }
}

impl LeaderInner {
    fn heartbeat(&mut self, node: &NodeId, utilization: u64) -> bool {
        match self.peers.get_mut(node) {
            Some(peer) => {
                peer.last_seen = Instant::now();
                peer.utilization = utilization;
                true
            }
            None => false,
        }
    }

    fn has_blocks(&mut self, node: &NodeId, blocks: &[BlockId]) {
        for block in blocks {
            self.placements
                .entry(block.clone())
                .or_default()
                .insert(node.clone());
            self.inventory
                .entry(node.clone())
                .or_default()
                .insert(block.clone());
        }
    }

    fn doesnt_have_blocks(&mut self, node: &NodeId, blocks: &[BlockId]) {
        for block in blocks {
            self.deletion_intents.done(node, block);
            if let Some(holders) = self.placements.get_mut(block) {
                holders.remove(node);
            }
            if let Some(held) = self.inventory.get_mut(node) {
                held.remove(block);
            }
        }
    }

    /// All known peers, uniformly shuffled, then stably sorted by effective
    /// utilization. The shuffle breaks utilization ties uniformly.
    fn nodes_by_utilization(&self, order: UtilizationOrder) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.peers.keys().cloned().collect();
        nodes.shuffle(&mut rand::thread_rng());
        match order {
            UtilizationOrder::LeastUsed => {
                nodes.sort_by_key(|n| self.effective_utilization(n));
            }
            UtilizationOrder::MostUsed => {
                nodes.sort_by_key(|n| Reverse(self.effective_utilization(n)));
            }
        }
        nodes
    }

    /// Reported utilization minus pending deletions against the node:
    /// blocks about to be deleted will free space.
    fn effective_utilization(&self, node: &NodeId) -> i64 {
        let reported = self.peers.get(node).map(|p| p.utilization as i64).unwrap_or(0);
        reported - self.deletion_intents.count(node) as i64
    }

    fn expire_peers(&mut self, timeout: Duration) {
        let expired: Vec<NodeId> = self
            .peers
            .iter()
            .filter(|(_, peer)| peer.last_seen.elapsed() > timeout)
            .map(|(node, _)| node.clone())
            .collect();

        for node in expired {
            tracing::warn!(node = %node, "forgetting absent peer");
            self.peers.remove(&node);
            if let Some(held) = self.inventory.remove(&node) {
                for block in held {
                    if let Some(holders) = self.placements.get_mut(&block) {
                        holders.remove(&node);
                    }
                }
            }
            // Intents naming this node are left to age out; by then the
            // next sweep sees the real placement and re-plans.
        }
    }

    fn plan_repairs(&mut self, replication_factor: usize) {
        let blocks: Vec<BlockId> = self.placements.keys().cloned().collect();
        for block in blocks {
            if self.replication_intents.in_progress(&block)
                || self.deletion_intents.in_progress(&block)
            {
                continue;
            }

            let holders: HashSet<NodeId> = self.placements[&block].clone();

            if holders.len() > replication_factor {
                let excess = holders.len() - replication_factor;
                let delete_from: Vec<NodeId> = self
                    .nodes_by_utilization(UtilizationOrder::MostUsed)
                    .into_iter()
                    .filter(|n| holders.contains(n))
                    .take(excess)
                    .collect();
                tracing::info!(
                    block = %block,
                    replicas = holders.len(),
                    targets = ?delete_from,
                    "block is over-replicated"
                );
                self.deletion_intents.add(&block, &delete_from);
            } else if holders.len() < replication_factor {
                if holders.is_empty() {
                    // No source to copy from: the block is lost. Keep the
                    // placement entry as the record of that.
                    tracing::warn!(block = %block, "block has no replicas left");
                    continue;
                }
                let missing = replication_factor - holders.len();
                let forward_to: Vec<NodeId> = self
                    .nodes_by_utilization(UtilizationOrder::LeastUsed)
                    .into_iter()
                    .filter(|n| !holders.contains(n))
                    .take(missing)
                    .collect();
                if forward_to.is_empty() {
                    // Every live peer already holds it; retry next sweep.
                    continue;
                }
                tracing::info!(
                    block = %block,
                    replicas = holders.len(),
                    targets = ?forward_to,
                    "block is under-replicated"
                );
                self.replication_intents
                    .add(block, holders.into_iter().collect(), forward_to);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::thread::sleep;
    use tempfile::tempdir;

    fn test_leader(dir: &tempfile::TempDir, replication_factor: usize) -> Leader {
        let config = LeaderConfig {
            db_path: dir.path().join("manifests"),
            replication_factor,
            peer_timeout_ms: 100,
            intent_ttl_ms: 100,
            monitor_period_ms: 20,
            ..Default::default()
        };
        Leader::open(&config).unwrap()
    }

    fn block(s: &str) -> BlockId {
        BlockId::from(s)
    }

    /// placement[b] contains n ⇔ inventory[n] contains b
    fn assert_consistent(leader: &Leader) {
        let inner = leader.lock();
        for (block, holders) in &inner.placements {
            for node in holders {
                assert!(
                    inner.inventory.get(node).is_some_and(|held| held.contains(block)),
                    "placement lists {} on {} but inventory disagrees",
                    block,
                    node
                );
            }
        }
        for (node, held) in &inner.inventory {
            for block in held {
                assert!(
                    inner.placements.get(block).is_some_and(|h| h.contains(node)),
                    "inventory lists {} on {} but placement disagrees",
                    block,
                    node
                );
            }
        }
    }

    #[test]
    fn test_register_and_heartbeat() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);

        let node = leader.register_peer("127.0.0.1:7000".into());
        assert!(leader.heartbeat(&node, 5));
        assert!(!leader.heartbeat(&NodeId::from("unknown"), 5));
    }

    #[test]
    fn test_unknown_heartbeat_leaves_no_trace() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);

        let ghost = NodeId::from("ghost");
        assert!(!leader.heartbeat(&ghost, 5));
        assert!(leader.lock().peers.is_empty());
    }

    #[test]
    fn test_inventory_set_semantics() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        let node = leader.register_peer("127.0.0.1:7000".into());

        leader.has_blocks(&node, &[block("b1"), block("b2")]);
        leader.has_blocks(&node, &[block("b1")]);
        assert_consistent(&leader);
        assert_eq!(leader.get_block_addresses(&block("b1")).len(), 1);

        leader.doesnt_have_blocks(&node, &[block("b1")]);
        assert_consistent(&leader);
        assert!(leader.get_block_addresses(&block("b1")).is_empty());
        assert_eq!(leader.get_block_addresses(&block("b2")).len(), 1);

        // The lost block stays recorded with an empty holder set.
        assert!(leader.lock().placements.contains_key(&block("b1")));
    }

    #[test]
    fn test_commit_and_get_blob_round_trip() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);

        let blob = BlobId::generate();
        let blocks = vec![block("b1"), block("b2"), block("b3")];
        leader.commit_blob(&blob, &blocks).unwrap();

        assert_eq!(leader.get_blob(&blob).unwrap(), blocks);
        assert!(leader.get_blob(&BlobId::from("unknown")).unwrap().is_empty());
    }

    #[test]
    fn test_choose_write_targets_caps_and_bumps() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        for port in [7001, 7002, 7003] {
            leader.register_peer(format!("127.0.0.1:{}", port));
        }

        let first = leader.choose_write_targets();
        assert_eq!(first.len(), 2);
        let first: HashSet<String> = first.into_iter().collect();
        assert_eq!(first.len(), 2, "targets must be distinct peers");

        // The two chosen peers were bumped to utilization 1, so the third
        // peer must be in the next pick.
        let second: HashSet<String> = leader.choose_write_targets().into_iter().collect();
        let third_peer: HashSet<String> =
            ["127.0.0.1:7001", "127.0.0.1:7002", "127.0.0.1:7003"]
                .into_iter()
                .map(String::from)
                .filter(|a| !first.contains(a))
                .collect();
        assert!(third_peer.iter().all(|a| second.contains(a)));
    }

    #[test]
    fn test_choose_write_targets_with_too_few_peers() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 3);
        leader.register_peer("127.0.0.1:7001".into());

        assert_eq!(leader.choose_write_targets().len(), 1);
    }

    #[test]
    fn test_tied_utilization_choice_is_spread() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 1);
        for port in 7001..7004 {
            leader.register_peer(format!("127.0.0.1:{}", port));
        }

        // With all utilizations pinned equal, the shuffle should reach every
        // peer across enough draws.
        let mut seen = HashSet::new();
        for _ in 0..200 {
            for addr in leader.choose_write_targets() {
                seen.insert(addr);
            }
            // Undo the optimistic bumps to keep the tie.
            for peer in leader.lock().peers.values_mut() {
                peer.utilization = 0;
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_sweep_plans_replication_for_under_replicated_block() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 3);
        let holder = leader.register_peer("127.0.0.1:7001".into());
        leader.register_peer("127.0.0.1:7002".into());
        leader.register_peer("127.0.0.1:7003".into());

        leader.has_blocks(&holder, &[block("b1")]);
        leader.sweep();

        let mut inner = leader.lock();
        assert!(inner.replication_intents.in_progress(&block("b1")));
        let actions = inner.replication_intents.get(&holder);
        assert_eq!(actions.len(), 1);
        let (ref b, ref to) = actions[0];
        assert_eq!(*b, block("b1"));
        assert_eq!(to.len(), 2);
        assert!(!to.contains(&holder));
    }

    #[test]
    fn test_sweep_takes_shortfall_as_is() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 3);
        let holder = leader.register_peer("127.0.0.1:7001".into());
        leader.register_peer("127.0.0.1:7002".into());

        leader.has_blocks(&holder, &[block("b1")]);
        leader.sweep();

        let mut inner = leader.lock();
        let actions = inner.replication_intents.get(&holder);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].1.len(), 1, "only one peer is free to receive");
    }

    #[test]
    fn test_sweep_plans_deletion_for_over_replicated_block() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        let nodes: Vec<NodeId> = (7001..7004)
            .map(|port| leader.register_peer(format!("127.0.0.1:{}", port)))
            .collect();
        for node in &nodes {
            leader.has_blocks(node, &[block("b1")]);
        }
        // Make the busiest holder unambiguous.
        leader.heartbeat(&nodes[0], 10);

        leader.sweep();

        let mut inner = leader.lock();
        assert!(inner.deletion_intents.in_progress(&block("b1")));
        assert_eq!(inner.deletion_intents.get(&nodes[0]), vec![block("b1")]);
        assert!(inner.deletion_intents.get(&nodes[1]).is_empty());
        assert!(inner.deletion_intents.get(&nodes[2]).is_empty());
    }

    #[test]
    fn test_sweep_skips_blocks_with_intent_in_progress() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 3);
        let holder = leader.register_peer("127.0.0.1:7001".into());
        leader.register_peer("127.0.0.1:7002".into());

        leader.has_blocks(&holder, &[block("b1")]);
        leader.sweep();
        // A second sweep inside the TTL must not double-plan (the add would
        // assert).
        leader.sweep();
    }

    #[test]
    fn test_sweep_replans_after_intent_expiry() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        let holder = leader.register_peer("127.0.0.1:7001".into());
        let idle = leader.register_peer("127.0.0.1:7002".into());

        leader.has_blocks(&holder, &[block("b1")]);
        leader.sweep();
        {
            let mut inner = leader.lock();
            assert_eq!(inner.replication_intents.get(&holder).len(), 1);
        }

        // Intent TTL is 100ms in the test config; keep the peers alive while
        // it ages out (peer timeout is also 100ms).
        sleep(Duration::from_millis(60));
        leader.heartbeat(&holder, 1);
        leader.heartbeat(&idle, 0);
        sleep(Duration::from_millis(60));
        leader.heartbeat(&holder, 1);
        leader.heartbeat(&idle, 0);

        leader.sweep();
        let mut inner = leader.lock();
        assert_eq!(
            inner.replication_intents.get(&holder).len(),
            1,
            "expired intent should be re-planned and re-delivered"
        );
    }

    #[test]
    fn test_sweep_creates_no_intent_for_lost_block() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        let node = leader.register_peer("127.0.0.1:7001".into());
        leader.register_peer("127.0.0.1:7002".into());

        leader.has_blocks(&node, &[block("b1")]);
        leader.doesnt_have_blocks(&node, &[block("b1")]);
        leader.sweep();

        let mut inner = leader.lock();
        assert!(!inner.replication_intents.in_progress(&block("b1")));
        assert!(!inner.deletion_intents.in_progress(&block("b1")));
    }

    #[test]
    fn test_expired_peer_is_fully_erased() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        let node = leader.register_peer("127.0.0.1:7001".into());
        leader.has_blocks(&node, &[block("b1"), block("b2")]);

        sleep(Duration::from_millis(150));
        leader.sweep();

        let inner = leader.lock();
        assert!(!inner.peers.contains_key(&node));
        assert!(!inner.inventory.contains_key(&node));
        for holders in inner.placements.values() {
            assert!(!holders.contains(&node));
        }
        drop(inner);
        assert_consistent(&leader);
    }

    #[test]
    fn test_heartbeat_keeps_peer_alive() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        let node = leader.register_peer("127.0.0.1:7001".into());

        sleep(Duration::from_millis(40));
        leader.heartbeat(&node, 0);
        sleep(Duration::from_millis(40));
        leader.sweep();

        assert!(leader.heartbeat(&node, 0), "refreshed peer must survive");
    }

    #[test]
    fn test_process_heartbeat_unknown_node() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);

        let resp = leader.process_heartbeat(&HeartbeatMsg {
            node_id: NodeId::from("forgotten"),
            space_used: 0,
            new_blocks: vec![block("b1")],
            dead_blocks: vec![],
        });
        assert!(resp.need_to_register);
        // No further work happened: the block was not recorded.
        assert!(leader.get_block_addresses(&block("b1")).is_empty());
    }

    #[test]
    fn test_process_heartbeat_new_before_dead() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        let node = leader.register_peer("127.0.0.1:7001".into());

        // Same block in both lists: new is applied first, dead wins.
        let resp = leader.process_heartbeat(&HeartbeatMsg {
            node_id: node.clone(),
            space_used: 0,
            new_blocks: vec![block("b1")],
            dead_blocks: vec![block("b1")],
        });
        assert!(!resp.need_to_register);
        assert!(leader.get_block_addresses(&block("b1")).is_empty());
        assert_consistent(&leader);
    }

    #[test]
    fn test_process_heartbeat_delivers_deletion_then_confirmation_closes_it() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 1);
        let nodes: Vec<NodeId> = (7001..7003)
            .map(|port| leader.register_peer(format!("127.0.0.1:{}", port)))
            .collect();
        for node in &nodes {
            leader.has_blocks(node, &[block("b1")]);
        }
        leader.heartbeat(&nodes[0], 10);
        leader.sweep();

        let resp = leader.process_heartbeat(&HeartbeatMsg {
            node_id: nodes[0].clone(),
            space_used: 10,
            new_blocks: vec![],
            dead_blocks: vec![],
        });
        assert_eq!(resp.invalidate_blocks, vec![block("b1")]);

        // Peer confirms the deletion on its next heartbeat.
        let resp = leader.process_heartbeat(&HeartbeatMsg {
            node_id: nodes[0].clone(),
            space_used: 9,
            new_blocks: vec![],
            dead_blocks: vec![block("b1")],
        });
        assert!(resp.invalidate_blocks.is_empty());
        assert_eq!(leader.get_block_addresses(&block("b1")).len(), 1);
        let mut inner = leader.lock();
        assert!(!inner.deletion_intents.in_progress(&block("b1")));
    }

    #[test]
    fn test_replication_command_resolves_addresses() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 2);
        let holder = leader.register_peer("127.0.0.1:7001".into());
        leader.register_peer("127.0.0.1:7002".into());

        leader.has_blocks(&holder, &[block("b1")]);
        leader.sweep();

        let resp = leader.process_heartbeat(&HeartbeatMsg {
            node_id: holder.clone(),
            space_used: 1,
            new_blocks: vec![],
            dead_blocks: vec![],
        });
        assert_eq!(resp.to_replicate.len(), 1);
        assert_eq!(resp.to_replicate[0].block_id, block("b1"));
        assert_eq!(resp.to_replicate[0].nodes, vec!["127.0.0.1:7002".to_string()]);
    }

    #[test]
    fn test_deletion_discount_prefers_deleting_peer_for_writes() {
        let dir = tempdir().unwrap();
        let leader = test_leader(&dir, 1);
        let busy = leader.register_peer("127.0.0.1:7001".into());
        let idle = leader.register_peer("127.0.0.1:7002".into());
        leader.heartbeat(&busy, 3);
        leader.heartbeat(&idle, 2);

        // Three pending deletions bring the busy peer's effective
        // utilization to 0, under the idle peer's 2.
        {
            let mut inner = leader.lock();
            inner
                .deletion_intents
                .add(&block("d1"), std::slice::from_ref(&busy));
            inner
                .deletion_intents
                .add(&block("d2"), std::slice::from_ref(&busy));
            inner
                .deletion_intents
                .add(&block("d3"), std::slice::from_ref(&busy));
        }

        assert_eq!(leader.choose_write_targets(), vec!["127.0.0.1:7001".to_string()]);
    }
}
