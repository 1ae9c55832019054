//! The snapshot-store boundary: the engine's only view of persistence.
//!
//! The shared player pool lives in an external key-value store keyed by
//! username. The [`SnapshotStore`] trait abstracts that collaborator --
//! it could be a cloud database, a local file, or the in-memory
//! [`MemoryStore`] used in tests. The engine depends only on this trait
//! and makes no transactional assumptions: concurrent writers for the
//! same username may race, and a pool read is a best-effort point-in-time
//! aggregate, not a causally consistent snapshot.
//!
//! The username index is a secondary source of truth maintained by the
//! host at account-creation time; the engine never writes it. Index
//! entries whose snapshot is absent are reconciled by being ignored.

use std::collections::{BTreeMap, BTreeSet};

use questline_types::PlayerSnapshot;
use tracing::warn;

/// An external key-value store of player snapshots, keyed by username.
pub trait SnapshotStore {
    /// Usernames known to the store. A superset of the stored snapshots;
    /// entries without a snapshot are tolerated and skipped by readers.
    fn index(&self) -> Vec<String>;

    /// Fetch one player's snapshot, or [`None`] when absent.
    fn get_snapshot(&self, username: &str) -> Option<PlayerSnapshot>;

    /// Store (or replace) one player's snapshot.
    fn put_snapshot(&mut self, username: &str, snapshot: PlayerSnapshot);
}

/// Load every available snapshot from the store.
///
/// Index entries whose snapshot is absent are ignored rather than
/// erroring -- the index may legitimately run ahead of the snapshots
/// (e.g. an account registered on another device that has not synced
/// yet). Returns snapshots in index order.
pub fn load_pool(store: &dyn SnapshotStore) -> Vec<PlayerSnapshot> {
    store
        .index()
        .into_iter()
        .filter_map(|username| {
            let snapshot = store.get_snapshot(&username);
            if snapshot.is_none() {
                warn!(%username, "Index entry without snapshot, skipping");
            }
            snapshot
        })
        .collect()
}

/// An in-memory [`SnapshotStore`] backed by a [`BTreeMap`].
///
/// Used by tests and embeddable by hosts that keep the pool in process.
/// Writing a snapshot also registers its username in the index, playing
/// the role the host's account-creation flow plays against a real store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    index: BTreeSet<String>,
    snapshots: BTreeMap<String, PlayerSnapshot>,
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            index: BTreeSet::new(),
            snapshots: BTreeMap::new(),
        }
    }

    /// Register a username in the index without storing a snapshot.
    ///
    /// Models the account-creation flow on a real store, and lets tests
    /// exercise the index-ahead-of-snapshots reconciliation path.
    pub fn register_username(&mut self, username: &str) {
        self.index.insert(username.to_owned());
    }
}

impl SnapshotStore for MemoryStore {
    fn index(&self) -> Vec<String> {
        self.index.iter().cloned().collect()
    }

    fn get_snapshot(&self, username: &str) -> Option<PlayerSnapshot> {
        self.snapshots.get(username).cloned()
    }

    fn put_snapshot(&mut self, username: &str, snapshot: PlayerSnapshot) {
        self.index.insert(username.to_owned());
        self.snapshots.insert(username.to_owned(), snapshot);
    }
}
