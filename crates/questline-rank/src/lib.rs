//! Leaderboard, efficiency scoring, and the snapshot-store boundary for
//! Questline.
//!
//! This crate turns the shared pool of player snapshots into a ranked,
//! privacy-filtered view for one viewer. Everything here is derived:
//! rows are recomputed on every query from whatever the store returns,
//! and nothing is written back except through [`SnapshotStore::put_snapshot`].
//!
//! # Modules
//!
//! - [`efficiency`] -- Missed-task counting and the efficiency score.
//! - [`leaderboard`] -- Ranked rows, percentile labels, privacy redaction.
//! - [`store`] -- The [`SnapshotStore`] trait and in-memory [`MemoryStore`].

pub mod efficiency;
pub mod leaderboard;
pub mod store;

pub use efficiency::{efficiency_score, missed_daily_tasks};
pub use leaderboard::{build_leaderboard, percentile_label, viewer_percentile};
pub use store::{MemoryStore, SnapshotStore, load_pool};
