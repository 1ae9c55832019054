//! Enumeration types for the Questline progression engine.
//!
//! The host application historically carried several of these as open string
//! fields; here they are closed enumerations so every call site is forced to
//! handle all variants exhaustively.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Task classification
// ---------------------------------------------------------------------------

/// The category of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TaskKind {
    /// A recurring task scheduled for a specific calendar day. Daily tasks
    /// drive period progress and the efficiency score.
    Daily,
    /// A one-off goal with an optional deadline. Goals award XP but do not
    /// count toward daily targets.
    Goal,
}

// ---------------------------------------------------------------------------
// Quest lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle state of a quest.
///
/// Transitions: `Available -> Active -> {Completed, Failed}`. Both
/// `Completed` and `Failed` are terminal. `Completed` is only ever entered
/// by the task completion transition, never by direct selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum QuestStatus {
    /// Offered to the player but not yet accepted.
    Available,
    /// Currently being pursued. At most one quest per player is active.
    Active,
    /// Requirement met; reward granted. Terminal.
    Completed,
    /// Abandoned by the player. Terminal.
    Failed,
}

/// The kind of requirement a quest tracks.
///
/// Only task-count requirements exist today; new kinds added here force
/// every match site to handle them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum QuestRequirement {
    /// Complete N tasks, optionally restricted to a single skill.
    TaskCount,
}

// ---------------------------------------------------------------------------
// Privacy
// ---------------------------------------------------------------------------

/// Who may see a player's identity on the leaderboard.
///
/// Redaction masks identity-adjacent fields only; rank, level, and
/// efficiency remain visible in every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum PrivacyMode {
    /// Visible to everyone.
    Public,
    /// Visible to confirmed friends only.
    Friends,
    /// Hidden from everyone except the player themself.
    Private,
}

// ---------------------------------------------------------------------------
// Calendar periods
// ---------------------------------------------------------------------------

/// A calendar window for progress statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Period {
    /// ISO week, Monday through Sunday.
    Week,
    /// Calendar month.
    Month,
    /// Calendar year.
    Year,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quest_status_roundtrip_serde() {
        for status in [
            QuestStatus::Available,
            QuestStatus::Active,
            QuestStatus::Completed,
            QuestStatus::Failed,
        ] {
            let json = serde_json::to_string(&status).ok();
            assert!(json.is_some());
            let restored: Result<QuestStatus, _> =
                serde_json::from_str(json.as_deref().unwrap_or(""));
            assert_eq!(restored.ok(), Some(status));
        }
    }

    #[test]
    fn privacy_modes_are_ordered() {
        // Ordering is only used for deterministic iteration, but it must
        // stay stable across releases because snapshots persist it.
        assert!(PrivacyMode::Public < PrivacyMode::Friends);
        assert!(PrivacyMode::Friends < PrivacyMode::Private);
    }
}
