//! Core entity structs for the Questline progression engine.
//!
//! Covers the locally-owned session state (`Player`, `Skill`, `Task`,
//! `Quest`, `FriendRequest`), the externally stored [`PlayerSnapshot`], and
//! the derived view structs ([`LeaderboardRow`], [`PeriodProgress`]) that are
//! regenerated on every query and never persisted.
//!
//! # Dates
//!
//! Task and quest dates are stored as raw ISO-8601 strings because snapshots
//! arrive from an external store that the engine does not control. Accessors
//! parse leniently and return [`None`] for malformed values, so one bad date
//! excludes a single task from calendar computations instead of failing an
//! entire snapshot.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{PrivacyMode, QuestRequirement, QuestStatus, TaskKind};
use crate::ids::{PlayerId, QuestId, SkillId, TaskId};

/// Avatar glyph substituted for privacy-hidden leaderboard rows.
pub const HIDDEN_AVATAR: &str = "\u{1f512}";

/// Parse an ISO-8601 date or datetime string into a calendar date.
///
/// Accepts plain dates (`2026-08-07`) and RFC 3339 datetimes
/// (`2026-08-07T09:30:00Z`). Returns [`None`] for anything else.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Per-player tuning values owned by the player, not the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerSettings {
    /// Minimum daily tasks the player aims to complete. Drives period targets.
    pub daily_min: u32,
    /// Upper bound the player sets for themself; informational only.
    pub daily_max: u32,
    /// Monthly income goal in whole currency units; informational only.
    pub monthly_income_goal: u32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            daily_min: 3,
            daily_max: 10,
            monthly_income_goal: 0,
        }
    }
}

/// A pending friend request delivered to a player.
///
/// Created by a send action; removed by accept (which also adds the
/// symmetric friendship edge) or reject (removed with no edge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FriendRequest {
    /// Username of the sender.
    pub from_username: String,
    /// Account ID of the sender.
    pub from_id: PlayerId,
    /// Avatar glyph of the sender, shown in the request list.
    pub from_avatar: String,
}

/// The local player's account state.
///
/// Invariant after every engine transition: `current_xp < max_xp`,
/// `level >= 1`, and `max_xp` equals the user level curve's value for
/// `level`. XP overflow rolls into level-ups inside the transition itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Player {
    /// Unique username; the key under which snapshots are stored.
    pub username: String,
    /// Stable account identifier.
    pub id: PlayerId,
    /// Avatar glyph shown on the leaderboard and in friend requests.
    pub avatar: String,
    /// Current level, starting at 1.
    pub level: u32,
    /// XP accumulated toward the next level. Always below `max_xp`.
    pub current_xp: u64,
    /// XP required to reach the next level, per the user level curve.
    pub max_xp: u64,
    /// Lifetime count of completed tasks.
    pub total_tasks_completed: u64,
    /// Lifetime count of missed daily tasks recorded by the host.
    pub missed_tasks: u64,
    /// The single quest currently being pursued, if any.
    pub current_quest: Option<QuestId>,
    /// Usernames of confirmed friends.
    pub friends: BTreeSet<String>,
    /// Pending friend requests, in arrival order.
    pub friend_requests: Vec<FriendRequest>,
    /// Who may see this player's identity on the leaderboard.
    pub privacy: PrivacyMode,
    /// Per-player tuning values.
    pub settings: PlayerSettings,
}

/// XP required to advance from level 1, shared by [`Player::new`] and the
/// engine's user level curve.
pub const LEVEL_ONE_MAX_XP: u64 = 100;

impl Player {
    /// Create a fresh level-1 player with a new account ID.
    pub fn new(username: impl Into<String>, settings: PlayerSettings) -> Self {
        Self {
            username: username.into(),
            id: PlayerId::new(),
            avatar: String::new(),
            level: 1,
            current_xp: 0,
            max_xp: LEVEL_ONE_MAX_XP,
            total_tasks_completed: 0,
            missed_tasks: 0,
            current_quest: None,
            friends: BTreeSet::new(),
            friend_requests: Vec::new(),
            privacy: PrivacyMode::Public,
            settings,
        }
    }

    /// Check whether `username` is a confirmed friend.
    pub fn is_friend(&self, username: &str) -> bool {
        self.friends.contains(username)
    }

    /// Check whether a request from `username` is already pending.
    pub fn has_pending_request_from(&self, username: &str) -> bool {
        self.friend_requests
            .iter()
            .any(|req| req.from_username == username)
    }
}

// ---------------------------------------------------------------------------
// Skill
// ---------------------------------------------------------------------------

/// A skill the player levels independently of their account level.
///
/// Same XP invariant as [`Player`], but `max_xp` is a *running* threshold:
/// it is multiplied at each level-up event rather than recomputed from the
/// level, so two skills at the same level may have different thresholds if
/// they started from different bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Skill {
    /// Stable skill identifier, referenced by tasks and quests.
    pub id: SkillId,
    /// Display name.
    pub name: String,
    /// Display color as a CSS hex string, e.g. `#7c4dff`.
    pub color: String,
    /// Current skill level, starting at 1.
    pub level: u32,
    /// XP accumulated toward the next skill level.
    pub current_xp: u64,
    /// Running XP threshold for the next skill level.
    pub max_xp: u64,
}

impl Skill {
    /// Create a level-1 skill with the given starting threshold.
    ///
    /// A `base_xp` of 0 is lifted to 1 so progression cannot stall.
    pub fn new(name: impl Into<String>, color: impl Into<String>, base_xp: u64) -> Self {
        Self {
            id: SkillId::new(),
            name: name.into(),
            color: color.into(),
            level: 1,
            current_xp: 0,
            max_xp: base_xp.max(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A single real-world task tracked by the player.
///
/// Immutable once created except for the `completed` flag, which the task
/// completion transition toggles. The engine never re-derives `xp_reward`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Task {
    /// Stable task identifier.
    pub id: TaskId,
    /// Daily task or one-off goal.
    pub kind: TaskKind,
    /// Scheduled calendar day for daily tasks, as a raw ISO-8601 string.
    pub date: Option<String>,
    /// Deadline for goal tasks, as a raw ISO-8601 string.
    pub deadline: Option<String>,
    /// Whether the task has been completed.
    pub completed: bool,
    /// XP granted on completion, fixed at creation time.
    pub xp_reward: u64,
    /// Skill advanced by this task, if any.
    pub skill: Option<SkillId>,
}

impl Task {
    /// Create a daily task scheduled for `date`.
    pub fn daily(date: NaiveDate, xp_reward: u64, skill: Option<SkillId>) -> Self {
        Self {
            id: TaskId::new(),
            kind: TaskKind::Daily,
            date: Some(date.format("%Y-%m-%d").to_string()),
            deadline: None,
            completed: false,
            xp_reward,
            skill,
        }
    }

    /// Create a goal task with an optional deadline.
    pub fn goal(deadline: Option<NaiveDate>, xp_reward: u64, skill: Option<SkillId>) -> Self {
        Self {
            id: TaskId::new(),
            kind: TaskKind::Goal,
            date: None,
            deadline: deadline.map(|d| d.format("%Y-%m-%d").to_string()),
            completed: false,
            xp_reward,
            skill,
        }
    }

    /// The scheduled day, if present and parseable.
    pub fn scheduled_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_calendar_date)
    }

    /// The deadline day, if present and parseable.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.deadline.as_deref().and_then(parse_calendar_date)
    }
}

// ---------------------------------------------------------------------------
// Quest
// ---------------------------------------------------------------------------

/// A quest the player can pursue for a bonus reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Quest {
    /// Stable quest identifier.
    pub id: QuestId,
    /// Display title.
    pub title: String,
    /// Longer description shown on the quest card.
    pub description: String,
    /// Lifecycle state.
    pub status: QuestStatus,
    /// What the quest tracks.
    pub requirement: QuestRequirement,
    /// How many matching completions are required.
    pub requirement_value: u32,
    /// When set, only tasks advancing this skill count.
    pub requirement_skill: Option<SkillId>,
    /// Matching completions recorded so far. Monotonically non-decreasing
    /// while active; clamped at `requirement_value`.
    pub current_progress: u32,
    /// Bonus XP granted on completion.
    pub xp_reward: u64,
    /// Optional XP stake. Refunded at 1.5x on completion; foregone on
    /// failure (never deducted as a penalty).
    pub bet_amount: Option<u64>,
    /// Optional deadline, as a raw ISO-8601 string.
    pub deadline: Option<String>,
    /// Whether the player authored this quest themself.
    pub is_custom: bool,
}

impl Quest {
    /// Create a catalog quest in the `Available` state.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        requirement_value: u32,
        xp_reward: u64,
    ) -> Self {
        Self {
            id: QuestId::new(),
            title: title.into(),
            description: description.into(),
            status: QuestStatus::Available,
            requirement: QuestRequirement::TaskCount,
            requirement_value,
            requirement_skill: None,
            current_progress: 0,
            xp_reward,
            bet_amount: None,
            deadline: None,
            is_custom: false,
        }
    }

    /// Whether the quest has reached a terminal state.
    pub const fn is_terminal(&self) -> bool {
        matches!(self.status, QuestStatus::Completed | QuestStatus::Failed)
    }

    /// Whether enough matching completions have been recorded.
    pub const fn requirement_met(&self) -> bool {
        self.current_progress >= self.requirement_value
    }

    /// The deadline day, if present and parseable.
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.deadline.as_deref().and_then(parse_calendar_date)
    }
}

// ---------------------------------------------------------------------------
// Snapshot & derived views
// ---------------------------------------------------------------------------

/// The full serialized state of one player, as persisted in the external
/// snapshot store. Read-only to the ranking engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerSnapshot {
    /// The player's account state.
    pub player: Player,
    /// All skills tracked by the player.
    pub skills: Vec<Skill>,
    /// All tasks, completed and pending.
    pub tasks: Vec<Task>,
    /// All quests in every lifecycle state.
    pub quests: Vec<Quest>,
}

impl PlayerSnapshot {
    /// Build a snapshot of a freshly created player with no activity.
    pub fn empty(player: Player) -> Self {
        Self {
            player,
            skills: Vec::new(),
            tasks: Vec::new(),
            quests: Vec::new(),
        }
    }
}

/// One row of the privacy-filtered leaderboard.
///
/// Purely computed, regenerated on every query, never persisted. Redacted
/// rows keep their rank, level, and efficiency; only identity-adjacent
/// fields (`id`, `avatar`, `snapshot`) are masked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LeaderboardRow {
    /// 1-based position after sorting.
    pub rank: u32,
    /// Username of the ranked player.
    pub username: String,
    /// Account ID; [`None`] when the row is hidden.
    pub id: Option<PlayerId>,
    /// The player's level, always visible.
    pub level: u32,
    /// Efficiency score in the 0-100 range, always visible.
    #[ts(as = "String")]
    pub efficiency: Decimal,
    /// Whether this row is the viewer themself. Never redacted.
    pub is_user: bool,
    /// Whether the ranked player is a confirmed friend of the viewer.
    pub is_friend: bool,
    /// Whether identity fields have been masked for the viewer.
    pub is_hidden: bool,
    /// Human-readable "Top N%" label derived from the rank.
    pub percentile: String,
    /// Avatar glyph; the lock glyph when hidden.
    pub avatar: String,
    /// The source snapshot this row was derived from; withheld on hidden
    /// rows so the masked identity cannot be recovered from the row.
    pub snapshot: Option<PlayerSnapshot>,
}

/// Progress statistics for one calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PeriodProgress {
    /// Completed daily tasks dated inside the window.
    pub completed: u32,
    /// Full-window target: days in the window times the daily minimum.
    pub target: u32,
    /// Progress toward the full-window target, 0-100. Fills the period bar.
    pub absolute_percent: u8,
    /// Progress relative to days elapsed so far, 0-100. Drives the
    /// on-track message and must never be conflated with the absolute bar.
    pub pace_percent: u8,
}
