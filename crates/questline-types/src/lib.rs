//! Shared type definitions for the Questline progression engine.
//!
//! This crate is the single source of truth for all types used across the
//! Questline workspace. Types defined here flow downstream to `TypeScript`
//! via `ts-rs` for the host application's UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for all entity identifiers
//! - [`enums`] -- Enumeration types (tasks, quests, privacy, periods)
//! - [`structs`] -- Core entity structs (player, skill, task, quest,
//!   snapshot) and derived view structs (leaderboard row, period progress)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{Period, PrivacyMode, QuestRequirement, QuestStatus, TaskKind};
pub use ids::{PlayerId, QuestId, SkillId, TaskId};
pub use structs::{
    FriendRequest, HIDDEN_AVATAR, LEVEL_ONE_MAX_XP, LeaderboardRow, PeriodProgress, Player,
    PlayerSettings, PlayerSnapshot, Quest, Skill, Task, parse_calendar_date,
};
