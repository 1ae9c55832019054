//! Quest lifecycle: acceptance, abandonment, and custom quest creation.
//!
//! States flow `Available -> Active -> {Completed, Failed}`. Acceptance is
//! the only way into `Active` and conflicts (a quest already active) are
//! reported without touching any state. `Completed` is entered exclusively
//! by the task completion transition in [`crate::completion`]; this module
//! never sets it. `Failed` is entered by an explicit abandon action.
//!
//! A staked `bet_amount` is not deducted on abandonment: the stake
//! represents foregone future reward, not an immediate penalty.

use questline_types::{Player, Quest, QuestId, QuestRequirement, QuestStatus, SkillId};
use tracing::debug;

use crate::config::QuestConfig;

/// Errors reported by quest lifecycle operations.
///
/// Every variant is a user-facing conflict: the inputs are left unchanged
/// and the host renders the message.
#[derive(Debug, thiserror::Error)]
pub enum QuestError {
    /// The player already has an active quest.
    #[error("another quest is already active: {current}")]
    AlreadyActive {
        /// The quest currently occupying the player's active slot.
        current: QuestId,
    },

    /// The quest is not in the `Available` state.
    #[error("quest {quest} cannot be accepted from the {status:?} state")]
    NotAvailable {
        /// The quest that was offered for acceptance.
        quest: QuestId,
        /// Its actual lifecycle state.
        status: QuestStatus,
    },

    /// The quest is not in the `Active` state.
    #[error("quest {quest} cannot be abandoned from the {status:?} state")]
    NotActive {
        /// The quest that was offered for abandonment.
        quest: QuestId,
        /// Its actual lifecycle state.
        status: QuestStatus,
    },

    /// A custom quest's requirement is below the configured minimum.
    #[error("custom quest requires at least {min} tasks (got {given})")]
    RequirementTooSmall {
        /// The requested requirement value.
        given: u32,
        /// The configured minimum.
        min: u32,
    },
}

/// Parameters for authoring a custom quest.
///
/// Packs the optional knobs into a single struct so call sites stay
/// readable as fields are added.
#[derive(Debug, Clone)]
pub struct NewCustomQuest {
    /// Display title.
    pub title: String,
    /// Longer description shown on the quest card.
    pub description: String,
    /// How many matching completions are required.
    pub requirement_value: u32,
    /// When set, only tasks advancing this skill count.
    pub requirement_skill: Option<SkillId>,
    /// Optional XP stake, refunded at 1.5x on completion.
    pub bet_amount: Option<u64>,
    /// Optional deadline as an ISO-8601 string.
    pub deadline: Option<String>,
}

/// Accept an available quest, making it the player's active quest.
///
/// Returns updated copies of the player and the quest. Nothing is mutated
/// on error.
///
/// # Errors
///
/// [`QuestError::AlreadyActive`] when the player already has an active
/// quest, [`QuestError::NotAvailable`] when the quest is not `Available`.
pub fn accept_quest(player: &Player, quest: &Quest) -> Result<(Player, Quest), QuestError> {
    if let Some(current) = player.current_quest {
        return Err(QuestError::AlreadyActive { current });
    }
    if quest.status != QuestStatus::Available {
        return Err(QuestError::NotAvailable {
            quest: quest.id,
            status: quest.status,
        });
    }

    let mut player = player.clone();
    let mut quest = quest.clone();
    quest.status = QuestStatus::Active;
    player.current_quest = Some(quest.id);
    debug!(quest = %quest.id, player = %player.username, "Quest accepted");
    Ok((player, quest))
}

/// Abandon the player's active quest, failing it permanently.
///
/// The quest moves to the terminal `Failed` state and the player's active
/// slot is cleared. No XP is deducted, staked or otherwise.
///
/// # Errors
///
/// [`QuestError::NotActive`] when the quest is not `Active`.
pub fn abandon_quest(player: &Player, quest: &Quest) -> Result<(Player, Quest), QuestError> {
    if quest.status != QuestStatus::Active {
        return Err(QuestError::NotActive {
            quest: quest.id,
            status: quest.status,
        });
    }

    let mut player = player.clone();
    let mut quest = quest.clone();
    quest.status = QuestStatus::Failed;
    if player.current_quest == Some(quest.id) {
        player.current_quest = None;
    }
    debug!(quest = %quest.id, player = %player.username, "Quest abandoned");
    Ok((player, quest))
}

/// Author a custom quest in the `Available` state.
///
/// The default reward is `requirement_value * reward_per_task` from the
/// quest configuration. The stake and deadline are taken as given.
///
/// # Errors
///
/// [`QuestError::RequirementTooSmall`] when `requirement_value` is below
/// the configured minimum.
pub fn create_custom_quest(
    config: &QuestConfig,
    params: NewCustomQuest,
) -> Result<Quest, QuestError> {
    if params.requirement_value < config.min_requirement {
        return Err(QuestError::RequirementTooSmall {
            given: params.requirement_value,
            min: config.min_requirement,
        });
    }

    let xp_reward =
        u64::from(params.requirement_value).saturating_mul(u64::from(config.reward_per_task));
    Ok(Quest {
        id: QuestId::new(),
        title: params.title,
        description: params.description,
        status: QuestStatus::Available,
        requirement: QuestRequirement::TaskCount,
        requirement_value: params.requirement_value,
        requirement_skill: params.requirement_skill,
        current_progress: 0,
        xp_reward,
        bet_amount: params.bet_amount,
        deadline: params.deadline,
        is_custom: true,
    })
}
