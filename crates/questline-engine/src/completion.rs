//! The task completion transition: the single entry point through which
//! completed tasks turn into XP, levels, skill growth, and quest progress.
//!
//! Both operations are pure: they take the current state by reference and
//! return new copies, leaving the inputs untouched. The host swaps the
//! copies in and uses the `leveled_up` flag to trigger its level-up
//! notification.
//!
//! # Reversal asymmetry
//!
//! Un-completing a task only claws back XP (clamped at zero) and the
//! completion counter. It does **not** undo level-ups, skill growth, or
//! quest progress already granted. This is a deliberate policy, not an
//! oversight: levels and quest rewards are celebrations that should not be
//! retracted because the player re-opened a checkbox.

use questline_types::{Player, Quest, QuestRequirement, QuestStatus, Skill, Task};
use tracing::debug;

use crate::leveling;

/// The result of applying one task completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// The player with XP, level, and counters updated.
    pub player: Player,
    /// All skills, with the matching skill (if any) advanced.
    pub skills: Vec<Skill>,
    /// All quests, with active matching quests progressed or completed.
    pub quests: Vec<Quest>,
    /// Whether any player level-up occurred during this transition. The
    /// host uses this to trigger a level-up notification.
    pub leveled_up: bool,
}

/// Add XP to the player and resolve level-ups.
///
/// Loops rather than stepping once: a large reward may cross several
/// thresholds in a single transition. Returns whether any level-up
/// occurred. The player curve is strictly increasing and never zero, so
/// the loop always terminates.
fn grant_player_xp(player: &mut Player, amount: u64) -> bool {
    player.current_xp = player.current_xp.saturating_add(amount);
    let mut leveled = false;
    while player.current_xp >= player.max_xp {
        player.current_xp = player.current_xp.saturating_sub(player.max_xp);
        player.level = player.level.saturating_add(1);
        player.max_xp = leveling::user_xp_to_next(player.level);
        leveled = true;
    }
    leveled
}

/// Add XP to a skill and resolve skill level-ups against its running
/// threshold.
fn grant_skill_xp(skill: &mut Skill, amount: u64) {
    skill.current_xp = skill.current_xp.saturating_add(amount);
    while skill.current_xp >= skill.max_xp {
        skill.current_xp = skill.current_xp.saturating_sub(skill.max_xp);
        skill.level = skill.level.saturating_add(1);
        skill.max_xp = leveling::next_skill_threshold(skill.max_xp);
    }
}

/// The bonus granted when a quest completes: the quest reward plus the
/// stake refunded at 1.5x (`floor(bet * 3/2)`), when a stake was placed.
fn quest_bonus(quest: &Quest) -> u64 {
    let refund = quest.bet_amount.unwrap_or(0).saturating_mul(3) / 2;
    quest.xp_reward.saturating_add(refund)
}

/// Whether an active quest is advanced by completing `task`.
fn quest_matches(quest: &Quest, task: &Task) -> bool {
    match quest.requirement {
        QuestRequirement::TaskCount => {
            quest.requirement_skill.is_none() || quest.requirement_skill == task.skill
        }
    }
}

/// Apply the effect of completing one task.
///
/// 1. The task's XP reward is added to the player, rolling overflow into
///    level-ups, and `total_tasks_completed` is incremented.
/// 2. The matching skill, if the task names one that exists, goes through
///    the same XP loop on the skill curve. An unknown or absent skill is
///    silently skipped.
/// 3. Every `Active` quest matching the task gains one progress point.
///    A quest reaching its requirement completes: its status becomes
///    terminal, the player's current-quest pointer is cleared, and the
///    quest bonus is granted through the same player XP loop.
///
/// A task with `xp_reward == 0` is processed normally. The inputs are not
/// mutated; new copies are returned.
pub fn apply_completion(
    player: &Player,
    skills: &[Skill],
    quests: &[Quest],
    task: &Task,
) -> CompletionOutcome {
    let mut player = player.clone();
    let mut skills = skills.to_vec();
    let mut quests = quests.to_vec();

    let mut leveled_up = grant_player_xp(&mut player, task.xp_reward);
    player.total_tasks_completed = player.total_tasks_completed.saturating_add(1);
    debug!(
        task = %task.id,
        xp = task.xp_reward,
        level = player.level,
        "Task completion applied"
    );

    if let Some(skill_id) = task.skill {
        // Unknown skill references are skipped, not surfaced as errors.
        if let Some(skill) = skills.iter_mut().find(|s| s.id == skill_id) {
            grant_skill_xp(skill, task.xp_reward);
        }
    }

    for quest in &mut quests {
        if quest.status != QuestStatus::Active || !quest_matches(quest, task) {
            continue;
        }
        quest.current_progress = quest
            .current_progress
            .saturating_add(1)
            .min(quest.requirement_value);
        if !quest.requirement_met() {
            continue;
        }
        quest.status = QuestStatus::Completed;
        if player.current_quest == Some(quest.id) {
            player.current_quest = None;
        }
        let bonus = quest_bonus(quest);
        leveled_up |= grant_player_xp(&mut player, bonus);
        debug!(quest = %quest.id, bonus, "Quest completed");
    }

    CompletionOutcome {
        player,
        skills,
        quests,
        leveled_up,
    }
}

/// Reverse the effect of un-checking a completed task.
///
/// Subtracts the task's XP reward from the player's current XP, clamped at
/// zero, and decrements the completion counter. Levels, skills, and quest
/// progress are intentionally left as granted -- see the module docs.
pub fn reverse_completion(player: &Player, task: &Task) -> Player {
    let mut player = player.clone();
    player.current_xp = player.current_xp.saturating_sub(task.xp_reward);
    player.total_tasks_completed = player.total_tasks_completed.saturating_sub(1);
    debug!(task = %task.id, xp = task.xp_reward, "Task completion reversed");
    player
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use questline_types::{PlayerSettings, SkillId};

    use super::*;

    fn make_player() -> Player {
        Player::new("ida", PlayerSettings::default())
    }

    fn make_task(xp_reward: u64, skill: Option<SkillId>) -> Task {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 8, 3).unwrap();
        Task::daily(date, xp_reward, skill)
    }

    #[test]
    fn completion_grants_xp_and_counts() {
        let player = make_player();
        let outcome = apply_completion(&player, &[], &[], &make_task(40, None));

        assert_eq!(outcome.player.current_xp, 40);
        assert_eq!(outcome.player.level, 1);
        assert_eq!(outcome.player.total_tasks_completed, 1);
        assert!(!outcome.leveled_up);
        // Inputs are untouched.
        assert_eq!(player.current_xp, 0);
    }

    #[test]
    fn overflow_rolls_into_level_up() {
        let player = make_player();
        let outcome = apply_completion(&player, &[], &[], &make_task(130, None));

        // 130 XP at level 1 (threshold 100): level 2 with 30 remaining.
        assert_eq!(outcome.player.level, 2);
        assert_eq!(outcome.player.current_xp, 30);
        assert_eq!(outcome.player.max_xp, 120);
        assert!(outcome.leveled_up);
    }

    #[test]
    fn large_reward_crosses_multiple_levels() {
        let player = make_player();
        // Thresholds: 100 (L1) + 120 (L2) = 220; 250 lands at level 3.
        let outcome = apply_completion(&player, &[], &[], &make_task(250, None));

        assert_eq!(outcome.player.level, 3);
        assert_eq!(outcome.player.current_xp, 30);
        assert_eq!(outcome.player.max_xp, 144);
        assert!(outcome.leveled_up);
    }

    #[test]
    fn invariant_holds_across_a_completion_sequence() {
        let mut player = make_player();
        for _ in 0..50 {
            let outcome = apply_completion(&player, &[], &[], &make_task(73, None));
            player = outcome.player;
            assert!(player.current_xp < player.max_xp);
            assert_eq!(player.max_xp, crate::leveling::user_xp_to_next(player.level));
        }
        assert_eq!(player.total_tasks_completed, 50);
    }

    #[test]
    fn matching_skill_levels_independently() {
        let player = make_player();
        let skill = Skill::new("Writing", "#2196f3", 50);
        let skill_id = skill.id;
        let outcome = apply_completion(&player, &[skill], &[], &make_task(60, Some(skill_id)));

        let skill = outcome.skills.first().unwrap();
        // 60 XP against base 50: skill level 2, threshold 75, 10 remaining.
        assert_eq!(skill.level, 2);
        assert_eq!(skill.current_xp, 10);
        assert_eq!(skill.max_xp, 75);
        // Player progression is unaffected by the skill loop.
        assert_eq!(outcome.player.current_xp, 60);
    }

    #[test]
    fn unknown_skill_reference_is_skipped() {
        let player = make_player();
        let skill = Skill::new("Writing", "#2196f3", 50);
        let outcome =
            apply_completion(&player, &[skill.clone()], &[], &make_task(60, Some(SkillId::new())));

        assert_eq!(outcome.skills, vec![skill]);
        assert_eq!(outcome.player.current_xp, 60);
    }

    #[test]
    fn zero_reward_task_is_processed_normally() {
        let player = make_player();
        let outcome = apply_completion(&player, &[], &[], &make_task(0, None));
        assert_eq!(outcome.player.current_xp, 0);
        assert_eq!(outcome.player.total_tasks_completed, 1);
    }

    #[test]
    fn active_quest_progresses_on_match() {
        let mut player = make_player();
        let mut quest = Quest::new("Streak", "Complete three tasks", 3, 50);
        quest.status = QuestStatus::Active;
        player.current_quest = Some(quest.id);

        let outcome = apply_completion(&player, &[], &[quest], &make_task(10, None));
        let quest = outcome.quests.first().unwrap();
        assert_eq!(quest.current_progress, 1);
        assert_eq!(quest.status, QuestStatus::Active);
        // Pointer stays set until the requirement is met.
        assert_eq!(outcome.player.current_quest, Some(quest.id));
    }

    #[test]
    fn skill_restricted_quest_ignores_other_tasks() {
        let mut player = make_player();
        let mut quest = Quest::new("Bookworm", "Read five times", 5, 50);
        quest.status = QuestStatus::Active;
        quest.requirement_skill = Some(SkillId::new());
        player.current_quest = Some(quest.id);

        // Task with no skill: requirement_skill is set, so no match.
        let outcome = apply_completion(&player, &[], &[quest], &make_task(10, None));
        assert_eq!(outcome.quests.first().unwrap().current_progress, 0);
    }

    #[test]
    fn quest_completion_grants_bet_refund_bonus() {
        let mut player = make_player();
        let mut quest = Quest::new("Streak", "Complete one more task", 1, 50);
        quest.status = QuestStatus::Active;
        quest.bet_amount = Some(20);
        player.current_quest = Some(quest.id);

        let outcome = apply_completion(&player, &[], &[quest], &make_task(0, None));
        let quest = outcome.quests.first().unwrap();

        assert_eq!(quest.status, QuestStatus::Completed);
        assert_eq!(outcome.player.current_quest, None);
        // Bonus = 50 + floor(20 * 1.5) = 80; no task XP on top.
        assert_eq!(outcome.player.current_xp, 80);
        assert!(!outcome.leveled_up);
    }

    #[test]
    fn quest_bonus_flows_through_level_up_loop() {
        let mut player = make_player();
        let mut quest = Quest::new("Grand finish", "One more", 1, 90);
        quest.status = QuestStatus::Active;
        quest.bet_amount = Some(40);
        player.current_quest = Some(quest.id);

        // Task 50 + bonus (90 + 60) = 200 total: crosses level 1 (100).
        let outcome = apply_completion(&player, &[], &[quest], &make_task(50, None));
        assert_eq!(outcome.player.level, 2);
        assert_eq!(outcome.player.current_xp, 100);
        assert!(outcome.leveled_up);
    }

    #[test]
    fn reversal_restores_xp_when_no_level_up_occurred() {
        let player = make_player();
        let task = make_task(40, None);
        let applied = apply_completion(&player, &[], &[], &task);
        let reversed = reverse_completion(&applied.player, &task);

        assert_eq!(reversed.current_xp, player.current_xp);
        assert_eq!(reversed.level, player.level);
        assert_eq!(reversed.total_tasks_completed, 0);
    }

    #[test]
    fn reversal_is_not_a_round_trip_after_level_up() {
        let player = make_player();
        let task = make_task(130, None);
        let applied = apply_completion(&player, &[], &[], &task);
        assert!(applied.leveled_up);

        let reversed = reverse_completion(&applied.player, &task);
        // XP clamps at zero; the level-up is retained by design.
        assert_eq!(reversed.current_xp, 0);
        assert_eq!(reversed.level, 2);
        assert_ne!(reversed, player);
    }

    #[test]
    fn reversal_never_goes_negative() {
        let player = make_player();
        let reversed = reverse_completion(&player, &make_task(9_999, None));
        assert_eq!(reversed.current_xp, 0);
        assert_eq!(reversed.total_tasks_completed, 0);
    }
}
