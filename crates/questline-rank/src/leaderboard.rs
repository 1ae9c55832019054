//! Leaderboard assembly: scoring, ranking, percentile labels, and
//! privacy redaction relative to a viewer.
//!
//! The builder is order-independent on its input (it sorts internally)
//! and deterministic for identical input: strict efficiency order first,
//! then tie groups resolved by level, with the original snapshot order as
//! the final key via stable sorts. Rows are regenerated on every query
//! and never persisted.
//!
//! Redaction masks identity-adjacent fields only. A hidden row keeps its
//! rank, level, efficiency, and percentile -- the ranking itself is
//! public; who occupies it is not.

use chrono::NaiveDate;
use questline_types::{HIDDEN_AVATAR, LeaderboardRow, Player, PlayerSnapshot, PrivacyMode};
use rust_decimal::Decimal;
use tracing::debug;

use crate::efficiency::{efficiency_score, missed_daily_tasks};

/// A snapshot paired with its computed ranking keys.
struct Scored {
    efficiency: Decimal,
    level: u32,
    snapshot: PlayerSnapshot,
}

/// Build the privacy-filtered leaderboard for `viewer` from the full
/// snapshot pool.
///
/// A missing viewer yields an empty list -- the engine degrades rather
/// than erroring when the host has no current user. The pool is treated
/// as a best-effort point-in-time aggregate; no cross-player consistency
/// is assumed.
pub fn build_leaderboard(
    viewer: Option<&Player>,
    snapshots: &[PlayerSnapshot],
    today: NaiveDate,
) -> Vec<LeaderboardRow> {
    let Some(viewer) = viewer else {
        return Vec::new();
    };

    let scored: Vec<Scored> = snapshots
        .iter()
        .map(|snapshot| {
            let missed = missed_daily_tasks(&snapshot.tasks, today);
            Scored {
                efficiency: efficiency_score(snapshot.player.total_tasks_completed, missed),
                level: snapshot.player.level,
                snapshot: snapshot.clone(),
            }
        })
        .collect();

    let ordered = rank_order(scored);
    let total = ordered.len();
    debug!(players = total, viewer = %viewer.username, "Leaderboard built");

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, entry)| to_row(viewer, entry, index.saturating_add(1), total))
        .collect()
}

/// Rerun the full leaderboard computation and return the viewer's own
/// percentile label.
///
/// Deliberately O(N) per call: the pool is small (players per local
/// install) and read-mostly, so recomputation beats caching.
pub fn viewer_percentile(
    viewer: &Player,
    snapshots: &[PlayerSnapshot],
    today: NaiveDate,
) -> Option<String> {
    build_leaderboard(Some(viewer), snapshots, today)
        .into_iter()
        .find(|row| row.is_user)
        .map(|row| row.percentile)
}

/// Sort scored entries into final rank order.
///
/// Strictly by efficiency descending first (stable, so equal scores keep
/// their input order), then consecutive entries within 0.1 of their tie
/// group's leading score are reordered by level descending. A raw
/// tolerance comparator would not be a strict weak order, so the
/// tolerance is applied against each group's head instead.
fn rank_order(mut scored: Vec<Scored>) -> Vec<Scored> {
    scored.sort_by(|a, b| b.efficiency.cmp(&a.efficiency));

    let tolerance = Decimal::new(1, 1); // 0.1
    let mut ordered = Vec::with_capacity(scored.len());
    let mut group: Vec<Scored> = Vec::new();
    let mut head = Decimal::ZERO;

    for entry in scored {
        if group.is_empty() || head.saturating_sub(entry.efficiency) <= tolerance {
            if group.is_empty() {
                head = entry.efficiency;
            }
            group.push(entry);
        } else {
            flush_group(&mut group, &mut ordered);
            head = entry.efficiency;
            group.push(entry);
        }
    }
    flush_group(&mut group, &mut ordered);
    ordered
}

/// Order one tie group by level descending (efficiency descending, then
/// input order, as residual keys) and append it to the output.
fn flush_group(group: &mut Vec<Scored>, ordered: &mut Vec<Scored>) {
    group.sort_by(|a, b| {
        b.level
            .cmp(&a.level)
            .then_with(|| b.efficiency.cmp(&a.efficiency))
    });
    ordered.append(group);
}

/// Materialize one ranked entry as a row, applying privacy redaction
/// relative to the viewer.
fn to_row(viewer: &Player, entry: Scored, rank: usize, total: usize) -> LeaderboardRow {
    let player = &entry.snapshot.player;
    let is_user = player.username == viewer.username;
    let is_friend = viewer.is_friend(&player.username);
    let is_hidden = !is_user
        && match player.privacy {
            PrivacyMode::Public => false,
            PrivacyMode::Friends => !is_friend,
            PrivacyMode::Private => true,
        };

    let percentile = percentile_label(rank, total);
    let rank = u32::try_from(rank).unwrap_or(u32::MAX);
    let username = player.username.clone();
    let level = player.level;

    if is_hidden {
        LeaderboardRow {
            rank,
            username,
            id: None,
            level,
            efficiency: entry.efficiency,
            is_user,
            is_friend,
            is_hidden,
            percentile,
            avatar: HIDDEN_AVATAR.to_owned(),
            snapshot: None,
        }
    } else {
        LeaderboardRow {
            rank,
            username,
            id: Some(player.id),
            level,
            efficiency: entry.efficiency,
            is_user,
            is_friend,
            is_hidden,
            percentile,
            avatar: player.avatar.clone(),
            snapshot: Some(entry.snapshot),
        }
    }
}

/// Human-readable "Top N%" label for a 1-based rank out of `total`.
///
/// `100 * rank / total`, labelled with increasing coarseness: `Top 0.1%`
/// at or below 0.1, `Top 1%` at or below 1, one decimal at or below 5,
/// otherwise a rounded-up whole percent.
pub fn percentile_label(rank: usize, total: usize) -> String {
    let rank = u64::try_from(rank).unwrap_or(u64::MAX);
    let total = u64::try_from(total).unwrap_or(u64::MAX);
    let percent = Decimal::from(rank)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(Decimal::from(total)))
        .unwrap_or(Decimal::ONE_HUNDRED);

    if percent <= Decimal::new(1, 1) {
        "Top 0.1%".to_owned()
    } else if percent <= Decimal::ONE {
        "Top 1%".to_owned()
    } else if percent <= Decimal::from(5) {
        format!("Top {}%", percent.round_dp(1).normalize())
    } else {
        format!("Top {}%", percent.ceil().normalize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use questline_types::{PlayerSettings, Task};
    use rust_decimal_macros::dec;

    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).unwrap()
    }

    /// A snapshot whose efficiency is `100 * completed / (completed + missed)`.
    fn snapshot_with(username: &str, level: u32, completed: u64, missed: u64) -> PlayerSnapshot {
        let mut player = Player::new(username, PlayerSettings::default());
        player.level = level;
        player.total_tasks_completed = completed;
        player.avatar = "\u{1f98a}".to_owned();

        let past = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let tasks = (0..missed).map(|_| Task::daily(past, 10, None)).collect();
        PlayerSnapshot {
            player,
            skills: Vec::new(),
            tasks,
            quests: Vec::new(),
        }
    }

    #[test]
    fn missing_viewer_yields_empty_board() {
        let pool = vec![snapshot_with("noor", 3, 5, 0)];
        assert!(build_leaderboard(None, &pool, today()).is_empty());
    }

    #[test]
    fn rows_are_ordered_by_efficiency() {
        let viewer = Player::new("ida", PlayerSettings::default());
        let pool = vec![
            snapshot_with("low", 9, 1, 1),   // 50
            snapshot_with("high", 2, 5, 0),  // 100
            snapshot_with("mid", 4, 3, 1),   // 75
        ];

        let board = build_leaderboard(Some(&viewer), &pool, today());
        let order: Vec<&str> = board.iter().map(|row| row.username.as_str()).collect();
        assert_eq!(order, vec!["high", "mid", "low"]);
        assert_eq!(board.first().unwrap().rank, 1);
        assert_eq!(board.first().unwrap().efficiency, dec!(100));
    }

    #[test]
    fn equal_efficiency_ranks_higher_level_first() {
        let viewer = Player::new("ida", PlayerSettings::default());
        let pool = vec![
            snapshot_with("five", 5, 4, 0),
            snapshot_with("seven", 7, 4, 0),
        ];

        let board = build_leaderboard(Some(&viewer), &pool, today());
        assert_eq!(board.first().unwrap().username, "seven");
        assert_eq!(board.get(1).unwrap().username, "five");
    }

    #[test]
    fn near_ties_within_tolerance_rank_by_level() {
        let viewer = Player::new("ida", PlayerSettings::default());
        // 90 exactly vs 100 * 899 / 999 = 89.98...: within 0.1 of each
        // other, so the level-9 player wins despite the lower score.
        let pool = vec![
            snapshot_with("ninety", 3, 18, 2),
            snapshot_with("almost", 9, 899, 100),
        ];

        let board = build_leaderboard(Some(&viewer), &pool, today());
        assert_eq!(board.first().unwrap().username, "almost");
    }

    #[test]
    fn output_is_independent_of_input_order() {
        let viewer = Player::new("ida", PlayerSettings::default());
        let a = snapshot_with("a", 2, 5, 0);
        let b = snapshot_with("b", 4, 3, 1);
        let c = snapshot_with("c", 6, 1, 1);

        let forward = build_leaderboard(Some(&viewer), &[a.clone(), b.clone(), c.clone()], today());
        let backward = build_leaderboard(Some(&viewer), &[c, b, a], today());
        assert_eq!(forward, backward);
    }

    #[test]
    fn private_rows_mask_identity_but_not_ranking() {
        let viewer = Player::new("ida", PlayerSettings::default());
        let mut hidden = snapshot_with("noor", 6, 3, 1);
        hidden.player.privacy = PrivacyMode::Private;
        let pool = vec![hidden];

        let board = build_leaderboard(Some(&viewer), &pool, today());
        let row = board.first().unwrap();
        assert!(row.is_hidden);
        assert_eq!(row.id, None);
        assert_eq!(row.avatar, HIDDEN_AVATAR);
        assert_eq!(row.snapshot, None);
        // Ranking stays fully visible.
        assert_eq!(row.rank, 1);
        assert_eq!(row.level, 6);
        assert_eq!(row.efficiency, dec!(75));
    }

    #[test]
    fn friends_mode_hides_from_strangers_only() {
        let mut viewer = Player::new("ida", PlayerSettings::default());
        viewer.friends.insert("pal".to_owned());

        let mut pal = snapshot_with("pal", 2, 5, 0);
        pal.player.privacy = PrivacyMode::Friends;
        let mut stranger = snapshot_with("zed", 2, 3, 1);
        stranger.player.privacy = PrivacyMode::Friends;

        let board = build_leaderboard(Some(&viewer), &[pal, stranger], today());
        let pal_row = board.iter().find(|row| row.username == "pal").unwrap();
        let zed_row = board.iter().find(|row| row.username == "zed").unwrap();

        assert!(pal_row.is_friend);
        assert!(!pal_row.is_hidden);
        assert!(pal_row.id.is_some());
        assert!(zed_row.is_hidden);
    }

    #[test]
    fn viewer_row_is_never_redacted() {
        let viewer = Player::new("ida", PlayerSettings::default());
        let mut own = snapshot_with("ida", 3, 4, 0);
        own.player.privacy = PrivacyMode::Private;

        let board = build_leaderboard(Some(&viewer), &[own], today());
        let row = board.first().unwrap();
        assert!(row.is_user);
        assert!(!row.is_hidden);
        assert!(row.id.is_some());
        assert!(row.snapshot.is_some());
    }

    #[test]
    fn percentile_labels_coarsen_with_rank() {
        assert_eq!(percentile_label(1, 1000), "Top 0.1%");
        assert_eq!(percentile_label(10, 1000), "Top 1%");
        assert_eq!(percentile_label(34, 1000), "Top 3.4%");
        assert_eq!(percentile_label(50, 1000), "Top 5%");
        assert_eq!(percentile_label(365, 1000), "Top 37%");
        assert_eq!(percentile_label(1, 2), "Top 50%");
        assert_eq!(percentile_label(2, 2), "Top 100%");
        assert_eq!(percentile_label(1, 1), "Top 100%");
    }

    #[test]
    fn viewer_percentile_reruns_the_board() {
        let viewer = Player::new("ida", PlayerSettings::default());
        let pool = vec![
            snapshot_with("ida", 1, 3, 1),  // 75
            snapshot_with("noor", 1, 5, 0), // 100
        ];

        let label = viewer_percentile(&viewer, &pool, today());
        assert_eq!(label.as_deref(), Some("Top 100%"));
    }
}
