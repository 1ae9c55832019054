//! Efficiency scoring: the leaderboard's ranking key.
//!
//! Efficiency is the ratio of completed tasks to completed-plus-missed,
//! expressed on a 0-100 scale as an exact [`Decimal`] -- never a float.
//! A player with no history scores a perfect 100, so new accounts start
//! at the top of their own bracket rather than at the bottom.

use chrono::NaiveDate;
use questline_types::{Task, TaskKind};
use rust_decimal::Decimal;

/// Count a player's missed daily tasks: dailies whose scheduled date is
/// strictly before `today` and which were never completed.
///
/// Tasks with missing or unparseable dates are excluded rather than
/// counted either way -- a malformed date must not abort or skew the
/// whole computation.
pub fn missed_daily_tasks(tasks: &[Task], today: NaiveDate) -> u64 {
    let missed = tasks
        .iter()
        .filter(|task| task.kind == TaskKind::Daily && !task.completed)
        .filter_map(Task::scheduled_date)
        .filter(|date| *date < today)
        .count();
    u64::try_from(missed).unwrap_or(u64::MAX)
}

/// `100 * completed / (completed + missed)`, or exactly 100 when there is
/// no history at all.
pub fn efficiency_score(completed: u64, missed: u64) -> Decimal {
    let total = completed.saturating_add(missed);
    if total == 0 {
        return Decimal::ONE_HUNDRED;
    }
    Decimal::from(completed)
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(Decimal::from(total)))
        .unwrap_or(Decimal::ZERO)
}
