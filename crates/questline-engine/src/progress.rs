//! Period progress: completion targets and the two progress percentages
//! for a calendar window.
//!
//! The window is always derived from an injected `today` -- the engine
//! never reads the wall clock. Two independent metrics are produced:
//!
//! - **absolute**: progress toward the whole window's target. Low early in
//!   the window, high late; fills the period progress bar.
//! - **pace**: progress relative to the target achievable given the days
//!   elapsed so far; drives the on-track motivational message.
//!
//! The two must never be conflated: absolute varies with the window
//! length, pace varies only with days passed.
//!
//! All percentages are integer round-half-up; tasks with malformed dates
//! are excluded rather than failing the computation.

use chrono::{Datelike, Days, NaiveDate};
use questline_types::{Period, PeriodProgress, Task, TaskKind};

/// Resolve the inclusive `[start, end]` bounds of the period containing
/// `today`: the ISO week (Monday through Sunday), the calendar month, or
/// the calendar year.
pub fn period_bounds(period: Period, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        Period::Week => {
            let offset = u64::from(today.weekday().num_days_from_monday());
            let start = today.checked_sub_days(Days::new(offset)).unwrap_or(today);
            let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
            (start, end)
        }
        Period::Month => {
            let start = today.with_day(1).unwrap_or(today);
            let end = start
                .checked_add_months(chrono::Months::new(1))
                .and_then(|next| next.checked_sub_days(Days::new(1)))
                .unwrap_or(start);
            (start, end)
        }
        Period::Year => {
            let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
            let end = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
            (start, end)
        }
    }
}

/// Number of calendar days in `[start, end]` inclusive.
fn days_inclusive(start: NaiveDate, end: NaiveDate) -> u64 {
    let days = end.signed_duration_since(start).num_days();
    u64::try_from(days.saturating_add(1)).unwrap_or(0)
}

/// `round(100 * count / target)` capped at 100, with a zero target
/// yielding zero. Integer round-half-up; no floats.
fn rounded_percent(count: u64, target: u64) -> u8 {
    if target == 0 {
        return 0;
    }
    let numerator = count.saturating_mul(100).saturating_add(target / 2);
    let percent = numerator.checked_div(target).unwrap_or(0).min(100);
    u8::try_from(percent).unwrap_or(100)
}

/// Compute progress statistics for the period containing `today`.
///
/// `target` is the number of days in the window times `daily_min`.
/// `completed` counts daily tasks that are completed and whose scheduled
/// date falls inside the window (inclusive); tasks with missing or
/// unparseable dates are skipped. The pace target is floored at 1 so the
/// first day of a window never divides by zero.
pub fn compute_progress(
    tasks: &[Task],
    daily_min: u32,
    period: Period,
    today: NaiveDate,
) -> PeriodProgress {
    let (start, end) = period_bounds(period, today);
    let total_days = days_inclusive(start, end);
    let target = total_days.saturating_mul(u64::from(daily_min));

    let completed = tasks
        .iter()
        .filter(|task| task.kind == TaskKind::Daily && task.completed)
        .filter_map(Task::scheduled_date)
        .filter(|date| (start..=end).contains(date))
        .count();
    let completed = u64::try_from(completed).unwrap_or(u64::MAX);

    let days_passed = days_inclusive(start, today);
    let pace_target = days_passed.saturating_mul(u64::from(daily_min)).max(1);

    PeriodProgress {
        completed: u32::try_from(completed).unwrap_or(u32::MAX),
        target: u32::try_from(target).unwrap_or(u32::MAX),
        absolute_percent: rounded_percent(completed, target),
        pace_percent: rounded_percent(completed, pace_target),
    }
}
