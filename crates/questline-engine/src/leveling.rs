//! Level curves for player and skill progression.
//!
//! The player curve is a pure function of the level; the skill curve is a
//! *running* threshold carried on the skill itself and multiplied at each
//! level-up event. Both curves are strictly increasing, which guarantees
//! that the level-up loop in the completion transition terminates.
//!
//! All XP arithmetic is integer with floored division. The exponential
//! player curve is evaluated with exact [`Decimal`] multiplication -- never
//! `f64` -- so `floor(100 * 1.2^n)` is reproducible across platforms.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// XP required to advance from level 1 on the player curve.
pub const USER_BASE_XP: u64 = 100;

/// Starting threshold for newly created skills.
pub const DEFAULT_SKILL_BASE_XP: u64 = 50;

/// XP required to advance from `level` to `level + 1` on the player curve.
///
/// `floor(100 * 1.2^(level - 1))`. Total for every input: level 0 is
/// treated as level 1, and values beyond the representable range saturate
/// to `u64::MAX`. Strictly increasing over the non-saturated range.
pub fn user_xp_to_next(level: u32) -> u64 {
    let steps = level.max(1).saturating_sub(1);
    let growth = Decimal::new(12, 1);
    let mut value = Decimal::from(USER_BASE_XP);
    for _ in 0..steps {
        match value.checked_mul(growth) {
            Some(next) => value = next,
            None => return u64::MAX,
        }
    }
    value.floor().to_u64().unwrap_or(u64::MAX)
}

/// The next running threshold for a skill, given its current one.
///
/// `floor(current_max * 3/2)`, lifted to at least `current_max + 1` so a
/// degenerate threshold of 0 or 1 cannot stall skill progression. Applied
/// once per skill level-up event; the result becomes the skill's new
/// `max_xp`.
pub fn next_skill_threshold(current_max: u64) -> u64 {
    let grown = current_max.saturating_mul(3) / 2;
    grown.max(current_max.saturating_add(1))
}
