//! Experience curve and per-humanoid experience state.
//!
//! The curve has three quadratic regimes split at levels 16 and 31:
//!
//! - cumulative cost, levels `0..=16`: `L² + 6L`
//! - cumulative cost, levels `17..=31`: `2.5L² − 40.5L + 360`
//! - cumulative cost, levels `32..=21863`: `4.5L² − 162.5L + 2220`
//!
//! Per-level costs are the forward differences of the cumulative cost, so
//! `cumulative_cost(L + 1) − cumulative_cost(L) == level_cost(L)` holds for
//! every level below the cap. All costs are exact integers.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::attribute::{Attribute, AttributeError, AttributeKind};
use crate::config::HumanoidConfig;
use crate::hook::{ExperienceChange, MutationHook, Verdict};

const MAX_LEVEL: u32 = HumanoidConfig::MAX_LEVEL;

/// Experience needed to advance from `level` to `level + 1`.
///
/// Saturates at `u32::MAX` beyond the level cap.
pub const fn level_cost(level: u32) -> u32 {
    match level {
        0..=15 => 2 * level + 7,
        16..=30 => 5 * level - 38,
        31..=MAX_LEVEL => 9 * level - 158,
        _ => u32::MAX,
    }
}

/// Total experience needed to reach `level` from zero.
///
/// Saturates at `u32::MAX` beyond the level cap.
pub const fn cumulative_cost(level: u32) -> u32 {
    let l = level as i64;
    // Both half-coefficient forms are even for every integer level.
    let cost = match level {
        0..=16 => l * l + 6 * l,
        17..=31 => (5 * l * l - 81 * l) / 2 + 360,
        32..=MAX_LEVEL => (9 * l * l - 325 * l) / 2 + 2220,
        _ => return u32::MAX,
    };
    cost as u32
}

/// Converts a total experience amount into `(level, progress)`.
///
/// The input is masked to 31 bits. Integer boundaries map to progress
/// exactly `0.0`; other amounts yield progress in `[0, 1)`.
pub fn invert(total_xp: u32) -> ExperienceChange {
    let xp = total_xp & HumanoidConfig::TOTAL_XP_MASK;

    let (a, b, offset) = if xp <= cumulative_cost(16) {
        (1.0, 6.0, 0.0)
    } else if xp <= cumulative_cost(31) {
        (2.5, -40.5, 360.0)
    } else {
        (4.5, -162.5, 2220.0)
    };
    let root = larger_root(a, b, offset - f64::from(xp));

    // The floating root can land a hair below an integer level; settle the
    // level against the exact cumulative cost.
    let mut level = (root.max(0.0).floor() as u32).min(MAX_LEVEL);
    while level > 0 && cumulative_cost(level) > xp {
        level -= 1;
    }
    while level < MAX_LEVEL && cumulative_cost(level + 1) <= xp {
        level += 1;
    }

    let base = cumulative_cost(level);
    if base == xp {
        return ExperienceChange::new(level, 0.0);
    }

    let fraction = root - f64::from(level);
    let fraction = if (0.0..1.0).contains(&fraction) {
        fraction
    } else {
        f64::from(xp - base) / f64::from(level_cost(level))
    };
    ExperienceChange::new(level, below_one(fraction as f32))
}

/// Larger real root of `a·x² + b·x + c = 0` for `a > 0`.
fn larger_root(a: f64, b: f64, c: f64) -> f64 {
    let discriminant = (b * b - 4.0 * a * c).max(0.0);
    (-b + discriminant.sqrt()) / (2.0 * a)
}

/// Largest representable progress strictly below a full bar.
fn below_one(progress: f32) -> f32 {
    if progress >= 1.0 {
        f32::from_bits(1.0f32.to_bits() - 1)
    } else {
        progress
    }
}

/// Walks `current` through `delta` experience one level at a time.
///
/// Gains consume each level's cost until the remainder fits inside a level
/// (a remainder equal to the full cost stays on the current level with
/// progress `1.0`). Losses refund the cost of the level below until the
/// remainder is non-negative; level zero absorbs any further loss.
fn walk_levels(level: u32, remaining: i64) -> ExperienceChange {
    let mut level = level.min(MAX_LEVEL);
    let mut remaining = remaining;

    if remaining > 0 {
        loop {
            let cost = i64::from(level_cost(level));
            if remaining <= cost {
                return ExperienceChange::new(level, (remaining as f64 / cost as f64) as f32);
            }
            remaining -= cost;
            level += 1;
            if level >= MAX_LEVEL {
                return ExperienceChange::new(MAX_LEVEL, 1.0);
            }
        }
    }

    while remaining < 0 {
        if level == 0 {
            remaining = 0;
            break;
        }
        level -= 1;
        remaining += i64::from(level_cost(level));
    }
    let cost = i64::from(level_cost(level));
    ExperienceChange::new(level, (remaining as f64 / cost as f64) as f32)
}

/// Experience fields owned by a humanoid.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperienceState {
    level: Attribute,
    progress: Attribute,
    total_xp: u32,
    seed: i32,
    last_pickup: Option<Instant>,
}

impl ExperienceState {
    /// Creates a fresh state at level zero with the given seed.
    pub fn new(seed: i32) -> Self {
        Self {
            level: Attribute::new(AttributeKind::ExperienceLevel),
            progress: Attribute::new(AttributeKind::Experience),
            total_xp: 0,
            seed,
            last_pickup: None,
        }
    }

    /// Restores persisted values, fitting level and progress into range.
    pub fn restore(level: i64, progress: f32, total_xp: i64, seed: i32) -> Self {
        let mut state = Self::new(seed);
        state.level.set_value_fitted(level.clamp(0, i64::from(MAX_LEVEL)) as f32);
        state.progress.set_value_fitted(progress);
        state.total_xp = mask_total(total_xp);
        state
    }

    pub fn level(&self) -> u32 {
        self.level.value() as u32
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn total_xp(&self) -> u32 {
        self.total_xp
    }

    /// Per-entity seed, stable across saves.
    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn level_attribute(&self) -> &Attribute {
        &self.level
    }

    pub fn progress_attribute(&self) -> &Attribute {
        &self.progress
    }

    /// Experience represented by the partially filled bar of the current level.
    pub fn filled_xp(&self) -> u32 {
        (f64::from(level_cost(self.level())) * f64::from(self.progress())) as u32
    }

    /// Total experience beyond the cumulative cost of the current level.
    pub fn remainder_xp(&self) -> i64 {
        i64::from(self.total_xp) - i64::from(cumulative_cost(self.level()))
    }

    /// Writes progress directly; out-of-range values are rejected.
    pub fn set_progress(&mut self, progress: f32) -> Result<(), AttributeError> {
        self.progress.set_value(progress)
    }

    /// Recomputes progress from the remainder over the current level cost.
    pub fn recalculate_progress(&mut self) -> f32 {
        let cost = f64::from(level_cost(self.level()));
        let progress = (self.remainder_xp() as f64 / cost) as f32;
        self.progress.set_value_fitted(progress);
        self.progress.value()
    }

    /// Computes the `(level, progress)` that `proposed_xp` would produce.
    ///
    /// Returns `None` when the masked amount equals the current total. In
    /// sync mode the curve inverse is used; otherwise the current level is
    /// walked up or down so that relative level framing is preserved.
    pub fn plan_total_xp(&self, proposed_xp: i64, sync_level: bool) -> Option<ExperienceChange> {
        let xp = mask_total(proposed_xp);
        if xp == self.total_xp {
            return None;
        }
        if sync_level {
            return Some(invert(xp));
        }
        let remaining = i64::from(xp) - i64::from(self.total_xp) + i64::from(self.filled_xp());
        Some(walk_levels(self.level(), remaining))
    }

    /// Changes total experience, committing level and progress atomically.
    ///
    /// Returns `Ok(false)` when the amount is unchanged or the hook vetoes.
    pub fn set_total_xp(
        &mut self,
        proposed_xp: i64,
        sync_level: bool,
        hook: &dyn MutationHook,
    ) -> Result<bool, AttributeError> {
        let Some(change) = self.plan_total_xp(proposed_xp, sync_level) else {
            return Ok(false);
        };
        let Verdict::Accept(change) = hook.on_experience_change(change) else {
            debug!(
                target: "humanoid::experience",
                level = change.level,
                progress = change.progress,
                "experience change vetoed"
            );
            return Ok(false);
        };

        let mut level = self.level;
        let mut progress = self.progress;
        level.set_value(change.level as f32)?;
        progress.set_value(change.progress)?;

        self.total_xp = mask_total(proposed_xp);
        self.level = level;
        self.progress = progress;
        Ok(true)
    }

    pub fn add_xp(
        &mut self,
        amount: i64,
        sync_level: bool,
        hook: &dyn MutationHook,
    ) -> Result<bool, AttributeError> {
        self.set_total_xp(i64::from(self.total_xp) + amount, sync_level, hook)
    }

    pub fn take_xp(
        &mut self,
        amount: i64,
        sync_level: bool,
        hook: &dyn MutationHook,
    ) -> Result<bool, AttributeError> {
        self.set_total_xp(i64::from(self.total_xp) - amount, sync_level, hook)
    }

    /// Sets the level, keeping progress and total experience untouched.
    pub fn set_level(&mut self, level: i64, hook: &dyn MutationHook) -> Result<bool, AttributeError> {
        let (min, max, _) = AttributeKind::ExperienceLevel.bounds();
        if level < min as i64 || level > max as i64 {
            return Err(AttributeError::OutOfRange {
                kind: AttributeKind::ExperienceLevel,
                value: level as f32,
                min,
                max,
            });
        }

        let proposed = ExperienceChange::new(level as u32, self.progress());
        let Verdict::Accept(change) = hook.on_experience_change(proposed) else {
            debug!(target: "humanoid::experience", level, "level change vetoed");
            return Ok(false);
        };
        self.level.set_value(change.level as f32)?;
        Ok(true)
    }

    pub fn add_level(&mut self, levels: i64, hook: &dyn MutationHook) -> Result<bool, AttributeError> {
        self.set_level(i64::from(self.level()) + levels, hook)
    }

    pub fn take_level(&mut self, levels: i64, hook: &dyn MutationHook) -> Result<bool, AttributeError> {
        self.set_level(i64::from(self.level()) - levels, hook)
    }

    /// Starts the orb pickup cooldown at `now`.
    pub fn reset_pickup_cooldown(&mut self, now: Instant) {
        self.last_pickup = Some(now);
    }

    /// Whether the pickup cooldown has elapsed at `now`.
    pub fn can_pickup(&self, now: Instant) -> bool {
        let cooldown = Duration::from_millis(HumanoidConfig::XP_PICKUP_COOLDOWN_MS);
        self.last_pickup
            .is_none_or(|last| now.saturating_duration_since(last) > cooldown)
    }
}

/// Clears the sign bit; negative totals floor at zero first.
fn mask_total(xp: i64) -> u32 {
    (xp.max(0) & i64::from(HumanoidConfig::TOTAL_XP_MASK)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::AcceptAll;

    struct VetoAll;

    impl MutationHook for VetoAll {
        fn on_experience_change(&self, _change: ExperienceChange) -> Verdict<ExperienceChange> {
            Verdict::Veto
        }
    }

    struct CapLevel(u32);

    impl MutationHook for CapLevel {
        fn on_experience_change(&self, change: ExperienceChange) -> Verdict<ExperienceChange> {
            Verdict::Accept(ExperienceChange::new(change.level.min(self.0), change.progress))
        }
    }

    #[test]
    fn cumulative_cost_matches_regimes() {
        assert_eq!(cumulative_cost(0), 0);
        assert_eq!(cumulative_cost(1), 7);
        assert_eq!(cumulative_cost(16), 352);
        assert_eq!(cumulative_cost(17), 394);
        assert_eq!(cumulative_cost(31), 1507);
        assert_eq!(cumulative_cost(32), 1628);
        assert_eq!(cumulative_cost(MAX_LEVEL), 2_147_407_943);
        assert_eq!(cumulative_cost(MAX_LEVEL + 1), u32::MAX);
    }

    #[test]
    fn level_cost_is_forward_difference() {
        for level in 0..MAX_LEVEL {
            assert_eq!(
                cumulative_cost(level + 1) - cumulative_cost(level),
                level_cost(level),
                "level {level}"
            );
        }
        assert_eq!(level_cost(MAX_LEVEL + 1), u32::MAX);
    }

    #[test]
    fn invert_reproduces_integer_levels() {
        for level in 0..=MAX_LEVEL {
            assert_eq!(
                invert(cumulative_cost(level)),
                ExperienceChange::new(level, 0.0),
                "level {level}"
            );
        }
    }

    #[test]
    fn invert_keeps_progress_below_one() {
        for xp in [1, 6, 351, 353, 1506, 1508, 1_000_000, 2_147_407_942] {
            let change = invert(xp);
            assert!(change.progress > 0.0 && change.progress < 1.0, "xp {xp}");
            assert!(cumulative_cost(change.level) < xp);
            assert!(cumulative_cost(change.level + 1) > xp);
        }
    }

    #[test]
    fn invert_masks_sign_bit() {
        assert_eq!(invert(0x8000_0000 | 7), invert(7));
        assert_eq!(invert(u32::MAX).level, MAX_LEVEL);
    }

    #[test]
    fn non_sync_fill_stops_at_full_bar() {
        let mut state = ExperienceState::new(0);
        assert!(state.set_total_xp(7, false, &AcceptAll).unwrap());
        assert_eq!(state.level(), 0);
        assert_eq!(state.progress(), 1.0);
        assert_eq!(state.total_xp(), 7);
    }

    #[test]
    fn non_sync_gain_crosses_levels() {
        let mut state = ExperienceState::new(0);
        // 7 + 9 to reach level 2, then 5 of 11.
        state.set_total_xp(21, false, &AcceptAll).unwrap();
        assert_eq!(state.level(), 2);
        assert!((state.progress() - 5.0 / 11.0).abs() < 1e-6);
    }

    #[test]
    fn non_sync_preserves_relative_level() {
        let mut state = ExperienceState::restore(10, 0.0, 0, 0);
        state.set_total_xp(27, false, &AcceptAll).unwrap();
        // Level 10 costs 27, so the bar fills without a level-up.
        assert_eq!(state.level(), 10);
        assert_eq!(state.progress(), 1.0);
    }

    #[test]
    fn non_sync_loss_walks_down_and_floors_at_zero() {
        let mut state = ExperienceState::restore(2, 0.0, 16, 0);
        state.take_xp(3, false, &AcceptAll).unwrap();
        assert_eq!(state.level(), 1);
        assert!((state.progress() - 6.0 / 9.0).abs() < 1e-6);
        assert_eq!(state.total_xp(), 13);

        state.take_xp(100, false, &AcceptAll).unwrap();
        assert_eq!(state.level(), 0);
        assert_eq!(state.progress(), 0.0);
        assert_eq!(state.total_xp(), 0);
    }

    #[test]
    fn sync_mode_discards_current_level() {
        let mut state = ExperienceState::restore(40, 0.5, 0, 0);
        state.set_total_xp(i64::from(cumulative_cost(20)), true, &AcceptAll).unwrap();
        assert_eq!(state.level(), 20);
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn non_sync_gain_stops_at_cap() {
        let mut state = ExperienceState::new(0);
        state.set_total_xp(i64::from(u32::MAX), false, &AcceptAll).unwrap();
        assert_eq!(state.level(), MAX_LEVEL);
        assert_eq!(state.progress(), 1.0);
        assert_eq!(state.total_xp(), HumanoidConfig::TOTAL_XP_MASK);
    }

    #[test]
    fn veto_leaves_state_untouched() {
        let mut state = ExperienceState::restore(3, 0.25, 30, 9);
        let before = state.clone();
        assert!(!state.set_total_xp(500, true, &VetoAll).unwrap());
        assert!(!state.set_level(5, &VetoAll).unwrap());
        assert_eq!(state, before);
    }

    #[test]
    fn unchanged_total_is_not_a_change() {
        let mut state = ExperienceState::restore(0, 0.0, 7, 0);
        assert!(!state.set_total_xp(7, false, &AcceptAll).unwrap());
        assert!(!state.set_total_xp(7 | 0x8000_0000, false, &AcceptAll).unwrap());
    }

    #[test]
    fn hook_adjusted_level_is_committed() {
        let mut state = ExperienceState::new(0);
        state.set_total_xp(i64::from(cumulative_cost(30)), true, &CapLevel(12)).unwrap();
        assert_eq!(state.level(), 12);
        assert_eq!(state.total_xp(), cumulative_cost(30));
    }

    #[test]
    fn level_mutations_are_bounded() {
        let mut state = ExperienceState::new(0);
        assert!(state.add_level(5, &AcceptAll).unwrap());
        assert!(state.take_level(2, &AcceptAll).unwrap());
        assert_eq!(state.level(), 3);
        assert!(state.take_level(4, &AcceptAll).is_err());
        assert!(state.set_level(i64::from(MAX_LEVEL) + 1, &AcceptAll).is_err());
        assert_eq!(state.level(), 3);
    }

    #[test]
    fn remainder_and_recalculated_progress() {
        let mut state = ExperienceState::restore(2, 0.0, 21, 0);
        assert_eq!(state.remainder_xp(), 5);
        let progress = state.recalculate_progress();
        assert!((progress - 5.0 / 11.0).abs() < 1e-6);
        assert_eq!(state.filled_xp(), 5);
    }

    #[test]
    fn progress_writes_are_checked() {
        let mut state = ExperienceState::new(0);
        assert!(state.set_progress(1.5).is_err());
        state.set_progress(0.75).unwrap();
        assert_eq!(state.progress(), 0.75);
    }

    #[test]
    fn pickup_cooldown_uses_explicit_clock() {
        let start = Instant::now();
        let mut state = ExperienceState::new(0);
        assert!(state.can_pickup(start));
        state.reset_pickup_cooldown(start);
        assert!(!state.can_pickup(start + Duration::from_millis(200)));
        assert!(state.can_pickup(start + Duration::from_millis(501)));
    }
}
