//! Hunger, saturation and exhaustion economy.
//!
//! Exhaustion is a currency: every 4.0 units accumulated are converted into
//! one point of saturation loss, or one point of food loss once saturation is
//! empty. The food cadence is an 80-tick cycle; its zero boundary drives
//! natural regeneration and starvation, and under peaceful difficulty every
//! 10th and 20th tick also refill food and health.

use bitflags::bitflags;
use tracing::{debug, trace};

use crate::attribute::{Attribute, AttributeError, AttributeKind};
use crate::body::{Body, DamageCause, RegainCause};
use crate::config::{Difficulty, HumanoidConfig};
use crate::hook::{ExhaustCause, MutationHook, Verdict};

bitflags! {
    /// Tracks which parts of the humanoid a food tick touched.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct FoodChanges: u8 {
        const FOOD       = 1 << 0;
        const SATURATION = 1 << 1;
        const EXHAUSTION = 1 << 2;
        const HEALTH     = 1 << 3;
        const SPRINT     = 1 << 4;
    }
}

/// Food at or above this level regenerates health on the cadence boundary.
const REGEN_FOOD_LEVEL: f32 = 18.0;
/// Food at or below this level forbids sprinting.
const SPRINT_FOOD_LEVEL: f32 = 6.0;
const REGEN_EXHAUSTION: f32 = 3.0;
const JUMP_EXHAUSTION: f32 = 0.2;
const SPRINT_JUMP_EXHAUSTION: f32 = 0.8;

/// Food fields owned by a humanoid.
#[derive(Clone, Debug, PartialEq)]
pub struct FoodState {
    food: Attribute,
    saturation: Attribute,
    exhaustion: Attribute,
    tick_timer: u32,
}

impl Default for FoodState {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodState {
    /// Full food, default saturation, no exhaustion.
    pub fn new() -> Self {
        Self {
            food: Attribute::new(AttributeKind::Hunger),
            saturation: Attribute::new(AttributeKind::Saturation),
            exhaustion: Attribute::new(AttributeKind::Exhaustion),
            tick_timer: 0,
        }
    }

    /// Restores persisted values, fitting each into its declared range.
    pub fn restore(food: f32, saturation: f32, exhaustion: f32, tick_timer: i64) -> Self {
        let mut state = Self::new();
        state.food.set_value_fitted(food);
        state.saturation.set_value_fitted(saturation);
        state.exhaustion.set_value_fitted(exhaustion);
        state.tick_timer = tick_timer.rem_euclid(i64::from(HumanoidConfig::FOOD_TICK_PERIOD)) as u32;
        state
    }

    pub fn food(&self) -> f32 {
        self.food.value()
    }

    pub fn max_food(&self) -> f32 {
        self.food.max()
    }

    pub fn saturation(&self) -> f32 {
        self.saturation.value()
    }

    pub fn exhaustion(&self) -> f32 {
        self.exhaustion.value()
    }

    pub fn tick_timer(&self) -> u32 {
        self.tick_timer
    }

    pub fn attributes(&self) -> [&Attribute; 3] {
        [&self.food, &self.saturation, &self.exhaustion]
    }

    /// Writes food directly. Crossing 17, 6 or 0 restarts the cadence so
    /// regeneration and starvation line up with the moment of crossing.
    pub fn set_food(&mut self, value: f32) -> Result<(), AttributeError> {
        let old = self.food.value();
        self.food.set_value(value)?;

        let crossed = HumanoidConfig::FOOD_REGIME_BOUNDS
            .iter()
            .any(|&bound| (old > bound) != (value > bound));
        if crossed {
            trace!(target: "humanoid::food", old, new = value, "food regime crossed, cadence reset");
            self.tick_timer = 0;
        }
        Ok(())
    }

    /// Adds `amount` food, clamped into range. NaN amounts are ignored.
    pub fn add_food(&mut self, amount: f32) {
        if amount.is_nan() {
            return;
        }
        let value = (self.food.value() + amount).clamp(self.food.min(), self.food.max());
        if let Err(err) = self.set_food(value) {
            debug!(target: "humanoid::food", %err, "clamped food write rejected");
        }
    }

    /// Writes saturation directly. Saturation is not bounded by food.
    pub fn set_saturation(&mut self, value: f32) -> Result<(), AttributeError> {
        self.saturation.set_value(value)
    }

    /// Adds `amount` saturation, clamped into range.
    pub fn add_saturation(&mut self, amount: f32) {
        self.saturation.set_value_fitted(self.saturation.value() + amount);
    }

    /// Writes exhaustion directly without converting it.
    pub fn set_exhaustion(&mut self, value: f32) -> Result<(), AttributeError> {
        self.exhaustion.set_value(value)
    }

    /// Charges exhaustion and converts every full 4.0 into saturation or food
    /// loss. Returns the amount charged, or `0.0` when the hook vetoes.
    pub fn exhaust(
        &mut self,
        amount: f32,
        cause: ExhaustCause,
        hook: &dyn MutationHook,
    ) -> Result<f32, AttributeError> {
        let Verdict::Accept(amount) = hook.on_exhaust(amount, cause) else {
            debug!(target: "humanoid::food", amount, %cause, "exhaustion vetoed");
            return Ok(0.0);
        };
        if !amount.is_finite() {
            return Err(AttributeError::OutOfRange {
                kind: AttributeKind::Exhaustion,
                value: amount,
                min: f32::MIN,
                max: f32::MAX,
            });
        }

        // Converted on a copy so a rejected write leaves the meters untouched.
        let mut next = self.clone();
        let mut exhaustion = next.exhaustion.value() + amount;
        while exhaustion >= HumanoidConfig::EXHAUSTION_PER_POINT {
            exhaustion -= HumanoidConfig::EXHAUSTION_PER_POINT;

            let saturation = next.saturation.value();
            let food = next.food.value();
            if saturation > 0.0 {
                next.saturation.set_value((saturation - 1.0).max(0.0))?;
            } else if food > 0.0 {
                next.set_food((food - 1.0).max(0.0))?;
            } else {
                // Nothing left to drain; only the remainder matters.
                exhaustion %= HumanoidConfig::EXHAUSTION_PER_POINT;
            }
        }
        next.exhaustion.set_value(exhaustion)?;
        *self = next;
        Ok(amount)
    }

    /// Charges the exhaustion of a jump.
    pub fn jump(&mut self, sprinting: bool, hook: &dyn MutationHook) -> Result<f32, AttributeError> {
        if sprinting {
            self.exhaust(SPRINT_JUMP_EXHAUSTION, ExhaustCause::SprintJumping, hook)
        } else {
            self.exhaust(JUMP_EXHAUSTION, ExhaustCause::Jumping, hook)
        }
    }

    /// Advances the cadence by `elapsed` ticks and applies its effects.
    ///
    /// Dead bodies are skipped entirely. Heals and starvation damage are
    /// requested from `body` and never rolled back.
    pub fn tick(
        &mut self,
        elapsed: u32,
        difficulty: Difficulty,
        body: &mut dyn Body,
        hook: &dyn MutationHook,
    ) -> Result<FoodChanges, AttributeError> {
        if !body.is_alive() {
            return Ok(FoodChanges::empty());
        }

        let before = Observed::capture(self, body);
        let food = self.food.value();
        let health = body.health();

        self.tick_timer = self.tick_timer.saturating_add(elapsed);
        if self.tick_timer >= HumanoidConfig::FOOD_TICK_PERIOD {
            self.tick_timer = 0;
        }

        if difficulty == Difficulty::Peaceful && self.tick_timer % 10 == 0 {
            if food < self.food.max() {
                self.add_food(1.0);
            }
            if self.tick_timer % 20 == 0 && health < body.max_health() {
                body.heal(1.0, RegainCause::Saturation);
            }
        }

        if self.tick_timer == 0 {
            if food >= REGEN_FOOD_LEVEL {
                if health < body.max_health() {
                    trace!(target: "humanoid::food", health, "natural regeneration");
                    body.heal(1.0, RegainCause::Saturation);
                    self.exhaust(REGEN_EXHAUSTION, ExhaustCause::HealthRegen, hook)?;
                }
            } else if food <= 0.0 && difficulty.allows_starvation(health) {
                debug!(target: "humanoid::food", health, %difficulty, "starvation damage");
                body.damage(1.0, DamageCause::Starvation);
            }
        }

        if food <= SPRINT_FOOD_LEVEL && body.is_sprinting() {
            body.set_sprinting(false);
        }

        Ok(before.diff(&Observed::capture(self, body)))
    }
}

/// Values compared before and after a tick to report changes.
struct Observed {
    food: f32,
    saturation: f32,
    exhaustion: f32,
    health: f32,
    sprinting: bool,
}

impl Observed {
    fn capture(state: &FoodState, body: &dyn Body) -> Self {
        Self {
            food: state.food(),
            saturation: state.saturation(),
            exhaustion: state.exhaustion(),
            health: body.health(),
            sprinting: body.is_sprinting(),
        }
    }

    fn diff(&self, after: &Self) -> FoodChanges {
        let mut changes = FoodChanges::empty();
        changes.set(FoodChanges::FOOD, self.food != after.food);
        changes.set(FoodChanges::SATURATION, self.saturation != after.saturation);
        changes.set(FoodChanges::EXHAUSTION, self.exhaustion != after.exhaustion);
        changes.set(FoodChanges::HEALTH, self.health != after.health);
        changes.set(FoodChanges::SPRINT, self.sprinting != after.sprinting);
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::MemoryBody;
    use crate::hook::AcceptAll;

    struct VetoExhaust;

    impl MutationHook for VetoExhaust {
        fn on_exhaust(&self, _amount: f32, _cause: ExhaustCause) -> Verdict<f32> {
            Verdict::Veto
        }
    }

    struct HalveExhaust;

    impl MutationHook for HalveExhaust {
        fn on_exhaust(&self, amount: f32, _cause: ExhaustCause) -> Verdict<f32> {
            Verdict::Accept(amount / 2.0)
        }
    }

    struct InflateExhaust;

    impl MutationHook for InflateExhaust {
        fn on_exhaust(&self, _amount: f32, _cause: ExhaustCause) -> Verdict<f32> {
            Verdict::Accept(f32::INFINITY)
        }
    }

    fn state(food: f32, saturation: f32, exhaustion: f32) -> FoodState {
        FoodState::restore(food, saturation, exhaustion, 0)
    }

    #[test]
    fn exhaust_drains_saturation_before_food() {
        let mut food = state(20.0, 5.0, 0.0);
        assert_eq!(food.exhaust(4.0, ExhaustCause::Custom, &AcceptAll).unwrap(), 4.0);
        assert_eq!(food.saturation(), 4.0);
        assert_eq!(food.exhaustion(), 0.0);
        assert_eq!(food.food(), 20.0);

        for _ in 0..4 {
            food.exhaust(4.0, ExhaustCause::Custom, &AcceptAll).unwrap();
        }
        assert_eq!(food.saturation(), 0.0);
        assert_eq!(food.food(), 20.0);

        food.exhaust(4.0, ExhaustCause::Custom, &AcceptAll).unwrap();
        assert_eq!(food.saturation(), 0.0);
        assert_eq!(food.food(), 19.0);
    }

    #[test]
    fn exhaustion_never_rests_at_four() {
        let mut food = state(20.0, 2.0, 0.0);
        for amount in [0.1, 3.9, 4.0, 7.5, 12.0, 0.0, 39.99, 100.0] {
            food.exhaust(amount, ExhaustCause::Walking, &AcceptAll).unwrap();
            assert!(food.exhaustion() < 4.0, "after {amount}: {}", food.exhaustion());
            assert!(food.exhaustion() >= 0.0);
        }
    }

    #[test]
    fn exhaust_with_empty_meters_keeps_remainder() {
        let mut food = state(0.0, 0.0, 0.0);
        food.exhaust(1e9, ExhaustCause::Custom, &AcceptAll).unwrap();
        assert!(food.exhaustion() < 4.0);
        assert_eq!(food.food(), 0.0);
    }

    #[test]
    fn vetoed_exhaust_returns_zero() {
        let mut food = state(20.0, 5.0, 1.0);
        let before = food.clone();
        assert_eq!(food.exhaust(8.0, ExhaustCause::Attack, &VetoExhaust).unwrap(), 0.0);
        assert_eq!(food, before);
    }

    #[test]
    fn exhaust_charges_the_rewritten_amount() {
        let mut food = state(20.0, 5.0, 1.0);
        assert_eq!(food.exhaust(10.0, ExhaustCause::Sprinting, &HalveExhaust).unwrap(), 5.0);
        assert_eq!(food.exhaustion(), 2.0);
        assert_eq!(food.saturation(), 4.0);
        assert_eq!(food.food(), 20.0);
    }

    #[test]
    fn non_finite_exhaust_is_rejected_without_draining() {
        let mut food = state(20.0, 5.0, 1.0);
        let before = food.clone();

        let err = food.exhaust(f32::INFINITY, ExhaustCause::Custom, &AcceptAll).unwrap_err();
        assert!(matches!(err, AttributeError::OutOfRange { kind: AttributeKind::Exhaustion, .. }));
        assert_eq!(food, before);

        assert!(food.exhaust(1.0, ExhaustCause::Custom, &InflateExhaust).is_err());
        assert!(food.exhaust(f32::NAN, ExhaustCause::Custom, &AcceptAll).is_err());
        assert_eq!(food, before);
    }

    #[test]
    fn failed_exhaust_write_leaves_meters_untouched() {
        let mut food = state(20.0, 5.0, 1.0);
        let before = food.clone();
        assert!(food.exhaust(-2.0, ExhaustCause::Custom, &AcceptAll).is_err());
        assert_eq!(food, before);
    }

    #[test]
    fn crossing_seventeen_resets_cadence() {
        let mut food = FoodState::restore(18.0, 0.0, 0.0, 33);
        food.set_food(17.0).unwrap();
        assert_eq!(food.tick_timer(), 0);
    }

    #[test]
    fn staying_inside_a_regime_keeps_cadence() {
        let mut food = FoodState::restore(16.0, 0.0, 0.0, 33);
        food.set_food(10.0).unwrap();
        assert_eq!(food.tick_timer(), 33);
        food.set_food(6.0).unwrap();
        assert_eq!(food.tick_timer(), 0);
    }

    #[test]
    fn set_food_rejects_out_of_range() {
        let mut food = state(10.0, 0.0, 0.0);
        assert!(food.set_food(21.0).is_err());
        assert!(food.set_food(-1.0).is_err());
        assert_eq!(food.food(), 10.0);
    }

    #[test]
    fn add_food_clamps() {
        let mut food = state(19.0, 0.0, 0.0);
        food.add_food(5.0);
        assert_eq!(food.food(), 20.0);
        food.add_food(-30.0);
        assert_eq!(food.food(), 0.0);
    }

    #[test]
    fn add_food_ignores_nan() {
        let mut food = FoodState::restore(12.0, 0.0, 0.0, 33);
        food.add_food(f32::NAN);
        assert_eq!(food.food(), 12.0);
        assert_eq!(food.tick_timer(), 33);
    }

    #[test]
    fn saturation_is_not_bounded_by_food() {
        let mut food = state(3.0, 0.0, 0.0);
        food.set_saturation(15.0).unwrap();
        assert_eq!(food.saturation(), 15.0);
        assert!(food.saturation() > food.food());
        food.add_saturation(10.0);
        assert_eq!(food.saturation(), 20.0);
    }

    #[test]
    fn starvation_follows_difficulty() {
        let mut body = MemoryBody::new(5.0);
        let mut food = FoodState::restore(0.0, 0.0, 0.0, 79);
        let changes = food
            .tick(1, Difficulty::Normal, &mut body, &AcceptAll)
            .unwrap();
        assert_eq!(body.health, 4.0);
        assert!(changes.contains(FoodChanges::HEALTH));

        let mut body = MemoryBody::new(1.0);
        let mut food = FoodState::restore(0.0, 0.0, 0.0, 79);
        let changes = food
            .tick(1, Difficulty::Normal, &mut body, &AcceptAll)
            .unwrap();
        assert_eq!(body.health, 1.0);
        assert!(changes.is_empty());

        let mut body = MemoryBody::new(11.0);
        let mut food = FoodState::restore(0.0, 0.0, 0.0, 79);
        food.tick(1, Difficulty::Easy, &mut body, &AcceptAll).unwrap();
        assert_eq!(body.health, 10.0);
        food.tick(80, Difficulty::Easy, &mut body, &AcceptAll).unwrap();
        assert_eq!(body.health, 10.0);
    }

    #[test]
    fn full_food_regenerates_and_charges_exhaustion() {
        let mut body = MemoryBody::new(15.0);
        let mut food = FoodState::restore(20.0, 5.0, 0.0, 78);

        let changes = food.tick(1, Difficulty::Hard, &mut body, &AcceptAll).unwrap();
        assert!(changes.is_empty());
        assert_eq!(food.tick_timer(), 79);

        let changes = food.tick(1, Difficulty::Hard, &mut body, &AcceptAll).unwrap();
        assert_eq!(food.tick_timer(), 0);
        assert_eq!(body.health, 16.0);
        assert_eq!(food.exhaustion(), 3.0);
        assert_eq!(changes, FoodChanges::HEALTH | FoodChanges::EXHAUSTION);
    }

    #[test]
    fn peaceful_refills_food_and_health() {
        let mut body = MemoryBody::new(10.0);
        let mut food = FoodState::restore(12.0, 0.0, 0.0, 9);

        food.tick(1, Difficulty::Peaceful, &mut body, &AcceptAll).unwrap();
        assert_eq!(food.food(), 13.0);
        assert_eq!(body.health, 10.0);

        food.tick(10, Difficulty::Peaceful, &mut body, &AcceptAll).unwrap();
        assert_eq!(food.tick_timer(), 20);
        assert_eq!(food.food(), 14.0);
        assert_eq!(body.health, 11.0);
    }

    #[test]
    fn low_food_stops_sprinting() {
        let mut body = MemoryBody::new(20.0);
        body.sprinting = true;
        let mut food = FoodState::restore(6.0, 0.0, 0.0, 3);
        let changes = food.tick(1, Difficulty::Normal, &mut body, &AcceptAll).unwrap();
        assert!(!body.sprinting);
        assert_eq!(changes, FoodChanges::SPRINT);
    }

    #[test]
    fn dead_body_does_not_tick() {
        let mut body = MemoryBody::new(0.0);
        let mut food = FoodState::restore(0.0, 0.0, 0.0, 10);
        let changes = food.tick(5, Difficulty::Hard, &mut body, &AcceptAll).unwrap();
        assert!(changes.is_empty());
        assert_eq!(food.tick_timer(), 10);
    }

    #[test]
    fn jump_charges_by_gait() {
        let mut food = state(20.0, 5.0, 0.0);
        assert_eq!(food.jump(false, &AcceptAll).unwrap(), 0.2);
        assert_eq!(food.jump(true, &AcceptAll).unwrap(), 0.8);
        assert!((food.exhaustion() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn restore_wraps_tick_timer() {
        assert_eq!(FoodState::restore(20.0, 5.0, 0.0, 85).tick_timer(), 5);
        assert_eq!(FoodState::restore(20.0, 5.0, 0.0, -1).tick_timer(), 79);
    }
}
