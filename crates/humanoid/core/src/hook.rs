//! Pre-commit hooks that may veto or adjust a pending mutation.
//!
//! Hooks run synchronously before any state is written. A hook returning
//! [`Verdict::Veto`] turns the mutation into a no-op; [`Verdict::Accept`]
//! carries the (possibly adjusted) value that is then committed.

/// Outcome of a pre-commit check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict<T> {
    /// Commit the carried value.
    Accept(T),
    /// Leave state untouched.
    Veto,
}

impl<T> Verdict<T> {
    /// Returns the accepted value, if any.
    pub fn accepted(self) -> Option<T> {
        match self {
            Self::Accept(value) => Some(value),
            Self::Veto => None,
        }
    }

    pub fn is_veto(&self) -> bool {
        matches!(self, Self::Veto)
    }
}

/// Reason an exhaustion charge was raised.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ExhaustCause {
    Attack,
    Damage,
    Mining,
    /// Charged when the food cadence heals the humanoid.
    HealthRegen,
    Potion,
    Walking,
    Sprinting,
    Swimming,
    Jumping,
    SprintJumping,
    #[default]
    Custom,
}

/// A proposed `(level, progress)` pair awaiting commit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExperienceChange {
    pub level: u32,
    pub progress: f32,
}

impl ExperienceChange {
    pub const fn new(level: u32, progress: f32) -> Self {
        Self { level, progress }
    }
}

/// Collaborator consulted before exhaustion and experience mutations commit.
///
/// Default implementations accept every change unmodified.
pub trait MutationHook: Send + Sync {
    /// Called before `amount` exhaustion is charged. The accepted value is the
    /// amount actually charged.
    fn on_exhaust(&self, amount: f32, cause: ExhaustCause) -> Verdict<f32> {
        let _ = cause;
        Verdict::Accept(amount)
    }

    /// Called before level and progress change.
    fn on_experience_change(&self, change: ExperienceChange) -> Verdict<ExperienceChange> {
        Verdict::Accept(change)
    }
}

/// Hook that accepts every mutation unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct AcceptAll;

impl MutationHook for AcceptAll {}

#[cfg(test)]
mod tests {
    use super::*;

    struct HalveExhaustion;

    impl MutationHook for HalveExhaustion {
        fn on_exhaust(&self, amount: f32, _cause: ExhaustCause) -> Verdict<f32> {
            Verdict::Accept(amount / 2.0)
        }
    }

    #[test]
    fn default_hook_accepts_unchanged() {
        let hook = AcceptAll;
        assert_eq!(
            hook.on_exhaust(1.5, ExhaustCause::Mining),
            Verdict::Accept(1.5)
        );
        let change = ExperienceChange::new(3, 0.25);
        assert_eq!(hook.on_experience_change(change), Verdict::Accept(change));
    }

    #[test]
    fn overriding_hook_adjusts_amount() {
        let verdict = HalveExhaustion.on_exhaust(3.0, ExhaustCause::HealthRegen);
        assert_eq!(verdict.accepted(), Some(1.5));
        assert!(Verdict::<f32>::Veto.is_veto());
        assert_eq!(ExhaustCause::SprintJumping.to_string(), "sprint_jumping");
    }
}
