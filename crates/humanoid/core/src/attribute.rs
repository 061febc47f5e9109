//! Bounded float attributes backing the humanoid's food and experience meters.
//!
//! Each attribute declares a `[min, max]` range. Direct writes outside the
//! range are rejected with [`AttributeError::OutOfRange`]; fitted writes clamp
//! into range instead. Current values are game state and are persisted by the
//! record layer; bounds and defaults are fixed per [`AttributeKind`].

use arrayvec::ArrayVec;

use crate::config::HumanoidConfig;
use crate::error::{ErrorSeverity, SubsystemError};

/// Enum naming every attribute this subsystem reads or broadcasts.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum AttributeKind {
    /// Health points, owned by the body and only mirrored in snapshots.
    Health,
    /// Food level.
    Hunger,
    Saturation,
    Exhaustion,
    ExperienceLevel,
    /// Progress through the current level, `[0, 1]`.
    Experience,
}

impl AttributeKind {
    /// Returns `(min, max, default)` for this attribute.
    pub const fn bounds(self) -> (f32, f32, f32) {
        match self {
            Self::Health => (0.0, 20.0, 20.0),
            Self::Hunger => (0.0, HumanoidConfig::MAX_FOOD, HumanoidConfig::MAX_FOOD),
            Self::Saturation => (0.0, HumanoidConfig::MAX_SATURATION, 5.0),
            Self::Exhaustion => (0.0, HumanoidConfig::MAX_EXHAUSTION, 0.0),
            Self::ExperienceLevel => (0.0, HumanoidConfig::MAX_LEVEL as f32, 0.0),
            Self::Experience => (0.0, 1.0, 0.0),
        }
    }
}

/// Errors raised by the attribute store.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AttributeError {
    /// A direct write fell outside the attribute's declared range.
    #[error("{kind} value {value} is outside [{min}, {max}]")]
    OutOfRange {
        kind: AttributeKind,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl SubsystemError for AttributeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::OutOfRange { .. } => "ATTRIBUTE_OUT_OF_RANGE",
        }
    }
}

/// A single bounded attribute value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Attribute {
    kind: AttributeKind,
    min: f32,
    max: f32,
    default: f32,
    value: f32,
}

impl Attribute {
    /// Creates an attribute at its default value.
    pub const fn new(kind: AttributeKind) -> Self {
        let (min, max, default) = kind.bounds();
        Self {
            kind,
            min,
            max,
            default,
            value: default,
        }
    }

    pub const fn kind(&self) -> AttributeKind {
        self.kind
    }

    pub const fn value(&self) -> f32 {
        self.value
    }

    pub const fn min(&self) -> f32 {
        self.min
    }

    pub const fn max(&self) -> f32 {
        self.max
    }

    pub const fn default_value(&self) -> f32 {
        self.default
    }

    /// Writes `value`, rejecting anything outside `[min, max]`.
    pub fn set_value(&mut self, value: f32) -> Result<(), AttributeError> {
        if !(self.min..=self.max).contains(&value) {
            return Err(AttributeError::OutOfRange {
                kind: self.kind,
                value,
                min: self.min,
                max: self.max,
            });
        }
        self.value = value;
        Ok(())
    }

    /// Writes `value` clamped into `[min, max]`. NaN resets to the default.
    pub fn set_value_fitted(&mut self, value: f32) {
        self.value = if value.is_nan() {
            self.default
        } else {
            value.clamp(self.min, self.max)
        };
    }

    /// Returns the wire view of this attribute.
    pub const fn entry(&self) -> AttributeEntry {
        AttributeEntry {
            kind: self.kind,
            min: self.min,
            max: self.max,
            value: self.value,
            default: self.default,
        }
    }
}

/// Broadcast view of one attribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttributeEntry {
    pub kind: AttributeKind,
    pub min: f32,
    pub max: f32,
    pub value: f32,
    pub default: f32,
}

/// Live attribute values sent alongside a spawn broadcast.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct AttributeSnapshot {
    pub entries: ArrayVec<AttributeEntry, { HumanoidConfig::MAX_ATTRIBUTES }>,
}

impl AttributeSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry. Entries past capacity are dropped in release builds.
    pub fn push(&mut self, entry: AttributeEntry) {
        let pushed = self.entries.try_push(entry).is_ok();
        debug_assert!(pushed, "attribute snapshot full, dropped {:?}", entry.kind);
    }

    pub fn get(&self, kind: AttributeKind) -> Option<&AttributeEntry> {
        self.entries.iter().find(|entry| entry.kind == kind)
    }
}
