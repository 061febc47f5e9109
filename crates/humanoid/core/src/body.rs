//! The physical body a humanoid's simulation state is attached to.
//!
//! Movement, damage resolution and health storage belong to the entity
//! simulation; this subsystem only reads vitals and requests heals, damage
//! and sprint changes through [`Body`].

/// World-space vector.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Position, velocity and orientation at a point in time.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub motion: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// Why health was regained.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RegainCause {
    /// Food cadence regeneration.
    Saturation,
    Custom,
}

/// Why damage was taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DamageCause {
    Starvation,
    Custom,
}

/// Vitals and motion of the entity owning a humanoid state.
pub trait Body {
    fn is_alive(&self) -> bool;

    fn health(&self) -> f32;

    fn max_health(&self) -> f32;

    /// Requests `amount` health back. The body may cancel or scale it.
    fn heal(&mut self, amount: f32, cause: RegainCause);

    /// Requests `amount` damage. The body may cancel or scale it.
    fn damage(&mut self, amount: f32, cause: DamageCause);

    fn is_sprinting(&self) -> bool;

    fn set_sprinting(&mut self, sprinting: bool);

    fn pose(&self) -> Pose;
}

/// Plain in-memory body that applies every request as-is.
///
/// Useful for offline tools and tests that drive a humanoid without a world.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryBody {
    pub health: f32,
    pub max_health: f32,
    pub sprinting: bool,
    pub pose: Pose,
}

impl MemoryBody {
    pub fn new(health: f32) -> Self {
        Self {
            health,
            max_health: 20.0,
            sprinting: false,
            pose: Pose::default(),
        }
    }
}

impl Default for MemoryBody {
    fn default() -> Self {
        Self::new(20.0)
    }
}

impl Body for MemoryBody {
    fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.max_health
    }

    fn heal(&mut self, amount: f32, _cause: RegainCause) {
        self.health = (self.health + amount).min(self.max_health);
    }

    fn damage(&mut self, amount: f32, _cause: DamageCause) {
        self.health = (self.health - amount).max(0.0);
    }

    fn is_sprinting(&self) -> bool {
        self.sprinting
    }

    fn set_sprinting(&mut self, sprinting: bool) {
        self.sprinting = sprinting;
    }

    fn pose(&self) -> Pose {
        self.pose
    }
}
