/// Humanoid configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HumanoidConfig {
    /// Number of slots in the main inventory band (hotbar bindings point here).
    pub main_inventory_size: usize,
    /// Number of slots in the ender chest list.
    pub ender_chest_size: usize,
}

impl HumanoidConfig {
    // ===== compile-time constants used as type parameters =====
    /// Quick-access buttons bound into the main inventory.
    pub const HOTBAR_SIZE: usize = 9;
    pub const ARMOR_SLOTS: usize = 4;
    /// Attribute entries carried by a spawn broadcast (health + five humanoid attributes).
    pub const MAX_ATTRIBUTES: usize = 6;

    // ===== persisted slot bands =====
    pub const ARMOR_SLOT_OFFSET: i32 = 100;
    /// Largest main band that stays clear of the armor band once offset past the hotbar.
    pub const MAX_MAIN_INVENTORY_SIZE: usize =
        Self::ARMOR_SLOT_OFFSET as usize - Self::HOTBAR_SIZE;

    // ===== experience =====
    /// Highest reachable level; costs beyond it saturate.
    pub const MAX_LEVEL: u32 = 21_863;
    /// Total experience is stored with the sign bit cleared.
    pub const TOTAL_XP_MASK: u32 = 0x7fff_ffff;
    /// Minimum delay between two experience orb pickups.
    pub const XP_PICKUP_COOLDOWN_MS: u64 = 500;

    // ===== food =====
    pub const MAX_FOOD: f32 = 20.0;
    pub const MAX_SATURATION: f32 = 20.0;
    pub const MAX_EXHAUSTION: f32 = 5.0;
    /// Exhaustion units converted into one point of saturation or food.
    pub const EXHAUSTION_PER_POINT: f32 = 4.0;
    /// Length of the food cadence; the timer wraps to zero at this value.
    pub const FOOD_TICK_PERIOD: u32 = 80;
    /// Food values whose crossing resynchronizes the food cadence.
    pub const FOOD_REGIME_BOUNDS: [f32; 3] = [17.0, 6.0, 0.0];

    // ===== skin =====
    /// Accepted skin payload sizes: 64x32 and 64x64 RGBA.
    pub const SUPPORTED_SKIN_LENGTHS: [usize; 2] = [64 * 32 * 4, 64 * 64 * 4];

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAIN_INVENTORY_SIZE: usize = 36;
    pub const DEFAULT_ENDER_CHEST_SIZE: usize = 27;

    pub fn new() -> Self {
        Self {
            main_inventory_size: Self::DEFAULT_MAIN_INVENTORY_SIZE,
            ender_chest_size: Self::DEFAULT_ENDER_CHEST_SIZE,
        }
    }

    /// Main inventory size is capped at [`Self::MAX_MAIN_INVENTORY_SIZE`].
    pub fn with_main_inventory_size(main_inventory_size: usize) -> Self {
        Self {
            main_inventory_size: main_inventory_size.min(Self::MAX_MAIN_INVENTORY_SIZE),
            ..Self::new()
        }
    }

    /// Main inventory size actually used, capped like the constructor.
    pub fn main_slots(&self) -> usize {
        self.main_inventory_size.min(Self::MAX_MAIN_INVENTORY_SIZE)
    }
}

impl Default for HumanoidConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// World difficulty, read by the food cadence.
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
pub enum Difficulty {
    /// Food refills on its own and health regenerates.
    Peaceful,
    /// Starvation stops at half health.
    Easy,
    /// Starvation stops at one health point.
    #[default]
    Normal,
    /// Starvation can kill.
    Hard,
}

impl Difficulty {
    /// Returns the numeric level used by server settings (0-3).
    pub const fn level(self) -> u8 {
        match self {
            Self::Peaceful => 0,
            Self::Easy => 1,
            Self::Normal => 2,
            Self::Hard => 3,
        }
    }

    /// Parses a numeric difficulty level.
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Peaceful),
            1 => Some(Self::Easy),
            2 => Some(Self::Normal),
            3 => Some(Self::Hard),
            _ => None,
        }
    }

    /// Whether one point of starvation damage applies at the given health.
    pub fn allows_starvation(self, health: f32) -> bool {
        match self {
            Self::Peaceful => false,
            Self::Easy => health > 10.0,
            Self::Normal => health > 1.0,
            Self::Hard => true,
        }
    }
}
