//! Simulation state of humanoid entities.
//!
//! `humanoid-core` owns the experience curve, the hunger/saturation/exhaustion
//! economy and the inventory slot codec of a humanoid, and exposes them
//! through [`HumanoidState`]. Physical simulation, the event bus and the
//! protocol layer are collaborators reached through the [`Body`],
//! [`MutationHook`] and [`Broadcaster`] traits.
pub mod attribute;
pub mod body;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod experience;
pub mod food;
pub mod hook;
pub mod humanoid;
pub mod identity;
pub mod inventory;
pub mod record;
pub mod rng;
pub mod skin;

pub use attribute::{Attribute, AttributeEntry, AttributeError, AttributeKind, AttributeSnapshot};
pub use body::{Body, DamageCause, MemoryBody, Pose, RegainCause, Vec3};
pub use broadcast::{AddPlayer, Broadcaster, PlayerListEntry, RecordingBroadcaster, Sent};
pub use config::{Difficulty, HumanoidConfig};
pub use error::{ErrorSeverity, LoadError, SubsystemError};
pub use experience::{ExperienceState, cumulative_cost, invert, level_cost};
pub use food::{FoodChanges, FoodState};
pub use hook::{AcceptAll, ExhaustCause, ExperienceChange, MutationHook, Verdict};
pub use humanoid::{Control, HumanoidState, SimEntity, TickEnv};
pub use identity::{EntityId, EntityUuid, ViewerId};
pub use inventory::{
    EnderChest, InventoryRecord, InventorySnapshot, ItemStack, SlotRecord, decode_ender_chest,
    decode_inventory, encode_ender_chest, encode_inventory,
};
pub use record::{HumanoidRecord, RecordError, SkinRecord};
pub use rng::{FixedSeed, PcgSeedSource, SeedSource};
pub use skin::{Skin, SkinError};
