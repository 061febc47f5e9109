//! Humanoid orchestrator.
//!
//! [`HumanoidState`] owns the experience, food and inventory state of one
//! humanoid entity and is the only entry point that mutates them. The body
//! (health, motion), the pre-commit hook and the broadcaster are external
//! collaborators handed in per call or at construction.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::attribute::{AttributeEntry, AttributeError, AttributeKind, AttributeSnapshot};
use crate::body::Body;
use crate::broadcast::{AddPlayer, Broadcaster, PlayerListEntry};
use crate::config::{Difficulty, HumanoidConfig};
use crate::error::LoadError;
use crate::experience::ExperienceState;
use crate::food::FoodState;
use crate::hook::{ExhaustCause, MutationHook};
use crate::identity::{EntityId, EntityUuid, ViewerId};
use crate::inventory::{
    EnderChest, InventoryRecord, InventorySnapshot, ItemStack, decode_ender_chest,
    decode_inventory, encode_ender_chest, encode_inventory,
};
use crate::record::{HumanoidRecord, SkinRecord};
use crate::rng::SeedSource;
use crate::skin::{Skin, SkinError};

/// Capability shared by entities driven by the simulation step.
pub trait SimEntity {
    type Record;
    type Error;

    fn entity_id(&self) -> EntityId;

    /// Advances one simulation step; returns whether anything observable changed.
    fn tick(&mut self, env: &mut TickEnv<'_>) -> Result<bool, Self::Error>;

    fn save(&self) -> Self::Record;
}

/// World inputs for one simulation step.
pub struct TickEnv<'a> {
    pub elapsed: u32,
    pub difficulty: Difficulty,
    pub body: &'a mut dyn Body,
}

/// Who drives a humanoid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Control {
    /// A connected player, which is also a viewer of the world.
    Player(ViewerId),
    /// A server-driven humanoid (NPC).
    Npc,
}

/// Simulation state of one humanoid entity.
pub struct HumanoidState {
    entity: EntityId,
    control: Control,
    name: String,
    skin: Skin,
    uuid: EntityUuid,
    config: HumanoidConfig,
    experience: ExperienceState,
    food: FoodState,
    inventory: InventorySnapshot,
    ender_chest: EnderChest,
    hook: Arc<dyn MutationHook>,
    spawned_to: HashSet<ViewerId>,
}

impl HumanoidState {
    /// Builds a humanoid from a persisted record, applying defaults for
    /// missing fields. A missing or malformed skin aborts construction.
    pub fn load(
        entity: EntityId,
        control: Control,
        record: &HumanoidRecord,
        config: HumanoidConfig,
        hook: Arc<dyn MutationHook>,
        seeds: &mut dyn SeedSource,
    ) -> Result<Self, LoadError> {
        let skin = match &record.skin {
            Some(SkinRecord { data, name }) => Skin::new(data.clone(), name.clone())?,
            None => return Err(SkinError::Missing.into()),
        };
        let name = record.name_tag.clone().unwrap_or_default();
        let uuid = EntityUuid::derive(entity, skin.data(), &name);

        let food = FoodState::restore(
            record.food_level.map_or(HumanoidConfig::MAX_FOOD, |v| v as f32),
            record
                .food_saturation_level
                .unwrap_or(AttributeKind::Saturation.bounds().2),
            record.food_exhaustion_level.unwrap_or(0.0),
            record.food_tick_timer.map_or(0, i64::from),
        );

        let seed = match record.xp_seed {
            Some(seed) => seed,
            None => {
                let seed = seeds.next_seed();
                debug!(target: "humanoid::load", %entity, seed, "generated experience seed");
                seed
            }
        };
        let experience = ExperienceState::restore(
            record.xp_level.map_or(0, i64::from),
            record.xp_progress.unwrap_or(0.0),
            record.xp_total.map_or(0, i64::from),
            seed,
        );

        let inventory = decode_inventory(
            &InventoryRecord {
                slots: record.inventory.clone().unwrap_or_default(),
                selected: record.selected_inventory_slot.unwrap_or(0),
            },
            config.main_slots(),
        );
        let ender_chest = decode_ender_chest(
            record.ender_chest_inventory.as_deref().unwrap_or_default(),
            config.ender_chest_size,
        );

        debug!(
            target: "humanoid::load",
            %entity,
            level = experience.level(),
            food = food.food(),
            "humanoid loaded"
        );

        Ok(Self {
            entity,
            control,
            name,
            skin,
            uuid,
            config,
            experience,
            food,
            inventory,
            ender_chest,
            hook,
            spawned_to: HashSet::new(),
        })
    }

    /// Decodes `bytes` with [`HumanoidRecord::from_bytes`] and loads it.
    #[cfg(feature = "serde")]
    pub fn load_bytes(
        entity: EntityId,
        control: Control,
        bytes: &[u8],
        config: HumanoidConfig,
        hook: Arc<dyn MutationHook>,
        seeds: &mut dyn SeedSource,
    ) -> Result<Self, LoadError> {
        let record = HumanoidRecord::from_bytes(bytes)?;
        Self::load(entity, control, &record, config, hook, seeds)
    }

    /// Flattens every field back into a record.
    pub fn save(&self) -> HumanoidRecord {
        let inventory = encode_inventory(&self.inventory);
        HumanoidRecord {
            name_tag: Some(self.name.clone()),
            food_level: Some(self.food.food() as i32),
            food_exhaustion_level: Some(self.food.exhaustion()),
            food_saturation_level: Some(self.food.saturation()),
            food_tick_timer: Some(self.food.tick_timer() as i32),
            xp_level: Some(self.experience.level() as i32),
            xp_total: Some(self.experience.total_xp() as i32),
            xp_progress: Some(self.experience.progress()),
            xp_seed: Some(self.experience.seed()),
            inventory: Some(inventory.slots),
            selected_inventory_slot: Some(inventory.selected),
            ender_chest_inventory: Some(encode_ender_chest(&self.ender_chest)),
            skin: (!self.skin.data().is_empty()).then(|| SkinRecord {
                data: self.skin.data().to_vec(),
                name: self.skin.id().to_owned(),
            }),
        }
    }

    /// Runs the food cadence for `elapsed` ticks.
    pub fn tick(
        &mut self,
        elapsed: u32,
        difficulty: Difficulty,
        body: &mut dyn Body,
    ) -> Result<bool, AttributeError> {
        let changes = self.food.tick(elapsed, difficulty, body, self.hook.as_ref())?;
        Ok(!changes.is_empty())
    }

    // ===== identity =====

    pub fn entity_id(&self) -> EntityId {
        self.entity
    }

    pub fn control(&self) -> Control {
        self.control
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name_tag(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn uuid(&self) -> EntityUuid {
        self.uuid
    }

    pub fn skin(&self) -> &Skin {
        &self.skin
    }

    /// Replaces the skin; invalid payloads are rejected and the old skin kept.
    pub fn set_skin(&mut self, data: Vec<u8>, id: impl Into<String>) -> Result<(), SkinError> {
        self.skin = Skin::new(data, id)?;
        Ok(())
    }

    pub fn config(&self) -> &HumanoidConfig {
        &self.config
    }

    // ===== food =====

    pub fn food(&self) -> &FoodState {
        &self.food
    }

    pub fn set_food(&mut self, value: f32) -> Result<(), AttributeError> {
        self.food.set_food(value)
    }

    pub fn add_food(&mut self, amount: f32) {
        self.food.add_food(amount);
    }

    pub fn set_saturation(&mut self, value: f32) -> Result<(), AttributeError> {
        self.food.set_saturation(value)
    }

    pub fn add_saturation(&mut self, amount: f32) {
        self.food.add_saturation(amount);
    }

    pub fn set_exhaustion(&mut self, value: f32) -> Result<(), AttributeError> {
        self.food.set_exhaustion(value)
    }

    /// Charges exhaustion; returns the amount charged, `0.0` when vetoed.
    pub fn exhaust(&mut self, amount: f32, cause: ExhaustCause) -> Result<f32, AttributeError> {
        self.food.exhaust(amount, cause, self.hook.as_ref())
    }

    /// Charges the exhaustion of a jump, heavier while sprinting.
    pub fn jump(&mut self, body: &dyn Body) -> Result<f32, AttributeError> {
        self.food.jump(body.is_sprinting(), self.hook.as_ref())
    }

    // ===== experience =====

    pub fn experience(&self) -> &ExperienceState {
        &self.experience
    }

    pub fn xp_level(&self) -> u32 {
        self.experience.level()
    }

    pub fn xp_progress(&self) -> f32 {
        self.experience.progress()
    }

    pub fn total_xp(&self) -> u32 {
        self.experience.total_xp()
    }

    pub fn xp_seed(&self) -> i32 {
        self.experience.seed()
    }

    pub fn set_total_xp(&mut self, xp: i64, sync_level: bool) -> Result<bool, AttributeError> {
        self.experience.set_total_xp(xp, sync_level, self.hook.as_ref())
    }

    pub fn add_xp(&mut self, xp: i64, sync_level: bool) -> Result<bool, AttributeError> {
        self.experience.add_xp(xp, sync_level, self.hook.as_ref())
    }

    pub fn take_xp(&mut self, xp: i64, sync_level: bool) -> Result<bool, AttributeError> {
        self.experience.take_xp(xp, sync_level, self.hook.as_ref())
    }

    pub fn set_xp_level(&mut self, level: i64) -> Result<bool, AttributeError> {
        self.experience.set_level(level, self.hook.as_ref())
    }

    pub fn add_xp_level(&mut self, levels: i64) -> Result<bool, AttributeError> {
        self.experience.add_level(levels, self.hook.as_ref())
    }

    pub fn take_xp_level(&mut self, levels: i64) -> Result<bool, AttributeError> {
        self.experience.take_level(levels, self.hook.as_ref())
    }

    pub fn set_xp_progress(&mut self, progress: f32) -> Result<(), AttributeError> {
        self.experience.set_progress(progress)
    }

    pub fn recalculate_xp_progress(&mut self) -> f32 {
        self.experience.recalculate_progress()
    }

    pub fn reset_xp_cooldown(&mut self, now: Instant) {
        self.experience.reset_pickup_cooldown(now);
    }

    pub fn can_pickup_xp(&self, now: Instant) -> bool {
        self.experience.can_pickup(now)
    }

    // ===== inventory =====

    pub fn inventory(&self) -> &InventorySnapshot {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut InventorySnapshot {
        &mut self.inventory
    }

    pub fn ender_chest(&self) -> &EnderChest {
        &self.ender_chest
    }

    pub fn ender_chest_mut(&mut self) -> &mut EnderChest {
        &mut self.ender_chest
    }

    pub fn held_item(&self) -> ItemStack {
        self.inventory.held_item()
    }

    /// Items dropped when the humanoid dies.
    pub fn drops(&self) -> Vec<ItemStack> {
        self.inventory.contents()
    }

    // ===== visibility =====

    /// Live attributes, health included, as sent to viewers.
    pub fn attribute_snapshot(&self, body: &dyn Body) -> AttributeSnapshot {
        let mut snapshot = AttributeSnapshot::new();
        snapshot.push(AttributeEntry {
            kind: AttributeKind::Health,
            min: 0.0,
            max: body.max_health(),
            value: body.health(),
            default: body.max_health(),
        });
        for attribute in self.food.attributes() {
            snapshot.push(attribute.entry());
        }
        snapshot.push(self.experience.level_attribute().entry());
        snapshot.push(self.experience.progress_attribute().entry());
        snapshot
    }

    /// Shows this humanoid to `viewer` once.
    ///
    /// Returns false when the viewer already saw it or is this humanoid.
    pub fn spawn_to(
        &mut self,
        viewer: ViewerId,
        body: &dyn Body,
        broadcaster: &mut dyn Broadcaster,
    ) -> bool {
        if self.control == Control::Player(viewer) || !self.spawned_to.insert(viewer) {
            return false;
        }

        let npc = self.control == Control::Npc;
        if npc {
            broadcaster.add_player_list(
                viewer,
                &PlayerListEntry {
                    uuid: self.uuid,
                    entity: self.entity,
                    name: self.name.clone(),
                    skin_id: self.skin.id().to_owned(),
                    skin_data: self.skin.data().to_vec(),
                },
            );
        }

        broadcaster.add_player(
            viewer,
            &AddPlayer {
                uuid: self.uuid,
                username: self.name.clone(),
                entity: self.entity,
                pose: body.pose(),
                held_item: self.held_item(),
                attributes: self.attribute_snapshot(body),
            },
        );
        broadcaster.armor_contents(viewer, self.entity, &self.inventory.armor);

        if npc {
            broadcaster.remove_player_list(viewer, self.uuid);
        }

        debug!(target: "humanoid::spawn", entity = %self.entity, viewer = viewer.0, "spawned to viewer");
        true
    }

    /// Forgets `viewer`, so the next [`spawn_to`](Self::spawn_to) broadcasts again.
    pub fn despawn_from(&mut self, viewer: ViewerId) -> bool {
        self.spawned_to.remove(&viewer)
    }

    pub fn has_spawned_to(&self, viewer: ViewerId) -> bool {
        self.spawned_to.contains(&viewer)
    }

    /// Forgets every viewer and returns the final record for persistence.
    pub fn close(&mut self) -> HumanoidRecord {
        self.spawned_to.clear();
        self.save()
    }
}

impl SimEntity for HumanoidState {
    type Record = HumanoidRecord;
    type Error = AttributeError;

    fn entity_id(&self) -> EntityId {
        self.entity
    }

    fn tick(&mut self, env: &mut TickEnv<'_>) -> Result<bool, Self::Error> {
        HumanoidState::tick(self, env.elapsed, env.difficulty, &mut *env.body)
    }

    fn save(&self) -> Self::Record {
        HumanoidState::save(self)
    }
}
