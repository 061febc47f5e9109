//! Conversion between [`InventorySnapshot`] and flat persisted slot lists.
//!
//! Persisted slot numbers use three bands:
//!
//! | persisted slot | meaning                                       |
//! |----------------|-----------------------------------------------|
//! | `0..9`         | hotbar button; `true_slot` points into main   |
//! | `100..104`     | armor slot `slot - 100`                       |
//! | anything else  | main slot `slot - 9`, when in range           |
//!
//! Decoding is best-effort: entries that fit no band are dropped.

use tracing::debug;

use super::{EnderChest, InventorySnapshot, ItemStack};
use crate::config::HumanoidConfig;

const HOTBAR_SLOTS: i32 = HumanoidConfig::HOTBAR_SIZE as i32;
const ARMOR_START: i32 = HumanoidConfig::ARMOR_SLOT_OFFSET;
const ARMOR_END: i32 = ARMOR_START + HumanoidConfig::ARMOR_SLOTS as i32;
/// `true_slot` value of an unbound hotbar button.
const UNBOUND: i32 = -1;

/// One persisted inventory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotRecord {
    #[cfg_attr(feature = "serde", serde(rename = "Slot"))]
    pub slot: i32,
    /// Present on hotbar entries only.
    #[cfg_attr(feature = "serde", serde(rename = "TrueSlot"))]
    pub true_slot: Option<i32>,
    pub id: i16,
    #[cfg_attr(feature = "serde", serde(rename = "Damage"))]
    pub damage: i16,
    #[cfg_attr(feature = "serde", serde(rename = "Count"))]
    pub count: u8,
}

impl SlotRecord {
    /// Entry carrying `item` at persisted `slot`.
    pub const fn item(slot: i32, item: ItemStack) -> Self {
        Self {
            slot,
            true_slot: None,
            id: item.id,
            damage: item.damage,
            count: item.count,
        }
    }

    /// Hotbar entry bound to main slot `true_slot`, mirroring its item.
    pub const fn hotbar(button: i32, item: ItemStack, true_slot: i32) -> Self {
        Self {
            true_slot: Some(true_slot),
            ..Self::item(button, item)
        }
    }

    /// Hotbar entry for an unbound button.
    pub const fn empty_hotbar(button: i32) -> Self {
        Self::hotbar(button, ItemStack::EMPTY, UNBOUND)
    }

    pub const fn stack(&self) -> ItemStack {
        ItemStack::new(self.id, self.damage, self.count).canonical()
    }
}

/// Flat persisted form of an [`InventorySnapshot`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InventoryRecord {
    pub slots: Vec<SlotRecord>,
    pub selected: i32,
}

/// Flattens `inventory` into persisted slot entries.
///
/// Always emits nine hotbar entries; main and armor entries are emitted for
/// non-empty items only.
pub fn encode_inventory(inventory: &InventorySnapshot) -> InventoryRecord {
    let mut slots = Vec::with_capacity(HumanoidConfig::HOTBAR_SIZE + inventory.main.len());

    for (button, binding) in (0..HOTBAR_SLOTS).zip(inventory.hotbar.iter()) {
        let bound = binding.and_then(|slot| {
            inventory
                .main
                .get(usize::from(slot))
                .filter(|item| !item.is_empty())
                .map(|item| (slot, *item))
        });
        slots.push(match bound {
            Some((slot, item)) => SlotRecord::hotbar(button, item, i32::from(slot)),
            None => SlotRecord::empty_hotbar(button),
        });
    }

    for (slot, item) in (HOTBAR_SLOTS..ARMOR_START).zip(inventory.main.iter()) {
        if !item.is_empty() {
            slots.push(SlotRecord::item(slot, *item));
        }
    }
    if inventory.main.len() > HumanoidConfig::MAX_MAIN_INVENTORY_SIZE {
        debug!(
            target: "humanoid::inventory",
            len = inventory.main.len(),
            "main slots past the armor band are not persisted"
        );
    }

    for (slot, item) in (ARMOR_START..).zip(inventory.armor.iter()) {
        if !item.is_empty() {
            slots.push(SlotRecord::item(slot, *item));
        }
    }

    InventoryRecord {
        slots,
        selected: i32::from(inventory.selected),
    }
}

/// Rebuilds an inventory with `main_size` main slots from persisted entries.
pub fn decode_inventory(record: &InventoryRecord, main_size: usize) -> InventorySnapshot {
    let mut inventory = InventorySnapshot::empty(main_size);
    let main_size = inventory.main.len();

    for entry in &record.slots {
        match entry.slot {
            slot @ 0..HOTBAR_SLOTS => {
                let binding = entry
                    .true_slot
                    .and_then(|target| u8::try_from(target).ok())
                    .filter(|&target| usize::from(target) < main_size);
                inventory.hotbar[slot as usize] = binding;
            }
            slot @ ARMOR_START..ARMOR_END => {
                inventory.armor[(slot - ARMOR_START) as usize] = entry.stack();
            }
            slot => match main_index(slot, main_size) {
                Some(index) => inventory.main[index] = entry.stack(),
                None => debug!(target: "humanoid::inventory", slot, "dropping out-of-range slot entry"),
            },
        }
    }

    // Unknown buttons fall back to the first one.
    if let Ok(button) = u8::try_from(record.selected) {
        inventory.select(button);
    }
    inventory
}

fn main_index(slot: i32, main_size: usize) -> Option<usize> {
    usize::try_from(slot - HOTBAR_SLOTS)
        .ok()
        .filter(|&index| index < main_size)
}

/// Flattens an ender chest; only non-empty slots are emitted.
pub fn encode_ender_chest(chest: &EnderChest) -> Vec<SlotRecord> {
    (0..)
        .zip(chest.slots.iter())
        .filter(|(_, item)| !item.is_empty())
        .map(|(slot, item)| SlotRecord::item(slot, *item))
        .collect()
}

/// Rebuilds an ender chest with `size` slots; out-of-range entries are dropped.
pub fn decode_ender_chest(records: &[SlotRecord], size: usize) -> EnderChest {
    let mut chest = EnderChest::empty(size);
    for entry in records {
        match usize::try_from(entry.slot).ok().filter(|&index| index < size) {
            Some(index) => chest.slots[index] = entry.stack(),
            None => debug!(target: "humanoid::inventory", slot = entry.slot, "dropping ender chest entry"),
        }
    }
    chest
}
