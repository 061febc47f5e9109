//! In-memory inventory layout of a humanoid.
//!
//! The player inventory has three disjoint bands: hotbar bindings (pointers
//! into main), main slots, and armor slots. The ender chest is a separate
//! flat list. Item storage mechanics (stacking, transactions) live with the
//! inventory container; this module only carries the layout.

mod codec;

pub use codec::{
    InventoryRecord, SlotRecord, decode_ender_chest, decode_inventory, encode_ender_chest,
    encode_inventory,
};

use crate::config::HumanoidConfig;

/// An item stack. Id zero or a zero count is empty.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub id: i16,
    pub damage: i16,
    pub count: u8,
}

impl ItemStack {
    /// Canonical empty stack.
    pub const EMPTY: Self = Self {
        id: 0,
        damage: 0,
        count: 0,
    };

    pub const fn new(id: i16, damage: i16, count: u8) -> Self {
        Self { id, damage, count }
    }

    pub const fn is_empty(&self) -> bool {
        self.id == 0 || self.count == 0
    }

    /// Returns the canonical form: every empty stack becomes [`ItemStack::EMPTY`].
    pub const fn canonical(self) -> Self {
        if self.is_empty() { Self::EMPTY } else { self }
    }
}

/// Hotbar, main and armor contents plus the selected hotbar button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventorySnapshot {
    /// Each button is unbound or points at a main slot.
    pub hotbar: [Option<u8>; HumanoidConfig::HOTBAR_SIZE],
    pub main: Vec<ItemStack>,
    pub armor: [ItemStack; HumanoidConfig::ARMOR_SLOTS],
    /// Index into `hotbar`.
    pub selected: u8,
}

impl InventorySnapshot {
    /// Empty inventory with `main_size` main slots and no bindings.
    ///
    /// `main_size` is capped at [`HumanoidConfig::MAX_MAIN_INVENTORY_SIZE`].
    pub fn empty(main_size: usize) -> Self {
        let main_size = main_size.min(HumanoidConfig::MAX_MAIN_INVENTORY_SIZE);
        Self {
            hotbar: [None; HumanoidConfig::HOTBAR_SIZE],
            main: vec![ItemStack::EMPTY; main_size],
            armor: [ItemStack::EMPTY; HumanoidConfig::ARMOR_SLOTS],
            selected: 0,
        }
    }

    /// Binds hotbar `button` to main slot `slot` (or unbinds with `None`).
    ///
    /// Returns false when either index is out of range.
    pub fn bind_hotbar(&mut self, button: usize, slot: Option<u8>) -> bool {
        let slot_ok = slot.is_none_or(|s| usize::from(s) < self.main.len());
        match self.hotbar.get_mut(button) {
            Some(binding) if slot_ok => {
                *binding = slot;
                true
            }
            _ => false,
        }
    }

    /// Selects hotbar `button`; out-of-range buttons are ignored.
    pub fn select(&mut self, button: u8) -> bool {
        if usize::from(button) < HumanoidConfig::HOTBAR_SIZE {
            self.selected = button;
            true
        } else {
            false
        }
    }

    /// Item under the selected hotbar button, empty when unbound.
    pub fn held_item(&self) -> ItemStack {
        self.hotbar
            .get(usize::from(self.selected))
            .copied()
            .flatten()
            .and_then(|slot| self.main.get(usize::from(slot)).copied())
            .unwrap_or(ItemStack::EMPTY)
    }

    /// Every non-empty main and armor item.
    pub fn contents(&self) -> Vec<ItemStack> {
        self.main
            .iter()
            .chain(self.armor.iter())
            .filter(|item| !item.is_empty())
            .copied()
            .collect()
    }

    /// Canonical form: empty stacks normalized, and bindings pointing at empty
    /// or missing main slots cleared (they would persist as unbound).
    pub fn canonical(&self) -> Self {
        let main: Vec<ItemStack> = self.main.iter().map(|item| item.canonical()).collect();
        let hotbar = self.hotbar.map(|binding| {
            binding.filter(|&slot| main.get(usize::from(slot)).is_some_and(|item| !item.is_empty()))
        });
        Self {
            hotbar,
            main,
            armor: self.armor.map(ItemStack::canonical),
            selected: self.selected,
        }
    }
}

/// Flat ender chest contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnderChest {
    pub slots: Vec<ItemStack>,
}

impl EnderChest {
    pub fn empty(size: usize) -> Self {
        Self {
            slots: vec![ItemStack::EMPTY; size],
        }
    }
}
