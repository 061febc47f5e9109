//! Persisted humanoid record.
//!
//! Every field is optional so that records written by older or foreign tools
//! load cleanly; defaults are applied once, in
//! [`HumanoidState::load`](crate::HumanoidState::load). Field names match the
//! persisted keys.

use crate::error::{ErrorSeverity, SubsystemError};
use crate::inventory::SlotRecord;

/// Errors raised while encoding or decoding a record.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SubsystemError for RecordError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "RECORD_SERIALIZATION",
        }
    }
}

/// Persisted skin payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkinRecord {
    #[cfg_attr(feature = "serde", serde(rename = "Data"))]
    pub data: Vec<u8>,
    #[cfg_attr(feature = "serde", serde(rename = "Name"))]
    pub name: String,
}

/// Flat persisted form of a humanoid's simulation state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HumanoidRecord {
    #[cfg_attr(feature = "serde", serde(rename = "NameTag"))]
    pub name_tag: Option<String>,

    #[cfg_attr(feature = "serde", serde(rename = "foodLevel"))]
    pub food_level: Option<i32>,
    #[cfg_attr(feature = "serde", serde(rename = "foodExhaustionLevel"))]
    pub food_exhaustion_level: Option<f32>,
    #[cfg_attr(feature = "serde", serde(rename = "foodSaturationLevel"))]
    pub food_saturation_level: Option<f32>,
    #[cfg_attr(feature = "serde", serde(rename = "foodTickTimer"))]
    pub food_tick_timer: Option<i32>,

    #[cfg_attr(feature = "serde", serde(rename = "XpLevel"))]
    pub xp_level: Option<i32>,
    #[cfg_attr(feature = "serde", serde(rename = "XpTotal"))]
    pub xp_total: Option<i32>,
    #[cfg_attr(feature = "serde", serde(rename = "XpP"))]
    pub xp_progress: Option<f32>,
    #[cfg_attr(feature = "serde", serde(rename = "XpSeed"))]
    pub xp_seed: Option<i32>,

    #[cfg_attr(feature = "serde", serde(rename = "Inventory"))]
    pub inventory: Option<Vec<SlotRecord>>,
    #[cfg_attr(feature = "serde", serde(rename = "SelectedInventorySlot"))]
    pub selected_inventory_slot: Option<i32>,
    #[cfg_attr(feature = "serde", serde(rename = "EnderChestInventory"))]
    pub ender_chest_inventory: Option<Vec<SlotRecord>>,

    #[cfg_attr(feature = "serde", serde(rename = "Skin"))]
    pub skin: Option<SkinRecord>,
}

#[cfg(feature = "serde")]
impl HumanoidRecord {
    /// Encodes the record with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RecordError> {
        bincode::serialize(self).map_err(|e| RecordError::Serialization(e.to_string()))
    }

    /// Decodes a record previously written by [`HumanoidRecord::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        bincode::deserialize(bytes).map_err(|e| RecordError::Serialization(e.to_string()))
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;
    use crate::inventory::ItemStack;

    #[test]
    fn bytes_round_trip() {
        let record = HumanoidRecord {
            name_tag: Some("Alex".into()),
            food_level: Some(17),
            food_saturation_level: Some(2.5),
            xp_seed: Some(-12345),
            inventory: Some(vec![
                SlotRecord::empty_hotbar(0),
                SlotRecord::item(9, ItemStack::new(3, 0, 10)),
            ]),
            skin: Some(SkinRecord {
                data: vec![1; 8192],
                name: "Standard_Custom".into(),
            }),
            ..HumanoidRecord::default()
        };

        let bytes = record.to_bytes().unwrap();
        assert_eq!(HumanoidRecord::from_bytes(&bytes).unwrap(), record);
    }

    #[test]
    fn truncated_bytes_fail() {
        let bytes = HumanoidRecord::default().to_bytes().unwrap();
        let err = HumanoidRecord::from_bytes(&bytes[..bytes.len() - 1]).unwrap_err();
        assert_eq!(err.error_code(), "RECORD_SERIALIZATION");
    }
}
