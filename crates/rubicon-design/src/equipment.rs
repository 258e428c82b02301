//! Equipment save-identifier codec.
//!
//! Save records address equipment with a single 32-bit word: the top nibble
//! selects the category and the low 28 bits carry the numeric equipment id.
//! An all-0xFF word marks an empty slot. The ids themselves are opaque to
//! this crate; labeling them is a catalog concern that lives elsewhere.

use crate::{Error, Result};

/// Mask for the numeric equipment id inside a save identifier.
pub const EQUIPMENT_ID_MASK: u32 = 0x0FFF_FFFF;

/// Encoded form of an empty equipment slot.
pub const EMPTY_SLOT_BYTES: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

/// Mask for the category tag in the top nibble.
const CATEGORY_MASK: u32 = 0xF000_0000;

/// Equipment category, encoded as a fixed offset in the save identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipCategory {
    /// Hand and shoulder weapons, core expansions.
    Weapon,
    /// Head, core, arms and legs frame parts.
    BodyPart,
    /// Generators.
    Generator,
    /// Boosters.
    Booster,
    /// Fire control systems.
    Fcs,
}

impl EquipCategory {
    /// Get all categories in offset order.
    pub const fn all() -> [EquipCategory; 5] {
        [
            EquipCategory::Weapon,
            EquipCategory::BodyPart,
            EquipCategory::Generator,
            EquipCategory::Booster,
            EquipCategory::Fcs,
        ]
    }

    /// The fixed save-identifier offset for this category.
    pub const fn offset(&self) -> u32 {
        match self {
            EquipCategory::Weapon => 0x0000_0000,
            EquipCategory::BodyPart => 0x1000_0000,
            EquipCategory::Generator => 0x5000_0000,
            EquipCategory::Booster => 0x6000_0000,
            EquipCategory::Fcs => 0x7000_0000,
        }
    }

    /// Map a save-identifier offset back to its category.
    pub const fn from_offset(offset: u32) -> Option<Self> {
        match offset {
            0x0000_0000 => Some(EquipCategory::Weapon),
            0x1000_0000 => Some(EquipCategory::BodyPart),
            0x5000_0000 => Some(EquipCategory::Generator),
            0x6000_0000 => Some(EquipCategory::Booster),
            0x7000_0000 => Some(EquipCategory::Fcs),
            _ => None,
        }
    }

    /// Get the name of this category.
    pub const fn name(&self) -> &'static str {
        match self {
            EquipCategory::Weapon => "weapon",
            EquipCategory::BodyPart => "body_part",
            EquipCategory::Generator => "generator",
            EquipCategory::Booster => "booster",
            EquipCategory::Fcs => "fcs",
        }
    }
}

impl std::fmt::Display for EquipCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A numeric equipment id with its category tag.
///
/// An empty slot is represented as `Option::<EquipmentRef>::None` at the
/// call sites; the encoded form of `None` is [`EMPTY_SLOT_BYTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentRef {
    /// The numeric equipment id (at most 28 bits).
    pub id: u32,
    /// The equipment category.
    pub category: EquipCategory,
}

impl EquipmentRef {
    /// Create a new reference.
    pub const fn new(id: u32, category: EquipCategory) -> Self {
        Self { id, category }
    }

    /// Decode a 4-byte save identifier.
    ///
    /// Returns `None` for the all-0xFF empty-slot sentinel and fails with
    /// [`Error::UnknownCategory`] when the top nibble maps to no category.
    pub fn decode(bytes: [u8; 4]) -> Result<Option<Self>> {
        if bytes == EMPTY_SLOT_BYTES {
            return Ok(None);
        }

        let save_id = u32::from_le_bytes(bytes);
        let offset = save_id & CATEGORY_MASK;
        let category = EquipCategory::from_offset(offset).ok_or(Error::UnknownCategory(offset))?;

        Ok(Some(Self {
            id: save_id & EQUIPMENT_ID_MASK,
            category,
        }))
    }

    /// Encode a slot back to its 4-byte save identifier.
    pub fn encode(slot: Option<Self>) -> [u8; 4] {
        match slot {
            None => EMPTY_SLOT_BYTES,
            Some(r) => ((r.id & EQUIPMENT_ID_MASK) | r.category.offset()).to_le_bytes(),
        }
    }
}

impl std::fmt::Display for EquipmentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_categories() {
        for category in EquipCategory::all() {
            for id in [0u32, 1, 299_300, EQUIPMENT_ID_MASK] {
                let slot = Some(EquipmentRef::new(id, category));
                let bytes = EquipmentRef::encode(slot);
                assert_eq!(EquipmentRef::decode(bytes).unwrap(), slot);
            }
        }
    }

    #[test]
    fn test_empty_slot_sentinel() {
        assert_eq!(EquipmentRef::encode(None), EMPTY_SLOT_BYTES);
        assert_eq!(EquipmentRef::decode(EMPTY_SLOT_BYTES).unwrap(), None);
    }

    #[test]
    fn test_known_offsets() {
        // A generator id packs into the 0x5 nibble.
        let bytes = EquipmentRef::encode(Some(EquipmentRef::new(
            0x123,
            EquipCategory::Generator,
        )));
        assert_eq!(u32::from_le_bytes(bytes), 0x5000_0123);
    }

    #[test]
    fn test_unknown_category_offset() {
        let bytes = 0x2000_0001u32.to_le_bytes();
        assert!(matches!(
            EquipmentRef::decode(bytes),
            Err(Error::UnknownCategory(0x2000_0000))
        ));
    }
}
