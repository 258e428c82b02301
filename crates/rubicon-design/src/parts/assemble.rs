//! Assembly records: the equipped parts of a design.
//!
//! The `Assemble` payload is 64 bytes: seven frame/internal part
//! identifiers, a 4-byte all-0xFF separator, then eight weapon words of
//! which three are not user slots (two fixed identifiers and one empty
//! word, at byte offsets 48, 52 and 56).

use rubicon_common::BinaryReader;

use crate::equipment::EquipmentRef;
use crate::{Error, Result};

/// Encoded size of an assembly record in bytes.
pub const ASSEMBLE_SIZE: usize = 64;

/// Fixed weapon identifier always written at byte offset 48.
///
/// Present in every observed save; whether it is a real in-game pairing
/// or a placeholder is unknown, so it is emitted verbatim and skipped on
/// decode.
pub const FIXED_WEAPON_SLOT_5: u32 = 299_300;

/// Fixed weapon identifier always written at byte offset 52.
///
/// See [`FIXED_WEAPON_SLOT_5`].
pub const FIXED_WEAPON_SLOT_6: u32 = 299_100;

/// The equipped parts of a design.
///
/// Slots hold `None` when empty; frame parts are normally always present
/// in game-produced data but the codec does not require them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assembly {
    pub head: Option<EquipmentRef>,
    pub core: Option<EquipmentRef>,
    pub arms: Option<EquipmentRef>,
    pub legs: Option<EquipmentRef>,
    pub booster: Option<EquipmentRef>,
    pub generator: Option<EquipmentRef>,
    pub fcs: Option<EquipmentRef>,
    pub left_hand: Option<EquipmentRef>,
    pub right_hand: Option<EquipmentRef>,
    pub left_back: Option<EquipmentRef>,
    pub right_back: Option<EquipmentRef>,
    pub core_expansion: Option<EquipmentRef>,
}

impl Assembly {
    /// Decode an assembly record.
    ///
    /// Fails with [`Error::InvalidRecord`] when the separator between the
    /// part and weapon blocks is not all-0xFF.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);

        let read_slot = |reader: &mut BinaryReader<'_>| -> Result<Option<EquipmentRef>> {
            let bytes: [u8; 4] = reader.read_bytes(4)?.try_into().unwrap();
            EquipmentRef::decode(bytes)
        };

        let head = read_slot(&mut reader)?;
        let core = read_slot(&mut reader)?;
        let arms = read_slot(&mut reader)?;
        let legs = read_slot(&mut reader)?;
        let booster = read_slot(&mut reader)?;
        let generator = read_slot(&mut reader)?;
        let fcs = read_slot(&mut reader)?;

        let separator = reader.read_bytes(4)?;
        if separator != [0xFF; 4] {
            return Err(Error::InvalidRecord(format!(
                "assembly separator must be all-0xFF, got {separator:02X?}"
            )));
        }

        let left_hand = read_slot(&mut reader)?;
        let right_hand = read_slot(&mut reader)?;
        let left_back = read_slot(&mut reader)?;
        let right_back = read_slot(&mut reader)?;
        // Byte offsets 48, 52 and 56 are not user slots.
        reader.advance(12);
        let core_expansion = read_slot(&mut reader)?;

        Ok(Self {
            head,
            core,
            arms,
            legs,
            booster,
            generator,
            fcs,
            left_hand,
            right_hand,
            left_back,
            right_back,
            core_expansion,
        })
    }

    /// Encode the record to its 64-byte form.
    pub fn encode(&self) -> Vec<u8> {
        use crate::equipment::EquipCategory;

        let mut out = Vec::with_capacity(ASSEMBLE_SIZE);
        for slot in [
            self.head,
            self.core,
            self.arms,
            self.legs,
            self.booster,
            self.generator,
            self.fcs,
        ] {
            out.extend_from_slice(&EquipmentRef::encode(slot));
        }

        out.extend_from_slice(&[0xFF; 4]);

        for slot in [
            self.left_hand,
            self.right_hand,
            self.left_back,
            self.right_back,
            Some(EquipmentRef::new(FIXED_WEAPON_SLOT_5, EquipCategory::Weapon)),
            Some(EquipmentRef::new(FIXED_WEAPON_SLOT_6, EquipCategory::Weapon)),
            None,
            self.core_expansion,
        ] {
            out.extend_from_slice(&EquipmentRef::encode(slot));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equipment::EquipCategory;

    fn sample() -> Assembly {
        Assembly {
            head: Some(EquipmentRef::new(1010, EquipCategory::BodyPart)),
            core: Some(EquipmentRef::new(2020, EquipCategory::BodyPart)),
            arms: Some(EquipmentRef::new(3030, EquipCategory::BodyPart)),
            legs: Some(EquipmentRef::new(4040, EquipCategory::BodyPart)),
            booster: Some(EquipmentRef::new(100, EquipCategory::Booster)),
            generator: Some(EquipmentRef::new(200, EquipCategory::Generator)),
            fcs: Some(EquipmentRef::new(300, EquipCategory::Fcs)),
            left_hand: Some(EquipmentRef::new(4000, EquipCategory::Weapon)),
            right_hand: Some(EquipmentRef::new(4001, EquipCategory::Weapon)),
            left_back: None,
            right_back: Some(EquipmentRef::new(4003, EquipCategory::Weapon)),
            core_expansion: None,
        }
    }

    #[test]
    fn test_roundtrip() {
        let assembly = sample();
        let bytes = assembly.encode();
        assert_eq!(bytes.len(), ASSEMBLE_SIZE);
        assert_eq!(Assembly::decode(&bytes).unwrap(), assembly);
    }

    #[test]
    fn test_fixed_slots_and_separator() {
        let bytes = sample().encode();

        assert_eq!(&bytes[28..32], &[0xFF; 4]);
        assert_eq!(
            u32::from_le_bytes(bytes[48..52].try_into().unwrap()),
            FIXED_WEAPON_SLOT_5
        );
        assert_eq!(
            u32::from_le_bytes(bytes[52..56].try_into().unwrap()),
            FIXED_WEAPON_SLOT_6
        );
        assert_eq!(&bytes[56..60], &[0xFF; 4]);
    }

    #[test]
    fn test_bad_separator_rejected() {
        let mut bytes = sample().encode();
        bytes[30] = 0x00;
        assert!(matches!(
            Assembly::decode(&bytes),
            Err(Error::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_fixed_slots_ignored_on_decode() {
        let mut bytes = sample().encode();
        // Whatever sits in the three skipped words must not affect decode.
        bytes[48..60].copy_from_slice(&[0xA5; 12]);
        assert_eq!(Assembly::decode(&bytes).unwrap(), sample());
    }
}
