//! Coloring records: per-section colors, materials, patterns, weathering.
//!
//! The `Coloring` payload holds 14 sections of 68 bytes each. Five of them
//! (on-disk indices 6, 7, 9, 10 and 11) are padding that mirrors the
//! preceding real section and are skipped on decode, leaving nine named
//! sections.

use rubicon_common::BinaryReader;

use crate::{Error, Result};

/// Encoded size of one coloring section in bytes.
pub const SECTION_SIZE: usize = 68;

/// Number of sections stored on disk, padding included.
const DISK_SECTION_COUNT: usize = 14;

/// Number of meaningful named sections.
pub const SECTION_COUNT: usize = 9;

/// Encoded size of a full coloring record in bytes.
pub const COLORING_SIZE: usize = DISK_SECTION_COUNT * SECTION_SIZE;

/// Number of color slots per section.
pub const COLOR_SLOT_COUNT: usize = 6;

/// Number of pattern colors per section.
pub const PATTERN_COLOR_COUNT: usize = 4;

/// Number of regular material indices (0..MATERIAL_COUNT).
///
/// The sixth, device-only slot draws from its own range instead; see
/// [`DEVICE_MATERIAL_MIN`].
pub const MATERIAL_COUNT: i16 = 36;

/// First material index of the device-only slot's range.
pub const DEVICE_MATERIAL_MIN: i16 = 90;

/// Last material index of the device-only slot's range.
pub const DEVICE_MATERIAL_MAX: i16 = 99;

/// On-disk indices of the duplicated padding sections.
const PADDING_INDICES: [usize; 5] = [6, 7, 9, 10, 11];

/// An RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque white.
    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Read 4 bytes of RGBA.
    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let bytes = reader.read_bytes(4)?;
        Ok(Self::new(bytes[0], bytes[1], bytes[2], bytes[3]))
    }

    /// Convert to byte representation.
    pub const fn to_bytes(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::white()
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

/// The nine meaningful coloring sections, in stream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SectionName {
    Head = 0,
    Core = 1,
    RightArm = 2,
    LeftArm = 3,
    Legs = 4,
    RightWeapon = 5,
    LeftWeapon = 6,
    RightBack = 7,
    LeftBack = 8,
}

impl SectionName {
    /// Get all section names in stream order.
    pub const fn all() -> [SectionName; SECTION_COUNT] {
        [
            SectionName::Head,
            SectionName::Core,
            SectionName::RightArm,
            SectionName::LeftArm,
            SectionName::Legs,
            SectionName::RightWeapon,
            SectionName::LeftWeapon,
            SectionName::RightBack,
            SectionName::LeftBack,
        ]
    }

    /// Get the display label of this section.
    pub const fn name(&self) -> &'static str {
        match self {
            SectionName::Head => "Head",
            SectionName::Core => "Core",
            SectionName::RightArm => "R arm",
            SectionName::LeftArm => "L arm",
            SectionName::Legs => "Legs",
            SectionName::RightWeapon => "R wep",
            SectionName::LeftWeapon => "L wep",
            SectionName::RightBack => "R back",
            SectionName::LeftBack => "L back",
        }
    }
}

impl std::fmt::Display for SectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One color slot: a color, a material index, and a print-pattern flag.
///
/// The sixth slot of each section is device-only: its pattern flag is
/// never encoded and its material index lives in the 90..=99 range rather
/// than 0..=35. Material indices are opaque here and not validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColorSlot {
    pub color: Rgba,
    pub material: i16,
    pub pattern: bool,
}

/// A single coloring section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColoringSection {
    /// The six color slots; the last one is the device slot.
    pub slots: [ColorSlot; COLOR_SLOT_COUNT],
    /// Weathering level.
    pub weathering: i16,
    /// Pattern design number.
    pub pattern_number: u8,
    /// Pattern size (0 small, 1 medium, 2 large).
    pub pattern_size: u8,
    /// The four pattern colors.
    pub pattern_colors: [Rgba; PATTERN_COLOR_COUNT],
}

impl ColoringSection {
    /// Decode one section.
    ///
    /// Accepts 64 bytes or more: only 66 bytes are meaningful and sections
    /// whose zero tail was trimmed are zero-extended before the pattern
    /// bitmask is read.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 64 {
            return Err(Error::InvalidRecord(format!(
                "coloring section must be at least 64 bytes, got {}",
                data.len()
            )));
        }

        let mut reader = BinaryReader::new(data);
        reader.advance(4); // leading FF 00 00 00
        let weathering = reader.read_i16()?;
        reader.advance(2);

        let mut slots = [ColorSlot::default(); COLOR_SLOT_COUNT];
        for slot in slots.iter_mut() {
            slot.color = Rgba::read(&mut reader)?;
        }
        for slot in slots.iter_mut() {
            slot.material = reader.read_i16()?;
        }

        let pattern_number = reader.read_u8()?;
        let pattern_size = reader.read_u8()?;
        reader.advance(2);

        let mut pattern_colors = [Rgba::default(); PATTERN_COLOR_COUNT];
        for color in pattern_colors.iter_mut() {
            *color = Rgba::read(&mut reader)?;
        }

        let mask = if data.len() >= 66 {
            u16::from_le_bytes([data[64], data[65]])
        } else {
            0
        };
        for (i, slot) in slots[..5].iter_mut().rev().enumerate() {
            slot.pattern = mask & (1 << (i + 2)) == 0;
        }

        Ok(Self {
            slots,
            weathering,
            pattern_number,
            pattern_size,
            pattern_colors,
        })
    }

    /// Encode one section to its 68-byte form.
    ///
    /// The pattern bitmask defaults to all flags disabled (bits set) and
    /// clears one bit per enabled slot, inverting the decode relationship
    /// exactly.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SECTION_SIZE);
        out.extend_from_slice(&[0xFF, 0x00, 0x00, 0x00]);
        out.extend_from_slice(&self.weathering.to_le_bytes());
        out.extend_from_slice(&[0x00, 0x00]);

        for slot in &self.slots {
            out.extend_from_slice(&slot.color.to_bytes());
        }
        for slot in &self.slots {
            out.extend_from_slice(&slot.material.to_le_bytes());
        }

        out.push(self.pattern_number);
        out.push(self.pattern_size);
        out.extend_from_slice(&[0x00, 0x00]);

        for color in &self.pattern_colors {
            out.extend_from_slice(&color.to_bytes());
        }

        let mut mask: u16 = 0b0011_1111;
        for (i, slot) in self.slots[..5].iter().rev().enumerate() {
            if slot.pattern {
                mask &= !(1 << (i + 2));
            }
        }
        out.extend_from_slice(&mask.to_le_bytes());
        out.extend_from_slice(&[0x00, 0x00]);

        out
    }
}

/// A full coloring record: the nine meaningful sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coloring {
    sections: [ColoringSection; SECTION_COUNT],
}

impl Coloring {
    /// Decode a coloring record, skipping the duplicated padding sections.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut sections: [ColoringSection; SECTION_COUNT] = Default::default();
        let mut meaningful = 0;

        for disk_index in 0..DISK_SECTION_COUNT {
            let start = disk_index * SECTION_SIZE;
            let end = (start + SECTION_SIZE).min(data.len());
            if PADDING_INDICES.contains(&disk_index) {
                continue;
            }
            if start >= data.len() {
                return Err(Error::InvalidRecord(format!(
                    "coloring record truncated at section {disk_index}"
                )));
            }
            sections[meaningful] = ColoringSection::decode(&data[start..end])?;
            meaningful += 1;
        }

        Ok(Self { sections })
    }

    /// Encode the record to its 14-section on-disk form.
    ///
    /// Padding sections mirror the preceding real section: the right
    /// weapon is repeated twice and the left weapon three times, matching
    /// the positions skipped on decode.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(COLORING_SIZE);
        for (i, section) in self.sections.iter().enumerate() {
            let bytes = section.encode();
            out.extend_from_slice(&bytes);
            let copies = match i {
                5 => 2, // right weapon pads on-disk indices 6 and 7
                6 => 3, // left weapon pads on-disk indices 9, 10 and 11
                _ => 0,
            };
            for _ in 0..copies {
                out.extend_from_slice(&bytes);
            }
        }
        out
    }

    /// Get a section by name.
    pub fn section(&self, name: SectionName) -> &ColoringSection {
        &self.sections[name as usize]
    }

    /// Get mutable access to a section.
    pub fn section_mut(&mut self, name: SectionName) -> &mut ColoringSection {
        &mut self.sections[name as usize]
    }

    /// All meaningful sections in stream order.
    pub fn sections(&self) -> &[ColoringSection; SECTION_COUNT] {
        &self.sections
    }
}
