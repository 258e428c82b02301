//! Design sub-record payloads.
//!
//! These are the densely packed payloads carried by the `Assemble` and
//! `Coloring` chunks of a design tree:
//!
//! - [`Assembly`]: the equipped frame parts, internals and weapon slots
//! - [`Coloring`]: per-section color slots, materials, patterns and
//!   weathering

mod assemble;
mod coloring;

pub use assemble::{
    Assembly, ASSEMBLE_SIZE, FIXED_WEAPON_SLOT_5, FIXED_WEAPON_SLOT_6,
};
pub use coloring::{
    ColorSlot, Coloring, ColoringSection, Rgba, SectionName, COLORING_SIZE, COLOR_SLOT_COUNT,
    DEVICE_MATERIAL_MAX, DEVICE_MATERIAL_MIN, MATERIAL_COUNT, PATTERN_COLOR_COUNT, SECTION_COUNT,
    SECTION_SIZE,
};
