//! Design record codec for Armored Core VI.
//!
//! Design records describe a saved AC build: names, the assembled parts,
//! coloring, and image data. This crate can read, modify, and write them
//! in both of their on-disk shapes.
//!
//! # File Format
//!
//! A design is a flat chunk stream between `---- begin ----` and
//! `----  end  ----` sentinels. Each chunk is a 32-byte header (16-byte
//! NUL-padded ASCII signature, u32 length, u32 version, 8 reserved zero
//! bytes) followed by its payload. Standalone `.design` files and the
//! `Design` chunk embedded in a save preset wrap the tree in an ASMC
//! container: a 16-byte header plus a zlib stream.
//!
//! # Data Structure
//!
//! The typed front half of a design tree contains:
//! - `UgcID`, `DataName`, `AcName`: UTF-16LE strings
//! - `Assemble`: equipped frame parts, internals and weapons
//! - `Coloring`: per-section colors, materials, patterns, weathering
//!
//! Everything after that (`UserImage`, `Decal`, `Marking`) is preserved
//! byte-for-byte across a decode/encode cycle.
//!
//! # Example
//!
//! ```no_run
//! use rubicon_design::{DesignData, EquipCategory, EquipmentRef};
//!
//! let bytes = std::fs::read("my_build.design")?;
//! let mut design = DesignData::from_bytes(&bytes)?;
//! println!("{} // {}", design.ac_name, design.data_name);
//!
//! design.assembly.right_hand = Some(EquipmentRef::new(4600, EquipCategory::Weapon));
//! std::fs::write("my_build.design", design.to_asmc()?.to_bytes())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod asmc;
mod chunk;
mod design;
mod equipment;
mod error;
pub mod parts;
mod thumbnail;

pub use asmc::{
    best_effort_unwrap, Asmc, Recovered, RecoveryStrategy, ASMC_FORMAT_TAG, ASMC_HEADER_SIZE,
    ASMC_MAGIC,
};
pub use chunk::{
    decode_utf16, encode_utf16, write_chunk, ChunkHeader, ChunkList, ChunkRecord,
    BEGIN_SIGNATURE, CHUNK_HEADER_SIZE, END_SIGNATURE, SIGNATURE_SIZE,
};
pub use design::{
    DesignData, AC_NAME_SIGNATURE, ASSEMBLE_SIGNATURE, COLORING_SIGNATURE, DATA_NAME_SIGNATURE,
    UGC_ID_SIGNATURE,
};
pub use equipment::{EquipCategory, EquipmentRef, EMPTY_SLOT_BYTES, EQUIPMENT_ID_MASK};
pub use error::{Error, Result};
pub use thumbnail::{
    Thumbnail, THUMBNAIL_DATA_SIZE, THUMBNAIL_FORMAT_TAG, THUMBNAIL_HEADER_SIZE, THUMBNAIL_HEIGHT,
    THUMBNAIL_WIDTH,
};

// Re-export commonly used part types at the crate root
pub use parts::{Assembly, ColorSlot, Coloring, ColoringSection, Rgba, SectionName};
