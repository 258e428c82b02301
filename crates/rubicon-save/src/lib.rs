//! Save-slot user data for Armored Core VI.
//!
//! The save archive stores designs in fixed-size, AES-encrypted user-data
//! files. Each decrypted file is a [`SaveContainer`]: an MD5-checked
//! region holding an ordered run of [`Preset`] records, each of which
//! wraps a compressed design tree, a thumbnail, a category tab and a
//! timestamp.
//!
//! The codec works entirely on in-memory byte buffers. Callers decrypt a
//! file with [`crypto::decrypt`], decode and mutate the container, then
//! re-encode and [`crypto::encrypt`] the result before writing it back in
//! one piece; nothing here touches the filesystem.
//!
//! # Example
//!
//! ```no_run
//! use rubicon_save::{crypto, SaveContainer};
//!
//! let encrypted = std::fs::read("USER_DATA002")?;
//! let container = SaveContainer::decode(&crypto::decrypt(&encrypted)?)?;
//!
//! for preset in container.presets() {
//!     let design = preset.design()?;
//!     println!("tab {}: {} // {}", preset.category(), design.ac_name, design.data_name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod container;
pub mod crypto;
mod error;
mod preset;
mod timestamp;

pub use container::{
    SaveContainer, CONTAINER_HEADER_SIZE, CONTAINER_INNER_SIZE, DIGEST_SIZE,
    MAX_PRESETS_PER_CATEGORY, MAX_PRESETS_PER_FILE,
};
pub use error::{Error, Result};
pub use preset::{
    Preset, CATEGORY_MAX, CATEGORY_MIN, CATEGORY_SIGNATURE, DATE_TIME_SIGNATURE, DESIGN_SIGNATURE,
    THUMBNAIL_SIGNATURE,
};
pub use timestamp::{PresetTimestamp, TIMESTAMP_SIZE};
