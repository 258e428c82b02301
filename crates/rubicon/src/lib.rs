//! Rubicon - Armored Core VI design and save-slot codec library.
//!
//! This crate provides a unified interface to the Rubicon library
//! ecosystem for working with AC6 design records and save user data.
//!
//! # Crates
//!
//! - [`rubicon_common`] - Common utilities (binary reading, low-level errors)
//! - [`rubicon_design`] - Design records (chunk trees, ASMC blobs, parts)
//! - [`rubicon_save`] - Save-slot user data (presets, containers, crypto)
//!
//! # Example
//!
//! ```no_run
//! use rubicon::prelude::*;
//!
//! // Decrypt and open a user-data container
//! let encrypted = std::fs::read("USER_DATA002")?;
//! let container = SaveContainer::decode(&crypto::decrypt(&encrypted)?)?;
//!
//! // Pull a design out and rename it
//! if let Some(preset) = container.preset(0) {
//!     let mut design = preset.design()?;
//!     design.ac_name = "STEEL HAZE".to_string();
//!     std::fs::write("steel_haze.design", design.to_asmc()?.to_bytes())?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use rubicon_common as common;
pub use rubicon_design as design;
pub use rubicon_save as save;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use rubicon_common::BinaryReader;
    pub use rubicon_design::{
        best_effort_unwrap, Asmc, Assembly, ChunkList, Coloring, DesignData, EquipCategory,
        EquipmentRef, RecoveryStrategy, SectionName, Thumbnail,
    };
    pub use rubicon_save::{crypto, Preset, PresetTimestamp, SaveContainer};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
