//! Saved design presets.
//!
//! A preset is one saved build inside a user-data container: a category
//! tab, a timestamp, the design itself as a compressed ASMC blob, and a
//! thumbnail. On disk it is its own `begin`..`end` chunk tree.

use rubicon_design::{
    write_chunk, Asmc, ChunkList, ChunkRecord, DesignData, Thumbnail, BEGIN_SIGNATURE,
    END_SIGNATURE,
};

use crate::timestamp::PresetTimestamp;
use crate::{Error, Result};

/// Chunk signature of the category byte.
pub const CATEGORY_SIGNATURE: &str = "Category";

/// Chunk signature of the timestamp payload.
pub const DATE_TIME_SIGNATURE: &str = "DateTime";

/// Chunk signature of the compressed design blob.
pub const DESIGN_SIGNATURE: &str = "Design";

/// Chunk signature of the thumbnail record.
pub const THUMBNAIL_SIGNATURE: &str = "Thumbnail";

/// First valid category tab.
pub const CATEGORY_MIN: u8 = 1;

/// Last valid category tab.
pub const CATEGORY_MAX: u8 = 4;

/// One saved design preset.
///
/// The design stays in its compressed form so a decode/encode cycle
/// reproduces the container byte-for-byte; [`Preset::design`] inflates a
/// typed view on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    category: u8,
    timestamp: PresetTimestamp,
    design: Asmc,
    thumbnail: Thumbnail,
}

impl Preset {
    /// Create a preset from a typed design.
    ///
    /// Fails with [`Error::InvalidCategoryTab`] when the category is not
    /// in 1..=4.
    pub fn new(
        category: u8,
        timestamp: PresetTimestamp,
        design: &DesignData,
        thumbnail: Thumbnail,
    ) -> Result<Self> {
        check_category(category)?;
        Ok(Self {
            category,
            timestamp,
            design: design.to_asmc()?,
            thumbnail,
        })
    }

    /// The category tab (1..=4).
    pub fn category(&self) -> u8 {
        self.category
    }

    /// Change the category tab.
    pub fn set_category(&mut self, category: u8) -> Result<()> {
        check_category(category)?;
        self.category = category;
        Ok(())
    }

    /// The save timestamp.
    pub fn timestamp(&self) -> PresetTimestamp {
        self.timestamp
    }

    /// Change the save timestamp.
    pub fn set_timestamp(&mut self, timestamp: PresetTimestamp) {
        self.timestamp = timestamp;
    }

    /// The compressed design blob.
    pub fn design_blob(&self) -> &Asmc {
        &self.design
    }

    /// Inflate and parse the design.
    pub fn design(&self) -> Result<DesignData> {
        Ok(DesignData::from_bytes(&self.design.unwrap()?)?)
    }

    /// Replace the design, recompressing it.
    pub fn set_design(&mut self, design: &DesignData) -> Result<()> {
        self.design = design.to_asmc()?;
        Ok(())
    }

    /// The thumbnail.
    pub fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }

    /// Replace the thumbnail.
    pub fn set_thumbnail(&mut self, thumbnail: Thumbnail) {
        self.thumbnail = thumbnail;
    }

    /// Decode a preset from the head of `data`.
    ///
    /// Returns the preset and the exact byte span it consumed, so a
    /// container can walk its preset stream back to back; the chunks are
    /// self-describing and there is no separate index.
    pub fn decode(data: &[u8]) -> Result<(Self, usize)> {
        let chunks = ChunkList::parse(data)?;

        let require = |signature: &str| -> Result<&ChunkRecord> {
            chunks
                .get(signature)
                .ok_or_else(|| rubicon_design::Error::SignatureNotFound {
                    signature: signature.to_string(),
                    occurrence: 0,
                })
                .map_err(Error::from)
        };

        let category_payload = &require(CATEGORY_SIGNATURE)?.payload;
        let category = *category_payload.first().ok_or_else(|| {
            Error::from(rubicon_design::Error::InvalidRecord(
                "empty category payload".to_string(),
            ))
        })?;
        let timestamp = PresetTimestamp::from_bytes(&require(DATE_TIME_SIGNATURE)?.payload)?;
        let design = Asmc::from_bytes(&require(DESIGN_SIGNATURE)?.payload)?;
        let thumbnail = Thumbnail::from_bytes(&require(THUMBNAIL_SIGNATURE)?.payload)?;

        Ok((
            Self {
                category,
                timestamp,
                design,
                thumbnail,
            },
            chunks.consumed(),
        ))
    }

    /// Encode the preset as its chunk tree.
    ///
    /// Chunks are emitted in the fixed order `begin`, `Category`,
    /// `DateTime`, `Design`, `Thumbnail`, `end`, each length computed from
    /// its actual payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&write_chunk(BEGIN_SIGNATURE, 0, &[]));
        out.extend_from_slice(&write_chunk(CATEGORY_SIGNATURE, 0, &[self.category]));
        out.extend_from_slice(&write_chunk(
            DATE_TIME_SIGNATURE,
            0,
            &self.timestamp.to_bytes(),
        ));
        out.extend_from_slice(&write_chunk(DESIGN_SIGNATURE, 0, &self.design.to_bytes()));
        out.extend_from_slice(&write_chunk(
            THUMBNAIL_SIGNATURE,
            0,
            &self.thumbnail.to_bytes(),
        ));
        out.extend_from_slice(&write_chunk(END_SIGNATURE, 0, &[]));
        out
    }

    /// Exact encoded size in bytes.
    pub fn encoded_len(&self) -> usize {
        // begin + Category + DateTime + Design + Thumbnail + end headers,
        // plus each payload.
        6 * rubicon_design::CHUNK_HEADER_SIZE
            + 1
            + crate::timestamp::TIMESTAMP_SIZE
            + rubicon_design::ASMC_HEADER_SIZE
            + self.design.compressed_size()
            + rubicon_design::THUMBNAIL_HEADER_SIZE
            + self.thumbnail.pixel_data().len()
    }
}

fn check_category(category: u8) -> Result<()> {
    if !(CATEGORY_MIN..=CATEGORY_MAX).contains(&category) {
        return Err(Error::InvalidCategoryTab(category));
    }
    Ok(())
}
