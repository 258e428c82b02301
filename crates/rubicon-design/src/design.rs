//! Typed view over a design chunk tree.
//!
//! A design tree carries, in order: the identity strings (`UgcID`,
//! `DataName`, `AcName`), the `Assemble` and `Coloring` sub-records, and a
//! tail of image-related chunks (`UserImage`, `Decal`, `Marking`).
//! [`DesignData`] parses the typed front half and preserves the tail
//! verbatim so decals and user images survive an edit untouched.

use crate::asmc::{Asmc, ASMC_MAGIC};
use crate::chunk::{
    decode_utf16, encode_utf16, write_chunk, ChunkList, ChunkRecord, BEGIN_SIGNATURE,
    END_SIGNATURE,
};
use crate::parts::{Assembly, Coloring};
use crate::{Error, Result};

/// Chunk signature of the user-generated-content id string.
pub const UGC_ID_SIGNATURE: &str = "UgcID";

/// Chunk signature of the design name string.
pub const DATA_NAME_SIGNATURE: &str = "DataName";

/// Chunk signature of the AC name string.
pub const AC_NAME_SIGNATURE: &str = "AcName";

/// Chunk signature of the assembly record.
pub const ASSEMBLE_SIGNATURE: &str = "Assemble";

/// Chunk signature of the coloring record.
pub const COLORING_SIGNATURE: &str = "Coloring";

/// Chunk version of the `Assemble` and `Coloring` records.
const PART_CHUNK_VERSION: u32 = 3;

/// A parsed design record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignData {
    /// User-generated-content id, as shown in the share browser.
    pub ugc_id: String,
    /// The design (data) name.
    pub data_name: String,
    /// The AC name.
    pub ac_name: String,
    /// The equipped parts.
    pub assembly: Assembly,
    /// The coloring sections.
    pub coloring: Coloring,
    /// Chunks after the typed front half, preserved verbatim in order
    /// (`UserImage`, `Decal`, `Marking` and anything unknown).
    trailing: Vec<ChunkRecord>,
}

impl DesignData {
    /// Create a blank design with the default trailing chunks the game
    /// accepts for a design without user images or decals.
    pub fn new() -> Self {
        Self {
            ugc_id: "99999999".to_string(),
            data_name: "DATA_NAME".to_string(),
            ac_name: "AC_NAME".to_string(),
            assembly: Assembly::default(),
            coloring: Coloring::default(),
            trailing: default_trailing(),
        }
    }

    /// Parse a design from raw bytes.
    ///
    /// Accepts either an ASMC blob or a bare chunk tree; anything else is
    /// rejected.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let tree;
        let chunk_bytes = if data.starts_with(ASMC_MAGIC) {
            tree = Asmc::from_bytes(data)?.unwrap()?;
            &tree[..]
        } else if data.starts_with(BEGIN_SIGNATURE.as_bytes()) {
            data
        } else {
            return Err(Error::InvalidRecord(
                "design data is neither an ASMC blob nor a chunk tree".to_string(),
            ));
        };

        Self::from_chunks(&ChunkList::parse(chunk_bytes)?)
    }

    /// Build the typed view from a parsed chunk list.
    pub fn from_chunks(chunks: &ChunkList) -> Result<Self> {
        let require = |signature: &str| -> Result<&ChunkRecord> {
            chunks.get(signature).ok_or_else(|| Error::SignatureNotFound {
                signature: signature.to_string(),
                occurrence: 0,
            })
        };

        let ugc_id = decode_utf16(&require(UGC_ID_SIGNATURE)?.payload)?;
        let data_name = decode_utf16(&require(DATA_NAME_SIGNATURE)?.payload)?;
        let ac_name = decode_utf16(&require(AC_NAME_SIGNATURE)?.payload)?;
        let assembly = Assembly::decode(&require(ASSEMBLE_SIGNATURE)?.payload)?;
        let coloring = Coloring::decode(&require(COLORING_SIGNATURE)?.payload)?;

        let typed = [
            UGC_ID_SIGNATURE,
            DATA_NAME_SIGNATURE,
            AC_NAME_SIGNATURE,
            ASSEMBLE_SIGNATURE,
            COLORING_SIGNATURE,
        ];
        let trailing = chunks
            .records()
            .iter()
            .filter(|r| !typed.contains(&r.signature.as_str()))
            .cloned()
            .collect();

        Ok(Self {
            ugc_id,
            data_name,
            ac_name,
            assembly,
            coloring,
            trailing,
        })
    }

    /// Encode the design back to a chunk tree.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&write_chunk(BEGIN_SIGNATURE, 0, &[]));
        out.extend_from_slice(&write_chunk(UGC_ID_SIGNATURE, 0, &encode_utf16(&self.ugc_id)));
        out.extend_from_slice(&write_chunk(
            DATA_NAME_SIGNATURE,
            0,
            &encode_utf16(&self.data_name),
        ));
        out.extend_from_slice(&write_chunk(
            AC_NAME_SIGNATURE,
            0,
            &encode_utf16(&self.ac_name),
        ));
        out.extend_from_slice(&write_chunk(
            ASSEMBLE_SIGNATURE,
            PART_CHUNK_VERSION,
            &self.assembly.encode(),
        ));
        out.extend_from_slice(&write_chunk(
            COLORING_SIGNATURE,
            PART_CHUNK_VERSION,
            &self.coloring.encode(),
        ));
        for record in &self.trailing {
            out.extend_from_slice(&record.to_bytes());
        }
        out.extend_from_slice(&write_chunk(END_SIGNATURE, 0, &[]));
        out
    }

    /// Compress the design into an ASMC blob.
    pub fn to_asmc(&self) -> Result<Asmc> {
        Asmc::wrap(&self.to_bytes())
    }

    /// The preserved trailing chunks.
    pub fn trailing(&self) -> &[ChunkRecord] {
        &self.trailing
    }

    /// Replace the trailing chunks (user image, decals, markings).
    pub fn set_trailing(&mut self, trailing: Vec<ChunkRecord>) {
        self.trailing = trailing;
    }
}

impl Default for DesignData {
    fn default() -> Self {
        Self::new()
    }
}

/// The trailing chunks of a design without user images or decals: an empty
/// `UserImage`, five zeroed single-record `Decal` slots, and a zeroed
/// 17-slot `Marking` table.
fn default_trailing() -> Vec<ChunkRecord> {
    let user_image = ChunkRecord::new("UserImage", 0, vec![0u8; 4]);

    let mut decal_payload = Vec::new();
    for _ in 0..5 {
        decal_payload.extend_from_slice(&1u32.to_le_bytes());
        decal_payload.extend_from_slice(&[0u8; 64]);
    }
    let decal = ChunkRecord::new("Decal", 1, decal_payload);

    let marking = ChunkRecord::new("Marking", 2, vec![0u8; 17 * 4 + 17]);

    vec![user_image, decal, marking]
}
