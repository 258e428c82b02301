//! User-data containers.
//!
//! A container mirrors one decrypted user-data file from the save archive:
//! a declared inner size, a 16-byte header carrying the preset count, the
//! preset stream, zero padding out to the fixed inner size, an MD5 digest
//! over everything between header start and digest, and 0x0C filler
//! rounding the whole buffer up to the cipher block size.

use md5::{Digest, Md5};

use rubicon_common::BinaryReader;

use crate::preset::Preset;
use crate::{Error, Result};

/// Fixed declared inner size of every valid container (header, presets,
/// padding and digest).
pub const CONTAINER_INNER_SIZE: usize = 4_194_320;

/// Size of the container header in bytes.
pub const CONTAINER_HEADER_SIZE: usize = 16;

/// Size of the MD5 digest in bytes.
pub const DIGEST_SIZE: usize = 16;

/// Filler byte used to round the encoded buffer up to the cipher block.
const TRAILER_PAD_BYTE: u8 = 0x0C;

/// Maximum presets one container file holds before the game rolls over to
/// the next user-data file. Policy enforced by callers, not the codec.
pub const MAX_PRESETS_PER_FILE: usize = 32;

/// Maximum presets per category tab across a save. Policy enforced by
/// callers, not the codec.
pub const MAX_PRESETS_PER_CATEGORY: usize = 40;

/// Byte capacity available to the preset stream.
const PRESET_CAPACITY: usize = CONTAINER_INNER_SIZE - CONTAINER_HEADER_SIZE - DIGEST_SIZE;

/// A decrypted user-data container holding an ordered run of presets.
///
/// Preset order is insertion order and survives decode/mutate/encode
/// cycles: appends go to the end, removals keep the rest stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveContainer {
    /// The first two header words, preserved across a round-trip.
    reserved: [u32; 2],
    presets: Vec<Preset>,
}

impl SaveContainer {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// The presets in container order.
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Get a preset by index.
    pub fn preset(&self, index: usize) -> Option<&Preset> {
        self.presets.get(index)
    }

    /// Get mutable access to a preset by index.
    pub fn preset_mut(&mut self, index: usize) -> Option<&mut Preset> {
        self.presets.get_mut(index)
    }

    /// Append a preset at the end.
    ///
    /// Fails with [`Error::CapacityExceeded`] when the serialized result
    /// would overflow the fixed inner size; the preset list is left
    /// unchanged in that case.
    pub fn append_preset(&mut self, preset: Preset) -> Result<()> {
        let required = self.presets_encoded_len() + preset.encoded_len();
        if required > PRESET_CAPACITY {
            return Err(Error::CapacityExceeded {
                required,
                capacity: PRESET_CAPACITY,
            });
        }
        self.presets.push(preset);
        Ok(())
    }

    /// Remove and return the preset at `index`, preserving the relative
    /// order of the rest.
    pub fn remove_preset(&mut self, index: usize) -> Result<Preset> {
        if index >= self.presets.len() {
            return Err(Error::IndexOutOfRange {
                index,
                count: self.presets.len(),
            });
        }
        Ok(self.presets.remove(index))
    }

    /// Decode a container from a decrypted buffer.
    ///
    /// The MD5 digest is verified before any preset is parsed; a mismatch
    /// rejects the whole container. Bytes past the declared inner size
    /// (the encryption filler) are ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = BinaryReader::new(data);
        let inner_size = reader.read_u32()? as usize;

        if data.len() < 4 + inner_size || inner_size < CONTAINER_HEADER_SIZE + DIGEST_SIZE {
            return Err(Error::TruncatedContainer {
                declared: inner_size,
                available: data.len().saturating_sub(4),
            });
        }

        let inner = &data[4..4 + inner_size];
        let (content, stored) = inner.split_at(inner_size - DIGEST_SIZE);

        let stored: [u8; DIGEST_SIZE] = stored.try_into().unwrap();
        let computed: [u8; DIGEST_SIZE] = Md5::digest(content).into();
        if stored != computed {
            return Err(Error::IntegrityCheckFailed { stored, computed });
        }

        let mut reader = BinaryReader::new(content);
        let reserved = [reader.read_u32()?, reader.read_u32()?];
        let _count_mirror = reader.read_u32()?;
        let preset_count = reader.read_u32()? as usize;

        let mut presets = Vec::with_capacity(preset_count.min(MAX_PRESETS_PER_FILE));
        let mut offset = CONTAINER_HEADER_SIZE;
        for _ in 0..preset_count {
            let (preset, consumed) = Preset::decode(&content[offset..])?;
            presets.push(preset);
            offset += consumed;
        }

        Ok(Self { reserved, presets })
    }

    /// Encode the container to its decrypted on-disk form.
    ///
    /// The buffer is rebuilt at the fixed inner size, the digest is
    /// recomputed, and the result is padded to a 16-byte boundary with the
    /// 0x0C filler required by the block cipher.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let preset_len = self.presets_encoded_len();
        if preset_len > PRESET_CAPACITY {
            return Err(Error::CapacityExceeded {
                required: preset_len,
                capacity: PRESET_CAPACITY,
            });
        }

        let count = self.presets.len() as u32;
        let mut content = Vec::with_capacity(CONTAINER_INNER_SIZE - DIGEST_SIZE);
        content.extend_from_slice(&self.reserved[0].to_le_bytes());
        content.extend_from_slice(&self.reserved[1].to_le_bytes());
        // The third header word mirrors the preset count in game-written
        // files, and the count proper follows it.
        content.extend_from_slice(&count.to_le_bytes());
        content.extend_from_slice(&count.to_le_bytes());
        for preset in &self.presets {
            content.extend_from_slice(&preset.to_bytes());
        }
        content.resize(CONTAINER_INNER_SIZE - DIGEST_SIZE, 0);

        let digest: [u8; DIGEST_SIZE] = Md5::digest(&content).into();

        let mut out = Vec::with_capacity(4 + CONTAINER_INNER_SIZE + 12);
        out.extend_from_slice(&(CONTAINER_INNER_SIZE as u32).to_le_bytes());
        out.extend_from_slice(&content);
        out.extend_from_slice(&digest);
        while out.len() % 16 != 0 {
            out.push(TRAILER_PAD_BYTE);
        }

        Ok(out)
    }

    fn presets_encoded_len(&self) -> usize {
        self.presets.iter().map(Preset::encoded_len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::tests::sample_preset;

    fn sample_container() -> SaveContainer {
        let mut container = SaveContainer::new();
        container.append_preset(sample_preset(1)).unwrap();
        container.append_preset(sample_preset(2)).unwrap();
        container.append_preset(sample_preset(2)).unwrap();
        container
    }

    #[test]
    fn test_roundtrip_preserves_order_and_digest() {
        let container = sample_container();
        let bytes = container.encode().unwrap();

        // Size field + inner region, rounded up to the cipher block.
        assert_eq!(bytes.len(), (4 + CONTAINER_INNER_SIZE + 15) / 16 * 16);
        assert_eq!(
            u32::from_le_bytes(bytes[..4].try_into().unwrap()) as usize,
            CONTAINER_INNER_SIZE
        );

        let decoded = SaveContainer::decode(&bytes).unwrap();
        assert_eq!(decoded, container);
        let categories: Vec<u8> = decoded.presets().iter().map(Preset::category).collect();
        assert_eq!(categories, [1, 2, 2]);

        // Re-encoding reproduces the identical buffer, digest included.
        assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn test_header_mirrors_preset_count() {
        let bytes = sample_container().encode().unwrap();
        assert_eq!(u32::from_le_bytes(bytes[12..16].try_into().unwrap()), 3);
        assert_eq!(u32::from_le_bytes(bytes[16..20].try_into().unwrap()), 3);
    }

    #[test]
    fn test_trailer_padding() {
        let bytes = sample_container().encode().unwrap();
        // 4 + 4194320 leaves 4 bytes past the last block boundary.
        assert_eq!(bytes.len() - (4 + CONTAINER_INNER_SIZE), 12);
        assert!(bytes[4 + CONTAINER_INNER_SIZE..]
            .iter()
            .all(|&b| b == TRAILER_PAD_BYTE));
    }

    #[test]
    fn test_flipped_digest_bit_rejected() {
        let container = sample_container();
        let mut bytes = container.encode().unwrap();
        let digest_start = 4 + CONTAINER_INNER_SIZE - DIGEST_SIZE;
        bytes[digest_start] ^= 0x01;

        assert!(matches!(
            SaveContainer::decode(&bytes),
            Err(Error::IntegrityCheckFailed { .. })
        ));
    }

    #[test]
    fn test_corrupted_content_rejected_before_preset_parse() {
        let mut bytes = sample_container().encode().unwrap();
        // Flip a byte inside the first preset; the digest check must fire
        // before the preset walker ever runs.
        bytes[100] ^= 0xFF;
        assert!(matches!(
            SaveContainer::decode(&bytes),
            Err(Error::IntegrityCheckFailed { .. })
        ));
    }

    #[test]
    fn test_capacity_exceeded_leaves_presets_unchanged() {
        let mut container = SaveContainer::new();
        // Each sample preset is ~44 KiB dominated by the thumbnail, so the
        // 4 MiB body fills up in well under a hundred appends.
        let mut appended = 0usize;
        loop {
            match container.append_preset(sample_preset(1)) {
                Ok(()) => appended += 1,
                Err(Error::CapacityExceeded { .. }) => break,
                Err(e) => panic!("unexpected error: {e}"),
            }
            assert!(appended < 200, "capacity check never fired");
        }

        assert_eq!(container.presets().len(), appended);
        // The failed append must not have changed anything.
        assert!(container.encode().is_ok());
    }

    #[test]
    fn test_remove_preset_bounds() {
        let mut container = sample_container();
        let removed = container.remove_preset(1).unwrap();
        assert_eq!(removed.category(), 2);

        let categories: Vec<u8> = container.presets().iter().map(Preset::category).collect();
        assert_eq!(categories, [1, 2]);

        assert!(matches!(
            container.remove_preset(5),
            Err(Error::IndexOutOfRange { index: 5, count: 2 })
        ));
    }

    #[test]
    fn test_truncated_buffer_rejected() {
        let mut bytes = sample_container().encode().unwrap();
        bytes.truncate(1000);
        assert!(matches!(
            SaveContainer::decode(&bytes),
            Err(Error::TruncatedContainer { .. })
        ));
    }
}
