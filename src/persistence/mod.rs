//! # Persistence Module
//!
//! Binary formats for pre-baked worlds: the raw heightfield cache (see
//! [`HeightfieldCache`](crate::heightfield::HeightfieldCache)) and the
//! per-chunk volume lists.
//!
//! ## Chunk volume format
//!
//! A volume file is a sequence of records, one per chunk in raster order
//! over the exported map area:
//!
//! ```text
//! [ i32 payload byte length | payload ]*
//! ```
//!
//! Each payload is a sequence of fixed-size [`VolumeRecord`]s
//! ([`VOLUME_SIZE_BYTES`] each). The layout is the native one produced by
//! a browser host's typed arrays — little-endian on every supported
//! target.
//!
//! ## Failure policy
//!
//! Loading never panics and never throws away good data: the first
//! malformed record (truncated prefix, overrun, non-integral payload,
//! unknown material) stops the load pass with a warning, and every chunk
//! decoded before it remains valid. Terrain that fails to load renders as
//! a gap, not a crash.

use bytemuck::{Pod, Zeroable};
use cgmath::Point3;
use log::warn;

use crate::meshing::Volume;
use crate::voxels::{BlockType, BlockTypeSize};

/// Errors produced while loading persisted terrain data.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// A heightfield buffer does not match the cache dimensions.
    #[error("heightfield buffer is {found} bytes, expected {expected}")]
    HeightfieldSizeMismatch {
        /// The byte size the cache requires.
        expected: usize,
        /// The byte size that was supplied.
        found: usize,
    },
}

/// The fixed on-disk form of one volume.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct VolumeRecord {
    /// Minimum corner, chunk-local.
    pub min: [i32; 3],
    /// Maximum corner (inclusive), chunk-local.
    pub max: [i32; 3],
    /// Material id, widened to keep the record alignment-free of padding.
    pub block: u32,
}

/// Byte size of one [`VolumeRecord`]; the record stride of every chunk
/// payload.
pub const VOLUME_SIZE_BYTES: usize = std::mem::size_of::<VolumeRecord>();

impl From<&Volume> for VolumeRecord {
    fn from(volume: &Volume) -> Self {
        VolumeRecord {
            min: [volume.min.x, volume.min.y, volume.min.z],
            max: [volume.max.x, volume.max.y, volume.max.z],
            block: volume.block as u32,
        }
    }
}

impl VolumeRecord {
    /// Converts back to a [`Volume`], rejecting unknown material ids.
    fn to_volume(self) -> Option<Volume> {
        if self.block > BlockTypeSize::MAX as u32 {
            return None;
        }
        BlockType::try_from_int(self.block as BlockTypeSize)?;
        Some(Volume {
            min: Point3::new(self.min[0], self.min[1], self.min[2]),
            max: Point3::new(self.max[0], self.max[1], self.max[2]),
            block: self.block as BlockTypeSize,
        })
    }
}

/// Serializes per-chunk volume lists into the length-prefixed record
/// stream.
pub fn encode_chunk_volumes(chunks: &[Vec<Volume>]) -> Vec<u8> {
    let payload_total: usize = chunks
        .iter()
        .map(|volumes| 4 + volumes.len() * VOLUME_SIZE_BYTES)
        .sum();
    let mut bytes = Vec::with_capacity(payload_total);

    for volumes in chunks {
        let payload_len = (volumes.len() * VOLUME_SIZE_BYTES) as i32;
        bytes.extend_from_slice(&payload_len.to_le_bytes());
        for volume in volumes {
            bytes.extend_from_slice(bytemuck::bytes_of(&VolumeRecord::from(volume)));
        }
    }

    bytes
}

/// Deserializes a length-prefixed record stream back into per-chunk
/// volume lists.
///
/// Returns every chunk decoded before the first malformed record; see
/// the module docs for the failure policy.
pub fn decode_chunk_volumes(bytes: &[u8]) -> Vec<Vec<Volume>> {
    let mut chunks = Vec::new();
    let mut offset = 0usize;

    while offset < bytes.len() {
        if offset + 4 > bytes.len() {
            warn!(
                "volume stream ends mid length-prefix at byte {offset}; \
                 keeping {} chunks",
                chunks.len()
            );
            break;
        }
        let prefix: [u8; 4] = bytes[offset..offset + 4].try_into().unwrap();
        let payload_len = i32::from_le_bytes(prefix);
        offset += 4;

        if payload_len < 0 || payload_len as usize % VOLUME_SIZE_BYTES != 0 {
            warn!(
                "volume stream has invalid payload length {payload_len} at byte {offset}; \
                 keeping {} chunks",
                chunks.len()
            );
            break;
        }
        let payload_len = payload_len as usize;
        if offset + payload_len > bytes.len() {
            warn!(
                "volume stream payload overruns the buffer at byte {offset}; \
                 keeping {} chunks",
                chunks.len()
            );
            break;
        }

        let mut volumes = Vec::with_capacity(payload_len / VOLUME_SIZE_BYTES);
        let mut malformed = false;
        for record_bytes in bytes[offset..offset + payload_len].chunks_exact(VOLUME_SIZE_BYTES) {
            let record: VolumeRecord = bytemuck::pod_read_unaligned(record_bytes);
            match record.to_volume() {
                Some(volume) => volumes.push(volume),
                None => {
                    warn!(
                        "volume stream has unknown material {} at byte {offset}; \
                         keeping {} chunks",
                        record.block,
                        chunks.len()
                    );
                    malformed = true;
                    break;
                }
            }
        }
        if malformed {
            break;
        }

        chunks.push(volumes);
        offset += payload_len;
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn volume(min: [i32; 3], max: [i32; 3], block: BlockType) -> Volume {
        Volume {
            min: Point3::new(min[0], min[1], min[2]),
            max: Point3::new(max[0], max[1], max[2]),
            block: block as BlockTypeSize,
        }
    }

    fn sample_chunks() -> Vec<Vec<Volume>> {
        vec![
            vec![
                volume([0, 0, 0], [15, 3, 15], BlockType::STONE),
                volume([2, 4, 2], [5, 4, 9], BlockType::GRASS),
            ],
            Vec::new(),
            vec![volume([7, 40, 7], [7, 41, 7], BlockType::SNOW)],
        ]
    }

    #[test]
    fn record_size_is_fixed() {
        assert_eq!(VOLUME_SIZE_BYTES, 28);
    }

    #[test]
    fn encode_decode_round_trips() {
        let chunks = sample_chunks();
        let decoded = decode_chunk_volumes(&encode_chunk_volumes(&chunks));
        assert_eq!(decoded, chunks);
    }

    #[test]
    fn truncated_stream_keeps_complete_chunks() {
        let chunks = sample_chunks();
        let bytes = encode_chunk_volumes(&chunks);
        let decoded = decode_chunk_volumes(&bytes[..bytes.len() - 5]);
        assert_eq!(decoded, chunks[..2]);
    }

    #[test]
    fn truncated_length_prefix_keeps_complete_chunks() {
        let chunks = sample_chunks();
        let mut bytes = encode_chunk_volumes(&chunks[..1]);
        bytes.extend_from_slice(&[1, 0]);
        let decoded = decode_chunk_volumes(&bytes);
        assert_eq!(decoded, chunks[..1]);
    }

    #[test]
    fn negative_length_prefix_stops_the_pass() {
        let chunks = sample_chunks();
        let mut bytes = encode_chunk_volumes(&chunks[..1]);
        bytes.extend_from_slice(&(-28i32).to_le_bytes());
        bytes.extend_from_slice(&[0u8; VOLUME_SIZE_BYTES]);
        let decoded = decode_chunk_volumes(&bytes);
        assert_eq!(decoded, chunks[..1]);
    }

    #[test]
    fn unknown_material_stops_the_pass() {
        let mut record = VolumeRecord::from(&volume([0, 0, 0], [1, 1, 1], BlockType::SAND));
        record.block = 200;
        let mut bytes = encode_chunk_volumes(&sample_chunks()[..1]);
        bytes.extend_from_slice(&(VOLUME_SIZE_BYTES as i32).to_le_bytes());
        bytes.extend_from_slice(bytemuck::bytes_of(&record));

        let decoded = decode_chunk_volumes(&bytes);
        assert_eq!(decoded.len(), 1);
    }

    #[test]
    fn empty_input_decodes_to_no_chunks() {
        assert!(decode_chunk_volumes(&[]).is_empty());
    }
}
