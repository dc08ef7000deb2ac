//! Generation jobs and their execution.
//!
//! A job names a chunk and a detail level; executing it runs the full
//! noise → classify → mesh pipeline (or the low-detail plane build) and
//! wraps the outcome. Panics are confined to the job that raised them so
//! one bad chunk can never take down its siblings in a batch.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use log::debug;
use web_time::Instant;

use crate::heightfield::Heightfield;
use crate::meshing::{greedy_mesh, Volume};
use crate::plane::{build_plane_column, PlaneChunkColumn};
use crate::voxels::{build_column, ChunkKey};

/// The level of detail requested for one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLevel {
    /// Full voxel detail: a greedy-meshed volume list.
    Full,
    /// Low-detail heightmap mesh with the given grid resolution.
    Plane {
        /// Grid cells per axis of the heightmap mesh.
        segments: u32,
    },
}

/// A request to generate one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationJob {
    /// The chunk to generate.
    pub key: ChunkKey,
    /// The detail level to generate it at.
    pub detail: DetailLevel,
}

/// The geometry produced by a completed job.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedGeometry {
    /// Greedy-meshed volumes (full detail).
    Volumes(Vec<Volume>),
    /// Low-detail heightmap buffers.
    Plane(PlaneChunkColumn),
}

/// Errors surfaced for individual failed jobs.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The job panicked; the panic was confined to this chunk.
    #[error("generation of chunk {key} panicked: {reason}")]
    Panicked {
        /// The chunk whose job panicked.
        key: ChunkKey,
        /// The panic payload, if it carried a message.
        reason: String,
    },
}

/// The result of one generation job.
#[derive(Debug)]
pub struct GenerationOutcome {
    /// The chunk the job covered.
    pub key: ChunkKey,
    /// The generated geometry, or the per-chunk failure.
    pub result: Result<GeneratedGeometry, GenerationError>,
}

fn panic_reason(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

/// Runs one job to completion, converting a panic into a per-chunk error.
pub(crate) fn process_job(heightfield: &Heightfield, job: GenerationJob) -> GenerationOutcome {
    let started = Instant::now();
    let key = job.key;

    let result = catch_unwind(AssertUnwindSafe(|| match job.detail {
        DetailLevel::Full => {
            let column = build_column(heightfield, key);
            GeneratedGeometry::Volumes(greedy_mesh(&column))
        }
        DetailLevel::Plane { segments } => {
            GeneratedGeometry::Plane(build_plane_column(heightfield, key, segments))
        }
    }));

    match result {
        Ok(geometry) => {
            debug!("generated chunk {key} in {:?}", started.elapsed());
            GenerationOutcome {
                key,
                result: Ok(geometry),
            }
        }
        Err(panic) => GenerationOutcome {
            key,
            result: Err(GenerationError::Panicked {
                key,
                reason: panic_reason(panic),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeParams;
    use crate::heightfield::HeightfieldCache;

    fn heightfield() -> Heightfield {
        Heightfield::with_cache(
            "jobs",
            BiomeParams::default(),
            HeightfieldCache::new(256),
        )
        .unwrap()
    }

    #[test]
    fn full_detail_jobs_produce_volumes() {
        let heightfield = heightfield();
        let job = GenerationJob {
            key: ChunkKey::new(0, 0),
            detail: DetailLevel::Full,
        };
        let outcome = process_job(&heightfield, job);
        match outcome.result {
            Ok(GeneratedGeometry::Volumes(volumes)) => assert!(!volumes.is_empty()),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn plane_jobs_produce_heightmap_buffers() {
        let heightfield = heightfield();
        let job = GenerationJob {
            key: ChunkKey::new(1, 1),
            detail: DetailLevel::Plane { segments: 4 },
        };
        let outcome = process_job(&heightfield, job);
        match outcome.result {
            Ok(GeneratedGeometry::Plane(plane)) => {
                assert_eq!(plane.positions.len(), 25);
                assert_eq!(plane.indices.len(), 96);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
