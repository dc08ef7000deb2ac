//! # Generation Pool Module
//!
//! A fixed-size worker pool for chunk generation. Jobs are independent
//! per chunk key, so the pool is a plain fan-out: each worker owns a job
//! channel and an outcome channel, jobs are distributed round-robin, and
//! the only state workers share is the heightfield (whose cache is built
//! for exactly that, see [`crate::heightfield`]).
//!
//! ## Platform notes
//!
//! Workers are OS threads natively and `wasm_thread` web workers on wasm
//! targets. Either way the channel protocol is identical.
//!
//! ## Failure isolation
//!
//! A job that panics is reported as a failed outcome for that one chunk;
//! sibling jobs and the pool itself keep running. A worker whose channel
//! disconnects is marked dead and skipped from then on — the caller sees
//! missing chunks (terrain gaps), never a crash.
//!
//! ## Staleness
//!
//! There is no cancellation: a chunk the player has moved away from is
//! simply discarded by the caller when its outcome arrives.

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use log::{error, info};

use crate::heightfield::Heightfield;

mod job;

pub use job::{
    DetailLevel, GeneratedGeometry, GenerationError, GenerationJob, GenerationOutcome,
};

use job::process_job;

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        use wasm_thread as thread;
        use wasm_thread::JoinHandle;
    } else {
        use std::thread::{self, JoinHandle};
    }
}

/// Maximum number of jobs in flight per worker channel.
///
/// Kept at 1 so queued jobs can still be redistributed to whichever
/// worker frees up first; raising it would pipeline at the cost of load
/// balancing.
pub const MAX_JOBS_IN_FLIGHT: usize = 1;

/// A communication channel between the orchestrating thread and one
/// generation worker.
struct WorkerChannel {
    job_sender: Sender<GenerationJob>,
    outcome_receiver: Receiver<GenerationOutcome>,
    num_jobs_in_flight: usize,
    disconnected: bool,
    _worker: JoinHandle<()>,
}

/// A fixed pool of generation workers with a FIFO overflow queue.
pub struct GenerationPool {
    channels: Vec<WorkerChannel>,
    queued_jobs: VecDeque<GenerationJob>,
    current_channel: usize,
}

impl GenerationPool {
    /// Spawns `num_workers` workers, each holding a clone of the shared
    /// heightfield handle.
    pub fn new(num_workers: usize, heightfield: Arc<Heightfield>) -> Self {
        info!("starting generation pool with {num_workers} workers");
        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (job_tx, job_rx) = channel::<GenerationJob>();
            let (outcome_tx, outcome_rx) = channel::<GenerationOutcome>();

            let worker_heightfield = heightfield.clone();
            let job_closure = move || {
                while let Ok(job) = job_rx.recv() {
                    let outcome = process_job(&worker_heightfield, job);
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
            };

            channels.push(WorkerChannel {
                job_sender: job_tx,
                outcome_receiver: outcome_rx,
                num_jobs_in_flight: 0,
                disconnected: false,
                _worker: thread::spawn(job_closure),
            });
        }

        GenerationPool {
            channels,
            queued_jobs: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a job to a specific worker channel, returning the
    /// job on failure so it can be requeued.
    fn try_send_job(
        &mut self,
        job: GenerationJob,
        channel_idx: usize,
    ) -> Result<(), GenerationJob> {
        match self.channels[channel_idx].job_sender.send(job) {
            Ok(()) => {
                self.channels[channel_idx].num_jobs_in_flight += 1;
                Ok(())
            }
            Err(send_error) => {
                self.channels[channel_idx].disconnected = true;
                Err(send_error.0)
            }
        }
    }

    /// Finds a live channel with capacity, round-robin from the channel
    /// after the last one used.
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel % self.channels.len();
        let mut current = start_channel;

        loop {
            let channel = &self.channels[current];
            if !channel.disconnected && channel.num_jobs_in_flight < MAX_JOBS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Whether any worker channel can still accept jobs.
    fn has_live_channel(&self) -> bool {
        self.channels.iter().any(|channel| !channel.disconnected)
    }

    /// The number of jobs currently being processed by workers.
    fn jobs_in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_jobs_in_flight)
            .sum()
    }

    /// Publishes a job for execution.
    ///
    /// # Returns
    /// `true` if the job went straight to a worker, `false` if it was
    /// queued because every worker was busy (or dead).
    pub fn publish_job(&mut self, job: GenerationJob) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_job(job, channel_idx) {
                Ok(()) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(job) => {
                    self.queued_jobs.push_back(job);
                    false
                }
            },
            None => {
                self.queued_jobs.push_back(job);
                false
            }
        }
    }

    /// Moves queued jobs onto workers while any worker has capacity.
    pub fn process_queued_jobs(&mut self) {
        while !self.queued_jobs.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                return;
            };
            let job = self
                .queued_jobs
                .pop_front()
                .expect("queue emptiness checked by the loop condition");
            if let Err(job) = self.try_send_job(job, channel_idx) {
                self.queued_jobs.push_front(job);
            }
        }
    }

    /// Drains every outcome that has already arrived, without blocking.
    ///
    /// Failed outcomes are logged here at the per-chunk level; they are
    /// still returned so the caller can leave a gap for the chunk.
    pub fn try_collect_outcomes(&mut self) -> Vec<GenerationOutcome> {
        let mut outcomes = Vec::new();
        for channel in &mut self.channels {
            while let Ok(outcome) = channel.outcome_receiver.try_recv() {
                channel.num_jobs_in_flight -= 1;
                if let Err(generation_error) = &outcome.result {
                    error!("chunk generation failed: {generation_error}");
                }
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Blocks on every channel with work in flight and collects their
    /// outcomes.
    fn collect_outcomes_blocking(&mut self) -> Vec<GenerationOutcome> {
        let mut outcomes = Vec::new();
        for channel in &mut self.channels {
            while channel.num_jobs_in_flight > 0 {
                match channel.outcome_receiver.recv() {
                    Ok(outcome) => {
                        channel.num_jobs_in_flight -= 1;
                        if let Err(generation_error) = &outcome.result {
                            error!("chunk generation failed: {generation_error}");
                        }
                        outcomes.push(outcome);
                    }
                    Err(_) => {
                        error!("generation worker disconnected with work in flight");
                        channel.num_jobs_in_flight = 0;
                        channel.disconnected = true;
                        break;
                    }
                }
            }
        }
        outcomes
    }

    /// Fan-out/fan-in: publishes a batch of jobs and waits for all of
    /// them.
    ///
    /// One chunk's failure never blocks its siblings: failed jobs come
    /// back as `Err` outcomes. If every worker dies while jobs are still
    /// queued, the abandoned jobs are logged and the batch returns short —
    /// the caller sees terrain gaps rather than a hang.
    pub fn generate_batch(&mut self, jobs: Vec<GenerationJob>) -> Vec<GenerationOutcome> {
        let total = jobs.len();
        let mut outcomes = Vec::with_capacity(total);

        for job in jobs {
            self.publish_job(job);
        }

        while outcomes.len() < total {
            self.process_queued_jobs();
            if self.jobs_in_flight() == 0 {
                if self.queued_jobs.is_empty() || !self.has_live_channel() {
                    break;
                }
                continue;
            }
            outcomes.extend(self.collect_outcomes_blocking());
        }

        if !self.queued_jobs.is_empty() && !self.has_live_channel() {
            error!(
                "abandoning {} queued generation jobs: no live workers",
                self.queued_jobs.len()
            );
            self.queued_jobs.clear();
        }

        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::biome::BiomeParams;
    use crate::heightfield::HeightfieldCache;
    use crate::persistence::encode_chunk_volumes;
    use crate::voxels::ChunkKey;

    fn pool(seed: &str, num_workers: usize) -> GenerationPool {
        let heightfield = Heightfield::with_cache(
            seed,
            BiomeParams::default(),
            HeightfieldCache::new(256),
        )
        .unwrap();
        GenerationPool::new(num_workers, Arc::new(heightfield))
    }

    fn full_job(x: i32, z: i32) -> GenerationJob {
        GenerationJob {
            key: ChunkKey::new(x, z),
            detail: DetailLevel::Full,
        }
    }

    #[test]
    fn batches_complete_even_when_jobs_outnumber_workers() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut pool = pool("batch", 2);
        let jobs: Vec<GenerationJob> =
            (-3..3).map(|x| full_job(x, -x)).collect();
        let expected: Vec<ChunkKey> = jobs.iter().map(|job| job.key).collect();

        let outcomes = pool.generate_batch(jobs);

        assert_eq!(outcomes.len(), expected.len());
        for key in expected {
            let outcome = outcomes.iter().find(|outcome| outcome.key == key).unwrap();
            assert!(outcome.result.is_ok());
        }
    }

    #[test]
    fn published_jobs_can_be_drained_incrementally() {
        let mut pool = pool("drain", 2);
        for x in 0..3 {
            pool.publish_job(full_job(x, 1));
        }

        let mut collected = Vec::new();
        while collected.len() < 3 {
            pool.process_queued_jobs();
            collected.extend(pool.try_collect_outcomes());
            thread::yield_now();
        }

        assert!(collected.iter().all(|outcome| outcome.result.is_ok()));
    }

    #[test]
    fn single_worker_pools_drain_their_queue() {
        let mut pool = pool("queue", 1);
        let outcomes = pool.generate_batch((0..4).map(|x| full_job(x, 0)).collect());
        assert_eq!(outcomes.len(), 4);
    }

    #[test]
    fn repeated_generation_of_a_chunk_is_byte_identical() {
        // The fixed-seed scenario: default biome parameters, seed
        // "test_seed", chunk (0, 0) generated twice.
        let volumes_of = |outcomes: Vec<GenerationOutcome>| match outcomes
            .into_iter()
            .next()
            .unwrap()
            .result
            .unwrap()
        {
            GeneratedGeometry::Volumes(volumes) => volumes,
            GeneratedGeometry::Plane(_) => panic!("expected volumes"),
        };

        let first = volumes_of(pool("test_seed", 2).generate_batch(vec![full_job(0, 0)]));
        let second = volumes_of(pool("test_seed", 2).generate_batch(vec![full_job(0, 0)]));

        assert_eq!(
            encode_chunk_volumes(&[first]),
            encode_chunk_volumes(&[second])
        );
    }

    #[test]
    fn mixed_detail_batches_return_matching_geometry() {
        let mut pool = pool("mixed", 2);
        let jobs = vec![
            full_job(0, 0),
            GenerationJob {
                key: ChunkKey::new(1, 0),
                detail: DetailLevel::Plane { segments: 4 },
            },
        ];
        let outcomes = pool.generate_batch(jobs);
        assert_eq!(outcomes.len(), 2);

        for outcome in outcomes {
            match (outcome.key.x, outcome.result.unwrap()) {
                (0, GeneratedGeometry::Volumes(volumes)) => assert!(!volumes.is_empty()),
                (1, GeneratedGeometry::Plane(plane)) => {
                    assert_eq!(plane.positions.len(), 25)
                }
                (x, geometry) => panic!("chunk {x} got unexpected geometry {geometry:?}"),
            }
        }
    }

    #[cfg(debug_assertions)]
    #[test]
    fn a_panicking_job_does_not_poison_its_siblings() {
        // Chunk coordinates near i32::MAX overflow the world-coordinate
        // multiply under debug assertions, panicking inside the worker.
        let mut pool = pool("isolation", 2);
        let jobs = vec![full_job(i32::MAX, 0), full_job(0, 0), full_job(1, 0)];
        let outcomes = pool.generate_batch(jobs);

        assert_eq!(outcomes.len(), 3);
        let failed = outcomes
            .iter()
            .find(|outcome| outcome.key == ChunkKey::new(i32::MAX, 0))
            .unwrap();
        assert!(matches!(
            failed.result,
            Err(GenerationError::Panicked { .. })
        ));
        for outcome in &outcomes {
            if outcome.key != ChunkKey::new(i32::MAX, 0) {
                assert!(outcome.result.is_ok());
            }
        }
    }
}
