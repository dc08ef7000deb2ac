//! # Chunk Cache Module
//!
//! A bounded store of generated chunk geometry with least-recently-used
//! eviction. The cache owns the volume lists; when capacity forces an
//! entry out, a caller-supplied callback runs first so the embedding
//! renderer can release whatever external resources (GPU instance slots,
//! collision bodies) reference the entry.
//!
//! The cache is deliberately single-threaded: it is only ever touched
//! from the orchestrating context, and it is not `Sync`.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::meshing::Volume;
use crate::voxels::ChunkKey;

/// The cached result of generating one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedChunk {
    /// The greedy-meshed volumes of the chunk.
    pub volumes: Vec<Volume>,
}

/// Callback invoked with an entry that is about to be evicted.
pub type EvictionCallback = Box<dyn FnMut(&ChunkKey, &CachedChunk)>;

/// A bounded associative store of generated chunks with LRU eviction.
///
/// Recency is refreshed by `set`, `get` and `has` — membership testing
/// counts as use, mirroring how the renderer probes for residency before
/// requesting regeneration.
pub struct ChunkCache {
    entries: LruCache<ChunkKey, CachedChunk>,
    on_evict: Option<EvictionCallback>,
}

impl ChunkCache {
    /// Creates a cache holding at most `capacity` chunks (minimum 1).
    pub fn new(capacity: usize) -> Self {
        ChunkCache {
            entries: LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap()),
            on_evict: None,
        }
    }

    /// Creates a cache that notifies `on_evict` before dropping an entry
    /// that lost the capacity race.
    pub fn with_eviction_callback(capacity: usize, on_evict: EvictionCallback) -> Self {
        ChunkCache {
            entries: LruCache::new(NonZeroUsize::new(capacity.max(1)).unwrap()),
            on_evict: Some(on_evict),
        }
    }

    /// Inserts or overwrites an entry and marks it most-recently-used.
    ///
    /// If the insert pushes the cache over capacity, the single
    /// least-recently-used entry is evicted and the eviction callback is
    /// invoked with it synchronously, before the entry is dropped. A
    /// same-key overwrite releases no external resources and therefore
    /// does not fire the callback.
    pub fn set(&mut self, key: ChunkKey, value: CachedChunk) {
        if let Some((evicted_key, evicted_value)) = self.entries.push(key, value) {
            if evicted_key != key {
                log::debug!("chunk cache evicting {evicted_key}");
                if let Some(on_evict) = self.on_evict.as_mut() {
                    on_evict(&evicted_key, &evicted_value);
                }
            }
        }
    }

    /// Looks up an entry, marking it most-recently-used on a hit.
    pub fn get(&mut self, key: &ChunkKey) -> Option<&CachedChunk> {
        self.entries.get(key)
    }

    /// Membership test that refreshes recency on a hit.
    pub fn has(&mut self, key: &ChunkKey) -> bool {
        let present = self.entries.contains(key);
        if present {
            self.entries.promote(key);
        }
        present
    }

    /// Removes one entry, returning it if it was present. The eviction
    /// callback is not invoked; explicit removal implies the caller is
    /// already handling the entry's resources.
    pub fn remove(&mut self, key: &ChunkKey) -> Option<CachedChunk> {
        self.entries.pop(key)
    }

    /// Removes every entry and all recency state.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The number of cached chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn chunk() -> CachedChunk {
        CachedChunk { volumes: Vec::new() }
    }

    fn recording_cache(capacity: usize) -> (ChunkCache, Rc<RefCell<Vec<ChunkKey>>>) {
        let evicted = Rc::new(RefCell::new(Vec::new()));
        let log = evicted.clone();
        let cache = ChunkCache::with_eviction_callback(
            capacity,
            Box::new(move |key, _value| log.borrow_mut().push(*key)),
        );
        (cache, evicted)
    }

    #[test]
    fn oldest_untouched_key_is_evicted_first() {
        let (mut cache, evicted) = recording_cache(3);
        for x in 1..=4 {
            cache.set(ChunkKey::new(x, 0), chunk());
        }
        assert_eq!(*evicted.borrow(), vec![ChunkKey::new(1, 0)]);
        assert_eq!(cache.len(), 3);
        assert!(!cache.has(&ChunkKey::new(1, 0)));
    }

    #[test]
    fn get_refreshes_recency() {
        let (mut cache, evicted) = recording_cache(3);
        for x in 1..=3 {
            cache.set(ChunkKey::new(x, 0), chunk());
        }
        assert!(cache.get(&ChunkKey::new(1, 0)).is_some());
        cache.set(ChunkKey::new(4, 0), chunk());

        assert_eq!(*evicted.borrow(), vec![ChunkKey::new(2, 0)]);
        assert!(cache.has(&ChunkKey::new(1, 0)));
    }

    #[test]
    fn has_refreshes_recency() {
        let (mut cache, evicted) = recording_cache(2);
        cache.set(ChunkKey::new(1, 0), chunk());
        cache.set(ChunkKey::new(2, 0), chunk());
        assert!(cache.has(&ChunkKey::new(1, 0)));
        cache.set(ChunkKey::new(3, 0), chunk());

        assert_eq!(*evicted.borrow(), vec![ChunkKey::new(2, 0)]);
    }

    #[test]
    fn overwriting_a_key_does_not_fire_the_callback() {
        let (mut cache, evicted) = recording_cache(2);
        cache.set(ChunkKey::new(1, 0), chunk());
        cache.set(ChunkKey::new(1, 0), chunk());
        assert!(evicted.borrow().is_empty());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_and_clear_drop_tracking_state() {
        let (mut cache, evicted) = recording_cache(2);
        cache.set(ChunkKey::new(1, 0), chunk());
        cache.set(ChunkKey::new(2, 0), chunk());

        assert!(cache.remove(&ChunkKey::new(1, 0)).is_some());
        assert!(cache.remove(&ChunkKey::new(1, 0)).is_none());

        cache.clear();
        assert!(cache.is_empty());
        assert!(evicted.borrow().is_empty());

        // A fresh insert after clear starts recency tracking over.
        cache.set(ChunkKey::new(5, 0), chunk());
        assert!(cache.has(&ChunkKey::new(5, 0)));
    }
}
