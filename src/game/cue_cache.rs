use crate::core::audio::{AudioBackend, Cue};
use log::debug;
use std::collections::{HashMap, VecDeque};

pub const CUE_CACHE_CAPACITY: usize = 50;

/// Pitch → rendered cue, bounded. When full, the entry that was inserted
/// first is evicted, regardless of how recently it was used.
pub struct AudioCueCache {
    capacity: usize,
    cues: HashMap<u8, Cue>,
    insertion_order: VecDeque<u8>,
}

impl Default for AudioCueCache {
    fn default() -> Self {
        Self::with_capacity(CUE_CACHE_CAPACITY)
    }
}

impl AudioCueCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            cues: HashMap::with_capacity(capacity + 1),
            insertion_order: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn contains(&self, pitch: u8) -> bool {
        self.cues.contains_key(&pitch)
    }

    /// Returns the cached cue for `pitch`, rendering it on a miss. `None`
    /// means sound is unavailable; callers carry on silently.
    pub fn request_cue(&mut self, pitch: u8, backend: &dyn AudioBackend) -> Option<Cue> {
        if let Some(cue) = self.cues.get(&pitch) {
            return Some(cue.clone());
        }
        let Some(cue) = backend.render_cue(pitch) else {
            debug!("Cue for pitch {} unavailable.", pitch);
            return None;
        };
        self.insert(pitch, cue.clone());
        Some(cue)
    }

    fn insert(&mut self, pitch: u8, cue: Cue) {
        if self.cues.insert(pitch, cue).is_none() {
            self.insertion_order.push_back(pitch);
        }
        while self.insertion_order.len() > self.capacity {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.cues.remove(&oldest);
                debug!("Evicted cue for pitch {}.", oldest);
            }
        }
    }

    pub fn clear(&mut self) {
        self.cues.clear();
        self.insertion_order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingBackend {
        renders: Cell<usize>,
        unavailable: bool,
    }

    impl AudioBackend for CountingBackend {
        fn render_cue(&self, pitch: u8) -> Option<Cue> {
            if self.unavailable {
                return None;
            }
            self.renders.set(self.renders.get() + 1);
            Some(Arc::new(vec![pitch as f32]))
        }

        fn play_cue(&self, _cue: &Cue) {}
    }

    #[test]
    fn repeated_requests_render_once() {
        let backend = CountingBackend::default();
        let mut cache = AudioCueCache::new();
        let first = cache.request_cue(64, &backend).unwrap();
        let second = cache.request_cue(64, &backend).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(backend.renders.get(), 1);
    }

    #[test]
    fn evicts_oldest_inserted_first() {
        let backend = CountingBackend::default();
        let mut cache = AudioCueCache::with_capacity(3);
        for pitch in [10, 11, 12] {
            cache.request_cue(pitch, &backend);
        }
        // Touching 10 does not protect it: eviction is by insertion order.
        cache.request_cue(10, &backend);
        cache.request_cue(13, &backend);

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains(10));
        assert!(cache.contains(11) && cache.contains(12) && cache.contains(13));

        cache.request_cue(14, &backend);
        assert!(!cache.contains(11));
    }

    #[test]
    fn default_capacity_is_fifty() {
        let backend = CountingBackend::default();
        let mut cache = AudioCueCache::new();
        for pitch in 0..=127u8 {
            cache.request_cue(pitch, &backend);
        }
        assert_eq!(cache.len(), CUE_CACHE_CAPACITY);
        assert!(cache.contains(127));
        assert!(!cache.contains(77));
        assert!(cache.contains(78));
    }

    #[test]
    fn unavailable_backend_caches_nothing() {
        let backend = CountingBackend {
            unavailable: true,
            ..Default::default()
        };
        let mut cache = AudioCueCache::new();
        assert!(cache.request_cue(60, &backend).is_none());
        assert!(cache.is_empty());
    }
}
