//! Fixed-slot LRU cache mapping `load_image(path)` calls to stable slot indices (spec §5 Resource
//! ownership, §8 invariant 9: "the texture cache never grows past its configured slot count; the
//! least recently touched entry is evicted first").
//!
//! Grounded on `game_render`'s image loading (`image::open` + `to_rgba8`, see
//! `game_render_test/src/main.rs`) for decoding, and deliberately NOT on
//! `game_common::collections::lru::Lru` (an unsafe intrusive doubly-linked list over a
//! `hashbrown::HashTable`): this cache only needs eviction-by-recency over a few dozen resident
//! images a frame, so a `HashMap` plus a monotonic sequence counter is the whole story and avoids
//! reaching for `unsafe` where nothing forces it.

use std::collections::HashMap;
use std::path::PathBuf;

use shaq_sel::types::TextureDescriptor;
use tracing::warn;

use crate::image_alloc::{Allocation, ImageAllocator};

struct Slot {
    path: PathBuf,
    width: u32,
    height: u32,
    allocation: Allocation,
    last_touched: u64,
}

/// Resident decoded images, addressable by the slot index embedded in
/// [`TextureDescriptor::LoadedImage`].
pub struct TextureCache {
    capacity: usize,
    slots: Vec<Option<Slot>>,
    free_slots: Vec<u32>,
    by_path: HashMap<PathBuf, u32>,
    allocator: ImageAllocator,
    backing: Vec<u8>,
    seq: u64,
}

impl TextureCache {
    pub fn new(capacity: usize, backing_bytes: usize) -> Self {
        Self {
            capacity,
            slots: Vec::new(),
            free_slots: Vec::new(),
            by_path: HashMap::new(),
            allocator: ImageAllocator::new(backing_bytes),
            backing: vec![0; backing_bytes],
            seq: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Decoded RGBA8 pixels for a resident slot, for the render backend to upload.
    pub fn pixels(&self, index: u32) -> Option<(&[u8], u32, u32)> {
        let slot = self.slots.get(index as usize)?.as_ref()?;
        Some((&self.backing[slot.allocation.range()], slot.width, slot.height))
    }

    /// Loads `path`, decoding it and evicting the least recently touched resident image if the
    /// cache is at capacity. Returns [`TextureDescriptor::Error`] on any I/O or decode failure,
    /// or if the image can't fit even after evicting everything else.
    pub fn load(&mut self, path: &str) -> TextureDescriptor {
        let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| PathBuf::from(path));

        self.seq += 1;
        if let Some(&index) = self.by_path.get(&canonical) {
            if let Some(slot) = self.slots[index as usize].as_mut() {
                slot.last_touched = self.seq;
            }
            return TextureDescriptor::LoadedImage { index };
        }

        let image = match image::open(&canonical) {
            Ok(image) => image.to_rgba8(),
            Err(err) => {
                warn!("failed to decode image {}: {}", canonical.display(), err);
                return TextureDescriptor::Error;
            }
        };
        let (width, height) = (image.width(), image.height());
        let pixels = image.into_raw();

        while self.by_path.len() >= self.capacity {
            if !self.evict_least_recently_touched() {
                break;
            }
        }

        let allocation = match self.alloc_with_eviction(pixels.len()) {
            Some(allocation) => allocation,
            None => {
                warn!("image cache has no room for {}", canonical.display());
                return TextureDescriptor::Error;
            }
        };
        self.backing[allocation.range()].copy_from_slice(&pixels);

        let index = self.free_slots.pop().unwrap_or_else(|| {
            self.slots.push(None);
            (self.slots.len() - 1) as u32
        });
        self.slots[index as usize] =
            Some(Slot { path: canonical.clone(), width, height, allocation, last_touched: self.seq });
        self.by_path.insert(canonical, index);

        TextureDescriptor::LoadedImage { index }
    }

    fn alloc_with_eviction(&mut self, size: usize) -> Option<Allocation> {
        loop {
            if let Ok(allocation) = self.allocator.alloc(size) {
                return Some(allocation);
            }
            if !self.evict_least_recently_touched() {
                return None;
            }
        }
    }

    fn evict_least_recently_touched(&mut self) -> bool {
        let victim = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|slot| (index as u32, slot.last_touched)))
            .min_by_key(|&(_, last_touched)| last_touched);

        let Some((index, _)) = victim else { return false };
        let slot = self.slots[index as usize].take().expect("victim index is resident");
        warn!("evicted texture cache entry for {}", slot.path.display());
        self.allocator.dealloc(slot.allocation);
        self.by_path.remove(&slot.path);
        self.free_slots.push(index);
        true
    }

    /// Drops resident textures not touched since the last project load, matching project-level
    /// reload semantics (spec §3 Lifecycles). Unlike the widget registry this isn't run every
    /// frame: callers call it once right after swapping in a new project.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_slots.clear();
        self.by_path.clear();
        self.allocator = ImageAllocator::new(self.allocator.max_size());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_resolves_to_error_descriptor() {
        let mut cache = TextureCache::new(4, 1 << 20);
        assert_eq!(cache.load("/no/such/file.png"), TextureDescriptor::Error);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn clear_frees_every_resident_slot() {
        let mut cache = TextureCache::new(4, 1 << 20);
        cache.load("/no/such/file.png");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.allocator.free_size(), cache.allocator.max_size());
    }
}
