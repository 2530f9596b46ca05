//! Free-list byte allocator for decoded image pixels (spec §5 Resource ownership, §8 invariant 9).
//!
//! Grounded on `game_render`'s `allocator::Allocator` (chunk list, first-fit scan, chunk splitting
//! on alloc). That allocator never frees a chunk back (`dealloc` is `todo!()` there) because GPU
//! buffer suballocations in the teacher live for the whole renderer's lifetime. Shaq's texture
//! cache evicts individual images every time a file falls out of the LRU window, so `dealloc` here
//! is implemented for real: the freed range is reinserted in start order and merged with any
//! chunk it's newly adjacent to.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Chunk {
    start: usize,
    size: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    #[error("image allocator has no free chunk large enough for {requested} bytes")]
    OutOfMemory { requested: usize },
}

/// A single contiguous byte range handed out by [`ImageAllocator::alloc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    start: usize,
    size: usize,
}

impl Allocation {
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.size
    }
}

/// Owns a single backing byte range of `max_size` and hands out non-overlapping sub-ranges to
/// decoded images, coalescing on free so long-running sessions with lots of texture churn don't
/// fragment into dust.
pub struct ImageAllocator {
    max_size: usize,
    free_size: usize,
    free: Vec<Chunk>,
}

impl ImageAllocator {
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size,
            free_size: max_size,
            free: vec![Chunk { start: 0, size: max_size }],
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn free_size(&self) -> usize {
        self.free_size
    }

    pub fn alloc(&mut self, size: usize) -> Result<Allocation, AllocationError> {
        if size == 0 {
            return Ok(Allocation { start: 0, size: 0 });
        }

        let (index, chunk) = self
            .free
            .iter()
            .enumerate()
            .find(|(_, chunk)| chunk.size >= size)
            .map(|(index, chunk)| (index, *chunk))
            .ok_or(AllocationError::OutOfMemory { requested: size })?;

        let remaining = chunk.size - size;
        if remaining == 0 {
            self.free.remove(index);
        } else {
            self.free[index] = Chunk { start: chunk.start + size, size: remaining };
        }

        self.free_size -= size;
        Ok(Allocation { start: chunk.start, size })
    }

    /// Returns `allocation`'s range to the free list, merging it with whichever neighboring free
    /// chunks it now borders.
    pub fn dealloc(&mut self, allocation: Allocation) {
        if allocation.size == 0 {
            return;
        }

        let insert_at = self
            .free
            .iter()
            .position(|chunk| chunk.start > allocation.start)
            .unwrap_or(self.free.len());

        self.free.insert(insert_at, Chunk { start: allocation.start, size: allocation.size });
        self.free_size += allocation.size;

        // Merge with the following neighbor first so the index of the chunk we're about to merge
        // backwards with doesn't shift underneath us.
        if insert_at + 1 < self.free.len() {
            let this = self.free[insert_at];
            let next = self.free[insert_at + 1];
            if this.start + this.size == next.start {
                self.free[insert_at].size += next.size;
                self.free.remove(insert_at + 1);
            }
        }
        if insert_at > 0 {
            let prev = self.free[insert_at - 1];
            let this = self.free[insert_at];
            if prev.start + prev.size == this.start {
                self.free[insert_at - 1].size += this.size;
                self.free.remove(insert_at);
            }
        }
    }

    /// Extends the backing range, growing the final free chunk (or inserting a new one if the
    /// allocator was entirely full).
    pub fn grow(&mut self, new_max_size: usize) {
        debug_assert!(new_max_size >= self.max_size);
        let added = new_max_size - self.max_size;
        if added == 0 {
            return;
        }
        match self.free.last_mut().filter(|chunk| chunk.start + chunk.size == self.max_size) {
            Some(last) => last.size += added,
            None => self.free.push(Chunk { start: self.max_size, size: added }),
        }
        self.max_size = new_max_size;
        self.free_size += added;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_splits_the_first_fitting_chunk() {
        let mut allocator = ImageAllocator::new(1024);
        let a = allocator.alloc(256).unwrap();
        assert_eq!(a.start(), 0);
        assert_eq!(allocator.free_size(), 768);
    }

    #[test]
    fn out_of_memory_when_no_chunk_fits() {
        let mut allocator = ImageAllocator::new(128);
        allocator.alloc(128).unwrap();
        assert!(matches!(allocator.alloc(1), Err(AllocationError::OutOfMemory { .. })));
    }

    #[test]
    fn dealloc_merges_adjacent_free_chunks() {
        let mut allocator = ImageAllocator::new(300);
        let a = allocator.alloc(100).unwrap();
        let b = allocator.alloc(100).unwrap();
        let c = allocator.alloc(100).unwrap();
        assert_eq!(allocator.free_size(), 0);

        allocator.dealloc(b);
        allocator.dealloc(a);
        allocator.dealloc(c);

        // Every chunk is free again and should have fully coalesced into one.
        assert_eq!(allocator.free_size(), 300);
        assert_eq!(allocator.free.len(), 1);
        assert_eq!(allocator.free[0], Chunk { start: 0, size: 300 });
    }

    #[test]
    fn freed_space_is_reusable() {
        let mut allocator = ImageAllocator::new(128);
        let a = allocator.alloc(128).unwrap();
        allocator.dealloc(a);
        assert!(allocator.alloc(128).is_ok());
    }
}
