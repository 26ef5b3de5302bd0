/// Allocates unique `u32` indices from a fixed-capacity range.
///
/// Hands out stable integer identifiers for GPU array slots (texture
/// arrays, sampler arrays, material parameter entries). Slots are not
/// recycled individually; `reset()` releases the whole range at once,
/// matching the wholesale lifetime of the backing GPU arrays.
///
/// # Example
///
/// ```ignore
/// let mut alloc = SlotAllocator::new(2);
/// let a = alloc.alloc();  // Some(0)
/// let b = alloc.alloc();  // Some(1)
/// let c = alloc.alloc();  // None (exhausted)
/// alloc.reset();
/// let d = alloc.alloc();  // Some(0)
/// ```
pub struct SlotAllocator {
    next_id: u32,
    capacity: u32,
}

impl SlotAllocator {
    /// Create a new allocator handing out indices in `[0, capacity)`
    pub fn new(capacity: u32) -> Self {
        Self {
            next_id: 0,
            capacity,
        }
    }

    /// Allocate the next slot index, or None if the range is exhausted
    pub fn alloc(&mut self) -> Option<u32> {
        if self.next_id >= self.capacity {
            return None;
        }
        let id = self.next_id;
        self.next_id += 1;
        Some(id)
    }

    /// Number of currently allocated slots
    pub fn len(&self) -> u32 {
        self.next_id
    }

    /// Whether no slots are currently allocated
    pub fn is_empty(&self) -> bool {
        self.next_id == 0
    }

    /// Total number of slots this allocator can hand out
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of slots still available
    pub fn remaining(&self) -> u32 {
        self.capacity - self.next_id
    }

    /// Release all slots, making the full range available again
    pub fn reset(&mut self) {
        self.next_id = 0;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
