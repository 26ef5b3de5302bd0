//! Small engine-internal helpers.

mod slot_allocator;

pub use slot_allocator::SlotAllocator;
