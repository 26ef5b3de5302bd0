//! Resource-level sampler wrapper.

use std::sync::Arc;

use crate::graphics_device;

/// A cached device sampler plus its indirection slot.
///
/// Materials reference samplers by small integer slot index into the fixed
/// material sampler array rather than by native handle; the slot is assigned
/// by the ResourceCache when the sampler is first created.
pub struct Sampler {
    device_sampler: Arc<dyn graphics_device::Sampler>,
    slot: u32,
}

impl Sampler {
    /// Wrap a device sampler with its assigned array slot
    pub fn new(device_sampler: Arc<dyn graphics_device::Sampler>, slot: u32) -> Self {
        Self {
            device_sampler,
            slot,
        }
    }

    /// The underlying device sampler
    pub fn device_sampler(&self) -> &Arc<dyn graphics_device::Sampler> {
        &self.device_sampler
    }

    /// Slot index in the material sampler array
    pub fn slot(&self) -> u32 {
        self.slot
    }
}
