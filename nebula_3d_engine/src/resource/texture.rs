//! Resource-level texture wrapper.

use std::sync::Arc;

use crate::graphics_device;
use super::sampler::Sampler;

/// A cached texture: an image view paired with a sampler, plus the texture's
/// indirection slot in the fixed material texture array.
///
/// The view keeps the underlying device image alive; the sampler is the
/// shared resource-level wrapper so its own slot stays visible to renderers.
pub struct Texture {
    view: Arc<dyn graphics_device::ImageView>,
    sampler: Arc<Sampler>,
    slot: u32,
}

impl Texture {
    /// Wrap an image view and sampler with the texture's assigned array slot
    pub fn new(
        view: Arc<dyn graphics_device::ImageView>,
        sampler: Arc<Sampler>,
        slot: u32,
    ) -> Self {
        Self {
            view,
            sampler,
            slot,
        }
    }

    /// The shader-visible image view
    pub fn view(&self) -> &Arc<dyn graphics_device::ImageView> {
        &self.view
    }

    /// The device image behind the view
    pub fn image(&self) -> &Arc<dyn graphics_device::Image> {
        self.view.image()
    }

    /// The sampler this texture samples with
    pub fn sampler(&self) -> &Arc<Sampler> {
        &self.sampler
    }

    /// Slot index in the material texture array
    pub fn slot(&self) -> u32 {
        self.slot
    }
}
