//! GraphicsDevice trait - main device interface for creating resources and
//! submitting commands.

use std::sync::Arc;

use crate::error::Result;
use crate::graphics_device::{
    BindingGroup, BindingResource, Buffer, BufferDesc, CommandList, Image, ImageDesc, ImageView,
    ImageViewDesc, Sampler, SamplerDesc,
};

/// Main graphics device trait
///
/// This is the central factory interface for creating GPU resources and
/// submitting commands. Implemented by backend-specific devices
/// (e.g., VulkanGraphicsDevice).
pub trait GraphicsDevice: Send + Sync {
    /// Create a buffer
    ///
    /// # Arguments
    ///
    /// * `desc` - Buffer descriptor
    ///
    /// # Returns
    ///
    /// A shared pointer to the created buffer
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create an image and upload its pixel data
    ///
    /// # Arguments
    ///
    /// * `desc` - Image descriptor, including the pixels for mip level 0
    ///
    /// # Returns
    ///
    /// A shared pointer to the created image
    fn create_image(&mut self, desc: ImageDesc) -> Result<Arc<dyn Image>>;

    /// Create an image view
    ///
    /// # Arguments
    ///
    /// * `desc` - Image view descriptor
    ///
    /// # Returns
    ///
    /// A shared pointer to the created image view
    fn create_image_view(&self, desc: ImageViewDesc) -> Result<Arc<dyn ImageView>>;

    /// Create a sampler
    ///
    /// # Arguments
    ///
    /// * `desc` - Sampler descriptor
    ///
    /// # Returns
    ///
    /// A shared pointer to the created sampler
    fn create_sampler(&mut self, desc: SamplerDesc) -> Result<Arc<dyn Sampler>>;

    /// Create a binding group
    ///
    /// Entry `i` of `resources` is bound at slot `i` of the given set.
    ///
    /// # Arguments
    ///
    /// * `set_index` - Descriptor set index the group binds to
    /// * `resources` - Resources in slot order
    ///
    /// # Returns
    ///
    /// A shared pointer to the created binding group
    fn create_binding_group(
        &self,
        set_index: u32,
        resources: &[BindingResource],
    ) -> Result<Arc<dyn BindingGroup>>;

    /// Create a command list for recording transfer commands
    ///
    /// # Returns
    ///
    /// A boxed command list
    fn create_command_list(&self) -> Result<Box<dyn CommandList>>;

    /// Submit command lists for execution on the GPU
    ///
    /// # Arguments
    ///
    /// * `commands` - Slice of command lists to submit
    fn submit(&self, commands: &[&dyn CommandList]) -> Result<()>;

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;
}
