//! CommandList trait - for recording GPU commands.

use crate::error::Result;
use crate::graphics_device::Buffer;

/// A buffer-to-buffer copy region
#[derive(Debug, Clone, Copy)]
pub struct BufferCopy {
    /// Offset into the source buffer in bytes
    pub src_offset: u64,
    /// Offset into the destination buffer in bytes
    pub dst_offset: u64,
    /// Number of bytes to copy
    pub size: u64,
}

/// Command list for recording transfer commands
///
/// Commands are recorded and later submitted to the GPU via
/// GraphicsDevice::submit()
pub trait CommandList: Send + Sync {
    /// Begin recording commands
    fn begin(&mut self) -> Result<()>;

    /// End recording commands
    fn end(&mut self) -> Result<()>;

    /// Copy regions from one buffer to another
    ///
    /// # Arguments
    ///
    /// * `src` - Source buffer
    /// * `dst` - Destination buffer
    /// * `regions` - Copy regions (offsets and sizes in bytes)
    fn copy_buffer(&mut self, src: &dyn Buffer, dst: &dyn Buffer, regions: &[BufferCopy])
        -> Result<()>;
}
