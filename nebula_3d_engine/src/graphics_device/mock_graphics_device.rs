//! Mock GraphicsDevice for unit tests (no GPU required)
//!
//! Allows testing the resource cache, asset loader and parameter buffers
//! without a real GPU or graphics backend. Buffers are backed by host memory
//! so tests can read back exactly what the engine wrote; copies recorded on
//! a MockCommandList run immediately.

use std::cell::UnsafeCell;
use std::sync::{Arc, Mutex, Weak};

use crate::engine_bail;
use crate::error::{Error, Result};
use crate::graphics_device::{
    BindingGroup, BindingResource, Buffer, BufferCopy, BufferDesc, BufferUsage, CommandList,
    GraphicsDevice, Image, ImageDesc, ImageInfo, ImageView, ImageViewDesc, Sampler, SamplerDesc,
};

// ============================================================================
// Mock Buffer
// ============================================================================

/// Host storage chunk matching the alignment of the shader parameter
/// structs written through `mapped_ptr`
#[repr(C, align(16))]
#[derive(Clone, Copy)]
struct AlignedChunk([u8; 16]);

pub struct MockBuffer {
    pub size: u64,
    pub usage: BufferUsage,
    pub name: String,
    storage: UnsafeCell<Box<[AlignedChunk]>>,
}

// Tests touch each buffer from a single thread at a time; writes through
// `update`/`mapped_ptr` bypass the device mutex the same way a persistently
// mapped allocation would on a real backend.
unsafe impl Send for MockBuffer {}
unsafe impl Sync for MockBuffer {}

impl MockBuffer {
    pub fn new(size: u64, usage: BufferUsage, name: String) -> Self {
        let chunks = (size as usize).div_ceil(16);
        Self {
            size,
            usage,
            name,
            storage: UnsafeCell::new(vec![AlignedChunk([0; 16]); chunks].into_boxed_slice()),
        }
    }

    fn storage_ptr(&self) -> *mut u8 {
        unsafe { (*self.storage.get()).as_mut_ptr() as *mut u8 }
    }

    /// Copy of the current buffer contents
    pub fn contents(&self) -> Vec<u8> {
        unsafe { std::slice::from_raw_parts(self.storage_ptr(), self.size as usize).to_vec() }
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.size
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let end = match offset.checked_add(data.len() as u64) {
            Some(end) if end <= self.size => end,
            _ => {
                engine_bail!(
                    "nebula3d::mock",
                    InvalidArgument,
                    "update: write of {} bytes at offset {} exceeds buffer '{}' size {}",
                    data.len(),
                    offset,
                    self.name,
                    self.size
                );
            }
        };
        unsafe {
            let storage =
                std::slice::from_raw_parts_mut(self.storage_ptr(), self.size as usize);
            storage[offset as usize..end as usize].copy_from_slice(data);
        }
        Ok(())
    }

    fn mapped_ptr(&self) -> Option<*mut u8> {
        Some(self.storage_ptr())
    }
}

// ============================================================================
// Mock Image
// ============================================================================

pub struct MockImage {
    pub info: ImageInfo,
    pub name: String,
    /// Pixels handed over at creation time
    pub pixels: Vec<u8>,
}

impl MockImage {
    pub fn new(desc: ImageDesc, name: String) -> Self {
        Self {
            info: ImageInfo {
                width: desc.width,
                height: desc.height,
                format: desc.format,
                mip_levels: desc.mip_levels,
            },
            name,
            pixels: desc.data,
        }
    }
}

impl Image for MockImage {
    fn info(&self) -> &ImageInfo {
        &self.info
    }
}

// ============================================================================
// Mock ImageView
// ============================================================================

pub struct MockImageView {
    pub name: String,
    image: Arc<dyn Image>,
}

impl MockImageView {
    pub fn new(image: Arc<dyn Image>, name: String) -> Self {
        Self { name, image }
    }
}

impl ImageView for MockImageView {
    fn image(&self) -> &Arc<dyn Image> {
        &self.image
    }
}

// ============================================================================
// Mock Sampler
// ============================================================================

pub struct MockSampler {
    pub name: String,
    desc: SamplerDesc,
}

impl MockSampler {
    pub fn new(desc: SamplerDesc, name: String) -> Self {
        Self { name, desc }
    }
}

impl Sampler for MockSampler {
    fn desc(&self) -> &SamplerDesc {
        &self.desc
    }
}

// ============================================================================
// Mock BindingGroup
// ============================================================================

pub struct MockBindingGroup {
    pub name: String,
    pub set_index: u32,
    /// Variant name of the resource at each slot, in binding order
    pub slots: Vec<String>,
}

impl MockBindingGroup {
    pub fn new(name: String, set_index: u32, slots: Vec<String>) -> Self {
        Self {
            name,
            set_index,
            slots,
        }
    }
}

impl BindingGroup for MockBindingGroup {
    fn set_index(&self) -> u32 {
        self.set_index
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

pub struct MockCommandList {
    pub commands: Vec<String>,
    recording: bool,
}

impl MockCommandList {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            recording: false,
        }
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        if self.recording {
            engine_bail!("nebula3d::mock", BackendError, "begin: command list already recording");
        }
        self.recording = true;
        self.commands.push("begin".to_string());
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        if !self.recording {
            engine_bail!("nebula3d::mock", BackendError, "end: command list not recording");
        }
        self.recording = false;
        self.commands.push("end".to_string());
        Ok(())
    }

    // Copies run at record time so tests can inspect destination bytes.
    fn copy_buffer(&mut self, src: &dyn Buffer, dst: &dyn Buffer, regions: &[BufferCopy])
        -> Result<()>
    {
        if !self.recording {
            engine_bail!("nebula3d::mock", BackendError, "copy_buffer: command list not recording");
        }
        let src_ptr = match src.mapped_ptr() {
            Some(ptr) => ptr,
            None => {
                engine_bail!("nebula3d::mock", BackendError, "copy_buffer: source not host-visible");
            }
        };
        let dst_ptr = match dst.mapped_ptr() {
            Some(ptr) => ptr,
            None => {
                engine_bail!(
                    "nebula3d::mock",
                    BackendError,
                    "copy_buffer: destination not host-visible"
                );
            }
        };
        for region in regions {
            let src_ok = region
                .src_offset
                .checked_add(region.size)
                .is_some_and(|end| end <= src.size());
            let dst_ok = region
                .dst_offset
                .checked_add(region.size)
                .is_some_and(|end| end <= dst.size());
            if !src_ok || !dst_ok {
                engine_bail!(
                    "nebula3d::mock",
                    InvalidArgument,
                    "copy_buffer: region (src {} + {} / dst {} + {}) out of bounds (src size {}, dst size {})",
                    region.src_offset,
                    region.size,
                    region.dst_offset,
                    region.size,
                    src.size(),
                    dst.size()
                );
            }
            unsafe {
                std::ptr::copy_nonoverlapping(
                    src_ptr.add(region.src_offset as usize),
                    dst_ptr.add(region.dst_offset as usize),
                    region.size as usize,
                );
            }
        }
        self.commands.push(format!("copy_buffer x{}", regions.len()));
        Ok(())
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock GraphicsDevice that tracks created resources without GPU
pub struct MockGraphicsDevice {
    /// Track created buffers
    pub created_buffers: Arc<Mutex<Vec<String>>>,
    /// Track created images
    pub created_images: Arc<Mutex<Vec<String>>>,
    /// Track created image views
    pub created_image_views: Arc<Mutex<Vec<String>>>,
    /// Track created samplers
    pub created_samplers: Arc<Mutex<Vec<String>>>,
    /// Track created binding groups
    pub created_binding_groups: Arc<Mutex<Vec<String>>>,
    /// Slot kinds of each created binding group, in creation order
    pub binding_group_slots: Arc<Mutex<Vec<Vec<String>>>>,
    /// Number of command lists passed to each submit() call
    pub submits: Arc<Mutex<Vec<usize>>>,
    /// Number of wait_idle() calls
    pub wait_idle_calls: Arc<Mutex<u32>>,
    // Live-object registries for leak and rollback checks
    buffers: Arc<Mutex<Vec<Weak<MockBuffer>>>>,
    images: Arc<Mutex<Vec<Weak<MockImage>>>>,
    // Countdown failure injection (None = never fail)
    fail_buffer_creates_after: Arc<Mutex<Option<u32>>>,
    fail_image_creates_after: Arc<Mutex<Option<u32>>>,
}

impl MockGraphicsDevice {
    /// Create a new mock graphics device
    pub fn new() -> Self {
        Self {
            created_buffers: Arc::new(Mutex::new(Vec::new())),
            created_images: Arc::new(Mutex::new(Vec::new())),
            created_image_views: Arc::new(Mutex::new(Vec::new())),
            created_samplers: Arc::new(Mutex::new(Vec::new())),
            created_binding_groups: Arc::new(Mutex::new(Vec::new())),
            binding_group_slots: Arc::new(Mutex::new(Vec::new())),
            submits: Arc::new(Mutex::new(Vec::new())),
            wait_idle_calls: Arc::new(Mutex::new(0)),
            buffers: Arc::new(Mutex::new(Vec::new())),
            images: Arc::new(Mutex::new(Vec::new())),
            fail_buffer_creates_after: Arc::new(Mutex::new(None)),
            fail_image_creates_after: Arc::new(Mutex::new(None)),
        }
    }

    /// Get names of created buffers
    pub fn get_created_buffers(&self) -> Vec<String> {
        self.created_buffers.lock().unwrap().clone()
    }

    /// Get names of created images
    pub fn get_created_images(&self) -> Vec<String> {
        self.created_images.lock().unwrap().clone()
    }

    /// Get names of created image views
    pub fn get_created_image_views(&self) -> Vec<String> {
        self.created_image_views.lock().unwrap().clone()
    }

    /// Get names of created samplers
    pub fn get_created_samplers(&self) -> Vec<String> {
        self.created_samplers.lock().unwrap().clone()
    }

    /// Get names of created binding groups
    pub fn get_created_binding_groups(&self) -> Vec<String> {
        self.created_binding_groups.lock().unwrap().clone()
    }

    /// Get the slot kinds of each created binding group
    pub fn get_binding_group_slots(&self) -> Vec<Vec<String>> {
        self.binding_group_slots.lock().unwrap().clone()
    }

    /// Number of submit() calls so far
    pub fn submit_count(&self) -> usize {
        self.submits.lock().unwrap().len()
    }

    /// Number of wait_idle() calls so far
    pub fn wait_idle_count(&self) -> u32 {
        *self.wait_idle_calls.lock().unwrap()
    }

    /// The n-th created buffer, if it is still alive
    pub fn buffer_at(&self, index: usize) -> Option<Arc<MockBuffer>> {
        self.buffers.lock().unwrap().get(index).and_then(Weak::upgrade)
    }

    /// The n-th created image, if it is still alive
    pub fn image_at(&self, index: usize) -> Option<Arc<MockImage>> {
        self.images.lock().unwrap().get(index).and_then(Weak::upgrade)
    }

    /// Number of created buffers still referenced somewhere
    pub fn live_buffer_count(&self) -> usize {
        self.buffers
            .lock()
            .unwrap()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Number of created images still referenced somewhere
    pub fn live_image_count(&self) -> usize {
        self.images
            .lock()
            .unwrap()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Make a buffer creation fail: the next `n` creations succeed, the one
    /// after that returns OutOfMemory (n = 0 fails the very next creation).
    pub fn fail_buffer_create_after(&self, n: u32) {
        *self.fail_buffer_creates_after.lock().unwrap() = Some(n);
    }

    /// Make an image creation fail: the next `n` creations succeed, the one
    /// after that returns OutOfMemory (n = 0 fails the very next creation).
    pub fn fail_image_create_after(&self, n: u32) {
        *self.fail_image_creates_after.lock().unwrap() = Some(n);
    }

    fn should_fail(counter: &Mutex<Option<u32>>) -> bool {
        let mut guard = counter.lock().unwrap();
        match *guard {
            Some(0) => {
                *guard = None;
                true
            }
            Some(n) => {
                *guard = Some(n - 1);
                false
            }
            None => false,
        }
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffer(&mut self, desc: BufferDesc) -> Result<Arc<dyn Buffer>> {
        if Self::should_fail(&self.fail_buffer_creates_after) {
            return Err(Error::OutOfMemory);
        }
        if desc.size == 0 {
            engine_bail!("nebula3d::mock", InvalidArgument, "create_buffer: zero-size buffer");
        }
        let name = format!("buffer_{}", desc.size);
        self.created_buffers.lock().unwrap().push(name.clone());
        let buffer = Arc::new(MockBuffer::new(desc.size, desc.usage, name));
        self.buffers.lock().unwrap().push(Arc::downgrade(&buffer));
        Ok(buffer)
    }

    fn create_image(&mut self, desc: ImageDesc) -> Result<Arc<dyn Image>> {
        if Self::should_fail(&self.fail_image_creates_after) {
            return Err(Error::OutOfMemory);
        }
        let expected = u64::from(desc.width) * u64::from(desc.height)
            * u64::from(desc.format.bytes_per_pixel());
        if desc.mip_levels == 1 && desc.data.len() as u64 != expected {
            engine_bail!(
                "nebula3d::mock",
                InvalidArgument,
                "create_image: {}x{} {:?} expects {} bytes, got {}",
                desc.width,
                desc.height,
                desc.format,
                expected,
                desc.data.len()
            );
        }
        let name = format!("image_{}x{}", desc.width, desc.height);
        self.created_images.lock().unwrap().push(name.clone());
        let image = Arc::new(MockImage::new(desc, name));
        self.images.lock().unwrap().push(Arc::downgrade(&image));
        Ok(image)
    }

    fn create_image_view(&self, desc: ImageViewDesc) -> Result<Arc<dyn ImageView>> {
        let info = desc.image.info();
        let name = format!("view_{}x{}", info.width, info.height);
        self.created_image_views.lock().unwrap().push(name.clone());
        Ok(Arc::new(MockImageView::new(desc.image, name)))
    }

    fn create_sampler(&mut self, desc: SamplerDesc) -> Result<Arc<dyn Sampler>> {
        let name = format!("sampler_{:?}{:?}", desc.mag_filter, desc.address_mode_u);
        self.created_samplers.lock().unwrap().push(name.clone());
        Ok(Arc::new(MockSampler::new(desc, name)))
    }

    fn create_binding_group(
        &self,
        set_index: u32,
        resources: &[BindingResource],
    ) -> Result<Arc<dyn BindingGroup>> {
        if resources.is_empty() {
            engine_bail!("nebula3d::mock", InvalidArgument, "create_binding_group: no resources");
        }
        let slots: Vec<String> = resources
            .iter()
            .map(|resource| match resource {
                BindingResource::UniformBuffer { .. } => "uniform_buffer".to_string(),
                BindingResource::StorageBuffer(_) => "storage_buffer".to_string(),
                BindingResource::Sampler(_) => "sampler".to_string(),
                BindingResource::SampledImage(_) => "sampled_image".to_string(),
                BindingResource::SamplerArray(samplers) => {
                    format!("sampler_array[{}]", samplers.len())
                }
                BindingResource::SampledImageArray(views) => {
                    format!("sampled_image_array[{}]", views.len())
                }
            })
            .collect();
        let name = format!("binding_group_set{}", set_index);
        self.created_binding_groups.lock().unwrap().push(name.clone());
        self.binding_group_slots.lock().unwrap().push(slots.clone());
        Ok(Arc::new(MockBindingGroup::new(name, set_index, slots)))
    }

    fn create_command_list(&self) -> Result<Box<dyn CommandList>> {
        Ok(Box::new(MockCommandList::new()))
    }

    fn submit(&self, commands: &[&dyn CommandList]) -> Result<()> {
        self.submits.lock().unwrap().push(commands.len());
        Ok(())
    }

    fn wait_idle(&self) -> Result<()> {
        *self.wait_idle_calls.lock().unwrap() += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
