//! Buffer trait, usage flags and element formats.

use bitflags::bitflags;

use crate::error::Result;

bitflags! {
    /// Buffer usage flags
    ///
    /// Usages combine: a mesh buffer that receives staged uploads is
    /// `VERTEX | INDEX | TRANSFER_DST`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BufferUsage: u32 {
        /// Vertex buffer
        const VERTEX = 1 << 0;
        /// Index buffer
        const INDEX = 1 << 1;
        /// Uniform/constant buffer
        const UNIFORM = 1 << 2;
        /// Storage buffer
        const STORAGE = 1 << 3;
        /// Source of copy commands
        const TRANSFER_SRC = 1 << 4;
        /// Destination of copy commands
        const TRANSFER_DST = 1 << 5;
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Buffer usage
    pub usage: BufferUsage,
}

/// Buffer data format for vertex attributes
///
/// Defines the data type and component count for buffer elements.
/// Used for vertex attributes (position, normal, UV, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    // Float formats (vertex attributes)
    R32_SFLOAT,          // float (4 bytes)
    R32G32_SFLOAT,       // vec2 (8 bytes)
    R32G32B32_SFLOAT,    // vec3 (12 bytes)
    R32G32B32A32_SFLOAT, // vec4 (16 bytes)

    // Integer formats (signed)
    R32_SINT,
    R32G32_SINT,
    R32G32B32_SINT,
    R32G32B32A32_SINT,

    // Integer formats (unsigned)
    R32_UINT,
    R32G32_UINT,
    R32G32B32_UINT,
    R32G32B32A32_UINT,

    // Short formats (signed)
    R16_SINT,
    R16G16_SINT,
    R16G16B16_SINT,
    R16G16B16A16_SINT,

    // Short formats (unsigned)
    R16_UINT,
    R16G16_UINT,
    R16G16B16_UINT,
    R16G16B16A16_UINT,

    // Short formats (signed normalized)
    R16_SNORM,
    R16G16_SNORM,
    R16G16B16_SNORM,
    R16G16B16A16_SNORM,

    // Short formats (unsigned normalized)
    R16_UNORM,
    R16G16_UNORM,
    R16G16B16_UNORM,
    R16G16B16A16_UNORM,

    // Byte formats (signed)
    R8_SINT,
    R8G8_SINT,
    R8G8B8_SINT,
    R8G8B8A8_SINT,

    // Byte formats (unsigned)
    R8_UINT,
    R8G8_UINT,
    R8G8B8_UINT,
    R8G8B8A8_UINT,

    // Byte formats (signed normalized)
    R8_SNORM,
    R8G8_SNORM,
    R8G8B8_SNORM,
    R8G8B8A8_SNORM,

    // Byte formats (unsigned normalized)
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8_UNORM,
    R8G8B8A8_UNORM,
}

impl BufferFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        match self {
            // Float and integer formats (32-bit components)
            BufferFormat::R32_SFLOAT | BufferFormat::R32_SINT | BufferFormat::R32_UINT => 4,
            BufferFormat::R32G32_SFLOAT | BufferFormat::R32G32_SINT | BufferFormat::R32G32_UINT => 8,
            BufferFormat::R32G32B32_SFLOAT
            | BufferFormat::R32G32B32_SINT
            | BufferFormat::R32G32B32_UINT => 12,
            BufferFormat::R32G32B32A32_SFLOAT
            | BufferFormat::R32G32B32A32_SINT
            | BufferFormat::R32G32B32A32_UINT => 16,

            // Short formats
            BufferFormat::R16_SINT
            | BufferFormat::R16_UINT
            | BufferFormat::R16_SNORM
            | BufferFormat::R16_UNORM => 2,
            BufferFormat::R16G16_SINT
            | BufferFormat::R16G16_UINT
            | BufferFormat::R16G16_SNORM
            | BufferFormat::R16G16_UNORM => 4,
            BufferFormat::R16G16B16_SINT
            | BufferFormat::R16G16B16_UINT
            | BufferFormat::R16G16B16_SNORM
            | BufferFormat::R16G16B16_UNORM => 6,
            BufferFormat::R16G16B16A16_SINT
            | BufferFormat::R16G16B16A16_UINT
            | BufferFormat::R16G16B16A16_SNORM
            | BufferFormat::R16G16B16A16_UNORM => 8,

            // Byte formats
            BufferFormat::R8_SINT
            | BufferFormat::R8_UINT
            | BufferFormat::R8_SNORM
            | BufferFormat::R8_UNORM => 1,
            BufferFormat::R8G8_SINT
            | BufferFormat::R8G8_UINT
            | BufferFormat::R8G8_SNORM
            | BufferFormat::R8G8_UNORM => 2,
            BufferFormat::R8G8B8_SINT
            | BufferFormat::R8G8B8_UINT
            | BufferFormat::R8G8B8_SNORM
            | BufferFormat::R8G8B8_UNORM => 3,
            BufferFormat::R8G8B8A8_SINT
            | BufferFormat::R8G8B8A8_UINT
            | BufferFormat::R8G8B8A8_SNORM
            | BufferFormat::R8G8B8A8_UNORM => 4,
        }
    }

    /// Returns the number of components (1 for scalar, 2-4 for vectors)
    pub fn component_count(&self) -> u32 {
        match self {
            BufferFormat::R32_SFLOAT
            | BufferFormat::R32_SINT
            | BufferFormat::R32_UINT
            | BufferFormat::R16_SINT
            | BufferFormat::R16_UINT
            | BufferFormat::R16_SNORM
            | BufferFormat::R16_UNORM
            | BufferFormat::R8_SINT
            | BufferFormat::R8_UINT
            | BufferFormat::R8_SNORM
            | BufferFormat::R8_UNORM => 1,
            BufferFormat::R32G32_SFLOAT
            | BufferFormat::R32G32_SINT
            | BufferFormat::R32G32_UINT
            | BufferFormat::R16G16_SINT
            | BufferFormat::R16G16_UINT
            | BufferFormat::R16G16_SNORM
            | BufferFormat::R16G16_UNORM
            | BufferFormat::R8G8_SINT
            | BufferFormat::R8G8_UINT
            | BufferFormat::R8G8_SNORM
            | BufferFormat::R8G8_UNORM => 2,
            BufferFormat::R32G32B32_SFLOAT
            | BufferFormat::R32G32B32_SINT
            | BufferFormat::R32G32B32_UINT
            | BufferFormat::R16G16B16_SINT
            | BufferFormat::R16G16B16_UINT
            | BufferFormat::R16G16B16_SNORM
            | BufferFormat::R16G16B16_UNORM
            | BufferFormat::R8G8B8_SINT
            | BufferFormat::R8G8B8_UINT
            | BufferFormat::R8G8B8_SNORM
            | BufferFormat::R8G8B8_UNORM => 3,
            BufferFormat::R32G32B32A32_SFLOAT
            | BufferFormat::R32G32B32A32_SINT
            | BufferFormat::R32G32B32A32_UINT
            | BufferFormat::R16G16B16A16_SINT
            | BufferFormat::R16G16B16A16_UINT
            | BufferFormat::R16G16B16A16_SNORM
            | BufferFormat::R16G16B16A16_UNORM
            | BufferFormat::R8G8B8A8_SINT
            | BufferFormat::R8G8B8A8_UINT
            | BufferFormat::R8G8B8A8_SNORM
            | BufferFormat::R8G8B8A8_UNORM => 4,
        }
    }
}

/// Index element type for indexed meshes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit unsigned indices
    U16,
    /// 32-bit unsigned indices
    U32,
}

impl IndexType {
    /// Returns size in bytes for one index
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types (e.g., VulkanBuffer).
/// The buffer is automatically destroyed when dropped.
pub trait Buffer: Send + Sync {
    /// Total size of the buffer in bytes
    fn size(&self) -> u64;

    /// Update buffer data
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset into the buffer in bytes
    /// * `data` - Data to write
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    /// Raw pointer to persistently mapped memory
    ///
    /// Returns None if the buffer is not CPU-accessible (device-local only).
    /// The pointer remains valid for the lifetime of the buffer.
    fn mapped_ptr(&self) -> Option<*mut u8>;
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
