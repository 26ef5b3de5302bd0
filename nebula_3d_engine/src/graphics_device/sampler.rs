//! Sampler trait and descriptor.

/// Texture filtering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Nearest-neighbor filtering
    Nearest,
    /// Linear interpolation
    Linear,
}

/// Mipmap level selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MipmapMode {
    /// Pick the nearest mip level
    Nearest,
    /// Blend between adjacent mip levels
    Linear,
}

/// Texture coordinate addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    /// Tile the texture
    Repeat,
    /// Tile with every other repetition mirrored
    MirroredRepeat,
    /// Clamp to the edge texel
    ClampToEdge,
}

/// Descriptor for creating a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerDesc {
    /// Magnification filter
    pub mag_filter: Filter,
    /// Minification filter
    pub min_filter: Filter,
    /// Mipmap selection mode
    pub mipmap_mode: MipmapMode,
    /// Addressing for the U coordinate
    pub address_mode_u: AddressMode,
    /// Addressing for the V coordinate
    pub address_mode_v: AddressMode,
    /// Addressing for the W coordinate
    pub address_mode_w: AddressMode,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            mag_filter: Filter::Linear,
            min_filter: Filter::Linear,
            mipmap_mode: MipmapMode::Linear,
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            address_mode_w: AddressMode::Repeat,
        }
    }
}

/// Sampler resource trait
///
/// Implemented by backend-specific sampler types (e.g., VulkanSampler).
/// The sampler is automatically destroyed when dropped.
pub trait Sampler: Send + Sync {
    /// The descriptor this sampler was created from
    fn desc(&self) -> &SamplerDesc;
}
