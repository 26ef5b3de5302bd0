//! Image and image view traits and descriptors.

use std::sync::Arc;

/// Sampled image pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum ImageFormat {
    // 8-bit normalized
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,

    // 16-bit normalized
    R16_UNORM,
    R16G16_UNORM,
    R16G16B16A16_UNORM,

    // Float (HDR environment maps, BRDF lookup)
    R32G32B32A32_SFLOAT,
}

impl ImageFormat {
    /// Returns size in bytes for one pixel
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            ImageFormat::R8_UNORM => 1,
            ImageFormat::R8G8_UNORM | ImageFormat::R16_UNORM => 2,
            ImageFormat::R8G8B8A8_UNORM | ImageFormat::R8G8B8A8_SRGB | ImageFormat::R16G16_UNORM => 4,
            ImageFormat::R16G16B16A16_UNORM => 8,
            ImageFormat::R32G32B32A32_SFLOAT => 16,
        }
    }
}

/// Descriptor for creating an image
///
/// Pixel data is uploaded at creation time; images are immutable afterwards.
#[derive(Debug, Clone)]
pub struct ImageDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: ImageFormat,
    /// Number of mip levels (1 = no mipmaps)
    pub mip_levels: u32,
    /// Raw pixels for mip level 0, tightly packed rows
    pub data: Vec<u8>,
}

/// Read-only properties of a created image.
///
/// Returned by `Image::info()` to query image properties
/// without exposing backend-specific details.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: ImageFormat,
    /// Number of mip levels
    pub mip_levels: u32,
}

/// Image resource trait
///
/// Implemented by backend-specific image types (e.g., VulkanImage).
/// The image is automatically destroyed when dropped.
pub trait Image: Send + Sync {
    /// Get the read-only properties of this image
    fn info(&self) -> &ImageInfo;
}

/// Descriptor for creating an image view
#[derive(Clone)]
pub struct ImageViewDesc {
    /// The image this view covers (whole image, all mip levels)
    pub image: Arc<dyn Image>,
}

/// Image view trait
///
/// A shader-visible window onto an image. Binding groups reference views,
/// never images directly.
pub trait ImageView: Send + Sync {
    /// The image this view was created from
    fn image(&self) -> &Arc<dyn Image>;
}
