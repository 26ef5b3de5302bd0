//! External format mapping and raw accessor access.
//!
//! Maps glTF accessor component types, sampler filter/wrap enumerations and
//! decoded image pixel formats onto the graphics_device formats, and provides
//! the strided byte-level accessor reader the repacker copies from. The
//! addressing contract (buffer base + view offset + accessor offset, honoring
//! the view stride) is implemented here directly so it stays visible and
//! testable.

use gltf::accessor::{DataType, Dimensions};
use gltf::texture::{MagFilter, MinFilter, WrappingMode};

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{
    AddressMode, BufferFormat, Filter, ImageDesc, ImageFormat, IndexType, MipmapMode, SamplerDesc,
};

const SOURCE: &str = "nebula3d::AssetLoader";

// ===== VERTEX FORMATS =====

/// GPU vertex format for an accessor's component type, dimensions and
/// normalized flag.
///
/// Matrix dimensions never appear in vertex data and are rejected as
/// malformed input.
pub fn vertex_format(accessor: &gltf::Accessor) -> Result<BufferFormat> {
    let components = match accessor.dimensions() {
        Dimensions::Scalar => 1,
        Dimensions::Vec2 => 2,
        Dimensions::Vec3 => 3,
        Dimensions::Vec4 => 4,
        other => {
            engine_bail!(
                SOURCE,
                InvalidAsset,
                "accessor {}: unsupported vertex dimensions {:?}",
                accessor.index(),
                other
            );
        }
    };

    let format = match (accessor.data_type(), accessor.normalized(), components) {
        (DataType::F32, _, 1) => BufferFormat::R32_SFLOAT,
        (DataType::F32, _, 2) => BufferFormat::R32G32_SFLOAT,
        (DataType::F32, _, 3) => BufferFormat::R32G32B32_SFLOAT,
        (DataType::F32, _, 4) => BufferFormat::R32G32B32A32_SFLOAT,

        (DataType::U32, _, 1) => BufferFormat::R32_UINT,
        (DataType::U32, _, 2) => BufferFormat::R32G32_UINT,
        (DataType::U32, _, 3) => BufferFormat::R32G32B32_UINT,
        (DataType::U32, _, 4) => BufferFormat::R32G32B32A32_UINT,

        (DataType::U16, true, 1) => BufferFormat::R16_UNORM,
        (DataType::U16, true, 2) => BufferFormat::R16G16_UNORM,
        (DataType::U16, true, 3) => BufferFormat::R16G16B16_UNORM,
        (DataType::U16, true, 4) => BufferFormat::R16G16B16A16_UNORM,
        (DataType::U16, false, 1) => BufferFormat::R16_UINT,
        (DataType::U16, false, 2) => BufferFormat::R16G16_UINT,
        (DataType::U16, false, 3) => BufferFormat::R16G16B16_UINT,
        (DataType::U16, false, 4) => BufferFormat::R16G16B16A16_UINT,

        (DataType::I16, true, 1) => BufferFormat::R16_SNORM,
        (DataType::I16, true, 2) => BufferFormat::R16G16_SNORM,
        (DataType::I16, true, 3) => BufferFormat::R16G16B16_SNORM,
        (DataType::I16, true, 4) => BufferFormat::R16G16B16A16_SNORM,
        (DataType::I16, false, 1) => BufferFormat::R16_SINT,
        (DataType::I16, false, 2) => BufferFormat::R16G16_SINT,
        (DataType::I16, false, 3) => BufferFormat::R16G16B16_SINT,
        (DataType::I16, false, 4) => BufferFormat::R16G16B16A16_SINT,

        (DataType::U8, true, 1) => BufferFormat::R8_UNORM,
        (DataType::U8, true, 2) => BufferFormat::R8G8_UNORM,
        (DataType::U8, true, 3) => BufferFormat::R8G8B8_UNORM,
        (DataType::U8, true, 4) => BufferFormat::R8G8B8A8_UNORM,
        (DataType::U8, false, 1) => BufferFormat::R8_UINT,
        (DataType::U8, false, 2) => BufferFormat::R8G8_UINT,
        (DataType::U8, false, 3) => BufferFormat::R8G8B8_UINT,
        (DataType::U8, false, 4) => BufferFormat::R8G8B8A8_UINT,

        (DataType::I8, true, 1) => BufferFormat::R8_SNORM,
        (DataType::I8, true, 2) => BufferFormat::R8G8_SNORM,
        (DataType::I8, true, 3) => BufferFormat::R8G8B8_SNORM,
        (DataType::I8, true, 4) => BufferFormat::R8G8B8A8_SNORM,
        (DataType::I8, false, 1) => BufferFormat::R8_SINT,
        (DataType::I8, false, 2) => BufferFormat::R8G8_SINT,
        (DataType::I8, false, 3) => BufferFormat::R8G8B8_SINT,
        (DataType::I8, false, 4) => BufferFormat::R8G8B8A8_SINT,

        _ => {
            engine_bail!(
                SOURCE,
                InvalidAsset,
                "accessor {}: unsupported component combination {:?} x{}",
                accessor.index(),
                accessor.data_type(),
                components
            );
        }
    };
    Ok(format)
}

/// GPU index type for an index accessor.
///
/// 8-bit source indices widen to 16-bit during repacking; the widened type
/// is returned here so layout planning already accounts for the wider
/// elements.
pub fn index_type(accessor: &gltf::Accessor) -> Result<IndexType> {
    if accessor.dimensions() != Dimensions::Scalar {
        engine_bail!(
            SOURCE,
            InvalidAsset,
            "accessor {}: index accessor must be scalar, got {:?}",
            accessor.index(),
            accessor.dimensions()
        );
    }
    match accessor.data_type() {
        DataType::U8 | DataType::U16 => Ok(IndexType::U16),
        DataType::U32 => Ok(IndexType::U32),
        other => {
            engine_bail!(
                SOURCE,
                InvalidAsset,
                "accessor {}: unsupported index component type {:?}",
                accessor.index(),
                other
            );
        }
    }
}

// ===== SAMPLERS =====

/// Device sampler descriptor from the glTF filter/wrap enumerations.
///
/// Missing filters default to linear per the glTF specification; the W
/// address mode has no source counterpart and repeats.
pub fn sampler_desc(sampler: &gltf::texture::Sampler) -> SamplerDesc {
    let mag_filter = match sampler.mag_filter() {
        Some(MagFilter::Nearest) => Filter::Nearest,
        Some(MagFilter::Linear) | None => Filter::Linear,
    };
    let (min_filter, mipmap_mode) = match sampler.min_filter() {
        Some(MinFilter::Nearest) | Some(MinFilter::NearestMipmapNearest) => {
            (Filter::Nearest, MipmapMode::Nearest)
        }
        Some(MinFilter::NearestMipmapLinear) => (Filter::Nearest, MipmapMode::Linear),
        Some(MinFilter::LinearMipmapNearest) => (Filter::Linear, MipmapMode::Nearest),
        Some(MinFilter::Linear)
        | Some(MinFilter::LinearMipmapLinear)
        | None => (Filter::Linear, MipmapMode::Linear),
    };
    SamplerDesc {
        mag_filter,
        min_filter,
        mipmap_mode,
        address_mode_u: address_mode(sampler.wrap_s()),
        address_mode_v: address_mode(sampler.wrap_t()),
        address_mode_w: AddressMode::Repeat,
    }
}

fn address_mode(mode: WrappingMode) -> AddressMode {
    match mode {
        WrappingMode::Repeat => AddressMode::Repeat,
        WrappingMode::MirroredRepeat => AddressMode::MirroredRepeat,
        WrappingMode::ClampToEdge => AddressMode::ClampToEdge,
    }
}

// ===== IMAGES =====

/// Device image descriptor from decoded source pixels.
///
/// Three-channel sources expand to four channels with an opaque alpha on
/// upload (three-channel device formats are poorly supported). `srgb`
/// selects the sRGB form where one exists (8-bit RGBA); other formats upload
/// linear regardless.
pub fn image_desc(data: &gltf::image::Data, srgb: bool) -> Result<ImageDesc> {
    use gltf::image::Format;

    let (format, pixels) = match data.format {
        Format::R8 => (ImageFormat::R8_UNORM, data.pixels.clone()),
        Format::R8G8 => (ImageFormat::R8G8_UNORM, data.pixels.clone()),
        Format::R8G8B8 => {
            let mut pixels = Vec::with_capacity(data.pixels.len() / 3 * 4);
            for rgb in data.pixels.chunks_exact(3) {
                pixels.extend_from_slice(rgb);
                pixels.push(u8::MAX);
            }
            (rgba8_format(srgb), pixels)
        }
        Format::R8G8B8A8 => (rgba8_format(srgb), data.pixels.clone()),
        Format::R16 => (ImageFormat::R16_UNORM, data.pixels.clone()),
        Format::R16G16 => (ImageFormat::R16G16_UNORM, data.pixels.clone()),
        Format::R16G16B16 => {
            let mut pixels = Vec::with_capacity(data.pixels.len() / 6 * 8);
            for rgb in data.pixels.chunks_exact(6) {
                pixels.extend_from_slice(rgb);
                pixels.extend_from_slice(&u16::MAX.to_le_bytes());
            }
            (ImageFormat::R16G16B16A16_UNORM, pixels)
        }
        Format::R16G16B16A16 => (ImageFormat::R16G16B16A16_UNORM, data.pixels.clone()),
        Format::R32G32B32FLOAT => {
            let mut pixels = Vec::with_capacity(data.pixels.len() / 12 * 16);
            for rgb in data.pixels.chunks_exact(12) {
                pixels.extend_from_slice(rgb);
                pixels.extend_from_slice(&1.0f32.to_le_bytes());
            }
            (ImageFormat::R32G32B32A32_SFLOAT, pixels)
        }
        Format::R32G32B32A32FLOAT => (ImageFormat::R32G32B32A32_SFLOAT, data.pixels.clone()),
    };

    let expected = u64::from(data.width) * u64::from(data.height)
        * u64::from(format.bytes_per_pixel());
    if pixels.len() as u64 != expected {
        engine_bail!(
            SOURCE,
            InvalidAsset,
            "image {}x{} {:?}: expected {} pixel bytes, got {}",
            data.width,
            data.height,
            data.format,
            expected,
            pixels.len()
        );
    }

    Ok(ImageDesc {
        width: data.width,
        height: data.height,
        format,
        mip_levels: 1,
        data: pixels,
    })
}

fn rgba8_format(srgb: bool) -> ImageFormat {
    if srgb {
        ImageFormat::R8G8B8A8_SRGB
    } else {
        ImageFormat::R8G8B8A8_UNORM
    }
}

// ===== ACCESSOR READER =====

/// Raw strided view of one accessor's elements.
///
/// Resolves the element range once (buffer base + view offset + accessor
/// offset, honoring the view stride) with full bounds validation, then hands
/// out per-element byte slices. Sparse accessors and accessors without a
/// buffer view are unsupported and fatal.
pub struct AccessorReader<'a> {
    data: &'a [u8],
    stride: usize,
    element_size: usize,
    count: usize,
}

impl<'a> AccessorReader<'a> {
    /// Resolve an accessor against the source buffers
    pub fn new(accessor: &gltf::Accessor, buffers: &'a [gltf::buffer::Data]) -> Result<Self> {
        if accessor.sparse().is_some() {
            engine_bail!(
                SOURCE,
                InvalidAsset,
                "accessor {}: sparse accessors are not supported",
                accessor.index()
            );
        }
        let view = match accessor.view() {
            Some(view) => view,
            None => {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "accessor {}: accessor has no buffer view",
                    accessor.index()
                );
            }
        };

        let element_size = accessor.size();
        let stride = view.stride().unwrap_or(element_size);
        let count = accessor.count();
        let buffer_index = view.buffer().index();
        let buffer = match buffers.get(buffer_index) {
            Some(buffer) => buffer,
            None => {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "accessor {}: buffer {} not present in source data",
                    accessor.index(),
                    buffer_index
                );
            }
        };

        let base = view.offset() + accessor.offset();
        let length = if count == 0 {
            0
        } else {
            stride * (count - 1) + element_size
        };
        let data = match buffer.get(base..base + length) {
            Some(data) => data,
            None => {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "accessor {}: range {}..{} exceeds buffer {} ({} bytes)",
                    accessor.index(),
                    base,
                    base + length,
                    buffer_index,
                    buffer.len()
                );
            }
        };

        Ok(Self {
            data,
            stride,
            element_size,
            count,
        })
    }

    /// Number of elements
    pub fn count(&self) -> usize {
        self.count
    }

    /// Byte size of one element
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Raw bytes of one element
    pub fn element(&self, index: usize) -> &'a [u8] {
        let start = index * self.stride;
        &self.data[start..start + self.element_size]
    }
}

// ===== COMPONENT DECODING =====

/// Decode the leading `out.len()` components of one element into f32.
///
/// Integer components apply the normalized mapping when the accessor is
/// normalized (unsigned to [0, 1], signed to [-1, 1]).
pub fn read_components(bytes: &[u8], data_type: DataType, normalized: bool, out: &mut [f32]) {
    let size = data_type.size();
    for (index, value) in out.iter_mut().enumerate() {
        let b = &bytes[index * size..];
        *value = match data_type {
            DataType::F32 => f32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            DataType::U8 => {
                let v = f32::from(b[0]);
                if normalized {
                    v / 255.0
                } else {
                    v
                }
            }
            DataType::I8 => {
                let v = f32::from(b[0] as i8);
                if normalized {
                    (v / 127.0).max(-1.0)
                } else {
                    v
                }
            }
            DataType::U16 => {
                let v = f32::from(u16::from_le_bytes([b[0], b[1]]));
                if normalized {
                    v / 65535.0
                } else {
                    v
                }
            }
            DataType::I16 => {
                let v = f32::from(i16::from_le_bytes([b[0], b[1]]));
                if normalized {
                    (v / 32767.0).max(-1.0)
                } else {
                    v
                }
            }
            DataType::U32 => u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as f32,
        };
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
