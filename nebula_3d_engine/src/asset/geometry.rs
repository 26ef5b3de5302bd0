//! Geometry repacking into single per-mesh GPU buffers.
//!
//! A mesh's primitives repack into one combined buffer: per primitive the
//! 4-byte-aligned index bytes, then the planar position bytes, then the
//! packed optional-attribute bytes (texcoord/normal/tangent/color in declared
//! order). The layout is precomputed ([`GeometryLayout::plan`]) so that cache
//! hits on shared geometry can reconstruct per-primitive views without
//! touching pixel data, and so that the staging fill ([`GeometryLayout::pack`])
//! can verify every section lands exactly on its planned offsets.
//!
//! Absent index data is synthesized as sequential indices with the narrowest
//! width; 8-bit source indices widen to 16-bit. A primitive missing a packed
//! channel zero-fills its region; a channel whose accessor format differs
//! from earlier primitives of the same mesh is malformed input.

use std::sync::{Arc, Mutex};

use glam::Vec3;
use gltf::accessor::{DataType, Dimensions};
use gltf::Semantic;
use rustc_hash::FxHashMap;

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferCopy, BufferDesc, BufferUsage, GraphicsDevice, IndexType,
};
use crate::resource::mesh::{Aabb, BufferRange};
use crate::resource::vertex::VertexAttributeFlags;
use super::format::{self, AccessorReader};

const SOURCE: &str = "nebula3d::AssetLoader";

/// Alignment of every section inside the combined buffer
const SECTION_ALIGNMENT: u64 = 4;

fn align_up(value: u64) -> u64 {
    (value + (SECTION_ALIGNMENT - 1)) & !(SECTION_ALIGNMENT - 1)
}

/// Source semantic carrying a packed channel (set index 0 for multi-set
/// semantics)
fn channel_semantic(channel: VertexAttributeFlags) -> Semantic {
    match channel {
        VertexAttributeFlags::TEXCOORD => Semantic::TexCoords(0),
        VertexAttributeFlags::NORMAL => Semantic::Normals,
        VertexAttributeFlags::TANGENT => Semantic::Tangents,
        VertexAttributeFlags::COLOR => Semantic::Colors(0),
        _ => unreachable!("channel_semantic takes a single channel flag"),
    }
}

// ===== CHANNEL RESOLUTION =====

/// Channels present in one primitive's source data
pub fn present_channels(primitive: &gltf::Primitive) -> VertexAttributeFlags {
    let mut flags = VertexAttributeFlags::empty();
    for channel in VertexAttributeFlags::CHANNEL_ORDER {
        if primitive.get(&channel_semantic(channel)).is_some() {
            flags |= channel;
        }
    }
    flags
}

/// Channel set a mesh's packed binding carries: the consuming materials'
/// required mask intersected with the union of channels any primitive
/// provides.
pub fn resolve_channels(mesh: &gltf::Mesh, required: VertexAttributeFlags) -> VertexAttributeFlags {
    let mut present = VertexAttributeFlags::empty();
    for primitive in mesh.primitives() {
        present |= present_channels(&primitive);
    }
    required & present
}

/// Every accessor index a mesh's primitives reference (indices plus
/// attributes, unsorted, possibly with duplicates). Input to the content
/// id hash.
pub fn collect_accessor_indices(mesh: &gltf::Mesh) -> Vec<u32> {
    let mut indices = Vec::new();
    for primitive in mesh.primitives() {
        if let Some(accessor) = primitive.indices() {
            indices.push(accessor.index() as u32);
        }
        for (_, accessor) in primitive.attributes() {
            indices.push(accessor.index() as u32);
        }
    }
    indices
}

// ===== LAYOUT =====

/// Precomputed views of one primitive inside the combined buffer
pub struct PrimitiveGeometry {
    /// Index section view
    pub index_range: BufferRange,
    /// Planar position section view
    pub position_range: BufferRange,
    /// Packed attribute section view (None when the mesh carries no channels)
    pub attribute_range: Option<BufferRange>,
    /// Index element type after widening
    pub index_type: IndexType,
    /// Number of indices to draw
    pub index_count: u32,
    /// Number of vertices
    pub vertex_count: u32,
    /// Bounding box from source min/max, or accumulated from the positions
    pub bounding_box: Aabb,
    /// No source index accessor; sequential indices are synthesized
    synthesized_indices: bool,
}

/// Combined-buffer layout of one mesh: section offsets per primitive plus
/// the resolved channel set and total staging size.
pub struct GeometryLayout {
    channels: VertexAttributeFlags,
    total_size: u64,
    primitives: Vec<PrimitiveGeometry>,
}

impl GeometryLayout {
    /// Plan the combined-buffer layout for a mesh.
    ///
    /// Validates topology, position accessors, channel format consistency
    /// and accessor addressing, so a successful plan guarantees `pack` can
    /// only fail on a layout invariant.
    pub fn plan(
        mesh: &gltf::Mesh,
        channels: VertexAttributeFlags,
        buffers: &[gltf::buffer::Data],
    ) -> Result<Self> {
        // Per-channel (data type, dimensions, normalized) of the first
        // primitive providing it; later primitives must match.
        let mut channel_signatures: FxHashMap<u32, (DataType, Dimensions, bool)> =
            FxHashMap::default();
        let mut primitives = Vec::new();
        let mut cursor = 0u64;

        for (primitive_index, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "mesh {} primitive {}: unsupported topology {:?}",
                    mesh.index(),
                    primitive_index,
                    primitive.mode()
                );
            }

            let positions = match primitive.get(&Semantic::Positions) {
                Some(accessor) => accessor,
                None => {
                    engine_bail!(
                        SOURCE,
                        InvalidAsset,
                        "mesh {} primitive {}: no position accessor",
                        mesh.index(),
                        primitive_index
                    );
                }
            };
            if positions.data_type() != DataType::F32
                || positions.dimensions() != Dimensions::Vec3
            {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "mesh {} primitive {}: positions must be float vec3, got {:?} {:?}",
                    mesh.index(),
                    primitive_index,
                    positions.data_type(),
                    positions.dimensions()
                );
            }
            let position_reader = AccessorReader::new(&positions, buffers)?;
            let vertex_count = position_reader.count();

            let bounding_box = match (json_vec3(positions.min()), json_vec3(positions.max())) {
                (Some(min), Some(max)) => Aabb::new(min, max),
                _ => accumulate_bounds(&position_reader),
            };

            let (index_type, index_count, synthesized_indices) = match primitive.indices() {
                Some(accessor) => {
                    let index_type = format::index_type(&accessor)?;
                    AccessorReader::new(&accessor, buffers)?;
                    (index_type, accessor.count() as u32, false)
                }
                None => {
                    let index_type = if vertex_count < 65536 {
                        IndexType::U16
                    } else {
                        IndexType::U32
                    };
                    (index_type, vertex_count as u32, true)
                }
            };

            for channel in channels.channels() {
                if let Some(accessor) = primitive.get(&channel_semantic(channel)) {
                    format::vertex_format(&accessor)?;
                    if accessor.count() != vertex_count {
                        engine_bail!(
                            SOURCE,
                            InvalidAsset,
                            "mesh {} primitive {}: channel {:?} has {} elements for {} vertices",
                            mesh.index(),
                            primitive_index,
                            channel,
                            accessor.count(),
                            vertex_count
                        );
                    }
                    let signature =
                        (accessor.data_type(), accessor.dimensions(), accessor.normalized());
                    match channel_signatures.get(&channel.bits()) {
                        Some(existing) if *existing != signature => {
                            engine_bail!(
                                SOURCE,
                                InvalidAsset,
                                "mesh {} primitive {}: channel {:?} format {:?} differs from earlier primitives ({:?})",
                                mesh.index(),
                                primitive_index,
                                channel,
                                signature,
                                existing
                            );
                        }
                        Some(_) => {}
                        None => {
                            channel_signatures.insert(channel.bits(), signature);
                        }
                    }
                    AccessorReader::new(&accessor, buffers)?;
                }
            }

            let index_size = u64::from(index_count) * u64::from(index_type.size_bytes());
            let index_range = BufferRange {
                offset: cursor,
                size: index_size,
            };
            cursor += align_up(index_size);

            let position_size = vertex_count as u64 * 12;
            let position_range = BufferRange {
                offset: cursor,
                size: position_size,
            };
            cursor += align_up(position_size);

            let attribute_range = if channels.is_empty() {
                None
            } else {
                let size = vertex_count as u64 * u64::from(channels.packed_stride());
                let range = BufferRange {
                    offset: cursor,
                    size,
                };
                cursor += align_up(size);
                Some(range)
            };

            primitives.push(PrimitiveGeometry {
                index_range,
                position_range,
                attribute_range,
                index_type,
                index_count,
                vertex_count: vertex_count as u32,
                bounding_box,
                synthesized_indices,
            });
        }

        if cursor == 0 {
            engine_bail!(SOURCE, InvalidAsset, "mesh {}: no geometry data", mesh.index());
        }

        Ok(Self {
            channels,
            total_size: cursor,
            primitives,
        })
    }

    /// The resolved channel set
    pub fn channels(&self) -> VertexAttributeFlags {
        self.channels
    }

    /// Total combined-buffer size in bytes
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Per-primitive views in source primitive order
    pub fn primitives(&self) -> &[PrimitiveGeometry] {
        &self.primitives
    }

    /// Fill the combined staging bytes for this layout.
    ///
    /// Must be called with the same mesh and buffers the layout was planned
    /// from; any divergence between written sizes and the precomputed
    /// offsets aborts in development builds and surfaces as a layout
    /// mismatch otherwise.
    pub fn pack(&self, mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Result<Vec<u8>> {
        let mut staging = vec![0u8; self.total_size as usize];

        for ((primitive_index, primitive), plan) in
            mesh.primitives().enumerate().zip(&self.primitives)
        {
            let written = write_indices(&mut staging, plan, &primitive, buffers)?;
            if written != plan.index_range.size {
                debug_assert!(
                    false,
                    "index section size diverged from plan ({} vs {})",
                    written, plan.index_range.size
                );
                engine_bail!(
                    SOURCE,
                    LayoutMismatch,
                    "mesh {} primitive {}: wrote {} index bytes, planned {}",
                    mesh.index(),
                    primitive_index,
                    written,
                    plan.index_range.size
                );
            }

            let written = write_positions(&mut staging, plan, &primitive, buffers)?;
            if written != plan.position_range.size {
                debug_assert!(
                    false,
                    "position section size diverged from plan ({} vs {})",
                    written, plan.position_range.size
                );
                engine_bail!(
                    SOURCE,
                    LayoutMismatch,
                    "mesh {} primitive {}: wrote {} position bytes, planned {}",
                    mesh.index(),
                    primitive_index,
                    written,
                    plan.position_range.size
                );
            }

            if let Some(attribute_range) = plan.attribute_range {
                let written =
                    write_attributes(&mut staging, plan, &primitive, buffers, self.channels)?;
                if written != attribute_range.size {
                    debug_assert!(
                        false,
                        "attribute section size diverged from plan ({} vs {})",
                        written, attribute_range.size
                    );
                    engine_bail!(
                        SOURCE,
                        LayoutMismatch,
                        "mesh {} primitive {}: wrote {} attribute bytes, planned {}",
                        mesh.index(),
                        primitive_index,
                        written,
                        attribute_range.size
                    );
                }
            }
        }

        Ok(staging)
    }
}

// ===== SECTION WRITERS =====

fn write_indices(
    staging: &mut [u8],
    plan: &PrimitiveGeometry,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<u64> {
    let dst = &mut staging[plan.index_range.offset as usize..];
    let mut written = 0usize;

    if plan.synthesized_indices {
        match plan.index_type {
            IndexType::U16 => {
                for index in 0..plan.index_count {
                    dst[written..written + 2].copy_from_slice(&(index as u16).to_le_bytes());
                    written += 2;
                }
            }
            IndexType::U32 => {
                for index in 0..plan.index_count {
                    dst[written..written + 4].copy_from_slice(&index.to_le_bytes());
                    written += 4;
                }
            }
        }
        return Ok(written as u64);
    }

    let accessor = match primitive.indices() {
        Some(accessor) => accessor,
        None => {
            engine_bail!(
                SOURCE,
                LayoutMismatch,
                "planned indexed primitive has no index accessor"
            );
        }
    };
    let reader = AccessorReader::new(&accessor, buffers)?;
    match accessor.data_type() {
        // u8 widens to u16
        DataType::U8 => {
            for index in 0..reader.count() {
                let value = u16::from(reader.element(index)[0]);
                dst[written..written + 2].copy_from_slice(&value.to_le_bytes());
                written += 2;
            }
        }
        DataType::U16 | DataType::U32 => {
            let size = reader.element_size();
            for index in 0..reader.count() {
                dst[written..written + size].copy_from_slice(reader.element(index));
                written += size;
            }
        }
        other => {
            engine_bail!(
                SOURCE,
                LayoutMismatch,
                "planned index accessor has unexpected component type {:?}",
                other
            );
        }
    }
    Ok(written as u64)
}

fn write_positions(
    staging: &mut [u8],
    plan: &PrimitiveGeometry,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Result<u64> {
    let accessor = match primitive.get(&Semantic::Positions) {
        Some(accessor) => accessor,
        None => {
            engine_bail!(SOURCE, LayoutMismatch, "planned primitive has no position accessor");
        }
    };
    let reader = AccessorReader::new(&accessor, buffers)?;
    let dst = &mut staging[plan.position_range.offset as usize..];
    let mut written = 0usize;
    for index in 0..reader.count() {
        dst[written..written + 12].copy_from_slice(reader.element(index));
        written += 12;
    }
    Ok(written as u64)
}

fn write_attributes(
    staging: &mut [u8],
    plan: &PrimitiveGeometry,
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    channels: VertexAttributeFlags,
) -> Result<u64> {
    struct ChannelWriter<'a> {
        offset: usize,
        components: usize,
        source: Option<(AccessorReader<'a>, DataType, bool, usize)>,
    }

    let stride = channels.packed_stride() as usize;
    let mut writers = Vec::new();
    let mut offset = 0usize;
    for channel in channels.channels() {
        let channel_format = VertexAttributeFlags::channel_format(channel);
        let source = match primitive.get(&channel_semantic(channel)) {
            Some(accessor) => Some((
                AccessorReader::new(&accessor, buffers)?,
                accessor.data_type(),
                accessor.normalized(),
                dimension_components(accessor.dimensions()),
            )),
            // absent channel zero-fills its region
            None => None,
        };
        writers.push(ChannelWriter {
            offset,
            components: channel_format.component_count() as usize,
            source,
        });
        offset += channel_format.size_bytes() as usize;
    }

    let range_offset = match plan.attribute_range {
        Some(range) => range.offset as usize,
        None => return Ok(0),
    };
    let dst = &mut staging[range_offset..];

    for vertex in 0..plan.vertex_count as usize {
        let base = vertex * stride;
        for writer in &writers {
            let mut components = [0.0f32; 4];
            if let Some((reader, data_type, normalized, source_components)) = &writer.source {
                // vec3 colors take an opaque alpha
                if writer.components == 4 && *source_components == 3 {
                    components[3] = 1.0;
                }
                let decode = (*source_components).min(writer.components);
                format::read_components(
                    reader.element(vertex),
                    *data_type,
                    *normalized,
                    &mut components[..decode],
                );
            }
            for (index, value) in components[..writer.components].iter().enumerate() {
                let at = base + writer.offset + index * 4;
                dst[at..at + 4].copy_from_slice(&value.to_le_bytes());
            }
        }
    }

    Ok((plan.vertex_count as usize * stride) as u64)
}

fn dimension_components(dimensions: Dimensions) -> usize {
    match dimensions {
        Dimensions::Scalar => 1,
        Dimensions::Vec2 => 2,
        Dimensions::Vec3 => 3,
        Dimensions::Vec4 => 4,
        // rejected during planning
        _ => 0,
    }
}

// ===== BOUNDS =====

fn json_vec3(value: Option<gltf::json::Value>) -> Option<Vec3> {
    let value = value?;
    let array = value.as_array()?;
    if array.len() < 3 {
        return None;
    }
    let mut out = [0.0f32; 3];
    for (component, source) in out.iter_mut().zip(array) {
        *component = source.as_f64()? as f32;
    }
    Some(Vec3::from_array(out))
}

fn accumulate_bounds(positions: &AccessorReader) -> Aabb {
    let mut bounds = Aabb::EMPTY;
    for index in 0..positions.count() {
        let bytes = positions.element(index);
        bounds.merge_point(Vec3::new(
            f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            f32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
        ));
    }
    bounds
}

// ===== DEVICE UPLOAD =====

/// Copy staged geometry bytes into a newly allocated device-resident buffer.
///
/// The staging buffer is released when this function returns, success or
/// failure; the device buffer escapes only on success.
pub fn upload(
    graphics_device: &Arc<Mutex<dyn GraphicsDevice>>,
    bytes: &[u8],
) -> Result<Arc<dyn Buffer>> {
    let size = bytes.len() as u64;
    let mut device = graphics_device.lock().unwrap();

    let staging = device.create_buffer(BufferDesc {
        size,
        usage: BufferUsage::TRANSFER_SRC,
    })?;
    staging.update(0, bytes)?;

    let gpu = device.create_buffer(BufferDesc {
        size,
        usage: BufferUsage::VERTEX | BufferUsage::INDEX | BufferUsage::TRANSFER_DST,
    })?;

    let mut commands = device.create_command_list()?;
    commands.begin()?;
    commands.copy_buffer(
        staging.as_ref(),
        gpu.as_ref(),
        &[BufferCopy {
            src_offset: 0,
            dst_offset: 0,
            size,
        }],
    )?;
    commands.end()?;
    device.submit(&[commands.as_ref()])?;
    device.wait_idle()?;

    Ok(gpu)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
