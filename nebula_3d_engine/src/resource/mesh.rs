//! Resource-level mesh types.
//!
//! A `MeshData` owns the single GPU buffer holding a mesh's repacked
//! geometry plus the vertex binding layout derived from its attribute
//! channel set. A `Mesh` references one MeshData and an ordered sequence of
//! `PrimitiveBatch` drawable slices into that buffer.
//!
//! # Hierarchy
//!
//! ```text
//! Mesh "helmet"
//! ├── mesh_data (shared, content-keyed in the cache)
//! │   ├── buffer (indices + positions + packed attributes, per primitive)
//! │   └── vertex_layout (position binding + optional attributes binding)
//! └── primitives
//!     ├── PrimitiveBatch { material, views, counts, bounding box }
//!     └── ...
//! ```

use std::sync::Arc;

use glam::Vec3;

use crate::graphics_device::{
    Buffer, IndexType, VertexAttribute, VertexBinding, VertexInputRate, VertexLayout,
};
use crate::graphics_device::BufferFormat;
use super::cache::ResourceCache;
use super::material::Material;
use super::vertex::VertexAttributeFlags;

// ===== AABB =====

/// Axis-aligned bounding box in mesh-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any merged point will collapse onto
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Box from explicit corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Grow the box to contain a point
    pub fn merge_point(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// Whether the box has collapsed onto no points
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }
}

// ===== BUFFER RANGE =====

/// A byte range view into the shared MeshData buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferRange {
    /// Offset from the start of the buffer in bytes
    pub offset: u64,
    /// Size in bytes
    pub size: u64,
}

// ===== MESH DATA =====

/// One GPU buffer of repacked geometry plus the derived vertex layout.
///
/// Binding 0 is the mandatory planar position stream (location 0, vec3
/// f32). Binding 1 exists only when the channel set is non-empty and packs
/// the optional channels in declared order at their fixed locations.
pub struct MeshData {
    buffer: Arc<dyn Buffer>,
    attributes: VertexAttributeFlags,
    vertex_layout: VertexLayout,
}

impl MeshData {
    /// Wrap a repacked geometry buffer, deriving the vertex layout from the
    /// attribute channel set
    pub fn new(buffer: Arc<dyn Buffer>, attributes: VertexAttributeFlags) -> Self {
        let vertex_layout = Self::build_layout(attributes);
        Self {
            buffer,
            attributes,
            vertex_layout,
        }
    }

    fn build_layout(attributes: VertexAttributeFlags) -> VertexLayout {
        let mut layout = VertexLayout::default();

        // Binding 0: planar positions
        layout.bindings.push(VertexBinding {
            binding: 0,
            stride: BufferFormat::R32G32B32_SFLOAT.size_bytes(),
            input_rate: VertexInputRate::Vertex,
        });
        layout.attributes.push(VertexAttribute {
            location: 0,
            binding: 0,
            format: BufferFormat::R32G32B32_SFLOAT,
            offset: 0,
        });

        // Binding 1: packed optional channels in declared order
        if !attributes.is_empty() {
            layout.bindings.push(VertexBinding {
                binding: 1,
                stride: attributes.packed_stride(),
                input_rate: VertexInputRate::Vertex,
            });
            let mut offset = 0;
            for channel in attributes.channels() {
                let format = VertexAttributeFlags::channel_format(channel);
                layout.attributes.push(VertexAttribute {
                    location: VertexAttributeFlags::channel_location(channel),
                    binding: 1,
                    format,
                    offset,
                });
                offset += format.size_bytes();
            }
        }

        layout
    }

    /// The shared geometry buffer
    pub fn buffer(&self) -> &Arc<dyn Buffer> {
        &self.buffer
    }

    /// Channels present in the packed attribute binding
    pub fn attributes(&self) -> VertexAttributeFlags {
        self.attributes
    }

    /// Vertex binding layout for pipeline creation
    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }
}

// ===== PRIMITIVE BATCH =====

/// One drawable slice of a mesh: a material plus buffer views into the
/// shared MeshData buffer.
pub struct PrimitiveBatch {
    material: Arc<dyn Material>,
    index_range: BufferRange,
    position_range: BufferRange,
    attribute_range: Option<BufferRange>,
    index_type: IndexType,
    index_count: u32,
    vertex_count: u32,
    bounding_box: Aabb,
}

impl PrimitiveBatch {
    /// Assemble a batch from its resolved material and precomputed views
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        material: Arc<dyn Material>,
        index_range: BufferRange,
        position_range: BufferRange,
        attribute_range: Option<BufferRange>,
        index_type: IndexType,
        index_count: u32,
        vertex_count: u32,
        bounding_box: Aabb,
    ) -> Self {
        Self {
            material,
            index_range,
            position_range,
            attribute_range,
            index_type,
            index_count,
            vertex_count,
            bounding_box,
        }
    }

    /// The material this batch draws with
    pub fn material(&self) -> &Arc<dyn Material> {
        &self.material
    }

    /// Index data view into the shared buffer
    pub fn index_range(&self) -> BufferRange {
        self.index_range
    }

    /// Position data view into the shared buffer
    pub fn position_range(&self) -> BufferRange {
        self.position_range
    }

    /// Packed attribute view (None when the mesh carries no optional channels)
    pub fn attribute_range(&self) -> Option<BufferRange> {
        self.attribute_range
    }

    /// Index element type
    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// Number of indices to draw
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Number of vertices the batch covers
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Bounding box in mesh-local space
    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }
}

// ===== MESH =====

/// A mesh: shared geometry data plus its ordered drawable batches.
///
/// A mesh loaded standalone (outside a scene load) owns a private
/// ResourceCache holding the child resources it alone created, so dropping
/// the mesh releases them automatically.
pub struct Mesh {
    name: Option<String>,
    mesh_data: Arc<MeshData>,
    primitives: Vec<PrimitiveBatch>,
    /// Child-resource cache for standalone loads; None for scene-owned meshes
    private_cache: Option<ResourceCache>,
}

impl Mesh {
    /// Create a scene-owned mesh (child resources live in the shared cache)
    pub fn new(
        name: Option<String>,
        mesh_data: Arc<MeshData>,
        primitives: Vec<PrimitiveBatch>,
    ) -> Self {
        Self {
            name,
            mesh_data,
            primitives,
            private_cache: None,
        }
    }

    /// Create a standalone mesh owning the cache of its child resources
    pub fn with_private_cache(
        name: Option<String>,
        mesh_data: Arc<MeshData>,
        primitives: Vec<PrimitiveBatch>,
        cache: ResourceCache,
    ) -> Self {
        Self {
            name,
            mesh_data,
            primitives,
            private_cache: Some(cache),
        }
    }

    /// Mesh name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The shared geometry data
    pub fn mesh_data(&self) -> &Arc<MeshData> {
        &self.mesh_data
    }

    /// Drawable batches in source primitive order
    pub fn primitives(&self) -> &[PrimitiveBatch] {
        &self.primitives
    }

    /// Number of drawable batches
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Bounding box of the whole mesh (union of batch boxes)
    pub fn bounding_box(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for primitive in &self.primitives {
            bounds.merge_point(primitive.bounding_box.min);
            bounds.merge_point(primitive.bounding_box.max);
        }
        bounds
    }

    /// The private child-resource cache for standalone meshes
    pub fn private_cache(&self) -> Option<&ResourceCache> {
        self.private_cache.as_ref()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
