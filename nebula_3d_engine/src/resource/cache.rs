//! Content-keyed resource cache.
//!
//! A load-session-scoped deduplication table, not an LRU: entries are never
//! evicted individually and memory is unbounded. One id→Arc map exists per
//! resource kind. Object ids are deterministic functions of source content
//! (see [`SessionIds`]), so repeated loads of the same source collapse onto
//! the same shared GPU objects.
//!
//! The cache also owns the capacity-bounded slot allocators for the
//! indirection arrays (material samplers, material textures, material
//! params): wrappers carry their assigned slot so renderers can fill the
//! fixed-size binding arrays.

use std::hash::Hasher;
use std::sync::Arc;

use rdst::RadixSort;
use rustc_hash::{FxHashMap, FxHasher};

use crate::engine_warn;
use crate::error::{Error, Result};
use crate::graphics_device;
use crate::shading::shader_types::{MAX_MATERIALS, MAX_MATERIAL_SAMPLERS, MAX_MATERIAL_TEXTURES};
use crate::utils::SlotAllocator;
use super::material::Material;
use super::mesh::{Mesh, MeshData};
use super::sampler::Sampler;
use super::texture::Texture;

const SOURCE: &str = "nebula3d::ResourceCache";

// ===== OBJECT IDS =====

/// Width of one per-kind id band within a load session.
///
/// Simple ids are `kind base + external index`; external indices must stay
/// below this stride for bands not to overlap.
pub const KIND_STRIDE: u64 = 1 << 20;

/// Number of stride-aligned bands reserved per load session (six kinds plus
/// headroom; session keys align to this whole block)
const SESSION_BANDS: u64 = 8;

/// Deterministic object ids for one load session.
///
/// The session key derives from the source name, aligned down to a
/// session-block boundary, so ids are stable for a file across repeated
/// loads and do not collide with ids from another file sharing the cache.
/// Simple kinds use `externalIndex + kindBaseOffset`; mesh-data ids hash
/// the sorted set of external accessor indices a mesh references, so
/// identical geometry under different mesh indices collapses to one entry.
#[derive(Debug, Clone, Copy)]
pub struct SessionIds {
    session_key: u64,
}

impl SessionIds {
    /// Derive the id bases for a source (file path or caller-supplied name)
    pub fn new(source_name: &str) -> Self {
        let mut hasher = FxHasher::default();
        hasher.write(source_name.as_bytes());
        let session_key = hasher.finish() & !(KIND_STRIDE * SESSION_BANDS - 1);
        Self { session_key }
    }

    fn kind_base(&self, kind_slot: u64) -> u64 {
        self.session_key + kind_slot * KIND_STRIDE
    }

    /// Id of an external sampler
    pub fn sampler_id(&self, index: usize) -> u64 {
        self.kind_base(0) + index as u64
    }

    /// Id of the session's shared default sampler (sources may omit one)
    pub fn default_sampler_id(&self) -> u64 {
        self.kind_base(0) + KIND_STRIDE - 1
    }

    /// Id of an external image
    pub fn image_id(&self, index: usize) -> u64 {
        self.kind_base(1) + index as u64
    }

    /// Id of an external texture
    pub fn texture_id(&self, index: usize) -> u64 {
        self.kind_base(2) + index as u64
    }

    /// Id of an external material
    pub fn material_id(&self, index: usize) -> u64 {
        self.kind_base(3) + index as u64
    }

    /// Id of the session's shared fallback material (for primitives without
    /// a source material)
    pub fn default_material_id(&self) -> u64 {
        self.kind_base(3) + KIND_STRIDE - 1
    }

    /// Id of an external mesh
    pub fn mesh_id(&self, index: usize) -> u64 {
        self.kind_base(5) + index as u64
    }

    /// Content id of a mesh's geometry: hash of the session key followed by
    /// the sorted, deduplicated set of accessor indices the mesh references.
    ///
    /// Sorting before hashing is load-bearing: accessor enumeration order
    /// varies between otherwise identical meshes, and an order-sensitive
    /// hash would make them miss the cache non-deterministically.
    pub fn mesh_data_id(&self, accessor_indices: &[u32]) -> u64 {
        let mut sorted = accessor_indices.to_vec();
        sorted.radix_sort_unstable();
        sorted.dedup();

        let mut hasher = FxHasher::default();
        hasher.write_u64(self.session_key);
        for index in sorted {
            hasher.write_u32(index);
        }
        hasher.finish()
    }
}

// ===== RESOURCE CACHE =====

/// Per-kind maps of object id → shared resource, plus the indirection slot
/// allocators.
///
/// Lookups are idempotent: repeated fetches for the same source object
/// return the same shared resource without re-creating GPU state. Inserting
/// under an occupied id keeps the live entry (a warning is logged when the
/// new object differs). Not internally synchronized; concurrent loads
/// sharing one cache must serialize externally.
pub struct ResourceCache {
    samplers: FxHashMap<u64, Arc<Sampler>>,
    images: FxHashMap<u64, Arc<dyn graphics_device::Image>>,
    textures: FxHashMap<u64, Arc<Texture>>,
    materials: FxHashMap<u64, Arc<dyn Material>>,
    mesh_datas: FxHashMap<u64, Arc<MeshData>>,
    meshes: FxHashMap<u64, Arc<Mesh>>,
    sampler_slots: SlotAllocator,
    texture_slots: SlotAllocator,
    material_slots: SlotAllocator,
}

impl ResourceCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self {
            samplers: FxHashMap::default(),
            images: FxHashMap::default(),
            textures: FxHashMap::default(),
            materials: FxHashMap::default(),
            mesh_datas: FxHashMap::default(),
            meshes: FxHashMap::default(),
            sampler_slots: SlotAllocator::new(MAX_MATERIAL_SAMPLERS),
            texture_slots: SlotAllocator::new(MAX_MATERIAL_TEXTURES),
            material_slots: SlotAllocator::new(MAX_MATERIALS),
        }
    }

    // ===== FIND =====

    /// Look up a cached sampler
    pub fn find_sampler(&self, id: u64) -> Option<Arc<Sampler>> {
        self.samplers.get(&id).cloned()
    }

    /// Look up a cached image
    pub fn find_image(&self, id: u64) -> Option<Arc<dyn graphics_device::Image>> {
        self.images.get(&id).cloned()
    }

    /// Look up a cached texture
    pub fn find_texture(&self, id: u64) -> Option<Arc<Texture>> {
        self.textures.get(&id).cloned()
    }

    /// Look up a cached material
    pub fn find_material(&self, id: u64) -> Option<Arc<dyn Material>> {
        self.materials.get(&id).cloned()
    }

    /// Look up a cached mesh-data
    pub fn find_mesh_data(&self, id: u64) -> Option<Arc<MeshData>> {
        self.mesh_datas.get(&id).cloned()
    }

    /// Look up a cached mesh
    pub fn find_mesh(&self, id: u64) -> Option<Arc<Mesh>> {
        self.meshes.get(&id).cloned()
    }

    // ===== CACHE =====

    /// Insert a sampler; an occupied id keeps the live entry
    pub fn cache_sampler(&mut self, id: u64, sampler: Arc<Sampler>) -> Arc<Sampler> {
        if let Some(existing) = self.samplers.get(&id) {
            if !Arc::ptr_eq(existing, &sampler) {
                engine_warn!(SOURCE, "cache_sampler: id {:#x} already live, keeping existing entry", id);
            }
            return Arc::clone(existing);
        }
        self.samplers.insert(id, Arc::clone(&sampler));
        sampler
    }

    /// Insert an image; an occupied id keeps the live entry
    pub fn cache_image(
        &mut self,
        id: u64,
        image: Arc<dyn graphics_device::Image>,
    ) -> Arc<dyn graphics_device::Image> {
        if let Some(existing) = self.images.get(&id) {
            if !Arc::ptr_eq(existing, &image) {
                engine_warn!(SOURCE, "cache_image: id {:#x} already live, keeping existing entry", id);
            }
            return Arc::clone(existing);
        }
        self.images.insert(id, Arc::clone(&image));
        image
    }

    /// Insert a texture; an occupied id keeps the live entry
    pub fn cache_texture(&mut self, id: u64, texture: Arc<Texture>) -> Arc<Texture> {
        if let Some(existing) = self.textures.get(&id) {
            if !Arc::ptr_eq(existing, &texture) {
                engine_warn!(SOURCE, "cache_texture: id {:#x} already live, keeping existing entry", id);
            }
            return Arc::clone(existing);
        }
        self.textures.insert(id, Arc::clone(&texture));
        texture
    }

    /// Insert a material; an occupied id keeps the live entry
    pub fn cache_material(&mut self, id: u64, material: Arc<dyn Material>) -> Arc<dyn Material> {
        if let Some(existing) = self.materials.get(&id) {
            if !Arc::ptr_eq(existing, &material) {
                engine_warn!(SOURCE, "cache_material: id {:#x} already live, keeping existing entry", id);
            }
            return Arc::clone(existing);
        }
        self.materials.insert(id, Arc::clone(&material));
        material
    }

    /// Insert a mesh-data; an occupied id keeps the live entry
    pub fn cache_mesh_data(&mut self, id: u64, mesh_data: Arc<MeshData>) -> Arc<MeshData> {
        if let Some(existing) = self.mesh_datas.get(&id) {
            if !Arc::ptr_eq(existing, &mesh_data) {
                engine_warn!(SOURCE, "cache_mesh_data: id {:#x} already live, keeping existing entry", id);
            }
            return Arc::clone(existing);
        }
        self.mesh_datas.insert(id, Arc::clone(&mesh_data));
        mesh_data
    }

    /// Insert a mesh; an occupied id keeps the live entry
    pub fn cache_mesh(&mut self, id: u64, mesh: Arc<Mesh>) -> Arc<Mesh> {
        if let Some(existing) = self.meshes.get(&id) {
            if !Arc::ptr_eq(existing, &mesh) {
                engine_warn!(SOURCE, "cache_mesh: id {:#x} already live, keeping existing entry", id);
            }
            return Arc::clone(existing);
        }
        self.meshes.insert(id, Arc::clone(&mesh));
        mesh
    }

    // ===== SLOT ALLOCATION =====

    /// Assign the next material sampler array slot.
    ///
    /// Exhaustion of the fixed array is a resource-exhaustion failure, fatal
    /// for the in-progress load.
    pub fn alloc_sampler_slot(&mut self) -> Result<u32> {
        Self::alloc_slot(&mut self.sampler_slots, "material sampler array")
    }

    /// Assign the next material texture array slot
    pub fn alloc_texture_slot(&mut self) -> Result<u32> {
        Self::alloc_slot(&mut self.texture_slots, "material texture array")
    }

    /// Assign the next material parameter array slot
    pub fn alloc_material_slot(&mut self) -> Result<u32> {
        Self::alloc_slot(&mut self.material_slots, "material parameter array")
    }

    fn alloc_slot(slots: &mut SlotAllocator, what: &str) -> Result<u32> {
        match slots.alloc() {
            Some(slot) => Ok(slot),
            None => {
                crate::engine_error!(
                    SOURCE,
                    "{} exhausted ({} slots)",
                    what,
                    slots.capacity()
                );
                Err(Error::OutOfMemory)
            }
        }
    }

    // ===== COUNTS =====

    /// Number of cached samplers
    pub fn sampler_count(&self) -> usize {
        self.samplers.len()
    }

    /// Number of cached images
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Number of cached textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of cached materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of cached mesh-datas
    pub fn mesh_data_count(&self) -> usize {
        self.mesh_datas.len()
    }

    /// Number of cached meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    // ===== TEARDOWN =====

    /// Drop every cached reference and release the indirection slots.
    ///
    /// GPU objects whose reference count reaches zero are destroyed by their
    /// Drop impls; objects still held elsewhere live on until their last
    /// holder releases them.
    pub fn destroy_all(&mut self) {
        self.samplers.clear();
        self.images.clear();
        self.textures.clear();
        self.materials.clear();
        self.mesh_datas.clear();
        self.meshes.clear();
        self.sampler_slots.reset();
        self.texture_slots.reset();
        self.material_slots.reset();
    }
}

impl Default for ResourceCache {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
