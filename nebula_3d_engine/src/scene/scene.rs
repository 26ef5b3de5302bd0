//! Scene — a loaded scene: node graph plus the resources it references.
//!
//! The Scene owns its NodeGraph and the node list (plus typed secondary
//! indices for mesh/camera/light nodes). It also keeps per-kind tables of
//! every resource the load materialized, with index- and name-based lookup,
//! so callers can query counts and objects per loaded scene. The tables hold
//! shared references; the underlying GPU objects live until the last
//! reference (cache entry plus any holder) drops.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::graphics_device;
use crate::resource::material::Material;
use crate::resource::mesh::{Mesh, MeshData};
use crate::resource::sampler::Sampler;
use crate::resource::texture::Texture;
use super::node::{NodeGraph, NodeKey, NodeKind};

/// A loaded scene: transform hierarchy plus resource tables.
pub struct Scene {
    /// Scene name from the source file, if any
    name: Option<String>,
    /// The transform hierarchy
    graph: NodeGraph,
    /// Root node keys in source order
    roots: Vec<NodeKey>,
    /// Every node in materialization order
    nodes: Vec<NodeKey>,
    /// Name to node key (last writer wins for duplicate source names)
    node_names: FxHashMap<String, NodeKey>,
    /// Secondary index: nodes carrying a mesh
    mesh_nodes: Vec<NodeKey>,
    /// Secondary index: nodes carrying a camera
    camera_nodes: Vec<NodeKey>,
    /// Secondary index: nodes carrying a light
    light_nodes: Vec<NodeKey>,

    // Per-kind resource tables (index order = creation order during the load)
    samplers: Vec<Arc<Sampler>>,
    images: Vec<Arc<dyn graphics_device::Image>>,
    image_names: FxHashMap<String, usize>,
    textures: Vec<Arc<Texture>>,
    texture_names: FxHashMap<String, usize>,
    materials: Vec<Arc<dyn Material>>,
    material_names: FxHashMap<String, usize>,
    mesh_datas: Vec<Arc<MeshData>>,
    meshes: Vec<Arc<Mesh>>,
    mesh_names: FxHashMap<String, usize>,
}

impl Scene {
    /// Create a new empty scene
    pub fn new(name: Option<String>) -> Self {
        Self {
            name,
            graph: NodeGraph::new(),
            roots: Vec::new(),
            nodes: Vec::new(),
            node_names: FxHashMap::default(),
            mesh_nodes: Vec::new(),
            camera_nodes: Vec::new(),
            light_nodes: Vec::new(),
            samplers: Vec::new(),
            images: Vec::new(),
            image_names: FxHashMap::default(),
            textures: Vec::new(),
            texture_names: FxHashMap::default(),
            materials: Vec::new(),
            material_names: FxHashMap::default(),
            mesh_datas: Vec::new(),
            meshes: Vec::new(),
            mesh_names: FxHashMap::default(),
        }
    }

    /// Scene name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // ===== NODE GRAPH =====

    /// The transform hierarchy
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Mutable transform hierarchy (transform setters, evaluation)
    pub fn graph_mut(&mut self) -> &mut NodeGraph {
        &mut self.graph
    }

    /// Register a node in the node list and the typed secondary index.
    ///
    /// Called by the loader for every materialized node.
    pub fn register_node(&mut self, key: NodeKey) {
        self.nodes.push(key);
        let node = match self.graph.node(key) {
            Some(node) => node,
            None => return,
        };
        if let Some(name) = node.name() {
            self.node_names.insert(name.to_string(), key);
        }
        match node.kind() {
            NodeKind::Mesh(_) => self.mesh_nodes.push(key),
            NodeKind::Camera(_) => self.camera_nodes.push(key),
            NodeKind::Light(_) => self.light_nodes.push(key),
            NodeKind::Transform => {}
        }
    }

    /// Mark a node as a scene root
    pub fn add_root(&mut self, key: NodeKey) {
        self.roots.push(key);
    }

    /// Root node keys in source order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Every node key in materialization order
    pub fn node_keys(&self) -> &[NodeKey] {
        &self.nodes
    }

    /// Number of nodes in the scene
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node key by source name
    pub fn node_by_name(&self, name: &str) -> Option<NodeKey> {
        self.node_names.get(name).copied()
    }

    /// Keys of nodes carrying a mesh
    pub fn mesh_nodes(&self) -> &[NodeKey] {
        &self.mesh_nodes
    }

    /// Keys of nodes carrying a camera
    pub fn camera_nodes(&self) -> &[NodeKey] {
        &self.camera_nodes
    }

    /// Keys of nodes carrying a light
    pub fn light_nodes(&self) -> &[NodeKey] {
        &self.light_nodes
    }

    // ===== RESOURCE TABLES =====

    /// Record a sampler used by this scene
    pub(crate) fn add_sampler(&mut self, sampler: Arc<Sampler>) {
        self.samplers.push(sampler);
    }

    /// Record an image used by this scene
    pub(crate) fn add_image(&mut self, image: Arc<dyn graphics_device::Image>, name: Option<&str>) {
        if let Some(name) = name {
            self.image_names.insert(name.to_string(), self.images.len());
        }
        self.images.push(image);
    }

    /// Record a texture used by this scene
    pub(crate) fn add_texture(&mut self, texture: Arc<Texture>, name: Option<&str>) {
        if let Some(name) = name {
            self.texture_names.insert(name.to_string(), self.textures.len());
        }
        self.textures.push(texture);
    }

    /// Record a material used by this scene
    pub(crate) fn add_material(&mut self, material: Arc<dyn Material>, name: Option<&str>) {
        if let Some(name) = name {
            self.material_names.insert(name.to_string(), self.materials.len());
        }
        self.materials.push(material);
    }

    /// Record a mesh-data buffer used by this scene
    pub(crate) fn add_mesh_data(&mut self, mesh_data: Arc<MeshData>) {
        self.mesh_datas.push(mesh_data);
    }

    /// Record a mesh used by this scene
    pub(crate) fn add_mesh(&mut self, mesh: Arc<Mesh>, name: Option<&str>) {
        if let Some(name) = name {
            self.mesh_names.insert(name.to_string(), self.meshes.len());
        }
        self.meshes.push(mesh);
    }

    /// Number of samplers this scene references
    pub fn sampler_count(&self) -> usize {
        self.samplers.len()
    }

    /// Sampler by table index
    pub fn sampler(&self, index: usize) -> Option<&Arc<Sampler>> {
        self.samplers.get(index)
    }

    /// Number of images this scene references
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Image by table index
    pub fn image(&self, index: usize) -> Option<&Arc<dyn graphics_device::Image>> {
        self.images.get(index)
    }

    /// Image by source name
    pub fn image_by_name(&self, name: &str) -> Option<&Arc<dyn graphics_device::Image>> {
        self.image_names.get(name).and_then(|&index| self.images.get(index))
    }

    /// Number of textures this scene references
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Texture by table index
    pub fn texture(&self, index: usize) -> Option<&Arc<Texture>> {
        self.textures.get(index)
    }

    /// Texture by source name
    pub fn texture_by_name(&self, name: &str) -> Option<&Arc<Texture>> {
        self.texture_names.get(name).and_then(|&index| self.textures.get(index))
    }

    /// Number of materials this scene references
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Material by table index
    pub fn material(&self, index: usize) -> Option<&Arc<dyn Material>> {
        self.materials.get(index)
    }

    /// Material by source name
    pub fn material_by_name(&self, name: &str) -> Option<&Arc<dyn Material>> {
        self.material_names.get(name).and_then(|&index| self.materials.get(index))
    }

    /// Number of mesh-data buffers this scene references
    pub fn mesh_data_count(&self) -> usize {
        self.mesh_datas.len()
    }

    /// Mesh-data by table index
    pub fn mesh_data(&self, index: usize) -> Option<&Arc<MeshData>> {
        self.mesh_datas.get(index)
    }

    /// Number of meshes this scene references
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Mesh by table index
    pub fn mesh(&self, index: usize) -> Option<&Arc<Mesh>> {
        self.meshes.get(index)
    }

    /// Mesh by source name
    pub fn mesh_by_name(&self, name: &str) -> Option<&Arc<Mesh>> {
        self.mesh_names.get(name).and_then(|&index| self.meshes.get(index))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
