//! glTF asset loader.
//!
//! Walks an external glTF scene, fetches or creates every referenced
//! resource through a [`ResourceCache`], repacks geometry into per-mesh
//! device buffers and materializes the node hierarchy into a [`Scene`].
//!
//! Every resource kind has a fetch path (cache lookup, falling back to load
//! then cache) so repeated references within a file, and repeated loads of a
//! file through the same cache, collapse onto shared GPU objects. A failed
//! load returns no scene; resources cached before the failure stay valid and
//! reusable.

use std::sync::{Arc, Mutex};

use glam::{EulerRot, Mat4, Quat, Vec3, Vec4};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{self, GraphicsDevice, ImageViewDesc};
use crate::resource::cache::{ResourceCache, SessionIds};
use crate::resource::material::{
    ErrorMaterial, Material, StandardMaterial, StandardMaterialDesc, UnlitMaterial,
};
use crate::resource::mesh::{Mesh, MeshData, PrimitiveBatch};
use crate::resource::sampler::Sampler;
use crate::resource::texture::Texture;
use crate::resource::vertex::VertexAttributeFlags;
use crate::scene::camera::{Camera, Projection};
use crate::scene::light::{Light, LightKind};
use crate::scene::node::NodeKey;
use crate::scene::scene::Scene;
use super::format;
use super::geometry::{self, GeometryLayout};

const SOURCE: &str = "nebula3d::AssetLoader";

// ===== LOAD OPTIONS =====

/// Per-call loader configuration
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Index of the scene to load; None selects the file's default scene,
    /// falling back to the first
    pub scene_index: Option<usize>,
}

// ===== LOAD CONTEXT =====

/// Per-load bookkeeping: session ids, pre-scanned attribute requirements and
/// the set of cache ids already recorded in this load's scene tables.
struct LoadContext<'a> {
    buffers: &'a [gltf::buffer::Data],
    images: &'a [gltf::image::Data],
    ids: SessionIds,
    /// Mesh index → union of its primitives' material attribute requirements
    required_attributes: FxHashMap<usize, VertexAttributeFlags>,
    /// Ids already recorded in the scene resource tables during this load
    recorded: FxHashSet<u64>,
}

impl<'a> LoadContext<'a> {
    fn new(
        document: &gltf::Document,
        buffers: &'a [gltf::buffer::Data],
        images: &'a [gltf::image::Data],
        source_name: &str,
    ) -> Self {
        // Pre-scan: resolve each mesh's required-attribute mask before any
        // geometry work, so repacking only allocates channels a consuming
        // material needs.
        let mut required_attributes = FxHashMap::default();
        for mesh in document.meshes() {
            let mut required = VertexAttributeFlags::empty();
            for primitive in mesh.primitives() {
                required |= material_requirements(&primitive.material());
            }
            required_attributes.insert(mesh.index(), required);
        }

        Self {
            buffers,
            images,
            ids: SessionIds::new(source_name),
            required_attributes,
            recorded: FxHashSet::default(),
        }
    }
}

/// Attribute channels the material variant for this source material will
/// require. Mirrors the variants' `required_attributes` without allocating
/// them.
fn material_requirements(material: &gltf::Material) -> VertexAttributeFlags {
    if material.index().is_none() {
        // default material resolves to the error material
        return VertexAttributeFlags::empty();
    }
    if material.unlit() {
        return VertexAttributeFlags::TEXCOORD | VertexAttributeFlags::COLOR;
    }
    let mut flags = VertexAttributeFlags::TEXCOORD
        | VertexAttributeFlags::NORMAL
        | VertexAttributeFlags::COLOR;
    if material.normal_texture().is_some() {
        flags |= VertexAttributeFlags::TANGENT;
    }
    flags
}

// ===== ASSET LOADER =====

/// Loads glTF scenes and meshes into GPU-resident resources.
pub struct AssetLoader {
    graphics_device: Arc<Mutex<dyn GraphicsDevice>>,
}

impl AssetLoader {
    /// Create a loader targeting a graphics device
    pub fn new(graphics_device: Arc<Mutex<dyn GraphicsDevice>>) -> Self {
        Self { graphics_device }
    }

    // ===== PUBLIC ENTRY POINTS =====

    /// Load a scene from a `.gltf` or `.glb` file.
    ///
    /// The cache deduplicates resources across repeated loads; session ids
    /// derive from the file path.
    pub fn load_scene(
        &self,
        cache: &mut ResourceCache,
        path: &str,
        options: &LoadOptions,
    ) -> Result<Scene> {
        let (document, buffers, images) = match gltf::import(path) {
            Ok(imported) => imported,
            Err(error) => {
                engine_bail!(SOURCE, InvalidAsset, "failed to import '{}': {}", path, error);
            }
        };
        self.load_document(cache, &document, &buffers, &images, path, options)
    }

    /// Load a scene from in-memory bytes (GLB or JSON with embedded buffers).
    ///
    /// `source_name` stands in for the file path when deriving session ids,
    /// so repeated loads of the same bytes under one name deduplicate.
    pub fn load_scene_from_slice(
        &self,
        cache: &mut ResourceCache,
        bytes: &[u8],
        source_name: &str,
        options: &LoadOptions,
    ) -> Result<Scene> {
        let (document, buffers, images) = match gltf::import_slice(bytes) {
            Ok(imported) => imported,
            Err(error) => {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "failed to import '{}': {}",
                    source_name,
                    error
                );
            }
        };
        self.load_document(cache, &document, &buffers, &images, source_name, options)
    }

    /// Load a single mesh by index, outside any scene.
    ///
    /// The mesh owns a private ResourceCache holding the child resources it
    /// alone created, so dropping the mesh releases them.
    pub fn load_mesh(&self, path: &str, mesh_index: usize) -> Result<Mesh> {
        let (document, buffers, images) = match gltf::import(path) {
            Ok(imported) => imported,
            Err(error) => {
                engine_bail!(SOURCE, InvalidAsset, "failed to import '{}': {}", path, error);
            }
        };
        let source = match document.meshes().nth(mesh_index) {
            Some(mesh) => mesh,
            None => {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "'{}': mesh index {} out of range ({} meshes)",
                    path,
                    mesh_index,
                    document.meshes().len()
                );
            }
        };

        let mut cache = ResourceCache::new();
        let mut ctx = LoadContext::new(&document, &buffers, &images, path);
        // Scratch scene for the per-load bookkeeping the fetch helpers
        // maintain; discarded, the private cache keeps the resources alive.
        let mut scratch = Scene::new(None);

        let (mesh_data, layout) =
            self.fetch_mesh_data(&mut cache, &mut scratch, &mut ctx, &source)?;
        let primitives =
            self.build_primitives(&mut cache, &mut scratch, &mut ctx, &source, &layout)?;

        crate::engine_info!(
            SOURCE,
            "Mesh {} loaded standalone from '{}' ({} primitives)",
            mesh_index,
            path,
            primitives.len()
        );
        // The mesh itself stays out of its own cache; only child resources
        // live there.
        Ok(Mesh::with_private_cache(
            source.name().map(str::to_string),
            mesh_data,
            primitives,
            cache,
        ))
    }

    // ===== SCENE CONSTRUCTION =====

    fn load_document(
        &self,
        cache: &mut ResourceCache,
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        images: &[gltf::image::Data],
        source_name: &str,
        options: &LoadOptions,
    ) -> Result<Scene> {
        let source_scene = select_scene(document, source_name, options)?;
        let mut ctx = LoadContext::new(document, buffers, images, source_name);
        let mut scene = Scene::new(source_scene.name().map(str::to_string));

        crate::engine_info!(
            SOURCE,
            "Loading scene {} from '{}'",
            source_scene.index(),
            source_name
        );

        // Unique reachable nodes in first-visit order
        let mut seen = FxHashSet::default();
        let mut order = Vec::new();
        for root in source_scene.nodes() {
            collect_nodes(root, &mut seen, &mut order);
        }

        // First pass: materialize every node (meshes pull their whole
        // resource chain through the cache).
        let mut node_keys: FxHashMap<usize, NodeKey> = FxHashMap::default();
        for source_node in &order {
            let key = self.load_node(cache, &mut scene, &mut ctx, source_node)?;
            node_keys.insert(source_node.index(), key);
            scene.register_node(key);
        }
        for root in source_scene.nodes() {
            if let Some(&key) = node_keys.get(&root.index()) {
                scene.add_root(key);
            }
        }

        // Second pass: wire the hierarchy through the index side table
        // (child references may precede materialization in source order).
        for source_node in &order {
            let parent_key = match node_keys.get(&source_node.index()) {
                Some(&key) => key,
                None => continue,
            };
            for child in source_node.children() {
                if let Some(&child_key) = node_keys.get(&child.index()) {
                    scene.graph_mut().add_child(parent_key, child_key)?;
                }
            }
        }

        crate::engine_info!(
            SOURCE,
            "Scene loaded from '{}': {} nodes, {} meshes, {} materials, {} textures, {} images, {} samplers",
            source_name,
            scene.node_count(),
            scene.mesh_count(),
            scene.material_count(),
            scene.texture_count(),
            scene.image_count(),
            scene.sampler_count()
        );
        Ok(scene)
    }

    fn load_node(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::Node,
    ) -> Result<NodeKey> {
        let name = source.name().map(str::to_string);

        // Kind priority when a source node carries several payloads:
        // mesh, then camera, then light.
        let key = if let Some(source_mesh) = source.mesh() {
            let mesh = self.fetch_mesh(cache, scene, ctx, &source_mesh)?;
            scene.graph_mut().create_mesh_node(name, mesh)
        } else if let Some(source_camera) = source.camera() {
            scene
                .graph_mut()
                .create_camera_node(name, convert_camera(&source_camera))
        } else if let Some(source_light) = source.light() {
            scene
                .graph_mut()
                .create_light_node(name, convert_light(&source_light))
        } else {
            scene.graph_mut().create_node(name)
        };

        let (translation, rotation, scale) = decompose_transform(source);
        let graph = scene.graph_mut();
        graph.set_translation(key, translation)?;
        graph.set_rotation(key, rotation)?;
        graph.set_scale(key, scale)?;
        Ok(key)
    }

    // ===== MESHES =====

    fn fetch_mesh(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::Mesh,
    ) -> Result<Arc<Mesh>> {
        let id = ctx.ids.mesh_id(source.index());
        if let Some(mesh) = cache.find_mesh(id) {
            if ctx.recorded.insert(id) {
                // A warm cache skips construction, but the scene tables
                // still list everything the mesh references so lookups
                // match a cold load.
                self.fetch_mesh_data(cache, scene, ctx, source)?;
                for primitive in source.primitives() {
                    self.fetch_material(cache, scene, ctx, &primitive.material())?;
                }
                scene.add_mesh(Arc::clone(&mesh), source.name());
            }
            return Ok(mesh);
        }

        let (mesh_data, layout) = self.fetch_mesh_data(cache, scene, ctx, source)?;
        let primitives = self.build_primitives(cache, scene, ctx, source, &layout)?;

        let mesh = Arc::new(Mesh::new(
            source.name().map(str::to_string),
            mesh_data,
            primitives,
        ));
        let mesh = cache.cache_mesh(id, mesh);
        ctx.recorded.insert(id);
        scene.add_mesh(Arc::clone(&mesh), source.name());
        Ok(mesh)
    }

    fn build_primitives(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::Mesh,
        layout: &GeometryLayout,
    ) -> Result<Vec<PrimitiveBatch>> {
        let mut primitives = Vec::with_capacity(layout.primitives().len());
        for (plan, primitive) in layout.primitives().iter().zip(source.primitives()) {
            let material = self.fetch_material(cache, scene, ctx, &primitive.material())?;
            primitives.push(PrimitiveBatch::new(
                material,
                plan.index_range,
                plan.position_range,
                plan.attribute_range,
                plan.index_type,
                plan.index_count,
                plan.vertex_count,
                plan.bounding_box,
            ));
        }
        Ok(primitives)
    }

    fn fetch_mesh_data(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::Mesh,
    ) -> Result<(Arc<MeshData>, GeometryLayout)> {
        let accessor_indices = geometry::collect_accessor_indices(source);
        let id = ctx.ids.mesh_data_id(&accessor_indices);

        if let Some(mesh_data) = cache.find_mesh_data(id) {
            // The first load of shared geometry fixed the channel set;
            // re-plan the views against it.
            let layout = GeometryLayout::plan(source, mesh_data.attributes(), ctx.buffers)?;
            if ctx.recorded.insert(id) {
                scene.add_mesh_data(Arc::clone(&mesh_data));
            }
            return Ok((mesh_data, layout));
        }

        let required = ctx
            .required_attributes
            .get(&source.index())
            .copied()
            .unwrap_or_default();
        let channels = geometry::resolve_channels(source, required);
        let layout = GeometryLayout::plan(source, channels, ctx.buffers)?;
        let staging = layout.pack(source, ctx.buffers)?;
        let buffer = geometry::upload(&self.graphics_device, &staging)?;

        let mesh_data = Arc::new(MeshData::new(buffer, layout.channels()));
        let mesh_data = cache.cache_mesh_data(id, mesh_data);
        ctx.recorded.insert(id);
        scene.add_mesh_data(Arc::clone(&mesh_data));
        Ok((mesh_data, layout))
    }

    // ===== MATERIALS =====

    fn fetch_material(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::Material,
    ) -> Result<Arc<dyn Material>> {
        let id = match source.index() {
            Some(index) => ctx.ids.material_id(index),
            None => ctx.ids.default_material_id(),
        };
        if let Some(material) = cache.find_material(id) {
            if ctx.recorded.insert(id) {
                self.record_material_textures(cache, scene, ctx, source)?;
                scene.add_material(Arc::clone(&material), source.name());
            }
            return Ok(material);
        }

        let material: Arc<dyn Material> = match source.index() {
            // Primitives without a source material share the session's
            // error material.
            None => {
                let slot = cache.alloc_material_slot()?;
                Arc::new(ErrorMaterial::new("default".to_string(), slot))
            }
            Some(index) => {
                let name = source
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("material_{}", index));
                let pbr = source.pbr_metallic_roughness();

                if source.unlit() {
                    let base_color_texture = match pbr.base_color_texture() {
                        Some(info) => {
                            Some(self.fetch_texture(cache, scene, ctx, &info.texture(), true)?)
                        }
                        None => None,
                    };
                    let slot = cache.alloc_material_slot()?;
                    Arc::new(UnlitMaterial::new(
                        name,
                        Vec4::from_array(pbr.base_color_factor()),
                        base_color_texture,
                        slot,
                    ))
                } else {
                    let base_color_texture = match pbr.base_color_texture() {
                        Some(info) => {
                            Some(self.fetch_texture(cache, scene, ctx, &info.texture(), true)?)
                        }
                        None => None,
                    };
                    let metallic_roughness_texture = match pbr.metallic_roughness_texture() {
                        Some(info) => {
                            Some(self.fetch_texture(cache, scene, ctx, &info.texture(), false)?)
                        }
                        None => None,
                    };
                    let (normal_texture, normal_scale) = match source.normal_texture() {
                        Some(normal) => (
                            Some(self.fetch_texture(cache, scene, ctx, &normal.texture(), false)?),
                            normal.scale(),
                        ),
                        None => (None, 1.0),
                    };
                    let (occlusion_texture, occlusion_strength) = match source.occlusion_texture()
                    {
                        Some(occlusion) => (
                            Some(self.fetch_texture(
                                cache,
                                scene,
                                ctx,
                                &occlusion.texture(),
                                false,
                            )?),
                            occlusion.strength(),
                        ),
                        None => (None, 1.0),
                    };
                    let emissive_texture = match source.emissive_texture() {
                        Some(info) => {
                            Some(self.fetch_texture(cache, scene, ctx, &info.texture(), true)?)
                        }
                        None => None,
                    };

                    let slot = cache.alloc_material_slot()?;
                    Arc::new(StandardMaterial::from_desc(
                        StandardMaterialDesc {
                            name,
                            base_color_factor: Vec4::from_array(pbr.base_color_factor()),
                            metallic_factor: pbr.metallic_factor(),
                            roughness_factor: pbr.roughness_factor(),
                            emissive_factor: Vec3::from_array(source.emissive_factor()),
                            occlusion_strength,
                            normal_scale,
                            base_color_texture,
                            metallic_roughness_texture,
                            normal_texture,
                            occlusion_texture,
                            emissive_texture,
                        },
                        slot,
                    ))
                }
            }
        };

        let material = cache.cache_material(id, material);
        ctx.recorded.insert(id);
        scene.add_material(Arc::clone(&material), source.name());
        Ok(material)
    }

    /// Re-record a cached material's textures into the scene tables.
    ///
    /// Every fetch below is a guaranteed cache hit; this only runs for the
    /// first sighting of a material in a warm-cache load.
    fn record_material_textures(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::Material,
    ) -> Result<()> {
        let pbr = source.pbr_metallic_roughness();
        if let Some(info) = pbr.base_color_texture() {
            self.fetch_texture(cache, scene, ctx, &info.texture(), true)?;
        }
        if source.unlit() {
            return Ok(());
        }
        if let Some(info) = pbr.metallic_roughness_texture() {
            self.fetch_texture(cache, scene, ctx, &info.texture(), false)?;
        }
        if let Some(normal) = source.normal_texture() {
            self.fetch_texture(cache, scene, ctx, &normal.texture(), false)?;
        }
        if let Some(occlusion) = source.occlusion_texture() {
            self.fetch_texture(cache, scene, ctx, &occlusion.texture(), false)?;
        }
        if let Some(info) = source.emissive_texture() {
            self.fetch_texture(cache, scene, ctx, &info.texture(), true)?;
        }
        Ok(())
    }

    // ===== TEXTURES =====

    fn fetch_texture(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::Texture,
        srgb: bool,
    ) -> Result<Arc<Texture>> {
        let id = ctx.ids.texture_id(source.index());
        if let Some(texture) = cache.find_texture(id) {
            if ctx.recorded.insert(id) {
                self.fetch_sampler(cache, scene, ctx, &source.sampler())?;
                self.fetch_image(cache, scene, ctx, &source.source(), srgb)?;
                scene.add_texture(Arc::clone(&texture), source.name());
            }
            return Ok(texture);
        }

        let sampler = self.fetch_sampler(cache, scene, ctx, &source.sampler())?;
        let image = self.fetch_image(cache, scene, ctx, &source.source(), srgb)?;
        let view = {
            let device = self.graphics_device.lock().unwrap();
            device.create_image_view(ImageViewDesc { image })?
        };
        let slot = cache.alloc_texture_slot()?;

        let texture = Arc::new(Texture::new(view, sampler, slot));
        let texture = cache.cache_texture(id, texture);
        ctx.recorded.insert(id);
        scene.add_texture(Arc::clone(&texture), source.name());
        Ok(texture)
    }

    fn fetch_image(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::image::Image,
        srgb: bool,
    ) -> Result<Arc<dyn graphics_device::Image>> {
        let id = ctx.ids.image_id(source.index());
        if let Some(image) = cache.find_image(id) {
            if ctx.recorded.insert(id) {
                scene.add_image(Arc::clone(&image), source.name());
            }
            return Ok(image);
        }

        let data = match ctx.images.get(source.index()) {
            Some(data) => data,
            None => {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "image {}: no decoded pixel data",
                    source.index()
                );
            }
        };
        // First use of a shared image wins its color-space format.
        let desc = format::image_desc(data, srgb)?;
        let image = {
            let mut device = self.graphics_device.lock().unwrap();
            device.create_image(desc)?
        };

        let image = cache.cache_image(id, image);
        ctx.recorded.insert(id);
        scene.add_image(Arc::clone(&image), source.name());
        Ok(image)
    }

    // ===== SAMPLERS =====

    fn fetch_sampler(
        &self,
        cache: &mut ResourceCache,
        scene: &mut Scene,
        ctx: &mut LoadContext,
        source: &gltf::texture::Sampler,
    ) -> Result<Arc<Sampler>> {
        // Textures without a source sampler share the session's default.
        let id = match source.index() {
            Some(index) => ctx.ids.sampler_id(index),
            None => ctx.ids.default_sampler_id(),
        };
        if let Some(sampler) = cache.find_sampler(id) {
            if ctx.recorded.insert(id) {
                scene.add_sampler(Arc::clone(&sampler));
            }
            return Ok(sampler);
        }

        let desc = format::sampler_desc(source);
        let device_sampler = {
            let mut device = self.graphics_device.lock().unwrap();
            device.create_sampler(desc)?
        };
        let slot = cache.alloc_sampler_slot()?;

        let sampler = Arc::new(Sampler::new(device_sampler, slot));
        let sampler = cache.cache_sampler(id, sampler);
        ctx.recorded.insert(id);
        scene.add_sampler(Arc::clone(&sampler));
        Ok(sampler)
    }
}

// ===== SCENE SELECTION =====

fn select_scene<'a>(
    document: &'a gltf::Document,
    source_name: &str,
    options: &LoadOptions,
) -> Result<gltf::Scene<'a>> {
    match options.scene_index {
        Some(index) => match document.scenes().nth(index) {
            Some(scene) => Ok(scene),
            None => {
                engine_bail!(
                    SOURCE,
                    InvalidAsset,
                    "'{}': scene index {} out of range ({} scenes)",
                    source_name,
                    index,
                    document.scenes().len()
                );
            }
        },
        None => match document.default_scene().or_else(|| document.scenes().next()) {
            Some(scene) => Ok(scene),
            None => {
                engine_bail!(SOURCE, InvalidAsset, "'{}': document has no scenes", source_name);
            }
        },
    }
}

fn collect_nodes<'a>(
    node: gltf::Node<'a>,
    seen: &mut FxHashSet<usize>,
    order: &mut Vec<gltf::Node<'a>>,
) {
    if !seen.insert(node.index()) {
        return;
    }
    order.push(node.clone());
    for child in node.children() {
        collect_nodes(child, seen, order);
    }
}

// ===== CONVERSIONS =====

fn decompose_transform(node: &gltf::Node) -> (Vec3, Vec3, Vec3) {
    match node.transform() {
        gltf::scene::Transform::Matrix { matrix } => {
            let (scale, rotation, translation) =
                Mat4::from_cols_array_2d(&matrix).to_scale_rotation_translation();
            (translation, euler_xyz(rotation), scale)
        }
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => (
            Vec3::from_array(translation),
            euler_xyz(Quat::from_xyzw(
                rotation[0],
                rotation[1],
                rotation[2],
                rotation[3],
            )),
            Vec3::from_array(scale),
        ),
    }
}

/// XYZ Euler extraction for every source quaternion, regardless of any
/// rotation-order metadata. Lossy at gimbal lock; kept, not corrected.
fn euler_xyz(rotation: Quat) -> Vec3 {
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Vec3::new(x, y, z)
}

fn convert_camera(source: &gltf::Camera) -> Camera {
    let projection = match source.projection() {
        gltf::camera::Projection::Perspective(perspective) => Projection::Perspective {
            fov_y: perspective.yfov(),
            aspect: perspective.aspect_ratio().unwrap_or(1.0),
            near: perspective.znear(),
            far: perspective.zfar().unwrap_or(1000.0),
        },
        gltf::camera::Projection::Orthographic(orthographic) => Projection::Orthographic {
            xmag: orthographic.xmag(),
            ymag: orthographic.ymag(),
            near: orthographic.znear(),
            far: orthographic.zfar(),
        },
    };
    Camera::new(projection)
}

fn convert_light(source: &gltf::khr_lights_punctual::Light) -> Light {
    let kind = match source.kind() {
        gltf::khr_lights_punctual::Kind::Directional => LightKind::Directional,
        gltf::khr_lights_punctual::Kind::Point => LightKind::Point,
        gltf::khr_lights_punctual::Kind::Spot {
            inner_cone_angle,
            outer_cone_angle,
        } => LightKind::Spot {
            inner_cone_angle,
            outer_cone_angle,
        },
    };
    Light::new(
        kind,
        Vec3::from_array(source.color()),
        source.intensity(),
        source.range(),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
