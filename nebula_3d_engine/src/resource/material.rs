//! Resource-level material types.
//!
//! Materials form a closed capability set: Error, Debug, Unlit and Standard
//! (PBR metallic-roughness). Each variant reports which vertex attribute
//! channels it requires — the loader unions these per mesh so geometry
//! repacking only allocates channels some consuming material needs — and
//! which optional texture slots are populated.
//!
//! All variants implement the `Material` trait for uniform access via trait
//! objects. Downcast methods allow safe access to variant-specific fields
//! without using `Any`.

use std::sync::Arc;

use glam::{Vec3, Vec4};

use super::texture::Texture;
use super::vertex::VertexAttributeFlags;

// ===== TRAIT =====

/// Resource-level material trait.
///
/// Provides uniform access to any material variant. The optional texture
/// slot accessors default to `None`; variants override the slots they carry.
pub trait Material: Send + Sync {
    /// Material name (source name or a generated fallback)
    fn name(&self) -> &str;

    /// Vertex attribute channels this material samples or shades with
    fn required_attributes(&self) -> VertexAttributeFlags;

    /// Slot index in the per-material parameter array
    fn param_slot(&self) -> u32;

    /// Base color texture slot
    fn base_color_texture(&self) -> Option<&Arc<Texture>> {
        None
    }

    /// Metallic-roughness texture slot
    fn metallic_roughness_texture(&self) -> Option<&Arc<Texture>> {
        None
    }

    /// Normal map slot
    fn normal_texture(&self) -> Option<&Arc<Texture>> {
        None
    }

    /// Ambient occlusion texture slot
    fn occlusion_texture(&self) -> Option<&Arc<Texture>> {
        None
    }

    /// Emissive texture slot
    fn emissive_texture(&self) -> Option<&Arc<Texture>> {
        None
    }

    /// Downcast to ErrorMaterial (returns None for other variants)
    fn as_error(&self) -> Option<&ErrorMaterial> {
        None
    }

    /// Downcast to DebugMaterial (returns None for other variants)
    fn as_debug(&self) -> Option<&DebugMaterial> {
        None
    }

    /// Downcast to UnlitMaterial (returns None for other variants)
    fn as_unlit(&self) -> Option<&UnlitMaterial> {
        None
    }

    /// Downcast to StandardMaterial (returns None for other variants)
    fn as_standard(&self) -> Option<&StandardMaterial> {
        None
    }
}

// ===== ERROR MATERIAL =====

/// Fallback material rendered in a loud solid color.
///
/// Used for primitives without a source material. Requires no vertex
/// attribute channels beyond position, so any geometry can carry it.
pub struct ErrorMaterial {
    name: String,
    param_slot: u32,
}

impl ErrorMaterial {
    /// Create a new error material
    pub fn new(name: String, param_slot: u32) -> Self {
        Self { name, param_slot }
    }
}

impl Material for ErrorMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_attributes(&self) -> VertexAttributeFlags {
        VertexAttributeFlags::empty()
    }

    fn param_slot(&self) -> u32 {
        self.param_slot
    }

    fn as_error(&self) -> Option<&ErrorMaterial> {
        Some(self)
    }
}

// ===== DEBUG MATERIAL =====

/// Which vertex channel a DebugMaterial visualizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugVisualization {
    /// Normals as RGB
    Normals,
    /// Texcoords as RG
    Texcoords,
    /// Tangents as RGB, handedness as brightness
    Tangents,
    /// Raw vertex color
    VertexColor,
}

/// Development material that visualizes one vertex channel.
pub struct DebugMaterial {
    name: String,
    mode: DebugVisualization,
    param_slot: u32,
}

impl DebugMaterial {
    /// Create a new debug material for the given visualization mode
    pub fn new(name: String, mode: DebugVisualization, param_slot: u32) -> Self {
        Self {
            name,
            mode,
            param_slot,
        }
    }

    /// The visualization mode
    pub fn mode(&self) -> DebugVisualization {
        self.mode
    }
}

impl Material for DebugMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_attributes(&self) -> VertexAttributeFlags {
        match self.mode {
            DebugVisualization::Normals => VertexAttributeFlags::NORMAL,
            DebugVisualization::Texcoords => VertexAttributeFlags::TEXCOORD,
            DebugVisualization::Tangents => VertexAttributeFlags::TANGENT,
            DebugVisualization::VertexColor => VertexAttributeFlags::COLOR,
        }
    }

    fn param_slot(&self) -> u32 {
        self.param_slot
    }

    fn as_debug(&self) -> Option<&DebugMaterial> {
        Some(self)
    }
}

// ===== UNLIT MATERIAL =====

/// Flat-shaded material: base color factor and optional base color texture,
/// no lighting response.
pub struct UnlitMaterial {
    name: String,
    base_color_factor: Vec4,
    base_color_texture: Option<Arc<Texture>>,
    param_slot: u32,
}

impl UnlitMaterial {
    /// Create a new unlit material
    pub fn new(
        name: String,
        base_color_factor: Vec4,
        base_color_texture: Option<Arc<Texture>>,
        param_slot: u32,
    ) -> Self {
        Self {
            name,
            base_color_factor,
            base_color_texture,
            param_slot,
        }
    }

    /// Base color multiplier (linear RGBA)
    pub fn base_color_factor(&self) -> Vec4 {
        self.base_color_factor
    }
}

impl Material for UnlitMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_attributes(&self) -> VertexAttributeFlags {
        VertexAttributeFlags::TEXCOORD | VertexAttributeFlags::COLOR
    }

    fn param_slot(&self) -> u32 {
        self.param_slot
    }

    fn base_color_texture(&self) -> Option<&Arc<Texture>> {
        self.base_color_texture.as_ref()
    }

    fn as_unlit(&self) -> Option<&UnlitMaterial> {
        Some(self)
    }
}

// ===== STANDARD MATERIAL =====

/// PBR metallic-roughness material.
///
/// Carries the five optional texture slots plus the scalar/vector factors
/// that end up in the per-material parameter array. Tangents are required
/// only when a normal map is present.
pub struct StandardMaterial {
    name: String,
    base_color_factor: Vec4,
    metallic_factor: f32,
    roughness_factor: f32,
    emissive_factor: Vec3,
    occlusion_strength: f32,
    normal_scale: f32,
    base_color_texture: Option<Arc<Texture>>,
    metallic_roughness_texture: Option<Arc<Texture>>,
    normal_texture: Option<Arc<Texture>>,
    occlusion_texture: Option<Arc<Texture>>,
    emissive_texture: Option<Arc<Texture>>,
    param_slot: u32,
}

/// Construction parameters for StandardMaterial (too many fields for a
/// positional constructor)
pub struct StandardMaterialDesc {
    pub name: String,
    pub base_color_factor: Vec4,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub emissive_factor: Vec3,
    pub occlusion_strength: f32,
    pub normal_scale: f32,
    pub base_color_texture: Option<Arc<Texture>>,
    pub metallic_roughness_texture: Option<Arc<Texture>>,
    pub normal_texture: Option<Arc<Texture>>,
    pub occlusion_texture: Option<Arc<Texture>>,
    pub emissive_texture: Option<Arc<Texture>>,
}

impl StandardMaterial {
    /// Create a new standard PBR material
    pub fn from_desc(desc: StandardMaterialDesc, param_slot: u32) -> Self {
        Self {
            name: desc.name,
            base_color_factor: desc.base_color_factor,
            metallic_factor: desc.metallic_factor,
            roughness_factor: desc.roughness_factor,
            emissive_factor: desc.emissive_factor,
            occlusion_strength: desc.occlusion_strength,
            normal_scale: desc.normal_scale,
            base_color_texture: desc.base_color_texture,
            metallic_roughness_texture: desc.metallic_roughness_texture,
            normal_texture: desc.normal_texture,
            occlusion_texture: desc.occlusion_texture,
            emissive_texture: desc.emissive_texture,
            param_slot,
        }
    }

    /// Base color multiplier (linear RGBA)
    pub fn base_color_factor(&self) -> Vec4 {
        self.base_color_factor
    }

    /// Metalness multiplier
    pub fn metallic_factor(&self) -> f32 {
        self.metallic_factor
    }

    /// Roughness multiplier
    pub fn roughness_factor(&self) -> f32 {
        self.roughness_factor
    }

    /// Emissive color (linear RGB)
    pub fn emissive_factor(&self) -> Vec3 {
        self.emissive_factor
    }

    /// Occlusion texture strength
    pub fn occlusion_strength(&self) -> f32 {
        self.occlusion_strength
    }

    /// Normal map scale
    pub fn normal_scale(&self) -> f32 {
        self.normal_scale
    }
}

impl Material for StandardMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn required_attributes(&self) -> VertexAttributeFlags {
        let mut flags = VertexAttributeFlags::TEXCOORD
            | VertexAttributeFlags::NORMAL
            | VertexAttributeFlags::COLOR;
        // Tangent-space shading only happens when a normal map exists.
        if self.normal_texture.is_some() {
            flags |= VertexAttributeFlags::TANGENT;
        }
        flags
    }

    fn param_slot(&self) -> u32 {
        self.param_slot
    }

    fn base_color_texture(&self) -> Option<&Arc<Texture>> {
        self.base_color_texture.as_ref()
    }

    fn metallic_roughness_texture(&self) -> Option<&Arc<Texture>> {
        self.metallic_roughness_texture.as_ref()
    }

    fn normal_texture(&self) -> Option<&Arc<Texture>> {
        self.normal_texture.as_ref()
    }

    fn occlusion_texture(&self) -> Option<&Arc<Texture>> {
        self.occlusion_texture.as_ref()
    }

    fn emissive_texture(&self) -> Option<&Arc<Texture>> {
        self.emissive_texture.as_ref()
    }

    fn as_standard(&self) -> Option<&StandardMaterial> {
        Some(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
