//! GPU-visible parameter structs and layout constants.
//!
//! Every struct here is mirrored by a shader-side declaration, so layout is
//! part of the binding contract: `#[repr(C)]`, explicit padding, sizes a
//! multiple of 16 bytes. The structured-array strides must exactly equal the
//! struct sizes; the const assertions below make any drift a compile error
//! rather than a silent truncation on the GPU.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

// ===== CAPACITIES =====

/// Uniform-buffer offset alignment the frame/camera regions pad to
pub const UNIFORM_ALIGNMENT: u64 = 256;

/// Maximum drawable instances per frame
pub const MAX_INSTANCES: u32 = 1024;

/// Maximum unique materials per cache generation
pub const MAX_MATERIALS: u32 = 256;

/// Fixed size of the material sampler indirection array
pub const MAX_MATERIAL_SAMPLERS: u32 = 16;

/// Fixed size of the material texture indirection array
pub const MAX_MATERIAL_TEXTURES: u32 = 64;

/// Fixed size of the irradiance map array
pub const MAX_IRRADIANCE_MAPS: u32 = 8;

/// Fixed size of the environment map array
pub const MAX_ENVIRONMENT_MAPS: u32 = 8;

// ===== FRAME PARAMS =====

/// Per-frame parameters (uniform region at offset 0)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameParams {
    /// Seconds since engine start
    pub time: f32,
    /// Seconds since the previous frame
    pub delta_time: f32,
    /// Monotonic frame counter
    pub frame_index: u32,
    /// Number of active lights
    pub light_count: u32,
    /// Ambient light color (rgb) and intensity (a)
    pub ambient: Vec4,
}

// ===== CAMERA PARAMS =====

/// Per-camera parameters (uniform region at offset [`UNIFORM_ALIGNMENT`])
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraParams {
    /// Combined view-projection matrix
    pub view_projection: Mat4,
    /// World-space eye position (w unused)
    pub eye_position: Vec4,
    /// Normalized world-space view direction (w unused)
    pub view_direction: Vec4,
    /// x = near plane, y = far plane, zw unused
    pub near_far: Vec4,
}

// ===== INSTANCE PARAMS =====

/// Per-drawable-instance element of the instance structured array
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceParams {
    /// World transform of the instance
    pub model: Mat4,
    /// Inverse-transpose of the world transform (normal transformation)
    pub normal_matrix: Mat4,
    /// Index into the material parameter array
    pub material_index: u32,
    /// Per-instance flag bits
    pub flags: u32,
    /// Padding to a 16-byte boundary
    pub _pad: [u32; 2],
}

// ===== MATERIAL PARAMS =====

/// Per-unique-material element of the material structured array.
///
/// Texture and sampler references are small integer slots into the fixed
/// material texture/sampler arrays, never native handles, so this struct
/// stays index-only and trivially copyable.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialParams {
    /// Base color multiplier (linear RGBA)
    pub base_color_factor: Vec4,
    /// Emissive color (rgb) and unused alpha
    pub emissive_factor: Vec4,
    /// Metalness multiplier
    pub metallic_factor: f32,
    /// Roughness multiplier
    pub roughness_factor: f32,
    /// Occlusion texture strength
    pub occlusion_strength: f32,
    /// Normal map scale
    pub normal_scale: f32,
    /// Texture array slot of the base color map
    pub base_color_texture: u32,
    /// Sampler array slot of the base color map
    pub base_color_sampler: u32,
    /// Texture array slot of the metallic-roughness map
    pub metallic_roughness_texture: u32,
    /// Sampler array slot of the metallic-roughness map
    pub metallic_roughness_sampler: u32,
    /// Texture array slot of the normal map
    pub normal_texture: u32,
    /// Sampler array slot of the normal map
    pub normal_sampler: u32,
    /// Texture array slot of the occlusion map
    pub occlusion_texture: u32,
    /// Sampler array slot of the occlusion map
    pub occlusion_sampler: u32,
    /// Texture array slot of the emissive map
    pub emissive_texture: u32,
    /// Sampler array slot of the emissive map
    pub emissive_sampler: u32,
    /// Material flag bits (variant, populated slots)
    pub flags: u32,
    /// Padding to a 16-byte boundary
    pub _pad: u32,
}

// ===== STRIDES =====

/// Element stride of the instance structured array
pub const INSTANCE_PARAMS_STRIDE: usize = std::mem::size_of::<InstanceParams>();

/// Element stride of the material structured array
pub const MATERIAL_PARAMS_STRIDE: usize = std::mem::size_of::<MaterialParams>();

// Layout contract: strides equal struct sizes exactly and every struct is
// 16-byte aligned in std430 terms. Violations are compile errors.
const _: () = assert!(std::mem::size_of::<FrameParams>() % 16 == 0);
const _: () = assert!(std::mem::size_of::<CameraParams>() % 16 == 0);
const _: () = assert!(std::mem::size_of::<InstanceParams>() % 16 == 0);
const _: () = assert!(std::mem::size_of::<MaterialParams>() % 16 == 0);
const _: () = assert!(std::mem::size_of::<FrameParams>() <= UNIFORM_ALIGNMENT as usize);
const _: () = assert!(std::mem::size_of::<CameraParams>() <= UNIFORM_ALIGNMENT as usize);
const _: () = assert!(INSTANCE_PARAMS_STRIDE == 144);
const _: () = assert!(MATERIAL_PARAMS_STRIDE == 96);

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "shader_types_tests.rs"]
mod tests;
