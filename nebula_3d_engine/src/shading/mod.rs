//! Shading module - GPU parameter structs and the material parameter buffer
//! manager.

pub mod shader_types;
pub mod param_buffers;

pub use shader_types::{
    CameraParams, FrameParams, InstanceParams, MaterialParams, MAX_ENVIRONMENT_MAPS,
    MAX_INSTANCES, MAX_IRRADIANCE_MAPS, MAX_MATERIALS, MAX_MATERIAL_SAMPLERS,
    MAX_MATERIAL_TEXTURES, UNIFORM_ALIGNMENT,
};
pub use param_buffers::MaterialParamBuffers;
