//! Material parameter buffer manager.
//!
//! Owns the CPU-staging / GPU-resident buffer pairs for the four parameter
//! regions (frame, camera, per-instance array, per-material array) and the
//! fixed binding contract renderers consume. Frame and camera params share
//! one uniform buffer pair at 256-byte-aligned offsets; the two structured
//! arrays are their own pairs. `copy_buffers` records the staging→GPU copy
//! for all three pairs once per frame.
//!
//! Every binding slot is valid from construction: the manager creates 1×1
//! default textures, a default sampler and a placeholder BRDF lookup, and
//! pre-fills the fixed-size arrays with them. Setters replace individual
//! slots and lazily rebuild the binding group.

use std::sync::{Arc, Mutex};

use crate::engine_bail;
use crate::error::Result;
use crate::graphics_device::{
    AddressMode, BindingGroup, BindingResource, Buffer, BufferCopy, BufferDesc, BufferUsage,
    CommandList, Filter, GraphicsDevice, ImageDesc, ImageFormat, ImageView, ImageViewDesc,
    MipmapMode, SamplerDesc,
};
use crate::scene::camera::Camera;
use super::shader_types::{
    CameraParams, FrameParams, InstanceParams, MaterialParams, INSTANCE_PARAMS_STRIDE,
    MATERIAL_PARAMS_STRIDE, MAX_ENVIRONMENT_MAPS, MAX_INSTANCES, MAX_IRRADIANCE_MAPS,
    MAX_MATERIALS, MAX_MATERIAL_SAMPLERS, MAX_MATERIAL_TEXTURES, UNIFORM_ALIGNMENT,
};

const SOURCE: &str = "nebula3d::MaterialParamBuffers";

// ===== BINDING CONTRACT =====

/// Descriptor set index all parameter bindings live in
pub const PARAM_SET_INDEX: u32 = 0;

/// Binding slot of the frame params uniform region
pub const BINDING_FRAME_PARAMS: u32 = 0;
/// Binding slot of the camera params uniform region
pub const BINDING_CAMERA_PARAMS: u32 = 1;
/// Binding slot of the per-instance structured array
pub const BINDING_INSTANCE_PARAMS: u32 = 2;
/// Binding slot of the per-material structured array
pub const BINDING_MATERIAL_PARAMS: u32 = 3;
/// Binding slot of the BRDF lookup sampler
pub const BINDING_BRDF_SAMPLER: u32 = 4;
/// Binding slot of the BRDF lookup texture
pub const BINDING_BRDF_TEXTURE: u32 = 5;
/// Binding slot of the irradiance map sampler
pub const BINDING_IRRADIANCE_SAMPLER: u32 = 6;
/// Binding slot of the environment map sampler
pub const BINDING_ENVIRONMENT_SAMPLER: u32 = 7;
/// Binding slot of the irradiance map array
pub const BINDING_IRRADIANCE_MAPS: u32 = 8;
/// Binding slot of the environment map array
pub const BINDING_ENVIRONMENT_MAPS: u32 = 9;
/// Binding slot of the material sampler array
pub const BINDING_MATERIAL_SAMPLERS: u32 = 10;
/// Binding slot of the material texture array
pub const BINDING_MATERIAL_TEXTURES: u32 = 11;

/// Byte offset of the camera params region in the shared uniform pair
const CAMERA_PARAMS_OFFSET: u64 = UNIFORM_ALIGNMENT;
/// Total size of the shared uniform pair (frame region + camera region)
const UNIFORM_BUFFER_SIZE: u64 = UNIFORM_ALIGNMENT * 2;

const INSTANCE_BUFFER_SIZE: u64 = MAX_INSTANCES as u64 * INSTANCE_PARAMS_STRIDE as u64;
const MATERIAL_BUFFER_SIZE: u64 = MAX_MATERIALS as u64 * MATERIAL_PARAMS_STRIDE as u64;

// ===== MANAGER =====

/// Staging/GPU buffer pairs plus the fixed-slot binding group.
pub struct MaterialParamBuffers {
    graphics_device: Arc<Mutex<dyn GraphicsDevice>>,

    /// Frame + camera uniform regions, CPU-writable side
    uniform_staging: Arc<dyn Buffer>,
    /// Frame + camera uniform regions, GPU-resident side
    uniform_gpu: Arc<dyn Buffer>,
    /// Per-instance structured array, CPU-writable side
    instance_staging: Arc<dyn Buffer>,
    /// Per-instance structured array, GPU-resident side
    instance_gpu: Arc<dyn Buffer>,
    /// Per-material structured array, CPU-writable side
    material_staging: Arc<dyn Buffer>,
    /// Per-material structured array, GPU-resident side
    material_gpu: Arc<dyn Buffer>,

    /// Default sampler bound to the BRDF/irradiance/environment slots and
    /// pre-filling the material sampler array
    default_sampler: Arc<dyn crate::graphics_device::Sampler>,
    /// Placeholder BRDF lookup view until a real LUT is set
    brdf_lut: Arc<dyn ImageView>,
    /// Fixed-size material sampler array
    material_samplers: Vec<Arc<dyn crate::graphics_device::Sampler>>,
    /// Fixed-size material texture array
    material_textures: Vec<Arc<dyn ImageView>>,
    /// Fixed-size irradiance map array
    irradiance_maps: Vec<Arc<dyn ImageView>>,
    /// Fixed-size environment map array
    environment_maps: Vec<Arc<dyn ImageView>>,

    /// Lazily built binding group; None after any slot change
    binding_group: Option<Arc<dyn BindingGroup>>,
}

impl MaterialParamBuffers {
    /// Create the manager with all buffers, default resources and pre-filled
    /// arrays.
    ///
    /// Fatal if any sub-resource fails to allocate; partially created
    /// resources are released as the error propagates.
    pub fn new(graphics_device: Arc<Mutex<dyn GraphicsDevice>>) -> Result<Self> {
        let (
            uniform_staging,
            uniform_gpu,
            instance_staging,
            instance_gpu,
            material_staging,
            material_gpu,
            default_sampler,
            default_white,
            default_normal,
            brdf_lut,
        ) = {
            let mut device = graphics_device.lock().unwrap();

            let uniform_staging = device.create_buffer(BufferDesc {
                size: UNIFORM_BUFFER_SIZE,
                usage: BufferUsage::TRANSFER_SRC,
            })?;
            let uniform_gpu = device.create_buffer(BufferDesc {
                size: UNIFORM_BUFFER_SIZE,
                usage: BufferUsage::UNIFORM | BufferUsage::TRANSFER_DST,
            })?;
            let instance_staging = device.create_buffer(BufferDesc {
                size: INSTANCE_BUFFER_SIZE,
                usage: BufferUsage::TRANSFER_SRC,
            })?;
            let instance_gpu = device.create_buffer(BufferDesc {
                size: INSTANCE_BUFFER_SIZE,
                usage: BufferUsage::STORAGE | BufferUsage::TRANSFER_DST,
            })?;
            let material_staging = device.create_buffer(BufferDesc {
                size: MATERIAL_BUFFER_SIZE,
                usage: BufferUsage::TRANSFER_SRC,
            })?;
            let material_gpu = device.create_buffer(BufferDesc {
                size: MATERIAL_BUFFER_SIZE,
                usage: BufferUsage::STORAGE | BufferUsage::TRANSFER_DST,
            })?;

            let default_sampler = device.create_sampler(SamplerDesc {
                mag_filter: Filter::Linear,
                min_filter: Filter::Linear,
                mipmap_mode: MipmapMode::Linear,
                address_mode_u: AddressMode::ClampToEdge,
                address_mode_v: AddressMode::ClampToEdge,
                address_mode_w: AddressMode::ClampToEdge,
            })?;

            // 1x1 defaults so every array slot is valid before any load
            let white = device.create_image(ImageDesc {
                width: 1,
                height: 1,
                format: ImageFormat::R8G8B8A8_UNORM,
                mip_levels: 1,
                data: vec![255, 255, 255, 255],
            })?;
            let normal = device.create_image(ImageDesc {
                width: 1,
                height: 1,
                format: ImageFormat::R8G8B8A8_UNORM,
                mip_levels: 1,
                data: vec![128, 128, 255, 255],
            })?;
            let brdf = device.create_image(ImageDesc {
                width: 1,
                height: 1,
                format: ImageFormat::R8G8_UNORM,
                mip_levels: 1,
                data: vec![128, 128],
            })?;

            let default_white = device.create_image_view(ImageViewDesc { image: white })?;
            let default_normal = device.create_image_view(ImageViewDesc { image: normal })?;
            let brdf_lut = device.create_image_view(ImageViewDesc { image: brdf })?;

            (
                uniform_staging,
                uniform_gpu,
                instance_staging,
                instance_gpu,
                material_staging,
                material_gpu,
                default_sampler,
                default_white,
                default_normal,
                brdf_lut,
            )
        };

        // default_normal is kept through the texture array pre-fill so flat
        // tangent-space shading works before any normal map is set
        let mut material_textures = vec![Arc::clone(&default_white); MAX_MATERIAL_TEXTURES as usize];
        material_textures[1] = default_normal;

        let manager = Self {
            graphics_device,
            uniform_staging,
            uniform_gpu,
            instance_staging,
            instance_gpu,
            material_staging,
            material_gpu,
            material_samplers: vec![Arc::clone(&default_sampler); MAX_MATERIAL_SAMPLERS as usize],
            material_textures,
            irradiance_maps: vec![Arc::clone(&default_white); MAX_IRRADIANCE_MAPS as usize],
            environment_maps: vec![Arc::clone(&default_white); MAX_ENVIRONMENT_MAPS as usize],
            default_sampler,
            brdf_lut,
            binding_group: None,
        };

        crate::engine_info!(
            SOURCE,
            "Parameter buffers created ({} instance slots, {} material slots)",
            MAX_INSTANCES,
            MAX_MATERIALS
        );
        Ok(manager)
    }

    // ===== PER-FRAME SETTERS =====

    /// Write the frame params into the staging uniform region
    pub fn set_frame_params(&self, params: &FrameParams) -> Result<()> {
        self.uniform_staging.update(0, bytemuck::bytes_of(params))
    }

    /// Derive and write the camera params from a camera
    pub fn set_camera_params(&self, camera: &Camera) -> Result<()> {
        let params = CameraParams {
            view_projection: camera.view_projection_matrix(),
            eye_position: camera.eye().extend(1.0),
            view_direction: camera.view_direction().extend(0.0),
            near_far: glam::Vec4::new(camera.near(), camera.far(), 0.0, 0.0),
        };
        self.uniform_staging
            .update(CAMERA_PARAMS_OFFSET, bytemuck::bytes_of(&params))
    }

    /// Typed reference into the mapped instance array for direct writes.
    ///
    /// Returns None when `index` is at or beyond [`MAX_INSTANCES`] or the
    /// staging buffer is not CPU-mappable; never writes out of bounds.
    pub fn instance_params_mut(&mut self, index: u32) -> Option<&mut InstanceParams> {
        if index >= MAX_INSTANCES {
            return None;
        }
        let base = self.instance_staging.mapped_ptr()?;
        let offset = index as usize * INSTANCE_PARAMS_STRIDE;
        unsafe { Some(&mut *(base.add(offset) as *mut InstanceParams)) }
    }

    /// Typed reference into the mapped material array for direct writes.
    ///
    /// Returns None when `index` is at or beyond [`MAX_MATERIALS`] or the
    /// staging buffer is not CPU-mappable; never writes out of bounds.
    pub fn material_params_mut(&mut self, index: u32) -> Option<&mut MaterialParams> {
        if index >= MAX_MATERIALS {
            return None;
        }
        let base = self.material_staging.mapped_ptr()?;
        let offset = index as usize * MATERIAL_PARAMS_STRIDE;
        unsafe { Some(&mut *(base.add(offset) as *mut MaterialParams)) }
    }

    /// Record the staging→GPU copies for all three buffer pairs.
    ///
    /// Called once per frame with a recording command list.
    pub fn copy_buffers(&self, cmd: &mut dyn CommandList) -> Result<()> {
        cmd.copy_buffer(
            self.uniform_staging.as_ref(),
            self.uniform_gpu.as_ref(),
            &[BufferCopy {
                src_offset: 0,
                dst_offset: 0,
                size: UNIFORM_BUFFER_SIZE,
            }],
        )?;
        cmd.copy_buffer(
            self.instance_staging.as_ref(),
            self.instance_gpu.as_ref(),
            &[BufferCopy {
                src_offset: 0,
                dst_offset: 0,
                size: INSTANCE_BUFFER_SIZE,
            }],
        )?;
        cmd.copy_buffer(
            self.material_staging.as_ref(),
            self.material_gpu.as_ref(),
            &[BufferCopy {
                src_offset: 0,
                dst_offset: 0,
                size: MATERIAL_BUFFER_SIZE,
            }],
        )?;
        Ok(())
    }

    // ===== SLOT SETTERS =====

    /// Replace a material sampler array slot
    pub fn set_material_sampler(
        &mut self,
        slot: u32,
        sampler: Arc<dyn crate::graphics_device::Sampler>,
    ) -> Result<()> {
        if slot >= MAX_MATERIAL_SAMPLERS {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "set_material_sampler: slot {} out of range (max {})",
                slot,
                MAX_MATERIAL_SAMPLERS
            );
        }
        self.material_samplers[slot as usize] = sampler;
        self.binding_group = None;
        Ok(())
    }

    /// Replace a material texture array slot
    pub fn set_material_texture(&mut self, slot: u32, view: Arc<dyn ImageView>) -> Result<()> {
        if slot >= MAX_MATERIAL_TEXTURES {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "set_material_texture: slot {} out of range (max {})",
                slot,
                MAX_MATERIAL_TEXTURES
            );
        }
        self.material_textures[slot as usize] = view;
        self.binding_group = None;
        Ok(())
    }

    /// Replace an irradiance map array slot
    pub fn set_irradiance_map(&mut self, slot: u32, view: Arc<dyn ImageView>) -> Result<()> {
        if slot >= MAX_IRRADIANCE_MAPS {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "set_irradiance_map: slot {} out of range (max {})",
                slot,
                MAX_IRRADIANCE_MAPS
            );
        }
        self.irradiance_maps[slot as usize] = view;
        self.binding_group = None;
        Ok(())
    }

    /// Replace an environment map array slot
    pub fn set_environment_map(&mut self, slot: u32, view: Arc<dyn ImageView>) -> Result<()> {
        if slot >= MAX_ENVIRONMENT_MAPS {
            engine_bail!(
                SOURCE,
                InvalidArgument,
                "set_environment_map: slot {} out of range (max {})",
                slot,
                MAX_ENVIRONMENT_MAPS
            );
        }
        self.environment_maps[slot as usize] = view;
        self.binding_group = None;
        Ok(())
    }

    /// Replace the BRDF lookup texture
    pub fn set_brdf_lut(&mut self, view: Arc<dyn ImageView>) {
        self.brdf_lut = view;
        self.binding_group = None;
    }

    // ===== BINDING GROUP =====

    /// The binding group exposing the fixed slot contract, rebuilt lazily
    /// after any slot change.
    ///
    /// Slot order is the §6 contract: frame params, camera params, instance
    /// params, material params, BRDF sampler, BRDF texture, irradiance
    /// sampler, environment sampler, irradiance maps, environment maps,
    /// material samplers, material textures.
    pub fn binding_group(&mut self) -> Result<Arc<dyn BindingGroup>> {
        if let Some(group) = &self.binding_group {
            return Ok(Arc::clone(group));
        }

        let device = Arc::clone(&self.graphics_device);
        let device = device.lock().unwrap();
        let resources = [
            BindingResource::UniformBuffer {
                buffer: self.uniform_gpu.as_ref(),
                offset: 0,
                size: UNIFORM_ALIGNMENT,
            },
            BindingResource::UniformBuffer {
                buffer: self.uniform_gpu.as_ref(),
                offset: CAMERA_PARAMS_OFFSET,
                size: UNIFORM_ALIGNMENT,
            },
            BindingResource::StorageBuffer(self.instance_gpu.as_ref()),
            BindingResource::StorageBuffer(self.material_gpu.as_ref()),
            BindingResource::Sampler(self.default_sampler.as_ref()),
            BindingResource::SampledImage(self.brdf_lut.as_ref()),
            BindingResource::Sampler(self.default_sampler.as_ref()),
            BindingResource::Sampler(self.default_sampler.as_ref()),
            BindingResource::SampledImageArray(
                self.irradiance_maps.iter().map(|view| view.as_ref()).collect(),
            ),
            BindingResource::SampledImageArray(
                self.environment_maps.iter().map(|view| view.as_ref()).collect(),
            ),
            BindingResource::SamplerArray(
                self.material_samplers.iter().map(|sampler| sampler.as_ref()).collect(),
            ),
            BindingResource::SampledImageArray(
                self.material_textures.iter().map(|view| view.as_ref()).collect(),
            ),
        ];
        let group = device.create_binding_group(PARAM_SET_INDEX, &resources)?;
        self.binding_group = Some(Arc::clone(&group));
        Ok(group)
    }

    // ===== BUFFER ACCESSORS =====

    /// GPU-resident uniform pair (frame + camera regions)
    pub fn uniform_buffer(&self) -> &Arc<dyn Buffer> {
        &self.uniform_gpu
    }

    /// GPU-resident per-instance structured array
    pub fn instance_buffer(&self) -> &Arc<dyn Buffer> {
        &self.instance_gpu
    }

    /// GPU-resident per-material structured array
    pub fn material_buffer(&self) -> &Arc<dyn Buffer> {
        &self.material_gpu
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "param_buffers_tests.rs"]
mod tests;
