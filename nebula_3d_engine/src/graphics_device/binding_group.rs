//! BindingGroup trait and binding resources.
//!
//! A BindingGroup is an immutable set of GPU resource bindings (buffers,
//! samplers, image views). It is the abstraction over GPU descriptor sets.
//!
//! Key properties:
//! - Immutable after creation (no race conditions)
//! - Layout deduced from the resource list: entry `i` binds at slot `i`,
//!   with the binding type inferred from the resource variant
//! - Pool managed internally by the backend

use crate::graphics_device::{Buffer, ImageView, Sampler};

/// A concrete resource to bind into a BindingGroup
///
/// The position of a resource in the slice passed to
/// `GraphicsDevice::create_binding_group()` is its binding slot.
pub enum BindingResource<'a> {
    /// Uniform buffer region binding
    UniformBuffer {
        /// Buffer holding the region
        buffer: &'a dyn Buffer,
        /// Offset of the bound region in bytes
        offset: u64,
        /// Size of the bound region in bytes
        size: u64,
    },
    /// Storage buffer binding (whole buffer)
    StorageBuffer(&'a dyn Buffer),
    /// Standalone sampler binding
    Sampler(&'a dyn Sampler),
    /// Sampled image binding
    SampledImage(&'a dyn ImageView),
    /// Fixed-size array of samplers, bound as one arrayed slot
    SamplerArray(Vec<&'a dyn Sampler>),
    /// Fixed-size array of sampled images, bound as one arrayed slot
    SampledImageArray(Vec<&'a dyn ImageView>),
}

/// An immutable set of GPU resource bindings.
///
/// The layout and pool are managed internally by the backend.
/// Once created, a BindingGroup cannot be modified - create a new one
/// to change resources.
pub trait BindingGroup: Send + Sync {
    /// Returns the set index this BindingGroup was created for
    fn set_index(&self) -> u32;
}
