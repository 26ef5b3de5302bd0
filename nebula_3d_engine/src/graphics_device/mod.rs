//! Graphics device module - backend-agnostic GPU types and traits.

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod vertex;
pub mod image;
pub mod sampler;
pub mod command_list;
pub mod binding_group;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use vertex::*;
pub use image::*;
pub use sampler::*;
pub use command_list::*;
pub use binding_group::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
