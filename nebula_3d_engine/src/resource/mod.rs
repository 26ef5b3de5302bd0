//! Resource module - cached, shared GPU-resident objects.
//!
//! Resources are created by the asset loader through the ResourceCache and
//! shared by reference across every node and mesh that uses them. Kinds:
//! sampler, image (raw device image), texture, material, mesh-data, mesh.

pub mod vertex;
pub mod cache;
pub mod sampler;
pub mod texture;
pub mod material;
pub mod mesh;

pub use vertex::VertexAttributeFlags;
pub use cache::{ResourceCache, SessionIds};
pub use sampler::Sampler;
pub use texture::Texture;
pub use material::{
    DebugMaterial, DebugVisualization, ErrorMaterial, Material, StandardMaterial,
    StandardMaterialDesc, UnlitMaterial,
};
pub use mesh::{Aabb, BufferRange, Mesh, MeshData, PrimitiveBatch};
