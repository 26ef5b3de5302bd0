/*!
# Nebula 3D Engine

Scene-asset ingestion and GPU-resource caching core for the Nebula 3D
rendering engine.

This crate turns an external glTF scene description into GPU-resident,
render-ready data while deduplicating shared resources and maintaining a
lazily-evaluated spatial transform hierarchy. The low-level graphics API is
an external collaborator reached through the `GraphicsDevice` trait.

## Architecture

- **NodeGraph**: Hierarchical transform nodes with dirty-flag propagation
- **ResourceCache**: Content-keyed deduplication of GPU objects
- **AssetLoader**: glTF scene walker that repacks geometry into per-mesh buffers
- **MaterialParamBuffers**: Staging/GPU buffer pairs and the fixed binding contract

Backend implementations provide concrete types for the graphics_device traits.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod scene;
pub mod resource;
pub mod shading;
pub mod asset;

mod utils;

// Main nebula3d namespace module
pub mod nebula3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Graphics device sub-module with the collaborator traits and formats
    pub mod graphics_device {
        pub use crate::graphics_device::*;
    }

    // Scene sub-module (node graph, cameras, lights, loaded scenes)
    pub mod scene {
        pub use crate::scene::*;
    }

    // Resource sub-module (cache, materials, meshes, textures)
    pub mod resource {
        pub use crate::resource::*;
    }

    // Shading sub-module (GPU parameter structs and buffer manager)
    pub mod shading {
        pub use crate::shading::*;
    }

    // Asset sub-module (glTF loader)
    pub mod asset {
        pub use crate::asset::*;
    }
}

// Re-export math library at crate root
pub use glam;
