//! glTF asset ingestion: format mapping, geometry repacking and the loader.

pub mod format;
pub mod geometry;
pub mod loader;

pub use loader::{AssetLoader, LoadOptions};
