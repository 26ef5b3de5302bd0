//! Scene module - node transform graph, cameras, lights and loaded scenes.

pub mod node;
pub mod camera;
pub mod light;
pub mod scene;

pub use node::{Node, NodeGraph, NodeKey, NodeKind, RotationOrder};
pub use camera::{Camera, Projection};
pub use light::{Light, LightKind};
pub use scene::Scene;
