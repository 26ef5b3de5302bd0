//! Light — punctual light parameters for a light node.

use glam::Vec3;

/// Light variant with its shape parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Infinitely distant light, direction given by the node's -Z axis
    Directional,
    /// Omnidirectional point light
    Point,
    /// Cone-shaped spot light
    Spot {
        /// Angle in radians where falloff begins
        inner_cone_angle: f32,
        /// Angle in radians where intensity reaches zero
        outer_cone_angle: f32,
    },
}

/// A punctual light source.
///
/// Position and orientation come from the owning light node's world
/// transform; the Light itself carries only the photometric parameters.
#[derive(Debug, Clone)]
pub struct Light {
    kind: LightKind,
    color: Vec3,
    intensity: f32,
    range: Option<f32>,
}

impl Light {
    /// Create a new light
    ///
    /// # Arguments
    ///
    /// * `kind` - Light variant (directional, point, spot)
    /// * `color` - Linear RGB color
    /// * `intensity` - Luminous intensity (candela) or illuminance (lux) for
    ///   directional lights
    /// * `range` - Distance cutoff; None means unlimited
    pub fn new(kind: LightKind, color: Vec3, intensity: f32, range: Option<f32>) -> Self {
        Self {
            kind,
            color,
            intensity,
            range,
        }
    }

    /// Light variant
    pub fn kind(&self) -> LightKind {
        self.kind
    }

    /// Linear RGB color
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Intensity
    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Distance cutoff (None = unlimited)
    pub fn range(&self) -> Option<f32> {
        self.range
    }
}
