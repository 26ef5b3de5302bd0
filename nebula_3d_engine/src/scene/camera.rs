//! Camera — view and projection parameters for a camera node.
//!
//! The camera stores a world-space eye/target/up triple plus a projection.
//! Camera nodes keep eye and target in sync with the node's world transform;
//! a free-standing Camera can also be driven directly by the caller.

use glam::{Mat4, Vec3};

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov_y: f32,
        /// Width / height ratio
        aspect: f32,
        /// Near clip plane distance
        near: f32,
        /// Far clip plane distance
        far: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// Half extent along X
        xmag: f32,
        /// Half extent along Y
        ymag: f32,
        /// Near clip plane distance
        near: f32,
        /// Far clip plane distance
        far: f32,
    },
}

/// A camera with look-at orientation and a projection.
#[derive(Debug, Clone)]
pub struct Camera {
    eye: Vec3,
    target: Vec3,
    up: Vec3,
    projection: Projection,
}

impl Camera {
    /// Create a new camera looking down -Z from the origin
    pub fn new(projection: Projection) -> Self {
        Self {
            eye: Vec3::ZERO,
            target: -Vec3::Z,
            up: Vec3::Y,
            projection,
        }
    }

    // ===== GETTERS =====

    /// World-space eye position
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// World-space look-at target
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Up vector
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// The projection parameters
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Normalized view direction (eye towards target)
    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// Near clip plane distance
    pub fn near(&self) -> f32 {
        match self.projection {
            Projection::Perspective { near, .. } => near,
            Projection::Orthographic { near, .. } => near,
        }
    }

    /// Far clip plane distance
    pub fn far(&self) -> f32 {
        match self.projection {
            Projection::Perspective { far, .. } => far,
            Projection::Orthographic { far, .. } => far,
        }
    }

    /// View matrix (right-handed look-at)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix (right-handed, depth 0..1)
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y, aspect, near, far),
            Projection::Orthographic {
                xmag,
                ymag,
                near,
                far,
            } => Mat4::orthographic_rh(-xmag, xmag, -ymag, ymag, near, far),
        }
    }

    /// Combined view-projection matrix (projection * view)
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    // ===== SETTERS =====

    /// Set eye position and look-at target
    pub fn set_look_at(&mut self, eye: Vec3, target: Vec3, up: Vec3) {
        self.eye = eye;
        self.target = target;
        self.up = up;
    }

    /// Set the projection parameters
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    /// Derive eye and target from a world transform matrix.
    ///
    /// The eye is the matrix translation; the target is one unit along the
    /// world-space forward vector (-Z axis of the matrix). Called by the node
    /// graph whenever a camera node's transform changes.
    pub fn set_from_world_matrix(&mut self, world: &Mat4) {
        let eye = world.col(3).truncate();
        let forward = -world.col(2).truncate().normalize_or_zero();
        self.eye = eye;
        self.target = eye + forward;
        self.up = world.col(1).truncate().normalize_or_zero();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
