use super::*;
use glam::{Vec3, Vec4};

const EPSILON: f32 = 1e-5;

fn assert_vec3_near(actual: Vec3, expected: Vec3) {
    assert!(
        (actual - expected).length() < EPSILON,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

fn perspective() -> Projection {
    Projection::Perspective {
        fov_y: std::f32::consts::FRAC_PI_3,
        aspect: 16.0 / 9.0,
        near: 0.1,
        far: 100.0,
    }
}

// ============================================================================
// Construction and accessors
// ============================================================================

#[test]
fn test_new_camera_looks_down_negative_z() {
    let camera = Camera::new(perspective());
    assert_eq!(camera.eye(), Vec3::ZERO);
    assert_eq!(camera.target(), -Vec3::Z);
    assert_eq!(camera.up(), Vec3::Y);
    assert_vec3_near(camera.view_direction(), -Vec3::Z);
}

#[test]
fn test_near_far_from_projection() {
    let camera = Camera::new(perspective());
    assert_eq!(camera.near(), 0.1);
    assert_eq!(camera.far(), 100.0);

    let ortho = Camera::new(Projection::Orthographic {
        xmag: 2.0,
        ymag: 1.0,
        near: 0.5,
        far: 50.0,
    });
    assert_eq!(ortho.near(), 0.5);
    assert_eq!(ortho.far(), 50.0);
}

#[test]
fn test_set_look_at() {
    let mut camera = Camera::new(perspective());
    camera.set_look_at(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 0.0), Vec3::Y);

    assert_eq!(camera.eye(), Vec3::new(1.0, 2.0, 3.0));
    assert_vec3_near(camera.view_direction(), -Vec3::Z);
}

#[test]
fn test_set_projection_replaces_planes() {
    let mut camera = Camera::new(perspective());
    camera.set_projection(Projection::Orthographic {
        xmag: 1.0,
        ymag: 1.0,
        near: 1.0,
        far: 10.0,
    });
    assert_eq!(camera.near(), 1.0);
    assert_eq!(camera.far(), 10.0);
}

// ============================================================================
// Matrices
// ============================================================================

#[test]
fn test_view_matrix_moves_eye_to_origin() {
    let mut camera = Camera::new(perspective());
    camera.set_look_at(Vec3::new(5.0, 3.0, 8.0), Vec3::ZERO, Vec3::Y);

    let at_origin = camera.view_matrix() * Vec4::new(5.0, 3.0, 8.0, 1.0);
    assert!(at_origin.truncate().length() < EPSILON);
}

#[test]
fn test_orthographic_projection_maps_extents() {
    let camera = Camera::new(Projection::Orthographic {
        xmag: 4.0,
        ymag: 2.0,
        near: 0.1,
        far: 10.0,
    });

    // View-space extents map to clip-space unit edges
    let projected = camera.projection_matrix() * Vec4::new(4.0, -2.0, -1.0, 1.0);
    assert!((projected.x - 1.0).abs() < EPSILON);
    assert!((projected.y + 1.0).abs() < EPSILON);
}

#[test]
fn test_view_projection_is_projection_times_view() {
    let mut camera = Camera::new(perspective());
    camera.set_look_at(Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO, Vec3::Y);

    let expected = camera.projection_matrix() * camera.view_matrix();
    assert_eq!(camera.view_projection_matrix(), expected);
}

// ============================================================================
// World-matrix sync
// ============================================================================

#[test]
fn test_set_from_world_matrix_translation() {
    let mut camera = Camera::new(perspective());
    camera.set_from_world_matrix(&Mat4::from_translation(Vec3::new(5.0, 6.0, 7.0)));

    assert_vec3_near(camera.eye(), Vec3::new(5.0, 6.0, 7.0));
    // Forward stays -Z under a pure translation
    assert_vec3_near(camera.target(), Vec3::new(5.0, 6.0, 6.0));
    assert_vec3_near(camera.up(), Vec3::Y);
}

#[test]
fn test_set_from_world_matrix_rotation() {
    let mut camera = Camera::new(perspective());
    let world = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))
        * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
    camera.set_from_world_matrix(&world);

    assert_vec3_near(camera.eye(), Vec3::new(1.0, 0.0, 0.0));
    // The node's -Z axis now points down world -X
    assert_vec3_near(camera.view_direction(), Vec3::new(-1.0, 0.0, 0.0));
}
