use super::*;
use bytemuck::Zeroable;
use glam::Vec4;

use crate::graphics_device::mock_graphics_device::{
    MockCommandList, MockGraphicsDevice, MockImage, MockImageView,
};
use crate::scene::camera::Projection;

// ============================================================================
// Test helpers
// ============================================================================

fn make_device() -> (Arc<Mutex<MockGraphicsDevice>>, Arc<Mutex<dyn GraphicsDevice>>) {
    let mock = Arc::new(Mutex::new(MockGraphicsDevice::new()));
    let device: Arc<Mutex<dyn GraphicsDevice>> = mock.clone();
    (mock, device)
}

fn make_view() -> Arc<dyn ImageView> {
    let image = Arc::new(MockImage::new(
        ImageDesc {
            width: 2,
            height: 2,
            format: ImageFormat::R8G8B8A8_UNORM,
            mip_levels: 1,
            data: vec![0u8; 16],
        },
        "img".to_string(),
    ));
    Arc::new(MockImageView::new(image, "view".to_string()))
}

// ============================================================================
// Construction tests
// ============================================================================

#[test]
fn test_new_creates_three_buffer_pairs() {
    let (mock, device) = make_device();
    let _buffers = MaterialParamBuffers::new(device).unwrap();

    let mock = mock.lock().unwrap();
    assert_eq!(
        mock.get_created_buffers(),
        vec![
            "buffer_512".to_string(),
            "buffer_512".to_string(),
            "buffer_147456".to_string(),
            "buffer_147456".to_string(),
            "buffer_24576".to_string(),
            "buffer_24576".to_string(),
        ]
    );
    // white, flat normal and BRDF placeholder, each with a view
    assert_eq!(mock.get_created_images().len(), 3);
    assert_eq!(mock.get_created_image_views().len(), 3);
    assert_eq!(mock.get_created_samplers().len(), 1);
}

#[test]
fn test_buffer_creation_failure_releases_earlier_buffers() {
    let (mock, device) = make_device();
    mock.lock().unwrap().fail_buffer_create_after(3);

    assert!(MaterialParamBuffers::new(device).is_err());

    let mock = mock.lock().unwrap();
    assert_eq!(mock.live_buffer_count(), 0);
}

#[test]
fn test_image_creation_failure_releases_everything() {
    let (mock, device) = make_device();
    mock.lock().unwrap().fail_image_create_after(1);

    assert!(MaterialParamBuffers::new(device).is_err());

    let mock = mock.lock().unwrap();
    assert_eq!(mock.live_buffer_count(), 0);
    assert_eq!(mock.live_image_count(), 0);
}

// ============================================================================
// Per-frame write tests
// ============================================================================

#[test]
fn test_set_frame_params_writes_staging_start() {
    let (mock, device) = make_device();
    let buffers = MaterialParamBuffers::new(device).unwrap();

    let mut params = FrameParams::zeroed();
    params.time = 2.5;
    params.delta_time = 0.016;
    params.frame_index = 42;
    params.light_count = 3;
    params.ambient = Vec4::new(0.1, 0.1, 0.2, 1.0);
    buffers.set_frame_params(&params).unwrap();

    let staging = mock.lock().unwrap().buffer_at(0).unwrap();
    assert_eq!(&staging.contents()[..32], bytemuck::bytes_of(&params));
}

#[test]
fn test_set_camera_params_writes_aligned_region() {
    let (mock, device) = make_device();
    let buffers = MaterialParamBuffers::new(device).unwrap();

    let mut camera = Camera::new(Projection::Perspective {
        fov_y: 1.2,
        aspect: 1.5,
        near: 0.5,
        far: 250.0,
    });
    camera.set_look_at(
        glam::Vec3::new(0.0, 2.0, 5.0),
        glam::Vec3::ZERO,
        glam::Vec3::Y,
    );
    buffers.set_camera_params(&camera).unwrap();

    let expected = CameraParams {
        view_projection: camera.view_projection_matrix(),
        eye_position: camera.eye().extend(1.0),
        view_direction: camera.view_direction().extend(0.0),
        near_far: Vec4::new(0.5, 250.0, 0.0, 0.0),
    };
    let staging = mock.lock().unwrap().buffer_at(0).unwrap();
    assert_eq!(&staging.contents()[256..368], bytemuck::bytes_of(&expected));
    // Frame region untouched
    assert_eq!(&staging.contents()[..32], &[0u8; 32]);
}

#[test]
fn test_instance_params_mut_maps_indexed_slot() {
    let (mock, device) = make_device();
    let mut buffers = MaterialParamBuffers::new(device).unwrap();

    let slot = buffers.instance_params_mut(5).unwrap();
    slot.model = glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
    slot.material_index = 7;
    slot.flags = 1;
    let written = *slot;

    let staging = mock.lock().unwrap().buffer_at(2).unwrap();
    let offset = 5 * INSTANCE_PARAMS_STRIDE;
    assert_eq!(
        &staging.contents()[offset..offset + INSTANCE_PARAMS_STRIDE],
        bytemuck::bytes_of(&written)
    );
}

#[test]
fn test_instance_params_mut_bounds() {
    let (_mock, device) = make_device();
    let mut buffers = MaterialParamBuffers::new(device).unwrap();

    assert!(buffers.instance_params_mut(MAX_INSTANCES - 1).is_some());
    assert!(buffers.instance_params_mut(MAX_INSTANCES).is_none());
}

#[test]
fn test_material_params_mut_maps_indexed_slot() {
    let (mock, device) = make_device();
    let mut buffers = MaterialParamBuffers::new(device).unwrap();

    let slot = buffers.material_params_mut(3).unwrap();
    slot.base_color_factor = Vec4::new(1.0, 0.5, 0.25, 1.0);
    slot.metallic_factor = 0.8;
    slot.base_color_texture = 12;
    let written = *slot;

    let staging = mock.lock().unwrap().buffer_at(4).unwrap();
    let offset = 3 * MATERIAL_PARAMS_STRIDE;
    assert_eq!(
        &staging.contents()[offset..offset + MATERIAL_PARAMS_STRIDE],
        bytemuck::bytes_of(&written)
    );

    assert!(buffers.material_params_mut(MAX_MATERIALS).is_none());
    assert!(buffers.material_params_mut(MAX_MATERIALS - 1).is_some());
}

// ============================================================================
// Copy recording tests
// ============================================================================

#[test]
fn test_copy_buffers_records_three_full_copies() {
    let (mock, device) = make_device();
    let buffers = MaterialParamBuffers::new(device).unwrap();

    let mut params = FrameParams::zeroed();
    params.frame_index = 9;
    buffers.set_frame_params(&params).unwrap();

    let mut cmd = MockCommandList::new();
    cmd.begin().unwrap();
    buffers.copy_buffers(&mut cmd).unwrap();
    cmd.end().unwrap();

    assert_eq!(
        cmd.commands,
        vec![
            "begin".to_string(),
            "copy_buffer x1".to_string(),
            "copy_buffer x1".to_string(),
            "copy_buffer x1".to_string(),
            "end".to_string(),
        ]
    );

    // Mock copies run at record time: the GPU-side uniform pair now holds
    // the staged frame params
    let gpu = mock.lock().unwrap().buffer_at(1).unwrap();
    assert_eq!(&gpu.contents()[..32], bytemuck::bytes_of(&params));
}

// ============================================================================
// Binding group tests
// ============================================================================

#[test]
fn test_binding_group_slot_contract() {
    let (mock, device) = make_device();
    let mut buffers = MaterialParamBuffers::new(device).unwrap();

    let group = buffers.binding_group().unwrap();
    assert_eq!(group.set_index(), PARAM_SET_INDEX);

    let slots = mock.lock().unwrap().get_binding_group_slots();
    assert_eq!(slots.len(), 1);
    assert_eq!(
        slots[0],
        vec![
            "uniform_buffer".to_string(),
            "uniform_buffer".to_string(),
            "storage_buffer".to_string(),
            "storage_buffer".to_string(),
            "sampler".to_string(),
            "sampled_image".to_string(),
            "sampler".to_string(),
            "sampler".to_string(),
            "sampled_image_array[8]".to_string(),
            "sampled_image_array[8]".to_string(),
            "sampler_array[16]".to_string(),
            "sampled_image_array[64]".to_string(),
        ]
    );
}

#[test]
fn test_binding_group_cached_until_slot_change() {
    let (mock, device) = make_device();
    let mut buffers = MaterialParamBuffers::new(device).unwrap();

    buffers.binding_group().unwrap();
    buffers.binding_group().unwrap();
    assert_eq!(mock.lock().unwrap().get_created_binding_groups().len(), 1);

    buffers.set_material_texture(0, make_view()).unwrap();
    buffers.binding_group().unwrap();
    assert_eq!(mock.lock().unwrap().get_created_binding_groups().len(), 2);
}

#[test]
fn test_set_brdf_lut_invalidates_binding_group() {
    let (mock, device) = make_device();
    let mut buffers = MaterialParamBuffers::new(device).unwrap();
    buffers.binding_group().unwrap();

    buffers.set_brdf_lut(make_view());
    buffers.binding_group().unwrap();
    assert_eq!(mock.lock().unwrap().get_created_binding_groups().len(), 2);
}

#[test]
fn test_slot_setters_reject_out_of_range() {
    let (_mock, device) = make_device();
    let mut buffers = MaterialParamBuffers::new(device.clone()).unwrap();

    let sampler = {
        let mut locked = device.lock().unwrap();
        locked.create_sampler(SamplerDesc::default()).unwrap()
    };

    assert!(buffers.set_material_sampler(MAX_MATERIAL_SAMPLERS, sampler).is_err());
    assert!(buffers.set_material_texture(MAX_MATERIAL_TEXTURES, make_view()).is_err());
    assert!(buffers.set_irradiance_map(MAX_IRRADIANCE_MAPS, make_view()).is_err());
    assert!(buffers.set_environment_map(MAX_ENVIRONMENT_MAPS, make_view()).is_err());

    // In-range slots still accept
    assert!(buffers.set_material_texture(MAX_MATERIAL_TEXTURES - 1, make_view()).is_ok());
}

#[test]
fn test_buffer_accessors_expose_gpu_side() {
    let (_mock, device) = make_device();
    let buffers = MaterialParamBuffers::new(device).unwrap();

    assert_eq!(buffers.uniform_buffer().size(), 512);
    assert_eq!(buffers.instance_buffer().size(), 147456);
    assert_eq!(buffers.material_buffer().size(), 24576);
}
