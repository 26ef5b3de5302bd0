use super::*;
use std::sync::Arc;

use crate::graphics_device::mock_graphics_device::{MockBuffer, MockImage, MockSampler};
use crate::graphics_device::{BufferUsage, ImageDesc, ImageFormat, SamplerDesc};
use crate::resource::material::ErrorMaterial;
use crate::resource::vertex::VertexAttributeFlags;

// ============================================================================
// Test helpers
// ============================================================================

fn sampler(slot: u32) -> Arc<Sampler> {
    let device_sampler = Arc::new(MockSampler::new(SamplerDesc::default(), "s".to_string()));
    Arc::new(Sampler::new(device_sampler, slot))
}

fn image() -> Arc<dyn graphics_device::Image> {
    Arc::new(MockImage::new(
        ImageDesc {
            width: 1,
            height: 1,
            format: ImageFormat::R8G8B8A8_UNORM,
            mip_levels: 1,
            data: vec![0u8; 4],
        },
        "img".to_string(),
    ))
}

fn mesh_data() -> Arc<MeshData> {
    let buffer = Arc::new(MockBuffer::new(64, BufferUsage::VERTEX, "geom".to_string()));
    Arc::new(MeshData::new(buffer, VertexAttributeFlags::empty()))
}

// ============================================================================
// SessionIds tests
// ============================================================================

#[test]
fn test_session_ids_deterministic_per_source() {
    let first = SessionIds::new("assets/helmet.glb");
    let second = SessionIds::new("assets/helmet.glb");
    assert_eq!(first.sampler_id(0), second.sampler_id(0));
    assert_eq!(first.mesh_id(3), second.mesh_id(3));
    assert_eq!(first.default_material_id(), second.default_material_id());
}

#[test]
fn test_session_ids_differ_between_sources() {
    let helmet = SessionIds::new("assets/helmet.glb");
    let lantern = SessionIds::new("assets/lantern.glb");
    assert_ne!(helmet.image_id(0), lantern.image_id(0));
}

#[test]
fn test_kind_bands_do_not_overlap() {
    let ids = SessionIds::new("scene.gltf");
    // Each kind occupies its own stride-wide band
    assert_eq!(ids.image_id(0) - ids.sampler_id(0), KIND_STRIDE);
    assert_eq!(ids.texture_id(0) - ids.image_id(0), KIND_STRIDE);
    assert_eq!(ids.material_id(0) - ids.texture_id(0), KIND_STRIDE);
    assert_eq!(ids.mesh_id(0) - ids.material_id(0), 2 * KIND_STRIDE);
}

#[test]
fn test_default_ids_sit_at_band_end() {
    let ids = SessionIds::new("scene.gltf");
    assert_eq!(ids.default_sampler_id(), ids.sampler_id(0) + KIND_STRIDE - 1);
    assert_eq!(ids.default_material_id(), ids.material_id(0) + KIND_STRIDE - 1);
    // Distinct from any realistic external index
    assert_ne!(ids.default_sampler_id(), ids.sampler_id(4096));
}

#[test]
fn test_mesh_data_id_order_insensitive() {
    let ids = SessionIds::new("scene.gltf");
    assert_eq!(ids.mesh_data_id(&[3, 1, 2]), ids.mesh_data_id(&[2, 3, 1]));
    // Duplicates collapse
    assert_eq!(ids.mesh_data_id(&[1, 2, 2, 3]), ids.mesh_data_id(&[3, 2, 1]));
    assert_ne!(ids.mesh_data_id(&[1, 2]), ids.mesh_data_id(&[1, 2, 3]));
}

#[test]
fn test_mesh_data_id_scoped_to_session() {
    let helmet = SessionIds::new("helmet.glb");
    let lantern = SessionIds::new("lantern.glb");
    assert_ne!(helmet.mesh_data_id(&[0, 1]), lantern.mesh_data_id(&[0, 1]));
}

// ============================================================================
// Find / cache tests
// ============================================================================

#[test]
fn test_find_on_empty_cache() {
    let cache = ResourceCache::new();
    assert!(cache.find_sampler(1).is_none());
    assert!(cache.find_image(1).is_none());
    assert!(cache.find_texture(1).is_none());
    assert!(cache.find_material(1).is_none());
    assert!(cache.find_mesh_data(1).is_none());
    assert!(cache.find_mesh(1).is_none());
}

#[test]
fn test_cache_then_find_returns_same_object() {
    let mut cache = ResourceCache::new();
    let original = sampler(0);
    let cached = cache.cache_sampler(7, Arc::clone(&original));

    assert!(Arc::ptr_eq(&cached, &original));
    let found = cache.find_sampler(7).unwrap();
    assert!(Arc::ptr_eq(&found, &original));
    assert_eq!(cache.sampler_count(), 1);
}

#[test]
fn test_cache_occupied_id_keeps_existing() {
    let mut cache = ResourceCache::new();
    let first = image();
    let second = image();
    cache.cache_image(5, Arc::clone(&first));

    let returned = cache.cache_image(5, Arc::clone(&second));
    assert!(Arc::ptr_eq(&returned, &first));
    assert!(!Arc::ptr_eq(&returned, &second));
    assert_eq!(cache.image_count(), 1);
}

#[test]
fn test_cache_same_object_twice_is_idempotent() {
    let mut cache = ResourceCache::new();
    let data = mesh_data();
    cache.cache_mesh_data(9, Arc::clone(&data));
    let returned = cache.cache_mesh_data(9, Arc::clone(&data));

    assert!(Arc::ptr_eq(&returned, &data));
    assert_eq!(cache.mesh_data_count(), 1);
}

#[test]
fn test_kinds_are_independent_maps() {
    let mut cache = ResourceCache::new();
    cache.cache_sampler(1, sampler(0));
    cache.cache_image(1, image());
    cache.cache_material(1, Arc::new(ErrorMaterial::new("m".to_string(), 0)));

    assert_eq!(cache.sampler_count(), 1);
    assert_eq!(cache.image_count(), 1);
    assert_eq!(cache.material_count(), 1);
    assert!(cache.find_texture(1).is_none());
}

// ============================================================================
// Slot allocation tests
// ============================================================================

#[test]
fn test_slot_allocation_sequential_per_kind() {
    let mut cache = ResourceCache::new();
    assert_eq!(cache.alloc_sampler_slot().unwrap(), 0);
    assert_eq!(cache.alloc_sampler_slot().unwrap(), 1);
    // Texture and material slots advance independently
    assert_eq!(cache.alloc_texture_slot().unwrap(), 0);
    assert_eq!(cache.alloc_material_slot().unwrap(), 0);
    assert_eq!(cache.alloc_sampler_slot().unwrap(), 2);
}

#[test]
fn test_sampler_slot_exhaustion_is_out_of_memory() {
    let mut cache = ResourceCache::new();
    for _ in 0..MAX_MATERIAL_SAMPLERS {
        cache.alloc_sampler_slot().unwrap();
    }
    match cache.alloc_sampler_slot() {
        Err(Error::OutOfMemory) => {}
        other => panic!("expected OutOfMemory, got {:?}", other),
    }
}

#[test]
fn test_material_slot_exhaustion_is_out_of_memory() {
    let mut cache = ResourceCache::new();
    for _ in 0..MAX_MATERIALS {
        cache.alloc_material_slot().unwrap();
    }
    assert!(matches!(cache.alloc_material_slot(), Err(Error::OutOfMemory)));
}

// ============================================================================
// Teardown tests
// ============================================================================

#[test]
fn test_destroy_all_clears_entries_and_slots() {
    let mut cache = ResourceCache::new();
    cache.cache_sampler(1, sampler(0));
    cache.cache_image(2, image());
    cache.cache_mesh_data(3, mesh_data());
    cache.alloc_sampler_slot().unwrap();
    cache.alloc_texture_slot().unwrap();

    cache.destroy_all();

    assert_eq!(cache.sampler_count(), 0);
    assert_eq!(cache.image_count(), 0);
    assert_eq!(cache.mesh_data_count(), 0);
    assert!(cache.find_sampler(1).is_none());
    // Slot ranges restart from zero
    assert_eq!(cache.alloc_sampler_slot().unwrap(), 0);
    assert_eq!(cache.alloc_texture_slot().unwrap(), 0);
}

#[test]
fn test_destroy_all_releases_shared_objects() {
    let mut cache = ResourceCache::new();
    let data = mesh_data();
    cache.cache_mesh_data(1, Arc::clone(&data));
    assert_eq!(Arc::strong_count(&data), 2);

    cache.destroy_all();
    assert_eq!(Arc::strong_count(&data), 1);
}
