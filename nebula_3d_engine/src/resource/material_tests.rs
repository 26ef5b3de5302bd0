use super::*;
use std::sync::Arc;

use glam::{Vec3, Vec4};

use crate::graphics_device::mock_graphics_device::{MockImage, MockImageView, MockSampler};
use crate::graphics_device::{ImageDesc, ImageFormat, SamplerDesc};
use crate::resource::sampler::Sampler;

// ============================================================================
// Test helpers
// ============================================================================

fn texture(slot: u32) -> Arc<Texture> {
    let image = Arc::new(MockImage::new(
        ImageDesc {
            width: 1,
            height: 1,
            format: ImageFormat::R8G8B8A8_UNORM,
            mip_levels: 1,
            data: vec![255u8; 4],
        },
        "img".to_string(),
    ));
    let view = Arc::new(MockImageView::new(image, "view".to_string()));
    let sampler = Arc::new(Sampler::new(
        Arc::new(MockSampler::new(SamplerDesc::default(), "s".to_string())),
        0,
    ));
    Arc::new(Texture::new(view, sampler, slot))
}

fn standard_desc(name: &str) -> StandardMaterialDesc {
    StandardMaterialDesc {
        name: name.to_string(),
        base_color_factor: Vec4::ONE,
        metallic_factor: 1.0,
        roughness_factor: 1.0,
        emissive_factor: Vec3::ZERO,
        occlusion_strength: 1.0,
        normal_scale: 1.0,
        base_color_texture: None,
        metallic_roughness_texture: None,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
    }
}

// ============================================================================
// Error material tests
// ============================================================================

#[test]
fn test_error_material_requires_nothing() {
    let material = ErrorMaterial::new("fallback".to_string(), 3);
    assert_eq!(material.name(), "fallback");
    assert_eq!(material.param_slot(), 3);
    assert_eq!(material.required_attributes(), VertexAttributeFlags::empty());
    assert!(material.base_color_texture().is_none());
}

// ============================================================================
// Debug material tests
// ============================================================================

#[test]
fn test_debug_material_requires_visualized_channel() {
    let cases = [
        (DebugVisualization::Normals, VertexAttributeFlags::NORMAL),
        (DebugVisualization::Texcoords, VertexAttributeFlags::TEXCOORD),
        (DebugVisualization::Tangents, VertexAttributeFlags::TANGENT),
        (DebugVisualization::VertexColor, VertexAttributeFlags::COLOR),
    ];
    for (mode, expected) in cases {
        let material = DebugMaterial::new("dbg".to_string(), mode, 0);
        assert_eq!(material.required_attributes(), expected);
        assert_eq!(material.mode(), mode);
    }
}

// ============================================================================
// Unlit material tests
// ============================================================================

#[test]
fn test_unlit_material_attributes_and_factor() {
    let material = UnlitMaterial::new(
        "flat".to_string(),
        Vec4::new(1.0, 0.0, 0.0, 1.0),
        Some(texture(2)),
        5,
    );

    assert_eq!(
        material.required_attributes(),
        VertexAttributeFlags::TEXCOORD | VertexAttributeFlags::COLOR
    );
    assert_eq!(material.base_color_factor(), Vec4::new(1.0, 0.0, 0.0, 1.0));
    assert_eq!(material.param_slot(), 5);
    assert_eq!(material.base_color_texture().unwrap().slot(), 2);
    // Unlit never shades with normals
    assert!(!material.required_attributes().contains(VertexAttributeFlags::NORMAL));
}

// ============================================================================
// Standard material tests
// ============================================================================

#[test]
fn test_standard_material_base_attributes() {
    let material = StandardMaterial::from_desc(standard_desc("pbr"), 1);

    let expected = VertexAttributeFlags::TEXCOORD
        | VertexAttributeFlags::NORMAL
        | VertexAttributeFlags::COLOR;
    assert_eq!(material.required_attributes(), expected);
    assert!(!material.required_attributes().contains(VertexAttributeFlags::TANGENT));
}

#[test]
fn test_standard_material_normal_map_requires_tangents() {
    let mut desc = standard_desc("bumpy");
    desc.normal_texture = Some(texture(0));
    let material = StandardMaterial::from_desc(desc, 1);

    assert!(material.required_attributes().contains(VertexAttributeFlags::TANGENT));
    assert!(material.normal_texture().is_some());
}

#[test]
fn test_standard_material_factors_and_slots() {
    let mut desc = standard_desc("gold");
    desc.base_color_factor = Vec4::new(1.0, 0.8, 0.3, 1.0);
    desc.metallic_factor = 0.9;
    desc.roughness_factor = 0.2;
    desc.emissive_factor = Vec3::new(0.1, 0.0, 0.0);
    desc.occlusion_strength = 0.5;
    desc.normal_scale = 2.0;
    desc.base_color_texture = Some(texture(7));
    desc.emissive_texture = Some(texture(8));
    let material = StandardMaterial::from_desc(desc, 12);

    assert_eq!(material.name(), "gold");
    assert_eq!(material.param_slot(), 12);
    assert_eq!(material.base_color_factor(), Vec4::new(1.0, 0.8, 0.3, 1.0));
    assert_eq!(material.metallic_factor(), 0.9);
    assert_eq!(material.roughness_factor(), 0.2);
    assert_eq!(material.emissive_factor(), Vec3::new(0.1, 0.0, 0.0));
    assert_eq!(material.occlusion_strength(), 0.5);
    assert_eq!(material.normal_scale(), 2.0);
    assert_eq!(material.base_color_texture().unwrap().slot(), 7);
    assert_eq!(material.emissive_texture().unwrap().slot(), 8);
    assert!(material.metallic_roughness_texture().is_none());
    assert!(material.occlusion_texture().is_none());
}

// ============================================================================
// Trait object tests
// ============================================================================

#[test]
fn test_downcasts_through_trait_object() {
    let materials: Vec<Arc<dyn Material>> = vec![
        Arc::new(ErrorMaterial::new("e".to_string(), 0)),
        Arc::new(DebugMaterial::new("d".to_string(), DebugVisualization::Normals, 1)),
        Arc::new(UnlitMaterial::new("u".to_string(), Vec4::ONE, None, 2)),
        Arc::new(StandardMaterial::from_desc(standard_desc("s"), 3)),
    ];

    assert!(materials[0].as_error().is_some());
    assert!(materials[0].as_standard().is_none());
    assert!(materials[1].as_debug().is_some());
    assert!(materials[2].as_unlit().is_some());
    assert!(materials[2].as_error().is_none());
    assert!(materials[3].as_standard().is_some());
    assert!(materials[3].as_unlit().is_none());
}

#[test]
fn test_texture_accessors_default_none_through_trait() {
    let material: Arc<dyn Material> = Arc::new(ErrorMaterial::new("e".to_string(), 0));
    assert!(material.base_color_texture().is_none());
    assert!(material.metallic_roughness_texture().is_none());
    assert!(material.normal_texture().is_none());
    assert!(material.occlusion_texture().is_none());
    assert!(material.emissive_texture().is_none());
}
