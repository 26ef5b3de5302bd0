//! Per-vertex attribute channels of repacked geometry.
//!
//! The position channel is always present in its own binding; the optional
//! channels below share one packed binding and appear in the fixed declared
//! order texcoord, normal, tangent, color. A channel is allocated only when
//! some consuming material requires it.

use bitflags::bitflags;

use crate::graphics_device::BufferFormat;

bitflags! {
    /// Optional per-vertex channels of the packed attribute binding
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VertexAttributeFlags: u32 {
        /// UV coordinates (vec2)
        const TEXCOORD = 1 << 0;
        /// Surface normal (vec3)
        const NORMAL = 1 << 1;
        /// Tangent with handedness sign (vec4)
        const TANGENT = 1 << 2;
        /// Vertex color (vec4)
        const COLOR = 1 << 3;
    }
}

impl VertexAttributeFlags {
    /// Declared packing order of the optional channels
    pub const CHANNEL_ORDER: [VertexAttributeFlags; 4] = [
        VertexAttributeFlags::TEXCOORD,
        VertexAttributeFlags::NORMAL,
        VertexAttributeFlags::TANGENT,
        VertexAttributeFlags::COLOR,
    ];

    /// GPU format a single channel packs to.
    ///
    /// All channels pack to 32-bit float components; narrower or normalized
    /// source data is widened during repacking.
    pub fn channel_format(channel: VertexAttributeFlags) -> BufferFormat {
        match channel {
            VertexAttributeFlags::TEXCOORD => BufferFormat::R32G32_SFLOAT,
            VertexAttributeFlags::NORMAL => BufferFormat::R32G32B32_SFLOAT,
            VertexAttributeFlags::TANGENT => BufferFormat::R32G32B32A32_SFLOAT,
            VertexAttributeFlags::COLOR => BufferFormat::R32G32B32A32_SFLOAT,
            _ => unreachable!("channel_format takes a single channel flag"),
        }
    }

    /// Shader attribute location of a single channel.
    ///
    /// Location 0 is reserved for the position binding.
    pub fn channel_location(channel: VertexAttributeFlags) -> u32 {
        match channel {
            VertexAttributeFlags::TEXCOORD => 1,
            VertexAttributeFlags::NORMAL => 2,
            VertexAttributeFlags::TANGENT => 3,
            VertexAttributeFlags::COLOR => 4,
            _ => unreachable!("channel_location takes a single channel flag"),
        }
    }

    /// Byte stride of one packed vertex covering the channels in `self`
    pub fn packed_stride(self) -> u32 {
        Self::CHANNEL_ORDER
            .iter()
            .filter(|&&channel| self.contains(channel))
            .map(|&channel| Self::channel_format(channel).size_bytes())
            .sum()
    }

    /// Iterate the channels present in `self`, in declared order
    pub fn channels(self) -> impl Iterator<Item = VertexAttributeFlags> {
        Self::CHANNEL_ORDER
            .into_iter()
            .filter(move |&channel| self.contains(channel))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
