//! Full lit mesh with unorm8 colors.
//!
//! Byte colors shrink the vertex to 48 bytes: the color word is followed by a
//! reserved word so the texture coordinate keeps its 8-byte alignment.

use crate::primitive::{F32x2, F32x3, F32x4x4, Pad, U8x4};
use crate::variant::{ColorEncoding, Contract, ContractDesc, ContractVariant, Instanced, LitFragment};

layout! {
    pub struct ShaderVertex: Vertex {
        pub position: F32x3,
        pub normal: F32x3,
        pub color: U8x4,
        pub _pad: Pad<1>,
        pub tex_coord: F32x2,
    }
}

layout! {
    pub struct VertexShaderInstance: Instance {
        pub model: F32x4x4,
        pub normal_model: F32x4x4,
        pub color: U8x4,
        pub _pad: Pad<3>,
    }
}

layout! {
    pub struct VertexShaderUniforms: Uniform {
        pub proj_view: F32x4x4,
    }
}

layout! {
    pub struct FragmentShaderUniforms: Uniform {
        pub camera_position: F32x3,
        pub directional_light: F32x3,
        pub ambient_color: U8x4,
        pub diffuse_color: U8x4,
        pub specular_color: U8x4,
        pub specular_intensity: f32,
    }
}

slots! {
    pub enum VertexSlot in Vertex {
        Vertices = 0 => VertexBuffer(ShaderVertex),
        Instance = 1 => InstanceBuffer(VertexShaderInstance),
        Uniforms = 2 => Uniform(VertexShaderUniforms),
    }
    table VERTEX_SLOTS;
}

slots! {
    pub enum FragmentSlot in Fragment {
        Uniforms = 0 => Uniform(FragmentShaderUniforms),
    }
    table FRAGMENT_SLOTS;
}

pub const PUBLISHED: &[&str] = &[
    "ShaderVertex:vertex[48/16]{position:f32x3@0,normal:f32x3@16,color:u8x4@32,_pad:pad1@36,tex_coord:f32x2@40}",
    "VertexShaderInstance:instance[144/16]{model:f32x4x4@0,normal_model:f32x4x4@64,color:u8x4@128,_pad:pad3@132}",
    "VertexShaderUniforms:uniform[64/16]{proj_view:f32x4x4@0}",
    "FragmentShaderUniforms:uniform[48/16]{camera_position:f32x3@0,directional_light:f32x3@16,ambient_color:u8x4@32,diffuse_color:u8x4@36,specular_color:u8x4@40,specular_intensity:f32@44}",
];

pub const CONTRACT: ContractDesc = ContractDesc {
    variant: ContractVariant::PhongU8,
    color: ColorEncoding::Unorm8,
    vertex_slots: VERTEX_SLOTS,
    fragment_slots: FRAGMENT_SLOTS,
    fragment_resources: &[],
    published: PUBLISHED,
};

#[derive(Debug, Copy, Clone, Default)]
pub struct PhongU8;

impl Contract for PhongU8 {
    const DESC: &'static ContractDesc = &CONTRACT;
    type Vertex = ShaderVertex;
    type VertexUniforms = VertexShaderUniforms;
    const VERTICES_SLOT: u32 = VertexSlot::Vertices.index();
    const VERTEX_UNIFORMS_SLOT: u32 = VertexSlot::Uniforms.index();
}

impl Instanced for PhongU8 {
    type Instance = VertexShaderInstance;
    const INSTANCE_SLOT: u32 = VertexSlot::Instance.index();
}

impl LitFragment for PhongU8 {
    type FragmentUniforms = FragmentShaderUniforms;
    const FRAGMENT_UNIFORMS_SLOT: u32 = FragmentSlot::Uniforms.index();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    #[test]
    fn vertex_size_is_sum_of_declared_fields() {
        assert_eq!(ShaderVertex::DESC.size, 48);
        assert_eq!(ShaderVertex::DESC.declared_size(), 48);
        assert_eq!(std::mem::size_of::<ShaderVertex>(), 48);
    }

    #[test]
    fn fragment_uniforms_pack_colors_tightly() {
        assert_eq!(FragmentShaderUniforms::DESC.size, 48);
        assert_eq!(FragmentShaderUniforms::DESC.field("specular_intensity").map(|f| f.offset), Some(44));
    }
}
