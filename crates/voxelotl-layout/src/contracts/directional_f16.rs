//! Simplified lit mesh: half-float colors, no normal matrix, one light direction.

use crate::primitive::{F16x4, F32x2, F32x3, F32x4x4, Pad};
use crate::variant::{ColorEncoding, Contract, ContractDesc, ContractVariant, Instanced, LitFragment};

layout! {
    pub struct ShaderVertex: Vertex {
        pub position: F32x3,
        pub normal: F32x3,
        pub color: F16x4,
        pub tex_coord: F32x2,
    }
}

layout! {
    pub struct VertexShaderInstance: Instance {
        pub model: F32x4x4,
        pub color: F16x4,
        pub _pad: Pad<2>,
    }
}

layout! {
    pub struct VertexShaderUniforms: Uniform {
        pub proj_view: F32x4x4,
    }
}

layout! {
    pub struct FragmentShaderUniforms: Uniform {
        pub directional_light: F32x3,
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
    "ShaderVertex:vertex[48/16]{position:f32x3@0,normal:f32x3@16,color:f16x4@32,tex_coord:f32x2@40}",
    "VertexShaderInstance:instance[80/16]{model:f32x4x4@0,color:f16x4@64,_pad:pad2@72}",
    "VertexShaderUniforms:uniform[64/16]{proj_view:f32x4x4@0}",
    "FragmentShaderUniforms:uniform[16/16]{directional_light:f32x3@0}",
];

pub const CONTRACT: ContractDesc = ContractDesc {
    variant: ContractVariant::DirectionalF16,
    color: ColorEncoding::F16,
    vertex_slots: VERTEX_SLOTS,
    fragment_slots: FRAGMENT_SLOTS,
    fragment_resources: &[],
    published: PUBLISHED,
};

#[derive(Debug, Copy, Clone, Default)]
pub struct DirectionalF16;

impl Contract for DirectionalF16 {
    const DESC: &'static ContractDesc = &CONTRACT;
    type Vertex = ShaderVertex;
    type VertexUniforms = VertexShaderUniforms;
    const VERTICES_SLOT: u32 = VertexSlot::Vertices.index();
    const VERTEX_UNIFORMS_SLOT: u32 = VertexSlot::Uniforms.index();
}

impl Instanced for DirectionalF16 {
    type Instance = VertexShaderInstance;
    const INSTANCE_SLOT: u32 = VertexSlot::Instance.index();
}

impl LitFragment for DirectionalF16 {
    type FragmentUniforms = FragmentShaderUniforms;
    const FRAGMENT_UNIFORMS_SLOT: u32 = FragmentSlot::Uniforms.index();
}
