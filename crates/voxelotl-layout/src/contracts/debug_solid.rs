//! Unlit solid-color overlay for debug geometry (bounds, gizmos).

use crate::primitive::{F32x3, F32x4, F32x4x4};
use crate::variant::{ColorEncoding, Contract, ContractDesc, ContractVariant, Instanced};

layout! {
    pub struct DebugVertex: Vertex {
        pub position: F32x3,
    }
}

layout! {
    pub struct DebugInstance: Instance {
        pub model: F32x4x4,
        pub color: F32x4,
    }
}

layout! {
    pub struct VertexShaderUniforms: Uniform {
        pub proj_view: F32x4x4,
    }
}

slots! {
    pub enum VertexSlot in Vertex {
        Vertices = 0 => VertexBuffer(DebugVertex),
        Instance = 1 => InstanceBuffer(DebugInstance),
        Uniforms = 2 => Uniform(VertexShaderUniforms),
    }
    table VERTEX_SLOTS;
}

pub const PUBLISHED: &[&str] = &[
    "DebugVertex:vertex[16/16]{position:f32x3@0}",
    "DebugInstance:instance[80/16]{model:f32x4x4@0,color:f32x4@64}",
    "VertexShaderUniforms:uniform[64/16]{proj_view:f32x4x4@0}",
];

pub const CONTRACT: ContractDesc = ContractDesc {
    variant: ContractVariant::DebugSolid,
    color: ColorEncoding::F32,
    vertex_slots: VERTEX_SLOTS,
    fragment_slots: &[],
    fragment_resources: &[],
    published: PUBLISHED,
};

#[derive(Debug, Copy, Clone, Default)]
pub struct DebugSolid;

impl Contract for DebugSolid {
    const DESC: &'static ContractDesc = &CONTRACT;
    type Vertex = DebugVertex;
    type VertexUniforms = VertexShaderUniforms;
    const VERTICES_SLOT: u32 = VertexSlot::Vertices.index();
    const VERTEX_UNIFORMS_SLOT: u32 = VertexSlot::Uniforms.index();
}

impl Instanced for DebugSolid {
    type Instance = DebugInstance;
    const INSTANCE_SLOT: u32 = VertexSlot::Instance.index();
}
