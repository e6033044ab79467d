//! 2D overlay quads. No instance buffer and no fragment uniforms; the
//! fragment stage samples one texture, modulated by the vertex color.

use crate::primitive::{F32x2, F32x4, F32x4x4};
use crate::variant::{ColorEncoding, Contract, ContractDesc, ContractVariant, Textured};

layout! {
    pub struct Vertex2D: Vertex {
        pub position: F32x2,
        pub tex_coord: F32x2,
        pub color: F32x4,
    }
}

layout! {
    pub struct Shader2DUniforms: Uniform {
        pub projection: F32x4x4,
    }
}

slots! {
    pub enum VertexSlot in Vertex {
        Vertices = 0 => VertexBuffer(Vertex2D),
        Uniforms = 1 => Uniform(Shader2DUniforms),
    }
    table VERTEX_SLOTS;
}

resources! {
    pub enum FragmentResource in Fragment {
        Texture = 0 => Texture2D,
        Sampler = 1 => Sampler,
    }
    table FRAGMENT_RESOURCES;
}

pub const PUBLISHED: &[&str] = &[
    "Vertex2D:vertex[32/16]{position:f32x2@0,tex_coord:f32x2@8,color:f32x4@16}",
    "Shader2DUniforms:uniform[64/16]{projection:f32x4x4@0}",
];

pub const CONTRACT: ContractDesc = ContractDesc {
    variant: ContractVariant::Ui2d,
    color: ColorEncoding::F32,
    vertex_slots: VERTEX_SLOTS,
    fragment_slots: &[],
    fragment_resources: FRAGMENT_RESOURCES,
    published: PUBLISHED,
};

#[derive(Debug, Copy, Clone, Default)]
pub struct Ui2d;

impl Contract for Ui2d {
    const DESC: &'static ContractDesc = &CONTRACT;
    type Vertex = Vertex2D;
    type VertexUniforms = Shader2DUniforms;
    const VERTICES_SLOT: u32 = VertexSlot::Vertices.index();
    const VERTEX_UNIFORMS_SLOT: u32 = VertexSlot::Uniforms.index();
}

impl Textured for Ui2d {
    const TEXTURE_SLOT: u32 = FragmentResource::Texture.index();
    const SAMPLER_SLOT: u32 = FragmentResource::Sampler.index();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::{ResourceKind, Stage};

    #[test]
    fn fragment_group_holds_texture_then_sampler() {
        assert_eq!(Ui2d::TEXTURE_SLOT, 0);
        assert_eq!(Ui2d::SAMPLER_SLOT, 1);
        assert_eq!(FragmentResource::Texture.desc().kind, ResourceKind::Texture2D);
        assert_eq!(FragmentResource::Sampler.desc().kind, ResourceKind::Sampler);
        assert_eq!(FragmentResource::STAGE, Stage::Fragment);
    }
}
