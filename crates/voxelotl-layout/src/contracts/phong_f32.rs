//! Full lit mesh with f32 colors.
//!
//! | Layout                   | Size | Bound as                  |
//! |--------------------------|------|---------------------------|
//! | `ShaderVertex`           | 64   | vertex slot 0 (vertex)    |
//! | `VertexShaderInstance`   | 144  | vertex slot 1 (instance)  |
//! | `VertexShaderUniforms`   | 64   | vertex slot 2 (uniform)   |
//! | `FragmentShaderUniforms` | 96   | fragment slot 0 (uniform) |

use crate::primitive::{F32x2, F32x3, F32x4, F32x4x4, Pad};
use crate::variant::{ColorEncoding, Contract, ContractDesc, ContractVariant, Instanced, LitFragment};

layout! {
    pub struct ShaderVertex: Vertex {
        pub position: F32x3,
        pub normal: F32x3,
        pub color: F32x4,
        pub tex_coord: F32x2,
        pub _pad: Pad<2>,
    }
}

layout! {
    pub struct VertexShaderInstance: Instance {
        pub model: F32x4x4,
        /// Inverse-transpose of `model`.
        pub normal_model: F32x4x4,
        pub color: F32x4,
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
        pub ambient_color: F32x4,
        pub diffuse_color: F32x4,
        pub specular_color: F32x4,
        pub specular_intensity: f32,
        pub _pad: Pad<3>,
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
    "ShaderVertex:vertex[64/16]{position:f32x3@0,normal:f32x3@16,color:f32x4@32,tex_coord:f32x2@48,_pad:pad2@56}",
    "VertexShaderInstance:instance[144/16]{model:f32x4x4@0,normal_model:f32x4x4@64,color:f32x4@128}",
    "VertexShaderUniforms:uniform[64/16]{proj_view:f32x4x4@0}",
    "FragmentShaderUniforms:uniform[96/16]{camera_position:f32x3@0,directional_light:f32x3@16,ambient_color:f32x4@32,diffuse_color:f32x4@48,specular_color:f32x4@64,specular_intensity:f32@80,_pad:pad3@84}",
];

pub const CONTRACT: ContractDesc = ContractDesc {
    variant: ContractVariant::PhongF32,
    color: ColorEncoding::F32,
    vertex_slots: VERTEX_SLOTS,
    fragment_slots: FRAGMENT_SLOTS,
    fragment_resources: &[],
    published: PUBLISHED,
};

#[derive(Debug, Copy, Clone, Default)]
pub struct PhongF32;

impl Contract for PhongF32 {
    const DESC: &'static ContractDesc = &CONTRACT;
    type Vertex = ShaderVertex;
    type VertexUniforms = VertexShaderUniforms;
    const VERTICES_SLOT: u32 = VertexSlot::Vertices.index();
    const VERTEX_UNIFORMS_SLOT: u32 = VertexSlot::Uniforms.index();
}

impl Instanced for PhongF32 {
    type Instance = VertexShaderInstance;
    const INSTANCE_SLOT: u32 = VertexSlot::Instance.index();
}

impl LitFragment for PhongF32 {
    type FragmentUniforms = FragmentShaderUniforms;
    const FRAGMENT_UNIFORMS_SLOT: u32 = FragmentSlot::Uniforms.index();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    #[test]
    fn sizes() {
        assert_eq!(ShaderVertex::DESC.size, 64);
        assert_eq!(VertexShaderInstance::DESC.size, 144);
        assert_eq!(VertexShaderUniforms::DESC.size, 64);
        assert_eq!(FragmentShaderUniforms::DESC.size, 96);
    }

    #[test]
    fn specular_intensity_follows_padded_color() {
        let field = FragmentShaderUniforms::DESC.field("specular_intensity");
        assert_eq!(field.map(|f| f.offset), Some(80));
    }

    #[test]
    fn slot_enums_match_tables() {
        for slot in VertexSlot::ALL {
            assert_eq!(slot.desc().index, slot.index());
            assert_eq!(slot.desc().name, slot.name());
        }
        assert_eq!(FragmentSlot::Uniforms.desc().layout.name, "FragmentShaderUniforms");
        assert_eq!(PhongF32::INSTANCE_SLOT, 1);
    }
}
