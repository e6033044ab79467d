//! Values written through a layout struct come back with identical bits.

use proptest::prelude::*;
use voxelotl_layout::contracts::{directional_f16, phong_f32, phong_u8};
use voxelotl_layout::{F16x4, F32x2, F32x3, F32x4, F32x4x4, Layout, Pad, U8x4};

fn bits3(v: F32x3) -> [u32; 3] {
    v.to_array().map(f32::to_bits)
}

proptest! {
    #[test]
    fn f32_vertex_fields_keep_their_bits(
        pos in any::<[u32; 3]>(),
        color in any::<[u32; 4]>(),
        uv in any::<[u32; 2]>(),
    ) {
        let pos = F32x3::from(pos.map(f32::from_bits));
        let vertex = phong_f32::ShaderVertex {
            position: pos,
            normal: F32x3::new(0.0, 1.0, 0.0),
            color: F32x4(color.map(f32::from_bits)),
            tex_coord: F32x2(uv.map(f32::from_bits)),
            _pad: Pad::ZERO,
        };
        let back = phong_f32::ShaderVertex::read_from(vertex.as_bytes()).unwrap();
        prop_assert_eq!(bits3(back.position), bits3(pos));
        prop_assert_eq!(back.color.0.map(f32::to_bits), color);
        prop_assert_eq!(back.tex_coord.0.map(f32::to_bits), uv);
    }

    #[test]
    fn f16_instance_color_keeps_raw_patterns(color in any::<[u16; 4]>(), m in any::<[u32; 16]>()) {
        let cols: [[f32; 4]; 4] = bytemuck::cast(m.map(f32::from_bits));
        let instance = directional_f16::VertexShaderInstance {
            model: F32x4x4::from_cols(cols),
            color: F16x4::from_bits(color),
            _pad: Pad::ZERO,
        };
        let back = directional_f16::VertexShaderInstance::read_from(instance.as_bytes()).unwrap();
        prop_assert_eq!(back.color.to_bits(), color);
        let back_bits: [u32; 16] = bytemuck::cast(*back.model.cols());
        prop_assert_eq!(back_bits, m);
    }

    #[test]
    fn u8_colors_keep_every_byte(color in any::<[u8; 4]>()) {
        let uniforms = phong_u8::FragmentShaderUniforms {
            camera_position: F32x3::ZERO,
            directional_light: F32x3::new(0.0, -1.0, 0.0),
            ambient_color: U8x4(color),
            diffuse_color: U8x4(color),
            specular_color: U8x4(color),
            specular_intensity: 8.0,
        };
        let bytes = uniforms.as_bytes();
        prop_assert_eq!(&bytes[32..36], &color[..]);
        let back = phong_u8::FragmentShaderUniforms::read_from(bytes).unwrap();
        prop_assert_eq!(back.specular_color.0, color);
    }
}
