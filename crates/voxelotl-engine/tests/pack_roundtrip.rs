//! Packed records read back from their bytes must carry the values the
//! packer was given, at the precision of the variant's color encoding.

use glam::{Mat4, Vec2, Vec3};
use proptest::prelude::*;
use voxelotl_engine::layout::contracts::{directional_f16, phong_f32, phong_u8};
use voxelotl_engine::layout::{F16x4, Layout};
use voxelotl_engine::pack::{self, Color, MeshVertex, ModelInstance};

fn unit() -> impl Strategy<Value = f32> {
    0.0f32..=1.0
}

fn color() -> impl Strategy<Value = Color> {
    (unit(), unit(), unit(), unit()).prop_map(|(r, g, b, a)| Color::new(r, g, b, a))
}

fn vec3() -> impl Strategy<Value = Vec3> {
    (-1.0e4f32..1.0e4, -1.0e4f32..1.0e4, -1.0e4f32..1.0e4).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn mesh_vertex() -> impl Strategy<Value = MeshVertex> {
    (vec3(), vec3(), color(), unit(), unit()).prop_map(|(position, normal, color, u, v)| MeshVertex {
        position,
        normal,
        color,
        tex_coord: Vec2::new(u, v),
    })
}

proptest! {
    #[test]
    fn f32_vertex_is_exact(v in mesh_vertex()) {
        let packed = pack::phong_f32::vertex(&v);
        let back = phong_f32::ShaderVertex::read_from(packed.as_bytes()).unwrap();
        prop_assert_eq!(back.position.to_array(), v.position.to_array());
        prop_assert_eq!(back.normal.to_array(), v.normal.to_array());
        prop_assert_eq!(back.color.0, v.color.to_array());
        prop_assert_eq!(back.tex_coord.0, v.tex_coord.to_array());
    }

    #[test]
    fn u8_color_within_half_step(v in mesh_vertex()) {
        let packed = pack::phong_u8::vertex(&v);
        let back = phong_u8::ShaderVertex::read_from(packed.as_bytes()).unwrap();
        for (got, want) in back.color.to_unorm().iter().zip(v.color.to_array()) {
            prop_assert!((got - want).abs() <= 0.5 / 255.0 + 1e-6, "{got} vs {want}");
        }
        prop_assert_eq!(back.position.to_array(), v.position.to_array());
    }

    #[test]
    fn f16_instance_color_bits_unchanged(bits in any::<[u16; 4]>(), t in vec3()) {
        let world = Mat4::from_translation(t);
        let packed = pack::directional_f16::instance(world, F16x4::from_bits(bits));
        let back = directional_f16::VertexShaderInstance::read_from(packed.as_bytes()).unwrap();
        prop_assert_eq!(back.color.to_bits(), bits);
        let translation = back.model.cols()[3];
        prop_assert_eq!([translation[0], translation[1], translation[2]], t.to_array());
    }

    #[test]
    fn normal_matrix_of_rotation_is_the_rotation(angle in -3.0f32..3.0, c in color()) {
        let world = Mat4::from_rotation_y(angle);
        let packed = pack::phong_f32::instance(&ModelInstance::new(world).with_color(c));
        let normal = Mat4::from_cols_array_2d(packed.normal_model.cols());
        prop_assert!(normal.abs_diff_eq(world, 1e-5));
        prop_assert_eq!(packed.color.0, c.to_array());
    }
}
