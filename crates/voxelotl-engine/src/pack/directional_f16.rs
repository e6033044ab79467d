//! Packers for the `directional-f16` contract.
//!
//! Half colors can be supplied as raw bit patterns ([`instance`],
//! [`vertex_with_color`]) and are then written unchanged. The `Color`-taking
//! paths round to the nearest half float.

use glam::Mat4;
use voxelotl_layout::contracts::directional_f16::{
    DirectionalF16, FragmentShaderUniforms, ShaderVertex, VertexShaderInstance, VertexShaderUniforms,
};
use voxelotl_layout::{F16x4, Pad};

use super::{
    light_direction, mat, vec2, vec3, Camera, Color, Environment, LightPacker, Material, Mesh, MeshPacker,
    MeshVertex, ModelInstance,
};

#[inline]
pub fn half(c: Color) -> F16x4 {
    F16x4::from_f32(c.to_array())
}

pub fn vertex_with_color(v: &MeshVertex, color: F16x4) -> ShaderVertex {
    ShaderVertex {
        position: vec3(v.position),
        normal: vec3(v.normal),
        color,
        tex_coord: vec2(v.tex_coord),
    }
}

pub fn vertex(v: &MeshVertex) -> ShaderVertex {
    vertex_with_color(v, half(v.color))
}

pub fn vertices(mesh: &Mesh) -> Vec<ShaderVertex> {
    mesh.vertices.iter().map(vertex).collect()
}

pub fn instance(world: Mat4, color: F16x4) -> VertexShaderInstance {
    VertexShaderInstance {
        model: mat(world),
        color,
        _pad: Pad::ZERO,
    }
}

pub fn vertex_uniforms(camera: &Camera) -> VertexShaderUniforms {
    VertexShaderUniforms { proj_view: mat(camera.view_projection) }
}

/// Only the light direction survives; the material is ignored by this contract.
pub fn fragment_uniforms(environment: &Environment) -> FragmentShaderUniforms {
    FragmentShaderUniforms {
        directional_light: vec3(light_direction(environment.light_direction)),
    }
}

impl MeshPacker for DirectionalF16 {
    fn vertex(v: &MeshVertex) -> ShaderVertex {
        vertex(v)
    }

    fn instance(i: &ModelInstance) -> VertexShaderInstance {
        instance(i.world, half(i.color))
    }

    fn vertex_uniforms(camera: &Camera) -> VertexShaderUniforms {
        vertex_uniforms(camera)
    }
}

impl LightPacker for DirectionalF16 {
    fn fragment_uniforms(_camera: &Camera, environment: &Environment, _material: &Material) -> FragmentShaderUniforms {
        fragment_uniforms(environment)
    }
}

#[cfg(test)]
mod tests {
    use glam::{Quat, Vec3};
    use voxelotl_layout::Layout;

    use super::*;

    #[test]
    fn instance_preserves_matrix_and_raw_half_bits() {
        let world = Mat4::from_scale_rotation_translation(
            Vec3::new(0.5, 1.5, 2.0),
            Quat::from_rotation_x(1.25),
            Vec3::new(-7.0, 3.5, 11.0),
        );
        // Includes a NaN payload and a negative zero.
        let bits = [0x3c00, 0x7e01, 0x8000, 0x0400];
        let packed = instance(world, F16x4::from_bits(bits));

        let back = VertexShaderInstance::read_from(packed.as_bytes()).unwrap();
        assert_eq!(back.color.to_bits(), bits);
        let expected = world.to_cols_array();
        let actual: [f32; 16] = bytemuck::cast(*back.model.cols());
        assert_eq!(actual.map(f32::to_bits), expected.map(f32::to_bits));
    }

    #[test]
    fn color_path_rounds_to_half() {
        let i = ModelInstance::new(Mat4::IDENTITY).with_color(Color::new(1.0, 0.5, 0.0, 1.0));
        let packed = <DirectionalF16 as MeshPacker>::instance(&i);
        assert_eq!(packed.color.to_bits(), [0x3c00, 0x3800, 0x0000, 0x3c00]);
    }

    #[test]
    fn fragment_block_is_light_only() {
        let u = fragment_uniforms(&Environment::default());
        assert_eq!(u.as_bytes().len(), 16);
        assert_eq!(u.directional_light.to_array(), [0.0, -1.0, 0.0]);
    }
}
