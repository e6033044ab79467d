//! Packers for the `phong-u8` contract. Colors are quantized here, nowhere else.

use voxelotl_layout::contracts::phong_u8::{
    FragmentShaderUniforms, PhongU8, ShaderVertex, VertexShaderInstance, VertexShaderUniforms,
};
use voxelotl_layout::{Pad, U8x4};

use super::{
    light_direction, mat, normal_matrix, vec2, vec3, Camera, Color, Environment, LightPacker, Material, Mesh,
    MeshPacker, MeshVertex, ModelInstance,
};

#[inline]
fn unorm(c: Color) -> U8x4 {
    U8x4::from_unorm(c.to_array())
}

pub fn vertex(v: &MeshVertex) -> ShaderVertex {
    ShaderVertex {
        position: vec3(v.position),
        normal: vec3(v.normal),
        color: unorm(v.color),
        _pad: Pad::ZERO,
        tex_coord: vec2(v.tex_coord),
    }
}

pub fn vertices(mesh: &Mesh) -> Vec<ShaderVertex> {
    mesh.vertices.iter().map(vertex).collect()
}

pub fn instance(instance: &ModelInstance) -> VertexShaderInstance {
    VertexShaderInstance {
        model: mat(instance.world),
        normal_model: mat(normal_matrix(instance.world)),
        color: unorm(instance.color),
        _pad: Pad::ZERO,
    }
}

pub fn vertex_uniforms(camera: &Camera) -> VertexShaderUniforms {
    VertexShaderUniforms { proj_view: mat(camera.view_projection) }
}

pub fn fragment_uniforms(camera: &Camera, environment: &Environment, material: &Material) -> FragmentShaderUniforms {
    FragmentShaderUniforms {
        camera_position: vec3(camera.position),
        directional_light: vec3(light_direction(environment.light_direction)),
        ambient_color: unorm(material.ambient),
        diffuse_color: unorm(material.diffuse),
        specular_color: unorm(material.specular),
        specular_intensity: material.gloss,
    }
}

impl MeshPacker for PhongU8 {
    fn vertex(v: &MeshVertex) -> ShaderVertex {
        vertex(v)
    }

    fn instance(i: &ModelInstance) -> VertexShaderInstance {
        instance(i)
    }

    fn vertex_uniforms(camera: &Camera) -> VertexShaderUniforms {
        vertex_uniforms(camera)
    }
}

impl LightPacker for PhongU8 {
    fn fragment_uniforms(camera: &Camera, environment: &Environment, material: &Material) -> FragmentShaderUniforms {
        fragment_uniforms(camera, environment, material)
    }
}
