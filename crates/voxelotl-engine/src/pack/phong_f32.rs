//! Packers for the `phong-f32` contract.

use voxelotl_layout::contracts::phong_f32::{
    FragmentShaderUniforms, PhongF32, ShaderVertex, VertexShaderInstance, VertexShaderUniforms,
};
use voxelotl_layout::Pad;

use super::{
    color, light_direction, mat, normal_matrix, vec2, vec3, Camera, Environment, LightPacker, Material, Mesh,
    MeshPacker, MeshVertex, ModelInstance,
};

pub fn vertex(v: &MeshVertex) -> ShaderVertex {
    ShaderVertex {
        position: vec3(v.position),
        normal: vec3(v.normal),
        color: color(v.color),
        tex_coord: vec2(v.tex_coord),
        _pad: Pad::ZERO,
    }
}

pub fn vertices(mesh: &Mesh) -> Vec<ShaderVertex> {
    mesh.vertices.iter().map(vertex).collect()
}

pub fn instance(instance: &ModelInstance) -> VertexShaderInstance {
    VertexShaderInstance {
        model: mat(instance.world),
        normal_model: mat(normal_matrix(instance.world)),
        color: color(instance.color),
    }
}

pub fn vertex_uniforms(camera: &Camera) -> VertexShaderUniforms {
    VertexShaderUniforms { proj_view: mat(camera.view_projection) }
}

pub fn fragment_uniforms(camera: &Camera, environment: &Environment, material: &Material) -> FragmentShaderUniforms {
    FragmentShaderUniforms {
        camera_position: vec3(camera.position),
        directional_light: vec3(light_direction(environment.light_direction)),
        ambient_color: color(material.ambient),
        diffuse_color: color(material.diffuse),
        specular_color: color(material.specular),
        specular_intensity: material.gloss,
        _pad: Pad::ZERO,
    }
}

impl MeshPacker for PhongF32 {
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

impl LightPacker for PhongF32 {
    fn fragment_uniforms(camera: &Camera, environment: &Environment, material: &Material) -> FragmentShaderUniforms {
        fragment_uniforms(camera, environment, material)
    }
}
