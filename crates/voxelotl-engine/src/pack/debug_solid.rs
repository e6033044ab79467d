//! Packers for the `debug-solid` contract. Normals, texture coordinates and
//! per-vertex colors are dropped.

use glam::Vec3;
use voxelotl_layout::contracts::debug_solid::{DebugInstance, DebugSolid, DebugVertex, VertexShaderUniforms};

use super::{color, mat, vec3, Camera, Mesh, MeshPacker, MeshVertex, ModelInstance};

pub fn vertex(position: Vec3) -> DebugVertex {
    DebugVertex { position: vec3(position) }
}

pub fn vertices(mesh: &Mesh) -> Vec<DebugVertex> {
    mesh.vertices.iter().map(|v| vertex(v.position)).collect()
}

pub fn instance(instance: &ModelInstance) -> DebugInstance {
    DebugInstance {
        model: mat(instance.world),
        color: color(instance.color),
    }
}

pub fn vertex_uniforms(camera: &Camera) -> VertexShaderUniforms {
    VertexShaderUniforms { proj_view: mat(camera.view_projection) }
}

impl MeshPacker for DebugSolid {
    fn vertex(v: &MeshVertex) -> DebugVertex {
        vertex(v.position)
    }

    fn instance(i: &ModelInstance) -> DebugInstance {
        instance(i)
    }

    fn vertex_uniforms(camera: &Camera) -> VertexShaderUniforms {
        vertex_uniforms(camera)
    }
}
