//! Host buffer fill: domain values to contract records.
//!
//! Each variant gets its own module of pure functions. Nothing here is
//! generic over layouts; a packer produces exactly one variant's structs, and
//! color conversion for that variant's encoding happens only there.
//!
//! [`MeshPacker`] and [`LightPacker`] expose the same functions to renderers
//! generic over the variant marker types.

mod domain;

pub mod debug_solid;
pub mod directional_f16;
pub mod phong_f32;
pub mod phong_u8;
pub mod ui2d;

pub use domain::{
    Camera, Color, Environment, Flip, Frame, Material, Mesh, MeshVertex, ModelInstance, SpriteDraw, SpriteVertex,
};

use glam::{Mat4, Vec2, Vec3, Vec4};
use voxelotl_layout::{F32x2, F32x3, F32x4, F32x4x4, Instanced, LitFragment};

/// Mesh and instance packing for an instanced variant.
pub trait MeshPacker: Instanced {
    fn vertex(v: &MeshVertex) -> Self::Vertex;
    fn instance(instance: &ModelInstance) -> Self::Instance;
    fn vertex_uniforms(camera: &Camera) -> Self::VertexUniforms;

    fn vertices(mesh: &Mesh) -> Vec<Self::Vertex> {
        mesh.vertices.iter().map(Self::vertex).collect()
    }
}

/// Fragment uniform packing for a lit variant.
pub trait LightPacker: MeshPacker + LitFragment {
    fn fragment_uniforms(camera: &Camera, environment: &Environment, material: &Material) -> Self::FragmentUniforms;
}

#[inline]
pub fn mat(m: Mat4) -> F32x4x4 {
    F32x4x4::from_cols(m.to_cols_array_2d())
}

#[inline]
pub fn vec2(v: Vec2) -> F32x2 {
    F32x2(v.to_array())
}

#[inline]
pub fn vec3(v: Vec3) -> F32x3 {
    F32x3::from(v.to_array())
}

#[inline]
pub fn color(c: Color) -> F32x4 {
    F32x4(c.to_array())
}

/// Inverse-transpose of `world`, for transforming normals.
///
/// A singular or near-singular world matrix has no usable normal transform;
/// identity is returned so the record stays finite.
pub fn normal_matrix(world: Mat4) -> Mat4 {
    let det = world.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
        log::warn!("near-singular world matrix (det {det:e}); using identity normal matrix");
        return Mat4::IDENTITY;
    }
    let normal = world.inverse().transpose();
    if !normal.is_finite() {
        log::warn!("world matrix inverse overflowed; using identity normal matrix");
        return Mat4::IDENTITY;
    }
    normal
}

/// Determinants below this magnitude are treated as singular.
pub const SINGULAR_DETERMINANT: f32 = 1e-12;

/// Light direction as packed for the device: unit length, or zero.
#[inline]
pub fn light_direction(direction: Vec3) -> Vec3 {
    direction.normalize_or_zero()
}

/// Orthographic projection into a `[0, 1]` depth range.
///
/// The 2D pass uses `near = 1, far = -1`, mapping `z = 0` to depth `0.5`.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let inv_width = 1.0 / (right - left);
    let inv_height = 1.0 / (top - bottom);
    let inv_depth = 1.0 / (far - near);
    Mat4::from_cols(
        Vec4::new(2.0 * inv_width, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * inv_height, 0.0, 0.0),
        Vec4::new(0.0, 0.0, inv_depth, 0.0),
        Vec4::new(
            -(right + left) * inv_width,
            -(top + bottom) * inv_height,
            -near * inv_depth,
            1.0,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mat_is_column_major() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mat(m).cols()[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let world = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = normal_matrix(world);
        assert_eq!(n.x_axis.x, 0.5);
        assert_eq!(n.y_axis.y, 1.0);
    }

    #[test]
    fn normal_matrix_of_singular_world_is_identity() {
        let world = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        assert_eq!(normal_matrix(world), Mat4::IDENTITY);
    }

    #[test]
    fn normal_matrix_of_near_singular_world_is_identity() {
        // Determinant is ~1e-20: nonzero, but the inverse is meaningless.
        let world = Mat4::from_scale(Vec3::new(1e-20, 1.0, 1.0));
        assert!(world.determinant() != 0.0);
        assert_eq!(normal_matrix(world), Mat4::IDENTITY);

        let flat = Mat4::from_scale(Vec3::splat(1e-5));
        assert_eq!(normal_matrix(flat), Mat4::IDENTITY);
    }

    #[test]
    fn normal_matrix_of_small_but_regular_scale_inverts() {
        let world = Mat4::from_scale(Vec3::splat(0.01));
        let n = normal_matrix(world);
        assert!((n.x_axis.x - 100.0).abs() < 1e-3);
        assert!(n.is_finite());
    }

    #[test]
    fn zero_light_direction_stays_zero() {
        assert_eq!(light_direction(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(light_direction(Vec3::new(0.0, -4.0, 0.0)), Vec3::NEG_Y);
    }

    #[test]
    fn orthographic_maps_frame_corners() {
        let p = orthographic(0.0, 800.0, 600.0, 0.0, 1.0, -1.0);
        let top_left = p * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = p * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!(top_left.abs_diff_eq(Vec4::new(-1.0, 1.0, 0.5, 1.0), 1e-6));
        assert!(bottom_right.abs_diff_eq(Vec4::new(1.0, -1.0, 0.5, 1.0), 1e-6));
    }
}
