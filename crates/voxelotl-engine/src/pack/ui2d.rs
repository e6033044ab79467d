//! Packers for the `ui-2d` contract.

use glam::Vec2;
use voxelotl_layout::contracts::ui2d::{Shader2DUniforms, Vertex2D};

use super::{color, mat, orthographic, vec2, Flip, Frame, SpriteDraw, SpriteVertex};

pub fn vertex(v: &SpriteVertex) -> Vertex2D {
    Vertex2D {
        position: vec2(v.position),
        tex_coord: vec2(v.tex_coord),
        color: color(v.color),
    }
}

pub fn vertices(sprites: &[SpriteVertex]) -> Vec<Vertex2D> {
    sprites.iter().map(vertex).collect()
}

/// Corners of a textured quad, wound top-left, bottom-left, bottom-right,
/// top-right before rotation.
///
/// The quad spans the source rectangle scaled by `draw.scale`, pivoted and
/// rotated about `draw.origin`. Returns `None` when there is nothing to draw.
pub fn sprite_quad(texture_size: Vec2, draw: &SpriteDraw) -> Option<[SpriteVertex; 4]> {
    let (offset, size) = draw.source.unwrap_or((Vec2::ZERO, texture_size));
    if size.x == 0.0 || size.y == 0.0 || texture_size.x <= 0.0 || texture_size.y <= 0.0 {
        return None;
    }

    let extent = size * draw.scale;
    let rotation = Vec2::from_angle(draw.angle);
    let right = rotation.rotate(Vec2::new(extent.x, 0.0));
    let down = rotation.rotate(Vec2::new(0.0, extent.y));
    let pivot = draw.origin / size;
    let top_left = draw.position - right * pivot.x - down * pivot.y;
    let positions = [top_left, top_left + down, top_left + right + down, top_left + right];

    let uv = tex_coords(offset / texture_size, (offset + size) / texture_size, draw.flip);
    Some(std::array::from_fn(|i| SpriteVertex {
        position: positions[i],
        tex_coord: uv[i],
        color: draw.color,
    }))
}

/// Texture coordinates per corner, in the same order as [`sprite_quad`].
pub fn tex_coords(min: Vec2, max: Vec2, flip: Flip) -> [Vec2; 4] {
    let unit = [Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(1.0, 1.0), Vec2::new(1.0, 0.0)];
    unit.map(|mut p| {
        if flip.diagonal {
            p = Vec2::new(p.y, p.x);
        }
        if flip.horizontal {
            p.x = 1.0 - p.x;
        }
        if flip.vertical {
            p.y = 1.0 - p.y;
        }
        min + (max - min) * p
    })
}

/// Orthographic projection of `frame` with the 2D depth range (`near 1, far -1`).
pub fn vertex_uniforms(frame: &Frame) -> Shader2DUniforms {
    Shader2DUniforms {
        projection: mat(orthographic(frame.left, frame.right, frame.bottom, frame.top, 1.0, -1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::Color;

    #[test]
    fn vertex_fields() {
        let v = vertex(&SpriteVertex {
            position: Vec2::new(10.0, 20.0),
            tex_coord: Vec2::new(1.0, 0.0),
            color: Color::WHITE,
        });
        assert_eq!(v.position.0, [10.0, 20.0]);
        assert_eq!(v.tex_coord.0, [1.0, 0.0]);
        assert_eq!(v.color.0, [1.0; 4]);
    }

    // ── sprite placement ──────────────────────────────────────────────────

    fn close(a: Vec2, b: Vec2) -> bool {
        a.abs_diff_eq(b, 1e-4)
    }

    #[test]
    fn unrotated_sprite_is_offset_by_scaled_origin() {
        let draw = SpriteDraw {
            scale: Vec2::splat(2.0),
            origin: Vec2::new(8.0, 4.0),
            ..SpriteDraw::at(Vec2::new(100.0, 50.0))
        };
        let quad = sprite_quad(Vec2::new(16.0, 8.0), &draw).unwrap();
        assert_eq!(quad[0].position, Vec2::new(84.0, 42.0));
        assert_eq!(quad[2].position, Vec2::new(116.0, 58.0));
        assert_eq!(quad[0].tex_coord, Vec2::ZERO);
        assert_eq!(quad[2].tex_coord, Vec2::ONE);
    }

    #[test]
    fn quarter_turn_rotates_about_origin() {
        let draw = SpriteDraw {
            angle: std::f32::consts::FRAC_PI_2,
            origin: Vec2::splat(8.0),
            ..SpriteDraw::at(Vec2::splat(100.0))
        };
        let quad = sprite_quad(Vec2::splat(16.0), &draw).unwrap();
        // The top edge now runs downwards on screen, on the right-hand side.
        assert!(close(quad[0].position, Vec2::new(108.0, 92.0)), "{:?}", quad[0].position);
        assert!(close(quad[3].position, Vec2::new(108.0, 108.0)), "{:?}", quad[3].position);
        assert!(close(quad[2].position, Vec2::new(92.0, 108.0)), "{:?}", quad[2].position);
        // The pivot stays put.
        let center = quad.iter().map(|v| v.position).sum::<Vec2>() / 4.0;
        assert!(close(center, Vec2::splat(100.0)));
    }

    #[test]
    fn source_rectangle_selects_texels() {
        let draw = SpriteDraw {
            source: Some((Vec2::new(16.0, 0.0), Vec2::new(16.0, 32.0))),
            ..SpriteDraw::default()
        };
        let quad = sprite_quad(Vec2::new(64.0, 32.0), &draw).unwrap();
        assert_eq!(quad[0].tex_coord, Vec2::new(0.25, 0.0));
        assert_eq!(quad[2].tex_coord, Vec2::new(0.5, 1.0));
        assert_eq!(quad[2].position, Vec2::new(16.0, 32.0));
    }

    #[test]
    fn empty_source_draws_nothing() {
        let draw = SpriteDraw {
            source: Some((Vec2::ZERO, Vec2::new(0.0, 8.0))),
            ..SpriteDraw::default()
        };
        assert!(sprite_quad(Vec2::splat(8.0), &draw).is_none());
    }

    #[test]
    fn flips_mirror_texture_coordinates() {
        let h = tex_coords(Vec2::ZERO, Vec2::ONE, Flip::HORIZONTAL);
        assert_eq!(h[0], Vec2::new(1.0, 0.0));
        assert_eq!(h[2], Vec2::new(0.0, 1.0));

        let v = tex_coords(Vec2::ZERO, Vec2::ONE, Flip::VERTICAL);
        assert_eq!(v[0], Vec2::new(0.0, 1.0));

        // Transposed: the bottom-left corner samples the top-right texel.
        let d = tex_coords(Vec2::ZERO, Vec2::ONE, Flip::DIAGONAL);
        assert_eq!(d[1], Vec2::new(1.0, 0.0));
        assert_eq!(d[3], Vec2::new(0.0, 1.0));
        assert_eq!(d[0], Vec2::ZERO);
    }

    #[test]
    fn projection_depth_column() {
        let u = vertex_uniforms(&Frame::from_size(640.0, 480.0));
        assert_eq!(u.projection.cols()[2], [0.0, 0.0, -0.5, 0.0]);
        assert_eq!(u.projection.cols()[3][2], 0.5);
    }
}
