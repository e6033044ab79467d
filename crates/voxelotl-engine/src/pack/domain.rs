use glam::{Mat4, Vec2, Vec3};

use crate::render::CullFace;

/// Linear straight-alpha RGBA color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Decodes sRGB bytes to linear. Alpha is already linear.
    pub fn from_srgb8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(srgb_to_linear(r), srgb_to_linear(g), srgb_to_linear(b), a as f32 / 255.0)
    }

    /// Bytes taken as linear values (`byte / 255`), no transfer curve.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn srgb_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
    pub tex_coord: Vec2,
}

/// Indexed triangle list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u16>) -> Self {
        Self { vertices, indices }
    }

    /// A mesh with nothing to draw; renderers skip it.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteVertex {
    pub position: Vec2,
    pub tex_coord: Vec2,
    pub color: Color,
}

/// Texture mirroring for a sprite. The diagonal flip transposes the texture
/// and is applied before the other two.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Flip {
    pub horizontal: bool,
    pub vertical: bool,
    pub diagonal: bool,
}

impl Flip {
    pub const NONE: Self = Self { horizontal: false, vertical: false, diagonal: false };
    pub const HORIZONTAL: Self = Self { horizontal: true, ..Self::NONE };
    pub const VERTICAL: Self = Self { vertical: true, ..Self::NONE };
    pub const DIAGONAL: Self = Self { diagonal: true, ..Self::NONE };
}

/// Placement of one textured quad in frame units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SpriteDraw {
    /// Where `origin` lands.
    pub position: Vec2,
    /// Texel rectangle as `(offset, size)`; the whole texture when `None`.
    pub source: Option<(Vec2, Vec2)>,
    pub scale: Vec2,
    /// Radians about `origin`, clockwise on a y-down frame.
    pub angle: f32,
    /// Pivot in unscaled source texels, from the source's top-left corner.
    pub origin: Vec2,
    pub flip: Flip,
    pub color: Color,
}

impl SpriteDraw {
    pub fn at(position: Vec2) -> Self {
        Self { position, ..Self::default() }
    }
}

impl Default for SpriteDraw {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            source: None,
            scale: Vec2::ONE,
            angle: 0.0,
            origin: Vec2::ZERO,
            flip: Flip::NONE,
            color: Color::WHITE,
        }
    }
}

/// Phong material terms.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Specular exponent.
    pub gloss: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Color::new(0.1, 0.1, 0.1, 1.0),
            diffuse: Color::WHITE,
            specular: Color::new(0.5, 0.5, 0.5, 1.0),
            gloss: 20.0,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Environment {
    pub cull_face: CullFace,
    /// Direction the light travels; normalized by the packers.
    pub light_direction: Vec3,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            cull_face: CullFace::Back,
            light_direction: Vec3::new(0.0, -1.0, 0.0),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub view_projection: Mat4,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ModelInstance {
    pub world: Mat4,
    pub color: Color,
}

impl ModelInstance {
    pub fn new(world: Mat4) -> Self {
        Self { world, color: Color::WHITE }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// 2D viewport edges in the caller's units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Frame {
    /// Top-left origin, +Y down, in pixels.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self { left: 0.0, right: width, bottom: height, top: 0.0 }
    }
}
