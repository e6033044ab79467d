//! Fixed-width numeric types shared by host packers and device programs.
//!
//! Every host type here has exactly the size and alignment the device gives
//! its WGSL counterpart inside a host-shareable buffer:
//!
//! | Kind      | Host type  | Size | Align | WGSL storage     |
//! |-----------|------------|------|-------|------------------|
//! | `f32`     | `f32`      | 4    | 4     | `f32`            |
//! | `f32x2`   | `F32x2`    | 8    | 8     | `vec2<f32>`      |
//! | `f32x3`   | `F32x3`    | 16   | 16    | `vec3<f32>, f32` |
//! | `f32x4`   | `F32x4`    | 16   | 16    | `vec4<f32>`      |
//! | `f16x4`   | `F16x4`    | 8    | 8     | `vec2<u32>`      |
//! | `u8x4`    | `U8x4`     | 4    | 4     | `u32`            |
//! | `f32x4x4` | `F32x4x4`  | 64   | 16    | `mat4x4<f32>`    |
//! | `padN`    | `Pad<N>`   | 4N   | 4     | N x `u32`        |
//!
//! Three-wide vectors always occupy 16 bytes. The device aligns `vec3<f32>`
//! to 16 but only sizes it to 12, so a scalar declared after it would land in
//! the fourth word on the device and after it on the host. Reserving the word
//! removes the ambiguity on both sides.
//!
//! Matrices are column-major (`cols[c][r]`), the order `mat4x4<f32>` and
//! per-column vertex attributes consume directly.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use half::f16;

/// Closed set of numeric kinds a layout field may have.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PrimitiveKind {
    F32,
    F32x2,
    F32x3,
    F32x4,
    /// Four half floats, carried as raw bit patterns.
    F16x4,
    /// Four unsigned bytes, normalized to `[0, 1]` by the device.
    U8x4,
    /// Column-major 4x4 matrix of `f32`.
    F32x4x4,
    /// Explicit padding, in 32-bit words. Never read by a device program.
    Pad(u32),
}

impl PrimitiveKind {
    /// Byte size under device layout rules.
    pub const fn size(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F32x2 => 8,
            Self::F32x3 => 16,
            Self::F32x4 => 16,
            Self::F16x4 => 8,
            Self::U8x4 => 4,
            Self::F32x4x4 => 64,
            Self::Pad(words) => 4 * words as usize,
        }
    }

    /// Byte alignment under device layout rules.
    pub const fn align(self) -> usize {
        match self {
            Self::F32 | Self::U8x4 | Self::Pad(_) => 4,
            Self::F32x2 | Self::F16x4 => 8,
            Self::F32x3 | Self::F32x4 | Self::F32x4x4 => 16,
        }
    }

    /// Number of scalar components.
    pub const fn components(self) -> u32 {
        match self {
            Self::F32 => 1,
            Self::F32x2 => 2,
            Self::F32x3 => 3,
            Self::F32x4 | Self::F16x4 | Self::U8x4 => 4,
            Self::F32x4x4 => 16,
            Self::Pad(_) => 0,
        }
    }

    #[inline]
    pub const fn is_padding(self) -> bool {
        matches!(self, Self::Pad(_))
    }

    /// Number of vertex attribute locations this kind consumes.
    pub const fn attribute_columns(self) -> u32 {
        match self {
            Self::F32x4x4 => 4,
            Self::Pad(_) => 0,
            _ => 1,
        }
    }

    /// Kind of a single vertex attribute column (matrices split into `f32x4`).
    pub const fn column_kind(self) -> PrimitiveKind {
        match self {
            Self::F32x4x4 => Self::F32x4,
            other => other,
        }
    }

    /// WGSL type of the field inside a host-shareable struct.
    ///
    /// `f32x3` is followed by a reserved `f32` word and `padN` expands to
    /// `N` `u32` words; both are emitted by the header generator.
    pub const fn wgsl_storage_type(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F32x2 => "vec2<f32>",
            Self::F32x3 => "vec3<f32>",
            Self::F32x4 => "vec4<f32>",
            Self::F16x4 => "vec2<u32>",
            Self::U8x4 => "u32",
            Self::F32x4x4 => "mat4x4<f32>",
            Self::Pad(_) => "u32",
        }
    }

    /// WGSL type a vertex stage sees for one attribute column of this kind.
    ///
    /// Half and byte encodings are widened by the vertex fetch, so the shader
    /// always receives `f32` components.
    pub const fn wgsl_attribute_type(self) -> Option<&'static str> {
        match self.column_kind() {
            Self::F32 => Some("f32"),
            Self::F32x2 => Some("vec2<f32>"),
            Self::F32x3 => Some("vec3<f32>"),
            Self::F32x4 | Self::F16x4 | Self::U8x4 => Some("vec4<f32>"),
            Self::F32x4x4 | Self::Pad(_) => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F32 => f.write_str("f32"),
            Self::F32x2 => f.write_str("f32x2"),
            Self::F32x3 => f.write_str("f32x3"),
            Self::F32x4 => f.write_str("f32x4"),
            Self::F16x4 => f.write_str("f16x4"),
            Self::U8x4 => f.write_str("u8x4"),
            Self::F32x4x4 => f.write_str("f32x4x4"),
            Self::Pad(words) => write!(f, "pad{words}"),
        }
    }
}

/// A host type usable as a layout field.
pub trait Primitive: Pod + fmt::Debug + PartialEq {
    const KIND: PrimitiveKind;
}

// ── vectors ───────────────────────────────────────────────────────────────

#[repr(C, align(8))]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct F32x2(pub [f32; 2]);

impl F32x2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self([x, y])
    }
}

impl From<[f32; 2]> for F32x2 {
    fn from(v: [f32; 2]) -> Self {
        Self(v)
    }
}

/// Three floats stored in 16 bytes; the fourth word is reserved and zero.
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct F32x3 {
    xyz: [f32; 3],
    reserved: f32,
}

impl F32x3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { xyz: [x, y, z], reserved: 0.0 }
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 3] {
        self.xyz
    }
}

impl From<[f32; 3]> for F32x3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct F32x4(pub [f32; 4]);

impl F32x4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self([x, y, z, w])
    }
}

impl From<[f32; 4]> for F32x4 {
    fn from(v: [f32; 4]) -> Self {
        Self(v)
    }
}

/// Four half floats.
///
/// The host never does half-precision math on these; bit patterns written
/// with [`F16x4::from_bits`] are read back unchanged by both sides.
#[repr(C, align(8))]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct F16x4(pub [f16; 4]);

impl F16x4 {
    #[inline]
    pub const fn from_bits(bits: [u16; 4]) -> Self {
        Self([
            f16::from_bits(bits[0]),
            f16::from_bits(bits[1]),
            f16::from_bits(bits[2]),
            f16::from_bits(bits[3]),
        ])
    }

    #[inline]
    pub const fn to_bits(self) -> [u16; 4] {
        [self.0[0].to_bits(), self.0[1].to_bits(), self.0[2].to_bits(), self.0[3].to_bits()]
    }

    /// Rounds four `f32` values to the nearest half float.
    ///
    /// This is the only place precision is lost; callers choose when to pay it.
    pub fn from_f32(v: [f32; 4]) -> Self {
        Self(v.map(f16::from_f32))
    }

    pub fn to_f32(self) -> [f32; 4] {
        self.0.map(f16::to_f32)
    }
}

/// Four unsigned bytes, read by the device as unorm (`byte / 255`).
#[repr(C, align(4))]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Pod, Zeroable)]
pub struct U8x4(pub [u8; 4]);

impl U8x4 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }

    /// Quantizes `[0, 1]` floats to bytes, rounding to nearest.
    ///
    /// Out-of-range values saturate; NaN becomes 0.
    pub fn from_unorm(v: [f32; 4]) -> Self {
        Self(v.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
    }

    pub fn to_unorm(self) -> [f32; 4] {
        self.0.map(|c| c as f32 / 255.0)
    }
}

/// Column-major 4x4 matrix: `self.0[c][r]` is column `c`, row `r`.
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct F32x4x4(pub [[f32; 4]; 4]);

impl F32x4x4 {
    pub const IDENTITY: Self = Self([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    #[inline]
    pub const fn from_cols(cols: [[f32; 4]; 4]) -> Self {
        Self(cols)
    }

    #[inline]
    pub const fn cols(&self) -> &[[f32; 4]; 4] {
        &self.0
    }
}

impl Default for F32x4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ── padding ───────────────────────────────────────────────────────────────

/// `N` reserved 32-bit words. Always written as zero.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Pad<const N: usize>([u32; N]);

impl<const N: usize> Pad<N> {
    pub const ZERO: Self = Self([0; N]);
}

impl<const N: usize> Default for Pad<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

// SAFETY: `Pad<N>` is `repr(transparent)` over `[u32; N]`, which is Pod and
// Zeroable for every `N`.
unsafe impl<const N: usize> Zeroable for Pad<N> {}
unsafe impl<const N: usize> Pod for Pad<N> {}

impl<const N: usize> Primitive for Pad<N> {
    const KIND: PrimitiveKind = PrimitiveKind::Pad(N as u32);
}

macro_rules! primitive {
    ($($ty:ty => $kind:ident),* $(,)?) => {$(
        impl Primitive for $ty {
            const KIND: PrimitiveKind = PrimitiveKind::$kind;
        }

        const _: () = {
            assert!(std::mem::size_of::<$ty>() == PrimitiveKind::$kind.size());
            assert!(std::mem::align_of::<$ty>() == PrimitiveKind::$kind.align());
        };
    )*};
}

primitive! {
    f32 => F32,
    F32x2 => F32x2,
    F32x3 => F32x3,
    F32x4 => F32x4,
    F16x4 => F16x4,
    U8x4 => U8x4,
    F32x4x4 => F32x4x4,
}
