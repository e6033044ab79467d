//! Layout descriptors: the host-side record of what a device struct looks like.

use std::fmt::{self, Write as _};

use bytemuck::Pod;

use crate::error::LayoutError;
use crate::primitive::PrimitiveKind;

/// What a layout is bound as.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LayoutKind {
    /// Per-vertex record in a vertex buffer.
    Vertex,
    /// Per-instance record in a vertex buffer stepped per instance.
    Instance,
    /// Uniform block bound as a whole.
    Uniform,
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Instance => "instance",
            Self::Uniform => "uniform",
        })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: PrimitiveKind,
    pub offset: usize,
}

impl Field {
    #[inline]
    pub const fn end(&self) -> usize {
        self.offset + self.kind.size()
    }
}

/// Static description of one layout structure.
///
/// Produced by the `layout!` declaration together with the struct itself, so
/// offsets come from the compiler and cannot drift from the Rust type.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LayoutDesc {
    pub name: &'static str,
    pub kind: LayoutKind,
    pub size: usize,
    pub align: usize,
    pub fields: &'static [Field],
}

impl LayoutDesc {
    /// Panics (at compile time when used in a `const`) unless the layout is
    /// free of hidden padding under device rules.
    pub const fn assert_dense(&self) {
        let mut end = 0;
        let mut align = 1;
        let mut i = 0;
        while i < self.fields.len() {
            let field = &self.fields[i];
            assert!(field.offset == end, "field does not start where the previous one ends");
            assert!(field.offset % field.kind.align() == 0, "field is misaligned");
            if field.kind.align() > align {
                align = field.kind.align();
            }
            end = field.end();
            i += 1;
        }
        assert!(self.size == end, "layout has trailing padding");
        assert!(self.align == align, "layout alignment differs from its widest field");
        assert!(self.size % self.align == 0, "layout size is not a multiple of its alignment");
    }

    /// Sum of the declared field sizes.
    pub const fn declared_size(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.fields.len() {
            total += self.fields[i].kind.size();
            i += 1;
        }
        total
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields a device program actually reads.
    pub fn data_fields(&self) -> impl Iterator<Item = &'static Field> {
        self.fields.iter().filter(|f| !f.kind.is_padding())
    }

    /// Canonical text form, e.g. `Vertex2D:vertex[32/16]{position:f32x2@0,...}`.
    ///
    /// Published variants freeze this string.
    pub fn signature(&self) -> String {
        let mut out = format!("{}:{}[{}/{}]{{", self.name, self.kind, self.size, self.align);
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{}:{}@{}", field.name, field.kind, field.offset);
        }
        out.push('}');
        out
    }
}

/// A host struct that is byte-identical to a device struct.
pub trait Layout: Pod + fmt::Debug {
    const DESC: LayoutDesc;

    #[inline]
    fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Reads one record back from exactly `DESC.size` bytes.
    fn read_from(bytes: &[u8]) -> Result<Self, LayoutError> {
        if bytes.len() != Self::DESC.size {
            return Err(LayoutError::SizeMismatch {
                layout: Self::DESC.name,
                expected: Self::DESC.size,
                actual: bytes.len(),
            });
        }
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    #[inline]
    fn slice_as_bytes(records: &[Self]) -> &[u8] {
        bytemuck::cast_slice(records)
    }

    /// Reads a packed array of records back.
    fn read_slice(bytes: &[u8]) -> Result<Vec<Self>, LayoutError> {
        let stride = Self::DESC.size;
        if bytes.len() % stride != 0 {
            return Err(LayoutError::StrideMismatch {
                layout: Self::DESC.name,
                stride,
                actual: bytes.len(),
            });
        }
        Ok(bytes.chunks_exact(stride).map(bytemuck::pod_read_unaligned).collect())
    }
}
