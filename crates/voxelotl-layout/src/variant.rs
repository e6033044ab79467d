//! The closed set of contract variants.
//!
//! A variant is the complete agreement between host packers and one device
//! program: every layout, every slot, one color encoding. Variants never
//! share buffers; changing a published layout means adding a variant.

use std::fmt;
use std::str::FromStr;

use crate::contracts;
use crate::error::LayoutError;
use crate::layout::{Layout, LayoutDesc, LayoutKind};
use crate::primitive::PrimitiveKind;
use crate::slot::{ResourceDesc, SlotBinding, SlotDesc, Stage};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ContractVariant {
    /// Full 3D lit mesh, f32 colors and Phong material terms.
    PhongF32,
    /// Full 3D lit mesh, byte colors.
    PhongU8,
    /// Simplified 3D mesh, half colors and a single light direction.
    DirectionalF16,
    /// 2D overlay quads.
    Ui2d,
    /// Unlit solid-color debug geometry.
    DebugSolid,
}

impl ContractVariant {
    pub const ALL: [ContractVariant; 5] = [
        Self::PhongF32,
        Self::PhongU8,
        Self::DirectionalF16,
        Self::Ui2d,
        Self::DebugSolid,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Self::PhongF32 => "phong-f32",
            Self::PhongU8 => "phong-u8",
            Self::DirectionalF16 => "directional-f16",
            Self::Ui2d => "ui-2d",
            Self::DebugSolid => "debug-solid",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::PhongF32 => "lit mesh, Phong material, f32 color",
            Self::PhongU8 => "lit mesh, Phong material, unorm8 color",
            Self::DirectionalF16 => "lit mesh, directional light only, f16 color",
            Self::Ui2d => "2D overlay, orthographic projection",
            Self::DebugSolid => "unlit solid-color overlay",
        }
    }

    pub const fn desc(self) -> &'static ContractDesc {
        match self {
            Self::PhongF32 => &contracts::phong_f32::CONTRACT,
            Self::PhongU8 => &contracts::phong_u8::CONTRACT,
            Self::DirectionalF16 => &contracts::directional_f16::CONTRACT,
            Self::Ui2d => &contracts::ui2d::CONTRACT,
            Self::DebugSolid => &contracts::debug_solid::CONTRACT,
        }
    }
}

impl fmt::Display for ContractVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ContractVariant {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.id() == s)
            .ok_or_else(|| LayoutError::UnknownVariant(s.to_owned()))
    }
}

/// The one color encoding a variant commits to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ColorEncoding {
    F32,
    F16,
    Unorm8,
}

impl ColorEncoding {
    pub const fn kind(self) -> PrimitiveKind {
        match self {
            Self::F32 => PrimitiveKind::F32x4,
            Self::F16 => PrimitiveKind::F16x4,
            Self::Unorm8 => PrimitiveKind::U8x4,
        }
    }
}

/// Static description of one variant.
#[derive(Debug)]
pub struct ContractDesc {
    pub variant: ContractVariant,
    pub color: ColorEncoding,
    pub vertex_slots: &'static [SlotDesc],
    pub fragment_slots: &'static [SlotDesc],
    /// Textures and samplers of the fragment stage, numbered after its buffer slots.
    pub fragment_resources: &'static [ResourceDesc],
    /// Frozen layout signatures, in slot order (vertex stage then fragment).
    pub published: &'static [&'static str],
}

impl ContractDesc {
    pub const fn slots(&self, stage: Stage) -> &'static [SlotDesc] {
        match stage {
            Stage::Vertex => self.vertex_slots,
            Stage::Fragment => self.fragment_slots,
        }
    }

    pub const fn resources(&self, stage: Stage) -> &'static [ResourceDesc] {
        match stage {
            Stage::Vertex => &[],
            Stage::Fragment => self.fragment_resources,
        }
    }

    pub fn resource(&self, stage: Stage, index: u32) -> Option<&'static ResourceDesc> {
        self.resources(stage).iter().find(|r| r.index == index)
    }

    /// Whether `stage` has a bind group at all.
    pub fn binds(&self, stage: Stage) -> bool {
        stage == Stage::Vertex || !self.slots(stage).is_empty() || !self.resources(stage).is_empty()
    }

    pub fn all_slots(&self) -> impl Iterator<Item = &'static SlotDesc> {
        self.vertex_slots.iter().chain(self.fragment_slots)
    }

    pub fn uniform_slots(&self) -> impl Iterator<Item = &'static SlotDesc> {
        self.all_slots().filter(|s| s.binding == SlotBinding::Uniform)
    }

    pub fn vertex_buffer_slots(&self) -> impl Iterator<Item = &'static SlotDesc> {
        self.vertex_slots.iter().filter(|s| s.binding.is_vertex_buffer())
    }

    pub fn slot(&self, stage: Stage, index: u32) -> Option<&'static SlotDesc> {
        self.slots(stage).get(index as usize)
    }

    /// Every layout, once each, in slot order.
    pub fn layouts(&self) -> Vec<&'static LayoutDesc> {
        let mut out: Vec<&'static LayoutDesc> = Vec::new();
        for slot in self.all_slots() {
            if !out.iter().any(|l| std::ptr::eq(*l, slot.layout) || *l == slot.layout) {
                out.push(slot.layout);
            }
        }
        out
    }

    pub fn signatures(&self) -> Vec<String> {
        self.layouts().iter().map(|l| l.signature()).collect()
    }

    /// Checks the structural rules every variant must satisfy.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let variant = self.variant;

        for stage in Stage::ALL {
            let slots = self.slots(stage);
            let dense = slots
                .iter()
                .enumerate()
                .all(|(i, s)| s.index as usize == i && s.stage == stage);
            if !dense {
                return Err(LayoutError::SlotsNotDense { variant, stage });
            }

            let resources = self.resources(stage);
            let continues = resources
                .iter()
                .enumerate()
                .all(|(i, r)| r.index as usize == slots.len() + i && r.stage == stage);
            if !continues {
                return Err(LayoutError::SlotsNotDense { variant, stage });
            }
            let has_uniforms = slots.iter().any(|s| s.binding == SlotBinding::Uniform);
            if has_uniforms && !resources.is_empty() {
                return Err(LayoutError::MixedStageGroup { variant, stage });
            }
        }

        let mut seen_uniform = false;
        for slot in self.vertex_slots {
            match slot.binding {
                SlotBinding::Uniform => seen_uniform = true,
                _ if seen_uniform => {
                    return Err(LayoutError::VertexBufferAfterUniform { variant, slot: slot.name });
                }
                _ => {}
            }
        }

        for slot in self.all_slots() {
            let expected = match slot.binding {
                SlotBinding::VertexBuffer => LayoutKind::Vertex,
                SlotBinding::InstanceBuffer => LayoutKind::Instance,
                SlotBinding::Uniform => LayoutKind::Uniform,
            };
            let fragment_buffer = slot.stage == Stage::Fragment && slot.binding.is_vertex_buffer();
            if slot.layout.kind != expected || fragment_buffer {
                return Err(LayoutError::SlotKindMismatch {
                    variant,
                    slot: slot.name,
                    layout: slot.layout.name,
                });
            }
        }

        for layout in self.layouts() {
            for field in layout.fields.iter().filter(|f| f.name.ends_with("color")) {
                if field.kind != self.color.kind() {
                    return Err(LayoutError::MixedColorEncoding {
                        variant,
                        field: field.name,
                        layout: layout.name,
                    });
                }
            }
        }

        let layouts = self.layouts();
        for (i, layout) in layouts.iter().enumerate() {
            if self.published.get(i).copied() != Some(layout.signature().as_str()) {
                return Err(LayoutError::PublishedDrift { variant, layout: layout.name });
            }
        }
        if self.published.len() != layouts.len() {
            return Err(LayoutError::PublishedDrift { variant, layout: "<published table>" });
        }

        Ok(())
    }
}

/// Host-side handle on one variant.
///
/// Packers and renderers are generic over this trait, so a value produced for
/// one variant cannot be handed to another variant's program.
pub trait Contract: 'static {
    const DESC: &'static ContractDesc;
    type Vertex: Layout;
    type VertexUniforms: Layout;
    const VERTICES_SLOT: u32;
    const VERTEX_UNIFORMS_SLOT: u32;
}

/// Variant with a per-instance buffer.
pub trait Instanced: Contract {
    type Instance: Layout;
    const INSTANCE_SLOT: u32;
}

/// Variant whose fragment stage samples one texture.
pub trait Textured: Contract {
    const TEXTURE_SLOT: u32;
    const SAMPLER_SLOT: u32;
}

/// Variant whose fragment stage reads a lighting uniform block.
pub trait LitFragment: Contract {
    type FragmentUniforms: Layout;
    const FRAGMENT_UNIFORMS_SLOT: u32;
}
