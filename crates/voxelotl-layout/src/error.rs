use std::fmt;

use crate::slot::Stage;
use crate::variant::ContractVariant;

/// A buffer or contract that does not match its declared layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Uniform block (or single record) whose byte length differs from the layout size.
    SizeMismatch { layout: &'static str, expected: usize, actual: usize },
    /// Vertex or instance buffer that is empty or not a whole number of records.
    StrideMismatch { layout: &'static str, stride: usize, actual: usize },
    /// Slot index not declared by the variant for that stage.
    UnknownSlot { variant: ContractVariant, stage: Stage, index: u32 },
    /// Buffer produced under a different variant than the one it is bound to.
    VariantMismatch { expected: ContractVariant, actual: ContractVariant },
    /// Variant id that names no known variant.
    UnknownVariant(String),
    /// Slot indices of a stage do not run 0, 1, 2, ... in declaration order.
    SlotsNotDense { variant: ContractVariant, stage: Stage },
    /// Slot binding kind disagrees with the kind of its layout.
    SlotKindMismatch { variant: ContractVariant, slot: &'static str, layout: &'static str },
    /// Color field whose encoding differs from the variant's encoding.
    MixedColorEncoding { variant: ContractVariant, field: &'static str, layout: &'static str },
    /// Stage declaring both uniform slots and texture/sampler resources.
    MixedStageGroup { variant: ContractVariant, stage: Stage },
    /// Vertex-stage buffer slot declared after the uniform slot.
    VertexBufferAfterUniform { variant: ContractVariant, slot: &'static str },
    /// Computed layout signature differs from the frozen published one.
    PublishedDrift { variant: ContractVariant, layout: &'static str },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { layout, expected, actual } => {
                write!(f, "{layout}: expected {expected} bytes, got {actual}")
            }
            Self::StrideMismatch { layout, stride, actual } => write!(
                f,
                "{layout}: {actual} bytes is not a non-empty multiple of the {stride}-byte stride"
            ),
            Self::UnknownSlot { variant, stage, index } => {
                write!(f, "{variant}: no {stage} slot {index}")
            }
            Self::VariantMismatch { expected, actual } => {
                write!(f, "buffer staged for {actual} bound to {expected}")
            }
            Self::UnknownVariant(id) => write!(f, "unknown contract variant '{id}'"),
            Self::SlotsNotDense { variant, stage } => {
                write!(f, "{variant}: {stage} slots are not dense from 0")
            }
            Self::SlotKindMismatch { variant, slot, layout } => {
                write!(f, "{variant}: slot {slot} cannot carry layout {layout}")
            }
            Self::MixedColorEncoding { variant, field, layout } => {
                write!(f, "{variant}: {layout}.{field} does not use the variant color encoding")
            }
            Self::MixedStageGroup { variant, stage } => {
                write!(f, "{variant}: {stage} stage mixes uniform slots and resources")
            }
            Self::VertexBufferAfterUniform { variant, slot } => {
                write!(f, "{variant}: vertex buffer slot {slot} follows the uniform slot")
            }
            Self::PublishedDrift { variant, layout } => {
                write!(f, "{variant}: layout {layout} differs from its published signature")
            }
        }
    }
}

impl std::error::Error for LayoutError {}
