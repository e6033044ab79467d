//! Runtime binding checks for buffers that arrive as raw bytes.
//!
//! Typed packers cannot produce a mismatched buffer; these checks cover bytes
//! that crossed an untyped boundary (asset caches, tooling, FFI).

use crate::error::LayoutError;
use crate::layout::Layout;
use crate::slot::{SlotBinding, SlotDesc, Stage};
use crate::variant::{ContractDesc, ContractVariant};

/// Bytes tagged with the variant and slot they were packed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedBuffer {
    pub variant: ContractVariant,
    pub stage: Stage,
    pub slot: u32,
    pub bytes: Vec<u8>,
}

impl StagedBuffer {
    pub fn new(variant: ContractVariant, stage: Stage, slot: u32, bytes: Vec<u8>) -> Self {
        Self { variant, stage, slot, bytes }
    }

    pub fn from_records<L: Layout>(variant: ContractVariant, stage: Stage, slot: u32, records: &[L]) -> Self {
        Self::new(variant, stage, slot, L::slice_as_bytes(records).to_vec())
    }
}

impl ContractDesc {
    /// Checks that `byte_len` bytes may be bound at `stage`/`index`.
    ///
    /// Uniform slots need exactly one block; vertex and instance slots need a
    /// non-empty whole number of records.
    pub fn check_binding(&self, stage: Stage, index: u32, byte_len: usize) -> Result<&'static SlotDesc, LayoutError> {
        let slot = self.slot(stage, index).ok_or(LayoutError::UnknownSlot {
            variant: self.variant,
            stage,
            index,
        })?;
        let layout = slot.layout;
        match slot.binding {
            SlotBinding::Uniform if byte_len != layout.size => Err(LayoutError::SizeMismatch {
                layout: layout.name,
                expected: layout.size,
                actual: byte_len,
            }),
            SlotBinding::VertexBuffer | SlotBinding::InstanceBuffer
                if byte_len == 0 || byte_len % layout.size != 0 =>
            {
                Err(LayoutError::StrideMismatch {
                    layout: layout.name,
                    stride: layout.size,
                    actual: byte_len,
                })
            }
            _ => Ok(slot),
        }
    }

    /// Variant tag first, then [`check_binding`](Self::check_binding).
    pub fn accept(&self, buffer: &StagedBuffer) -> Result<&'static SlotDesc, LayoutError> {
        if buffer.variant != self.variant {
            return Err(LayoutError::VariantMismatch {
                expected: self.variant,
                actual: buffer.variant,
            });
        }
        self.check_binding(buffer.stage, buffer.slot, buffer.bytes.len())
    }
}
