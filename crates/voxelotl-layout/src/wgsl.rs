//! WGSL header generation.
//!
//! The header is prepended to each device program, so the program's structs,
//! slot constants and uniform bindings come from the same declarations as the
//! host types.

use std::fmt;

use crate::layout::{LayoutDesc, LayoutKind};
use crate::primitive::PrimitiveKind;
use crate::variant::ContractDesc;

/// Renders the shared header for one variant.
pub fn header(desc: &ContractDesc) -> String {
    Header(desc).to_string()
}

/// Name of the vertex-stage input struct generated for a buffer layout.
pub fn attribute_struct_name(layout: &LayoutDesc) -> String {
    format!("{}In", layout.name)
}

struct Header<'a>(&'a ContractDesc);

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let desc = self.0;
        writeln!(f, "// voxelotl contract `{}`: generated, do not edit.", desc.variant)?;
        writeln!(f)?;

        for slot in desc.all_slots() {
            writeln!(f, "const {}: u32 = {}u;", slot.constant_name(), slot.index)?;
        }
        for resource in desc.fragment_resources {
            writeln!(f, "const {}: u32 = {}u;", resource.constant_name(), resource.index)?;
        }

        for layout in desc.layouts() {
            writeln!(f)?;
            storage_struct(f, layout)?;
        }

        for buffer in desc.vertex_attributes() {
            writeln!(f)?;
            writeln!(f, "struct {} {{", attribute_struct_name(buffer.slot.layout))?;
            for attr in &buffer.attributes {
                let ty = attr.kind.wgsl_attribute_type().ok_or(fmt::Error)?;
                writeln!(f, "    @location({}) {}: {},", attr.location, attr.name, ty)?;
            }
            writeln!(f, "}}")?;
        }

        writeln!(f)?;
        for slot in desc.uniform_slots() {
            writeln!(
                f,
                "@group({}) @binding({}) var<uniform> {}: {};",
                slot.stage.group(),
                slot.index,
                slot.device_name(),
                slot.layout.name
            )?;
        }
        for resource in desc.fragment_resources {
            writeln!(
                f,
                "@group({}) @binding({}) var {}: {};",
                resource.stage.group(),
                resource.index,
                resource.device_name(),
                resource.kind.wgsl_type()
            )?;
        }
        Ok(())
    }
}

fn storage_struct(f: &mut fmt::Formatter<'_>, layout: &LayoutDesc) -> fmt::Result {
    if layout.kind != LayoutKind::Uniform {
        writeln!(f, "// {} record, stride {}", layout.kind, layout.size)?;
    }
    writeln!(f, "struct {} {{", layout.name)?;
    for field in layout.fields {
        match field.kind {
            PrimitiveKind::F32x3 => {
                writeln!(f, "    {}: vec3<f32>,", field.name)?;
                writeln!(f, "    {}_w: f32,", field.name)?;
            }
            PrimitiveKind::Pad(1) => writeln!(f, "    {}: u32,", field.name)?,
            PrimitiveKind::Pad(words) => {
                for i in 0..words {
                    writeln!(f, "    {}_{i}: u32,", field.name)?;
                }
            }
            kind => writeln!(f, "    {}: {},", field.name, kind.wgsl_storage_type())?,
        }
    }
    writeln!(f, "}}")
}
