//! Binding slots: which buffer or resource a stage argument index carries.

use std::fmt;

use crate::layout::LayoutDesc;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::Vertex, Stage::Fragment];

    /// Bind group holding this stage's uniform slots.
    #[inline]
    pub const fn group(self) -> u32 {
        match self {
            Self::Vertex => 0,
            Self::Fragment => 1,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a slot is attached.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SlotBinding {
    /// Vertex buffer stepped per vertex.
    VertexBuffer,
    /// Vertex buffer stepped per instance.
    InstanceBuffer,
    /// Uniform buffer bound at `@group(stage) @binding(slot)`.
    Uniform,
}

impl SlotBinding {
    #[inline]
    pub const fn is_vertex_buffer(self) -> bool {
        matches!(self, Self::VertexBuffer | Self::InstanceBuffer)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SlotDesc {
    pub stage: Stage,
    pub index: u32,
    pub name: &'static str,
    pub binding: SlotBinding,
    pub layout: &'static LayoutDesc,
}

impl SlotDesc {
    /// Global variable name in device programs, e.g. `vertex_uniforms`.
    pub fn device_name(&self) -> String {
        format!("{}_{}", self.stage.label(), snake_case(self.name))
    }

    /// Device constant carrying the slot number, e.g. `VERTEX_INPUT_UNIFORMS`.
    pub fn constant_name(&self) -> String {
        format!(
            "{}_INPUT_{}",
            self.stage.label().to_ascii_uppercase(),
            snake_case(self.name).to_ascii_uppercase()
        )
    }
}

/// Non-buffer resource bound next to a stage's uniform slots.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ResourceKind {
    /// Filterable 2D color texture.
    Texture2D,
    /// Filtering sampler.
    Sampler,
}

impl ResourceKind {
    pub const fn wgsl_type(self) -> &'static str {
        match self {
            Self::Texture2D => "texture_2d<f32>",
            Self::Sampler => "sampler",
        }
    }
}

/// A texture or sampler slot. Its index continues the stage's buffer slot
/// numbering, so binding numbers within a group never collide.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ResourceDesc {
    pub stage: Stage,
    pub index: u32,
    pub name: &'static str,
    pub kind: ResourceKind,
}

impl ResourceDesc {
    /// Global variable name in device programs, e.g. `fragment_texture`.
    pub fn device_name(&self) -> String {
        format!("{}_{}", self.stage.label(), snake_case(self.name))
    }

    pub fn constant_name(&self) -> String {
        format!(
            "{}_INPUT_{}",
            self.stage.label().to_ascii_uppercase(),
            snake_case(self.name).to_ascii_uppercase()
        )
    }
}

/// Panics unless resource indices step by one from the first entry and
/// every resource sits in one stage.
pub const fn assert_consecutive_resources(resources: &[ResourceDesc]) {
    let mut i = 0;
    while i < resources.len() {
        assert!(
            resources[i].index == resources[0].index + i as u32,
            "resource indices must be consecutive"
        );
        assert!(
            resources[i].stage.group() == resources[0].stage.group(),
            "resource table mixes stages"
        );
        i += 1;
    }
}

/// Panics unless slot `i` has index `i` and every slot sits in one stage.
pub const fn assert_dense_slots(slots: &[SlotDesc]) {
    let mut i = 0;
    while i < slots.len() {
        assert!(slots[i].index == i as u32, "slot indices must run 0, 1, 2, ... without gaps");
        assert!(
            slots[i].stage.group() == slots[0].stage.group(),
            "slot table mixes stages"
        );
        i += 1;
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::contracts::phong_f32::{VertexShaderUniforms, VERTEX_SLOTS};

    #[test]
    fn names() {
        let slot = SlotDesc {
            stage: Stage::Fragment,
            index: 0,
            name: "Uniforms",
            binding: SlotBinding::Uniform,
            layout: &VertexShaderUniforms::DESC,
        };
        assert_eq!(slot.device_name(), "fragment_uniforms");
        assert_eq!(slot.constant_name(), "FRAGMENT_INPUT_UNIFORMS");
    }

    #[test]
    fn resource_names() {
        let texture = ResourceDesc {
            stage: Stage::Fragment,
            index: 0,
            name: "Texture",
            kind: ResourceKind::Texture2D,
        };
        assert_eq!(texture.device_name(), "fragment_texture");
        assert_eq!(texture.constant_name(), "FRAGMENT_INPUT_TEXTURE");
        assert_eq!(ResourceKind::Sampler.wgsl_type(), "sampler");
    }

    #[test]
    #[should_panic(expected = "consecutive")]
    fn resource_gaps_are_rejected() {
        let resource = |index, kind| ResourceDesc { stage: Stage::Fragment, index, name: "R", kind };
        assert_consecutive_resources(&[
            resource(1, ResourceKind::Texture2D),
            resource(3, ResourceKind::Sampler),
        ]);
    }

    #[test]
    fn multi_word_names_are_snake_cased() {
        assert_eq!(snake_case("InstanceData"), "instance_data");
    }

    #[test]
    fn groups_per_stage() {
        assert_eq!(Stage::Vertex.group(), 0);
        assert_eq!(Stage::Fragment.group(), 1);
    }

    #[test]
    #[should_panic(expected = "without gaps")]
    fn gaps_are_rejected() {
        let mut slots = VERTEX_SLOTS.to_vec();
        slots.remove(1);
        assert_dense_slots(&slots);
    }
}
