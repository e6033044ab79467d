//! Contract descriptors mapped onto wgpu vertex and bind group layouts.
//!
//! Nothing in here hard-codes a location, stride or binding number; all of it
//! comes from the variant's slot tables so the host side cannot drift from
//! the generated device header.

use std::num::NonZeroU64;

use anyhow::{Context, Result};
use voxelotl_layout::{
    ContractDesc, ContractVariant, LayoutError, PrimitiveKind, ResourceKind, SlotBinding, SlotDesc, Stage,
};

/// wgpu format for one vertex attribute column.
pub fn vertex_format(kind: PrimitiveKind) -> Option<wgpu::VertexFormat> {
    match kind {
        PrimitiveKind::F32 => Some(wgpu::VertexFormat::Float32),
        PrimitiveKind::F32x2 => Some(wgpu::VertexFormat::Float32x2),
        PrimitiveKind::F32x3 => Some(wgpu::VertexFormat::Float32x3),
        PrimitiveKind::F32x4 => Some(wgpu::VertexFormat::Float32x4),
        PrimitiveKind::F16x4 => Some(wgpu::VertexFormat::Float16x4),
        PrimitiveKind::U8x4 => Some(wgpu::VertexFormat::Unorm8x4),
        PrimitiveKind::F32x4x4 | PrimitiveKind::Pad(_) => None,
    }
}

/// Owned vertex buffer layouts, indexed by vertex slot number.
#[derive(Debug, Clone)]
pub struct VertexBuffers {
    buffers: Vec<(u64, wgpu::VertexStepMode, Vec<wgpu::VertexAttribute>)>,
}

impl VertexBuffers {
    pub fn new(desc: &ContractDesc) -> Result<Self> {
        let mut buffers = Vec::new();
        for buffer in desc.vertex_attributes() {
            let step_mode = match buffer.slot.binding {
                SlotBinding::InstanceBuffer => wgpu::VertexStepMode::Instance,
                _ => wgpu::VertexStepMode::Vertex,
            };
            let attributes = buffer
                .attributes
                .iter()
                .map(|a| {
                    let format = vertex_format(a.kind)
                        .with_context(|| format!("{}: no vertex format for {}", desc.variant, a.kind))?;
                    Ok(wgpu::VertexAttribute {
                        format,
                        offset: a.offset as u64,
                        shader_location: a.location,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            anyhow::ensure!(
                buffer.slot.index as usize == buffers.len(),
                "{}: vertex buffer slot {} is not at position {}",
                desc.variant,
                buffer.slot.name,
                buffers.len()
            );
            buffers.push((buffer.stride() as u64, step_mode, attributes));
        }
        Ok(Self { buffers })
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.buffers
            .iter()
            .map(|(stride, step_mode, attributes)| wgpu::VertexBufferLayout {
                array_stride: *stride,
                step_mode: *step_mode,
                attributes,
            })
            .collect()
    }
}

fn stage_visibility(stage: Stage) -> wgpu::ShaderStages {
    match stage {
        Stage::Vertex => wgpu::ShaderStages::VERTEX,
        Stage::Fragment => wgpu::ShaderStages::FRAGMENT,
    }
}

/// Minimum binding size of a uniform slot: the whole block.
pub fn min_binding_size(slot: &SlotDesc) -> Option<NonZeroU64> {
    NonZeroU64::new(slot.layout.size as u64)
}

fn resource_binding_type(kind: ResourceKind) -> wgpu::BindingType {
    match kind {
        ResourceKind::Texture2D => wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        ResourceKind::Sampler => wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
    }
}

/// Entries for one stage's bind group: binding number = slot index.
///
/// Uniform slots use dynamic offsets into a per-frame ring; textures and
/// samplers follow at their resource indices.
pub fn bind_group_layout_entries(desc: &ContractDesc, stage: Stage) -> Vec<wgpu::BindGroupLayoutEntry> {
    let uniforms = desc
        .slots(stage)
        .iter()
        .filter(|s| s.binding == SlotBinding::Uniform)
        .map(|slot| wgpu::BindGroupLayoutEntry {
            binding: slot.index,
            visibility: stage_visibility(stage),
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: true,
                min_binding_size: min_binding_size(slot),
            },
            count: None,
        });
    let resources = desc.resources(stage).iter().map(|resource| wgpu::BindGroupLayoutEntry {
        binding: resource.index,
        visibility: stage_visibility(stage),
        ty: resource_binding_type(resource.kind),
        count: None,
    });
    uniforms.chain(resources).collect()
}

/// Stages that have a bind group, in group order.
///
/// The vertex stage always has one; the fragment stage only when it reads
/// uniforms or samples a texture.
pub fn bound_stages(desc: &ContractDesc) -> Vec<Stage> {
    Stage::ALL.into_iter().filter(|&stage| desc.binds(stage)).collect()
}

pub fn create_bind_group_layout(device: &wgpu::Device, desc: &ContractDesc, stage: Stage) -> wgpu::BindGroupLayout {
    let label = format!("voxelotl {} {} bgl", desc.variant, stage);
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&label),
        entries: &bind_group_layout_entries(desc, stage),
    })
}

pub fn create_bind_group_layouts(device: &wgpu::Device, desc: &ContractDesc) -> Vec<wgpu::BindGroupLayout> {
    bound_stages(desc)
        .into_iter()
        .map(|stage| create_bind_group_layout(device, desc, stage))
        .collect()
}

/// Rounds `size` up to the next multiple of `alignment` (a power of two).
#[inline]
pub const fn align_up(size: u64, alignment: u64) -> u64 {
    (size + alignment - 1) & !(alignment - 1)
}

const INITIAL_RING_BLOCKS: u64 = 16;

/// One uniform slot: the current block on the host, and a ring of device
/// blocks that each draw of the frame gets its own copy in.
struct UniformRing {
    slot: &'static SlotDesc,
    block: Vec<u8>,
    dirty: bool,
    buffer: wgpu::Buffer,
    /// Distance between ring entries, aligned for dynamic offsets.
    stride: u64,
    /// In blocks.
    capacity: u64,
    cursor: u64,
    offset: u32,
}

impl UniformRing {
    fn new(device: &wgpu::Device, variant: ContractVariant, slot: &'static SlotDesc, stride: u64, capacity: u64) -> Self {
        Self {
            slot,
            block: vec![0; slot.layout.size],
            dirty: true,
            buffer: create_ring_buffer(device, variant, slot, stride * capacity),
            stride,
            capacity,
            cursor: 0,
            offset: 0,
        }
    }
}

fn create_ring_buffer(device: &wgpu::Device, variant: ContractVariant, slot: &SlotDesc, size: u64) -> wgpu::Buffer {
    let label = format!("voxelotl {} {} ubo ring", variant, slot.device_name());
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

struct UniformGroup {
    stage: Stage,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

/// Uniform rings and bind groups for one variant.
///
/// `write` only stages a block on the host. `flush` copies every block that
/// changed since the previous flush into the next free entry of its ring, and
/// `bind` points the pass at those entries through dynamic offsets. Each draw
/// therefore sees the uniforms in effect when it was recorded, even though
/// all ring writes land before the submission runs.
///
/// Stages whose group carries textures are bound by the renderer that owns
/// the textures; only uniform groups are created here.
pub struct ContractBindings {
    desc: &'static ContractDesc,
    uniforms: Vec<UniformRing>,
    groups: Vec<UniformGroup>,
}

impl ContractBindings {
    pub fn new(device: &wgpu::Device, desc: &'static ContractDesc) -> Self {
        let alignment = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let uniforms: Vec<UniformRing> = desc
            .uniform_slots()
            .map(|slot| {
                let stride = align_up(slot.layout.size as u64, alignment);
                UniformRing::new(device, desc.variant, slot, stride, INITIAL_RING_BLOCKS)
            })
            .collect();

        let groups = bound_stages(desc)
            .into_iter()
            .filter(|&stage| desc.resources(stage).is_empty())
            .map(|stage| {
                let layout = create_bind_group_layout(device, desc, stage);
                let bind_group = create_uniform_group(device, desc, stage, &layout, &uniforms);
                UniformGroup { stage, layout, bind_group }
            })
            .collect();

        Self { desc, uniforms, groups }
    }

    /// Stages the uniform block at `stage`/`index` for the next draw.
    ///
    /// The byte length is checked against the slot's layout before anything
    /// is kept.
    pub fn write(&mut self, stage: Stage, index: u32, bytes: &[u8]) -> Result<(), LayoutError> {
        let slot = self.desc.check_binding(stage, index, bytes.len()).inspect_err(|e| {
            log::warn!("rejected uniform write: {e}");
        })?;
        let ring = self
            .uniforms
            .iter_mut()
            .find(|u| u.slot.stage == slot.stage && u.slot.index == slot.index)
            .ok_or(LayoutError::UnknownSlot { variant: self.desc.variant, stage, index })?;
        ring.block.copy_from_slice(bytes);
        ring.dirty = true;
        Ok(())
    }

    /// Restarts every ring. Call once per submission, before its first draw.
    pub fn begin_frame(&mut self) {
        for ring in &mut self.uniforms {
            ring.cursor = 0;
            ring.dirty = true;
        }
    }

    /// Uploads the blocks written since the last flush. Call before each draw.
    pub fn flush(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let mut regrouped: Vec<Stage> = Vec::new();
        for ring in self.uniforms.iter_mut().filter(|u| u.dirty) {
            if ring.cursor == ring.capacity {
                // Draws already recorded keep the old ring alive.
                let capacity = ring.capacity * 2;
                log::debug!(
                    "{}: {} ring {} -> {} blocks",
                    self.desc.variant,
                    ring.slot.device_name(),
                    ring.capacity,
                    capacity
                );
                ring.buffer = create_ring_buffer(device, self.desc.variant, ring.slot, ring.stride * capacity);
                ring.capacity = capacity;
                ring.cursor = 0;
                if !regrouped.contains(&ring.slot.stage) {
                    regrouped.push(ring.slot.stage);
                }
            }
            let offset = ring.cursor * ring.stride;
            queue.write_buffer(&ring.buffer, offset, &ring.block);
            ring.offset = offset as u32;
            ring.cursor += 1;
            ring.dirty = false;
        }

        for group in self.groups.iter_mut().filter(|g| regrouped.contains(&g.stage)) {
            group.bind_group = create_uniform_group(device, self.desc, group.stage, &group.layout, &self.uniforms);
        }
    }

    /// Dynamic offsets of `stage`'s uniform slots, in binding order.
    pub fn offsets(&self, stage: Stage) -> Vec<u32> {
        self.uniforms
            .iter()
            .filter(|u| u.slot.stage == stage)
            .map(|u| u.offset)
            .collect()
    }

    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        for group in &self.groups {
            pass.set_bind_group(group.stage.group(), &group.bind_group, &self.offsets(group.stage));
        }
    }
}

fn create_uniform_group(
    device: &wgpu::Device,
    desc: &ContractDesc,
    stage: Stage,
    layout: &wgpu::BindGroupLayout,
    uniforms: &[UniformRing],
) -> wgpu::BindGroup {
    let entries: Vec<wgpu::BindGroupEntry<'_>> = uniforms
        .iter()
        .filter(|u| u.slot.stage == stage)
        .map(|u| wgpu::BindGroupEntry {
            binding: u.slot.index,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &u.buffer,
                offset: 0,
                size: min_binding_size(u.slot),
            }),
        })
        .collect();
    let label = format!("voxelotl {} {} bind group", desc.variant, stage);
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&label),
        layout,
        entries: &entries,
    })
}
