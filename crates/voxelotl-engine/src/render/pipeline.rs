use std::collections::HashMap;

use anyhow::{Context, Result};
use voxelotl_layout::{wgsl, ContractVariant};

use super::blend::{BlendMode, CullFace};
use super::layout::{create_bind_group_layouts, VertexBuffers};

/// Everything that selects a distinct render pipeline.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PipelineOptions {
    pub variant: ContractVariant,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub blend: BlendMode,
    pub cull: CullFace,
}

impl PipelineOptions {
    /// Defaults for a variant: 3D variants depth test and cull back faces,
    /// the 2D overlay blends and never culls.
    pub fn new(variant: ContractVariant, color_format: wgpu::TextureFormat) -> Self {
        let (blend, cull) = match variant {
            ContractVariant::Ui2d => (BlendMode::Normal, CullFace::None),
            ContractVariant::DebugSolid => (BlendMode::Normal, CullFace::None),
            _ => (BlendMode::None, CullFace::Back),
        };
        Self {
            variant,
            color_format,
            depth_format: None,
            blend,
            cull,
        }
    }

    pub fn with_depth(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_format = Some(format);
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn with_cull(mut self, cull: CullFace) -> Self {
        self.cull = cull;
        self
    }
}

fn program_body(variant: ContractVariant) -> &'static str {
    match variant {
        ContractVariant::PhongF32 => include_str!("shaders/phong_f32.wgsl"),
        ContractVariant::PhongU8 => include_str!("shaders/phong_u8.wgsl"),
        ContractVariant::DirectionalF16 => include_str!("shaders/directional_f16.wgsl"),
        ContractVariant::Ui2d => include_str!("shaders/ui2d.wgsl"),
        ContractVariant::DebugSolid => include_str!("shaders/debug_solid.wgsl"),
    }
}

/// Complete device program for a variant: generated header, then the body.
pub fn shader_source(variant: ContractVariant) -> String {
    let mut source = wgsl::header(variant.desc());
    source.push('\n');
    source.push_str(program_body(variant));
    source
}

/// Depth test per variant: lit meshes test and write, debug overlays test
/// without writing, the 2D pass ignores depth.
fn depth_state(variant: ContractVariant, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    let (depth_write_enabled, depth_compare) = match variant {
        ContractVariant::Ui2d => (false, wgpu::CompareFunction::Always),
        ContractVariant::DebugSolid => (false, wgpu::CompareFunction::LessEqual),
        _ => (true, wgpu::CompareFunction::Less),
    };
    wgpu::DepthStencilState {
        format,
        depth_write_enabled,
        depth_compare,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// A render pipeline and the bind group layouts it was built against.
pub struct ContractPipeline {
    pub options: PipelineOptions,
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layouts: Vec<wgpu::BindGroupLayout>,
}

pub fn create_pipeline(device: &wgpu::Device, options: PipelineOptions) -> Result<ContractPipeline> {
    let variant = options.variant;
    let desc = variant.desc();
    desc.validate().with_context(|| format!("contract {variant} is invalid"))?;

    let source = shader_source(variant);
    let label = format!("voxelotl {variant}");
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let bind_group_layouts = create_bind_group_layouts(device, desc);
    let bgl_refs: Vec<&wgpu::BindGroupLayout> = bind_group_layouts.iter().collect();

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&label),
        bind_group_layouts: &bgl_refs,
        immediate_size: 0,
    });

    let vertex_buffers = VertexBuffers::new(desc)?;
    let buffers = vertex_buffers.layouts();

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(&pipeline_layout),

        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &buffers,
        },

        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: options.color_format,
                blend: options.blend.state(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: options.cull.face(),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: options.depth_format.map(|format| depth_state(variant, format)),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    log::debug!("created pipeline {variant} {options:?}");

    Ok(ContractPipeline {
        options,
        pipeline,
        bind_group_layouts,
    })
}

/// Pipelines keyed by their options, created on first use.
#[derive(Default)]
pub struct PipelineCache {
    pipelines: HashMap<PipelineOptions, ContractPipeline>,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, device: &wgpu::Device, options: PipelineOptions) -> Result<&ContractPipeline> {
        if !self.pipelines.contains_key(&options) {
            let pipeline = create_pipeline(device, options)?;
            self.pipelines.insert(options, pipeline);
        }
        self.pipelines
            .get(&options)
            .context("pipeline missing from cache after insert")
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_starts_with_header() {
        for v in ContractVariant::ALL {
            let source = shader_source(v);
            assert!(source.starts_with(&wgsl::header(v.desc())), "{v}");
            assert!(source.contains("fn vs_main("), "{v}");
            assert!(source.contains("fn fs_main("), "{v}");
        }
    }

    #[test]
    fn depth_policy() {
        let f = wgpu::TextureFormat::Depth32Float;
        let lit = depth_state(ContractVariant::PhongF32, f);
        assert!(lit.depth_write_enabled);
        assert_eq!(lit.depth_compare, wgpu::CompareFunction::Less);

        let ui = depth_state(ContractVariant::Ui2d, f);
        assert!(!ui.depth_write_enabled);
        assert_eq!(ui.depth_compare, wgpu::CompareFunction::Always);
    }

    #[test]
    fn options_are_distinct_cache_keys() {
        let a = PipelineOptions::new(ContractVariant::Ui2d, wgpu::TextureFormat::Rgba8UnormSrgb);
        let b = a.with_blend(BlendMode::Additive);
        assert_ne!(a, b);
        assert_eq!(a.blend, BlendMode::Normal);
        assert_eq!(a.cull, CullFace::None);
    }
}
