use std::marker::PhantomData;

use anyhow::{Context, Result};
use voxelotl_layout::{Layout, StagedBuffer, Stage};
use wgpu::util::DeviceExt;

use crate::pack::{Camera, Environment, LightPacker, Material, Mesh, MeshPacker, ModelInstance};
use crate::render::blend::CullFace;
use crate::render::layout::ContractBindings;
use crate::render::pipeline::{PipelineCache, PipelineOptions};
use crate::render::{RenderCtx, RenderTarget};

/// Static mesh uploaded for one variant.
///
/// The type parameter ties the vertex buffer to the variant whose packer
/// produced it; a `GpuMesh<PhongU8>` cannot be drawn by a `PhongF32` renderer.
pub struct GpuMesh<C> {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    _contract: PhantomData<C>,
}

impl<C> GpuMesh<C> {
    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

/// Instanced mesh renderer for one contract variant.
///
/// Per draw:
/// - vertices at `C::VERTICES_SLOT`
/// - instances at `C::INSTANCE_SLOT`, packed with `C::instance`
/// - vertex uniforms (and fragment uniforms for lit variants) bound at their
///   slot indices in groups 0 and 1
///
/// Uniform blocks are replaced whole. Each draw reads the blocks written
/// before it was recorded, so lighting and camera may change between draws of
/// one pass. Pipelines are cached per option set; switching cull faces back
/// and forth reuses them.
pub struct ModelRenderer<C: MeshPacker> {
    options: PipelineOptions,
    pipelines: PipelineCache,
    bindings: Option<ContractBindings>,

    instance_vbo: Option<wgpu::Buffer>,
    instance_capacity: usize,
    instance_cursor: usize,

    _contract: PhantomData<C>,
}

impl<C: MeshPacker> ModelRenderer<C> {
    pub fn new(options: PipelineOptions) -> Result<Self> {
        anyhow::ensure!(
            options.variant == C::DESC.variant,
            "pipeline options select {} but the renderer packs {}",
            options.variant,
            C::DESC.variant
        );
        Ok(Self {
            options,
            pipelines: PipelineCache::new(),
            bindings: None,
            instance_vbo: None,
            instance_capacity: 0,
            instance_cursor: 0,
            _contract: PhantomData,
        })
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Packs and uploads `mesh`. Returns `None` for a mesh with nothing to draw.
    pub fn upload_mesh(&self, ctx: &RenderCtx<'_>, mesh: &Mesh) -> Option<GpuMesh<C>> {
        if mesh.is_empty() {
            return None;
        }
        let vertices = C::vertices(mesh);
        let variant = C::DESC.variant;

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("voxelotl {variant} mesh vbo")),
            contents: C::Vertex::slice_as_bytes(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Index buffers must be a multiple of 4 bytes.
        let mut indices = mesh.indices.clone();
        if indices.len() % 2 == 1 {
            indices.push(0);
        }
        let index_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("voxelotl {variant} mesh ibo")),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Some(GpuMesh {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            _contract: PhantomData,
        })
    }

    /// Switches face culling for the following draws. Uniform rings are kept.
    pub fn set_cull(&mut self, cull: CullFace) {
        self.options.cull = cull;
    }

    /// Number of distinct pipelines built so far.
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Call once per frame (submission) before the first draw.
    pub fn begin_frame(&mut self) {
        self.instance_cursor = 0;
        if let Some(bindings) = self.bindings.as_mut() {
            bindings.begin_frame();
        }
    }

    pub fn set_camera(&mut self, ctx: &RenderCtx<'_>, camera: &Camera) -> Result<()> {
        let uniforms = C::vertex_uniforms(camera);
        self.write_uniform(ctx, Stage::Vertex, C::VERTEX_UNIFORMS_SLOT, uniforms.as_bytes())
    }

    /// Writes pre-packed uniform bytes after checking they were staged for
    /// this variant and fit the slot.
    pub fn write_raw_uniform(&mut self, ctx: &RenderCtx<'_>, staged: &StagedBuffer) -> Result<()> {
        C::DESC.accept(staged).inspect_err(|e| log::warn!("rejected staged buffer: {e}"))?;
        self.write_uniform(ctx, staged.stage, staged.slot, &staged.bytes)
    }

    fn write_uniform(&mut self, ctx: &RenderCtx<'_>, stage: Stage, slot: u32, bytes: &[u8]) -> Result<()> {
        self.bindings_mut(ctx).write(stage, slot, bytes)?;
        Ok(())
    }

    /// Draws `mesh` once per instance.
    pub fn draw(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        mesh: &GpuMesh<C>,
        instances: &[ModelInstance],
    ) -> Result<()> {
        if instances.is_empty() || mesh.index_count == 0 {
            return Ok(());
        }

        self.bindings_mut(ctx).flush(ctx.device, ctx.queue);
        self.ensure_instance_capacity(ctx, instances.len());

        let packed: Vec<C::Instance> = instances.iter().map(C::instance).collect();
        let stride = C::Instance::DESC.size as u64;
        let start = self.instance_cursor as u64 * stride;
        let end = start + packed.len() as u64 * stride;

        let instance_vbo = self.instance_vbo.as_ref().context("instance buffer not created")?;
        ctx.queue.write_buffer(instance_vbo, start, C::Instance::slice_as_bytes(&packed));
        self.instance_cursor += packed.len();

        let pipeline = self.pipelines.get_or_create(ctx.device, self.options)?;
        let bindings = self.bindings.as_ref().context("bindings not created")?;

        let label = format!("voxelotl {} pass", C::DESC.variant);
        let mut rpass = target.begin_load_pass(&label, self.options.depth_format.is_some())?;

        rpass.set_pipeline(&pipeline.pipeline);
        bindings.bind(&mut rpass);
        rpass.set_vertex_buffer(C::VERTICES_SLOT, mesh.vertex_buffer.slice(..));
        rpass.set_vertex_buffer(C::INSTANCE_SLOT, instance_vbo.slice(start..end));
        rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..mesh.index_count, 0, 0..packed.len() as u32);
        Ok(())
    }

    fn bindings_mut(&mut self, ctx: &RenderCtx<'_>) -> &mut ContractBindings {
        self.bindings.get_or_insert_with(|| ContractBindings::new(ctx.device, C::DESC))
    }

    fn ensure_instance_capacity(&mut self, ctx: &RenderCtx<'_>, additional: usize) {
        let required = self.instance_cursor + additional;
        if required <= self.instance_capacity && self.instance_vbo.is_some() {
            return;
        }

        // Earlier draws this frame keep the old buffer alive through their passes.
        let new_cap = additional.max(self.instance_capacity).next_power_of_two().max(64);
        let new_size = (new_cap * C::Instance::DESC.size) as u64;
        log::debug!(
            "{}: instance buffer {} -> {} records",
            C::DESC.variant,
            self.instance_capacity,
            new_cap
        );

        self.instance_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("voxelotl {} instance vbo", C::DESC.variant)),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.instance_capacity = new_cap;
        self.instance_cursor = 0;
    }
}

impl<C: LightPacker> ModelRenderer<C> {
    /// Packs and writes the fragment lighting block.
    pub fn set_lighting(
        &mut self,
        ctx: &RenderCtx<'_>,
        camera: &Camera,
        environment: &Environment,
        material: &Material,
    ) -> Result<()> {
        self.set_cull(environment.cull_face);
        let uniforms = C::fragment_uniforms(camera, environment, material);
        self.write_uniform(ctx, Stage::Fragment, C::FRAGMENT_UNIFORMS_SLOT, uniforms.as_bytes())
    }
}
