use anyhow::{Context, Result};
use glam::Vec2;
use voxelotl_layout::contracts::ui2d::Vertex2D;
use voxelotl_layout::contracts::Ui2d;
use voxelotl_layout::{Contract, Layout, Stage};

use crate::pack::{self, Color, Frame, SpriteDraw, SpriteVertex};
use crate::render::blend::BlendMode;
use crate::render::layout::ContractBindings;
use crate::render::pipeline::{PipelineCache, PipelineOptions};
use crate::render::texture::{SpriteTexture, TextureBinder};
use crate::render::{RenderCtx, RenderTarget};

/// Largest batch: four vertices per quad must stay addressable by u16 indices.
pub const MAX_QUADS: usize = 16384;

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

/// Consecutive quads sampling one texture; `None` is the white texel.
struct TextureRun {
    texture: Option<SpriteTexture>,
    quads: usize,
}

/// Batched 2D quad renderer for the `ui-2d` contract.
///
/// Usage per batch: `begin(blend)`, any number of `draw`/`quad`/`rect`, then
/// `end`. Quads are packed on the host as they arrive; `end` uploads the
/// batch, writes the projection for `frame` and issues one indexed draw per
/// run of quads sharing a texture. Untextured quads sample a 1×1 white texture.
///
/// Batches of one frame are appended behind each other in the buffers, so
/// several batches can share a submission, each with its own projection.
/// Call `begin_frame` once per submission.
pub struct SpriteRenderer {
    color_format: wgpu::TextureFormat,
    pipelines: PipelineCache,
    bindings: Option<ContractBindings>,
    textures: Option<TextureBinder>,

    active: Option<BlendMode>,
    vertices: Vec<Vertex2D>,
    indices: Vec<u16>,
    runs: Vec<TextureRun>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
    /// In quads, for both buffers.
    capacity: usize,
    cursor: usize,
}

impl SpriteRenderer {
    pub fn new(color_format: wgpu::TextureFormat) -> Self {
        Self {
            color_format,
            pipelines: PipelineCache::new(),
            bindings: None,
            textures: None,
            active: None,
            vertices: Vec::new(),
            indices: Vec::new(),
            runs: Vec::new(),
            vbo: None,
            ibo: None,
            capacity: 0,
            cursor: 0,
        }
    }

    pub fn begin_frame(&mut self) {
        self.cursor = 0;
        if let Some(bindings) = self.bindings.as_mut() {
            bindings.begin_frame();
        }
    }

    /// Uploads a texture for `draw`: tightly packed sRGB RGBA8 rows, top row first.
    pub fn create_texture(&mut self, ctx: &RenderCtx<'_>, width: u32, height: u32, rgba: &[u8]) -> Result<SpriteTexture> {
        self.texture_binder(ctx)?.upload(ctx, width, height, rgba)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Number of quads queued in the current batch.
    pub fn len(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn begin(&mut self, blend: BlendMode) -> Result<()> {
        if let Some(current) = self.active {
            anyhow::bail!("sprite batch already started with {current:?}");
        }
        self.active = Some(blend);
        self.vertices.clear();
        self.indices.clear();
        self.runs.clear();
        Ok(())
    }

    /// Queues one untextured quad. Corners wind counter-clockwise.
    pub fn quad(&mut self, corners: &[SpriteVertex; 4]) -> Result<()> {
        self.push_quad(None, corners)
    }

    /// Queues one quad sampling `texture` at the corners' texture coordinates.
    pub fn textured_quad(&mut self, texture: &SpriteTexture, corners: &[SpriteVertex; 4]) -> Result<()> {
        self.push_quad(Some(texture), corners)
    }

    /// Queues `texture` placed, scaled, rotated and flipped by `draw`.
    /// A zero-sized source rectangle queues nothing.
    pub fn draw(&mut self, texture: &SpriteTexture, draw: &SpriteDraw) -> Result<()> {
        anyhow::ensure!(self.active.is_some(), "draw outside of a sprite batch");
        match pack::ui2d::sprite_quad(texture.size(), draw) {
            Some(corners) => self.push_quad(Some(texture), &corners),
            None => Ok(()),
        }
    }

    /// Axis-aligned rectangle from `min` to `max` with the full texture.
    pub fn rect(&mut self, min: Vec2, max: Vec2, color: Color) -> Result<()> {
        let corner = |x: f32, y: f32, u: f32, v: f32| SpriteVertex {
            position: Vec2::new(x, y),
            tex_coord: Vec2::new(u, v),
            color,
        };
        self.quad(&[
            corner(min.x, min.y, 0.0, 0.0),
            corner(min.x, max.y, 0.0, 1.0),
            corner(max.x, max.y, 1.0, 1.0),
            corner(max.x, min.y, 1.0, 0.0),
        ])
    }

    fn push_quad(&mut self, texture: Option<&SpriteTexture>, corners: &[SpriteVertex; 4]) -> Result<()> {
        anyhow::ensure!(self.active.is_some(), "quad outside of a sprite batch");
        anyhow::ensure!(self.len() < MAX_QUADS, "sprite batch is full ({MAX_QUADS} quads)");

        let base = self.vertices.len() as u16;
        self.vertices.extend(corners.iter().map(pack::ui2d::vertex));
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));

        let same_texture = |run: &TextureRun| match (&run.texture, texture) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        };
        if self.runs.last().is_some_and(same_texture) {
            if let Some(run) = self.runs.last_mut() {
                run.quads += 1;
            }
        } else {
            self.runs.push(TextureRun { texture: texture.cloned(), quads: 1 });
        }
        Ok(())
    }

    /// Ends the batch and draws it into `target` with `frame`'s projection.
    pub fn end(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, frame: &Frame) -> Result<()> {
        let blend = self.active.take().context("end without begin")?;
        if self.vertices.is_empty() {
            return Ok(());
        }

        let options = PipelineOptions::new(Ui2d::DESC.variant, self.color_format).with_blend(blend);
        self.texture_binder(ctx)?;
        self.ensure_buffers(ctx);

        let uniforms = pack::ui2d::vertex_uniforms(frame);
        let bindings = self.bindings.get_or_insert_with(|| ContractBindings::new(ctx.device, Ui2d::DESC));
        bindings.write(Stage::Vertex, Ui2d::VERTEX_UNIFORMS_SLOT, uniforms.as_bytes())?;
        bindings.flush(ctx.device, ctx.queue);

        let quads = self.len();
        let vertex_start = (self.cursor * 4 * Vertex2D::DESC.size) as u64;
        let index_start = (self.cursor * QUAD_INDICES.len() * std::mem::size_of::<u16>()) as u64;
        self.cursor += quads;

        let vbo = self.vbo.as_ref().context("vertex buffer not created")?;
        let ibo = self.ibo.as_ref().context("index buffer not created")?;
        ctx.queue.write_buffer(vbo, vertex_start, Vertex2D::slice_as_bytes(&self.vertices));
        ctx.queue.write_buffer(ibo, index_start, bytemuck::cast_slice(&self.indices));

        let pipeline = self.pipelines.get_or_create(ctx.device, options)?;
        let bindings = self.bindings.as_ref().context("bindings not created")?;
        let textures = self.textures.as_ref().context("textures not created")?;

        let mut rpass = target.begin_load_pass("voxelotl ui-2d pass", false)?;
        rpass.set_pipeline(&pipeline.pipeline);
        bindings.bind(&mut rpass);
        rpass.set_vertex_buffer(Ui2d::VERTICES_SLOT, vbo.slice(vertex_start..));
        rpass.set_index_buffer(ibo.slice(index_start..), wgpu::IndexFormat::Uint16);

        let mut first = 0u32;
        for run in &self.runs {
            let texture = run.texture.as_ref().unwrap_or(textures.white());
            let count = (run.quads * QUAD_INDICES.len()) as u32;
            rpass.set_bind_group(Stage::Fragment.group(), texture.bind_group(), &[]);
            rpass.draw_indexed(first..first + count, 0, 0..1);
            first += count;
        }
        Ok(())
    }

    fn texture_binder(&mut self, ctx: &RenderCtx<'_>) -> Result<&TextureBinder> {
        if self.textures.is_none() {
            self.textures = Some(TextureBinder::new(ctx, Ui2d::DESC)?);
        }
        self.textures.as_ref().context("textures not created")
    }

    fn ensure_buffers(&mut self, ctx: &RenderCtx<'_>) {
        let quads = self.len();
        if self.cursor + quads <= self.capacity && self.vbo.is_some() && self.ibo.is_some() {
            return;
        }

        // Batches already recorded this frame keep the old buffers alive.
        let cap = quads.max(self.capacity).next_power_of_two().max(64);
        log::debug!("ui-2d: sprite buffers {} -> {} quads", self.capacity, cap);

        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("voxelotl ui-2d vbo"),
            size: (cap * 4 * Vertex2D::DESC.size) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.ibo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("voxelotl ui-2d ibo"),
            size: (cap * QUAD_INDICES.len() * std::mem::size_of::<u16>()) as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.capacity = cap;
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> SpriteRenderer {
        SpriteRenderer::new(wgpu::TextureFormat::Rgba8UnormSrgb)
    }

    // ── batch state ───────────────────────────────────────────────────────

    #[test]
    fn begin_twice_is_an_error() {
        let mut r = renderer();
        r.begin(BlendMode::Normal).unwrap();
        assert!(r.begin(BlendMode::Additive).is_err());
        assert!(r.is_active());
    }

    #[test]
    fn quad_requires_batch() {
        let mut r = renderer();
        assert!(r.rect(Vec2::ZERO, Vec2::ONE, Color::WHITE).is_err());
        assert!(r.is_empty());
    }

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn indices_offset_per_quad() {
        let mut r = renderer();
        r.begin(BlendMode::Normal).unwrap();
        r.rect(Vec2::ZERO, Vec2::ONE, Color::WHITE).unwrap();
        r.rect(Vec2::ONE, Vec2::splat(2.0), Color::BLACK).unwrap();

        assert_eq!(r.len(), 2);
        assert_eq!(r.indices, [0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(r.vertices[4].position.0, [1.0, 1.0]);
        assert_eq!(r.vertices[4].color.0, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(r.vertices[2].tex_coord.0, [1.0, 1.0]);
    }

    #[test]
    fn batch_is_capped() {
        let mut r = renderer();
        r.begin(BlendMode::None).unwrap();
        for _ in 0..MAX_QUADS {
            r.rect(Vec2::ZERO, Vec2::ONE, Color::WHITE).unwrap();
        }
        assert!(r.rect(Vec2::ZERO, Vec2::ONE, Color::WHITE).is_err());
        assert_eq!(*r.indices.last().unwrap() as usize, MAX_QUADS * 4 - 1);
    }

    #[test]
    fn untextured_quads_share_one_run() {
        let mut r = renderer();
        r.begin(BlendMode::Normal).unwrap();
        for _ in 0..3 {
            r.rect(Vec2::ZERO, Vec2::ONE, Color::WHITE).unwrap();
        }
        assert_eq!(r.runs.len(), 1);
        assert!(r.runs[0].texture.is_none());
        assert_eq!(r.runs[0].quads, 3);

        // A new batch starts with no runs.
        r.active = None;
        r.begin(BlendMode::Normal).unwrap();
        assert!(r.runs.is_empty());
    }
}
