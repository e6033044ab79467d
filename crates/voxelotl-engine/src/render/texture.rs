//! Sampled RGBA8 textures for a contract's fragment resource group.

use std::sync::Arc;

use anyhow::Result;
use glam::Vec2;
use voxelotl_layout::{ContractDesc, ResourceKind, Stage};

use crate::render::layout::create_bind_group_layout;
use crate::render::RenderCtx;

/// Texel format of every uploaded texture. Bytes are sRGB encoded.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// An uploaded texture together with the bind group that samples it.
///
/// Clones share the upload; two handles name the same texture only when they
/// come from the same upload.
#[derive(Clone)]
pub struct SpriteTexture {
    inner: Arc<TextureInner>,
}

struct TextureInner {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

impl SpriteTexture {
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    pub fn height(&self) -> u32 {
        self.inner.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.inner.width as f32, self.inner.height as f32)
    }

    pub fn same(&self, other: &SpriteTexture) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.inner.bind_group
    }
}

/// Bind group layout, sampler and the 1×1 white fallback for one contract's
/// texture stage.
pub(crate) struct TextureBinder {
    desc: &'static ContractDesc,
    layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: SpriteTexture,
}

impl TextureBinder {
    const STAGE: Stage = Stage::Fragment;

    pub(crate) fn new(ctx: &RenderCtx<'_>, desc: &'static ContractDesc) -> Result<Self> {
        anyhow::ensure!(
            !desc.resources(Self::STAGE).is_empty(),
            "{}: the fragment stage samples no textures",
            desc.variant
        );
        let layout = create_bind_group_layout(ctx.device, desc, Self::STAGE);
        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("voxelotl sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });
        let white = upload(ctx, desc, &layout, &sampler, 1, 1, &[0xFF; 4])?;
        Ok(Self { desc, layout, sampler, white })
    }

    /// Uploads tightly packed RGBA8 rows, top row first.
    pub(crate) fn upload(&self, ctx: &RenderCtx<'_>, width: u32, height: u32, rgba: &[u8]) -> Result<SpriteTexture> {
        upload(ctx, self.desc, &self.layout, &self.sampler, width, height, rgba)
    }

    pub(crate) fn white(&self) -> &SpriteTexture {
        &self.white
    }
}

fn upload(
    ctx: &RenderCtx<'_>,
    desc: &ContractDesc,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> Result<SpriteTexture> {
    anyhow::ensure!(width > 0 && height > 0, "texture is empty ({width}x{height})");
    let expected = width as usize * height as usize * 4;
    anyhow::ensure!(
        rgba.len() == expected,
        "{width}x{height} RGBA8 texture needs {expected} bytes, got {}",
        rgba.len()
    );

    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("voxelotl sprite texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    ctx.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * 4),
            rows_per_image: Some(height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let entries: Vec<wgpu::BindGroupEntry<'_>> = desc
        .resources(Stage::Fragment)
        .iter()
        .map(|resource| wgpu::BindGroupEntry {
            binding: resource.index,
            resource: match resource.kind {
                ResourceKind::Texture2D => wgpu::BindingResource::TextureView(&view),
                ResourceKind::Sampler => wgpu::BindingResource::Sampler(sampler),
            },
        })
        .collect();
    let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("voxelotl sprite texture bind group"),
        layout,
        entries: &entries,
    });

    Ok(SpriteTexture {
        inner: Arc::new(TextureInner { _texture: texture, bind_group, width, height }),
    })
}
