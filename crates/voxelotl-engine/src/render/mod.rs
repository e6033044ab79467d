//! wgpu side of the contracts.
//!
//! Vertex buffer layouts, bind group layouts and shader headers are all
//! derived from a variant's [`ContractDesc`](voxelotl_layout::ContractDesc);
//! renderers bind every buffer through the variant's slot constants.
//!
//! Convention:
//! - group 0 holds vertex-stage uniforms, group 1 fragment-stage uniforms or
//!   the fragment stage's texture and sampler
//! - binding number and vertex buffer index are the slot index
//! - uniform slots are bound with dynamic offsets into per-frame rings

mod ctx;
mod model;
mod sprite;
mod texture;

pub mod blend;
pub mod layout;
pub mod pipeline;

pub use blend::{BlendMode, CullFace};
pub use ctx::{RenderCtx, RenderTarget};
pub use layout::{ContractBindings, VertexBuffers};
pub use model::{GpuMesh, ModelRenderer};
pub use pipeline::{create_pipeline, shader_source, ContractPipeline, PipelineCache, PipelineOptions};
pub use sprite::{SpriteRenderer, MAX_QUADS};
pub use texture::{SpriteTexture, TEXTURE_FORMAT};
