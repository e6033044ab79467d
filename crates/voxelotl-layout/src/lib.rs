//! # voxelotl-layout
//!
//! Memory layout contracts shared by the Voxelotl host renderer and its
//! device programs.
//!
//! ## Modules
//!
//! | Module        | Purpose                                                     |
//! |---------------|-------------------------------------------------------------|
//! | [`primitive`] | Fixed-width numeric types with device size and alignment    |
//! | [`layout`]    | Layout descriptors and the [`Layout`] trait                 |
//! | [`slot`]      | Per-stage binding slots                                     |
//! | [`variant`]   | The closed set of contract variants                         |
//! | [`contracts`] | One module per published variant                            |
//! | [`attribute`] | Vertex attribute locations                                  |
//! | [`wgsl`]      | Shared WGSL header generation                               |
//! | [`check`]     | Byte-length checks for raw buffers                          |
//! | [`error`]     | [`LayoutError`]                                             |
//!
//! ## Example
//!
//! ```
//! use voxelotl_layout::{ContractVariant, Stage, LayoutError};
//!
//! let phong = ContractVariant::PhongF32.desc();
//! // A 16-byte directional-light block is not a Phong fragment block.
//! let err = phong.check_binding(Stage::Fragment, 0, 16).unwrap_err();
//! assert!(matches!(err, LayoutError::SizeMismatch { expected: 96, .. }));
//! ```

#[macro_use]
mod macros;

pub mod attribute;
pub mod check;
pub mod contracts;
pub mod error;
pub mod layout;
pub mod primitive;
pub mod slot;
pub mod variant;
pub mod wgsl;

pub use attribute::{AttributeDesc, VertexBufferDesc};
pub use check::StagedBuffer;
pub use error::LayoutError;
pub use layout::{Field, Layout, LayoutDesc, LayoutKind};
pub use primitive::{F16x4, F32x2, F32x3, F32x4, F32x4x4, Pad, Primitive, PrimitiveKind, U8x4};
pub use slot::{ResourceDesc, ResourceKind, SlotBinding, SlotDesc, Stage};
pub use variant::{ColorEncoding, Contract, ContractDesc, ContractVariant, Instanced, LitFragment, Textured};
