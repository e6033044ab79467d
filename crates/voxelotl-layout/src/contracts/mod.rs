//! Published contract variants, one module each.
//!
//! Layout names repeat across modules (`ShaderVertex`, `VertexShaderUniforms`)
//! but the types are distinct; a buffer packed for one module's struct never
//! type-checks against another's.

pub mod debug_solid;
pub mod directional_f16;
pub mod phong_f32;
pub mod phong_u8;
pub mod ui2d;

pub use debug_solid::DebugSolid;
pub use directional_f16::DirectionalF16;
pub use phong_f32::PhongF32;
pub use phong_u8::PhongU8;
pub use ui2d::Ui2d;
