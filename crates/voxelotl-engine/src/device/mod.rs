//! GPU device management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - offscreen color/depth targets for headless rendering, with readback

mod gpu;
mod target;

pub use gpu::{Gpu, GpuInit};
pub use target::{ColorReadback, OffscreenTarget};
