//! Voxelotl engine crate.
//!
//! Host side of the CPU/GPU layout contracts defined in `voxelotl-layout`:
//!
//! | module    | contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | `logging` | `env_logger` setup                                         |
//! | `device`  | headless wgpu device, offscreen targets and readback       |
//! | `pack`    | domain values to contract records, one module per variant  |
//! | `render`  | pipelines, bind groups and renderers built from contracts  |

pub mod device;
pub mod logging;
pub mod pack;
pub mod render;

pub use voxelotl_layout as layout;
