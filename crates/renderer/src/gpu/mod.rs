//! GPU orchestration for the triangle demo.
//!
//! - `context` owns wgpu instance/device/surface wiring and reconfigures the
//!   swapchain when the window resizes.
//! - `pipeline` loads both GLSL stages from disk and links them into the one
//!   render pipeline the program ever uses.
//! - `uniforms` holds the static vertex data and the transform uniform block.
//! - `state` glues everything together and exposes the `GpuState` API used by
//!   `window`.

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
