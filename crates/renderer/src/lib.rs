//! Renderer crate for spintri.
//!
//! The crate glues a winit window, a `wgpu` device, and a two-stage GLSL
//! program into the classic spinning-triangle demo. The overall flow is:
//!
//! ```text
//!   spintri (bin)
//!        │ RendererConfig
//!        ▼
//!   Renderer::run ──▶ winit event loop ──▶ GpuState::render()
//!                                             │
//!                                             └─▶ MVP upload ─▶ draw(0..3)
//! ```
//!
//! `GpuState` owns every GPU resource (surface, device, pipeline, buffers);
//! `Renderer` is the thin entry point the binary hands its configuration to.
//! Both shader stages are read from disk and compiled at startup; any compile
//! or link failure aborts before the first frame.

mod gpu;
pub mod timing;
pub mod transform;
mod types;
mod window;

pub use types::{RendererConfig, ShaderError, ShaderStage, MAX_DIAGNOSTIC_LEN};

use anyhow::Result;

/// Thin entry point over the windowed render loop.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and runs until it is closed. Every fatal setup error
    /// (no adapter, shader compile, program link) propagates out of here
    /// before the first frame is drawn.
    pub fn run(self) -> Result<()> {
        window::run_windowed(self.config)
    }
}
