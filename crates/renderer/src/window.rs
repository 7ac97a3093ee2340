use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use crate::gpu::GpuState;
use crate::timing::{SystemTimeSource, TimeSource};
use crate::types::RendererConfig;

/// Escape is the designated close key; everything else is ignored.
fn is_exit_key(key: &Key) -> bool {
    matches!(key, Key::Named(NamedKey::Escape))
}

/// Aggregates the window and its GPU state for the lifetime of the loop.
struct WindowState {
    window: Arc<Window>,
    gpu: GpuState,
    time: SystemTimeSource,
}

impl WindowState {
    fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let size = window.inner_size();
        let gpu = GpuState::new(window.as_ref(), size, config)?;
        Ok(Self {
            window,
            gpu,
            time: SystemTimeSource::new(),
        })
    }

    fn window(&self) -> &Window {
        self.window.as_ref()
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.gpu.resize(new_size);
    }

    fn render_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let sample = self.time.sample();
        self.gpu.render(sample)
    }
}

/// Creates the window, builds the GPU state, and drives the render loop
/// until the window is closed.
///
/// The loop has exactly two states, running and closing; the only transition
/// is triggered by an OS close request or the Escape key. Once the loop
/// exits, every GPU resource is released by drop.
pub(crate) fn run_windowed(config: RendererConfig) -> Result<()> {
    let event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;

    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create window: {err}"))?;
    let window = Arc::new(window);

    let mut state = WindowState::new(window, &config)?;
    state.window().request_redraw();

    let run_result = event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { window_id, event } if window_id == state.window().id() => {
            match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    info!("window close requested");
                    elwt.exit();
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed && is_exit_key(&event.logical_key) {
                        info!("escape pressed; closing");
                        elwt.exit();
                    }
                }
                WindowEvent::Resized(new_size) => {
                    state.resize(new_size);
                }
                WindowEvent::RedrawRequested => match state.render_frame() {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        let size = state.gpu.size();
                        state.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("surface out of memory; exiting");
                        elwt.exit();
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        warn!("surface timeout; retrying next frame");
                    }
                    Err(other) => {
                        warn!("surface error: {other:?}; retrying next frame");
                    }
                },
                _ => {}
            }
        }
        Event::AboutToWait => {
            // Continuous animation: keep requesting frames; Fifo present
            // paces us to the display refresh.
            state.window().request_redraw();
            elwt.set_control_flow(ControlFlow::Poll);
        }
        _ => {}
    });

    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_is_the_only_exit_key() {
        assert!(is_exit_key(&Key::Named(NamedKey::Escape)));
        assert!(!is_exit_key(&Key::Named(NamedKey::Enter)));
        assert!(!is_exit_key(&Key::Character("q".into())));
    }
}
