use std::time::{Duration, Instant};

use tracing::debug;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::timing::TimeSample;
use crate::transform::model_view_projection;
use crate::types::{RendererConfig, ShaderError};

use super::context::GpuContext;
use super::pipeline::TrianglePipeline;
use super::uniforms::{TransformUniforms, TRIANGLE_VERTICES};

/// Owns every GPU resource for the window's lifetime: surface, device, the
/// linked program, the static vertex buffer, and the transform uniform.
/// Everything is released exactly once when the value drops.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: TrianglePipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: TransformUniforms,
    last_fps_update: Instant,
    frames_since_last_update: u32,
}

impl GpuState {
    /// Brings up the device and builds the whole static scene. Any failure
    /// here is fatal and happens before the render loop starts.
    pub(crate) fn new<T>(
        target: &T,
        size: PhysicalSize<u32>,
        config: &RendererConfig,
    ) -> anyhow::Result<Self>
    where
        T: raw_window_handle::HasDisplayHandle + raw_window_handle::HasWindowHandle,
    {
        let context = GpuContext::new(target, size)?;

        let pipeline = TrianglePipeline::new(
            &context.device,
            context.surface_format,
            &config.vertex_shader,
            &config.fragment_shader,
        )
        .map_err(report_shader_error)?;

        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("triangle vertices"),
                contents: bytemuck::cast_slice(&TRIANGLE_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let uniforms = TransformUniforms::new();
        let uniform_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("transform uniform"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("transform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        Ok(Self {
            context,
            pipeline,
            vertex_buffer,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            last_fps_update: Instant::now(),
            frames_since_last_update: 0,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    /// Renders one frame: full-drawable viewport, clear, recomputed MVP
    /// upload, one three-vertex draw, then present.
    pub(crate) fn render(&mut self, time: TimeSample) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;

        let width = self.context.config.width;
        let height = self.context.config.height;
        let ratio = width as f32 / height as f32;

        self.uniforms
            .set_matrix(model_view_projection(ratio, time.seconds));
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.uniforms),
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("render encoder"),
                });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("triangle pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.draw(0..3, 0..1);
        }

        self.context.queue.submit(Some(encoder.finish()));
        frame.present();

        self.frames_since_last_update += 1;
        let elapsed = self.last_fps_update.elapsed();
        if elapsed >= Duration::from_secs(1) {
            debug!(
                fps = (self.frames_since_last_update as f32 / elapsed.as_secs_f32()).round(),
                frame = time.frame_index,
                time = time.seconds,
                "render stats"
            );
            self.frames_since_last_update = 0;
            self.last_fps_update = Instant::now();
        }

        Ok(())
    }
}

fn report_shader_error(err: ShaderError) -> anyhow::Error {
    tracing::error!(error = %err, "shader program construction failed");
    anyhow::Error::new(err)
}
