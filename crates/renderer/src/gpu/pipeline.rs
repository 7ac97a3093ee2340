//! Shader program construction.
//!
//! Each stage is loaded from disk and handed to `wgpu` as GLSL inside a
//! validation error scope, so a broken shader surfaces as a typed
//! [`ShaderError`] instead of an uncaptured device error. Pipeline creation
//! plays the role of the link step and is scoped the same way.

use std::borrow::Cow;
use std::mem;
use std::path::Path;

use wgpu::naga;

use crate::types::{truncate_diagnostic, ShaderError, ShaderStage};

use super::uniforms::Vertex;

/// Reads a stage's full source text. Read failures are fatal at the call
/// site, like every other shader-builder error.
fn load_shader_source(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| ShaderError::Read {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and compiles one shader stage from `path`.
///
/// A compile failure carries the stage, the file name, and the backend
/// diagnostic truncated to [`crate::MAX_DIAGNOSTIC_LEN`] bytes.
pub(crate) fn install_shader(
    device: &wgpu::Device,
    stage: ShaderStage,
    path: &Path,
) -> Result<wgpu::ShaderModule, ShaderError> {
    let source = load_shader_source(stage, path)?;
    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(match stage {
            ShaderStage::Vertex => "triangle vertex stage",
            ShaderStage::Fragment => "triangle fragment stage",
        }),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source),
            stage: naga_stage,
            defines: &[],
        },
    });
    if let Some(err) = pollster::block_on(device.pop_error_scope()) {
        return Err(ShaderError::Compile {
            stage,
            path: path.to_path_buf(),
            log: truncate_diagnostic(&err.to_string()),
        });
    }

    tracing::debug!(%stage, path = %path.display(), "shader stage compiled");
    Ok(module)
}

/// The linked program plus the layouts the render loop binds against.
pub(crate) struct TrianglePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl TrianglePipeline {
    /// Builds and links the two-stage program.
    ///
    /// The vertex buffer is described with the fixed triangle layout:
    /// 20-byte stride, position as two floats at offset 0, color as three
    /// floats at offset 8.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self, ShaderError> {
        let vertex_module = install_shader(device, ShaderStage::Vertex, vertex_path)?;
        let fragment_module = install_shader(device, ShaderStage::Fragment, fragment_path)?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("transform uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("triangle pipeline layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let vertex_buffers = [wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 8,
                    shader_location: 1,
                },
            ],
        }];

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("triangle pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &vertex_buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(ShaderError::Link {
                log: truncate_diagnostic(&err.to_string()),
            });
        }

        Ok(Self {
            pipeline,
            uniform_layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loading_reads_the_full_source_text() {
        let mut file = tempfile::NamedTempFile::new().expect("temp shader");
        let source = "#version 450\nvoid main() {}\n";
        file.write_all(source.as_bytes()).expect("write shader");

        let loaded = load_shader_source(ShaderStage::Vertex, file.path()).expect("load");
        assert_eq!(loaded, source);
    }

    #[test]
    fn missing_file_yields_a_read_error_naming_the_path() {
        let err = load_shader_source(ShaderStage::Fragment, Path::new("no-such.glsl"))
            .expect_err("read must fail");
        match &err {
            ShaderError::Read { stage, path, .. } => {
                assert_eq!(*stage, ShaderStage::Fragment);
                assert_eq!(path, Path::new("no-such.glsl"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("no-such.glsl"));
    }
}
