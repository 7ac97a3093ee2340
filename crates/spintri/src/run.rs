use anyhow::Result;
use renderer::{Renderer, RendererConfig};
use tracing_subscriber::EnvFilter;

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Runs the demo with its fixed configuration: 640x480 window, shader
/// sources at `vertex.glsl` and `frag.glsl` relative to the working
/// directory. There are no CLI arguments.
pub fn run() -> Result<()> {
    let config = RendererConfig::default();
    tracing::debug!(
        vertex = %config.vertex_shader.display(),
        fragment = %config.fragment_shader.display(),
        size = ?config.surface_size,
        "starting spintri"
    );
    Renderer::new(config).run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_configuration_uses_relative_shader_paths() {
        let config = RendererConfig::default();
        assert!(config.vertex_shader.is_relative());
        assert!(config.fragment_shader.is_relative());
        assert_eq!(config.title, "Simple example");
    }
}
