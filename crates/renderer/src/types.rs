use std::path::PathBuf;

/// Hard cap on the length of a backend diagnostic carried inside a
/// [`ShaderError`]. This is a reporting truncation limit only; shader source
/// files themselves are not size-constrained.
pub const MAX_DIAGNOSTIC_LEN: usize = 1024;

/// The two programmable stages this renderer installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Fatal failures raised while building the shader program.
///
/// Every variant aborts startup before the render loop is entered; nothing is
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader source at {}: {source}", .path.display())]
    Read {
        stage: ShaderStage,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to compile {stage} shader ({}): {log}", .path.display())]
    Compile {
        stage: ShaderStage,
        path: PathBuf,
        log: String,
    },
    #[error("failed to link shader program: {log}")]
    Link { log: String },
}

/// Clamps a backend diagnostic to [`MAX_DIAGNOSTIC_LEN`] bytes, never
/// splitting a UTF-8 code point.
pub(crate) fn truncate_diagnostic(log: &str) -> String {
    let trimmed = log.trim_end();
    if trimmed.len() <= MAX_DIAGNOSTIC_LEN {
        return trimmed.to_owned();
    }
    let mut end = MAX_DIAGNOSTIC_LEN;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_owned()
}

/// Everything the renderer needs to bring up the window and the pipeline.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial drawable size in physical pixels (width, height).
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Path to the vertex stage GLSL source, read once at startup.
    pub vertex_shader: PathBuf,
    /// Path to the fragment stage GLSL source, read once at startup.
    pub fragment_shader: PathBuf,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (640, 480),
            title: "Simple example".to_owned(),
            vertex_shader: PathBuf::from("vertex.glsl"),
            fragment_shader: PathBuf::from("frag.glsl"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_diagnostics_pass_through() {
        assert_eq!(
            truncate_diagnostic("syntax error at line 3\n"),
            "syntax error at line 3"
        );
    }

    #[test]
    fn long_diagnostics_are_capped() {
        let log = "e".repeat(MAX_DIAGNOSTIC_LEN * 2);
        let truncated = truncate_diagnostic(&log);
        assert_eq!(truncated.len(), MAX_DIAGNOSTIC_LEN);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Two-byte characters straddling the cap must not be split.
        let log = "é".repeat(MAX_DIAGNOSTIC_LEN);
        let truncated = truncate_diagnostic(&log);
        assert!(truncated.len() <= MAX_DIAGNOSTIC_LEN);
        assert!(truncated.chars().all(|c| c == 'é'));
    }

    #[test]
    fn compile_error_names_stage_and_file() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            path: PathBuf::from("frag.glsl"),
            log: "unexpected token".to_owned(),
        };
        let message = err.to_string();
        assert!(message.contains("fragment"));
        assert!(message.contains("frag.glsl"));
        assert!(message.contains("unexpected token"));
    }

    #[test]
    fn default_config_matches_reference_layout() {
        let config = RendererConfig::default();
        assert_eq!(config.surface_size, (640, 480));
        assert_eq!(config.vertex_shader, PathBuf::from("vertex.glsl"));
        assert_eq!(config.fragment_shader, PathBuf::from("frag.glsl"));
    }
}
