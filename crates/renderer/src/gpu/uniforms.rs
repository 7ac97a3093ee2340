use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// One corner of the triangle: 2D position followed by an RGB color.
///
/// The layout is fixed by the vertex buffer description in `pipeline`: 20-byte
/// stride, color at byte offset 8.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

/// The static triangle, uploaded once at startup and never mutated.
pub const TRIANGLE_VERTICES: [Vertex; 3] = [
    Vertex {
        position: [-0.6, -0.4],
        color: [1.0, 0.0, 0.0],
    },
    Vertex {
        position: [0.6, -0.4],
        color: [0.0, 1.0, 0.0],
    },
    Vertex {
        position: [0.0, 0.6],
        color: [0.0, 0.0, 1.0],
    },
];

/// Uniform block mirrored by the `Transform` block in `vertex.glsl`.
///
/// std140 layout: a single column-major mat4, no padding required.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct TransformUniforms {
    mvp: [[f32; 4]; 4],
}

impl TransformUniforms {
    pub fn new() -> Self {
        Self::from_matrix(Mat4::IDENTITY)
    }

    pub fn from_matrix(mvp: Mat4) -> Self {
        Self {
            mvp: mvp.to_cols_array_2d(),
        }
    }

    pub fn set_matrix(&mut self, mvp: Mat4) {
        self.mvp = mvp.to_cols_array_2d();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem;

    #[test]
    fn vertex_layout_matches_attribute_offsets() {
        assert_eq!(mem::size_of::<Vertex>(), 20);
        assert_eq!(mem::offset_of!(Vertex, position), 0);
        assert_eq!(mem::offset_of!(Vertex, color), 8);
    }

    #[test]
    fn triangle_constants_are_the_reference_values() {
        assert_eq!(TRIANGLE_VERTICES[0].position, [-0.6, -0.4]);
        assert_eq!(TRIANGLE_VERTICES[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(TRIANGLE_VERTICES[1].position, [0.6, -0.4]);
        assert_eq!(TRIANGLE_VERTICES[1].color, [0.0, 1.0, 0.0]);
        assert_eq!(TRIANGLE_VERTICES[2].position, [0.0, 0.6]);
        assert_eq!(TRIANGLE_VERTICES[2].color, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn uniform_block_is_a_bare_column_major_mat4() {
        assert_eq!(mem::size_of::<TransformUniforms>(), 64);
        let uniforms = TransformUniforms::from_matrix(Mat4::IDENTITY);
        let identity = Mat4::IDENTITY.to_cols_array();
        assert_eq!(bytemuck::bytes_of(&uniforms), bytemuck::bytes_of(&identity));
    }
}
