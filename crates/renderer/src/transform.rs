//! Per-frame transform math.
//!
//! The model matrix is a Z rotation driven by elapsed seconds; the projection
//! is a GL-convention orthographic volume whose horizontal extent follows the
//! drawable's aspect ratio. Both are rebuilt from scratch every frame.

use glam::Mat4;

/// Orthographic projection spanning `[-ratio, ratio]` horizontally and
/// `[-1, 1]` vertically, with the GL `near = 1`, `far = -1` depth convention
/// of the classic triangle demo.
pub fn projection(ratio: f32) -> Mat4 {
    Mat4::orthographic_rh_gl(-ratio, ratio, -1.0, 1.0, 1.0, -1.0)
}

/// Composes the full model-view-projection matrix for one frame.
///
/// The rotation is applied first, then the projection, matching right-to-left
/// matrix application: `MVP = P * RotateZ(seconds)`.
pub fn model_view_projection(ratio: f32, seconds: f32) -> Mat4 {
    let model = Mat4::from_rotation_z(seconds);
    projection(ratio) * model
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    const EPSILON: f32 = 1e-6;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for (lhs, rhs) in a
            .to_cols_array()
            .iter()
            .zip(b.to_cols_array().iter())
        {
            assert!((lhs - rhs).abs() < EPSILON, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn rotation_at_time_zero_is_identity() {
        assert_mat_eq(Mat4::from_rotation_z(0.0), Mat4::IDENTITY);
    }

    #[test]
    fn square_drawable_at_time_zero_reduces_to_projection() {
        assert_mat_eq(model_view_projection(1.0, 0.0), projection(1.0));
    }

    #[test]
    fn projection_bounds_follow_aspect_ratio() {
        let ratio = 640.0_f32 / 480.0_f32;
        let p = projection(ratio);
        // The horizontal extremes of the volume land on clip-space x = -1/+1.
        let left = p * Vec4::new(-ratio, 0.0, 0.0, 1.0);
        let right = p * Vec4::new(ratio, 0.0, 0.0, 1.0);
        assert!((left.x + 1.0).abs() < EPSILON);
        assert!((right.x - 1.0).abs() < EPSILON);
        // Vertical bounds stay at -1/+1 regardless of ratio.
        let top = p * Vec4::new(0.0, 1.0, 0.0, 1.0);
        assert!((top.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn rotation_spins_counter_clockwise() {
        let mvp = model_view_projection(1.0, std::f32::consts::FRAC_PI_2);
        let rotated = mvp.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((rotated.x).abs() < EPSILON);
        assert!((rotated.y - 1.0).abs() < EPSILON);
    }

    #[test]
    fn aspect_ratio_is_plain_float_division() {
        let ratio = 640.0_f32 / 480.0_f32;
        assert!((ratio - 1.333_333_3).abs() < 1e-6);
    }
}
