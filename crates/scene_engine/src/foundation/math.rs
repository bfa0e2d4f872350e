//! Math utilities and types
//!
//! Provides the matrix and vector types used by node transforms, keyframe
//! poses and the pipeline transform stack.

pub use nalgebra::{Vector3, Vector4, Matrix4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Coordinate axis used by single-axis rotations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// X axis
    X,
    /// Y axis
    Y,
    /// Z axis
    Z,
}

impl Axis {
    /// Unit vector along this axis
    pub fn unit(self) -> nalgebra::Unit<Vec3> {
        match self {
            Self::X => Vec3::x_axis(),
            Self::Y => Vec3::y_axis(),
            Self::Z => Vec3::z_axis(),
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation. `t` is not clamped.
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }
}

/// Extension trait for Mat4 with the elementary transforms scene nodes use
pub trait Mat4Ext {
    /// Create a rotation matrix around the X axis
    fn rotation_x(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Y axis
    fn rotation_y(angle: f32) -> Mat4;

    /// Create a rotation matrix around the Z axis
    fn rotation_z(angle: f32) -> Mat4;

    /// Create a rotation matrix around a coordinate axis
    fn rotation_about(axis: Axis, angle: f32) -> Mat4;

    /// Create a translation matrix
    fn translation(offset: Vec3) -> Mat4;

    /// Create a non-uniform scaling matrix
    fn scaling(factors: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn rotation_x(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::x_axis(), angle)
    }

    fn rotation_y(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::y_axis(), angle)
    }

    fn rotation_z(angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn rotation_about(axis: Axis, angle: f32) -> Mat4 {
        Mat4::from_axis_angle(&axis.unit(), angle)
    }

    fn translation(offset: Vec3) -> Mat4 {
        Mat4::new_translation(&offset)
    }

    fn scaling(factors: Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(&factors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_rotation_about_matches_axis_helpers() {
        let angle = 0.7;
        assert_relative_eq!(Mat4::rotation_about(Axis::X, angle), Mat4::rotation_x(angle), epsilon = EPSILON);
        assert_relative_eq!(Mat4::rotation_about(Axis::Y, angle), Mat4::rotation_y(angle), epsilon = EPSILON);
        assert_relative_eq!(Mat4::rotation_about(Axis::Z, angle), Mat4::rotation_z(angle), epsilon = EPSILON);
    }

    #[test]
    fn test_translate_then_rotate_order() {
        // T * R applied to a point: rotate first, then translate
        let matrix = Mat4::translation(Vec3::new(1.0, 0.0, 0.0))
            * Mat4::rotation_z(constants::PI * 0.5);
        let point = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point, Point3::new(1.0, 1.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_relative_eq!(utils::lerp(2.0, 6.0, 0.0), 2.0);
        assert_relative_eq!(utils::lerp(2.0, 6.0, 1.0), 6.0);
        assert_relative_eq!(utils::lerp(2.0, 6.0, 0.25), 3.0);
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = EPSILON);
    }
}
