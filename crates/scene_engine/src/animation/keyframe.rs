//! Keyframes and the pose they carry

use serde::{Serialize, Deserialize};

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Translation, Euler rotation (radians) and scale of a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Translation `(x, y, z)`
    pub translation: Vec3,
    /// Rotation angles about X, Y and Z in radians
    pub rotation: Vec3,
    /// Scale factors `(sx, sy, sz)`
    pub scale: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Pose {
    /// Create a pose
    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self { translation, rotation, scale }
    }

    /// Component-wise linear interpolation of all nine pose values
    pub fn interpolate(from: &Self, to: &Self, percentage: f32) -> Self {
        let lerp = |a: &Vec3, b: &Vec3| a.zip_map(b, |a, b| utils::lerp(a, b, percentage));
        Self {
            translation: lerp(&from.translation, &to.translation),
            rotation: lerp(&from.rotation, &to.rotation),
            scale: lerp(&from.scale, &to.scale),
        }
    }

    /// Build the pose matrix as translate · rotX · rotY · rotZ · scale
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.translation)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale)
    }
}

/// Immutable timestamped pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyFrame {
    instant_ms: f64,
    pose: Pose,
}

impl KeyFrame {
    /// Create a keyframe at an instant given in milliseconds
    pub fn from_millis(instant_ms: f64, pose: Pose) -> Self {
        Self { instant_ms, pose }
    }

    /// Create a keyframe at an authoring instant given in seconds
    pub fn from_seconds(instant_s: f64, pose: Pose) -> Self {
        Self::from_millis(instant_s * 1000.0, pose)
    }

    /// Instant of this keyframe, relative to the start of its animation
    pub fn instant_ms(&self) -> f64 {
        self.instant_ms
    }

    /// Pose at this instant
    pub fn pose(&self) -> &Pose {
        &self.pose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Point3, constants::PI};
    use approx::assert_relative_eq;

    #[test]
    fn test_seconds_are_converted_to_millis() {
        let keyframe = KeyFrame::from_seconds(2.5, Pose::default());
        assert_relative_eq!(keyframe.instant_ms(), 2500.0);
    }

    #[test]
    fn test_pose_matrix_scales_before_rotating_and_translating() {
        let pose = Pose::new(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, PI * 0.5),
            Vec3::new(2.0, 2.0, 2.0),
        );
        let point = pose.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        // scaled to (2,0,0), rotated to (0,2,0), translated to (10,2,0)
        assert_relative_eq!(point, Point3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_default_pose_is_identity() {
        assert_relative_eq!(Pose::default().to_matrix(), Mat4::identity());
    }
}
