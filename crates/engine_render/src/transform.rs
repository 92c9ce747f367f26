//! Spatial transform component.
//!
//! [`Transform3D`] carries the position, rotation and scale the renderer
//! builds each mesh's model matrix from.

use engine_component::Component;
use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position, rotation and per-axis scale of an entity in world space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform3D {
    /// World-space position.
    pub position: Vec3,
    /// Rotation as a unit quaternion.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Transform3D {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform from all three parts.
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Create a transform at `position` with no rotation and unit scale.
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Create a transform from a position, Euler angles in degrees (applied
    /// X, then Y, then Z) and a scale.
    #[must_use]
    pub fn from_euler_degrees(position: Vec3, degrees: Vec3, scale: Vec3) -> Self {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            degrees.x.to_radians(),
            degrees.y.to_radians(),
            degrees.z.to_radians(),
        );
        Self::new(position, rotation, scale)
    }

    /// The model matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Move by `offset` in world space.
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Apply `rotation` on top of the current rotation.
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = (rotation * self.rotation).normalize();
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Component for Transform3D {
    fn type_name() -> &'static str {
        "Transform3D"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let t = Transform3D::default();
        assert_eq!(t, Transform3D::IDENTITY);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_translate() {
        let mut t = Transform3D::from_position(Vec3::new(1.0, 2.0, 3.0));
        t.translate(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(t.position, Vec3::new(1.0, 3.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_euler_degrees_quarter_turn() {
        let t = Transform3D::from_euler_degrees(Vec3::ZERO, Vec3::new(0.0, 90.0, 0.0), Vec3::ONE);
        let forward = t.rotation * Vec3::Z;
        assert!(forward.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_matrix_applies_translation_and_scale() {
        let t = Transform3D::new(Vec3::new(5.0, 0.0, 0.0), Quat::IDENTITY, Vec3::splat(2.0));
        let p = t.to_matrix().transform_point3(Vec3::ONE);
        assert!(p.abs_diff_eq(Vec3::new(7.0, 2.0, 2.0), 1e-6));
    }
}
