//! Rays and controller-style poses.

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Start point in world space.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalizing `direction`. A zero direction falls back to -Z.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    /// Ray of a pose: origin at its translation, direction along its local -Z.
    ///
    /// Only the rotation part of `pose` turns the direction, so scale and
    /// translation never skew it.
    pub fn from_pose(pose: &Mat4) -> Self {
        let (_scale, rotation, translation) = pose.to_scale_rotation_translation();
        Self::new(translation, rotation * Vec3::NEG_Z)
    }

    /// Point at parameter `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// World pose at `position` whose local -Z points along `direction`.
///
/// Rolls are never introduced: the shortest arc from -Z is used.
pub fn pose_looking_along(position: Vec3, direction: Vec3) -> Mat4 {
    let direction = direction.try_normalize().unwrap_or(Vec3::NEG_Z);
    Mat4::from_rotation_translation(Quat::from_rotation_arc(Vec3::NEG_Z, direction), position)
}
