//! Device poses and the rays derived from them.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation of a tracked device or prop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Pose at the origin with no rotation.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Create a pose from its parts.
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Pose at `position` with identity orientation.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }

    /// Forward axis. Controllers point down their local -Z.
    pub fn forward(&self) -> Vec3 {
        (self.orientation * Vec3::NEG_Z).normalize_or_zero()
    }

    /// Ray starting at this pose and pointing along [`Pose::forward`].
    pub fn ray(&self) -> Ray {
        Ray::new(self.position, self.orientation)
    }

    /// Whether every component is finite and the orientation is usable.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.orientation.is_finite() && self.orientation.length_squared() > 1e-12
    }
}

/// A pointer ray: origin plus orientation, direction implied by the orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point in world space.
    pub origin: Vec3,
    /// Orientation whose forward axis is the ray direction.
    pub orientation: Quat,
}

impl Ray {
    /// Create a ray from origin and orientation.
    pub fn new(origin: Vec3, orientation: Quat) -> Self {
        Self {
            origin,
            orientation: orientation.normalize(),
        }
    }

    /// Unit direction of travel.
    pub fn direction(&self) -> Vec3 {
        (self.orientation * Vec3::NEG_Z).normalize_or_zero()
    }

    /// Point at distance `t` along the ray.
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction() * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn identity_points_down_negative_z() {
        let ray = Pose::IDENTITY.ray();
        assert!((ray.direction() - Vec3::NEG_Z).length() < 1e-6);
        assert!((ray.at(5.0) - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-6);
    }

    #[test]
    fn yaw_turns_the_forward_axis() {
        // Quarter turn about +Y takes -Z to -X.
        let pose = Pose::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        assert!((pose.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn degenerate_orientation_is_not_finite() {
        let pose = Pose::new(Vec3::ZERO, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert!(!pose.is_finite());
        assert!(Pose::at(Vec3::ONE).is_finite());
    }
}
