//! Camera with a clipping range, driven by the headset pose.

use glam::{Quat, Vec3};
use raypoint_core::{Aabb, Pose};

/// Smallest allowed ratio between the near and far clipping planes.
const MIN_NEAR_FAR_RATIO: f32 = 1e-4;

/// Camera with position, orientation and clipping range.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Camera orientation. The camera looks down its local -Z.
    pub orientation: Quat,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Get the forward direction vector (where camera is looking).
    pub fn forward(&self) -> Vec3 {
        (self.orientation * Vec3::NEG_Z).normalize()
    }

    /// Snap position and orientation to a headset pose.
    pub fn follow(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.orientation = pose.orientation.normalize();
    }

    /// Near and far clipping distances.
    pub fn clipping_range(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    /// Far clipping distance; the maximum visible depth.
    pub fn far_clip(&self) -> f32 {
        self.far
    }

    /// Set the clipping range. Out-of-order values are swapped and the near
    /// plane is kept strictly positive.
    pub fn set_clipping_range(&mut self, near: f32, far: f32) {
        let (mut near, mut far) = if near <= far { (near, far) } else { (far, near) };
        if !far.is_finite() || far <= 0.0 {
            tracing::warn!(near, far, "rejecting invalid clipping range");
            return;
        }
        let min_near = far * MIN_NEAR_FAR_RATIO;
        if !near.is_finite() || near < min_near {
            near = min_near;
        }
        if far - near < f32::EPSILON {
            far = near + f32::EPSILON.max(near * 1e-3);
        }
        self.near = near;
        self.far = far;
    }

    /// Fit the clipping range around `bounds` as seen from the camera.
    ///
    /// Leaves the range untouched when no bounds are given or everything is
    /// behind the camera.
    pub fn reset_clipping_range(&mut self, bounds: &[Aabb]) {
        let forward = self.forward();
        let mut nearest = f32::INFINITY;
        let mut farthest = f32::NEG_INFINITY;
        for aabb in bounds {
            for corner in corners(aabb) {
                let depth = (corner - self.position).dot(forward);
                nearest = nearest.min(depth);
                farthest = farthest.max(depth);
            }
        }
        if !farthest.is_finite() || farthest <= 0.0 {
            return;
        }
        // Pad so surfaces on the bounds themselves are not clipped.
        let far = farthest * 1.01;
        let near = (nearest * 0.99).max(far * MIN_NEAR_FAR_RATIO);
        self.set_clipping_range(near, far);
    }
}

fn corners(aabb: &Aabb) -> [Vec3; 8] {
    let (a, b) = (aabb.min, aabb.max);
    [
        Vec3::new(a.x, a.y, a.z),
        Vec3::new(b.x, a.y, a.z),
        Vec3::new(a.x, b.y, a.z),
        Vec3::new(b.x, b.y, a.z),
        Vec3::new(a.x, a.y, b.z),
        Vec3::new(b.x, a.y, b.z),
        Vec3::new(a.x, b.y, b.z),
        Vec3::new(b.x, b.y, b.z),
    ]
}
