//! Device enumeration surface consumed from the tracking runtime.

use glam::{Quat, Vec3};
use raypoint_core::{DeviceIndex, Pose};
use serde::{Deserialize, Serialize};

/// Upper bound on tracked device slots, matching common VR runtimes.
pub const MAX_TRACKED_DEVICES: u32 = 64;

/// Hardware class of a tracked device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    /// Slot is empty.
    #[default]
    Invalid,
    /// Head-mounted display.
    Hmd,
    /// Hand-held controller.
    Controller,
    /// Generic tracker puck.
    GenericTracker,
    /// Lighthouse or camera base station.
    TrackingReference,
}

/// Hand assignment of a controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerRole {
    /// Not assigned (controller is off or not yet identified).
    #[default]
    Invalid,
    /// Held in the left hand.
    LeftHand,
    /// Held in the right hand.
    RightHand,
}

/// Read-only view of the tracking runtime for one frame.
pub trait DeviceTracker {
    /// Number of device slots currently exposed, including the headset slot.
    fn device_count(&self) -> u32;

    /// Class of the device in `index`. Empty slots report [`DeviceClass::Invalid`].
    fn device_class(&self, index: DeviceIndex) -> DeviceClass;

    /// Role of the controller in `index`. Non-controllers report [`ControllerRole::Invalid`].
    fn controller_role(&self, index: DeviceIndex) -> ControllerRole;

    /// Pose in tracking (physical) space, or `None` when the pose is not valid this frame.
    fn tracking_pose(&self, index: DeviceIndex) -> Option<Pose>;
}

/// Mapping from the runtime's physical tracking space into world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSpace {
    /// World units per physical meter.
    pub physical_scale: f32,
    /// World-space position of the physical origin.
    pub physical_translation: Vec3,
    /// Rotation from physical axes to world axes.
    pub physical_rotation: Quat,
}

impl Default for TrackingSpace {
    fn default() -> Self {
        Self {
            physical_scale: 1.0,
            physical_translation: Vec3::ZERO,
            physical_rotation: Quat::IDENTITY,
        }
    }
}

impl TrackingSpace {
    /// Convert a tracking-space pose into world coordinates.
    pub fn to_world(&self, pose: &Pose) -> Pose {
        let rotation = self.physical_rotation.normalize();
        Pose {
            position: rotation * (pose.position * self.physical_scale) + self.physical_translation,
            orientation: (rotation * pose.orientation).normalize(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn default_space_is_identity() {
        let pose = Pose::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_x(0.3));
        let world = TrackingSpace::default().to_world(&pose);
        assert!((world.position - pose.position).length() < 1e-6);
        assert!(world.orientation.abs_diff_eq(pose.orientation, 1e-6));
    }

    #[test]
    fn scale_rotation_and_translation_apply_in_order() {
        let space = TrackingSpace {
            physical_scale: 2.0,
            physical_translation: Vec3::new(0.0, 10.0, 0.0),
            physical_rotation: Quat::from_rotation_y(FRAC_PI_2),
        };
        let world = space.to_world(&Pose::at(Vec3::new(0.0, 0.0, -1.0)));
        // (0,0,-2) rotated a quarter turn about +Y is (-2,0,0).
        assert!((world.position - Vec3::new(-2.0, 10.0, 0.0)).length() < 1e-5);
        assert!((world.forward() - Vec3::NEG_X).length() < 1e-5);
    }
}
