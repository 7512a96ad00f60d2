//! In-memory tracker used by tests and the headless driver.

use crate::device::{ControllerRole, DeviceClass, DeviceTracker, MAX_TRACKED_DEVICES};
use crate::TrackingError;
use raypoint_core::{DeviceIndex, Pose};
use serde::{Deserialize, Serialize};

/// One slot of a [`MockTracker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MockDevice {
    /// Hardware class.
    pub class: DeviceClass,
    /// Controller role.
    #[serde(default)]
    pub role: ControllerRole,
    /// Tracking-space pose, `None` when tracking is lost.
    #[serde(default)]
    pub pose: Option<Pose>,
}

/// Scriptable [`DeviceTracker`]. Slot 0 always holds the headset.
#[derive(Debug, Clone)]
pub struct MockTracker {
    devices: Vec<MockDevice>,
}

impl Default for MockTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTracker {
    /// Tracker with only a headset at the origin.
    pub fn new() -> Self {
        Self {
            devices: vec![MockDevice {
                class: DeviceClass::Hmd,
                role: ControllerRole::Invalid,
                pose: Some(Pose::IDENTITY),
            }],
        }
    }

    /// Append a device and return its slot.
    pub fn add_device(
        &mut self,
        class: DeviceClass,
        role: ControllerRole,
        pose: Option<Pose>,
    ) -> Result<DeviceIndex, TrackingError> {
        let len = self.devices.len() as u32;
        if len >= MAX_TRACKED_DEVICES {
            return Err(TrackingError::TrackerFull {
                max: MAX_TRACKED_DEVICES,
            });
        }
        self.devices.push(MockDevice { class, role, pose });
        Ok(DeviceIndex(len))
    }

    /// Append a controller and return its slot.
    pub fn add_controller(
        &mut self,
        role: ControllerRole,
        pose: Option<Pose>,
    ) -> Result<DeviceIndex, TrackingError> {
        self.add_device(DeviceClass::Controller, role, pose)
    }

    /// Replace the tracking pose of `index`.
    pub fn set_pose(&mut self, index: DeviceIndex, pose: Option<Pose>) -> Result<(), TrackingError> {
        self.slot_mut(index)?.pose = pose;
        Ok(())
    }

    /// Reassign the role of `index`.
    pub fn set_role(&mut self, index: DeviceIndex, role: ControllerRole) -> Result<(), TrackingError> {
        self.slot_mut(index)?.role = role;
        Ok(())
    }

    /// Slot contents, if the slot exists.
    pub fn device(&self, index: DeviceIndex) -> Option<&MockDevice> {
        self.devices.get(index.get() as usize)
    }

    fn slot_mut(&mut self, index: DeviceIndex) -> Result<&mut MockDevice, TrackingError> {
        let count = self.devices.len() as u32;
        self.devices
            .get_mut(index.get() as usize)
            .ok_or(TrackingError::DeviceOutOfRange { index, count })
    }
}

impl DeviceTracker for MockTracker {
    fn device_count(&self) -> u32 {
        self.devices.len() as u32
    }

    fn device_class(&self, index: DeviceIndex) -> DeviceClass {
        self.device(index).map(|d| d.class).unwrap_or_default()
    }

    fn controller_role(&self, index: DeviceIndex) -> ControllerRole {
        match self.device(index) {
            Some(device) if device.class == DeviceClass::Controller => device.role,
            _ => ControllerRole::Invalid,
        }
    }

    fn tracking_pose(&self, index: DeviceIndex) -> Option<Pose> {
        self.device(index)
            .and_then(|d| d.pose)
            .filter(Pose::is_finite)
    }
}
