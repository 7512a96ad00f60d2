#![warn(missing_docs)]
//! Tracked-device plumbing: device enumeration, pointer device selection and
//! the per-device visual state the ray renderer consumes.

mod device;
mod mock;
mod model;
mod selector;

pub use device::{ControllerRole, DeviceClass, DeviceTracker, TrackingSpace, MAX_TRACKED_DEVICES};
pub use mock::{MockDevice, MockTracker};
pub use model::{DeviceModel, DeviceModels};
pub use selector::{select_device, DeviceSelection, RayVisibility, SelectorPolicy};

use raypoint_core::DeviceIndex;
use thiserror::Error;

/// Errors raised when addressing tracked devices.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrackingError {
    /// The slot is beyond what the tracker exposes.
    #[error("{index} is out of range (tracker exposes {count} devices)")]
    DeviceOutOfRange {
        /// Requested slot.
        index: DeviceIndex,
        /// Number of slots the tracker currently exposes.
        count: u32,
    },
    /// No more slots are available.
    #[error("tracker is full ({max} devices)")]
    TrackerFull {
        /// Maximum slot count.
        max: u32,
    },
}
