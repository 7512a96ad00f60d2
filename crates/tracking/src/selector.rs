//! Chooses which controller drives the pointer ray.

use crate::device::{ControllerRole, DeviceClass, DeviceTracker, MAX_TRACKED_DEVICES};
use crate::model::DeviceModels;
use raypoint_core::DeviceIndex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the pointer device is chosen when several controllers are tracked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectorPolicy {
    /// The right-hand controller drives the ray; left-hand rays are hidden.
    #[default]
    RolePriority,
    /// The first controller with an assigned role drives the ray.
    FirstValidRole,
}

impl SelectorPolicy {
    /// Every policy, in declaration order.
    pub const ALL: [SelectorPolicy; 2] = [Self::RolePriority, Self::FirstValidRole];

    /// Stable name used by config files and the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::RolePriority => "role-priority",
            Self::FirstValidRole => "first-valid-role",
        }
    }

    /// Look a policy up by [`SelectorPolicy::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|policy| policy.name() == name.trim())
    }
}

impl fmt::Display for SelectorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ray visibility change requested for one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RayVisibility {
    /// Device whose model is updated.
    pub device: DeviceIndex,
    /// New "show ray" flag.
    pub show: bool,
}

/// Outcome of one selection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceSelection {
    /// Device that drives the pointer, `None` when no controller qualifies.
    pub active: Option<DeviceIndex>,
    /// Visibility updates to apply to the device models, in slot order.
    pub visibility: Vec<RayVisibility>,
}

impl DeviceSelection {
    /// Write the requested visibility flags into `models`.
    pub fn apply(&self, models: &mut DeviceModels) {
        for change in &self.visibility {
            models.model_mut(change.device).set_show_ray(change.show);
        }
    }
}

/// Select the pointer device under `policy`.
///
/// The headset slot is never considered. `show_ray` is the flag given to the
/// selected device's model.
pub fn select_device<T>(tracker: &T, policy: SelectorPolicy, show_ray: bool) -> DeviceSelection
where
    T: DeviceTracker + ?Sized,
{
    let count = tracker.device_count().min(MAX_TRACKED_DEVICES);
    let controllers = (DeviceIndex::HMD.get() + 1..count)
        .map(DeviceIndex)
        .filter(|index| tracker.device_class(*index) == DeviceClass::Controller);

    let mut selection = DeviceSelection::default();
    match policy {
        SelectorPolicy::RolePriority => {
            for index in controllers {
                match tracker.controller_role(index) {
                    ControllerRole::RightHand => {
                        selection.visibility.push(RayVisibility {
                            device: index,
                            show: show_ray,
                        });
                        selection.active = Some(index);
                    }
                    ControllerRole::LeftHand => {
                        selection.visibility.push(RayVisibility {
                            device: index,
                            show: false,
                        });
                    }
                    ControllerRole::Invalid => {}
                }
            }
        }
        SelectorPolicy::FirstValidRole => {
            let mut controllers = controllers;
            if let Some(index) =
                controllers.find(|index| tracker.controller_role(*index) != ControllerRole::Invalid)
            {
                selection.visibility.push(RayVisibility {
                    device: index,
                    show: show_ray,
                });
                selection.active = Some(index);
            }
        }
    }

    if selection.active.is_none() {
        tracing::trace!(%policy, "no pointer controller available");
    }
    selection
}
