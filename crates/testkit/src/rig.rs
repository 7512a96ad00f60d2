//! Ready-made scenes for pointer tests.

use glam::Vec3;
use raypoint_core::{DeviceIndex, Pose, PropId};
use raypoint_scene::{FrameReport, Prop, PropTable, RenderLoop, RenderWindow, Viewport};
use raypoint_tracking::{ControllerRole, MockTracker};

/// A window with one full-size renderer, a prop table and a mock tracker
/// holding a headset plus right and left controllers.
///
/// Both controllers start at the origin looking down -z.
pub struct PointerRig {
    /// Render window.
    pub window: RenderWindow,
    /// Scene props.
    pub props: PropTable,
    /// Mock tracking runtime.
    pub tracker: MockTracker,
    /// Right-hand controller slot.
    pub right: DeviceIndex,
    /// Left-hand controller slot.
    pub left: DeviceIndex,
}

impl Default for PointerRig {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerRig {
    /// Build the rig.
    pub fn new() -> Self {
        let mut window = RenderWindow::new(1280, 720);
        window.add_renderer(Viewport::FULL);
        let mut tracker = MockTracker::new();
        // A fresh tracker always has room for two controllers.
        let right = tracker
            .add_controller(ControllerRole::RightHand, Some(Pose::IDENTITY))
            .unwrap_or(DeviceIndex(1));
        let left = tracker
            .add_controller(ControllerRole::LeftHand, Some(Pose::IDENTITY))
            .unwrap_or(DeviceIndex(2));
        Self {
            window,
            props: PropTable::new(),
            tracker,
            right,
            left,
        }
    }

    /// Insert `prop` and make the current renderer display it.
    pub fn add_prop(&mut self, prop: Prop) -> PropId {
        let id = self.props.insert(prop);
        if let Some(renderer) = self.window.current_renderer_mut() {
            renderer.add_view_prop(id);
        }
        id
    }

    /// Add a unit cube named `name` centred at `center`.
    pub fn add_cube(&mut self, name: &str, center: Vec3) -> PropId {
        self.add_prop(Prop::new(name, center))
    }

    /// Move a controller. Unknown slots are ignored.
    pub fn set_pose(&mut self, device: DeviceIndex, pose: Option<Pose>) {
        if let Err(err) = self.tracker.set_pose(device, pose) {
            tracing::warn!(%device, %err, "rig pose update ignored");
        }
    }

    /// Render one frame through `render_loop` with the tracker attached.
    pub fn render(&mut self, render_loop: &mut RenderLoop) -> FrameReport {
        render_loop.render(&mut self.window, &mut self.props, Some(&self.tracker))
    }

    /// Render one frame with the tracking runtime unavailable.
    pub fn render_without_tracker(&mut self, render_loop: &mut RenderLoop) -> FrameReport {
        render_loop.render(&mut self.window, &mut self.props, None)
    }

    /// Published ray length for `device`, if its model exists.
    pub fn ray_length(&self, device: DeviceIndex) -> Option<f32> {
        self.window
            .device_models()
            .get(device)
            .map(|model| model.ray_length)
    }

    /// Whether `device` currently draws its ray.
    pub fn shows_ray(&self, device: DeviceIndex) -> bool {
        self.window.device_models().shows_ray(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rig_has_headset_and_two_controllers() {
        let mut rig = PointerRig::new();
        assert_eq!(rig.right, DeviceIndex(1));
        assert_eq!(rig.left, DeviceIndex(2));
        let cube = rig.add_cube("cube", Vec3::new(0.0, 0.0, -5.0));
        assert!(rig
            .window
            .current_renderer()
            .unwrap()
            .view_props()
            .contains(&cube));
        assert_eq!(rig.ray_length(rig.right), None);
    }
}
