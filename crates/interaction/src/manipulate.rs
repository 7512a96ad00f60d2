//! Direct manipulation of props by a tracked controller.

use raypoint_core::Pose;
use raypoint_scene::Prop;

/// Move `prop` rigidly with a controller that went from `previous` to
/// `current`.
///
/// The prop turns about the controller position by the controller's change
/// in orientation and follows its translation, as if held at arm's length.
pub fn rotate_with_controller(prop: &mut Prop, previous: &Pose, current: &Pose) {
    let delta = (current.orientation * previous.orientation.inverse()).normalize();
    let offset = prop.position - previous.position;
    let position = current.position + delta * offset;
    let orientation = delta * prop.orientation;
    prop.set_pose(Pose::new(position, orientation));
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn still_controller_leaves_prop_alone() {
        let mut prop = Prop::new("box", Vec3::new(0.0, 0.0, -5.0));
        let pose = Pose::at(Vec3::new(0.0, 1.0, 0.0));
        rotate_with_controller(&mut prop, &pose, &pose);
        assert!((prop.position - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-6);
        assert!(prop.orientation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn prop_swings_about_controller() {
        let mut prop = Prop::new("box", Vec3::new(0.0, 0.0, -5.0));
        let previous = Pose::IDENTITY;
        let current = Pose::new(Vec3::ZERO, Quat::from_rotation_y(FRAC_PI_2));
        rotate_with_controller(&mut prop, &previous, &current);

        // A quarter turn about +y carries -z onto -x.
        assert!((prop.position - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-4);
        assert!(prop
            .orientation
            .abs_diff_eq(Quat::from_rotation_y(FRAC_PI_2), 1e-5));
    }

    #[test]
    fn prop_follows_translation() {
        let mut prop = Prop::new("box", Vec3::new(1.0, 0.0, -5.0));
        let previous = Pose::at(Vec3::ZERO);
        let current = Pose::at(Vec3::new(0.0, 2.0, 0.0));
        rotate_with_controller(&mut prop, &previous, &current);
        assert!((prop.position - Vec3::new(1.0, 2.0, -5.0)).length() < 1e-6);
    }
}
