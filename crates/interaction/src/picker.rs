//! Ray picking against prop bounds.

use glam::Vec3;
use raypoint_core::{PropId, Ray};
use raypoint_scene::PropTable;

/// Result of a successful pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Prop that was hit.
    pub prop: PropId,
    /// World-space point where the ray entered the prop's bounds.
    pub position: Vec3,
    /// Distance from the ray origin to `position`.
    pub distance: f32,
}

/// Picks the nearest prop along a ray and remembers the last result.
#[derive(Debug, Clone, Default)]
pub struct PropPicker {
    last_path: Option<PropId>,
    last_position: Option<Vec3>,
}

impl PropPicker {
    /// Create a picker with no previous result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cast `ray` against `candidates` and return the nearest hit no farther
    /// than `max_distance`.
    ///
    /// Props that are gone from `props`, invisible or unpickable are ignored.
    /// Bounds are tested in each prop's local frame so rotated and scaled
    /// props are picked exactly. On equal distances the earlier candidate wins.
    pub fn pick(
        &mut self,
        ray: &Ray,
        props: &PropTable,
        candidates: &[PropId],
        max_distance: f32,
    ) -> Option<PickHit> {
        let direction = ray.direction();
        let mut best: Option<PickHit> = None;

        if direction != Vec3::ZERO {
            for &id in candidates {
                let Some(prop) = props.get(id) else {
                    continue;
                };
                if !prop.is_pickable() {
                    continue;
                }

                // The local mapping is affine, so the ray parameter carries
                // over unchanged and stays a world distance.
                let local_origin = prop.world_to_local(ray.origin);
                let local_dir = prop.world_dir_to_local(direction);
                let Some(distance) = prop.bounds.ray_intersection(local_origin, local_dir) else {
                    continue;
                };
                if !distance.is_finite() || distance > max_distance {
                    continue;
                }
                if best.map_or(true, |hit| distance < hit.distance) {
                    best = Some(PickHit {
                        prop: id,
                        position: ray.at(distance),
                        distance,
                    });
                }
            }
        }

        self.last_path = best.map(|hit| hit.prop);
        self.last_position = best.map(|hit| hit.position);
        best
    }

    /// Prop hit by the last pick, if any.
    pub fn last_path(&self) -> Option<PropId> {
        self.last_path
    }

    /// World position of the last hit, if any.
    pub fn last_position(&self) -> Option<Vec3> {
        self.last_position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use raypoint_core::{Aabb, Pose};
    use raypoint_scene::{Prop, PropFlags};
    use std::f32::consts::FRAC_PI_2;

    fn forward_ray() -> Ray {
        Pose::IDENTITY.ray()
    }

    #[test]
    fn picks_nearest_prop() {
        let mut props = PropTable::new();
        let far = props.insert(Prop::new("far", Vec3::new(0.0, 0.0, -10.0)));
        let near = props.insert(Prop::new("near", Vec3::new(0.0, 0.0, -5.0)));

        let mut picker = PropPicker::new();
        let hit = picker
            .pick(&forward_ray(), &props, &[far, near], f32::INFINITY)
            .unwrap();

        assert_eq!(hit.prop, near);
        // Unit cube centred at z=-5 is entered at z=-4.5.
        assert!((hit.distance - 4.5).abs() < 1e-5);
        assert!((hit.position - Vec3::new(0.0, 0.0, -4.5)).length() < 1e-5);
        assert_eq!(picker.last_path(), Some(near));
        assert_eq!(picker.last_position(), Some(hit.position));
    }

    #[test]
    fn equal_distances_keep_first_candidate() {
        let mut props = PropTable::new();
        let a = props.insert(Prop::new("a", Vec3::new(0.0, 0.0, -5.0)));
        let b = props.insert(Prop::new("b", Vec3::new(0.0, 0.0, -5.0)));

        let mut picker = PropPicker::new();
        let hit = picker.pick(&forward_ray(), &props, &[b, a], f32::INFINITY).unwrap();
        assert_eq!(hit.prop, b);
    }

    #[test]
    fn respects_max_distance_and_flags() {
        let mut props = PropTable::new();
        let hidden = props.insert(
            Prop::new("hidden", Vec3::new(0.0, 0.0, -2.0)).with_flags(PropFlags::PICKABLE),
        );
        let far = props.insert(Prop::new("far", Vec3::new(0.0, 0.0, -50.0)));

        let mut picker = PropPicker::new();
        assert!(picker.pick(&forward_ray(), &props, &[hidden, far], 10.0).is_none());
        assert_eq!(picker.last_path(), None);
        assert_eq!(picker.last_position(), None);
    }

    #[test]
    fn behind_origin_is_missed() {
        let mut props = PropTable::new();
        let behind = props.insert(Prop::new("behind", Vec3::new(0.0, 0.0, 5.0)));

        let mut picker = PropPicker::new();
        assert!(picker.pick(&forward_ray(), &props, &[behind], f32::INFINITY).is_none());
    }

    #[test]
    fn rotated_and_scaled_props_use_local_bounds() {
        let mut props = PropTable::new();
        // A slab 4 wide in x, rotated so that x points along world -z.
        let slab = props.insert(
            Prop::new("slab", Vec3::new(0.0, 0.0, -10.0))
                .with_bounds(Aabb::from_center_size(Vec3::ZERO, Vec3::new(4.0, 1.0, 1.0)))
                .with_orientation(Quat::from_rotation_y(FRAC_PI_2))
                .with_scale(Vec3::splat(2.0)),
        );

        let mut picker = PropPicker::new();
        let hit = picker.pick(&forward_ray(), &props, &[slab], f32::INFINITY).unwrap();
        // Half extent 2 * scale 2 = 4 units toward the controller.
        assert!((hit.distance - 6.0).abs() < 1e-4);
    }

    #[test]
    fn large_scale_props_hit_at_grazing_angles() {
        let mut props = PropTable::new();
        let wall = props.insert(
            Prop::new("wall", Vec3::new(0.0, 0.0, -500.0)).with_scale(Vec3::new(1000.0, 1.0, 1000.0)),
        );
        let direction = Vec3::new(-1e-4, 0.0, -1.0).normalize();
        let ray = Ray::new(
            Vec3::new(500.05, 0.0, 0.0),
            Quat::from_rotation_arc(Vec3::NEG_Z, direction),
        );

        let mut picker = PropPicker::new();
        let hit = picker.pick(&ray, &props, &[wall], 1000.0).expect("ray enters the wall");
        assert_eq!(hit.prop, wall);
        assert!((hit.distance - 500.0).abs() < 0.5, "distance = {}", hit.distance);
    }

    #[test]
    fn removed_props_are_skipped() {
        let mut props = PropTable::new();
        let gone = props.insert(Prop::new("gone", Vec3::new(0.0, 0.0, -3.0)));
        props.remove(gone);

        let mut picker = PropPicker::new();
        assert!(picker.pick(&forward_ray(), &props, &[gone], f32::INFINITY).is_none());
    }
}
