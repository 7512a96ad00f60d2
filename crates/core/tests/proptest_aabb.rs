//! Property-based tests for the slab ray test
//!
//! - A ray aimed at the box center from outside always hits
//! - The hit is never farther than the center itself
//! - The reported point lies on the box boundary

use glam::Vec3;
use proptest::prelude::*;
use raypoint_core::Aabb;

fn outside_point() -> impl Strategy<Value = Vec3> {
    (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0)
        .prop_map(|(x, y, z)| Vec3::new(x, y, z))
        .prop_filter("must start outside the box", |p| p.abs().max_element() > 2.0)
}

proptest! {
    #[test]
    fn ray_toward_center_hits(
        origin in outside_point(),
        half in 0.1f32..2.0,
    ) {
        let aabb = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(half * 2.0));
        let dir = (aabb.center() - origin).normalize();
        let t = aabb.ray_intersection(origin, dir);
        prop_assert!(t.is_some());
        let t = t.unwrap();
        prop_assert!(t >= 0.0);
        prop_assert!(t <= origin.distance(aabb.center()) + 1e-3);

        let point = origin + dir * t;
        let grown = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(half * 2.0 + 1e-2));
        prop_assert!(grown.contains(point), "hit point {:?} off the box", point);
    }

    #[test]
    fn ray_away_from_center_misses(origin in outside_point()) {
        let aabb = Aabb::unit();
        let dir = (origin - aabb.center()).normalize();
        prop_assert!(aabb.ray_intersection(origin, dir).is_none());
    }
}
