use glam::Vec3;
use proptest::prelude::*;
use raypoint_core::PropId;
use raypoint_interaction::{resolve_length, LengthSource, PickHit};

fn coord() -> impl Strategy<Value = f32> {
    -1.0e4f32..1.0e4
}

fn point() -> impl Strategy<Value = Vec3> {
    (coord(), coord(), coord()).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn far_clip() -> impl Strategy<Value = f32> {
    prop_oneof![
        0.0f32..1.0e5,
        Just(f32::INFINITY),
        Just(f32::NAN),
        Just(-1.0f32),
    ]
}

proptest! {
    #[test]
    fn length_is_always_finite_and_non_negative(
        origin in point(),
        hit in proptest::option::of(point()),
        target in proptest::option::of(point()),
        far in far_clip(),
    ) {
        let pick = hit.map(|position| PickHit { prop: PropId::from_raw_parts(0, 0), position, distance: 0.0 });
        let resolved = resolve_length(origin, pick.as_ref(), target, far);
        prop_assert!(resolved.length.is_finite());
        prop_assert!(resolved.length >= 0.0);
    }

    #[test]
    fn rules_apply_in_order(
        origin in point(),
        hit in proptest::option::of(point()),
        target in proptest::option::of(point()),
        far in 0.0f32..1.0e5,
    ) {
        let pick = hit.map(|position| PickHit { prop: PropId::from_raw_parts(0, 0), position, distance: 0.0 });
        let resolved = resolve_length(origin, pick.as_ref(), target, far);
        match (hit, target) {
            (Some(h), _) => {
                prop_assert_eq!(resolved.source, LengthSource::Hit);
                prop_assert_eq!(resolved.length, origin.distance(h));
            }
            (None, Some(p)) => {
                prop_assert_eq!(resolved.source, LengthSource::Target);
                prop_assert_eq!(resolved.length, origin.distance(p));
            }
            (None, None) => {
                prop_assert_eq!(resolved.source, LengthSource::FarClip);
                prop_assert_eq!(resolved.length, far);
            }
        }
    }
}
