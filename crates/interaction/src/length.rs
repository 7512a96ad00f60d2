//! Effective ray length under the hit / drag / far-clip fallback chain.

use crate::picker::PickHit;
use glam::Vec3;
use serde::Serialize;

/// Which rule produced a ray length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthSource {
    /// Distance to the picked point.
    Hit,
    /// Distance to the prop being dragged.
    Target,
    /// Camera far clipping distance.
    FarClip,
}

impl LengthSource {
    /// Stable lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Target => "target",
            Self::FarClip => "far_clip",
        }
    }
}

/// A ray length together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLength {
    /// Length in world units; always finite and non-negative.
    pub length: f32,
    /// Rule that produced `length`.
    pub source: LengthSource,
}

/// Resolve the ray length, first match wins:
///
/// 1. a pick hit: distance from `origin` to the hit point;
/// 2. a drag target with a known position: distance from `origin` to it, so
///    the ray stays anchored when it outruns the prop;
/// 3. otherwise `far_clip`.
///
/// A rule producing a non-finite distance falls through to the next one. An
/// unusable `far_clip` resolves to zero.
pub fn resolve_length(
    origin: Vec3,
    pick: Option<&PickHit>,
    target_position: Option<Vec3>,
    far_clip: f32,
) -> ResolvedLength {
    let candidates = [
        (pick.map(|hit| hit.position), LengthSource::Hit),
        (target_position, LengthSource::Target),
    ];
    for (point, source) in candidates {
        if let Some(point) = point {
            let length = origin.distance(point);
            if length.is_finite() {
                return ResolvedLength { length, source };
            }
        }
    }

    let length = if far_clip.is_finite() && far_clip > 0.0 {
        far_clip
    } else {
        0.0
    };
    ResolvedLength {
        length,
        source: LengthSource::FarClip,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raypoint_core::PropId;

    fn hit_at(position: Vec3) -> PickHit {
        PickHit {
            prop: PropId::from_raw_parts(0, 0),
            position,
            distance: position.length(),
        }
    }

    #[test]
    fn hit_point_sets_length() {
        let hit = hit_at(Vec3::new(0.0, 0.0, 5.0));
        let resolved = resolve_length(Vec3::ZERO, Some(&hit), None, 1000.0);
        assert!((resolved.length - 5.0).abs() < 1e-6);
        assert_eq!(resolved.source, LengthSource::Hit);
    }

    #[test]
    fn hit_wins_over_target() {
        let hit = hit_at(Vec3::new(0.0, 0.0, -3.0));
        let resolved = resolve_length(Vec3::ZERO, Some(&hit), Some(Vec3::new(9.0, 0.0, 0.0)), 1000.0);
        assert!((resolved.length - 3.0).abs() < 1e-6);
        assert_eq!(resolved.source, LengthSource::Hit);
    }

    #[test]
    fn drag_target_anchors_ray_without_hit() {
        let resolved = resolve_length(Vec3::ZERO, None, Some(Vec3::new(2.0, 0.0, 0.0)), 1000.0);
        assert!((resolved.length - 2.0).abs() < 1e-6);
        assert_eq!(resolved.source, LengthSource::Target);
    }

    #[test]
    fn nothing_hit_reaches_far_clip() {
        let resolved = resolve_length(Vec3::ZERO, None, None, 1000.0);
        assert_eq!(resolved.length, 1000.0);
        assert_eq!(resolved.source, LengthSource::FarClip);
    }

    #[test]
    fn non_finite_inputs_fall_through() {
        let hit = hit_at(Vec3::new(f32::NAN, 0.0, 0.0));
        let resolved = resolve_length(Vec3::ZERO, Some(&hit), Some(Vec3::Y), 50.0);
        assert_eq!(resolved.source, LengthSource::Target);

        let resolved = resolve_length(Vec3::ZERO, None, Some(Vec3::splat(f32::INFINITY)), 50.0);
        assert_eq!(resolved.source, LengthSource::FarClip);
        assert_eq!(resolved.length, 50.0);

        let resolved = resolve_length(Vec3::ZERO, None, None, f32::INFINITY);
        assert_eq!(resolved.length, 0.0);
        let resolved = resolve_length(Vec3::ZERO, None, None, -4.0);
        assert_eq!(resolved.length, 0.0);
    }

    #[test]
    fn source_labels_are_stable() {
        assert_eq!(LengthSource::Hit.as_str(), "hit");
        assert_eq!(LengthSource::Target.as_str(), "target");
        assert_eq!(LengthSource::FarClip.as_str(), "far_clip");
    }
}
