//! Warp-by-scalar.

use crate::dataset::PointSet;
use crate::filter::PointSetAlgorithm;
use crate::FilterError;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Displace points along a normal by their scaled scalar value.
///
/// Each point moves by `scale_factor * scalar * normal`. The point's own
/// normal is used when the input carries normals and `use_normal` is off;
/// otherwise the fixed `normal` (default `+Z`) applies to every point.
/// Scalars and normals are passed through to the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarpScalar {
    /// Multiplier applied to every scalar.
    pub scale_factor: f32,
    /// Fixed displacement direction.
    pub normal: Vec3,
    /// Ignore per-point normals and always use `normal`.
    pub use_normal: bool,
}

impl Default for WarpScalar {
    fn default() -> Self {
        Self {
            scale_factor: 1.0,
            normal: Vec3::Z,
            use_normal: false,
        }
    }
}

impl WarpScalar {
    /// Warp with the given scale along the default normal.
    pub fn with_scale(scale_factor: f32) -> Self {
        Self {
            scale_factor,
            ..Self::default()
        }
    }
}

impl PointSetAlgorithm for WarpScalar {
    fn name(&self) -> &'static str {
        "warp_scalar"
    }

    fn execute(&mut self, input: &PointSet, output: &mut PointSet) -> Result<(), FilterError> {
        let count = input.point_count();
        let fail = |reason: String| FilterError::Execute {
            algorithm: "warp_scalar",
            reason,
        };

        let scalars = match input.scalars.as_ref() {
            Some(scalars) => scalars,
            None if count == 0 => return Ok(()),
            None => return Err(fail("input has no point scalars".to_string())),
        };
        if scalars.len() != count {
            return Err(fail(format!(
                "{} scalars for {} points",
                scalars.len(),
                count
            )));
        }

        let point_normals = input
            .normals
            .as_ref()
            .filter(|normals| !self.use_normal && normals.len() == count);

        for (i, point) in output.points.iter_mut().enumerate() {
            let normal = point_normals.map_or(self.normal, |normals| normals[i]);
            *point += normal * (self.scale_factor * scalars[i]);
        }

        output.scalars = input.scalars.clone();
        output.normals = input.normals.clone();
        Ok(())
    }
}
