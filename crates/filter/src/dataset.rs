//! Point-set datasets: points with optional per-point attributes over a
//! poly, structured or unstructured topology.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete point-set dataset types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Points with polygon connectivity.
    PolyData,
    /// Points on an implicit `i × j × k` lattice.
    StructuredGrid,
    /// Points with arbitrary cell connectivity.
    UnstructuredGrid,
}

impl DatasetKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 3] = [Self::PolyData, Self::StructuredGrid, Self::UnstructuredGrid];

    /// Stable name used in configuration and logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::PolyData => "poly_data",
            Self::StructuredGrid => "structured_grid",
            Self::UnstructuredGrid => "unstructured_grid",
        }
    }

    /// Look up a kind by [`DatasetKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Topology of a point set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Structure {
    /// Polygons as lists of point indices.
    Poly {
        /// Polygon connectivity.
        polys: Vec<Vec<u32>>,
    },
    /// Lattice dimensions; points are stored i-fastest.
    Structured {
        /// Points along i, j and k.
        dims: [u32; 3],
    },
    /// Cells as lists of point indices.
    Unstructured {
        /// Cell connectivity.
        cells: Vec<Vec<u32>>,
    },
}

impl Structure {
    /// Empty topology of the given kind.
    pub fn empty(kind: DatasetKind) -> Self {
        match kind {
            DatasetKind::PolyData => Self::Poly { polys: Vec::new() },
            DatasetKind::StructuredGrid => Self::Structured { dims: [0, 0, 0] },
            DatasetKind::UnstructuredGrid => Self::Unstructured { cells: Vec::new() },
        }
    }

    /// Dataset kind implied by the topology.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Self::Poly { .. } => DatasetKind::PolyData,
            Self::Structured { .. } => DatasetKind::StructuredGrid,
            Self::Unstructured { .. } => DatasetKind::UnstructuredGrid,
        }
    }
}

/// Points with topology and optional per-point attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    /// Topology.
    pub structure: Structure,
    /// Point coordinates.
    pub points: Vec<Vec3>,
    /// One scalar per point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalars: Option<Vec<f32>>,
    /// One normal per point.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<Vec3>>,
}

impl PointSet {
    /// Empty dataset of `kind`.
    pub fn empty(kind: DatasetKind) -> Self {
        Self::new(Structure::empty(kind), Vec::new())
    }

    /// Dataset with topology and points but no attributes.
    pub fn new(structure: Structure, points: Vec<Vec3>) -> Self {
        Self {
            structure,
            points,
            scalars: None,
            normals: None,
        }
    }

    /// Attach per-point scalars.
    pub fn with_scalars(mut self, scalars: Vec<f32>) -> Self {
        self.scalars = Some(scalars);
        self
    }

    /// Attach per-point normals.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Dataset kind.
    pub fn kind(&self) -> DatasetKind {
        self.structure.kind()
    }

    /// Number of points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Whether the topology, point count and attribute lengths agree.
    pub fn is_consistent(&self) -> bool {
        let count = self.points.len();
        let in_range = |ids: &Vec<Vec<u32>>| ids.iter().flatten().all(|&id| (id as usize) < count);
        let topology = match &self.structure {
            Structure::Poly { polys } => in_range(polys),
            Structure::Unstructured { cells } => in_range(cells),
            Structure::Structured { dims } => {
                dims.iter().map(|&d| d as usize).product::<usize>() == count
            }
        };
        topology
            && self.scalars.as_ref().map_or(true, |s| s.len() == count)
            && self.normals.as_ref().map_or(true, |n| n.len() == count)
    }

    /// Replace topology and points with `other`'s and drop all attributes.
    pub fn copy_structure(&mut self, other: &PointSet) {
        self.structure = other.structure.clone();
        self.points.clone_from(&other.points);
        self.scalars = None;
        self.normals = None;
    }

    /// Drop the arrays, keeping only the dataset kind.
    pub fn release(&mut self) {
        *self = Self::empty(self.kind());
    }

    /// Minimum and maximum scalar, if any scalars are present.
    pub fn scalar_range(&self) -> Option<(f32, f32)> {
        let scalars = self.scalars.as_ref()?;
        scalars.iter().copied().fold(None, |range, s| match range {
            None => Some((s, s)),
            Some((lo, hi)) => Some((lo.min(s), hi.max(s))),
        })
    }

    /// Axis-aligned bounds of the points.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.points.first()?;
        Some(
            self.points
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }
}
