//! Renderers: a camera, a viewport and the props it draws.

use crate::camera::Camera;
use crate::prop::PropTable;
use raypoint_core::{Aabb, PropId};
use serde::{Deserialize, Serialize};

/// Stable identifier of a renderer inside its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RendererId(pub u32);

/// Rectangle in normalized window coordinates, origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Lower-left corner.
    pub min: [f32; 2],
    /// Upper-right corner.
    pub max: [f32; 2],
}

impl Default for Viewport {
    fn default() -> Self {
        Self::FULL
    }
}

impl Viewport {
    /// The whole window.
    pub const FULL: Self = Self {
        min: [0.0, 0.0],
        max: [1.0, 1.0],
    };

    /// Create a viewport, clamping to the unit square and ordering corners.
    pub fn new(min: [f32; 2], max: [f32; 2]) -> Self {
        let clamp = |v: f32| v.clamp(0.0, 1.0);
        Self {
            min: [clamp(min[0].min(max[0])), clamp(min[1].min(max[1]))],
            max: [clamp(min[0].max(max[0])), clamp(min[1].max(max[1]))],
        }
    }

    /// Cell `index` of a `columns` x `rows` grid, filled row by row from the bottom-left.
    pub fn grid(columns: u32, rows: u32, index: u32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        let index = index % columns.saturating_mul(rows);
        let width = 1.0 / columns as f32;
        let height = 1.0 / rows as f32;
        let x = (index % columns) as f32 * width;
        let y = (index / columns) as f32 * height;
        Self::new([x, y], [x + width, y + height])
    }

    /// Whether a normalized point lies inside (inclusive).
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.min[0] && x <= self.max[0] && y >= self.min[1] && y <= self.max[1]
    }
}

/// Draws a set of view props through one camera into one viewport.
#[derive(Debug, Clone)]
pub struct Renderer {
    id: RendererId,
    camera: Camera,
    viewport: Viewport,
    view_props: Vec<PropId>,
}

impl Renderer {
    /// Create a renderer with a default camera covering `viewport`.
    pub fn new(id: RendererId, viewport: Viewport) -> Self {
        Self {
            id,
            camera: Camera::default(),
            viewport,
            view_props: Vec::new(),
        }
    }

    /// Identifier inside the owning window.
    pub fn id(&self) -> RendererId {
        self.id
    }

    /// Active camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Active camera, mutably.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Viewport in normalized window coordinates.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Move the renderer to another viewport.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Add a prop to the view. Adding twice is a no-op.
    pub fn add_view_prop(&mut self, prop: PropId) {
        if !self.view_props.contains(&prop) {
            self.view_props.push(prop);
        }
    }

    /// Remove a prop from the view.
    pub fn remove_view_prop(&mut self, prop: PropId) -> bool {
        let before = self.view_props.len();
        self.view_props.retain(|id| *id != prop);
        before != self.view_props.len()
    }

    /// Props drawn by this renderer, in insertion order.
    pub fn view_props(&self) -> &[PropId] {
        &self.view_props
    }

    /// Visible props of this view that still resolve in `props`.
    pub fn visible_props(&self, props: &PropTable) -> Vec<PropId> {
        self.view_props
            .iter()
            .copied()
            .filter(|id| props.get(*id).is_some_and(|prop| prop.is_visible()))
            .collect()
    }

    /// Refit the camera clipping range around the visible props.
    pub fn reset_camera_clipping_range(&mut self, props: &PropTable) {
        let bounds: Vec<Aabb> = self
            .visible_props(props)
            .into_iter()
            .filter_map(|id| props.get(id).map(|prop| prop.world_bounds()))
            .collect();
        self.camera.reset_clipping_range(&bounds);
    }
}
