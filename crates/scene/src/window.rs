//! Render window: the renderers sharing one surface plus the per-device
//! visual state drawn into it.

use crate::renderer::{Renderer, RendererId, Viewport};
use raypoint_core::{DeviceIndex, Pose};
use raypoint_tracking::{DeviceModels, DeviceTracker, TrackingSpace};

/// A window hosting one or more renderers.
#[derive(Debug, Clone)]
pub struct RenderWindow {
    width: u32,
    height: u32,
    renderers: Vec<Renderer>,
    current: Option<usize>,
    next_id: u32,
    tracking_space: TrackingSpace,
    models: DeviceModels,
}

impl RenderWindow {
    /// Create an empty window of `width` x `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            renderers: Vec::new(),
            current: None,
            next_id: 0,
            tracking_space: TrackingSpace::default(),
            models: DeviceModels::new(),
        }
    }

    /// Window size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Add a renderer covering `viewport`. The first renderer becomes current.
    pub fn add_renderer(&mut self, viewport: Viewport) -> RendererId {
        let id = RendererId(self.next_id);
        self.next_id += 1;
        self.renderers.push(Renderer::new(id, viewport));
        if self.current.is_none() {
            self.current = Some(self.renderers.len() - 1);
        }
        id
    }

    /// All renderers in insertion order.
    pub fn renderers(&self) -> &[Renderer] {
        &self.renderers
    }

    /// Look up a renderer.
    pub fn renderer(&self, id: RendererId) -> Option<&Renderer> {
        self.renderers.iter().find(|r| r.id() == id)
    }

    /// Look up a renderer mutably.
    pub fn renderer_mut(&mut self, id: RendererId) -> Option<&mut Renderer> {
        self.renderers.iter_mut().find(|r| r.id() == id)
    }

    /// Renderer that interaction is currently bound to.
    pub fn current_renderer(&self) -> Option<&Renderer> {
        self.current.and_then(|index| self.renderers.get(index))
    }

    /// Renderer that interaction is currently bound to, mutably.
    pub fn current_renderer_mut(&mut self) -> Option<&mut Renderer> {
        self.current.and_then(|index| self.renderers.get_mut(index))
    }

    /// Bind interaction to `id`. Returns `false` if the renderer does not exist.
    pub fn set_current_renderer(&mut self, id: RendererId) -> bool {
        match self.renderers.iter().position(|r| r.id() == id) {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }

    /// Unbind interaction from every renderer.
    pub fn clear_current_renderer(&mut self) {
        self.current = None;
    }

    /// Move the current renderer `step` places forward (negative: backward),
    /// wrapping at both ends.
    pub fn cycle_current_renderer(&mut self, step: i32) -> Option<RendererId> {
        let count = self.renderers.len() as i64;
        if count == 0 {
            return None;
        }
        let from = self.current.unwrap_or(0) as i64;
        let index = (from + step as i64).rem_euclid(count) as usize;
        self.current = Some(index);
        let id = self.renderers[index].id();
        tracing::debug!(renderer = id.0, "moved interaction to renderer");
        Some(id)
    }

    /// Renderer whose viewport contains display point `(x, y)` in pixels,
    /// origin at the bottom-left. Later renderers win where viewports overlap.
    pub fn renderer_at(&self, x: f32, y: f32) -> Option<RendererId> {
        let nx = x / self.width as f32;
        let ny = y / self.height as f32;
        self.renderers
            .iter()
            .rev()
            .find(|r| r.viewport().contains(nx, ny))
            .map(Renderer::id)
    }

    /// Physical-to-world mapping of the tracking runtime.
    pub fn tracking_space(&self) -> &TrackingSpace {
        &self.tracking_space
    }

    /// Replace the physical-to-world mapping.
    pub fn set_tracking_space(&mut self, space: TrackingSpace) {
        self.tracking_space = space;
    }

    /// World pose of `device`, or `None` if the tracker has no valid pose.
    pub fn world_pose<T>(&self, tracker: &T, device: DeviceIndex) -> Option<Pose>
    where
        T: DeviceTracker + ?Sized,
    {
        tracker
            .tracking_pose(device)
            .map(|pose| self.tracking_space.to_world(&pose))
    }

    /// Point every camera along the headset's world pose.
    pub fn sync_cameras_to_headset<T>(&mut self, tracker: &T)
    where
        T: DeviceTracker + ?Sized,
    {
        if let Some(pose) = self.world_pose(tracker, DeviceIndex::HMD) {
            for renderer in &mut self.renderers {
                renderer.camera_mut().follow(&pose);
            }
        }
    }

    /// Per-device visual models.
    pub fn device_models(&self) -> &DeviceModels {
        &self.models
    }

    /// Per-device visual models, mutably.
    pub fn device_models_mut(&mut self) -> &mut DeviceModels {
        &mut self.models
    }
}
