//! Per-device visual state published for the ray rendering pass.

use raypoint_core::DeviceIndex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Visual state of one tracked device's pointer ray.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DeviceModel {
    /// Whether the ray is drawn.
    pub show_ray: bool,
    /// Length of the drawn ray in world units.
    pub ray_length: f32,
}

impl DeviceModel {
    /// Toggle the ray.
    pub fn set_show_ray(&mut self, show: bool) {
        self.show_ray = show;
    }

    /// Update the ray length. Non-finite or negative values are clamped to zero.
    pub fn set_ray_length(&mut self, length: f32) {
        self.ray_length = if length.is_finite() { length.max(0.0) } else { 0.0 };
    }
}

/// Device models keyed by slot, iterated in slot order.
#[derive(Debug, Clone, Default)]
pub struct DeviceModels {
    models: BTreeMap<DeviceIndex, DeviceModel>,
}

impl DeviceModels {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Model for `device`, if one was ever touched.
    pub fn get(&self, device: DeviceIndex) -> Option<&DeviceModel> {
        self.models.get(&device)
    }

    /// Model for `device`, created hidden on first access.
    pub fn model_mut(&mut self, device: DeviceIndex) -> &mut DeviceModel {
        self.models.entry(device).or_default()
    }

    /// Whether `device` currently shows its ray.
    pub fn shows_ray(&self, device: DeviceIndex) -> bool {
        self.get(device).is_some_and(|model| model.show_ray)
    }

    /// Iterate `(slot, model)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (DeviceIndex, &DeviceModel)> {
        self.models.iter().map(|(index, model)| (*index, model))
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no model exists yet.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
