//! Pointer configuration loaded from TOML.

use anyhow::Result;
use glam::Vec3;
use raypoint_interaction::PointerSettings;
use raypoint_scene::{RenderWindow, Viewport};
use raypoint_tracking::{SelectorPolicy, TrackingSpace};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

/// Config file read when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/pointer.toml";

/// Upper bound on grid renderers per axis.
const MAX_VIEWPORT_GRID: u32 = 8;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PointerConfig {
    /// How the driving controller is chosen.
    pub selector_policy: SelectorPolicy,
    /// Whether the selected controller draws its ray.
    pub show_ray: bool,
    /// Near clipping distance for every camera.
    pub near_clip: f32,
    /// Far clipping distance; also the ray length when nothing is hit.
    pub far_clip: f32,
    /// Refit each camera's clipping range around its props once the scene is built.
    pub fit_clipping_to_props: bool,
    /// World units per physical meter.
    pub physical_scale: f32,
    /// World position of the physical tracking origin.
    pub physical_translation: [f32; 3],
    /// Renderer grid columns, clamped to `1..=8`.
    pub viewport_columns: u32,
    /// Renderer grid rows, clamped to `1..=8`.
    pub viewport_rows: u32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            selector_policy: SelectorPolicy::default(),
            show_ray: true,
            near_clip: 0.1,
            far_clip: 1000.0,
            fit_clipping_to_props: false,
            physical_scale: 1.0,
            physical_translation: [0.0, 0.0, 0.0],
            viewport_columns: 1,
            viewport_rows: 1,
        }
    }
}

impl PointerConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|err| {
                warn!("Failed to parse {}: {err}. Using defaults", path.display());
                PointerConfig::default()
            }),
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Pointer config not found at {}. Using defaults",
                        path.display()
                    );
                }
                PointerConfig::default()
            }
        }
    }

    /// Parse TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str::<PointerConfig>(contents)?)
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    /// Options for the pointer style.
    pub fn settings(&self) -> PointerSettings {
        PointerSettings {
            selector_policy: self.selector_policy,
            show_ray: self.show_ray,
        }
    }

    /// Physical-to-world mapping. A non-positive or non-finite scale falls
    /// back to one.
    pub fn tracking_space(&self) -> TrackingSpace {
        let scale = if self.physical_scale.is_finite() && self.physical_scale > 0.0 {
            self.physical_scale
        } else {
            warn!(scale = self.physical_scale, "invalid physical_scale; using 1.0");
            1.0
        };
        TrackingSpace {
            physical_scale: scale,
            physical_translation: Vec3::from_array(self.physical_translation),
            ..TrackingSpace::default()
        }
    }

    /// Build a window laid out as a `viewport_columns` x `viewport_rows` grid
    /// of renderers, each with this config's clipping range.
    pub fn build_window(&self, width: u32, height: u32) -> RenderWindow {
        let columns = self.viewport_columns.clamp(1, MAX_VIEWPORT_GRID);
        let rows = self.viewport_rows.clamp(1, MAX_VIEWPORT_GRID);
        if (columns, rows) != (self.viewport_columns, self.viewport_rows) {
            warn!(
                columns = self.viewport_columns,
                rows = self.viewport_rows,
                "viewport grid clamped to 1..={MAX_VIEWPORT_GRID}"
            );
        }

        let mut window = RenderWindow::new(width, height);
        window.set_tracking_space(self.tracking_space());
        for index in 0..columns * rows {
            let id = window.add_renderer(Viewport::grid(columns, rows, index));
            if let Some(renderer) = window.renderer_mut(id) {
                renderer
                    .camera_mut()
                    .set_clipping_range(self.near_clip, self.far_clip);
            }
        }
        window
    }
}
