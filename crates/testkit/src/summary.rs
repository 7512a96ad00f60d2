//! Aggregate counters over a run of [`FrameRecord`]s, exported as JSON for
//! CI artifacts.

use crate::FrameRecord;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Per-run pointer statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Run identifier.
    pub name: String,
    /// Frames observed.
    pub frames: u64,
    /// Frames where a ray length was published, keyed by rule.
    pub length_sources: BTreeMap<String, u64>,
    /// Frames where the ray was hidden or no controller was selected.
    pub idle_frames: u64,
    /// Frames with at least one hook failure.
    pub failed_frames: u64,
    /// Longest published ray.
    pub max_ray_length: f32,
}

impl SessionSummary {
    /// Empty summary named `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Fold one frame into the totals.
    pub fn record(&mut self, frame: &FrameRecord) {
        self.frames += 1;
        if !frame.failures.is_empty() {
            self.failed_frames += 1;
        }
        match (frame.ray_length, frame.source.as_deref()) {
            (Some(length), Some(source)) => {
                *self.length_sources.entry(source.to_string()).or_default() += 1;
                self.max_ray_length = self.max_ray_length.max(length);
            }
            _ => self.idle_frames += 1,
        }
    }

    /// Frames whose length came from `source`.
    pub fn count(&self, source: &str) -> u64 {
        self.length_sources.get(source).copied().unwrap_or(0)
    }

    /// Write the summary as pretty JSON, creating parent directories.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::temp_path;
    use raypoint_core::FrameNumber;

    fn frame(length: Option<f32>, source: Option<&str>) -> FrameRecord {
        FrameRecord {
            frame: FrameNumber(1),
            device: None,
            show_ray: length.is_some(),
            ray_length: length,
            source: source.map(str::to_string),
            target: None,
            state: "idle".into(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn counts_sources_and_idle_frames() {
        let mut summary = SessionSummary::new("demo");
        summary.record(&frame(Some(4.5), Some("hit")));
        summary.record(&frame(Some(1000.0), Some("far_clip")));
        summary.record(&frame(Some(4.0), Some("hit")));
        summary.record(&frame(None, None));

        assert_eq!(summary.frames, 4);
        assert_eq!(summary.count("hit"), 2);
        assert_eq!(summary.count("far_clip"), 1);
        assert_eq!(summary.count("target"), 0);
        assert_eq!(summary.idle_frames, 1);
        assert_eq!(summary.max_ray_length, 1000.0);
    }

    #[test]
    fn summary_writes_json() {
        let path = temp_path("summary", "json");
        let mut summary = SessionSummary::new("demo");
        summary.record(&frame(Some(2.0), Some("target")));
        summary.write_json(&path).expect("write");

        let contents = fs::read_to_string(&path).expect("readable");
        assert!(contents.contains("\"target\": 1"));
        let _ = fs::remove_file(&path);
    }
}
