//! Analytic wavelet source.

use crate::dataset::{DatasetKind, PointSet, Structure};
use crate::mtime::ModifiedTime;
use crate::producer::PointSetProducer;
use crate::FilterError;
use glam::Vec3;
use tracing::debug;

/// Analytic structured-grid source: a Gaussian bump plus per-axis sinusoids.
///
/// The scalar at lattice point `p` is
/// `maximum * exp(-|n|² / (2 σ²)) + mag.x sin(freq.x n.x) + mag.y sin(freq.y n.y) + mag.z cos(freq.z n.z)`
/// where `n` is `p - center` divided by the extent size along each axis.
#[derive(Debug, Clone)]
pub struct WaveletSource {
    whole_extent: [i32; 6],
    center: Vec3,
    maximum: f32,
    standard_deviation: f32,
    frequency: Vec3,
    magnitude: Vec3,
    subsample_rate: u32,
    output: Option<PointSet>,
    mtime: ModifiedTime,
    execute_time: ModifiedTime,
    release_data_flag: bool,
    executions: u64,
}

impl Default for WaveletSource {
    fn default() -> Self {
        Self {
            whole_extent: [-10, 10, -10, 10, -10, 10],
            center: Vec3::ZERO,
            maximum: 255.0,
            standard_deviation: 0.5,
            frequency: Vec3::new(60.0, 30.0, 40.0),
            magnitude: Vec3::new(10.0, 18.0, 5.0),
            subsample_rate: 1,
            output: None,
            mtime: ModifiedTime::now(),
            execute_time: ModifiedTime::NEVER,
            release_data_flag: false,
            executions: 0,
        }
    }
}

impl WaveletSource {
    /// Source with the default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive lattice extent `[x0, x1, y0, y1, z0, z1]`. Reversed ranges are
    /// swapped.
    pub fn set_whole_extent(&mut self, extent: [i32; 6]) {
        let mut extent = extent;
        for axis in 0..3 {
            if extent[2 * axis] > extent[2 * axis + 1] {
                extent.swap(2 * axis, 2 * axis + 1);
            }
        }
        self.whole_extent = extent;
        self.mtime.modified();
    }

    /// Current extent.
    pub fn whole_extent(&self) -> [i32; 6] {
        self.whole_extent
    }

    /// Centre of the Gaussian in lattice coordinates.
    pub fn set_center(&mut self, center: Vec3) {
        self.center = center;
        self.mtime.modified();
    }

    /// Peak of the Gaussian.
    pub fn set_maximum(&mut self, maximum: f32) {
        self.maximum = maximum;
        self.mtime.modified();
    }

    /// Width of the Gaussian in normalized coordinates.
    pub fn set_standard_deviation(&mut self, sigma: f32) {
        self.standard_deviation = sigma;
        self.mtime.modified();
    }

    /// Sinusoid frequencies per axis.
    pub fn set_frequency(&mut self, frequency: Vec3) {
        self.frequency = frequency;
        self.mtime.modified();
    }

    /// Sinusoid magnitudes per axis.
    pub fn set_magnitude(&mut self, magnitude: Vec3) {
        self.magnitude = magnitude;
        self.mtime.modified();
    }

    /// Emit every `rate`-th lattice point along each axis. Zero is treated as one.
    pub fn set_subsample_rate(&mut self, rate: u32) {
        self.subsample_rate = rate.max(1);
        self.mtime.modified();
    }

    /// Ask consumers to release this source's output after reading it.
    pub fn set_release_data_flag(&mut self, release: bool) {
        self.release_data_flag = release;
    }

    /// How many times the grid was generated.
    pub fn executions(&self) -> u64 {
        self.executions
    }

    /// Scalar value at lattice coordinate `p`.
    pub fn evaluate(&self, p: Vec3) -> f32 {
        let span = |axis: usize| {
            (i64::from(self.whole_extent[2 * axis + 1]) - i64::from(self.whole_extent[2 * axis])) as f32
        };
        let size = Vec3::new(span(0), span(1), span(2)).max(Vec3::ONE);
        let n = (p - self.center) / size;
        let sigma = self.standard_deviation.max(f32::EPSILON);
        let gaussian = self.maximum * (-n.length_squared() / (2.0 * sigma * sigma)).exp();
        gaussian
            + self.magnitude.x * (self.frequency.x * n.x).sin()
            + self.magnitude.y * (self.frequency.y * n.y).sin()
            + self.magnitude.z * (self.frequency.z * n.z).cos()
    }

    fn generate(&mut self) {
        let rate = self.subsample_rate.max(1) as usize;
        let axis = |lo: i32, hi: i32| -> Vec<i32> { (lo..=hi).step_by(rate).collect() };
        let xs = axis(self.whole_extent[0], self.whole_extent[1]);
        let ys = axis(self.whole_extent[2], self.whole_extent[3]);
        let zs = axis(self.whole_extent[4], self.whole_extent[5]);

        let mut points = Vec::with_capacity(xs.len() * ys.len() * zs.len());
        for &z in &zs {
            for &y in &ys {
                for &x in &xs {
                    points.push(Vec3::new(x as f32, y as f32, z as f32));
                }
            }
        }
        let scalars = points.iter().map(|&p| self.evaluate(p)).collect();
        let dims = [xs.len() as u32, ys.len() as u32, zs.len() as u32];

        self.output = Some(PointSet::new(Structure::Structured { dims }, points).with_scalars(scalars));
        self.execute_time.modified();
        self.executions += 1;
        debug!(?dims, "wavelet generated");
    }
}

impl PointSetProducer for WaveletSource {
    fn update(&mut self) -> Result<bool, FilterError> {
        if self.output.is_some() && self.mtime <= self.execute_time {
            return Ok(false);
        }
        self.generate();
        Ok(true)
    }

    fn force_update(&mut self) -> Result<bool, FilterError> {
        self.generate();
        Ok(true)
    }

    fn output(&self) -> Option<&PointSet> {
        self.output.as_ref()
    }

    fn output_kind(&self) -> Option<DatasetKind> {
        Some(DatasetKind::StructuredGrid)
    }

    fn mtime(&self) -> ModifiedTime {
        self.mtime.max(self.execute_time)
    }

    fn data_released(&self) -> bool {
        self.output.is_none() && self.executions > 0
    }

    fn release_data(&mut self) {
        self.output = None;
    }

    fn should_release_data(&self) -> bool {
        self.release_data_flag
    }
}
