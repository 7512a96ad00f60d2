//! Caller-fed point-set source.

use crate::dataset::{DatasetKind, PointSet};
use crate::mtime::ModifiedTime;
use crate::producer::PointSetProducer;
use crate::FilterError;

/// A producer that serves a caller-provided dataset.
#[derive(Debug, Clone)]
pub struct PointSetSource {
    data: PointSet,
    output: PointSet,
    mtime: ModifiedTime,
    released: bool,
    release_data_flag: bool,
}

impl PointSetSource {
    /// Serve `data`.
    pub fn new(data: PointSet) -> Self {
        Self {
            output: data.clone(),
            data,
            mtime: ModifiedTime::now(),
            released: false,
            release_data_flag: false,
        }
    }

    /// Replace the served dataset.
    pub fn set_data(&mut self, data: PointSet) {
        self.output = data.clone();
        self.data = data;
        self.released = false;
        self.mtime.modified();
    }

    /// Ask consumers to release this source's output after reading it.
    pub fn set_release_data_flag(&mut self, release: bool) {
        self.release_data_flag = release;
    }
}

impl PointSetProducer for PointSetSource {
    fn update(&mut self) -> Result<bool, FilterError> {
        if !self.released {
            return Ok(false);
        }
        self.force_update()
    }

    fn force_update(&mut self) -> Result<bool, FilterError> {
        self.output = self.data.clone();
        self.released = false;
        self.mtime.modified();
        Ok(true)
    }

    fn output(&self) -> Option<&PointSet> {
        Some(&self.output)
    }

    fn output_kind(&self) -> Option<DatasetKind> {
        Some(self.data.kind())
    }

    fn mtime(&self) -> ModifiedTime {
        self.mtime
    }

    fn data_released(&self) -> bool {
        self.released
    }

    fn release_data(&mut self) {
        self.output.release();
        self.released = true;
    }

    fn should_release_data(&self) -> bool {
        self.release_data_flag
    }
}
