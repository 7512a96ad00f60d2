//! Pipeline producer interface and shared handles.

use crate::dataset::{DatasetKind, PointSet};
use crate::mtime::ModifiedTime;
use crate::FilterError;
use std::cell::RefCell;
use std::rc::Rc;

/// A pipeline stage that produces a [`PointSet`].
pub trait PointSetProducer {
    /// Bring the output up to date. Returns whether any work was done.
    fn update(&mut self) -> Result<bool, FilterError>;

    /// Regenerate the output even if it looks current.
    fn force_update(&mut self) -> Result<bool, FilterError>;

    /// Current output, if one exists.
    fn output(&self) -> Option<&PointSet>;

    /// Kind of dataset this stage produces, known before the first update
    /// when possible.
    fn output_kind(&self) -> Option<DatasetKind>;

    /// Time the output last changed or was invalidated.
    fn mtime(&self) -> ModifiedTime;

    /// Whether the output's arrays were dropped to save memory.
    fn data_released(&self) -> bool;

    /// Drop the output's arrays; the next update regenerates them.
    fn release_data(&mut self);

    /// Whether a consumer should release this stage's data after reading it.
    fn should_release_data(&self) -> bool;
}

/// Shared handle used to connect stages.
pub type ProducerPtr = Rc<RefCell<dyn PointSetProducer>>;

/// Wrap a stage for sharing, keeping a typed handle alongside.
pub fn producer_ptr<P: PointSetProducer + 'static>(producer: P) -> (Rc<RefCell<P>>, ProducerPtr) {
    let typed = Rc::new(RefCell::new(producer));
    let shared: ProducerPtr = typed.clone();
    (typed, shared)
}
