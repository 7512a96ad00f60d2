//! Generic point-set filter stage.

use crate::dataset::{DatasetKind, PointSet};
use crate::mtime::ModifiedTime;
use crate::producer::{PointSetProducer, ProducerPtr};
use crate::FilterError;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// The per-point work a [`PointSetFilter`] performs.
pub trait PointSetAlgorithm {
    /// Name used in diagnostics and errors.
    fn name(&self) -> &'static str;

    /// Fill `output`, which already holds a copy of the input's topology and
    /// points but no attributes.
    fn execute(&mut self, input: &PointSet, output: &mut PointSet) -> Result<(), FilterError>;
}

type Observer = Box<dyn FnMut()>;

/// A stage whose output has the same dataset kind as its input.
///
/// The output slot is created when an input is connected, typed after the
/// input's dataset kind. [`PointSetFilter::update`] re-executes the algorithm
/// only when the input or the filter changed since the last run.
pub struct PointSetFilter<A> {
    algorithm: A,
    input: Option<ProducerPtr>,
    output: Option<PointSet>,
    mtime: ModifiedTime,
    execute_time: ModifiedTime,
    data_released: bool,
    release_data_flag: bool,
    start_observer: Option<Observer>,
    end_observer: Option<Observer>,
    executions: u64,
}

impl<A: fmt::Debug> fmt::Debug for PointSetFilter<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointSetFilter")
            .field("algorithm", &self.algorithm)
            .field("has_input", &self.input.is_some())
            .field("output_kind", &self.output.as_ref().map(PointSet::kind))
            .field("mtime", &self.mtime)
            .field("execute_time", &self.execute_time)
            .field("executions", &self.executions)
            .finish()
    }
}

impl<A: PointSetAlgorithm> PointSetFilter<A> {
    /// Wrap `algorithm` with no input connected.
    pub fn new(algorithm: A) -> Self {
        Self {
            algorithm,
            input: None,
            output: None,
            mtime: ModifiedTime::now(),
            execute_time: ModifiedTime::NEVER,
            data_released: false,
            release_data_flag: false,
            start_observer: None,
            end_observer: None,
            executions: 0,
        }
    }

    /// The algorithm.
    pub fn algorithm(&self) -> &A {
        &self.algorithm
    }

    /// The algorithm, mutably. Marks the filter modified.
    pub fn algorithm_mut(&mut self) -> &mut A {
        self.mtime.modified();
        &mut self.algorithm
    }

    /// Connect `input`. Reconnecting the same stage is a no-op.
    pub fn set_input(&mut self, input: ProducerPtr) {
        let same = self
            .input
            .as_ref()
            .is_some_and(|current| std::ptr::addr_eq(Rc::as_ptr(current), Rc::as_ptr(&input)));
        if same {
            return;
        }

        // The input may be mid-update when a pipeline is rewired from a callback.
        let kind = input.try_borrow().ok().and_then(|input| input.output_kind());
        self.output = kind.map(PointSet::empty);
        if kind.is_none() {
            warn!(
                algorithm = self.algorithm.name(),
                "input has no dataset kind; output not created"
            );
        }
        self.input = Some(input);
        self.mtime.modified();
    }

    /// Disconnect the input and drop the output.
    pub fn clear_input(&mut self) {
        if self.input.take().is_some() {
            self.output = None;
            self.mtime.modified();
        }
    }

    /// Whether an input is connected.
    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }

    /// Run `observer` just before each execution.
    pub fn on_start(&mut self, observer: impl FnMut() + 'static) {
        self.start_observer = Some(Box::new(observer));
    }

    /// Run `observer` just after each successful execution.
    pub fn on_end(&mut self, observer: impl FnMut() + 'static) {
        self.end_observer = Some(Box::new(observer));
    }

    /// Ask consumers to release this filter's output after reading it.
    pub fn set_release_data_flag(&mut self, release: bool) {
        self.release_data_flag = release;
    }

    /// Mark the filter changed so the next update re-executes.
    pub fn modified(&mut self) {
        self.mtime.modified();
    }

    /// Number of times the algorithm ran.
    pub fn executions(&self) -> u64 {
        self.executions
    }

    /// Output viewed as `kind`, or `None` if the output is another kind.
    pub fn output_as(&self, kind: DatasetKind) -> Option<&PointSet> {
        self.output.as_ref().filter(|output| output.kind() == kind)
    }

    /// Pull the input up to date and re-execute if anything changed.
    ///
    /// Returns `Ok(true)` when the algorithm ran. An input that is already
    /// updating (a cycle in the pipeline) is left alone and `Ok(false)` is
    /// returned.
    pub fn update(&mut self) -> Result<bool, FilterError> {
        let input = self.input.clone().ok_or(FilterError::NoInput)?;
        if self.output.is_none() {
            return Err(FilterError::NoOutput);
        }

        let Ok(mut upstream) = input.try_borrow_mut() else {
            debug!(algorithm = self.algorithm.name(), "input already updating");
            return Ok(false);
        };
        upstream.update()?;

        let stale = upstream.mtime() > self.execute_time || self.mtime > self.execute_time;
        if stale {
            if upstream.data_released() {
                upstream.force_update()?;
            }
            if let Some(observer) = self.start_observer.as_mut() {
                observer();
            }

            let source = upstream.output().ok_or(FilterError::MissingInputData)?;
            let output = self
                .output
                .get_or_insert_with(|| PointSet::empty(source.kind()));
            output.copy_structure(source);
            self.algorithm.execute(source, output)?;

            self.execute_time.modified();
            self.data_released = false;
            self.executions += 1;
            debug!(
                algorithm = self.algorithm.name(),
                points = source.point_count(),
                "filter executed"
            );
            if let Some(observer) = self.end_observer.as_mut() {
                observer();
            }
        }

        if upstream.should_release_data() {
            upstream.release_data();
        }
        Ok(stale)
    }
}

impl<A: PointSetAlgorithm> PointSetProducer for PointSetFilter<A> {
    fn update(&mut self) -> Result<bool, FilterError> {
        PointSetFilter::update(self)
    }

    fn force_update(&mut self) -> Result<bool, FilterError> {
        self.mtime.modified();
        PointSetFilter::update(self)
    }

    fn output(&self) -> Option<&PointSet> {
        self.output.as_ref()
    }

    fn output_kind(&self) -> Option<DatasetKind> {
        self.output.as_ref().map(PointSet::kind)
    }

    fn mtime(&self) -> ModifiedTime {
        self.mtime.max(self.execute_time)
    }

    fn data_released(&self) -> bool {
        self.data_released
    }

    fn release_data(&mut self) {
        if let Some(output) = self.output.as_mut() {
            output.release();
        }
        self.data_released = true;
        // Released output must be rebuilt by the next update.
        self.mtime.modified();
    }

    fn should_release_data(&self) -> bool {
        self.release_data_flag
    }
}
