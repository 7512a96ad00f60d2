#![warn(missing_docs)]
//! Demand-driven point-set pipeline.
//!
//! Producers ([`PointSetSource`], [`WaveletSource`], [`PointSetFilter`]) are
//! chained through shared handles. Updating the last stage pulls updates
//! through the chain, and a stage re-executes only when its input or its own
//! parameters changed since it last ran.

mod dataset;
mod filter;
mod mtime;
mod producer;
mod source;
mod warp;
mod wavelet;

use thiserror::Error;

pub use dataset::{DatasetKind, PointSet, Structure};
pub use filter::{PointSetAlgorithm, PointSetFilter};
pub use mtime::ModifiedTime;
pub use producer::{producer_ptr, PointSetProducer, ProducerPtr};
pub use source::PointSetSource;
pub use warp::WarpScalar;
pub use wavelet::WaveletSource;

/// Pipeline failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// Update was requested before an input was connected.
    #[error("no input; connect an input before updating")]
    NoInput,
    /// The input could not report a dataset kind, so no output exists.
    #[error("no output has been created; the input has no dataset kind")]
    NoOutput,
    /// The input updated but has no dataset to read.
    #[error("input produced no data")]
    MissingInputData,
    /// The algorithm rejected its input.
    #[error("{algorithm} failed: {reason}")]
    Execute {
        /// Algorithm name.
        algorithm: &'static str,
        /// What was wrong.
        reason: String,
    },
}
