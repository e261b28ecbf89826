//! Filter capabilities and the concrete filters.
//!
//! # Architecture
//!
//! [`Filter`] is the shared capability. [`PureFilter`] and
//! [`PrecomputingFilter`] are disjoint refinements: a driver keeps one
//! ordered collection per refinement because their place in the pipeline
//! differs. Precomputing filters are applied before pure filters.

mod background;
mod mask;
mod rescale;

pub use background::BackgroundSubtraction;
pub use mask::MaskFilter;
pub use rescale::{rescale_table, LookupTable, RescaleFilter};

use crate::buffer::GrayBuffer;
use crate::error::FilterError;

/// A transformation of an 8-bit buffer, applied in place.
pub trait Filter {
    /// Filter `image` in place.
    fn apply_to(&mut self, image: &mut GrayBuffer) -> Result<(), FilterError>;

    /// Human-readable description, one line.
    fn description(&self) -> String;
}

/// Filter without run state; each image is filtered independently.
pub trait PureFilter: Filter {}

/// Filter that aggregates over every image of a run before applying.
///
/// The aggregate is owned by the filter instance. Drivers must call
/// [`clear()`](Self::clear) at the start of every run so that one instance
/// can serve many runs.
pub trait PrecomputingFilter: Filter {
    /// Reset the aggregate to its initial, empty state.
    fn clear(&mut self);

    /// Fold one image into the aggregate.
    fn precompute_from(&mut self, image: &GrayBuffer) -> Result<(), FilterError>;
}
