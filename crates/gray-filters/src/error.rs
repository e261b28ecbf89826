//! Error type for buffer construction and filter operations.

use crate::buffer::Shape;
use std::fmt;

/// Error returned by filter construction and application.
///
/// Construction errors ([`InvalidRescaleRange`](FilterError::InvalidRescaleRange),
/// [`InvalidRemovalFactor`](FilterError::InvalidRemovalFactor)) describe bad
/// parameters. [`DimensionMismatch`](FilterError::DimensionMismatch) is raised
/// while filtering when an image does not fit the state a filter holds.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Rescale bounds outside `0 <= low <= high <= 255`
    InvalidRescaleRange {
        low: i32,
        high: i32,
    },
    /// Background removal factor that is not strictly positive
    InvalidRemovalFactor(f64),
    /// Image shape differs from the shape a filter was built or primed with
    DimensionMismatch {
        /// What the image was compared against ("mask", "background mean", ...)
        subject: &'static str,
        expected: Shape,
        actual: Shape,
    },
    /// Buffer declared with zero samples per pixel
    ZeroChannels,
    /// Raw data length does not match the declared shape
    BufferLength {
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::InvalidRescaleRange { low, high } => {
                write!(f, "invalid range for contrast filter [{}, {}]", low, high)
            }
            FilterError::InvalidRemovalFactor(factor) => {
                write!(
                    f,
                    "background subtraction factor must be positive: {}",
                    factor
                )
            }
            FilterError::DimensionMismatch {
                subject,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "size or number of channels did not match: {} is {}, image is {}",
                    subject, expected, actual
                )
            }
            FilterError::ZeroChannels => write!(f, "buffer must have at least one channel"),
            FilterError::BufferLength { expected, actual } => {
                write!(
                    f,
                    "buffer length mismatch: expected {} samples, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for FilterError {}
