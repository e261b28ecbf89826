//! Static background subtraction.
//!
//! The background of a run is estimated as the per-sample mean of all its
//! images, scaled by a removal factor. Each image then has this factored
//! mean subtracted with saturation at zero.

use super::{Filter, PrecomputingFilter};
use crate::buffer::{GrayBuffer, Shape};
use crate::error::FilterError;

/// Running per-sample sum, shaped by the first image it sees.
#[derive(Debug, Clone)]
struct Accumulator {
    shape: Shape,
    sums: Vec<f32>,
    count: usize,
}

impl Accumulator {
    fn zeros(shape: Shape) -> Self {
        Self {
            shape,
            sums: vec![0.0; shape.len()],
            count: 0,
        }
    }

    fn add(&mut self, image: &GrayBuffer) -> Result<(), FilterError> {
        if image.shape() != self.shape {
            return Err(FilterError::DimensionMismatch {
                subject: "background accumulator",
                expected: self.shape,
                actual: image.shape(),
            });
        }
        for (sum, &sample) in self.sums.iter_mut().zip(image.as_slice()) {
            *sum += sample as f32;
        }
        self.count += 1;
        Ok(())
    }

    // sums / (count / factor), rounded half to even and saturated to u8
    fn factored_mean(&self, factor: f64) -> GrayBuffer {
        let divisor = self.count as f64 / factor;
        let data = self
            .sums
            .iter()
            .map(|&sum| (sum as f64 / divisor).round_ties_even().clamp(0.0, 255.0) as u8)
            .collect();
        GrayBuffer::from_shape(self.shape, data)
    }
}

/// Precomputing filter subtracting `factor * mean` of the run.
///
/// State per run:
///
/// - after [`clear()`](PrecomputingFilter::clear): no images, no mean
/// - after `precompute_from`: images counted, mean invalid
/// - after the first `apply_to`: mean computed and cached; the accumulator
///   is left untouched
///
/// With no precomputed images `apply_to` leaves the image unchanged.
#[derive(Debug, Clone)]
pub struct BackgroundSubtraction {
    factor: f64,
    accumulator: Option<Accumulator>,
    factored_mean: Option<GrayBuffer>,
}

impl BackgroundSubtraction {
    /// Create the filter with the given removal factor.
    ///
    /// Fails if `factor <= 0` (or is NaN).
    pub fn new(factor: f64) -> Result<Self, FilterError> {
        if factor.is_nan() || factor <= 0.0 {
            return Err(FilterError::InvalidRemovalFactor(factor));
        }
        Ok(Self {
            factor,
            accumulator: None,
            factored_mean: None,
        })
    }

    #[inline]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Number of images folded in since the last clear.
    #[inline]
    pub fn count(&self) -> usize {
        self.accumulator.as_ref().map_or(0, |acc| acc.count)
    }

    /// The cached factored mean, if `apply_to` has computed it.
    pub fn factored_mean(&self) -> Option<&GrayBuffer> {
        self.factored_mean.as_ref()
    }
}

impl Filter for BackgroundSubtraction {
    fn apply_to(&mut self, image: &mut GrayBuffer) -> Result<(), FilterError> {
        // Nothing precomputed since the last clear
        let Some(accumulator) = &self.accumulator else {
            return Ok(());
        };
        let factor = self.factor;
        let mean = self
            .factored_mean
            .get_or_insert_with(|| accumulator.factored_mean(factor));

        if image.shape() != mean.shape() {
            return Err(FilterError::DimensionMismatch {
                subject: "background mean",
                expected: mean.shape(),
                actual: image.shape(),
            });
        }

        for (sample, &background) in image.as_mut_slice().iter_mut().zip(mean.as_slice()) {
            *sample = sample.saturating_sub(background);
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Background subtraction with factor {:.6}", self.factor)
    }
}

impl PrecomputingFilter for BackgroundSubtraction {
    fn clear(&mut self) {
        self.accumulator = None;
        self.factored_mean = None;
    }

    fn precompute_from(&mut self, image: &GrayBuffer) -> Result<(), FilterError> {
        self.factored_mean = None;
        self.accumulator
            .get_or_insert_with(|| Accumulator::zeros(image.shape()))
            .add(image)
    }
}
