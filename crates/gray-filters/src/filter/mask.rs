//! Fixed binary mask.

use super::{Filter, PureFilter};
use crate::buffer::GrayBuffer;
use crate::error::FilterError;

/// Pure filter zeroing every pixel where the mask is zero.
///
/// Pixels where the mask is non-zero are left unchanged. The mask must have
/// the same width and height as every filtered image; its first channel
/// decides for all channels of the image.
#[derive(Debug, Clone)]
pub struct MaskFilter {
    source: String,
    mask: GrayBuffer,
}

impl MaskFilter {
    /// Create a mask filter from an already decoded mask.
    ///
    /// `source` names where the mask came from and appears in the
    /// description.
    pub fn new(source: impl Into<String>, mask: GrayBuffer) -> Self {
        Self {
            source: source.into(),
            mask,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mask(&self) -> &GrayBuffer {
        &self.mask
    }
}

impl Filter for MaskFilter {
    fn apply_to(&mut self, image: &mut GrayBuffer) -> Result<(), FilterError> {
        if !image.shape().same_size(&self.mask.shape()) {
            return Err(FilterError::DimensionMismatch {
                subject: "mask",
                expected: self.mask.shape(),
                actual: image.shape(),
            });
        }

        let mask_channels = self.mask.channels();
        let channels = image.channels();
        let mask = self.mask.as_slice();
        for (pixel, samples) in image.as_mut_slice().chunks_exact_mut(channels).enumerate() {
            if mask[pixel * mask_channels] == 0 {
                samples.fill(0);
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Mask with source {}", self.source)
    }
}

impl PureFilter for MaskFilter {}
