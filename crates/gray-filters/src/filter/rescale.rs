//! Contrast rescaling through a 256-entry lookup table.

use super::{Filter, PureFilter};
use crate::buffer::GrayBuffer;
use crate::error::FilterError;

/// Maps an 8-bit input intensity to an 8-bit output intensity.
pub type LookupTable = [u8; 256];

/// Build the rescale table for the range `[low, high]`.
///
/// Values below `low` map to 0, values above `high` map to 255, and values
/// inside the range are spread over `(0, 255)` with
/// `((v - low + 1) * 255) / (high - low + 2)` (truncating division). The
/// table is monotonically non-decreasing.
///
/// # Panics (debug only)
///
/// Debug-asserts that `low <= high`.
pub fn rescale_table(low: u8, high: u8) -> LookupTable {
    debug_assert!(low <= high, "rescale_table: low {low} > high {high}");

    let (low, high) = (low as u32, high as u32);
    let mut table = [0u8; 256];
    for (v, out) in table.iter_mut().enumerate() {
        let v = v as u32;
        *out = if v < low {
            0
        } else if v > high {
            255
        } else {
            (((v - low + 1) * 255) / (high - low + 2)) as u8
        };
    }
    table
}

/// Pure filter stretching `[low, high]` to the full 8-bit range.
///
/// The lookup table is built on first use and cached. Only 8-bit buffers
/// exist in this crate, so the depth requirement of a lookup-table
/// transform holds by construction.
#[derive(Debug, Clone)]
pub struct RescaleFilter {
    low: u8,
    high: u8,
    lut: Option<LookupTable>,
}

impl RescaleFilter {
    /// Create a rescale filter for `[low, high]`.
    ///
    /// Fails unless `0 <= low <= high <= 255`.
    pub fn new(low: i32, high: i32) -> Result<Self, FilterError> {
        if low < 0 || high > 255 || low > high {
            return Err(FilterError::InvalidRescaleRange { low, high });
        }
        Ok(Self {
            low: low as u8,
            high: high as u8,
            lut: None,
        })
    }

    #[inline]
    pub fn low(&self) -> u8 {
        self.low
    }

    #[inline]
    pub fn high(&self) -> u8 {
        self.high
    }

    /// The lookup table, built on first access.
    pub fn lookup_table(&mut self) -> &LookupTable {
        let (low, high) = (self.low, self.high);
        self.lut.get_or_insert_with(|| rescale_table(low, high))
    }
}

impl Filter for RescaleFilter {
    fn apply_to(&mut self, image: &mut GrayBuffer) -> Result<(), FilterError> {
        let lut = *self.lookup_table();
        for sample in image.as_mut_slice() {
            *sample = lut[*sample as usize];
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Contrast filter with range [{}, {}]", self.low, self.high)
    }
}

impl PureFilter for RescaleFilter {}
