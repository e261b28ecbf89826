//! Owned 8-bit pixel buffer.
//!
//! [`GrayBuffer`] stores samples row-major and tightly packed: the sample for
//! channel `c` of pixel `(x, y)` lives at `(y * width + x) * channels + c`.
//! Decoded images are single-channel; the channel count is carried so that
//! shape checks can report it.

use crate::error::FilterError;
use std::fmt;

/// Width, height and channel count of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl Shape {
    /// Number of samples (`width * height * channels`).
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height * self.channels
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if both shapes cover the same pixel grid, ignoring channels.
    #[inline]
    pub fn same_size(&self, other: &Shape) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} ({} channel{})",
            self.width,
            self.height,
            self.channels,
            if self.channels == 1 { "" } else { "s" }
        )
    }
}

/// Owned 8-bit buffer with unsigned sample semantics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayBuffer {
    shape: Shape,
    data: Vec<u8>,
}

impl GrayBuffer {
    /// Construct a single-channel buffer from raw row-major bytes.
    ///
    /// Fails if `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, FilterError> {
        Self::with_channels(width, height, 1, data)
    }

    /// Construct an interleaved multi-channel buffer from raw bytes.
    ///
    /// Fails if `channels == 0` or `data.len() != width * height * channels`.
    pub fn with_channels(
        width: usize,
        height: usize,
        channels: usize,
        data: Vec<u8>,
    ) -> Result<Self, FilterError> {
        if channels == 0 {
            return Err(FilterError::ZeroChannels);
        }
        let shape = Shape {
            width,
            height,
            channels,
        };
        if data.len() != shape.len() {
            return Err(FilterError::BufferLength {
                expected: shape.len(),
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Buffer from data already known to fit `shape`.
    pub(crate) fn from_shape(shape: Shape, data: Vec<u8>) -> Self {
        debug_assert_eq!(shape.len(), data.len());
        Self { shape, data }
    }

    /// Single-channel buffer with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            shape: Shape {
                width,
                height,
                channels: 1,
            },
            data: vec![value; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.shape.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.shape.height
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Sample at `(x, y)` of the first channel.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the buffer.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[(y * self.shape.width + x) * self.shape.channels]
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the buffer and return the raw samples.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}
