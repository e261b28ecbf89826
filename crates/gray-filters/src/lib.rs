//! gray-filters: filters for batches of 8-bit grayscale images
//!
//! This crate holds the pixel side of hranol: an owned 8-bit buffer type
//! and the filters that transform it. It has no knowledge of files,
//! directories or codecs; callers decode images into [`GrayBuffer`]s and
//! hand them to filters.
//!
//! # Two kinds of filters
//!
//! Every filter implements [`Filter`] (`apply_to` + `description`). Filters
//! then fall into exactly one of two refinements:
//!
//! - [`PureFilter`]: no run state. The output for an image depends only on
//!   the image and the filter parameters ([`MaskFilter`], [`RescaleFilter`]).
//! - [`PrecomputingFilter`]: needs to see every image of a run before it can
//!   filter any of them ([`BackgroundSubtraction`]). The driver calls
//!   [`clear()`](PrecomputingFilter::clear) at the start of a run, feeds each
//!   image to [`precompute_from()`](PrecomputingFilter::precompute_from), and
//!   only then calls `apply_to` on each image.
//!
//! ```text
//! clear()
//!    |
//!    v
//! precompute_from(img_0) .. precompute_from(img_n)   (accumulating)
//!    |
//!    v
//! apply_to(img_0)   -- computes and caches the aggregate
//! apply_to(img_1)   -- reuses the cached aggregate
//!    ...
//!    |
//!    v
//! clear()           -- next run
//! ```
//!
//! # Example
//!
//! ```
//! use gray_filters::{Filter, GrayBuffer, RescaleFilter};
//!
//! let mut filter = RescaleFilter::new(10, 200).unwrap();
//! let mut image = GrayBuffer::new(2, 1, vec![5, 250]).unwrap();
//!
//! filter.apply_to(&mut image).unwrap();
//! assert_eq!(image.as_slice(), &[0, 255]);
//! ```

pub mod buffer;
pub mod error;
pub mod filter;


pub use buffer::{GrayBuffer, Shape};
pub use error::FilterError;
pub use filter::{
    rescale_table, BackgroundSubtraction, Filter, LookupTable, MaskFilter, PrecomputingFilter,
    PureFilter, RescaleFilter,
};
