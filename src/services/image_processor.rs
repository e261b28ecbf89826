//! Two-pass filter pipeline over one run.
//!
//! Every run starts by clearing the precomputing filters. If any are
//! registered, each image is loaded once to feed their aggregates. Then each
//! image is loaded again, passed through the precomputing filters and then
//! the pure filters (both in registration order), and saved. A failure on
//! any image aborts the run. After the last save, a manifest listing the
//! filters is written into the destination.

use std::fmt;
use std::path::PathBuf;

use gray_filters::{PrecomputingFilter, PureFilter};

use crate::error::{ImageError, ProcessError};
use crate::services::image_store::{checkout, ImageStore};
use crate::services::manifest::write_manifest;

/// Ordered filter registry applied to every run
#[derive(Default)]
pub struct ImageProcessor {
    pure: Vec<Box<dyn PureFilter>>,
    precomputing: Vec<Box<dyn PrecomputingFilter>>,
}

impl fmt::Debug for ImageProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageProcessor")
            .field("filters", &self.descriptions())
            .finish()
    }
}

impl ImageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pure_filter(&mut self, filter: Box<dyn PureFilter>) {
        self.pure.push(filter);
    }

    pub fn add_precomputing_filter(&mut self, filter: Box<dyn PrecomputingFilter>) {
        self.precomputing.push(filter);
    }

    pub fn is_empty(&self) -> bool {
        self.pure.is_empty() && self.precomputing.is_empty()
    }

    /// Filter descriptions, precomputing filters first
    pub fn descriptions(&self) -> Vec<String> {
        self.precomputing
            .iter()
            .map(|f| f.description())
            .chain(self.pure.iter().map(|f| f.description()))
            .collect()
    }

    /// Filter every image of `store` and write the manifest.
    ///
    /// Does nothing for a run without images: no directory, no manifest.
    pub fn apply_filters<S: ImageStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<(), ProcessError> {
        let size = store.size();
        if size == 0 {
            return Ok(());
        }

        for filter in &mut self.precomputing {
            filter.clear();
        }

        if !self.precomputing.is_empty() {
            for index in 0..size {
                tracing::debug!(image = index + 1, total = size, "Precomputing");
                self.precompute_image(store, index)
                    .map_err(|source| ProcessError::Precompute {
                        path: image_path(store, index),
                        source,
                    })?;
            }
        }

        for index in 0..size {
            tracing::debug!(image = index + 1, total = size, "Filtering");
            self.filter_image(store, index)
                .map_err(|source| ProcessError::Apply {
                    path: image_path(store, index),
                    source,
                })?;
        }

        let destination = store.destination();
        write_manifest(destination, &self.descriptions()).map_err(|source| {
            ProcessError::Manifest {
                path: destination.to_path_buf(),
                source,
            }
        })?;
        Ok(())
    }

    fn precompute_image<S: ImageStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: usize,
    ) -> Result<(), ImageError> {
        let mut image = checkout(store, index)?;
        let buffer = image.image()?;
        for filter in &mut self.precomputing {
            filter.precompute_from(buffer)?;
        }
        Ok(())
    }

    fn filter_image<S: ImageStore + ?Sized>(
        &mut self,
        store: &mut S,
        index: usize,
    ) -> Result<(), ImageError> {
        let mut image = checkout(store, index)?;
        let buffer = image.image()?;
        for filter in &mut self.precomputing {
            filter.apply_to(buffer)?;
        }
        for filter in &mut self.pure {
            filter.apply_to(buffer)?;
        }
        image.save()?;
        Ok(())
    }
}

fn image_path<S: ImageStore + ?Sized>(store: &S, index: usize) -> PathBuf {
    store
        .image_path(index)
        .map(|path| path.to_path_buf())
        .unwrap_or_default()
}
