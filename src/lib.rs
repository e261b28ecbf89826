//! Hranol - batch filtering of grayscale image series
//!
//! Walks input folders, groups the images of each folder into a run, filters
//! every run through a two-pass pipeline and writes the results into a fresh
//! output folder per run. This library exposes modules for integration testing.

pub mod codec;
pub mod error;
pub mod models;
pub mod services;
