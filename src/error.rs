use std::path::PathBuf;

use gray_filters::FilterError;
use thiserror::Error;

/// Invalid configuration, detected before any run starts
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid filter parameters: {0}")]
    Filter(#[from] FilterError),

    #[error("Both range begin and end must be specified for rescale filter")]
    IncompleteRescaleRange,

    #[error("Invalid filename regex: {0}")]
    FilenamePattern(#[from] regex::Error),

    #[error("Folder prefix must not be empty")]
    EmptyFolderPrefix,

    #[error("Unable to open mask filter {path}: {source}")]
    Mask {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Reading image {path} failed: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Writing image {path} failed: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Buffer for {path} has an unsupported layout: {reason}")]
    Layout { path: PathBuf, reason: String },
}

/// Failure of an image store operation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Image index {index} out of range (run has {size} images)")]
    IndexOutOfRange { index: usize, size: usize },

    #[error("Cannot load image {requested}: image {resident} is still loaded")]
    SlotOccupied { resident: usize, requested: usize },

    #[error("Image {index} is not loaded")]
    NotLoaded { index: usize },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Failure while turning a directory into a run
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Path {0} is not a directory")]
    DirectoryNotFound(PathBuf),

    #[error("Suitable name for output directory of {origin} could not be found")]
    NamingExhausted { origin: PathBuf },

    #[error("Failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to resolve {path}: {source}")]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure on a single image, before it is annotated with the image path
#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Filter(#[from] FilterError),
}

/// Failure of a run inside the filter pipeline
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Precomputing failed for image {path}: {source}")]
    Precompute {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("Applying filter(s) failed for image {path}: {source}")]
    Apply {
        path: PathBuf,
        #[source]
        source: ImageError,
    },

    #[error("Failed to write log {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that makes the batch loop skip a run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    #[error(transparent)]
    Process(#[from] ProcessError),
}
