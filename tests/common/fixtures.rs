//! Test fixtures: image folder trees in temporary directories.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gray_filters::GrayBuffer;
use hranol::codec::{FileCodec, ImageCodec};
use hranol::models::AppConfig;
use hranol::services::{process_all, BatchSummary, FolderCrawler};
use tempfile::TempDir;

/// Pixel values of the standard 2x2 test image
pub const RAMP: [u8; 4] = [5, 100, 200, 250];

/// A folder tree of images below a temporary directory
pub struct ImageTree {
    dir: TempDir,
}

impl ImageTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Create a (possibly nested) folder
    pub fn folder(&self, relative: &str) -> PathBuf {
        let path = self.join(relative);
        fs::create_dir_all(&path).expect("Failed to create folder");
        path
    }

    /// Write a 2x2 grayscale image with the given samples
    pub fn image(&self, relative: &str, samples: [u8; 4]) -> PathBuf {
        let buffer = GrayBuffer::new(2, 2, samples.to_vec()).expect("Invalid test image");
        self.image_buffer(relative, &buffer)
    }

    pub fn image_buffer(&self, relative: &str, buffer: &GrayBuffer) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create folder");
        }
        FileCodec
            .encode(buffer, &path)
            .expect("Failed to write test image");
        path
    }

    /// Write a non-image file
    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create folder");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }
}

/// Run the whole pipeline for `config`, as the binary does
pub fn run_batch(config: &AppConfig) -> BatchSummary {
    let codec: Arc<dyn ImageCodec> = Arc::new(FileCodec);
    let mut processor = config
        .build_processor(codec.as_ref())
        .expect("Invalid test configuration");
    let options = config.crawl_options().expect("Invalid crawl options");
    let crawler = FolderCrawler::new(config.folders.clone(), options, codec);
    process_all(crawler, &mut processor)
}

/// Default configuration processing `folders`
pub fn config_for(folders: &[PathBuf]) -> AppConfig {
    AppConfig {
        folders: folders.to_vec(),
        ..Default::default()
    }
}
