use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::StoreError;

/// How an image store holds decoded buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MemoryStrategy {
    /// Every image stays decoded for the whole run
    #[default]
    Resident,
    /// At most one decoded image at a time ("ram friendly")
    SingleSlot,
}

/// Crawler queue entry: a directory relative to one of the base folders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDirectory {
    /// Index into the crawler's base folders
    pub base_index: usize,
    /// Path below that base folder (empty for the base itself)
    pub relative: PathBuf,
}

impl PendingDirectory {
    pub fn base(base_index: usize) -> Self {
        Self {
            base_index,
            relative: PathBuf::new(),
        }
    }

    pub fn child(&self, name: impl AsRef<Path>) -> Self {
        Self {
            base_index: self.base_index,
            relative: self.relative.join(name),
        }
    }
}

/// One directory's matching images and the directory their output goes to
#[derive(Debug)]
pub struct Run {
    origin: PathBuf,
    destination: PathBuf,
    images: Vec<PathBuf>,
    destination_created: bool,
}

impl Run {
    pub fn new(origin: PathBuf, destination: PathBuf, images: Vec<PathBuf>) -> Self {
        Self {
            origin,
            destination,
            images,
            destination_created: false,
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn image_path(&self, index: usize) -> Result<&Path, StoreError> {
        self.images
            .get(index)
            .map(PathBuf::as_path)
            .ok_or(StoreError::IndexOutOfRange {
                index,
                size: self.images.len(),
            })
    }

    /// Where the filtered copy of image `index` is written
    pub fn output_path(&self, index: usize) -> Result<PathBuf, StoreError> {
        let source = self.image_path(index)?;
        let name = source.file_name().unwrap_or(source.as_os_str());
        Ok(self.destination.join(name))
    }

    pub fn destination_created(&self) -> bool {
        self.destination_created
    }

    /// Create the destination directory (and parents) once per run
    pub fn ensure_destination(&mut self) -> Result<(), StoreError> {
        if self.destination_created {
            return Ok(());
        }
        fs::create_dir_all(&self.destination).map_err(|source| StoreError::CreateDestination {
            path: self.destination.clone(),
            source,
        })?;
        tracing::debug!(path = %self.destination.display(), "Created output directory");
        self.destination_created = true;
        Ok(())
    }
}
