use std::path::{Path, PathBuf};

use gray_filters::{BackgroundSubtraction, MaskFilter, RescaleFilter};
use serde::Deserialize;

use crate::codec::ImageCodec;
use crate::error::ConfigError;
use crate::models::MemoryStrategy;
use crate::services::{CrawlOptions, ImageProcessor};

/// Prefix of output folders, also used to recognise them while crawling
pub const DEFAULT_FOLDER_PREFIX: &str = "fltrd";

/// Matches common raster image file names
pub const DEFAULT_FNAME_REGEX: &str = r".*\.(jpe?g|gif|tif|tiff|png|bmp)";

/// Application configuration, from an optional YAML file plus CLI overrides
#[derive(Debug, Deserialize, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Folders to process
    pub folders: Vec<PathBuf>,

    /// Explicit output root; output goes next to the input when unset
    pub output: Option<PathBuf>,

    /// Prefix of output folder names
    pub folder_prefix: String,

    /// Filename filter, must match the whole file name
    pub fname_regex: String,

    /// Also crawl folders whose name starts with `folder_prefix`
    pub include_prefixed: bool,

    /// Descend into subfolders
    pub recursive: bool,

    /// How decoded images are held during a run
    pub memory: MemoryStrategy,

    /// Filters to enable
    pub filters: FilterConfig,
}

/// Filters to enable; every field is optional
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Mask image applied to every image
    pub mask: Option<PathBuf>,

    /// Static background subtraction factor
    pub static_noise: Option<f64>,

    /// Lower bound of the contrast rescale range
    pub rescale_begin: Option<i32>,

    /// Upper bound of the contrast rescale range
    pub rescale_end: Option<i32>,
}

impl FilterConfig {
    /// The rescale range, if configured; one-sided ranges are an error
    pub fn rescale_range(&self) -> Result<Option<(i32, i32)>, ConfigError> {
        match (self.rescale_begin, self.rescale_end) {
            (Some(begin), Some(end)) => Ok(Some((begin, end))),
            (None, None) => Ok(None),
            _ => Err(ConfigError::IncompleteRescaleRange),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            folders = config.folders.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Check every parameter that can be checked without touching the filesystem
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.crawl_options()?;
        if let Some((begin, end)) = self.filters.rescale_range()? {
            RescaleFilter::new(begin, end)?;
        }
        if let Some(factor) = self.filters.static_noise {
            BackgroundSubtraction::new(factor)?;
        }
        Ok(())
    }

    /// Crawler options derived from this configuration
    pub fn crawl_options(&self) -> Result<CrawlOptions, ConfigError> {
        if self.folder_prefix.is_empty() {
            return Err(ConfigError::EmptyFolderPrefix);
        }
        Ok(CrawlOptions::new(&self.folder_prefix, &self.fname_regex)?
            .include_prefixed(self.include_prefixed)
            .recursive(self.recursive)
            .memory(self.memory)
            .output_root(self.output.clone()))
    }

    /// Build the processor with every configured filter.
    ///
    /// Registration order is mask, background subtraction, rescale. The mask
    /// image is decoded here, so an unreadable mask fails before any run.
    pub fn build_processor(&self, codec: &dyn ImageCodec) -> Result<ImageProcessor, ConfigError> {
        self.validate()?;
        let mut processor = ImageProcessor::new();

        if let Some(path) = &self.filters.mask {
            let mask = codec.decode(path).map_err(|source| ConfigError::Mask {
                path: path.clone(),
                source,
            })?;
            processor.add_pure_filter(Box::new(MaskFilter::new(
                path.display().to_string(),
                mask,
            )));
        }

        if let Some(factor) = self.filters.static_noise {
            processor.add_precomputing_filter(Box::new(BackgroundSubtraction::new(factor)?));
        }

        if let Some((begin, end)) = self.filters.rescale_range()? {
            processor.add_pure_filter(Box::new(RescaleFilter::new(begin, end)?));
        }

        Ok(processor)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            output: None,
            folder_prefix: DEFAULT_FOLDER_PREFIX.to_string(),
            fname_regex: DEFAULT_FNAME_REGEX.to_string(),
            include_prefixed: false,
            recursive: false,
            memory: MemoryStrategy::Resident,
            filters: FilterConfig::default(),
        }
    }
}
