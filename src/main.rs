use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hranol::codec::{FileCodec, ImageCodec};
use hranol::models::AppConfig;
use hranol::services::{process_all, FolderCrawler};

#[derive(Parser)]
#[command(name = "hranol", version)]
#[command(
    about = "Batch filtering of grayscale image series",
    long_about = "Applies the selected filters to every image in the given folders. \
                  Output of each folder is saved to a new subfolder named after the \
                  folder prefix, or below --output when given."
)]
struct Cli {
    /// Folders to process
    folders: Vec<PathBuf>,

    /// YAML configuration file; command line options take precedence
    #[arg(short, long, env = "HRANOL_CONFIG")]
    config: Option<PathBuf>,

    /// Write output below this folder instead of next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Prefix of output folders [default: fltrd]
    #[arg(short = 'p', long)]
    folder_prefix: Option<String>,

    /// Regex a file name must match as a whole to be processed
    #[arg(short = 'f', long)]
    fname_regex: Option<String>,

    /// Also process folders starting with the folder prefix
    #[arg(short = 'i', long = "incl-fltrd")]
    include_prefixed: bool,

    /// Descend into subfolders
    #[arg(short, long)]
    recursive: bool,

    /// Keep at most one decoded image in memory
    #[arg(long)]
    ram_friendly: bool,

    /// Mask image; pixels where the mask is black are zeroed
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Subtract the run's mean image multiplied by this factor
    #[arg(short = 's', long = "static-noise")]
    static_noise: Option<f64>,

    /// Lower bound of the contrast rescale range
    #[arg(short = 'b', long)]
    rescale_begin: Option<i32>,

    /// Upper bound of the contrast rescale range
    #[arg(short = 'e', long)]
    rescale_end: Option<i32>,
}

impl Cli {
    /// Configuration file values with command line values applied on top
    fn into_config(self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };

        config.folders.extend(self.folders);
        if self.output.is_some() {
            config.output = self.output;
        }
        if let Some(prefix) = self.folder_prefix {
            config.folder_prefix = prefix;
        }
        if let Some(regex) = self.fname_regex {
            config.fname_regex = regex;
        }
        config.include_prefixed |= self.include_prefixed;
        config.recursive |= self.recursive;
        if self.ram_friendly {
            config.memory = hranol::models::MemoryStrategy::SingleSlot;
        }

        let filters = &mut config.filters;
        if self.mask.is_some() {
            filters.mask = self.mask;
        }
        if self.static_noise.is_some() {
            filters.static_noise = self.static_noise;
        }
        if self.rescale_begin.is_some() {
            filters.rescale_begin = self.rescale_begin;
        }
        if self.rescale_end.is_some() {
            filters.rescale_end = self.rescale_end;
        }

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hranol=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = Cli::parse().into_config()?;
    if config.folders.is_empty() {
        anyhow::bail!("No folders to process");
    }

    let codec: Arc<dyn ImageCodec> = Arc::new(FileCodec);
    let mut processor = config.build_processor(codec.as_ref())?;
    let options = config.crawl_options()?;

    if processor.is_empty() {
        tracing::warn!("No filters selected, images are copied unchanged");
    }
    for description in processor.descriptions() {
        tracing::info!(filter = %description, "Using filter");
    }

    let crawler = FolderCrawler::new(config.folders.clone(), options, codec);
    let summary = process_all(crawler, &mut processor);

    tracing::info!(
        processed = summary.processed,
        empty = summary.empty,
        failed = summary.failed,
        "Done"
    );
    Ok(())
}
