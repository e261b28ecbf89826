pub mod batch;
pub mod folder_crawler;
pub mod image_processor;
pub mod image_store;
pub mod manifest;

pub use batch::{process_all, BatchSummary};
pub use folder_crawler::{CrawlOptions, FolderCrawler, MAX_NAME_ATTEMPTS};
pub use image_processor::ImageProcessor;
pub use image_store::{
    checkout, create_store, CheckedOut, ImageStore, ResidentStore, SingleSlotStore,
};
pub use manifest::{write_manifest, MANIFEST_FILE_NAME};
