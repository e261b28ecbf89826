pub mod config;
pub mod run;

pub use config::{AppConfig, FilterConfig, DEFAULT_FNAME_REGEX, DEFAULT_FOLDER_PREFIX};
pub use run::{MemoryStrategy, PendingDirectory, Run};
