use crate::error::{CrawlError, RunError};
use crate::services::image_processor::ImageProcessor;
use crate::services::image_store::ImageStore;

/// Outcome counts of a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Runs filtered and saved
    pub processed: usize,
    /// Runs without matching images
    pub empty: usize,
    /// Runs skipped because of an error
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.processed + self.empty + self.failed
    }
}

/// Process every run in order. A failing run is logged and skipped.
pub fn process_all<I>(runs: I, processor: &mut ImageProcessor) -> BatchSummary
where
    I: IntoIterator<Item = Result<Box<dyn ImageStore>, CrawlError>>,
{
    let mut summary = BatchSummary::default();
    for run in runs {
        match process_run(run, processor) {
            Ok(true) => summary.processed += 1,
            Ok(false) => summary.empty += 1,
            Err(e) => {
                tracing::error!(error = %e, "Skipping run");
                summary.failed += 1;
            }
        }
    }
    summary
}

/// Returns whether the run had any images
fn process_run(
    run: Result<Box<dyn ImageStore>, CrawlError>,
    processor: &mut ImageProcessor,
) -> Result<bool, RunError> {
    let mut store = run?;
    if store.size() == 0 {
        tracing::debug!(origin = %store.origin().display(), "No images found");
        return Ok(false);
    }

    tracing::info!(
        origin = %store.origin().display(),
        destination = %store.destination().display(),
        images = store.size(),
        "Processing run"
    );
    processor.apply_filters(store.as_mut())?;
    Ok(true)
}
