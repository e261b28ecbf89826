//! Access to the images of one run.
//!
//! An [`ImageStore`] owns a [`Run`] and mediates every decode, encode and
//! destination-directory creation for it. Callers follow a
//! load / release / save discipline:
//!
//! - [`load(i)`](ImageStore::load) returns the decoded buffer for image `i`
//! - [`save(i)`](ImageStore::save) writes the loaded buffer into the
//!   destination directory, creating it on the first save of the run
//! - [`release(i)`](ImageStore::release) signals the caller is done with it
//!
//! Two strategies implement the trait:
//!
//! - [`ResidentStore`]: memoizes every decoded image; `release` is a no-op
//! - [`SingleSlotStore`]: holds at most one decoded image; loading a
//!   different image before releasing the current one is rejected
//!
//! Contract violations are checked and reported as [`StoreError`]s.
//! [`checkout`] wraps the discipline in a guard that releases on drop.

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use gray_filters::GrayBuffer;

use crate::codec::ImageCodec;
use crate::error::StoreError;
use crate::models::{MemoryStrategy, Run};

/// Load/release/save access to the images of one run
pub trait ImageStore {
    /// The run this store serves
    fn run(&self) -> &Run;

    fn strategy(&self) -> MemoryStrategy;

    /// Number of images in the run
    fn size(&self) -> usize {
        self.run().len()
    }

    fn origin(&self) -> &Path {
        self.run().origin()
    }

    fn destination(&self) -> &Path {
        self.run().destination()
    }

    fn image_path(&self, index: usize) -> Result<&Path, StoreError> {
        self.run().image_path(index)
    }

    /// Decoded buffer for image `index`, decoding on first access
    fn load(&mut self, index: usize) -> Result<&mut GrayBuffer, StoreError>;

    /// Done with the buffer from the most recent `load(index)`
    fn release(&mut self, index: usize);

    /// Encode the loaded buffer of image `index` into the destination
    fn save(&mut self, index: usize) -> Result<(), StoreError>;
}

/// Create the store for `run` according to `strategy`
pub fn create_store(
    strategy: MemoryStrategy,
    run: Run,
    codec: Arc<dyn ImageCodec>,
) -> Box<dyn ImageStore> {
    match strategy {
        MemoryStrategy::Resident => Box::new(ResidentStore::new(run, codec)),
        MemoryStrategy::SingleSlot => Box::new(SingleSlotStore::new(run, codec)),
    }
}

fn write_image(
    run: &mut Run,
    codec: &dyn ImageCodec,
    index: usize,
    image: &GrayBuffer,
) -> Result<(), StoreError> {
    let output = run.output_path(index)?;
    run.ensure_destination()?;
    codec.encode(image, &output)?;
    Ok(())
}

/// Store keeping every decoded image for the lifetime of the run
pub struct ResidentStore {
    run: Run,
    codec: Arc<dyn ImageCodec>,
    images: Vec<Option<GrayBuffer>>,
}

impl ResidentStore {
    pub fn new(run: Run, codec: Arc<dyn ImageCodec>) -> Self {
        let images = vec![None; run.len()];
        Self { run, codec, images }
    }

    /// Number of images decoded so far
    pub fn decoded(&self) -> usize {
        self.images.iter().filter(|image| image.is_some()).count()
    }
}

impl ImageStore for ResidentStore {
    fn run(&self) -> &Run {
        &self.run
    }

    fn strategy(&self) -> MemoryStrategy {
        MemoryStrategy::Resident
    }

    fn load(&mut self, index: usize) -> Result<&mut GrayBuffer, StoreError> {
        let path = self.run.image_path(index)?;
        if self.images[index].is_none() {
            tracing::trace!(path = %path.display(), "Decoding image");
            self.images[index] = Some(self.codec.decode(path)?);
        }
        self.images[index]
            .as_mut()
            .ok_or(StoreError::NotLoaded { index })
    }

    fn release(&mut self, _index: usize) {}

    fn save(&mut self, index: usize) -> Result<(), StoreError> {
        self.run.image_path(index)?;
        let Some(image) = &self.images[index] else {
            return Err(StoreError::NotLoaded { index });
        };
        write_image(&mut self.run, self.codec.as_ref(), index, image)
    }
}

/// Occupancy of the single-slot store
#[derive(Debug)]
enum Slot {
    Empty,
    Loaded { index: usize, image: GrayBuffer },
}

/// Store holding at most one decoded image ("ram friendly")
pub struct SingleSlotStore {
    run: Run,
    codec: Arc<dyn ImageCodec>,
    slot: Slot,
}

impl SingleSlotStore {
    pub fn new(run: Run, codec: Arc<dyn ImageCodec>) -> Self {
        Self {
            run,
            codec,
            slot: Slot::Empty,
        }
    }

    /// Index of the image currently held, if any
    pub fn resident(&self) -> Option<usize> {
        match self.slot {
            Slot::Empty => None,
            Slot::Loaded { index, .. } => Some(index),
        }
    }
}

impl ImageStore for SingleSlotStore {
    fn run(&self) -> &Run {
        &self.run
    }

    fn strategy(&self) -> MemoryStrategy {
        MemoryStrategy::SingleSlot
    }

    fn load(&mut self, index: usize) -> Result<&mut GrayBuffer, StoreError> {
        let path = self.run.image_path(index)?;
        match self.slot {
            Slot::Loaded { index: resident, .. } if resident != index => {
                return Err(StoreError::SlotOccupied {
                    resident,
                    requested: index,
                });
            }
            Slot::Loaded { .. } => {}
            Slot::Empty => {
                tracing::trace!(path = %path.display(), "Decoding image");
                let image = self.codec.decode(path)?;
                self.slot = Slot::Loaded { index, image };
            }
        }
        match &mut self.slot {
            Slot::Loaded { image, .. } => Ok(image),
            Slot::Empty => Err(StoreError::NotLoaded { index }),
        }
    }

    fn release(&mut self, index: usize) {
        if self.resident() == Some(index) {
            self.slot = Slot::Empty;
        }
    }

    fn save(&mut self, index: usize) -> Result<(), StoreError> {
        self.run.image_path(index)?;
        match &self.slot {
            Slot::Loaded {
                index: resident,
                image,
            } if *resident == index => {
                write_image(&mut self.run, self.codec.as_ref(), index, image)
            }
            _ => Err(StoreError::NotLoaded { index }),
        }
    }
}

/// A loaded image, released when the guard is dropped
pub struct CheckedOut<'a, S: ImageStore + ?Sized> {
    store: &'a mut S,
    index: usize,
}

/// Load image `index` and return a guard that releases it on drop
pub fn checkout<S: ImageStore + ?Sized>(
    store: &mut S,
    index: usize,
) -> Result<CheckedOut<'_, S>, StoreError> {
    store.load(index)?;
    Ok(CheckedOut { store, index })
}

impl<S: ImageStore + ?Sized> CheckedOut<'_, S> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The loaded buffer
    pub fn image(&mut self) -> Result<&mut GrayBuffer, StoreError> {
        self.store.load(self.index)
    }

    /// Write the loaded buffer into the run's destination
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.store.save(self.index)
    }
}

impl<S: ImageStore + ?Sized> Deref for CheckedOut<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.store
    }
}

impl<S: ImageStore + ?Sized> Drop for CheckedOut<'_, S> {
    fn drop(&mut self) {
        self.store.release(self.index);
    }
}
