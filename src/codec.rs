//! Image decoding and encoding.
//!
//! Stores and the mask loader only see [`ImageCodec`]. [`FileCodec`] is the
//! production implementation on top of the `image` crate: every supported
//! raster format is decoded to 8-bit luma, and encoding picks the format from
//! the destination extension. GIF has no luma color type, so GIF output is
//! written as gray RGBA.

use std::path::Path;

use gray_filters::GrayBuffer;

use crate::error::CodecError;

/// Decode/encode collaborator for 8-bit grayscale buffers
pub trait ImageCodec: Send + Sync {
    /// Read the image at `path` as a single-channel 8-bit buffer
    fn decode(&self, path: &Path) -> Result<GrayBuffer, CodecError>;

    /// Write `image` to `path`, format chosen by the file extension
    fn encode(&self, image: &GrayBuffer, path: &Path) -> Result<(), CodecError>;
}

/// Codec reading and writing files through the `image` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct FileCodec;

impl ImageCodec for FileCodec {
    fn decode(&self, path: &Path) -> Result<GrayBuffer, CodecError> {
        let luma = image::open(path)
            .map_err(|source| CodecError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .into_luma8();
        let (width, height) = luma.dimensions();
        GrayBuffer::new(width as usize, height as usize, luma.into_raw()).map_err(|e| {
            CodecError::Layout {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    fn encode(&self, image: &GrayBuffer, path: &Path) -> Result<(), CodecError> {
        if image.channels() != 1 {
            return Err(CodecError::Layout {
                path: path.to_path_buf(),
                reason: format!("expected 1 channel, got {}", image.channels()),
            });
        }
        let luma = image::GrayImage::from_raw(
            image.width() as u32,
            image.height() as u32,
            image.as_slice().to_vec(),
        )
        .ok_or_else(|| CodecError::Layout {
            path: path.to_path_buf(),
            reason: format!("{} does not fit its samples", image.shape()),
        })?;

        tracing::trace!(path = %path.display(), "Encoding image");
        let saved = if is_gif(path) {
            image::DynamicImage::ImageLuma8(luma).to_rgba8().save(path)
        } else {
            luma.save(path)
        };
        saved.map_err(|source| CodecError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn is_gif(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gif"))
}
