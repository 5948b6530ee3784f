//! Pure Rust probe backend on the `image` crate.
//!
//! The reader is pinned to [`ImageFormat::Png`] rather than guessing from the
//! file's bytes, so a JPEG renamed to `.png` fails to decode instead of being
//! measured. The whole image is decoded, not just the header: a file whose
//! pixel data is damaged is rejected even though its size is readable.

use super::backend::{BackendError, Dimensions, ImageBackend};
use image::{ImageFormat, ImageReader};
use std::path::Path;

/// Production backend. Stateless.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn identify_png(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let mut reader = ImageReader::open(path)?;
        reader.set_format(ImageFormat::Png);
        let image = reader.decode().map_err(|e| {
            BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e))
        })?;
        Ok(Dimensions {
            width: image.width(),
            height: image.height(),
        })
    }
}
