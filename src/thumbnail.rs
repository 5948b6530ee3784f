//! Square-PNG guard for item thumbnails.
//!
//! The game engine consumes thumbnails as square PNGs named after the item.
//! [`ensure_square_png`] is the single gate every thumbnail passes through:
//! once when it is attached to an item, and again right before each copy during
//! export, since the source may have changed on disk in between.
//!
//! Checks run cheapest-first:
//!
//! 1. Extension is `.png` (case-insensitive) → [`ThumbnailError::Format`]
//! 2. File decodes fully as PNG → [`ThumbnailError::Decode`]
//! 3. Width equals height → [`ThumbnailError::Aspect`]
//!
//! The guard reads the file and nothing else; it never writes.

use crate::imaging::{BackendError, ImageBackend, RustBackend};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("Thumbnail must be a PNG (.png): {}", .0.display())]
    Format(PathBuf),
    #[error("Could not read image dimensions of {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Thumbnail must be square (got {width}x{height}): {}", .path.display())]
    Aspect {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    #[error("Could not open thumbnail {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Validate `path` as a square PNG using the production backend.
pub fn ensure_square_png(path: &Path) -> Result<(), ThumbnailError> {
    ensure_square_png_with(&RustBackend::new(), path)
}

/// Validate `path` as a square PNG using a specific backend (allows testing with mock).
pub fn ensure_square_png_with(
    backend: &impl ImageBackend,
    path: &Path,
) -> Result<(), ThumbnailError> {
    if !has_png_extension(path) {
        return Err(ThumbnailError::Format(path.to_path_buf()));
    }

    let dims = backend.identify_png(path).map_err(|e| match e {
        BackendError::Io(source) => ThumbnailError::Io {
            path: path.to_path_buf(),
            source,
        },
        BackendError::Decode(reason) => ThumbnailError::Decode {
            path: path.to_path_buf(),
            reason,
        },
    })?;

    if !dims.is_square() {
        return Err(ThumbnailError::Aspect {
            path: path.to_path_buf(),
            width: dims.width,
            height: dims.height,
        });
    }

    tracing::debug!(path = %path.display(), %dims, "thumbnail accepted");
    Ok(())
}

fn has_png_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}
