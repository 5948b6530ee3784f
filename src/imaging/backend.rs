//! Image probing backend trait and shared types.
//!
//! The thumbnail guard only ever needs one fact about an image: its pixel
//! size when decoded as PNG. The [`ImageBackend`] trait isolates that probe so
//! the guard and the export pipeline can be tested with a [`tests::MockBackend`]
//! that never touches a decoder.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image` crate.

use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
}

/// Pixel size reported by a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn is_square(self) -> bool {
        self.width == self.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Reads image headers without touching the filesystem beyond the source file.
pub trait ImageBackend {
    /// Decode `path` as a PNG far enough to learn its dimensions.
    fn identify_png(&self, path: &Path) -> Result<Dimensions, BackendError>;
}
