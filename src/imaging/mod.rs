//! Image inspection in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::decode`, format pinned to PNG |
//!
//! The module is split into:
//! - **Backend**: [`ImageBackend`] trait + shared [`Dimensions`]
//! - **Rust backend**: [`RustBackend`], the production implementation

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use rust_backend::RustBackend;
