//! Image probing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the single seam between the representative
//! picker and image decoding. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend); tests use
//! [`tests::MockBackend`] so picking rules can be exercised without writing
//! image files.

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read dimensions of {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Strictly wider than tall. Square images are not landscape.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// Trait for image probing backends.
///
/// `Sync` so the picker can probe albums in parallel with rayon.
pub trait ImageBackend: Sync {
    /// Get image dimensions, reading as little of the file as possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;
}
