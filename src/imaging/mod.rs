//! Image probing in pure Rust, with no system dependencies.
//!
//! The gallery never resizes images (thumbnails are produced elsewhere); it
//! only needs pixel dimensions to tell landscape from portrait.
//!
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use rust_backend::RustBackend;
