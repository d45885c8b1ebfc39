//! # Gallerist
//!
//! A static HTML gallery generator for a directory tree of photos. Every
//! directory becomes an album page, written in place as `index.html`, linking
//! to its sub-albums (each shown by one representative image) and listing its
//! own images.
//!
//! # Architecture: Four-Phase Pipeline
//!
//! All phases share one in-memory [`types::AlbumStore`]:
//!
//! ```text
//! 1. Scan            photos/      →  AlbumStore       (directories, images, titles)
//! 2. Metadata        album_description  →  titles, descriptions, explicit picks
//! 3. Representative  AlbumStore   →  thumbnail per album
//! 4. Render          AlbumStore   →  index.html per album + theme/ copy
//! ```
//!
//! Phases run strictly in order; each reads what the previous ones wrote.
//! Nothing is written to disk before phase 4, and phase 4 starts only after
//! the root and the theme template are known to be usable.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Phase 1: walks the gallery root and builds the album store |
//! | [`metadata`] | Phase 2: parses `album_description` files |
//! | [`representative`] | Phase 3: picks the image standing for each album |
//! | [`render`] | Phase 4: Liquid pages, maud breadcrumbs, theme copy |
//! | [`generate`] | Runs the phases in order |
//! | [`config`] | `gallery.toml` loading and validation |
//! | [`types`] | The album store and its records |
//! | [`naming`] | Title derivation and name ordering |
//! | [`imaging`] | Image dimension probing behind the `ImageBackend` trait |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Pages Live Next To The Photos
//!
//! Each `index.html` is written into the album directory it describes and all
//! links are relative. The gallery can be served from any URL prefix or opened
//! directly from disk, and re-running replaces the pages in place.
//!
//! ## Themes Are Runtime Files
//!
//! Pages are rendered from a theme's `index.html` Liquid template so the look
//! can change without rebuilding. Only the breadcrumb is built in Rust (with
//! maud), because its markup is fixed.
//!
//! ## Thumbnails Are Not Generated Here
//!
//! Pages reference `<thumb_dir>/<thumb_prefix><file>` inside each album. Those
//! files are produced by other tools; the generator only needs pixel
//! dimensions, which [`imaging`] reads from image headers.

pub mod config;
pub mod generate;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod render;
pub mod representative;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
