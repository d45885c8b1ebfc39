//! Shared test utilities for the gallerist test suite.
//!
//! Provides tree builders, synthetic images and store lookups that panic with
//! a clear message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_image(&tmp.path().join("trip/wide.png"), 40, 20);
//! let store = scan(tmp.path(), &Settings::default()).unwrap();
//! assert_eq!(find_album(&store, "trip").images, vec!["wide.png"]);
//! ```

use std::fs;
use std::path::Path;

use crate::types::{Album, AlbumStore};

// =========================================================================
// Tree setup
// =========================================================================

/// Create an empty file (and its parent directories).
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

/// Write a real PNG of the given size (and its parent directories).
pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write a minimal Liquid theme with an `index.html` template and one asset.
pub fn write_theme(theme_dir: &Path) {
    fs::create_dir_all(theme_dir.join("css")).unwrap();
    fs::write(
        theme_dir.join("index.html"),
        "<title>{{ title }}</title>\n\
         <nav>{{ paths }}</nav>\n\
         <link href=\"{{ theme.path }}/css/style.css\">\n\
         <a class=\"home\" href=\"{{ home_path }}\">home</a>\n\
         {% for album in albums %}<a href=\"{{ album.path }}\">{{ album.title }}|{{ album.thumb }}</a>\n{% endfor %}\
         {% for image in images %}<img src=\"{{ image.thumb }}\" alt=\"{{ image.file }}\">\n{% endfor %}",
    )
    .unwrap();
    fs::write(theme_dir.join("css/style.css"), "body {}\n").unwrap();
}

// =========================================================================
// Store lookups: panic with a clear message on miss
// =========================================================================

/// Find an album by its path relative to the root. Panics if not found.
pub fn find_album<'a>(store: &'a AlbumStore, key: &str) -> &'a Album {
    store.get(Path::new(key)).unwrap_or_else(|| {
        let keys = album_keys(store);
        panic!("album '{key}' not found. Available: {keys:?}")
    })
}

/// All album keys in store order, as strings.
pub fn album_keys(store: &AlbumStore) -> Vec<String> {
    store
        .keys()
        .map(|k| k.to_string_lossy().to_string())
        .collect()
}
