//! Album metadata from `album_description` files.
//!
//! Phase 2 of the gallery pipeline. Each album directory may hold a plain
//! UTF-8 text file named `album_description`:
//!
//! ```text
//! album_name = "My Trip"
//! album_description = "Two weeks on the coast"
//! album_representative = sunset.jpg
//! ```
//!
//! ## Matching
//!
//! Matching is substring based: any line that *contains* `album_name`,
//! `album_description` or `album_representative` sets that field, and a line
//! containing several keys sets all of them. Existing description files rely
//! on this, so it is kept as is. A comment such as `# album_name notes` is
//! therefore not ignored; it is malformed (no `=`) and skipped.
//!
//! ## Values
//!
//! The value is everything after the first `=`, trimmed, with one leading and
//! one trailing double quote removed. When a key appears on several lines the
//! last one wins.
//!
//! ## Failure Policy
//!
//! Metadata never aborts a build. A line without `=` is logged and skipped; a
//! file that cannot be read (or is not UTF-8) is logged and the album keeps
//! its directory-derived title.

use crate::types::AlbumStore;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Name of the per-album metadata file.
pub const DESCRIPTION_FILE: &str = "album_description";

const KEY_NAME: &str = "album_name";
const KEY_DESCRIPTION: &str = "album_description";
const KEY_REPRESENTATIVE: &str = "album_representative";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Expected `key = value`, found: {line}")]
    MissingAssignment { line: String },
}

/// Fields read from one `album_description` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub representative: Option<String>,
}

/// Extract the value of a `key = "value"` or `key = value` line.
pub fn parse_meta_value(line: &str) -> Result<String, MetadataError> {
    let (_, value) = line
        .split_once('=')
        .ok_or_else(|| MetadataError::MissingAssignment {
            line: line.trim().to_string(),
        })?;
    let value = value.trim();
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    Ok(value.to_string())
}

/// Parse the contents of an `album_description` file.
///
/// Malformed and empty-valued lines are logged with `source` and skipped.
pub fn parse_description(text: &str, source: &Path) -> AlbumMetadata {
    let mut meta = AlbumMetadata::default();

    for (idx, line) in text.lines().enumerate() {
        let fields = [
            (KEY_NAME, &mut meta.title),
            (KEY_DESCRIPTION, &mut meta.description),
            (KEY_REPRESENTATIVE, &mut meta.representative),
        ];
        if !fields.iter().any(|(key, _)| line.contains(key)) {
            continue;
        }

        let value = match parse_meta_value(line) {
            Ok(value) => value,
            Err(err) => {
                warn!("{}:{}: {err}", source.display(), idx + 1);
                continue;
            }
        };
        if value.is_empty() {
            warn!("{}:{}: empty value ignored", source.display(), idx + 1);
            continue;
        }

        for (key, field) in fields {
            if line.contains(key) {
                *field = Some(value.clone());
            }
        }
    }

    meta
}

/// Read the `album_description` file of an album directory.
///
/// Returns `Ok(None)` when the directory has no description file.
pub fn read_album_metadata(dir: &Path) -> Result<Option<AlbumMetadata>, MetadataError> {
    let path = dir.join(DESCRIPTION_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(parse_description(&text, &path)))
}

/// Apply every album's description file to the store.
pub fn load_metadata(store: &mut AlbumStore) {
    let root = store.root().to_path_buf();
    for (key, album) in store.iter_mut() {
        let dir = root.join(key);
        let meta = match read_album_metadata(&dir) {
            Ok(Some(meta)) => meta,
            Ok(None) => continue,
            Err(err) => {
                warn!(
                    "Ignoring {}: {err}",
                    dir.join(DESCRIPTION_FILE).display()
                );
                continue;
            }
        };
        debug!("Loaded metadata for {}", dir.display());
        if let Some(title) = meta.title {
            album.title = title;
        }
        if meta.description.is_some() {
            album.description = meta.description;
        }
        if meta.representative.is_some() {
            album.representative = meta.representative;
        }
    }
}
