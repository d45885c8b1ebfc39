//! Filesystem scanning.
//!
//! Phase 1 of the gallery pipeline. Walks the gallery root depth-first and
//! records every directory as an album, producing the [`AlbumStore`] the later
//! phases enrich and render.
//!
//! ## Directory Structure
//!
//! ```text
//! photos/                          # Gallery root (an album itself)
//! ├── album_description            # Root metadata (optional)
//! ├── notes.txt                    # Ignored: extension not listed
//! ├── theme/                       # Reserved: copied theme assets
//! ├── vacation/                    # Album
//! │   ├── album_description
//! │   ├── photo_a.jpg
//! │   ├── photo_b.jpg
//! │   ├── thumbnails/              # Reserved: thumb_dir
//! │   └── original/                # Reserved: bigimg_dir
//! └── family/                      # Album holding only sub-albums
//!     └── 2019/
//!         └── beach.jpg
//! ```
//!
//! ## Exclusions
//!
//! A directory is skipped entirely (not an album, not listed, not descended
//! into) when its name is `theme`, the configured `thumb_dir` or `bigimg_dir`,
//! when it is hidden, or when its path below the root matches `*theme*`.
//!
//! ## Failure Policy
//!
//! A missing root, or a root that is not a directory, is fatal. A
//! subdirectory that cannot be read is logged and left out, and its name is
//! removed from the parent's sub-album list so every listed sub-album can be
//! looked up in the store.

use crate::config::Settings;
use crate::naming::{is_hidden, sort_names, titleize};
use crate::types::{Album, AlbumStore};
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Gallery root is not a readable directory: {}", .0.display())]
    InvalidRoot(PathBuf),
    #[error("Invalid exclusion pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Glob matched against album paths relative to the root.
const THEME_GLOB: &str = "*theme*";

/// Decides which directories take part in the gallery.
struct DirFilter<'a> {
    reserved: [&'a str; 3],
    theme_glob: Pattern,
}

impl<'a> DirFilter<'a> {
    fn new(settings: &'a Settings) -> Result<Self, ScanError> {
        Ok(Self {
            reserved: settings.reserved_dirs(),
            theme_glob: Pattern::new(THEME_GLOB)?,
        })
    }

    /// `rel` is the directory's path relative to the gallery root.
    fn is_excluded(&self, name: &str, rel: &Path) -> bool {
        is_hidden(name) || self.reserved.contains(&name) || self.theme_glob.matches_path(rel)
    }
}

/// Resolve and check the gallery root.
///
/// Returns the canonical absolute path, so album titles and relative links do
/// not depend on how the root was spelled on the command line.
pub fn resolve_root(root: &Path) -> Result<PathBuf, ScanError> {
    let canonical =
        fs::canonicalize(root).map_err(|_| ScanError::InvalidRoot(root.to_path_buf()))?;
    if !canonical.is_dir() {
        return Err(ScanError::InvalidRoot(root.to_path_buf()));
    }
    Ok(canonical)
}

/// Scan the tree below `root` into an album store.
///
/// Titles are set to the titleized directory name; [`crate::metadata`]
/// overrides them afterwards.
pub fn scan(root: &Path, settings: &Settings) -> Result<AlbumStore, ScanError> {
    let root = resolve_root(root)?;
    let filter = DirFilter::new(settings)?;
    let mut store = AlbumStore::new(&root);

    let walker = WalkDir::new(&root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if !entry.file_type().is_dir() {
                return false;
            }
            let rel = entry.path().strip_prefix(&root).unwrap_or(entry.path());
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| !filter.is_excluded(name, rel))
        });

    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(err
                    .into_io_error()
                    .map(ScanError::Io)
                    .unwrap_or_else(|| ScanError::InvalidRoot(root.clone())));
            }
            Err(err) => {
                warn!("Skipping unreadable directory: {err}");
                continue;
            }
        };

        let rel = entry
            .path()
            .strip_prefix(&root)
            .unwrap_or(Path::new(""))
            .to_path_buf();

        match scan_directory(entry.path(), &rel, settings, &filter) {
            Ok(album) => {
                debug!(
                    "Scanned {} ({} images, {} sub-albums)",
                    entry.path().display(),
                    album.images.len(),
                    album.subalbums.len()
                );
                store.insert(rel, album);
            }
            Err(err) if rel.as_os_str().is_empty() => return Err(err),
            Err(err) => warn!("Skipping unreadable directory {}: {err}", entry.path().display()),
        }
    }

    prune_missing_subalbums(&mut store);
    Ok(store)
}

/// Classify the direct children of one directory.
fn scan_directory(
    path: &Path,
    rel: &Path,
    settings: &Settings,
    filter: &DirFilter,
) -> Result<Album, ScanError> {
    let mut images = Vec::new();
    let mut subalbums = Vec::new();

    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let child = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!("Skipping non UTF-8 name: {}", child.display());
            continue;
        };
        if is_hidden(&name) {
            continue;
        }
        if child.is_dir() {
            if !filter.is_excluded(&name, &rel.join(&name)) {
                subalbums.push(name);
            }
        } else if child.is_file() && settings.is_allowed_image(&name) {
            images.push(name);
        }
    }

    sort_names(&mut images);
    sort_names(&mut subalbums);

    let dir_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    Ok(Album {
        title: titleize(&dir_name),
        images,
        subalbums,
        ..Album::default()
    })
}

/// Drop sub-album names that never made it into the store.
fn prune_missing_subalbums(store: &mut AlbumStore) {
    let present: Vec<PathBuf> = store.keys().cloned().collect();
    for (key, album) in store.iter_mut() {
        album.subalbums.retain(|name| {
            let child = key.join(name);
            let keep = present.binary_search(&child).is_ok();
            if !keep {
                warn!("Sub-album {} was not scanned, leaving it out", child.display());
            }
            keep
        });
    }
}
