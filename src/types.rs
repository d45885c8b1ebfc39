//! The in-memory album store shared by all pipeline phases.
//!
//! The scanner creates the store, the metadata loader and representative
//! picker enrich it, and the renderer reads it. Albums are keyed by their path
//! relative to the gallery root; the root album has the empty path.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A directory treated as a gallery unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Album {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit representative filename from `album_description`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative: Option<String>,
    /// Image filenames, sorted case-insensitively.
    pub images: Vec<String>,
    /// Sub-album directory names, sorted case-insensitively.
    pub subalbums: Vec<String>,
    /// Image used when this album is linked from its parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Representative>,
}

/// The image chosen to stand for an album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Representative {
    /// Album holding the image, relative to the represented album.
    /// Empty when the image lives directly in the represented album.
    pub dir: PathBuf,
    pub file: String,
}

impl Representative {
    pub fn direct(file: impl Into<String>) -> Self {
        Self {
            dir: PathBuf::new(),
            file: file.into(),
        }
    }
}

/// All albums of one gallery, keyed by path relative to the root.
#[derive(Debug, Clone, Serialize)]
pub struct AlbumStore {
    root: PathBuf,
    albums: BTreeMap<PathBuf, Album>,
}

impl AlbumStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            albums: BTreeMap::new(),
        }
    }

    /// Absolute, normalized gallery root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem directory of the album at `key`.
    pub fn album_dir(&self, key: &Path) -> PathBuf {
        self.root.join(key)
    }

    pub fn insert(&mut self, key: PathBuf, album: Album) {
        self.albums.insert(key, album);
    }

    pub fn get(&self, key: &Path) -> Option<&Album> {
        self.albums.get(key)
    }

    pub fn get_mut(&mut self, key: &Path) -> Option<&mut Album> {
        self.albums.get_mut(key)
    }

    pub fn contains(&self, key: &Path) -> bool {
        self.albums.contains_key(key)
    }

    pub fn root_album(&self) -> Option<&Album> {
        self.albums.get(Path::new(""))
    }

    /// Albums in key order, which visits every parent before its children.
    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Album)> {
        self.albums.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&PathBuf, &mut Album)> {
        self.albums.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &PathBuf> {
        self.albums.keys()
    }

    pub fn len(&self) -> usize {
        self.albums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.albums.is_empty()
    }

    /// Total number of images across all albums.
    pub fn image_count(&self) -> usize {
        self.albums.values().map(|a| a.images.len()).sum()
    }
}

/// Number of directory levels between the root and `key`.
pub fn depth(key: &Path) -> usize {
    key.components().count()
}
