//! Representative image selection.
//!
//! Phase 3 of the gallery pipeline. Every album except the root needs one
//! image to stand for it on its parent's page.
//!
//! ## Resolution order
//!
//! 1. `album_representative` from the description file, if it names a file
//!    that exists directly inside the album directory.
//! 2. The first landscape image (`width > height`) in album order.
//! 3. The first image in album order.
//!
//! An album without direct images borrows the representative of its first
//! sub-album (depth-first, in sub-album order) that has one. An album with no
//! image anywhere below it is an empty album: it still gets a page, its link
//! on the parent page has no thumbnail, and a warning is logged.
//!
//! Dimension probing runs per album in parallel; results are applied in store
//! order so the outcome is identical to a sequential run.

use crate::imaging::ImageBackend;
use crate::types::{Album, AlbumStore, Representative};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PickError {
    #[error("Album has no images: {}", .0.display())]
    EmptyAlbum(PathBuf),
}

/// Pick the representative among an album's own images.
///
/// `album_dir` is the album's directory on disk; `album.images` must be in
/// album order.
pub fn pick_representative(
    album_dir: &Path,
    album: &Album,
    backend: &impl ImageBackend,
) -> Result<String, PickError> {
    if let Some(explicit) = &album.representative {
        if is_plain_file_name(explicit) && album_dir.join(explicit).is_file() {
            return Ok(explicit.clone());
        }
        debug!(
            "Representative {explicit:?} not found in {}, picking one",
            album_dir.display()
        );
    }

    for image in &album.images {
        match backend.identify(&album_dir.join(image)) {
            Ok(dims) if dims.is_landscape() => return Ok(image.clone()),
            Ok(_) => {}
            Err(err) => warn!("{err}"),
        }
    }

    album
        .images
        .first()
        .cloned()
        .ok_or_else(|| PickError::EmptyAlbum(album_dir.to_path_buf()))
}

fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Set `thumbnail` on every non-root album of the store.
pub fn resolve_thumbnails(store: &mut AlbumStore, backend: &impl ImageBackend) {
    let direct = pick_direct(store, backend);

    let resolved: Vec<(PathBuf, Option<Representative>)> = direct
        .keys()
        .map(|key| (key.clone(), find_thumbnail(store, &direct, key)))
        .collect();

    for (key, thumbnail) in resolved {
        if thumbnail.is_none() {
            warn!(
                "Album {} has no images; it will be listed without a thumbnail",
                store.album_dir(&key).display()
            );
        }
        if let Some(album) = store.get_mut(&key) {
            album.thumbnail = thumbnail;
        }
    }
}

/// Run [`pick_representative`] on every non-root album.
fn pick_direct(
    store: &AlbumStore,
    backend: &impl ImageBackend,
) -> BTreeMap<PathBuf, Option<String>> {
    let keys: Vec<&PathBuf> = store
        .keys()
        .filter(|key| !key.as_os_str().is_empty())
        .collect();

    keys.par_iter()
        .map(|&key| {
            let pick = store
                .get(key)
                .and_then(|album| pick_representative(&store.album_dir(key), album, backend).ok());
            (key.clone(), pick)
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Own pick first, then the first sub-album that resolves.
fn find_thumbnail(
    store: &AlbumStore,
    direct: &BTreeMap<PathBuf, Option<String>>,
    key: &Path,
) -> Option<Representative> {
    if let Some(Some(file)) = direct.get(key) {
        return Some(Representative::direct(file.clone()));
    }
    store.get(key)?.subalbums.iter().find_map(|sub| {
        find_thumbnail(store, direct, &key.join(sub)).map(|rep| Representative {
            dir: Path::new(sub).join(rep.dir),
            file: rep.file,
        })
    })
}
