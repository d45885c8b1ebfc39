//! Naming helpers shared by the scanner and the metadata loader.
//!
//! ## Display Titles
//!
//! An album without an `album_name` entry is titled after its directory:
//! underscores and dashes become spaces, the first character is upper-cased
//! and the rest lower-cased.
//! - `summer_2019` → "Summer 2019"
//! - `road-TRIP` → "Road trip"
//!
//! ## Ordering
//!
//! Image filenames and sub-album names sort case-insensitively with an ASCII
//! fold, so `b.jpg` comes after `A.jpg`. Names that differ only in case keep a
//! deterministic order by falling back to a byte comparison.

use std::cmp::Ordering;

/// Derive a display title from a directory name.
pub fn titleize(dir_name: &str) -> String {
    let spaced = dir_name.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Case-insensitive (ASCII fold) ordering with a byte-order tie break.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_ascii_lowercase()
        .cmp(&b.to_ascii_lowercase())
        .then_with(|| a.cmp(b))
}

/// Sort names in place with [`compare_names`].
pub fn sort_names(names: &mut [String]) {
    names.sort_by(|a, b| compare_names(a, b));
}

/// Whether a file or directory name is hidden (dot-prefixed).
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}
