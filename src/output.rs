//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every album is shown by its positional index and title first, with the
//! directory and thumbnail as indented context lines. Sub-albums are nested
//! under their parent in sort order.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Photos (0 photos)
//!     Source: /home/me/photos
//!     001 My Trip (2 photos)
//!         Source: vacation/
//!         Sun, sea and sand
//!         Thumbnail: photo_a.jpg
//!     002 Empty (0 photos)
//!         Source: empty/
//!         Thumbnail: none
//!
//! 3 albums, 2 photos
//! ```
//!
//! ## Build
//!
//! ```text
//! Theme → theme/
//! Photos → index.html
//!     001 My Trip → vacation/index.html
//!     002 Empty → empty/index.html
//!
//! Generated 3 pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::GenerateReport;
use crate::types::{Album, AlbumStore};
use std::path::{Path, PathBuf};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional photo count.
///
/// ```text
/// 001 Landscapes (5 photos)
/// 001 Travel
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({} photos)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// A path below the root, `/`-separated with a trailing slash.
fn dir_label(key: &Path) -> String {
    let joined = key
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    format!("{joined}/")
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the album tree.
struct TreeNode<'a> {
    depth: usize,
    position: usize,
    key: PathBuf,
    album: &'a Album,
}

/// Walk the store from the root through `subalbums`, assigning positional
/// indices per sibling level. The root itself is not included.
fn walk_album_tree(store: &AlbumStore) -> Vec<TreeNode<'_>> {
    let mut nodes = Vec::new();
    walk_album_tree_recursive(store, Path::new(""), 0, &mut nodes);
    nodes
}

fn walk_album_tree_recursive<'a>(
    store: &'a AlbumStore,
    key: &Path,
    depth: usize,
    nodes: &mut Vec<TreeNode<'a>>,
) {
    let Some(album) = store.get(key) else {
        return;
    };
    for (i, name) in album.subalbums.iter().enumerate() {
        let child_key = key.join(name);
        if let Some(child) = store.get(&child_key) {
            nodes.push(TreeNode {
                depth,
                position: i + 1,
                key: child_key.clone(),
                album: child,
            });
            walk_album_tree_recursive(store, &child_key, depth + 1, nodes);
        }
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the discovered album tree.
pub fn format_scan_output(store: &AlbumStore) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(root) = store.root_album() {
        lines.push(format!("{} ({} photos)", root.title, root.images.len()));
        lines.push(format!("    Source: {}", store.root().display()));
    }

    for node in walk_album_tree(store) {
        let base = indent(node.depth + 1);
        lines.push(format!(
            "{}{}",
            base,
            entity_header(node.position, &node.album.title, Some(node.album.images.len()))
        ));
        lines.push(format!("{}    Source: {}", base, dir_label(&node.key)));

        if let Some(desc) = &node.album.description {
            let truncated = truncate_desc(desc.trim(), 60);
            if !truncated.is_empty() {
                lines.push(format!("{}    {}", base, truncated));
            }
        }

        let thumbnail = match &node.album.thumbnail {
            Some(rep) if rep.dir.as_os_str().is_empty() => rep.file.clone(),
            Some(rep) => format!("{}{}", dir_label(&rep.dir), rep.file),
            None => "none".to_string(),
        };
        lines.push(format!("{}    Thumbnail: {}", base, thumbnail));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} albums, {} photos",
        store.len(),
        store.image_count()
    ));
    lines
}

/// Print check output to stdout.
pub fn print_scan_output(store: &AlbumStore) {
    for line in format_scan_output(store) {
        println!("{}", line);
    }
}

// ============================================================================
// Build output
// ============================================================================

/// Format the pages written by a build.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let store = &report.store;
    let mut lines = Vec::new();

    let theme_label = report
        .theme_output
        .strip_prefix(store.root())
        .map(dir_label)
        .unwrap_or_else(|_| report.theme_output.display().to_string());
    lines.push(format!("Theme \u{2192} {}", theme_label));

    if let Some(root) = store.root_album() {
        lines.push(format!("{} \u{2192} index.html", root.title));
    }

    for node in walk_album_tree(store) {
        lines.push(format!(
            "{}{} \u{2192} {}index.html",
            indent(node.depth + 1),
            entity_header(node.position, &node.album.title, None),
            dir_label(&node.key)
        ));
    }

    lines.push(String::new());
    lines.push(format!("Generated {} pages", report.pages.len()));
    lines
}

/// Print build output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}
