//! Gallery generation: runs the four phases in order.
//!
//! ```text
//! scan ──▶ metadata ──▶ representative ──▶ render
//!   AlbumStore is created, enriched twice, then read to write pages
//! ```
//!
//! Fatal conditions (invalid root, missing or broken template, unwritable
//! output) are reported before anything is written where possible: the root
//! and the template are both checked before the first page.

use crate::config::Settings;
use crate::imaging::{ImageBackend, RustBackend};
use crate::metadata::load_metadata;
use crate::render::{RenderError, Renderer, ThemeSource};
use crate::representative::resolve_thumbnails;
use crate::scan::{ScanError, resolve_root, scan};
use crate::types::AlbumStore;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// What a generation run produced.
#[derive(Debug)]
pub struct GenerateReport {
    pub store: AlbumStore,
    /// `<root>/theme`
    pub theme_output: PathBuf,
    /// Written pages, in store order.
    pub pages: Vec<PathBuf>,
}

/// Run scan, metadata loading and representative picking.
///
/// Reads the tree only; used on its own by `check`.
pub fn prepare(
    root: &Path,
    settings: &Settings,
    backend: &impl ImageBackend,
) -> Result<AlbumStore, ScanError> {
    let mut store = scan(root, settings)?;
    load_metadata(&mut store);
    resolve_thumbnails(&mut store, backend);
    Ok(store)
}

/// Generate the gallery at `root` with `theme`.
pub fn generate(
    root: &Path,
    settings: &Settings,
    theme: &ThemeSource,
) -> Result<GenerateReport, GenerateError> {
    generate_with_backend(root, settings, theme, &RustBackend::new())
}

/// [`generate`] with an explicit image backend.
pub fn generate_with_backend(
    root: &Path,
    settings: &Settings,
    theme: &ThemeSource,
    backend: &impl ImageBackend,
) -> Result<GenerateReport, GenerateError> {
    let root = resolve_root(root)?;
    let renderer = Renderer::load(theme.clone())?;

    let store = prepare(&root, settings, backend)?;
    info!(
        "Found {} albums, {} images under {}",
        store.len(),
        store.image_count(),
        root.display()
    );

    let theme_output = renderer.copy_theme(store.root())?;

    let mut pages = Vec::with_capacity(store.len());
    for key in store.keys() {
        pages.push(renderer.render_album(&store, settings, key)?);
    }
    info!("Wrote {} pages", pages.len());

    Ok(GenerateReport {
        store,
        theme_output,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::MockBackend;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    fn theme_in(dir: &TempDir) -> ThemeSource {
        ThemeSource::Dir(dir.path().to_path_buf())
    }

    #[test]
    fn invalid_root_writes_nothing() {
        let themes = TempDir::new().unwrap();
        write_theme(themes.path());
        let tmp = TempDir::new().unwrap();

        let result = generate(&tmp.path().join("missing"), &Settings::default(), &theme_in(&themes));

        assert!(matches!(
            result,
            Err(GenerateError::Scan(ScanError::InvalidRoot(_)))
        ));
        assert!(!tmp.path().join("missing").exists());
    }

    #[test]
    fn missing_template_writes_nothing() {
        let themes = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();
        touch(&gallery.path().join("a.jpg"));

        let result = generate(gallery.path(), &Settings::default(), &theme_in(&themes));

        assert!(matches!(
            result,
            Err(GenerateError::Render(RenderError::MissingTemplate(_)))
        ));
        assert!(!gallery.path().join("index.html").exists());
        assert!(!gallery.path().join("theme").exists());
    }

    #[test]
    fn fatal_errors_display_plain_messages() {
        let themes = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();

        let err = generate(gallery.path(), &Settings::default(), &theme_in(&themes)).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Theme template not found: {}",
                themes.path().join("index.html").display()
            )
        );

        let missing = gallery.path().join("missing");
        let err = generate(&missing, &Settings::default(), &theme_in(&themes)).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "Gallery root is not a readable directory: {}",
                missing.display()
            )
        );
    }

    #[test]
    fn one_page_per_album() {
        let themes = TempDir::new().unwrap();
        write_theme(themes.path());
        let gallery = TempDir::new().unwrap();
        touch(&gallery.path().join("a/one.jpg"));
        touch(&gallery.path().join("a/b/two.jpg"));
        fs::create_dir_all(gallery.path().join("c")).unwrap();
        let backend = MockBackend::with_sizes(&[("one.jpg", 4, 3), ("two.jpg", 3, 4)]);

        let report =
            generate_with_backend(gallery.path(), &Settings::default(), &theme_in(&themes), &backend)
                .unwrap();

        assert_eq!(report.pages.len(), 4);
        for dir in ["", "a", "a/b", "c"] {
            assert!(gallery.path().join(dir).join("index.html").is_file());
        }
        assert!(report.theme_output.join("css/style.css").is_file());
        // The copied theme is not scanned as an album on the next run.
        let again =
            generate_with_backend(gallery.path(), &Settings::default(), &theme_in(&themes), &backend)
                .unwrap();
        assert_eq!(again.pages.len(), 4);
    }

    #[test]
    fn bundled_theme_needs_no_themes_dir() {
        let gallery = TempDir::new().unwrap();
        touch(&gallery.path().join("a/one.jpg"));
        let backend = MockBackend::with_sizes(&[("one.jpg", 4, 3)]);

        let report = generate_with_backend(
            gallery.path(),
            &Settings::default(),
            &ThemeSource::Bundled,
            &backend,
        )
        .unwrap();

        assert_eq!(report.pages.len(), 2);
        assert!(report.theme_output.join("css/style.css").is_file());
        let page = fs::read_to_string(gallery.path().join("index.html")).unwrap();
        assert!(page.contains(r#"src="a/thumbnails/one.jpg""#));
    }
}
