//! HTML page rendering.
//!
//! Phase 4 of the gallery pipeline. Copies the theme's static assets into the
//! gallery once, then writes one `index.html` into every album directory.
//!
//! ## Output Structure
//!
//! ```text
//! photos/
//! ├── index.html                 # Root album page
//! ├── theme/                     # Copy of <themes-dir>/<theme>/
//! │   ├── index.html             # (the template itself, copied along)
//! │   └── css/style.css
//! ├── vacation/
//! │   ├── index.html             # Album page
//! │   └── thumbnails/            # Produced elsewhere, referenced only
//! └── family/
//!     ├── index.html
//!     └── 2019/index.html
//! ```
//!
//! ## Templates
//!
//! Each theme provides an `index.html` [Liquid](https://shopify.github.io/liquid/)
//! template. It receives a [`RenderContext`] per album; the breadcrumb is
//! offered both as data (`breadcrumb`) and pre-rendered as links joined by
//! ` » ` (`paths`). The pre-rendered links are built with maud, so titles are
//! HTML-escaped there; everything else is inserted as-is unless the template
//! applies the `escape` filter.
//!
//! ## Links
//!
//! All links are relative and use `/`, so the gallery can be served from any
//! prefix or opened straight from disk. Every path segment taken from a file
//! or directory name is percent-encoded, so names containing `#`, `?`, `"` or
//! spaces still link to the right file.
//!
//! ## Bundled Theme
//!
//! The `default` theme is compiled into the binary. It is used whenever the
//! themes directory has no `default/index.html` of its own.
//!
//! Any failure here is fatal. Pages already written are left in place.

use crate::config::Settings;
use crate::types::{AlbumStore, Representative, depth};
use maud::{Markup, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Page written into every album directory; also the theme's template name.
pub const INDEX_PAGE: &str = "index.html";
/// Directory under the gallery root receiving the theme assets.
pub const THEME_OUTPUT_DIR: &str = "theme";
/// Separator between breadcrumb links.
pub const PATH_SEP: &str = " \u{bb} ";
/// Theme compiled into the binary.
pub const DEFAULT_THEME: &str = "default";

const BUNDLED_TEMPLATE: &str = include_str!("../themes/default/index.html");
const BUNDLED_STYLE: &str = include_str!("../themes/default/css/style.css");

/// Files of the bundled theme, relative to the theme directory.
const BUNDLED_FILES: [(&str, &str); 2] = [
    (INDEX_PAGE, BUNDLED_TEMPLATE),
    ("css/style.css", BUNDLED_STYLE),
];

/// URL path segment: RFC 3986 unreserved characters stay as they are.
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Where a theme's template and assets come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    /// A theme directory on disk holding `index.html` and its assets.
    Dir(PathBuf),
    /// The `default` theme compiled into the binary.
    Bundled,
}

impl ThemeSource {
    /// Find theme `name` under `themes_dir`, falling back to the bundled
    /// theme for `default`.
    pub fn locate(themes_dir: &Path, name: &str) -> Self {
        let dir = themes_dir.join(name);
        if name == DEFAULT_THEME && !dir.join(INDEX_PAGE).is_file() {
            debug!("No theme at {}, using the bundled one", dir.display());
            return Self::Bundled;
        }
        Self::Dir(dir)
    }

    fn template_path(&self) -> PathBuf {
        match self {
            Self::Dir(dir) => dir.join(INDEX_PAGE),
            Self::Bundled => Path::new("<bundled>").join(DEFAULT_THEME).join(INDEX_PAGE),
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Theme template not found: {}", .0.display())]
    MissingTemplate(PathBuf),
    #[error("Template error in {}: {source}", path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: liquid::Error,
    },
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Album not in store: {}", .0.display())]
    UnknownAlbum(PathBuf),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RenderError + '_ {
    move |source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    }
}

// ============================================================================
// Render context
// ============================================================================

/// One breadcrumb entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Crumb {
    pub title: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeRef {
    pub name: String,
    /// Theme assets directory, relative to the album page.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    /// Filename as on disk, for display.
    pub file: String,
    /// Encoded link to the image.
    pub url: String,
    /// Encoded link to the thumbnail.
    pub thumb: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubAlbumEntry {
    /// Link to the sub-album page.
    pub path: String,
    pub title: String,
    /// `None` for empty albums.
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratorInfo {
    pub name: &'static str,
    pub version: &'static str,
}

impl Default for GeneratorInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Everything a theme template can use, rebuilt for every album.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub title: String,
    pub description: Option<String>,
    pub representative: Option<String>,
    pub breadcrumb: Vec<Crumb>,
    /// `breadcrumb` rendered as HTML links.
    pub paths: String,
    pub theme: ThemeRef,
    pub home_path: String,
    pub images: Vec<ImageEntry>,
    pub albums: Vec<SubAlbumEntry>,
    pub generator: GeneratorInfo,
}

/// `../` once per level between `key` and the root.
fn up_to_root(key: &Path) -> String {
    "../".repeat(depth(key))
}

fn url_segment(name: &str) -> String {
    utf8_percent_encode(name, SEGMENT_ENCODE_SET).to_string()
}

/// A relative path as a URL: segments encoded and joined with `/` whatever
/// the platform separator.
fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| url_segment(&c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}

/// Breadcrumb from the root album down to `key`.
///
/// The root comes first and `key` itself last, linked as `index.html`; each
/// ancestor links one more `../` up.
pub fn build_breadcrumb(store: &AlbumStore, key: &Path) -> Result<Vec<Crumb>, RenderError> {
    let mut crumbs = Vec::new();
    let mut current = Some(key);
    let mut levels_up = 0;

    while let Some(path) = current {
        let album = store
            .get(path)
            .ok_or_else(|| RenderError::UnknownAlbum(path.to_path_buf()))?;
        crumbs.push(Crumb {
            title: album.title.clone(),
            link: format!("{}{}", "../".repeat(levels_up), INDEX_PAGE),
        });
        if path.as_os_str().is_empty() {
            break;
        }
        current = path.parent();
        levels_up += 1;
    }

    crumbs.reverse();
    Ok(crumbs)
}

/// Breadcrumb as HTML links joined by [`PATH_SEP`].
pub fn render_breadcrumb(crumbs: &[Crumb]) -> Markup {
    html! {
        @for (idx, crumb) in crumbs.iter().enumerate() {
            @if idx > 0 {
                (PATH_SEP)
            }
            a href=(crumb.link) { (crumb.title) }
        }
    }
}

/// Thumbnail link of a sub-album, relative to its parent's page.
fn subalbum_thumb(settings: &Settings, subalbum: &str, rep: &Representative) -> String {
    let path = Path::new(subalbum)
        .join(&rep.dir)
        .join(settings.thumb_path(&rep.file));
    url_path(&path)
}

/// Build the template context for the album at `key`.
pub fn build_context(
    store: &AlbumStore,
    settings: &Settings,
    key: &Path,
) -> Result<RenderContext, RenderError> {
    let album = store
        .get(key)
        .ok_or_else(|| RenderError::UnknownAlbum(key.to_path_buf()))?;
    let breadcrumb = build_breadcrumb(store, key)?;
    let paths = render_breadcrumb(&breadcrumb).into_string();
    let up = up_to_root(key);

    let images = album
        .images
        .iter()
        .map(|file| ImageEntry {
            file: file.clone(),
            url: url_segment(file),
            thumb: url_path(Path::new(&settings.thumb_path(file))),
        })
        .collect();

    let mut albums = Vec::with_capacity(album.subalbums.len());
    for name in &album.subalbums {
        let child_key = key.join(name);
        let child = store
            .get(&child_key)
            .ok_or_else(|| RenderError::UnknownAlbum(child_key.clone()))?;
        let thumb = match &child.thumbnail {
            Some(rep) => Some(subalbum_thumb(settings, name, rep)),
            None => {
                warn!(
                    "Linking {} without a thumbnail: album has no images",
                    store.album_dir(&child_key).display()
                );
                None
            }
        };
        albums.push(SubAlbumEntry {
            path: format!("{}/{INDEX_PAGE}", url_segment(name)),
            title: child.title.clone(),
            thumb,
        });
    }

    Ok(RenderContext {
        title: album.title.clone(),
        description: album.description.clone(),
        representative: album.representative.clone(),
        breadcrumb,
        paths,
        theme: ThemeRef {
            name: settings.theme.clone(),
            path: format!("{up}{THEME_OUTPUT_DIR}"),
        },
        home_path: format!("{up}{INDEX_PAGE}"),
        images,
        albums,
        generator: GeneratorInfo::default(),
    })
}

// ============================================================================
// Renderer
// ============================================================================

/// Recursive copy of `src` into `dest`.
fn copy_dir(src: &Path, dest: &Path) -> Result<(), RenderError> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| RenderError::Io {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| src.to_path_buf()),
            source: e.into(),
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(Path::new(""));
        let target = dest.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(io_error(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(io_error(&target))?;
        }
    }
    Ok(())
}

/// A parsed theme, ready to render album pages.
pub struct Renderer {
    source: ThemeSource,
    template: liquid::Template,
}

impl Renderer {
    /// Load and parse `<theme_dir>/index.html`.
    pub fn new(theme_dir: &Path) -> Result<Self, RenderError> {
        Self::load(ThemeSource::Dir(theme_dir.to_path_buf()))
    }

    /// Load and parse the template of `source`.
    pub fn load(source: ThemeSource) -> Result<Self, RenderError> {
        let template_path = source.template_path();
        let content = match &source {
            ThemeSource::Dir(_) => {
                if !template_path.is_file() {
                    return Err(RenderError::MissingTemplate(template_path));
                }
                Cow::Owned(fs::read_to_string(&template_path).map_err(io_error(&template_path))?)
            }
            ThemeSource::Bundled => Cow::Borrowed(BUNDLED_TEMPLATE),
        };

        let template_error = |err| RenderError::Template {
            path: template_path.clone(),
            source: err,
        };
        let template = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(template_error)?
            .parse(&content)
            .map_err(template_error)?;

        Ok(Self { source, template })
    }

    /// Copy the theme to `<root>/theme`, overwriting older copies.
    pub fn copy_theme(&self, root: &Path) -> Result<PathBuf, RenderError> {
        let dest = root.join(THEME_OUTPUT_DIR);
        match &self.source {
            ThemeSource::Dir(theme_dir) => copy_dir(theme_dir, &dest)?,
            ThemeSource::Bundled => {
                for (rel, content) in BUNDLED_FILES {
                    let target = dest.join(rel);
                    if let Some(parent) = target.parent() {
                        fs::create_dir_all(parent).map_err(io_error(parent))?;
                    }
                    fs::write(&target, content).map_err(io_error(&target))?;
                }
            }
        }
        debug!("Copied theme to {}", dest.display());
        Ok(dest)
    }

    /// Render one context to HTML.
    pub fn render_page(&self, ctx: &RenderContext) -> Result<String, RenderError> {
        let template_error = |source| RenderError::Template {
            path: self.source.template_path(),
            source,
        };
        let globals = liquid::to_object(ctx).map_err(template_error)?;
        self.template.render(&globals).map_err(template_error)
    }

    /// Render the album at `key` and write its `index.html`.
    ///
    /// Returns the path of the written page.
    pub fn render_album(
        &self,
        store: &AlbumStore,
        settings: &Settings,
        key: &Path,
    ) -> Result<PathBuf, RenderError> {
        let ctx = build_context(store, settings, key)?;
        let page = self.render_page(&ctx)?;
        let output = store.album_dir(key).join(INDEX_PAGE);
        fs::write(&output, page).map_err(io_error(&output))?;
        debug!("Wrote {}", output.display());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Album;
    use tempfile::TempDir;

    fn album(title: &str, subalbums: &[&str]) -> Album {
        Album {
            title: title.to_string(),
            subalbums: subalbums.iter().map(|s| s.to_string()).collect(),
            ..Album::default()
        }
    }

    /// root → family → 2019, plus an empty sibling.
    fn sample_store() -> AlbumStore {
        let mut store = AlbumStore::new("/gallery");
        store.insert(PathBuf::new(), album("Gallery", &["empty", "family"]));
        store.insert(PathBuf::from("empty"), album("Empty", &[]));
        store.insert(
            PathBuf::from("family"),
            Album {
                thumbnail: Some(Representative {
                    dir: PathBuf::from("2019"),
                    file: "beach.jpg".to_string(),
                }),
                ..album("Family", &["2019"])
            },
        );
        store.insert(
            PathBuf::from("family/2019"),
            Album {
                images: vec!["beach.jpg".to_string(), "pier.jpg".to_string()],
                thumbnail: Some(Representative::direct("beach.jpg")),
                ..album("Summer <2019>", &[])
            },
        );
        store
    }

    fn settings() -> Settings {
        Settings {
            thumb_dir: "thumbs".to_string(),
            thumb_prefix: "t_".to_string(),
            ..Settings::default()
        }
    }

    // =========================================================================
    // Breadcrumb tests
    // =========================================================================

    #[test]
    fn root_breadcrumb_is_root_only() {
        let crumbs = build_breadcrumb(&sample_store(), Path::new("")).unwrap();
        assert_eq!(
            crumbs,
            vec![Crumb {
                title: "Gallery".to_string(),
                link: "index.html".to_string(),
            }]
        );
    }

    #[test]
    fn nested_breadcrumb_has_depth_plus_one_entries() {
        let crumbs = build_breadcrumb(&sample_store(), Path::new("family/2019")).unwrap();
        let pairs: Vec<(&str, &str)> = crumbs
            .iter()
            .map(|c| (c.title.as_str(), c.link.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Gallery", "../../index.html"),
                ("Family", "../index.html"),
                ("Summer <2019>", "index.html"),
            ]
        );
    }

    #[test]
    fn breadcrumb_of_unknown_album_errors() {
        let result = build_breadcrumb(&sample_store(), Path::new("nope"));
        assert!(matches!(result, Err(RenderError::UnknownAlbum(_))));
    }

    #[test]
    fn breadcrumb_html_escapes_and_joins() {
        let crumbs = build_breadcrumb(&sample_store(), Path::new("family/2019")).unwrap();
        let html = render_breadcrumb(&crumbs).into_string();
        assert_eq!(
            html,
            "<a href=\"../../index.html\">Gallery</a> \u{bb} \
             <a href=\"../index.html\">Family</a> \u{bb} \
             <a href=\"index.html\">Summer &lt;2019&gt;</a>"
        );
    }

    // =========================================================================
    // Context tests
    // =========================================================================

    #[test]
    fn image_thumbnails_use_dir_and_prefix() {
        let ctx = build_context(&sample_store(), &settings(), Path::new("family/2019")).unwrap();
        assert_eq!(
            ctx.images,
            vec![
                ImageEntry {
                    file: "beach.jpg".to_string(),
                    url: "beach.jpg".to_string(),
                    thumb: "thumbs/t_beach.jpg".to_string(),
                },
                ImageEntry {
                    file: "pier.jpg".to_string(),
                    url: "pier.jpg".to_string(),
                    thumb: "thumbs/t_pier.jpg".to_string(),
                },
            ]
        );
    }

    #[test]
    fn subalbum_entries_link_and_thumb() {
        let ctx = build_context(&sample_store(), &settings(), Path::new("")).unwrap();
        assert_eq!(
            ctx.albums,
            vec![
                SubAlbumEntry {
                    path: "empty/index.html".to_string(),
                    title: "Empty".to_string(),
                    thumb: None,
                },
                SubAlbumEntry {
                    path: "family/index.html".to_string(),
                    title: "Family".to_string(),
                    thumb: Some("family/2019/thumbs/t_beach.jpg".to_string()),
                },
            ]
        );
    }

    #[test]
    fn direct_subalbum_thumb() {
        let ctx = build_context(&sample_store(), &settings(), Path::new("family")).unwrap();
        assert_eq!(
            ctx.albums[0].thumb.as_deref(),
            Some("2019/thumbs/t_beach.jpg")
        );
    }

    #[test]
    fn link_segments_are_percent_encoded() {
        let mut store = AlbumStore::new("/gallery");
        store.insert(PathBuf::new(), album("Gallery", &["best #1"]));
        store.insert(
            PathBuf::from("best #1"),
            Album {
                images: vec!["a#1.png".to_string(), "say \"hi\".png".to_string()],
                thumbnail: Some(Representative::direct("a#1.png")),
                ..album("Best", &[])
            },
        );

        let root = build_context(&store, &settings(), Path::new("")).unwrap();
        assert_eq!(root.albums[0].path, "best%20%231/index.html");
        assert_eq!(
            root.albums[0].thumb.as_deref(),
            Some("best%20%231/thumbs/t_a%231.png")
        );

        let ctx = build_context(&store, &settings(), Path::new("best #1")).unwrap();
        assert_eq!(ctx.images[0].file, "a#1.png");
        assert_eq!(ctx.images[0].url, "a%231.png");
        assert_eq!(ctx.images[1].url, "say%20%22hi%22.png");
        assert_eq!(ctx.images[1].thumb, "thumbs/t_say%20%22hi%22.png");
    }

    #[test]
    fn theme_and_home_paths_follow_depth() {
        let store = sample_store();
        let root = build_context(&store, &settings(), Path::new("")).unwrap();
        assert_eq!(root.theme.path, "theme");
        assert_eq!(root.home_path, "index.html");

        let nested = build_context(&store, &settings(), Path::new("family/2019")).unwrap();
        assert_eq!(nested.theme.path, "../../theme");
        assert_eq!(nested.theme.name, "default");
        assert_eq!(nested.home_path, "../../index.html");
    }

    // =========================================================================
    // Renderer tests
    // =========================================================================

    #[test]
    fn missing_template_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = Renderer::new(tmp.path());
        assert!(matches!(result, Err(RenderError::MissingTemplate(_))));
    }

    #[test]
    fn invalid_template_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(INDEX_PAGE), "{% for x in %}").unwrap();
        let result = Renderer::new(tmp.path());
        assert!(matches!(result, Err(RenderError::Template { .. })));
    }

    #[test]
    fn renders_context_variables() {
        let tmp = TempDir::new().unwrap();
        write_theme(tmp.path());
        let renderer = Renderer::new(tmp.path()).unwrap();
        let ctx = build_context(&sample_store(), &settings(), Path::new("")).unwrap();

        let html = renderer.render_page(&ctx).unwrap();

        assert!(html.contains("<title>Gallery</title>"));
        assert!(html.contains("href=\"theme/css/style.css\""));
        assert!(html.contains("<a href=\"family/index.html\">Family|family/2019/thumbs/t_beach.jpg</a>"));
        assert!(html.contains("<a href=\"empty/index.html\">Empty|</a>"));
    }

    #[test]
    fn copy_theme_copies_nested_assets() {
        let themes = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();
        write_theme(themes.path());
        let renderer = Renderer::new(themes.path()).unwrap();

        let dest = renderer.copy_theme(gallery.path()).unwrap();

        assert_eq!(dest, gallery.path().join("theme"));
        assert!(dest.join("css/style.css").is_file());
        assert!(dest.join(INDEX_PAGE).is_file());
    }

    #[test]
    fn locate_prefers_theme_on_disk() {
        let themes = TempDir::new().unwrap();
        write_theme(&themes.path().join(DEFAULT_THEME));

        assert_eq!(
            ThemeSource::locate(themes.path(), DEFAULT_THEME),
            ThemeSource::Dir(themes.path().join(DEFAULT_THEME))
        );
    }

    #[test]
    fn locate_falls_back_to_bundled_default() {
        let themes = TempDir::new().unwrap();

        assert_eq!(
            ThemeSource::locate(&themes.path().join("missing"), DEFAULT_THEME),
            ThemeSource::Bundled
        );
        assert_eq!(
            ThemeSource::locate(themes.path(), "dark"),
            ThemeSource::Dir(themes.path().join("dark"))
        );
    }

    #[test]
    fn bundled_theme_renders_and_copies() {
        let gallery = TempDir::new().unwrap();
        let renderer = Renderer::load(ThemeSource::Bundled).unwrap();

        let dest = renderer.copy_theme(gallery.path()).unwrap();
        assert_eq!(fs::read_to_string(dest.join("css/style.css")).unwrap(), BUNDLED_STYLE);
        assert!(dest.join(INDEX_PAGE).is_file());

        let ctx = build_context(&sample_store(), &settings(), Path::new("family/2019")).unwrap();
        let html = renderer.render_page(&ctx).unwrap();
        assert!(html.contains("<title>Summer &lt;2019&gt;</title>"));
        assert!(html.contains(r#"href="../../theme/css/style.css""#));
        assert!(html.contains(r#"<a href="beach.jpg"><img src="thumbs/t_beach.jpg""#));
    }

    #[test]
    fn render_album_writes_index() {
        let themes = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();
        write_theme(themes.path());
        let renderer = Renderer::new(themes.path()).unwrap();
        let mut store = AlbumStore::new(gallery.path());
        store.insert(PathBuf::new(), album("Home", &[]));

        let written = renderer
            .render_album(&store, &settings(), Path::new(""))
            .unwrap();

        assert_eq!(written, gallery.path().join(INDEX_PAGE));
        let html = fs::read_to_string(written).unwrap();
        assert!(html.contains("<title>Home</title>"));
    }

    #[test]
    fn render_album_into_missing_directory_fails() {
        let themes = TempDir::new().unwrap();
        let gallery = TempDir::new().unwrap();
        write_theme(themes.path());
        let renderer = Renderer::new(themes.path()).unwrap();
        let mut store = AlbumStore::new(gallery.path().join("gone"));
        store.insert(PathBuf::new(), album("Home", &[]));

        let result = renderer.render_album(&store, &settings(), Path::new(""));

        assert!(matches!(result, Err(RenderError::Io { .. })));
    }
}
