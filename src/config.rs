//! Gallery settings.
//!
//! Settings are loaded from a TOML file (`gallery.toml` by default). Every key
//! is optional; missing keys fall back to the stock defaults below.
//!
//! ```toml
//! theme = "default"                                      # Theme directory name
//! fileextlist = [".jpg", ".jpeg", ".JPG", ".JPEG", ".png"] # Image extensions (case-sensitive)
//! thumb_dir = "thumbnails"                               # Thumbnail directory inside each album
//! thumb_prefix = ""                                      # Prefix of thumbnail filenames
//! bigimg_dir = "original"                                # Full-size image directory inside each album
//! ```
//!
//! Unknown keys are rejected to catch typos early. The loaded value is
//! validated once here; the rest of the pipeline treats it as read-only.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default settings filename looked up by the CLI.
pub const SETTINGS_FILE: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Gallery settings, read-only for the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Name of the theme directory under the themes root.
    pub theme: String,
    /// Allowed image extensions, dot included (`.jpg`). Matched case-sensitively.
    pub fileextlist: Vec<String>,
    /// Directory holding thumbnails inside each album.
    pub thumb_dir: String,
    /// Prefix prepended to an image filename to get its thumbnail filename.
    pub thumb_prefix: String,
    /// Directory holding full-size images inside each album.
    pub bigimg_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
            fileextlist: [".jpg", ".jpeg", ".JPG", ".JPEG", ".png"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            thumb_dir: "thumbnails".to_string(),
            thumb_prefix: String::new(),
            bigimg_dir: "original".to_string(),
        }
    }
}

impl Settings {
    /// Validate that names are usable as single path segments and that at
    /// least one extension is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("theme", &self.theme),
            ("thumb_dir", &self.thumb_dir),
            ("bigimg_dir", &self.bigimg_dir),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
            if !is_single_segment(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a plain directory name, got {value:?}"
                )));
            }
        }
        if self.thumb_prefix.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "thumb_prefix must not contain path separators".into(),
            ));
        }
        if self.fileextlist.is_empty() {
            return Err(ConfigError::Validation(
                "fileextlist must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .fileextlist
            .iter()
            .find(|e| e.len() < 2 || !e.starts_with('.'))
        {
            return Err(ConfigError::Validation(format!(
                "fileextlist entries must look like \".jpg\", got {ext:?}"
            )));
        }
        Ok(())
    }

    /// Whether `filename` has one of the configured extensions.
    ///
    /// The comparison includes the dot and is case-sensitive, so `.JPG` must
    /// be listed separately from `.jpg`.
    pub fn is_allowed_image(&self, filename: &str) -> bool {
        Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.fileextlist
                    .iter()
                    .any(|allowed| allowed.strip_prefix('.') == Some(ext))
            })
    }

    /// Directory names that are never albums.
    pub fn reserved_dirs(&self) -> [&str; 3] {
        ["theme", self.thumb_dir.as_str(), self.bigimg_dir.as_str()]
    }

    /// Thumbnail path of `filename`, relative to the album that holds it.
    pub fn thumb_path(&self, filename: &str) -> String {
        format!("{}/{}{}", self.thumb_dir, self.thumb_prefix, filename)
    }
}

fn is_single_segment(value: &str) -> bool {
    !value.contains(['/', '\\']) && value != "." && value != ".."
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = toml::from_str(content)?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from `path`.
///
/// A missing file yields the stock defaults; a file that exists but fails to
/// parse or validate is an error.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(path)?;
    parse_settings(&content)
}

/// Returns a fully-commented stock settings file.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallerist settings
# ==================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Theme to render with. Looked up as <themes-dir>/<theme>/ and copied to
# <gallery>/theme/ on every build.
theme = "default"

# Image file extensions, dot included. Matching is case-sensitive.
fileextlist = [".jpg", ".jpeg", ".JPG", ".JPEG", ".png"]

# Directory inside each album holding pre-generated thumbnails.
thumb_dir = "thumbnails"

# Prefix of thumbnail filenames: photo.jpg -> <thumb_dir>/<thumb_prefix>photo.jpg
thumb_prefix = ""

# Directory inside each album holding full-size images.
bigimg_dir = "original"
"##
}
