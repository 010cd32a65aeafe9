use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{WindowError, WindowResult};
use crate::event::Size;

/// Construction options for a single window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_width")]
    pub width: u32,

    #[serde(default = "default_height")]
    pub height: u32,

    #[serde(default = "default_true")]
    pub visible: bool,

    #[serde(default = "default_true")]
    pub resizable: bool,
}

fn default_title() -> String {
    "Platform Window".to_string()
}
fn default_width() -> u32 {
    1280
}
fn default_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            visible: true,
            resizable: true,
        }
    }
}

impl WindowConfig {
    #[inline]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[inline]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[inline]
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Parse a config from TOML text.
    pub fn from_toml_str(s: &str) -> WindowResult<Self> {
        toml::from_str(s).map_err(|e| WindowError::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    ///
    /// A file that exists but fails to read or parse is an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> WindowResult<Self> {
        load_toml_or_default(path)
    }
}

/// Read a TOML document into `T`, or `T::default()` when `path` does not exist.
pub fn load_toml_or_default<T>(path: impl AsRef<Path>) -> WindowResult<T>
where
    T: DeserializeOwned + Default,
{
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(s) => toml::from_str(&s)
            .map_err(|e| WindowError::Config(format!("parse {}: {}", path.display(), e))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(WindowError::Config(format!("read {}: {}", path.display(), e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = WindowConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, WindowConfig::default());
        assert_eq!(cfg.size(), Size::new(1280, 720));
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let cfg = WindowConfig::from_toml_str("title = \"Test\"\nwidth = 800\n").unwrap();
        assert_eq!(cfg.title, "Test");
        assert_eq!(cfg.width, 800);
        assert_eq!(cfg.height, 720);
        assert!(cfg.visible);
    }

    #[test]
    fn malformed_document_is_a_config_error() {
        let err = WindowConfig::from_toml_str("width = \"wide\"").unwrap_err();
        assert!(matches!(err, WindowError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("platform-window-does-not-exist.toml");
        let cfg = WindowConfig::load_or_default(&path).unwrap();
        assert_eq!(cfg, WindowConfig::default());
    }

    #[test]
    fn file_on_disk_is_parsed() {
        let path = std::env::temp_dir().join(format!(
            "platform-window-config-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "title = \"Disk\"\nheight = 480\nvisible = false\n").unwrap();
        let cfg = WindowConfig::load_or_default(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(cfg.title, "Disk");
        assert_eq!(cfg.height, 480);
        assert!(!cfg.visible);
    }

    #[derive(Debug, Default, Deserialize)]
    struct Outer {
        #[serde(default)]
        window: WindowConfig,
        #[serde(default)]
        mode: String,
    }

    #[test]
    fn any_document_type_loads_through_the_same_path() {
        let path = std::env::temp_dir().join(format!(
            "platform-window-outer-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "mode = \"poll\"\n[window]\ntitle = \"Nested\"\n").unwrap();
        let outer: Outer = load_toml_or_default(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(outer.mode, "poll");
        assert_eq!(outer.window.title, "Nested");
        assert_eq!(outer.window.width, 1280);

        let missing = std::env::temp_dir().join("platform-window-outer-missing.toml");
        let outer: Outer = load_toml_or_default(&missing).unwrap();
        assert_eq!(outer.window, WindowConfig::default());
    }
}
