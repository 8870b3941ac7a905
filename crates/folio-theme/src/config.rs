//! Theme configuration.
//!
//! Every field has a default matching the site's markup, so an empty YAML
//! document is a valid config:
//!
//! ```rust
//! use folio_theme::ThemeConfig;
//!
//! let config = ThemeConfig::from_yaml(r##"
//! storage_key: my-theme
//! chrome_colors:
//!   dark: "#000000"
//! "##).unwrap();
//!
//! assert_eq!(config.storage_key, "my-theme");
//! assert_eq!(config.chrome_colors.light, "#ffffff");
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ColorMode, ThemeError};

/// Key under which the preference is persisted.
pub const DEFAULT_STORAGE_KEY: &str = "portfolio-theme";

/// Class set on the document root while dark mode is displayed.
pub const DEFAULT_DARK_CLASS: &str = "dark";

/// Name of the meta element carrying the UI-chrome color hint.
pub const THEME_COLOR_META: &str = "theme-color";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub dark_class: String,
    pub chrome_colors: ChromeColors,
    /// Interval for polling OS scheme changes where no push API exists.
    pub poll_interval_ms: u64,
}

impl ThemeConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ThemeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ThemeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            dark_class: DEFAULT_DARK_CLASS.to_string(),
            chrome_colors: ChromeColors::default(),
            poll_interval_ms: 2000,
        }
    }
}

/// Theme-color hint per displayed mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeColors {
    pub light: String,
    pub dark: String,
}

impl ChromeColors {
    pub fn for_mode(&self, mode: ColorMode) -> &str {
        match mode {
            ColorMode::Light => &self.light,
            ColorMode::Dark => &self.dark,
        }
    }
}

impl Default for ChromeColors {
    fn default() -> Self {
        Self {
            light: "#ffffff".to_string(),
            dark: "#111827".to_string(),
        }
    }
}
