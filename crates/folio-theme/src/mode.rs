//! Preference and color mode types.
//!
//! A [`Preference`] is what the user asked for; a [`ColorMode`] is what is
//! actually displayed. The two only differ when the preference is
//! [`Preference::System`], in which case the mode follows the environment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ThemeError;

/// A displayed color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light mode (light background, dark text).
    Light,
    /// Dark mode (dark background, light text).
    Dark,
}

impl ColorMode {
    /// The literal used for this mode in storage and markup.
    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user's theme intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Light,
    Dark,
    /// Follow the environment's color scheme.
    #[default]
    System,
}

impl Preference {
    /// All preferences, in picker order.
    pub const ALL: [Preference; 3] = [Preference::Light, Preference::Dark, Preference::System];

    /// The literal persisted for this preference.
    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Light => "light",
            Preference::Dark => "dark",
            Preference::System => "system",
        }
    }

    /// Parses a persisted literal.
    ///
    /// Matching is exact: `"Dark"`, `" dark"` and the empty string are all
    /// rejected.
    pub fn parse(raw: &str) -> Option<Preference> {
        match raw {
            "light" => Some(Preference::Light),
            "dark" => Some(Preference::Dark),
            "system" => Some(Preference::System),
            _ => None,
        }
    }

    /// The fixed mode for explicit preferences, `None` for `System`.
    pub fn fixed_mode(self) -> Option<ColorMode> {
        match self {
            Preference::Light => Some(ColorMode::Light),
            Preference::Dark => Some(ColorMode::Dark),
            Preference::System => None,
        }
    }

    /// Presentation metadata for theme pickers.
    pub fn option(self) -> ThemeOption {
        match self {
            Preference::Light => ThemeOption {
                preference: self,
                label: "Light",
                icon: "sun",
            },
            Preference::Dark => ThemeOption {
                preference: self,
                label: "Dark",
                icon: "moon",
            },
            Preference::System => ThemeOption {
                preference: self,
                label: "Auto",
                icon: "monitor",
            },
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preference {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preference::parse(s).ok_or_else(|| ThemeError::invalid_preference(s))
    }
}

impl From<ColorMode> for Preference {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => Preference::Light,
            ColorMode::Dark => Preference::Dark,
        }
    }
}

/// A selectable entry in a theme picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeOption {
    pub preference: Preference,
    /// Human-readable label.
    pub label: &'static str,
    /// Icon name (`sun`, `moon`, `monitor`).
    pub icon: &'static str,
}
