//! Terminal output: a document root that reports mode changes, and snapshot
//! formatting.

use console::{style, StyledObject};
use folio_theme::env::DocumentRoot;
use folio_theme::{ColorMode, Preference, ThemeSnapshot};

/// Document root that prints a line each time the dark marker flips.
pub struct TerminalRoot {
    dark_class: String,
    dark: Option<bool>,
}

impl TerminalRoot {
    pub fn new(dark_class: impl Into<String>) -> Self {
        Self {
            dark_class: dark_class.into(),
            dark: None,
        }
    }
}

impl DocumentRoot for TerminalRoot {
    fn set_class(&mut self, class: &str, present: bool) {
        if class != self.dark_class || self.dark == Some(present) {
            return;
        }
        self.dark = Some(present);
        let mode = if present { ColorMode::Dark } else { ColorMode::Light };
        println!("{} {}", style("→").dim(), mode_label(mode));
    }

    fn set_meta_content(&mut self, _name: &str, _content: &str) -> bool {
        false
    }
}

pub fn mode_label(mode: ColorMode) -> StyledObject<&'static str> {
    match mode {
        ColorMode::Light => style(mode.as_str()).yellow().bold(),
        ColorMode::Dark => style(mode.as_str()).blue().bold(),
    }
}

pub fn format_snapshot(snapshot: &ThemeSnapshot) -> String {
    format!(
        "{:<11}{}\n{:<11}{}",
        "preference",
        style(snapshot.preference).cyan(),
        "resolved",
        mode_label(snapshot.resolved),
    )
}

pub fn format_options(current: Preference) -> String {
    Preference::ALL
        .iter()
        .map(|pref| {
            let option = pref.option();
            let marker = if *pref == current { "*" } else { " " };
            format!(
                "{} {:<7} {:<6} ({})",
                marker,
                option.preference.as_str(),
                option.label,
                option.icon
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
