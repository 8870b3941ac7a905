//! Pre-paint bootstrap markup.
//!
//! The controller only runs once the UI has initialised. Until then the page
//! must already show the right mode, so the served markup carries a small
//! synchronous script that performs the same resolution as
//! [`ThemeStore::resolve`](crate::ThemeStore::resolve): an absent or
//! unrecognised stored value counts as `system`, and `system` follows
//! `prefers-color-scheme`.
//!
//! ```rust
//! use folio_theme::{bootstrap, ThemeConfig};
//!
//! let config = ThemeConfig::default();
//! let tag = bootstrap::script_tag(&config);
//! assert!(tag.starts_with("<script>"));
//! assert!(tag.contains("\"portfolio-theme\""));
//! ```

use crate::config::{ThemeConfig, THEME_COLOR_META};
use crate::{ColorMode, Preference};

/// The inline script body.
pub fn inline_script(config: &ThemeConfig) -> String {
    let valid = Preference::ALL
        .iter()
        .map(|p| format!("stored === {}", js_string(p.as_str())))
        .collect::<Vec<_>>()
        .join(" || ");

    format!(
        r#"(function () {{
  var root = document.documentElement;
  var preference = {system};
  try {{
    var stored = window.localStorage.getItem({key});
    if ({valid}) {{
      preference = stored;
    }}
  }} catch (e) {{}}
  var dark = preference === {dark};
  if (preference === {system}) {{
    try {{
      dark = !!(window.matchMedia && window.matchMedia('(prefers-color-scheme: dark)').matches);
    }} catch (e) {{
      dark = false;
    }}
  }}
  if (dark) {{
    root.classList.add({class});
  }} else {{
    root.classList.remove({class});
  }}
  var meta = document.querySelector('meta[name="{meta}"]');
  if (meta) {{
    meta.setAttribute('content', dark ? {dark_color} : {light_color});
  }}
}})();"#,
        system = js_string(Preference::System.as_str()),
        dark = js_string(Preference::Dark.as_str()),
        key = js_string(&config.storage_key),
        valid = valid,
        class = js_string(&config.dark_class),
        meta = THEME_COLOR_META,
        dark_color = js_string(config.chrome_colors.for_mode(ColorMode::Dark)),
        light_color = js_string(config.chrome_colors.for_mode(ColorMode::Light)),
    )
}

/// The inline script wrapped in a `<script>` element.
pub fn script_tag(config: &ThemeConfig) -> String {
    format!("<script>{}</script>", inline_script(config))
}

/// Head tags for the theme-color hint and supported color schemes.
///
/// The theme-color starts at the light value; the bootstrap script corrects it
/// before first paint.
pub fn head_tags(config: &ThemeConfig) -> String {
    format!(
        "<meta name=\"{}\" content=\"{}\">\n<meta name=\"color-scheme\" content=\"light dark\">",
        THEME_COLOR_META,
        escape_attr(config.chrome_colors.for_mode(ColorMode::Light)),
    )
}

/// A JavaScript string literal that is also safe inside a `<script>` element.
fn js_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace("</", "<\\/")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
