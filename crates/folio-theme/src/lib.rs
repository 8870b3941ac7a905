//! # Folio Theme - light/dark/system theme handling
//!
//! `folio-theme` decides whether the portfolio site is shown in light or dark
//! mode and keeps that decision consistent everywhere it is made: in the
//! pre-paint bootstrap script, at controller mount, on user changes, and when
//! the operating system switches schemes.
//!
//! ## Core Concepts
//!
//! - [`Preference`]: what the user asked for (`light`, `dark`, `system`)
//! - [`ColorMode`]: what is displayed (`light`, `dark`)
//! - [`ThemeStore`]: reads/writes the persisted preference and resolves it
//! - [`ThemeController`]: per-session state machine driving the document root
//! - [`env`]: the host capabilities (storage, scheme signal, document), with
//!   real and mock implementations
//! - [`bootstrap`]: the inline script and head tags shipped with the markup
//!
//! ## Resolution
//!
//! ```text
//! Preference::Light  → ColorMode::Light
//! Preference::Dark   → ColorMode::Dark
//! Preference::System → OS scheme (Light if unknown)
//! ```
//!
//! A stored value other than the three literals, a missing key, and a failing
//! storage backend all read as `System`. Nothing in this crate surfaces
//! storage or OS errors to the caller; they are logged through `tracing` and
//! degraded to those defaults.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_theme::env::{FileStorage, HtmlRoot, SystemScheme};
//! use folio_theme::{Preference, ThemeConfig, ThemeController, ThemeStore};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = ThemeStore::new(ThemeConfig::default())
//!     .with_storage(FileStorage::new(dir.path().join("storage.json")))
//!     .with_signal(SystemScheme::new());
//!
//! let mut controller = ThemeController::new(store, HtmlRoot::new());
//! controller.mount();
//! controller.set_preference(Preference::Dark);
//! assert!(controller.snapshot().ready);
//! ```

pub mod bootstrap;
mod config;
mod controller;
pub mod env;
mod error;
mod mode;
mod store;
mod subscription;

pub use config::{
    ChromeColors, ThemeConfig, DEFAULT_DARK_CLASS, DEFAULT_STORAGE_KEY, THEME_COLOR_META,
};
pub use controller::{ThemeController, ThemeSnapshot};
pub use error::{StorageError, ThemeError};
pub use mode::{ColorMode, Preference, ThemeOption};
pub use store::ThemeStore;
pub use subscription::{ListenerApi, Subscription};
