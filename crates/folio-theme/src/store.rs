//! Reading, writing and resolving the theme preference.
//!
//! [`ThemeStore`] bundles the optional host capabilities with the
//! [`ThemeConfig`]. None of its operations fail: an unavailable or failing
//! storage backend reads as "no preference" and swallows writes, and a missing
//! scheme signal reads as light.

use std::sync::Arc;

use crate::config::{ThemeConfig, THEME_COLOR_META};
use crate::env::{DocumentRoot, PreferenceStorage, SchemeSignal};
use crate::subscription::Subscription;
use crate::{ColorMode, Preference};

pub struct ThemeStore {
    storage: Option<Box<dyn PreferenceStorage>>,
    signal: Option<Arc<dyn SchemeSignal>>,
    config: ThemeConfig,
}

impl ThemeStore {
    /// A store with no storage backend and no scheme signal.
    pub fn new(config: ThemeConfig) -> Self {
        Self {
            storage: None,
            signal: None,
            config,
        }
    }

    pub fn with_storage<S: PreferenceStorage + 'static>(mut self, storage: S) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn with_signal<S: SchemeSignal + 'static>(mut self, signal: S) -> Self {
        self.signal = Some(Arc::new(signal));
        self
    }

    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    pub fn has_storage(&self) -> bool {
        self.storage.is_some()
    }

    /// Reads the persisted preference, defaulting to `System`.
    pub fn read_preference(&self) -> Preference {
        let Some(storage) = &self.storage else {
            return Preference::System;
        };
        match storage.get_item(&self.config.storage_key) {
            Ok(Some(raw)) => Preference::parse(&raw).unwrap_or_else(|| {
                tracing::debug!(value = %raw, "ignoring unrecognized stored preference");
                Preference::System
            }),
            Ok(None) => Preference::System,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read theme preference");
                Preference::System
            }
        }
    }

    /// Persists `preference`. Failures are logged, not returned.
    pub fn write_preference(&self, preference: Preference) {
        let Some(storage) = &self.storage else {
            return;
        };
        if let Err(err) = storage.set_item(&self.config.storage_key, preference.as_str()) {
            tracing::warn!(error = %err, %preference, "failed to save theme preference");
        }
    }

    pub fn read_os_scheme(&self) -> ColorMode {
        self.signal
            .as_ref()
            .and_then(|signal| signal.current())
            .unwrap_or(ColorMode::Light)
    }

    /// The mode to display for `preference`.
    pub fn resolve(&self, preference: Preference) -> ColorMode {
        preference
            .fixed_mode()
            .unwrap_or_else(|| self.read_os_scheme())
    }

    pub fn apply_to_document(&self, document: &mut dyn DocumentRoot, mode: ColorMode) {
        apply_mode(document, mode, &self.config);
    }

    /// Calls `callback` whenever the OS scheme changes, until the returned
    /// subscription is cancelled or dropped.
    pub fn subscribe_os_scheme<F>(&self, callback: F) -> Subscription
    where
        F: Fn(ColorMode) + Send + Sync + 'static,
    {
        Subscription::register(self.signal.as_ref(), Arc::new(callback))
    }
}

/// Marks the document root for `mode` and updates the chrome color hint.
pub(crate) fn apply_mode(document: &mut dyn DocumentRoot, mode: ColorMode, config: &ThemeConfig) {
    document.set_class(&config.dark_class, mode.is_dark());
    document.set_meta_content(THEME_COLOR_META, config.chrome_colors.for_mode(mode));
}
