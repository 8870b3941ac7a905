//! The per-session theme coordinator.
//!
//! A [`ThemeController`] owns the current preference and displayed mode,
//! keeps the document root in sync with them, and follows OS scheme changes
//! while the preference is `System`.
//!
//! Until [`mount`](ThemeController::mount) runs, consumers see
//! [`ThemeSnapshot::PLACEHOLDER`] (`system`/`light`, not ready). The markup is
//! pre-styled by the bootstrap script before the controller exists, so
//! consumers should branch on [`ThemeSnapshot::ready`] rather than render the
//! placeholder mode as if it were real.
//!
//! ```rust
//! use folio_theme::env::{HtmlRoot, MemoryStorage, MockScheme};
//! use folio_theme::{ColorMode, Preference, ThemeConfig, ThemeController, ThemeStore};
//!
//! let store = ThemeStore::new(ThemeConfig::default())
//!     .with_storage(MemoryStorage::new())
//!     .with_signal(MockScheme::new(ColorMode::Dark));
//! let root = HtmlRoot::new();
//!
//! let mut controller = ThemeController::new(store, root.clone());
//! assert!(!controller.snapshot().ready);
//!
//! controller.mount();
//! assert_eq!(controller.resolved_mode(), ColorMode::Dark);
//! assert!(root.has_class("dark"));
//!
//! controller.set_preference(Preference::Light);
//! assert!(!root.has_class("dark"));
//! ```

use std::sync::{Arc, Mutex, Weak};

use crate::env::{lock, DocumentRoot};
use crate::store::{apply_mode, ThemeStore};
use crate::subscription::{ListenerApi, Subscription};
use crate::{ColorMode, Preference, ThemeConfig, ThemeError};

/// What consumers of the controller observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSnapshot {
    pub preference: Preference,
    pub resolved: ColorMode,
    /// `false` until the controller has mounted.
    pub ready: bool,
}

impl ThemeSnapshot {
    /// The fixed value served before mount.
    pub const PLACEHOLDER: ThemeSnapshot = ThemeSnapshot {
        preference: Preference::System,
        resolved: ColorMode::Light,
        ready: false,
    };
}

struct ControllerState {
    preference: Preference,
    resolved: ColorMode,
    ready: bool,
    document: Box<dyn DocumentRoot>,
}

pub struct ThemeController {
    state: Arc<Mutex<ControllerState>>,
    store: ThemeStore,
    subscription: Option<Subscription>,
}

impl ThemeController {
    pub fn new<D: DocumentRoot + 'static>(store: ThemeStore, document: D) -> Self {
        Self {
            state: Arc::new(Mutex::new(ControllerState {
                preference: ThemeSnapshot::PLACEHOLDER.preference,
                resolved: ThemeSnapshot::PLACEHOLDER.resolved,
                ready: false,
                document: Box::new(document),
            })),
            store,
            subscription: None,
        }
    }

    /// Reads the stored preference, applies it, and starts following OS
    /// scheme changes. Does nothing if already mounted.
    pub fn mount(&mut self) {
        let mut state = lock(&self.state);
        if state.ready {
            return;
        }

        // Subscribed before resolving, under the state lock: a scheme change
        // racing the initial read is either seen by `resolve` or delivered
        // once the lock is released.
        let weak = Arc::downgrade(&self.state);
        let config = self.store.config().clone();
        let subscription = self
            .store
            .subscribe_os_scheme(move |mode| on_os_scheme_change(&weak, mode, &config));

        let preference = self.store.read_preference();
        let resolved = self.store.resolve(preference);
        self.store.apply_to_document(state.document.as_mut(), resolved);
        state.preference = preference;
        state.resolved = resolved;
        state.ready = true;
        tracing::debug!(%preference, %resolved, "theme controller mounted");
        drop(state);

        self.subscription = Some(subscription);
    }

    /// Stops following OS scheme changes. The controller reports the
    /// placeholder again until remounted.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        lock(&self.state).ready = false;
    }

    /// Sets, persists and applies a new preference.
    ///
    /// Persistence failures are logged and do not roll back the change.
    /// Before mount this is a no-op.
    pub fn set_preference(&self, preference: Preference) {
        let mut state = lock(&self.state);
        if !state.ready {
            tracing::debug!(%preference, "ignoring preference change before mount");
            return;
        }

        state.preference = preference;
        self.store.write_preference(preference);
        let resolved = self.store.resolve(preference);
        state.resolved = resolved;
        self.store.apply_to_document(state.document.as_mut(), resolved);
        tracing::debug!(%preference, %resolved, "theme preference set");
    }

    /// Parses `raw` and sets it as the preference.
    ///
    /// Anything other than `light`, `dark` or `system` is rejected without
    /// touching state, storage or the document.
    pub fn set_preference_str(&self, raw: &str) -> Result<Preference, ThemeError> {
        let preference = raw.parse::<Preference>().inspect_err(|_| {
            tracing::debug!(value = %raw, "rejected invalid theme preference");
        })?;
        self.set_preference(preference);
        Ok(preference)
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        let state = lock(&self.state);
        if !state.ready {
            return ThemeSnapshot::PLACEHOLDER;
        }
        ThemeSnapshot {
            preference: state.preference,
            resolved: state.resolved,
            ready: true,
        }
    }

    pub fn preference(&self) -> Preference {
        self.snapshot().preference
    }

    pub fn resolved_mode(&self) -> ColorMode {
        self.snapshot().resolved
    }

    pub fn is_ready(&self) -> bool {
        lock(&self.state).ready
    }

    /// The listener API the OS subscription ended up on, if any.
    pub fn subscription_api(&self) -> Option<ListenerApi> {
        self.subscription.as_ref().and_then(Subscription::api)
    }

    pub fn store(&self) -> &ThemeStore {
        &self.store
    }
}

fn on_os_scheme_change(
    state: &Weak<Mutex<ControllerState>>,
    mode: ColorMode,
    config: &ThemeConfig,
) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let mut state = lock(&state);
    if !state.ready || state.preference != Preference::System {
        return;
    }
    state.resolved = mode;
    apply_mode(state.document.as_mut(), mode, config);
    tracing::debug!(%mode, "followed os color scheme change");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{HtmlRoot, MemoryStorage, MockScheme};

    struct Fixture {
        controller: ThemeController,
        storage: MemoryStorage,
        scheme: MockScheme,
        root: HtmlRoot,
    }

    fn fixture(storage: MemoryStorage, scheme: MockScheme) -> Fixture {
        let root = HtmlRoot::new().with_meta("theme-color", "#ffffff");
        let store = ThemeStore::new(ThemeConfig::default())
            .with_storage(storage.clone())
            .with_signal(scheme.clone());
        Fixture {
            controller: ThemeController::new(store, root.clone()),
            storage,
            scheme,
            root,
        }
    }

    #[test]
    fn test_placeholder_before_mount() {
        let f = fixture(
            MemoryStorage::new().with_item("portfolio-theme", "dark"),
            MockScheme::new(ColorMode::Dark),
        );
        assert_eq!(f.controller.snapshot(), ThemeSnapshot::PLACEHOLDER);
        assert!(!f.controller.is_ready());
        assert!(!f.root.has_class("dark"));
    }

    #[test]
    fn test_set_before_mount_is_noop() {
        let f = fixture(MemoryStorage::new(), MockScheme::new(ColorMode::Light));
        f.controller.set_preference(Preference::Dark);
        assert_eq!(f.storage.write_count(), 0);
        assert!(!f.root.has_class("dark"));
    }

    #[test]
    fn test_mount_reads_stored_preference() {
        let mut f = fixture(
            MemoryStorage::new().with_item("portfolio-theme", "dark"),
            MockScheme::new(ColorMode::Light),
        );
        f.controller.mount();

        let snapshot = f.controller.snapshot();
        assert!(snapshot.ready);
        assert_eq!(snapshot.preference, Preference::Dark);
        assert_eq!(snapshot.resolved, ColorMode::Dark);
        assert!(f.root.has_class("dark"));
        assert_eq!(f.root.meta("theme-color").as_deref(), Some("#111827"));
    }

    #[test]
    fn test_mount_twice_keeps_one_subscription() {
        let mut f = fixture(MemoryStorage::new(), MockScheme::new(ColorMode::Light));
        f.controller.mount();
        f.controller.mount();
        assert_eq!(f.scheme.listener_count(ListenerApi::Change), 1);
        assert_eq!(f.controller.subscription_api(), Some(ListenerApi::Change));
    }

    #[test]
    fn test_os_change_followed_under_system() {
        let mut f = fixture(MemoryStorage::new(), MockScheme::new(ColorMode::Light));
        f.controller.mount();

        f.scheme.flip(ColorMode::Dark);

        assert_eq!(f.controller.resolved_mode(), ColorMode::Dark);
        assert!(f.root.has_class("dark"));
    }

    #[test]
    fn test_os_change_ignored_under_explicit_preference() {
        let mut f = fixture(MemoryStorage::new(), MockScheme::new(ColorMode::Light));
        f.controller.mount();
        f.controller.set_preference(Preference::Light);

        f.scheme.flip(ColorMode::Dark);

        assert_eq!(f.controller.resolved_mode(), ColorMode::Light);
        assert!(!f.root.has_class("dark"));
        // Still subscribed, just not acting on it.
        assert_eq!(f.scheme.listener_count(ListenerApi::Change), 1);
    }

    #[test]
    fn test_set_preference_persists_and_applies() {
        let mut f = fixture(MemoryStorage::new(), MockScheme::new(ColorMode::Light));
        f.controller.mount();

        f.controller.set_preference(Preference::Dark);

        assert_eq!(f.storage.get("portfolio-theme").as_deref(), Some("dark"));
        assert_eq!(f.controller.preference(), Preference::Dark);
        assert!(f.root.has_class("dark"));
    }

    #[test]
    fn test_set_system_resolves_through_os() {
        let mut f = fixture(
            MemoryStorage::new().with_item("portfolio-theme", "light"),
            MockScheme::new(ColorMode::Dark),
        );
        f.controller.mount();
        assert_eq!(f.controller.resolved_mode(), ColorMode::Light);

        f.controller.set_preference(Preference::System);
        assert_eq!(f.controller.resolved_mode(), ColorMode::Dark);
    }

    #[test]
    fn test_persist_failure_keeps_in_memory_change() {
        let storage = MemoryStorage::new();
        storage.fail_writes(true);
        let mut f = fixture(storage, MockScheme::new(ColorMode::Light));
        f.controller.mount();

        f.controller.set_preference(Preference::Dark);

        assert_eq!(f.controller.preference(), Preference::Dark);
        assert!(f.root.has_class("dark"));
        assert_eq!(f.storage.get("portfolio-theme"), None);
    }

    #[test]
    fn test_invalid_string_rejected_without_mutation() {
        let mut f = fixture(
            MemoryStorage::new().with_item("portfolio-theme", "dark"),
            MockScheme::new(ColorMode::Light),
        );
        f.controller.mount();
        let before = f.controller.snapshot();

        let result = f.controller.set_preference_str("junk");

        assert!(matches!(result, Err(ThemeError::InvalidPreference(_))));
        assert_eq!(f.controller.snapshot(), before);
        assert_eq!(f.storage.get("portfolio-theme").as_deref(), Some("dark"));
        assert_eq!(f.storage.write_count(), 0);
        assert!(f.root.has_class("dark"));
    }

    #[test]
    fn test_valid_string_accepted() {
        let mut f = fixture(MemoryStorage::new(), MockScheme::new(ColorMode::Light));
        f.controller.mount();
        assert_eq!(f.controller.set_preference_str("dark").unwrap(), Preference::Dark);
        assert_eq!(f.controller.resolved_mode(), ColorMode::Dark);
    }

    #[test]
    fn test_unmount_cancels_subscription() {
        let mut f = fixture(MemoryStorage::new(), MockScheme::new(ColorMode::Light));
        f.controller.mount();
        f.controller.unmount();

        assert_eq!(f.scheme.listener_count(ListenerApi::Change), 0);
        assert_eq!(f.controller.snapshot(), ThemeSnapshot::PLACEHOLDER);

        f.scheme.flip(ColorMode::Dark);
        assert!(!f.root.has_class("dark"));
    }

    #[test]
    fn test_drop_cancels_subscription() {
        let f = fixture(MemoryStorage::new(), MockScheme::new(ColorMode::Light));
        let Fixture {
            mut controller,
            scheme,
            ..
        } = f;
        controller.mount();
        drop(controller);
        assert_eq!(scheme.listener_count(ListenerApi::Change), 0);
    }

    #[test]
    fn test_legacy_only_signal_still_followed() {
        let mut f = fixture(MemoryStorage::new(), MockScheme::legacy_only(ColorMode::Light));
        f.controller.mount();
        assert_eq!(f.controller.subscription_api(), Some(ListenerApi::Legacy));

        f.scheme.flip(ColorMode::Dark);
        assert_eq!(f.controller.resolved_mode(), ColorMode::Dark);
    }

    #[test]
    fn test_no_listener_api_still_mounts() {
        let mut f = fixture(
            MemoryStorage::new(),
            MockScheme::without_listeners(ColorMode::Dark),
        );
        f.controller.mount();
        assert_eq!(f.controller.subscription_api(), None);
        assert_eq!(f.controller.resolved_mode(), ColorMode::Dark);
    }
}
