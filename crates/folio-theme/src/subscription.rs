//! Color-scheme subscriptions with listener API fallback.
//!
//! A subscription tries each [`ListenerApi`] in [`ListenerApi::PREFERRED_ORDER`]
//! once, at subscribe time, and keeps the first one the signal accepts:
//!
//! ```text
//! subscribe
//! ├── Change  → None (unsupported)
//! ├── Legacy  → Some(id) ← registered here
//! └── no-op   → (not reached)
//! ```
//!
//! The returned [`Subscription`] unregisters the listener when cancelled or
//! dropped.

use std::fmt;
use std::sync::Arc;

use crate::env::{ListenerId, SchemeListener, SchemeSignal};

/// Listener registration APIs a scheme signal may offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerApi {
    /// The change-event listener API.
    Change,
    /// The older listener API.
    Legacy,
}

impl ListenerApi {
    pub const PREFERRED_ORDER: [ListenerApi; 2] = [ListenerApi::Change, ListenerApi::Legacy];

    fn register(self, signal: &dyn SchemeSignal, listener: SchemeListener) -> Option<ListenerId> {
        match self {
            ListenerApi::Change => signal.add_change_listener(listener),
            ListenerApi::Legacy => signal.add_legacy_listener(listener),
        }
    }

    fn unregister(self, signal: &dyn SchemeSignal, id: ListenerId) {
        match self {
            ListenerApi::Change => signal.remove_change_listener(id),
            ListenerApi::Legacy => signal.remove_legacy_listener(id),
        }
    }
}

/// Cancellation handle for a scheme listener.
pub struct Subscription {
    api: Option<ListenerApi>,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// A subscription that was never registered anywhere.
    pub fn noop() -> Self {
        Self {
            api: None,
            cancel: None,
        }
    }

    /// Registers `listener` with the first API `signal` supports.
    pub fn register(signal: Option<&Arc<dyn SchemeSignal>>, listener: SchemeListener) -> Self {
        let Some(signal) = signal else {
            return Self::noop();
        };

        for api in ListenerApi::PREFERRED_ORDER {
            if let Some(id) = api.register(signal.as_ref(), Arc::clone(&listener)) {
                tracing::debug!(?api, "subscribed to color scheme changes");
                let signal = Arc::clone(signal);
                return Self {
                    api: Some(api),
                    cancel: Some(Box::new(move || api.unregister(signal.as_ref(), id))),
                };
            }
        }

        tracing::debug!("no color scheme listener api available");
        Self::noop()
    }

    /// The API the listener was registered with, `None` for a no-op.
    pub fn api(&self) -> Option<ListenerApi> {
        self.api
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }

    /// Unregister the listener. Dropping the subscription does the same.
    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("api", &self.api)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MockScheme;
    use crate::ColorMode;

    fn shared(scheme: &MockScheme) -> Arc<dyn SchemeSignal> {
        Arc::new(scheme.clone())
    }

    #[test]
    fn test_prefers_change_api() {
        let scheme = MockScheme::new(ColorMode::Light);
        let sub = Subscription::register(Some(&shared(&scheme)), Arc::new(|_| {}));
        assert_eq!(sub.api(), Some(ListenerApi::Change));
        assert_eq!(scheme.listener_count(ListenerApi::Change), 1);
        assert_eq!(scheme.listener_count(ListenerApi::Legacy), 0);
    }

    #[test]
    fn test_falls_back_to_legacy_api() {
        let scheme = MockScheme::legacy_only(ColorMode::Light);
        let sub = Subscription::register(Some(&shared(&scheme)), Arc::new(|_| {}));
        assert_eq!(sub.api(), Some(ListenerApi::Legacy));
        assert_eq!(scheme.listener_count(ListenerApi::Legacy), 1);
    }

    #[test]
    fn test_falls_back_to_noop() {
        let scheme = MockScheme::without_listeners(ColorMode::Dark);
        let sub = Subscription::register(Some(&shared(&scheme)), Arc::new(|_| {}));
        assert_eq!(sub.api(), None);
        assert!(!sub.is_active());
        sub.cancel();
    }

    #[test]
    fn test_no_signal_is_noop() {
        let sub = Subscription::register(None, Arc::new(|_| {}));
        assert!(!sub.is_active());
    }

    #[test]
    fn test_cancel_unregisters() {
        let scheme = MockScheme::new(ColorMode::Light);
        let sub = Subscription::register(Some(&shared(&scheme)), Arc::new(|_| {}));
        sub.cancel();
        assert_eq!(scheme.listener_count(ListenerApi::Change), 0);
    }

    #[test]
    fn test_drop_unregisters() {
        let scheme = MockScheme::legacy_only(ColorMode::Light);
        {
            let _sub = Subscription::register(Some(&shared(&scheme)), Arc::new(|_| {}));
            assert_eq!(scheme.listener_count(ListenerApi::Legacy), 1);
        }
        assert_eq!(scheme.listener_count(ListenerApi::Legacy), 0);
    }
}
