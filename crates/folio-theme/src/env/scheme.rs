use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};

use super::{lock, ListenerId, SchemeListener, SchemeSignal};
use crate::subscription::ListenerApi;
use crate::ColorMode;

type SchemeDetector = fn() -> Option<ColorMode>;

/// The operating system's color scheme, queried through `dark-light`.
///
/// The OS offers no change notification here, so only the legacy listener API
/// is supported, backed by a polling thread per listener.
pub struct SystemScheme {
    detector: SchemeDetector,
    poll_interval: Duration,
    next_id: AtomicU64,
    pollers: Mutex<HashMap<ListenerId, Arc<AtomicBool>>>,
}

impl SystemScheme {
    pub fn new() -> Self {
        Self::with_detector(os_scheme_detector)
    }

    /// Use a custom detector instead of querying the OS.
    pub fn with_detector(detector: SchemeDetector) -> Self {
        Self {
            detector,
            poll_interval: Duration::from_secs(2),
            next_id: AtomicU64::new(1),
            pollers: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for SystemScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeSignal for SystemScheme {
    fn current(&self) -> Option<ColorMode> {
        (self.detector)()
    }

    fn add_legacy_listener(&self, listener: SchemeListener) -> Option<ListenerId> {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let stop = Arc::new(AtomicBool::new(false));
        let detector = self.detector;
        let interval = self.poll_interval;
        let thread_stop = Arc::clone(&stop);
        // Seeded before returning so a change that lands while the caller
        // resolves its initial mode is still reported.
        let mut last = detector();

        let spawned = thread::Builder::new()
            .name("folio-scheme-poll".into())
            .spawn(move || loop {
                thread::sleep(interval);
                if thread_stop.load(Ordering::Acquire) {
                    break;
                }
                let now = detector();
                if now != last {
                    if let Some(mode) = now {
                        tracing::debug!(%mode, "os color scheme changed");
                        listener(mode);
                    }
                    last = now;
                }
            });

        match spawned {
            Ok(_) => {
                lock(&self.pollers).insert(id, stop);
                Some(id)
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not start color scheme poller");
                None
            }
        }
    }

    fn remove_legacy_listener(&self, id: ListenerId) {
        if let Some(stop) = lock(&self.pollers).remove(&id) {
            stop.store(true, Ordering::Release);
        }
    }
}

impl Drop for SystemScheme {
    fn drop(&mut self) {
        for stop in lock(&self.pollers).values() {
            stop.store(true, Ordering::Release);
        }
    }
}

fn os_scheme_detector() -> Option<ColorMode> {
    match detect_os_theme() {
        Ok(OsThemeMode::Dark) => Some(ColorMode::Dark),
        Ok(OsThemeMode::Light) => Some(ColorMode::Light),
        Ok(OsThemeMode::Unspecified) => None,
        Err(err) => {
            tracing::debug!(error = %err, "os color scheme unavailable");
            None
        }
    }
}

/// Scriptable color-scheme signal for tests.
///
/// Clones share state: keep one handle and call [`flip`](Self::flip) to
/// simulate the OS switching schemes.
#[derive(Clone)]
pub struct MockScheme {
    inner: Arc<Mutex<MockSchemeState>>,
}

struct MockSchemeState {
    current: Option<ColorMode>,
    change_api: bool,
    legacy_api: bool,
    next_id: u64,
    listeners: BTreeMap<ListenerId, (ListenerApi, SchemeListener)>,
}

impl MockScheme {
    /// A signal reporting `mode` that supports both listener APIs.
    pub fn new(mode: ColorMode) -> Self {
        Self::build(Some(mode), true, true)
    }

    /// A signal that cannot report the scheme and accepts no listeners.
    pub fn unavailable() -> Self {
        Self::build(None, false, false)
    }

    /// Only the legacy listener API is supported.
    pub fn legacy_only(mode: ColorMode) -> Self {
        Self::build(Some(mode), false, true)
    }

    /// The scheme can be read but no listener API is supported.
    pub fn without_listeners(mode: ColorMode) -> Self {
        Self::build(Some(mode), false, false)
    }

    fn build(current: Option<ColorMode>, change_api: bool, legacy_api: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockSchemeState {
                current,
                change_api,
                legacy_api,
                next_id: 1,
                listeners: BTreeMap::new(),
            })),
        }
    }

    /// Switch the scheme and notify every registered listener.
    pub fn flip(&self, mode: ColorMode) {
        let listeners: Vec<SchemeListener> = {
            let mut state = lock(&self.inner);
            state.current = Some(mode);
            state.listeners.values().map(|(_, l)| Arc::clone(l)).collect()
        };
        for listener in listeners {
            listener(mode);
        }
    }

    /// Number of live listeners registered through `api`.
    pub fn listener_count(&self, api: ListenerApi) -> usize {
        lock(&self.inner)
            .listeners
            .values()
            .filter(|(registered, _)| *registered == api)
            .count()
    }

    fn add(&self, api: ListenerApi, listener: SchemeListener) -> Option<ListenerId> {
        let mut state = lock(&self.inner);
        let supported = match api {
            ListenerApi::Change => state.change_api,
            ListenerApi::Legacy => state.legacy_api,
        };
        if !supported {
            return None;
        }
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.listeners.insert(id, (api, listener));
        Some(id)
    }

    fn remove(&self, id: ListenerId) {
        lock(&self.inner).listeners.remove(&id);
    }
}

impl SchemeSignal for MockScheme {
    fn current(&self) -> Option<ColorMode> {
        lock(&self.inner).current
    }

    fn add_change_listener(&self, listener: SchemeListener) -> Option<ListenerId> {
        self.add(ListenerApi::Change, listener)
    }

    fn remove_change_listener(&self, id: ListenerId) {
        self.remove(id)
    }

    fn add_legacy_listener(&self, listener: SchemeListener) -> Option<ListenerId> {
        self.add(ListenerApi::Legacy, listener)
    }

    fn remove_legacy_listener(&self, id: ListenerId) {
        self.remove(id)
    }
}
