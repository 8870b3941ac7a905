//! Environment abstractions for testability.
//!
//! The theme subsystem touches exactly three host capabilities: a durable
//! key-value store, the OS color-scheme signal, and the document root. Each is
//! a trait here, with a real implementation and a mock, so the state machine
//! can run without a browser or a desktop session.

mod document;
mod scheme;
mod storage;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{ColorMode, StorageError};

pub use document::{HtmlRoot, RootState};
pub use scheme::{MockScheme, SystemScheme};
pub use storage::{FileStorage, MemoryStorage};

/// Callback invoked with the new scheme when the environment changes it.
pub type SchemeListener = Arc<dyn Fn(ColorMode) + Send + Sync>;

/// Handle for a registered scheme listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Abstraction over durable per-origin key-value storage.
pub trait PreferenceStorage: Send + Sync {
    /// Read a value. `Ok(None)` means the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Abstraction over the environment's color-scheme signal.
///
/// Listener registration is split into two APIs. Implementations return
/// `None` from an `add_*` method they do not support, and the subscription
/// falls through to the next one.
pub trait SchemeSignal: Send + Sync {
    /// The current scheme, or `None` if it cannot be determined.
    fn current(&self) -> Option<ColorMode>;

    /// Register with the change-listener API.
    fn add_change_listener(&self, _listener: SchemeListener) -> Option<ListenerId> {
        None
    }

    fn remove_change_listener(&self, _id: ListenerId) {}

    /// Register with the legacy listener API.
    fn add_legacy_listener(&self, _listener: SchemeListener) -> Option<ListenerId> {
        None
    }

    fn remove_legacy_listener(&self, _id: ListenerId) {}
}

/// Abstraction over the root element of the rendered document.
pub trait DocumentRoot: Send {
    /// Add or remove a class on the root element.
    fn set_class(&mut self, class: &str, present: bool);

    /// Set the `content` of the named meta element.
    ///
    /// Returns `false` if the document has no such element.
    fn set_meta_content(&mut self, name: &str, content: &str) -> bool;
}

impl<S: PreferenceStorage + ?Sized> PreferenceStorage for Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }
}

impl<D: DocumentRoot + ?Sized> DocumentRoot for Box<D> {
    fn set_class(&mut self, class: &str, present: bool) {
        (**self).set_class(class, present)
    }

    fn set_meta_content(&mut self, name: &str, content: &str) -> bool {
        (**self).set_meta_content(name, content)
    }
}

/// Locks a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
