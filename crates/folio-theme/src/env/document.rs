use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use super::{lock, DocumentRoot};

/// In-memory model of the document root: a class list and the head's meta
/// elements.
///
/// Clones share state, so a caller can hand one to a controller and inspect
/// the other.
#[derive(Debug, Clone, Default)]
pub struct HtmlRoot {
    inner: Arc<Mutex<RootState>>,
}

/// Observable state of an [`HtmlRoot`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootState {
    pub classes: BTreeSet<String>,
    pub metas: BTreeMap<String, String>,
}

impl HtmlRoot {
    /// A root with no classes and no meta elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a meta element to the head.
    pub fn with_meta(self, name: impl Into<String>, content: impl Into<String>) -> Self {
        lock(&self.inner).metas.insert(name.into(), content.into());
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        lock(&self.inner).classes.contains(class)
    }

    pub fn meta(&self, name: &str) -> Option<String> {
        lock(&self.inner).metas.get(name).cloned()
    }

    pub fn state(&self) -> RootState {
        lock(&self.inner).clone()
    }

    /// The `class` attribute as it would be serialized, if any.
    pub fn class_attr(&self) -> Option<String> {
        let state = lock(&self.inner);
        if state.classes.is_empty() {
            return None;
        }
        Some(state.classes.iter().cloned().collect::<Vec<_>>().join(" "))
    }
}

impl DocumentRoot for HtmlRoot {
    fn set_class(&mut self, class: &str, present: bool) {
        let mut state = lock(&self.inner);
        if present {
            state.classes.insert(class.to_string());
        } else {
            state.classes.remove(class);
        }
    }

    fn set_meta_content(&mut self, name: &str, content: &str) -> bool {
        match lock(&self.inner).metas.get_mut(name) {
            Some(existing) => {
                *existing = content.to_string();
                true
            }
            None => false,
        }
    }
}
