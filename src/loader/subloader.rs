//! Subloaders: independent owners of slices of a save's items

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use thiserror::Error;

use crate::save::SaveItem;

/// Failure reported by a subloader while applying its items
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct SubloaderError(pub String);

impl SubloaderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A component that persists its own slice of state as opaque items.
///
/// On load, subloaders run in descending `priority` order, each receiving
/// only the items it `owns`.
pub trait Subloader: Send + Sync {
    fn name(&self) -> &str;

    fn priority(&self) -> i32 {
        0
    }

    /// Whether `item` belongs to this subloader
    fn owns(&self, item: &SaveItem) -> bool;

    /// Items to store when a save is created
    fn capture(&self) -> Vec<SaveItem> {
        Vec::new()
    }

    /// Apply this subloader's items from a save being loaded
    fn load(&self, items: &[SaveItem]) -> Result<(), SubloaderError>;
}

#[derive(Clone)]
pub(crate) struct RegisteredSubloader {
    pub name: String,
    pub priority: i32,
    pub subloader: Weak<dyn Subloader>,
}

/// Explicit, priority-ordered list of subloaders shared by the saver and the loader.
///
/// Entries are held weakly: the registering code owns the subloader, and one
/// that has since been dropped is skipped with a warning.
#[derive(Clone, Default)]
pub struct SubloaderRegistry {
    entries: Arc<Mutex<Vec<RegisteredSubloader>>>,
}

impl SubloaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `subloader`. Higher priority sorts first; equal priorities
    /// keep registration order.
    pub fn register<S: Subloader + 'static>(&self, subloader: &Arc<S>) {
        let strong: Arc<dyn Subloader> = subloader.clone();
        let entry = RegisteredSubloader {
            name: strong.name().to_string(),
            priority: strong.priority(),
            subloader: Arc::downgrade(&strong),
        };

        let mut entries = self.entries.lock();
        let at = entries
            .iter()
            .position(|existing| existing.priority < entry.priority)
            .unwrap_or(entries.len());
        tracing::debug!(name = %entry.name, priority = entry.priority, position = at, "Registered subloader");
        entries.insert(at, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Registered names in load order
    pub fn names(&self) -> Vec<String> {
        self.entries.lock().iter().map(|e| e.name.clone()).collect()
    }

    /// Copy of the entries, in load order
    pub(crate) fn snapshot(&self) -> Vec<RegisteredSubloader> {
        self.entries.lock().clone()
    }
}

impl std::fmt::Debug for SubloaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubloaderRegistry")
            .field("names", &self.names())
            .finish()
    }
}
