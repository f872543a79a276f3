//! Shared, observable backing lists.

use std::sync::Arc;

use parking_lot::RwLock;
use simpleui_core::Signal;

struct SourceInner<T> {
    items: RwLock<Vec<T>>,
    changed: Signal<()>,
}

/// A list of model values owned outside any group view.
///
/// Cloning a `SourceList` yields another handle to the same list. A group
/// created with [`GroupView::create_group_from`](crate::view::GroupView::create_group_from)
/// re-copies the list on every refresh and, when configured, marks itself
/// for refresh whenever [`changed`](Self::changed) fires.
///
/// Every mutation emits `changed` after the list lock is released.
pub struct SourceList<T> {
    inner: Arc<SourceInner<T>>,
}

impl<T> Clone for SourceList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Default for SourceList<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> FromIterator<T> for SourceList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> SourceList<T> {
    /// Creates a list holding `items`.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            inner: Arc::new(SourceInner {
                items: RwLock::new(items),
                changed: Signal::new(),
            }),
        }
    }

    /// A copy of the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.items.read().clone()
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }

    /// Whether an equal value is present.
    pub fn contains(&self, value: &T) -> bool {
        self.inner.items.read().contains(value)
    }

    /// Appends a value.
    pub fn push(&self, value: T) {
        self.inner.items.write().push(value);
        self.inner.changed.emit(());
    }

    /// Removes the first value equal to `value`.
    ///
    /// Returns `false`, without emitting, when no such value exists.
    pub fn remove(&self, value: &T) -> bool {
        let removed = {
            let mut items = self.inner.items.write();
            match items.iter().position(|item| item == value) {
                Some(index) => {
                    items.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.inner.changed.emit(());
        }
        removed
    }

    /// Replaces the whole contents.
    pub fn set(&self, items: Vec<T>) {
        *self.inner.items.write() = items;
        self.inner.changed.emit(());
    }

    /// Mutates the contents in place.
    pub fn modify<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let result = f(&mut self.inner.items.write());
        self.inner.changed.emit(());
        result
    }

    /// Emitted after every mutation.
    pub fn changed(&self) -> &Signal<()> {
        &self.inner.changed
    }

    /// Whether both handles refer to the same list.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
