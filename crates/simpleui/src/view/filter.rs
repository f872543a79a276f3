//! Visibility and availability predicates.

use std::fmt;
use std::sync::Arc;

/// A shareable predicate over model values.
///
/// Filters compare by identity: two clones of the same `Filter` are equal,
/// two filters built from identical closures are not. Keep a clone around to
/// remove a filter later.
///
/// ```
/// use simpleui::view::{Filter, FilterSet};
///
/// let even = Filter::new(|n: &i32| n % 2 == 0);
/// let mut filters = FilterSet::new();
///
/// assert!(filters.add(even.clone()));
/// assert!(!filters.add(even.clone()));
/// assert!(!filters.accepts(&3));
///
/// filters.remove(&even);
/// assert!(filters.accepts(&3));
/// ```
pub struct Filter<T> {
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Filter<T> {
    /// Wraps a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
        }
    }

    /// Runs the predicate.
    pub fn accepts(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}

impl<T> Clone for Filter<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
        }
    }
}

impl<T> PartialEq for Filter<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.predicate, &other.predicate)
    }
}

impl<T> Eq for Filter<T> {}

impl<T> fmt::Debug for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("ptr", &Arc::as_ptr(&self.predicate).cast::<()>())
            .finish()
    }
}

/// A set of filters combined with AND.
pub struct FilterSet<T> {
    filters: Vec<Filter<T>>,
}

impl<T> Default for FilterSet<T> {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
        }
    }
}

impl<T> Clone for FilterSet<T> {
    fn clone(&self) -> Self {
        Self {
            filters: self.filters.clone(),
        }
    }
}

impl<T> fmt::Debug for FilterSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.filters).finish()
    }
}

impl<T> FilterSet<T> {
    /// Creates an empty set, which accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter. Returns `false` if it was already present.
    pub fn add(&mut self, filter: Filter<T>) -> bool {
        if self.contains(&filter) {
            return false;
        }
        self.filters.push(filter);
        true
    }

    /// Removes a filter. Returns `false` if it was not present.
    pub fn remove(&mut self, filter: &Filter<T>) -> bool {
        let before = self.filters.len();
        self.filters.retain(|existing| existing != filter);
        self.filters.len() != before
    }

    /// Whether the filter is in the set.
    pub fn contains(&self, filter: &Filter<T>) -> bool {
        self.filters.iter().any(|existing| existing == filter)
    }

    /// Removes every filter.
    pub fn clear(&mut self) {
        self.filters.clear();
    }

    /// Whether every filter accepts `value`. Stops at the first rejection.
    pub fn accepts(&self, value: &T) -> bool {
        self.filters.iter().all(|filter| filter.accepts(value))
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
