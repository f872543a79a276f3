//! Explicit collaborator context.
//!
//! Every item view, group view and tooltip controller receives a
//! [`UiContext`] at construction instead of reaching for global managers.
//! Multiple independent contexts can coexist, which is also what makes the
//! views testable against [`MemoryScene`](crate::scene::MemoryScene).

use std::sync::Arc;

use parking_lot::Mutex;
use simpleui_core::logging::targets;
use simpleui_core::Error;
use slotmap::{new_key_type, SlotMap};

use crate::scene::{NodeId, SceneGraph, TemplateRegistry};

new_key_type! {
    /// Identifies a model-change subscription held by a [`ChangeSource`].
    pub struct SubscriptionId;
}

/// Callback invoked when a subscribed model value changes.
pub type ChangeCallback = Box<dyn Fn() + Send + Sync>;

/// Source of per-value change notifications.
///
/// An item view subscribes to its bound value while bound and unsubscribes
/// before rebinding or being destroyed.
pub trait ChangeSource<T>: Send + Sync {
    /// Subscribe to changes of `value`. Returns `None` when the value has no
    /// change notifications to offer.
    fn subscribe(&self, value: &T, on_changed: ChangeCallback) -> Option<SubscriptionId>;

    /// Drop a subscription. Unknown IDs are ignored.
    fn unsubscribe(&self, subscription: SubscriptionId);
}

/// A [`ChangeSource`] for values that never notify.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoChangeSource;

impl<T> ChangeSource<T> for NoChangeSource {
    fn subscribe(&self, _value: &T, _on_changed: ChangeCallback) -> Option<SubscriptionId> {
        None
    }

    fn unsubscribe(&self, _subscription: SubscriptionId) {}
}

/// A [`ChangeSource`] keyed by value equality.
///
/// Hosts call [`notify`](Self::notify) when a model value changes and every
/// subscription made for an equal value is invoked.
pub struct ChangeNotifier<T> {
    subscriptions: Mutex<SlotMap<SubscriptionId, (T, Arc<dyn Fn() + Send + Sync>)>>,
}

impl<T> Default for ChangeNotifier<T> {
    fn default() -> Self {
        Self {
            subscriptions: Mutex::new(SlotMap::with_key()),
        }
    }
}

impl<T: Clone + PartialEq + Send + Sync> ChangeNotifier<T> {
    /// Creates a notifier with no subscriptions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoke every subscription registered for a value equal to `value`.
    ///
    /// Returns the number of callbacks invoked.
    pub fn notify(&self, value: &T) -> usize {
        let callbacks: Vec<_> = self
            .subscriptions
            .lock()
            .values()
            .filter(|(subscribed, _)| subscribed == value)
            .map(|(_, callback)| callback.clone())
            .collect();

        for callback in &callbacks {
            callback();
        }
        callbacks.len()
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }
}

impl<T: Clone + PartialEq + Send + Sync> ChangeSource<T> for ChangeNotifier<T> {
    fn subscribe(&self, value: &T, on_changed: ChangeCallback) -> Option<SubscriptionId> {
        let callback: Arc<dyn Fn() + Send + Sync> = Arc::from(on_changed);
        Some(self.subscriptions.lock().insert((value.clone(), callback)))
    }

    fn unsubscribe(&self, subscription: SubscriptionId) {
        self.subscriptions.lock().remove(subscription);
    }
}

/// Receives exclusive input focus requests from selected views.
pub trait FocusSink: Send + Sync {
    /// Give `node` exclusive input focus.
    fn request_focus(&self, node: NodeId);
}

/// A [`FocusSink`] that ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFocus;

impl FocusSink for NoFocus {
    fn request_focus(&self, _node: NodeId) {}
}

/// Receives non-fatal errors raised during reconciliation.
pub trait ErrorReporter: Send + Sync {
    /// Report an error. Reconciliation continues after this returns.
    fn report(&self, error: &Error);
}

/// The default [`ErrorReporter`], which logs through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &Error) {
        tracing::error!(target: targets::ERRORS, %error, "reconciliation error");
    }
}

/// The collaborators a view needs, passed explicitly.
pub struct UiContext<T> {
    /// Scene graph the views create their nodes in.
    pub scene: Arc<dyn SceneGraph>,
    /// Template lookup by view kind.
    pub templates: Arc<dyn TemplateRegistry>,
    /// Model-change notifications.
    pub changes: Arc<dyn ChangeSource<T>>,
    /// Input focus requests.
    pub focus: Arc<dyn FocusSink>,
    /// Error reporting.
    pub errors: Arc<dyn ErrorReporter>,
}

impl<T: 'static> UiContext<T> {
    /// Creates a context with no change notifications, no focus handling and
    /// tracing-based error reporting.
    pub fn new(scene: Arc<dyn SceneGraph>, templates: Arc<dyn TemplateRegistry>) -> Self {
        Self {
            scene,
            templates,
            changes: Arc::new(NoChangeSource),
            focus: Arc::new(NoFocus),
            errors: Arc::new(TracingReporter),
        }
    }

    /// Sets the change notification source.
    pub fn with_changes(mut self, changes: Arc<dyn ChangeSource<T>>) -> Self {
        self.changes = changes;
        self
    }

    /// Sets the focus sink.
    pub fn with_focus(mut self, focus: Arc<dyn FocusSink>) -> Self {
        self.focus = focus;
        self
    }

    /// Sets the error reporter.
    pub fn with_errors(mut self, errors: Arc<dyn ErrorReporter>) -> Self {
        self.errors = errors;
        self
    }
}

impl<T> Clone for UiContext<T> {
    fn clone(&self) -> Self {
        Self {
            scene: self.scene.clone(),
            templates: self.templates.clone(),
            changes: self.changes.clone(),
            focus: self.focus.clone(),
            errors: self.errors.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_change_notifier_matches_by_equality() {
        let notifier = ChangeNotifier::<String>::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = hits.clone();
        let id = notifier
            .subscribe(
                &"potion".to_string(),
                Box::new(move || {
                    hits_clone.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        assert_eq!(notifier.notify(&"potion".to_string()), 1);
        assert_eq!(notifier.notify(&"sword".to_string()), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        notifier.unsubscribe(id);
        notifier.unsubscribe(id);
        assert_eq!(notifier.subscription_count(), 0);
        assert_eq!(notifier.notify(&"potion".to_string()), 0);
    }

    #[test]
    fn test_no_change_source() {
        let source = NoChangeSource;
        assert!(ChangeSource::<i32>::subscribe(&source, &1, Box::new(|| {})).is_none());
    }
}
