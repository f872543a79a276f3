//! Single-value views.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use simpleui_core::logging::targets;
use simpleui_core::{Error, Result, Signal, SignalEmitter};

use super::{Model, PointerButton, PressOutcome, SelectionIndicator, TextFormat};
use crate::config::{ClickAction, ItemConfig};
use crate::context::{SubscriptionId, UiContext};
use crate::element::ElementState;
use crate::scene::{NodeId, SceneGraph};

/// Predicate deciding whether a value may be bound to a view.
pub type BindFilter<T> = Arc<dyn Fn(Option<&T>) -> bool + Send + Sync>;

/// Signals emitted by an [`ItemView`].
///
/// All of them are disconnected when the view is destroyed.
pub struct ItemSignals<T> {
    /// A value was bound, including rebinding the same value on refresh.
    pub bound: Signal<Option<T>>,
    /// [`ItemView::change_data`] bound a new value.
    pub changed: Signal<Option<T>>,
    /// [`ItemView::refresh`] finished.
    pub refreshed: Signal<()>,
    /// The selection flag changed. Carries the new flag and the bound value.
    pub selection_changed: Signal<(bool, Option<T>)>,
    /// The view was clicked.
    pub clicked: Signal<Option<T>>,
    /// The view was right-clicked.
    pub right_clicked: Signal<Option<T>>,
    /// Removal of the view's value was requested.
    pub remove_requested: Signal<Option<T>>,
    /// The owning group finished creating the view.
    pub created: Signal<()>,
    /// The owning group is about to remove the view.
    pub removed: Signal<()>,
    /// The change source reported a change of the bound value.
    pub model_changed: Signal<()>,
    /// Availability changed.
    pub availability_changed: Signal<bool>,
}

impl<T: 'static> ItemSignals<T> {
    fn new() -> Self {
        Self {
            bound: Signal::new(),
            changed: Signal::new(),
            refreshed: Signal::new(),
            selection_changed: Signal::new(),
            clicked: Signal::new(),
            right_clicked: Signal::new(),
            remove_requested: Signal::new(),
            created: Signal::new(),
            removed: Signal::new(),
            model_changed: Signal::new(),
            availability_changed: Signal::new(),
        }
    }

    fn emitters(&self) -> [&dyn SignalEmitter; 11] {
        [
            &self.bound,
            &self.changed,
            &self.refreshed,
            &self.selection_changed,
            &self.clicked,
            &self.right_clicked,
            &self.remove_requested,
            &self.created,
            &self.removed,
            &self.model_changed,
            &self.availability_changed,
        ]
    }

    /// Total number of connected slots across every signal.
    pub fn connection_count(&self) -> usize {
        self.emitters().iter().map(|s| s.connection_count()).sum()
    }

    fn clear(&self) {
        for signal in self.emitters() {
            signal.disconnect_all();
        }
    }
}

/// The binding between one model value and one scene node.
///
/// A view is created around an existing node, usually by a
/// [`GroupView`](super::GroupView). It owns that node: [`destroy`](Self::destroy)
/// (or dropping the view) removes it from the scene exactly once.
///
/// After destruction every operation is ignored and logged at `warn`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use simpleui::config::ItemConfig;
/// use simpleui::context::UiContext;
/// use simpleui::scene::{MemoryScene, TemplateId, TemplateSet};
/// use simpleui::view::ItemView;
///
/// let scene = Arc::new(MemoryScene::new());
/// let templates = Arc::new(TemplateSet::new().with("item", TemplateId(1)));
/// let ctx = UiContext::new(scene.clone(), templates);
///
/// let mut view = ItemView::instantiate(ctx, "item", None, &ItemConfig::default()).unwrap();
/// assert!(view.set_data(Some("sword".to_string()), true));
/// assert_eq!(view.data().map(String::as_str), Some("sword"));
///
/// let node = view.node();
/// view.destroy().unwrap();
/// assert!(!scene.is_alive(node));
/// ```
pub struct ItemView<T: Model> {
    ctx: UiContext<T>,
    element: ElementState,
    data: Option<T>,
    selectable: bool,
    selected: bool,
    show_if_present: bool,
    hide_if_absent: bool,
    click_action: ClickAction,
    select_on_click: bool,
    can_bind: Option<BindFilter<T>>,
    indicators: Vec<Box<dyn SelectionIndicator>>,
    subscription: Option<SubscriptionId>,
    stale: Arc<AtomicBool>,
    signals: Arc<ItemSignals<T>>,
}

impl<T: Model> ItemView<T> {
    /// Wraps an already instantiated node.
    pub fn new(ctx: UiContext<T>, node: NodeId, config: &ItemConfig) -> Self {
        Self {
            ctx,
            element: ElementState::new(node),
            data: None,
            selectable: config.selectable,
            selected: false,
            show_if_present: config.show_if_present,
            hide_if_absent: config.hide_if_absent,
            click_action: config.click_action,
            select_on_click: config.select_on_click,
            can_bind: None,
            indicators: Vec::new(),
            subscription: None,
            stale: Arc::new(AtomicBool::new(false)),
            signals: Arc::new(ItemSignals::new()),
        }
    }

    /// Instantiates the template registered for `kind` and wraps the new node.
    pub fn instantiate(
        ctx: UiContext<T>,
        kind: &str,
        parent: Option<NodeId>,
        config: &ItemConfig,
    ) -> Result<Self> {
        let template = ctx
            .templates
            .template(kind)
            .ok_or_else(|| Error::missing_template(kind))?;
        let node = ctx.scene.instantiate(template, parent)?;
        Ok(Self::new(ctx, node, config))
    }

    /// Sets the predicate consulted by [`set_data`](Self::set_data) when
    /// filtering is requested.
    pub fn set_can_bind(&mut self, filter: Option<BindFilter<T>>) {
        self.can_bind = filter;
    }

    /// Builder form of [`set_can_bind`](Self::set_can_bind).
    pub fn with_can_bind<F>(mut self, filter: F) -> Self
    where
        F: Fn(Option<&T>) -> bool + Send + Sync + 'static,
    {
        self.can_bind = Some(Arc::new(filter));
        self
    }

    /// Whether the bind predicate accepts `value`. True when none is set.
    pub fn can_bind(&self, value: Option<&T>) -> bool {
        self.can_bind.as_ref().is_none_or(|filter| filter(value))
    }

    fn scene(&self) -> &dyn SceneGraph {
        &*self.ctx.scene
    }

    fn ensure_alive(&self, operation: &'static str) -> bool {
        if self.element.is_destroyed() {
            tracing::warn!(
                target: targets::ITEM_VIEW,
                node = ?self.element.node(),
                operation,
                "ignoring operation on destroyed item view"
            );
            return false;
        }
        true
    }

    /// Binds `value`, replacing the current binding.
    ///
    /// With `use_filters`, a rejecting bind predicate makes this a no-op
    /// returning `false`. Otherwise the old value's change subscription is
    /// dropped, the absent/present visibility policy is applied, the new value
    /// is subscribed and `bound` is emitted.
    pub fn set_data(&mut self, value: Option<T>, use_filters: bool) -> bool {
        if !self.ensure_alive("set_data") {
            return false;
        }
        if use_filters && !self.can_bind(value.as_ref()) {
            tracing::trace!(target: targets::ITEM_VIEW, node = ?self.element.node(), "bind rejected");
            return false;
        }

        self.unsubscribe();
        self.data = value;
        self.stale.store(false, Ordering::SeqCst);

        match &self.data {
            None if self.hide_if_absent => self.element.hide(&*self.ctx.scene),
            Some(_) if self.show_if_present => self.element.show(&*self.ctx.scene),
            _ => {}
        }

        self.subscribe();
        tracing::trace!(
            target: targets::ITEM_VIEW,
            node = ?self.element.node(),
            bound = self.data.is_some(),
            "bound"
        );
        self.signals.bound.emit(self.data.clone());
        true
    }

    /// Binds `value` with filtering and emits `changed` on success.
    pub fn change_data(&mut self, value: Option<T>) -> bool {
        if self.set_data(value, true) {
            self.signals.changed.emit(self.data.clone());
            true
        } else {
            false
        }
    }

    /// Rebinds the current value and emits `refreshed`.
    ///
    /// Returns whether the rebind was accepted. Clears the stale flag.
    pub fn refresh(&mut self) -> bool {
        if !self.ensure_alive("refresh") {
            return false;
        }
        let current = self.data.clone();
        let rebound = self.set_data(current, true);
        self.signals.refreshed.emit(());
        rebound
    }

    fn subscribe(&mut self) {
        let Some(value) = &self.data else {
            return;
        };
        let stale = self.stale.clone();
        let signals = Arc::downgrade(&self.signals);
        self.subscription = self.ctx.changes.subscribe(
            value,
            Box::new(move || {
                stale.store(true, Ordering::SeqCst);
                if let Some(signals) = signals.upgrade() {
                    signals.model_changed.emit(());
                }
            }),
        );
    }

    fn unsubscribe(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            self.ctx.changes.unsubscribe(subscription);
        }
    }

    /// Sets the selection flag.
    ///
    /// Returns `true` if the flag changed. Non-selectable views never change.
    /// Indicators are updated before `selection_changed` fires, and a view
    /// becoming selected asks the focus sink for focus.
    pub fn set_selected(&mut self, selected: bool) -> bool {
        if !self.ensure_alive("set_selected") || !self.selectable || self.selected == selected {
            return false;
        }
        self.selected = selected;
        for indicator in &self.indicators {
            indicator.set_selected(selected);
        }
        self.signals
            .selection_changed
            .emit((selected, self.data.clone()));
        if selected {
            self.ctx.focus.request_focus(self.element.node());
        }
        true
    }

    /// Selects the view.
    pub fn select(&mut self) -> bool {
        self.set_selected(true)
    }

    /// Deselects the view.
    pub fn deselect(&mut self) -> bool {
        self.set_selected(false)
    }

    /// Flips the selection flag.
    pub fn switch_selected(&mut self) -> bool {
        self.set_selected(!self.selected)
    }

    /// Allows or forbids selection. Forbidding deselects first.
    pub fn set_selectable(&mut self, selectable: bool) {
        if !selectable {
            self.set_selected(false);
        }
        self.selectable = selectable;
    }

    /// Registers an indicator and syncs it to the current selection.
    pub fn add_indicator(&mut self, indicator: impl SelectionIndicator + 'static) {
        indicator.set_selected(self.selected);
        self.indicators.push(Box::new(indicator));
    }

    /// Emits `clicked`.
    pub fn click(&self) {
        if self.ensure_alive("click") {
            self.signals.clicked.emit(self.data.clone());
        }
    }

    /// Emits `right_clicked`.
    pub fn right_click(&self) {
        if self.ensure_alive("right_click") {
            self.signals.right_clicked.emit(self.data.clone());
        }
    }

    /// Emits `remove_requested`.
    pub fn request_remove(&self) {
        if self.ensure_alive("request_remove") {
            self.signals.remove_requested.emit(self.data.clone());
        }
    }

    /// Routes a pointer press using the view's configured click action.
    pub fn press(&mut self, button: PointerButton) -> PressOutcome {
        self.press_with(button, self.click_action, self.select_on_click)
    }

    /// Routes a pointer press.
    ///
    /// The primary button performs `action`; the secondary button emits
    /// `right_clicked`; the middle button does nothing.
    pub fn press_with(
        &mut self,
        button: PointerButton,
        action: ClickAction,
        select_on_click: bool,
    ) -> PressOutcome {
        if !self.ensure_alive("press") {
            return PressOutcome::Ignored;
        }
        match button {
            PointerButton::Left => match action {
                ClickAction::Click => {
                    if select_on_click {
                        self.select();
                    }
                    self.click();
                    PressOutcome::Clicked
                }
                ClickAction::Select => {
                    self.select();
                    PressOutcome::Selected
                }
                ClickAction::Remove => {
                    self.request_remove();
                    PressOutcome::RemoveRequested
                }
                ClickAction::None => PressOutcome::Ignored,
            },
            PointerButton::Right => {
                self.right_click();
                PressOutcome::RightClicked
            }
            PointerButton::Middle => PressOutcome::Ignored,
        }
    }

    /// Emits `created`.
    pub fn on_create(&self) {
        if self.ensure_alive("on_create") {
            self.signals.created.emit(());
        }
    }

    /// Emits `removed`.
    pub fn on_remove(&self) {
        if self.ensure_alive("on_remove") {
            self.signals.removed.emit(());
        }
    }

    /// Marks the view available or not, emitting `availability_changed` when
    /// the flag changes.
    pub fn set_available(&mut self, available: bool) {
        if !self.ensure_alive("set_available") {
            return;
        }
        let previous = self.element.is_available();
        self.element.set_available(&*self.ctx.scene, available);
        if previous != available {
            self.signals.availability_changed.emit(available);
        }
    }

    /// Sets the node shown over the view while it is unavailable.
    pub fn set_blocker(&mut self, blocker: Option<NodeId>) {
        self.element.set_blocker(blocker);
        if let Some(blocker) = blocker {
            self.scene().set_visible(blocker, !self.element.is_available());
        }
    }

    /// Shows the node.
    pub fn show(&mut self) {
        if self.ensure_alive("show") {
            self.element.show(&*self.ctx.scene);
        }
    }

    /// Hides the node.
    pub fn hide(&mut self) {
        if self.ensure_alive("hide") {
            self.element.hide(&*self.ctx.scene);
        }
    }

    /// Formats `text` for display. With hide-if-empty set, the view is
    /// hidden while `text` is empty and shown otherwise.
    pub fn display_text(&mut self, format: &TextFormat, text: &str) -> String {
        if format.hide_if_empty {
            if text.is_empty() {
                self.hide();
            } else {
                self.show();
            }
        }
        format.format_str(text)
    }

    /// Tears the view down.
    ///
    /// Drops the change subscription, disconnects every signal, resets the
    /// indicators, clears the binding and removes the node from the scene.
    /// Only the first call does anything; later calls return `Ok(())`.
    pub fn destroy(&mut self) -> Result<()> {
        if !self.element.mark_destroyed() {
            return Ok(());
        }
        self.unsubscribe();
        self.signals.clear();
        if self.selected {
            self.selected = false;
            for indicator in &self.indicators {
                indicator.set_selected(false);
            }
        }
        self.indicators.clear();
        self.data = None;

        let node = self.element.node();
        tracing::trace!(target: targets::ITEM_VIEW, ?node, "destroying item view");
        self.ctx.scene.destroy(node)
    }

    /// The view's node.
    pub fn node(&self) -> NodeId {
        self.element.node()
    }

    /// The bound value.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Whether the view is selected.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Whether the view can be selected.
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Whether the view accepts interaction.
    pub fn is_available(&self) -> bool {
        self.element.is_available()
    }

    /// Whether the node is shown.
    pub fn is_visible(&self) -> bool {
        self.element.is_visible()
    }

    /// Whether the view has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.element.is_destroyed()
    }

    /// Whether the bound value changed since it was last bound.
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    /// The view's signals.
    pub fn signals(&self) -> &ItemSignals<T> {
        &self.signals
    }

    /// The element state, for show/hide observers.
    pub fn element(&self) -> &ElementState {
        &self.element
    }
}

impl<T: Model> Drop for ItemView<T> {
    fn drop(&mut self) {
        if let Err(error) = self.destroy() {
            self.ctx.errors.report(&error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ChangeNotifier;
    use crate::scene::{MemoryScene, TemplateId, TemplateSet};
    use parking_lot::Mutex;

    fn setup() -> (Arc<MemoryScene>, UiContext<String>) {
        let scene = Arc::new(MemoryScene::new());
        let templates = Arc::new(TemplateSet::new().with("item", TemplateId(1)));
        let ctx = UiContext::new(scene.clone(), templates).with_focus(scene.clone());
        (scene, ctx)
    }

    fn view(ctx: &UiContext<String>, config: &ItemConfig) -> ItemView<String> {
        ItemView::instantiate(ctx.clone(), "item", None, config).unwrap()
    }

    #[test]
    fn test_missing_template() {
        let (_scene, ctx) = setup();
        let result = ItemView::instantiate(ctx, "tooltip", None, &ItemConfig::default());
        assert!(matches!(result, Err(Error::MissingTemplate { .. })));
    }

    #[test]
    fn test_bind_filter() {
        let (_scene, ctx) = setup();
        let mut view = view(&ctx, &ItemConfig::default())
            .with_can_bind(|value: Option<&String>| value.is_some_and(|v| v != "cursed"));

        assert!(view.set_data(Some("potion".into()), true));
        assert!(!view.set_data(Some("cursed".into()), true));
        assert_eq!(view.data().map(String::as_str), Some("potion"));

        assert!(view.set_data(Some("cursed".into()), false));
        assert_eq!(view.data().map(String::as_str), Some("cursed"));
    }

    #[test]
    fn test_change_data_emits_bound_then_changed() {
        let (_scene, ctx) = setup();
        let mut view = view(&ctx, &ItemConfig::default());
        let log = Arc::new(Mutex::new(Vec::new()));

        let log_bound = log.clone();
        view.signals().bound.connect(move |v| log_bound.lock().push(format!("bound {v:?}")));
        let log_changed = log.clone();
        view.signals()
            .changed
            .connect(move |v| log_changed.lock().push(format!("changed {v:?}")));
        let log_refreshed = log.clone();
        view.signals()
            .refreshed
            .connect(move |_| log_refreshed.lock().push("refreshed".to_string()));

        view.change_data(Some("a".into()));
        view.refresh();

        assert_eq!(
            *log.lock(),
            vec![
                "bound Some(\"a\")".to_string(),
                "changed Some(\"a\")".to_string(),
                "bound Some(\"a\")".to_string(),
                "refreshed".to_string(),
            ]
        );
    }

    #[test]
    fn test_absent_present_visibility_policy() {
        let (scene, ctx) = setup();
        let config = ItemConfig {
            show_if_present: true,
            hide_if_absent: true,
            ..ItemConfig::default()
        };
        let mut view = view(&ctx, &config);

        view.set_data(None, true);
        assert!(!view.is_visible());
        assert_eq!(scene.is_visible(view.node()), Some(false));

        view.set_data(Some("x".into()), true);
        assert!(view.is_visible());
        assert_eq!(scene.is_visible(view.node()), Some(true));
    }

    #[test]
    fn test_selection_order_and_focus() {
        let (scene, ctx) = setup();
        let mut view = view(&ctx, &ItemConfig::default());
        view.set_data(Some("a".into()), true);

        let log = Arc::new(Mutex::new(Vec::new()));
        let log_indicator = log.clone();
        view.add_indicator(move |selected: bool| {
            log_indicator.lock().push(format!("indicator {selected}"))
        });
        let log_signal = log.clone();
        view.signals()
            .selection_changed
            .connect(move |(selected, _)| log_signal.lock().push(format!("signal {selected}")));

        assert!(view.select());
        assert!(!view.select());
        assert!(view.switch_selected());

        assert_eq!(
            *log.lock(),
            vec![
                "indicator false",
                "indicator true",
                "signal true",
                "indicator false",
                "signal false",
            ]
        );
        assert_eq!(scene.focused(), Some(view.node()));
    }

    #[test]
    fn test_not_selectable() {
        let (_scene, ctx) = setup();
        let mut view = view(&ctx, &ItemConfig::default());
        view.select();
        view.set_selectable(false);

        assert!(!view.is_selected());
        assert!(!view.select());
        assert!(!view.is_selected());
    }

    #[test]
    fn test_node_indicator() {
        let (scene, ctx) = setup();
        let mut view = view(&ctx, &ItemConfig::default());
        let marker = scene.instantiate(TemplateId(9), Some(view.node())).unwrap();

        view.add_indicator(crate::view::NodeIndicator::new(scene.clone(), marker, false));
        assert_eq!(scene.is_visible(marker), Some(false));

        view.select();
        assert_eq!(scene.is_visible(marker), Some(true));
    }

    #[test]
    fn test_press_routes_by_button() {
        let (_scene, ctx) = setup();
        let mut view = view(&ctx, &ItemConfig::default());
        view.set_data(Some("a".into()), true);

        let log = Arc::new(Mutex::new(Vec::new()));
        let log_click = log.clone();
        view.signals().clicked.connect(move |_| log_click.lock().push("click"));
        let log_right = log.clone();
        view.signals().right_clicked.connect(move |_| log_right.lock().push("right"));
        let log_remove = log.clone();
        view.signals()
            .remove_requested
            .connect(move |_| log_remove.lock().push("remove"));

        assert_eq!(view.press(PointerButton::Left), PressOutcome::Clicked);
        assert!(view.is_selected());
        assert_eq!(view.press(PointerButton::Right), PressOutcome::RightClicked);
        assert_eq!(view.press(PointerButton::Middle), PressOutcome::Ignored);
        assert_eq!(
            view.press_with(PointerButton::Left, ClickAction::Remove, false),
            PressOutcome::RemoveRequested
        );

        assert_eq!(*log.lock(), vec!["click", "right", "remove"]);
    }

    #[test]
    fn test_model_change_marks_stale() {
        let (_scene, ctx) = setup();
        let notifier = Arc::new(ChangeNotifier::<String>::new());
        let ctx = ctx.with_changes(notifier.clone());
        let mut view = view(&ctx, &ItemConfig::default());

        let changes = Arc::new(Mutex::new(0));
        let changes_clone = changes.clone();
        view.signals().model_changed.connect(move |_| *changes_clone.lock() += 1);

        view.set_data(Some("a".into()), true);
        view.set_data(Some("b".into()), true);
        assert_eq!(notifier.subscription_count(), 1);

        notifier.notify(&"a".to_string());
        assert!(!view.is_stale());

        notifier.notify(&"b".to_string());
        assert!(view.is_stale());
        assert_eq!(*changes.lock(), 1);

        view.refresh();
        assert!(!view.is_stale());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (scene, ctx) = setup();
        let notifier = Arc::new(ChangeNotifier::<String>::new());
        let ctx = ctx.with_changes(notifier.clone());
        let mut view = view(&ctx, &ItemConfig::default());
        view.set_data(Some("a".into()), true);
        view.signals().clicked.connect(|_| {});
        let node = view.node();

        view.destroy().unwrap();
        view.destroy().unwrap();
        drop(view);

        assert!(!scene.is_alive(node));
        assert_eq!(scene.destroy_calls(), 1);
        assert_eq!(notifier.subscription_count(), 0);
    }

    #[test]
    fn test_destroyed_view_ignores_operations() {
        let (_scene, ctx) = setup();
        let mut view = view(&ctx, &ItemConfig::default());
        view.destroy().unwrap();

        assert!(!view.set_data(Some("a".into()), false));
        assert!(!view.select());
        assert_eq!(view.press(PointerButton::Left), PressOutcome::Ignored);
        assert!(view.data().is_none());
        assert_eq!(view.signals().connection_count(), 0);
    }

    #[test]
    fn test_drop_destroys_node() {
        let (scene, ctx) = setup();
        let node = view(&ctx, &ItemConfig::default()).node();
        assert!(!scene.is_alive(node));
    }

    #[test]
    fn test_display_text_hides_when_empty() {
        let (scene, ctx) = setup();
        let mut view = view(&ctx, &ItemConfig::default());
        let format = TextFormat::new().with_suffix(" hp").with_hide_if_empty(true);

        assert_eq!(view.display_text(&format, ""), " hp");
        assert!(!view.is_visible());
        assert_eq!(scene.is_visible(view.node()), Some(false));

        assert_eq!(view.display_text(&format, "12"), "12 hp");
        assert!(view.is_visible());
        assert_eq!(scene.is_visible(view.node()), Some(true));
    }
}
