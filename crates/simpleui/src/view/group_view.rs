//! List reconciliation.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use simpleui_core::logging::{span_names, targets};
use simpleui_core::{ConnectionGuard, Error, Result, Signal, SignalEmitter};
use slotmap::{new_key_type, SlotMap};

use super::{Filter, FilterSet, ItemView, Model, PointerButton, PressOutcome};
use crate::config::{ClickAction, GroupConfig, ItemConfig, UiConfig};
use crate::context::UiContext;
use crate::scene::NodeId;
use crate::source::SourceList;

new_key_type! {
    /// Identifies an item view within its group.
    pub struct ViewId;
}

type Comparator<T> = Arc<dyn Fn(&T, &T) -> CmpOrdering + Send + Sync>;
type Equality<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;
type KindFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Signals emitted by a [`GroupView`].
///
/// Each fires after the state change it reports has been applied.
pub struct GroupSignals<T> {
    /// A full rebuild finished.
    pub group_created: Signal<()>,
    /// A view was created for a value.
    pub item_created: Signal<ViewId>,
    /// [`GroupView::add_item`] accepted a value.
    pub item_added: Signal<T>,
    /// [`GroupView::add_items`] processed a batch.
    pub items_added: Signal<Vec<T>>,
    /// [`GroupView::remove_item`] removed a value.
    pub item_removed: Signal<T>,
    /// [`GroupView::remove_items`] removed a batch.
    pub items_removed: Signal<Vec<T>>,
    /// An item was clicked.
    pub item_clicked: Signal<T>,
    /// An item was right-clicked.
    pub item_right_clicked: Signal<T>,
    /// Removal of an item was requested.
    pub item_remove_requested: Signal<T>,
    /// The selected value changed. `None` after [`GroupView::deselect_all`].
    pub item_selected: Signal<Option<T>>,
    /// A click reached the group, after its configured action ran.
    pub data_clicked: Signal<T>,
    /// [`GroupView::refresh`] finished. Fires once per refresh, after views
    /// have been created, destroyed and sorted.
    pub refreshed: Signal<()>,
}

impl<T: 'static> GroupSignals<T> {
    fn new() -> Self {
        Self {
            group_created: Signal::new(),
            item_created: Signal::new(),
            item_added: Signal::new(),
            items_added: Signal::new(),
            item_removed: Signal::new(),
            items_removed: Signal::new(),
            item_clicked: Signal::new(),
            item_right_clicked: Signal::new(),
            item_remove_requested: Signal::new(),
            item_selected: Signal::new(),
            data_clicked: Signal::new(),
            refreshed: Signal::new(),
        }
    }

    fn emitters(&self) -> [&dyn SignalEmitter; 12] {
        [
            &self.group_created,
            &self.item_created,
            &self.item_added,
            &self.items_added,
            &self.item_removed,
            &self.items_removed,
            &self.item_clicked,
            &self.item_right_clicked,
            &self.item_remove_requested,
            &self.item_selected,
            &self.data_clicked,
            &self.refreshed,
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

/// Result of running item creation for one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Creation {
    /// A view was created.
    Created(ViewId),
    /// The value is recorded but hidden by a visibility filter.
    Hidden,
    /// The value already has a view, or the group is full.
    Rejected,
    /// Template lookup or instantiation failed and was reported.
    Failed,
}

/// Reconciles a list of model values against a list of [`ItemView`]s.
///
/// The group keeps two lists. The data list holds every value the group
/// knows about, in comparator order after [`sort_items`](Self::sort_items).
/// The view list holds one view per value that passed the visibility
/// filters, capped at the configured maximum count. Values are matched to
/// views by equality (`PartialEq` unless [`with_equality`](Self::with_equality)
/// says otherwise), so equal values share a single view.
///
/// Views are created under the `content` node through the context's scene
/// graph. A missing template or a failed scene operation is reported to the
/// context's error reporter and only skips the affected value.
///
/// Input from the host should be routed through [`click`](Self::click),
/// [`right_click`](Self::right_click) or [`press`](Self::press), which run
/// the configured [`ClickAction`]. Signals emitted directly by an item view
/// are forwarded to the group signals without running an action.
///
/// Reconciliation is not re-entrant: signal handlers must not call back into
/// the group that is emitting.
pub struct GroupView<T: Model> {
    ctx: UiContext<T>,
    config: GroupConfig,
    item_config: ItemConfig,
    content: NodeId,
    data_list: Vec<T>,
    source: Option<SourceList<T>>,
    source_guard: Option<ConnectionGuard<()>>,
    source_dirty: Arc<AtomicBool>,
    views: SlotMap<ViewId, ItemView<T>>,
    order: Vec<ViewId>,
    visibility: FilterSet<T>,
    availability: FilterSet<T>,
    comparator: Option<Comparator<T>>,
    equality: Equality<T>,
    kind_of: Option<KindFn<T>>,
    can_add: Option<Predicate<T>>,
    can_remove: Option<Predicate<T>>,
    selected: Arc<Mutex<Option<T>>>,
    signals: Arc<GroupSignals<T>>,
    destroyed: bool,
}

impl<T: Model> GroupView<T> {
    /// Creates an empty group that instantiates its views under `content`.
    pub fn new(ctx: UiContext<T>, content: NodeId, config: GroupConfig) -> Self {
        Self {
            ctx,
            config,
            item_config: ItemConfig::default(),
            content,
            data_list: Vec::new(),
            source: None,
            source_guard: None,
            source_dirty: Arc::new(AtomicBool::new(false)),
            views: SlotMap::with_key(),
            order: Vec::new(),
            visibility: FilterSet::new(),
            availability: FilterSet::new(),
            comparator: None,
            equality: Arc::new(|a: &T, b: &T| a == b),
            kind_of: None,
            can_add: None,
            can_remove: None,
            selected: Arc::new(Mutex::new(None)),
            signals: Arc::new(GroupSignals::new()),
            destroyed: false,
        }
    }

    /// Creates an empty group using the group and item sections of `config`.
    pub fn from_config(ctx: UiContext<T>, content: NodeId, config: &UiConfig) -> Self {
        Self::new(ctx, content, config.group.clone()).with_item_config(config.item.clone())
    }

    /// Sets the configuration applied to newly created item views.
    pub fn with_item_config(mut self, item_config: ItemConfig) -> Self {
        self.item_config = item_config;
        self
    }

    /// Sets the ordering applied by [`sort_items`](Self::sort_items).
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> CmpOrdering + Send + Sync + 'static,
    {
        self.set_comparator(comparator);
        self
    }

    /// Replaces value equality for matching values to views.
    pub fn with_equality<F>(mut self, equality: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.equality = Arc::new(equality);
        self
    }

    /// Chooses a template kind per value. Without it every value uses the
    /// configured default template kind.
    pub fn with_template_kind<F>(mut self, kind_of: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.kind_of = Some(Arc::new(kind_of));
        self
    }

    /// Sets the predicate consulted by [`add_item`](Self::add_item).
    pub fn with_can_add<F>(mut self, can_add: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.can_add = Some(Arc::new(can_add));
        self
    }

    /// Sets the predicate consulted by [`remove_data`](Self::remove_data).
    pub fn with_can_remove<F>(mut self, can_remove: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.can_remove = Some(Arc::new(can_remove));
        self
    }

    /// Sets the ordering applied by [`sort_items`](Self::sort_items).
    pub fn set_comparator<F>(&mut self, comparator: F)
    where
        F: Fn(&T, &T) -> CmpOrdering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
    }

    /// Removes the ordering. Views then follow data list order.
    pub fn clear_comparator(&mut self) {
        self.comparator = None;
    }

    /// Changes the view cap. Existing views beyond the cap are kept.
    pub fn set_max_count(&mut self, max_count: Option<usize>) {
        self.config.max_count = max_count;
    }

    fn ensure_alive(&self, operation: &'static str) -> bool {
        if self.destroyed {
            tracing::warn!(
                target: targets::GROUP_VIEW,
                operation,
                "ignoring operation on destroyed group view"
            );
            return false;
        }
        true
    }

    fn find_view(&self, value: &T) -> Option<ViewId> {
        self.order.iter().copied().find(|&id| {
            self.views
                .get(id)
                .and_then(ItemView::data)
                .is_some_and(|data| (self.equality)(data, value))
        })
    }

    fn data_position(&self, value: &T) -> Option<usize> {
        self.data_list
            .iter()
            .position(|data| (self.equality)(data, value))
    }

    fn report(&self, error: &Error) {
        self.ctx.errors.report(error);
    }

    // ------------------------------------------------------------------
    // Building
    // ------------------------------------------------------------------

    /// Replaces the group's contents with `values`.
    ///
    /// Destroys every existing view, drops any backing source list, then runs
    /// item creation for each value in order, sorts and emits
    /// `group_created`.
    pub fn create_group(&mut self, values: Vec<T>) {
        self.rebuild(values, None);
    }

    /// Like [`create_group`](Self::create_group), but backed by `source`.
    ///
    /// Later refreshes re-copy the source list. With
    /// `subscribe_to_source` configured, a change to the source marks the
    /// group for refresh on the next [`update`](Self::update).
    pub fn create_group_from(&mut self, source: &SourceList<T>) {
        self.rebuild(source.snapshot(), Some(source.clone()));
    }

    fn rebuild(&mut self, values: Vec<T>, source: Option<SourceList<T>>) {
        if !self.ensure_alive("create_group") {
            return;
        }
        let span = tracing::debug_span!(target: targets::GROUP_VIEW, span_names::CREATE_GROUP, count = values.len());
        let _enter = span.enter();

        self.destroy_group_inner();
        self.source = source;
        self.data_list = values;

        let values = self.data_list.clone();
        for value in values {
            self.create_item(value);
        }
        self.sort_items();

        if self.config.subscribe_to_source {
            if let Some(source) = &self.source {
                let dirty = self.source_dirty.clone();
                self.source_guard = Some(source.changed().connect_scoped(move |_| {
                    dirty.store(true, Ordering::SeqCst);
                }));
            }
        }

        tracing::debug!(
            target: targets::GROUP_VIEW,
            data = self.data_list.len(),
            views = self.order.len(),
            "group created"
        );
        self.signals.group_created.emit(());
    }

    /// The shared creation path.
    ///
    /// Rejects values that already have a view and values beyond the view
    /// cap. Accepted values are recorded in the data list even when a
    /// visibility filter then hides them. A value whose view cannot be
    /// created is reported and left out of the data list.
    fn create_item(&mut self, value: T) -> Creation {
        if self.find_view(&value).is_some() {
            tracing::trace!(target: targets::GROUP_VIEW, "value already has a view");
            return Creation::Rejected;
        }
        if let Some(max) = self.config.max_count {
            if self.order.len() >= max {
                tracing::trace!(target: targets::GROUP_VIEW, max, "view cap reached");
                return Creation::Rejected;
            }
        }
        if !self.visibility.accepts(&value) {
            self.record(&value);
            return Creation::Hidden;
        }

        let node = match self.instantiate_for(&value) {
            Ok(node) => node,
            Err(error) => {
                self.report(&error);
                if let Some(position) = self.data_position(&value) {
                    self.data_list.remove(position);
                }
                return Creation::Failed;
            }
        };
        if self.config.new_on_top {
            self.ctx.scene.set_sibling_index(node, 0);
        }
        self.record(&value);

        let mut view = ItemView::new(self.ctx.clone(), node, &self.item_config);
        view.set_data(Some(value.clone()), false);
        view.set_available(self.availability.accepts(&value));
        self.connect_view(&view);

        let id = self.views.insert(view);
        if self.config.new_on_top {
            self.order.insert(0, id);
        } else {
            self.order.push(id);
        }
        if let Some(view) = self.views.get(id) {
            view.on_create();
        }
        self.signals.item_created.emit(id);
        Creation::Created(id)
    }

    fn record(&mut self, value: &T) {
        if self.data_position(value).is_some() {
            return;
        }
        if self.config.new_on_top {
            self.data_list.insert(0, value.clone());
        } else {
            self.data_list.push(value.clone());
        }
    }

    fn instantiate_for(&self, value: &T) -> Result<NodeId> {
        let kind = match &self.kind_of {
            Some(kind_of) => kind_of(value),
            None => self.config.template.clone(),
        };
        let template = self
            .ctx
            .templates
            .template(&kind)
            .ok_or_else(|| Error::missing_template(kind))?;
        self.ctx.scene.instantiate(template, Some(self.content))
    }

    fn connect_view(&self, view: &ItemView<T>) {
        let view_signals = view.signals();

        let signals = self.signals.clone();
        let selected = self.selected.clone();
        view_signals
            .selection_changed
            .connect(move |(is_selected, data)| {
                if *is_selected {
                    *selected.lock() = data.clone();
                    signals.item_selected.emit(data.clone());
                }
            });

        let signals = self.signals.clone();
        view_signals.clicked.connect(move |data| {
            if let Some(data) = data {
                signals.item_clicked.emit(data.clone());
            }
        });

        let signals = self.signals.clone();
        view_signals.right_clicked.connect(move |data| {
            if let Some(data) = data {
                signals.item_right_clicked.emit(data.clone());
            }
        });

        let signals = self.signals.clone();
        view_signals.remove_requested.connect(move |data| {
            if let Some(data) = data {
                signals.item_remove_requested.emit(data.clone());
            }
        });
    }

    /// Adds one value.
    ///
    /// Returns the new view, or `None` when the can-add predicate rejects
    /// the value, the value already has a view, the group is full, a
    /// visibility filter hides it, or creation failed. `item_added` fires
    /// whenever the value was taken into the group, shown or hidden.
    pub fn add_item(&mut self, value: T) -> Option<ViewId> {
        if !self.ensure_alive("add_item") {
            return None;
        }
        if !self.can_add(&value) {
            return None;
        }
        match self.create_item(value.clone()) {
            Creation::Created(id) => {
                self.signals.item_added.emit(value);
                Some(id)
            }
            Creation::Hidden => {
                self.signals.item_added.emit(value);
                None
            }
            Creation::Rejected | Creation::Failed => None,
        }
    }

    /// Adds several values.
    ///
    /// A single value goes through [`add_item`](Self::add_item). Larger
    /// batches run item creation for each value and emit one `items_added`
    /// with the whole batch.
    pub fn add_items(&mut self, values: Vec<T>) {
        if !self.ensure_alive("add_items") {
            return;
        }
        match values.len() {
            0 => {}
            1 => {
                if let Some(value) = values.into_iter().next() {
                    self.add_item(value);
                }
            }
            _ => {
                for value in &values {
                    self.create_item(value.clone());
                }
                self.signals.items_added.emit(values);
            }
        }
    }

    /// Adds a value if the can-add predicate allows it. Returns whether a
    /// view was created.
    pub fn add_data(&mut self, value: T) -> bool {
        self.add_item(value).is_some()
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    fn remove_inner(&mut self, value: &T) -> bool {
        let Some(id) = self.find_view(value) else {
            return false;
        };
        if let Some(view) = self.views.get(id) {
            view.on_remove();
        }
        self.order.retain(|&existing| existing != id);
        if let Some(position) = self.data_position(value) {
            self.data_list.remove(position);
        }
        if let Some(mut view) = self.views.remove(id) {
            if let Err(error) = view.destroy() {
                self.report(&error);
            }
        }
        true
    }

    /// Removes the view bound to a value equal to `value`.
    ///
    /// Returns `false` when no such view exists; the data list is then left
    /// untouched, even if it holds a hidden equal value.
    pub fn remove_item(&mut self, value: &T) -> bool {
        if !self.ensure_alive("remove_item") {
            return false;
        }
        if !self.remove_inner(value) {
            return false;
        }
        tracing::trace!(target: targets::GROUP_VIEW, "item removed");
        self.signals.item_removed.emit(value.clone());
        true
    }

    /// Removes several values, emitting one `items_removed` with the values
    /// that actually had views. A single value goes through
    /// [`remove_item`](Self::remove_item). Returns the number removed.
    pub fn remove_items(&mut self, values: &[T]) -> usize {
        if !self.ensure_alive("remove_items") {
            return 0;
        }
        if let [value] = values {
            return usize::from(self.remove_item(value));
        }
        let removed: Vec<T> = values
            .iter()
            .filter(|value| self.remove_inner(value))
            .cloned()
            .collect();
        let count = removed.len();
        if count > 0 {
            self.signals.items_removed.emit(removed);
        }
        count
    }

    /// Removes a value if the can-remove predicate allows it.
    pub fn remove_data(&mut self, value: &T) -> bool {
        self.can_remove(value) && self.remove_item(value)
    }

    fn can_add(&self, value: &T) -> bool {
        self.can_add.as_ref().is_none_or(|can_add| can_add(value))
    }

    fn can_remove(&self, value: &T) -> bool {
        self.can_remove
            .as_ref()
            .is_none_or(|can_remove| can_remove(value))
    }

    /// Whether every value in the group may be both added and removed.
    ///
    /// An empty group cannot be modified.
    pub fn can_be_modified(&self) -> bool {
        !self.data_list.is_empty()
            && self
                .data_list
                .iter()
                .all(|value| self.can_add(value) && self.can_remove(value))
    }

    // ------------------------------------------------------------------
    // Reconciliation
    // ------------------------------------------------------------------

    /// Brings the views back in line with the data list.
    ///
    /// Re-copies the backing source list if there is one. Views whose value
    /// is gone or now hidden are destroyed; the others are refreshed and
    /// have their availability re-evaluated. Values without a view then go
    /// through item creation, and the views are re-sorted.
    pub fn refresh(&mut self) {
        if !self.ensure_alive("refresh") {
            return;
        }
        let span = tracing::debug_span!(target: targets::GROUP_VIEW, span_names::REFRESH);
        let _enter = span.enter();

        self.source_dirty.store(false, Ordering::SeqCst);
        if let Some(source) = &self.source {
            self.data_list = source.snapshot();
        }

        let mut destroyed = 0;
        for id in self.order.clone() {
            let keep = self
                .views
                .get(id)
                .and_then(ItemView::data)
                .is_some_and(|data| {
                    self.data_position(data).is_some() && self.visibility.accepts(data)
                });

            if keep {
                let available = self
                    .views
                    .get(id)
                    .and_then(ItemView::data)
                    .is_some_and(|data| self.availability.accepts(data));
                if let Some(view) = self.views.get_mut(id) {
                    view.refresh();
                    view.set_available(available);
                }
            } else {
                self.order.retain(|&existing| existing != id);
                if let Some(mut view) = self.views.remove(id) {
                    if let Err(error) = view.destroy() {
                        self.report(&error);
                    }
                }
                destroyed += 1;
            }
        }

        let mut created = 0;
        for value in self.data_list.clone() {
            if self.find_view(&value).is_none()
                && matches!(self.create_item(value), Creation::Created(_))
            {
                created += 1;
            }
        }
        self.sort_items();

        tracing::debug!(
            target: targets::GROUP_VIEW,
            created,
            destroyed,
            views = self.order.len(),
            "group refreshed"
        );
        self.signals.refreshed.emit(());
    }

    /// Per-frame hook. Refreshes if the backing source list changed since
    /// the last refresh. Returns whether a refresh ran.
    pub fn update(&mut self) -> bool {
        if self.destroyed || !self.source_dirty.swap(false, Ordering::SeqCst) {
            return false;
        }
        self.refresh();
        true
    }

    /// Whether a source change is waiting for [`update`](Self::update).
    pub fn is_dirty(&self) -> bool {
        self.source_dirty.load(Ordering::SeqCst)
    }

    /// Sorts the data list by the comparator, if any, then orders the views
    /// to match. Views whose value is not in the data list go last.
    pub fn sort_items(&mut self) {
        if !self.ensure_alive("sort_items") {
            return;
        }
        let span = tracing::trace_span!(target: targets::GROUP_VIEW, span_names::SORT_ITEMS);
        let _enter = span.enter();

        if let Some(comparator) = &self.comparator {
            self.data_list.sort_by(|a, b| comparator(a, b));
        }

        let mut keyed: Vec<(usize, ViewId)> = self
            .order
            .iter()
            .map(|&id| {
                let position = self
                    .views
                    .get(id)
                    .and_then(ItemView::data)
                    .and_then(|data| self.data_position(data))
                    .unwrap_or(usize::MAX);
                (position, id)
            })
            .collect();
        keyed.sort_by_key(|(position, _)| *position);
        self.order = keyed.into_iter().map(|(_, id)| id).collect();

        for id in &self.order {
            if let Some(view) = self.views.get(*id) {
                self.ctx.scene.set_sibling_index(view.node(), usize::MAX);
            }
        }
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Adds a visibility filter. With `immediate`, rebuilds the group.
    /// Returns `false` if the filter was already registered.
    pub fn add_visible_filter(&mut self, filter: Filter<T>, immediate: bool) -> bool {
        let added = self.visibility.add(filter);
        if immediate {
            self.update_visibility_filters();
        }
        added
    }

    /// Removes a visibility filter. With `immediate`, rebuilds the group.
    pub fn remove_visible_filter(&mut self, filter: &Filter<T>, immediate: bool) -> bool {
        let removed = self.visibility.remove(filter);
        if immediate {
            self.update_visibility_filters();
        }
        removed
    }

    /// Removes every visibility filter. With `immediate`, rebuilds the group.
    pub fn clear_visibility_filters(&mut self, immediate: bool) {
        self.visibility.clear();
        if immediate {
            self.update_visibility_filters();
        }
    }

    /// Adds an availability filter. With `immediate`, re-evaluates every
    /// view's availability.
    pub fn add_available_filter(&mut self, filter: Filter<T>, immediate: bool) -> bool {
        let added = self.availability.add(filter);
        if immediate {
            self.update_availability_filters();
        }
        added
    }

    /// Removes an availability filter. With `immediate`, re-evaluates every
    /// view's availability.
    pub fn remove_available_filter(&mut self, filter: &Filter<T>, immediate: bool) -> bool {
        let removed = self.availability.remove(filter);
        if immediate {
            self.update_availability_filters();
        }
        removed
    }

    /// Removes every availability filter. With `immediate`, re-evaluates
    /// every view's availability.
    pub fn clear_availability_filters(&mut self, immediate: bool) {
        self.availability.clear();
        if immediate {
            self.update_availability_filters();
        }
    }

    /// Rebuilds the group from its current data list, keeping the backing
    /// source list.
    pub fn update_visibility_filters(&mut self) {
        let values = self.data_list.clone();
        let source = self.source.clone();
        self.rebuild(values, source);
    }

    /// Re-evaluates availability for every view without creating or
    /// destroying any.
    pub fn update_availability_filters(&mut self) {
        if !self.ensure_alive("update_availability_filters") {
            return;
        }
        for &id in &self.order {
            if let Some(view) = self.views.get_mut(id) {
                let available = view
                    .data()
                    .is_some_and(|data| self.availability.accepts(data));
                view.set_available(available);
            }
        }
    }

    /// Whether every visibility filter accepts `value`.
    pub fn is_item_visible(&self, value: &T) -> bool {
        self.visibility.accepts(value)
    }

    /// Whether every availability filter accepts `value`.
    pub fn is_item_available(&self, value: &T) -> bool {
        self.availability.accepts(value)
    }

    /// The registered visibility filters.
    pub fn visible_filters(&self) -> &FilterSet<T> {
        &self.visibility
    }

    /// The registered availability filters.
    pub fn available_filters(&self) -> &FilterSet<T> {
        &self.availability
    }

    // ------------------------------------------------------------------
    // Selection and input
    // ------------------------------------------------------------------

    /// Selects the view bound to a value equal to `value` and deselects
    /// every other view. `None` deselects everything.
    pub fn select(&mut self, value: Option<&T>) {
        if !self.ensure_alive("select") {
            return;
        }
        *self.selected.lock() = value.cloned();

        let equality = self.equality.clone();
        for &id in &self.order {
            if let Some(view) = self.views.get_mut(id) {
                let matches = match (value, view.data()) {
                    (Some(value), Some(data)) => equality(data, value),
                    _ => false,
                };
                view.set_selected(matches);
            }
        }
    }

    /// Deselects every view and emits `item_selected(None)`.
    pub fn deselect_all(&mut self) {
        if !self.ensure_alive("deselect_all") {
            return;
        }
        self.select(None);
        self.signals.item_selected.emit(None);
    }

    /// The selected value.
    pub fn selected(&self) -> Option<T> {
        self.selected.lock().clone()
    }

    /// Handles a primary click on the item for `value`.
    ///
    /// Runs the configured click action, then emits `data_clicked` and
    /// `item_clicked`. Returns `false` when no view is bound to `value`.
    pub fn click(&mut self, value: &T) -> bool {
        if !self.ensure_alive("click") || self.find_view(value).is_none() {
            return false;
        }
        match self.config.click_action {
            ClickAction::Click => {
                if self.config.select_on_click {
                    self.select(Some(value));
                }
            }
            ClickAction::Select => self.select(Some(value)),
            ClickAction::Remove => {
                self.remove_item(value);
            }
            ClickAction::None => {}
        }
        self.signals.data_clicked.emit(value.clone());
        self.signals.item_clicked.emit(value.clone());
        true
    }

    /// Emits `item_right_clicked` for the item bound to `value`.
    pub fn right_click(&mut self, value: &T) -> bool {
        if !self.ensure_alive("right_click") || self.find_view(value).is_none() {
            return false;
        }
        self.signals.item_right_clicked.emit(value.clone());
        true
    }

    /// Emits `item_remove_requested` for the item bound to `value`.
    pub fn request_remove(&mut self, value: &T) -> bool {
        if !self.ensure_alive("request_remove") || self.find_view(value).is_none() {
            return false;
        }
        self.signals.item_remove_requested.emit(value.clone());
        true
    }

    /// Routes a pointer press on `node` to the item view owning it.
    pub fn press(&mut self, node: NodeId, button: PointerButton) -> PressOutcome {
        if !self.ensure_alive("press") {
            return PressOutcome::Ignored;
        }
        let Some(value) = self
            .views()
            .find(|view| view.node() == node)
            .and_then(|view| view.data().cloned())
        else {
            return PressOutcome::Ignored;
        };

        match button {
            PointerButton::Left => {
                let action = self.config.click_action;
                self.click(&value);
                match action {
                    ClickAction::Click | ClickAction::None => PressOutcome::Clicked,
                    ClickAction::Select => PressOutcome::Selected,
                    ClickAction::Remove => PressOutcome::Removed,
                }
            }
            PointerButton::Right => {
                self.right_click(&value);
                PressOutcome::RightClicked
            }
            PointerButton::Middle => PressOutcome::Ignored,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Every value the group knows about, hidden ones included.
    pub fn data_list(&self) -> &[T] {
        &self.data_list
    }

    /// The values that currently have a view, in view order.
    pub fn visible_data_list(&self) -> Vec<T> {
        self.views().filter_map(|view| view.data().cloned()).collect()
    }

    /// The view bound to a value equal to `value`.
    pub fn view(&self, value: &T) -> Option<&ItemView<T>> {
        self.find_view(value).and_then(|id| self.views.get(id))
    }

    /// The ID of the view bound to a value equal to `value`.
    pub fn view_id(&self, value: &T) -> Option<ViewId> {
        self.find_view(value)
    }

    /// A view by ID.
    pub fn view_by_id(&self, id: ViewId) -> Option<&ItemView<T>> {
        self.views.get(id)
    }

    /// A view by ID, mutably.
    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut ItemView<T>> {
        self.views.get_mut(id)
    }

    /// The views in display order.
    pub fn views(&self) -> impl Iterator<Item = &ItemView<T>> {
        self.order.iter().filter_map(|&id| self.views.get(id))
    }

    /// View IDs in display order.
    pub fn view_ids(&self) -> &[ViewId] {
        &self.order
    }

    /// Number of views.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the group has no views.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The backing source list, if any.
    pub fn source(&self) -> Option<&SourceList<T>> {
        self.source.as_ref()
    }

    /// The content node views are created under.
    pub fn content(&self) -> NodeId {
        self.content
    }

    /// The group configuration.
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// The group's signals.
    pub fn signals(&self) -> &GroupSignals<T> {
        &self.signals
    }

    /// Whether [`destroy`](Self::destroy) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ------------------------------------------------------------------
    // Teardown
    // ------------------------------------------------------------------

    /// Destroys every view and clears the data list and source reference.
    ///
    /// A view that fails to destroy is reported and skipped; the others are
    /// still destroyed.
    pub fn destroy_group(&mut self) {
        if !self.ensure_alive("destroy_group") {
            return;
        }
        self.destroy_group_inner();
    }

    fn destroy_group_inner(&mut self) {
        let span = tracing::debug_span!(target: targets::GROUP_VIEW, span_names::DESTROY_GROUP, views = self.order.len());
        let _enter = span.enter();

        self.source_guard = None;
        self.source_dirty.store(false, Ordering::SeqCst);

        let mut failures = 0;
        for id in std::mem::take(&mut self.order) {
            if let Some(mut view) = self.views.remove(id) {
                if let Err(error) = view.destroy() {
                    failures += 1;
                    self.report(&error);
                }
            }
        }
        self.views.clear();
        self.data_list.clear();
        self.source = None;

        if failures > 0 {
            tracing::debug!(target: targets::GROUP_VIEW, failures, "group destroyed with failures");
        }
    }

    /// Destroys the group and disconnects every group signal. Later calls
    /// on the group are ignored.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroy_group_inner();
        self.signals.clear();
        self.destroyed = true;
    }
}

impl<T: Model> Drop for GroupView<T> {
    fn drop(&mut self) {
        self.destroy();
    }
}
