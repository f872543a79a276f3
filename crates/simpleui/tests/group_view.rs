//! Integration tests for group reconciliation.

use std::sync::Arc;

use parking_lot::Mutex;
use simpleui::config::{ClickAction, GroupConfig};
use simpleui::context::{ErrorReporter, UiContext};
use simpleui::scene::{MemoryScene, SceneGraph, TemplateId, TemplateSet};
use simpleui::source::SourceList;
use simpleui::view::{Filter, GroupView, PointerButton, PressOutcome, ViewId};
use simpleui::Error;

#[derive(Default)]
struct RecordingReporter {
    errors: Mutex<Vec<Error>>,
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &Error) {
        self.errors.lock().push(error.clone());
    }
}

struct Fixture {
    scene: Arc<MemoryScene>,
    errors: Arc<RecordingReporter>,
    ctx: UiContext<i32>,
    content: simpleui::scene::NodeId,
}

fn setup() -> Fixture {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let scene = Arc::new(MemoryScene::new());
    let content = scene.create_root();
    let errors = Arc::new(RecordingReporter::default());
    let templates = Arc::new(TemplateSet::new().with("item", TemplateId(1)));
    let ctx = UiContext::new(scene.clone(), templates)
        .with_focus(scene.clone())
        .with_errors(errors.clone());
    Fixture {
        scene,
        errors,
        ctx,
        content,
    }
}

impl Fixture {
    fn group(&self, config: GroupConfig) -> GroupView<i32> {
        GroupView::new(self.ctx.clone(), self.content, config)
    }

    /// Bound values in scene sibling order.
    fn scene_order(&self, group: &GroupView<i32>) -> Vec<i32> {
        self.scene
            .children(self.content)
            .into_iter()
            .filter_map(|node| group.views().find(|view| view.node() == node))
            .filter_map(|view| view.data().copied())
            .collect()
    }
}

fn recorder<A: Clone + Send + 'static>() -> (Arc<Mutex<Vec<A>>>, impl Fn(&A) + Send + Sync + 'static) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    (log, move |value: &A| log_clone.lock().push(value.clone()))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_a_create_in_order() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1, 2, 3]);

    assert_eq!(group.len(), 3);
    assert_eq!(group.visible_data_list(), vec![1, 2, 3]);
    assert_eq!(fx.scene_order(&group), vec![1, 2, 3]);
}

#[test]
fn test_scenario_b_visibility_filter_destroys_rejected_view() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1, 2, 3]);
    let node_for_two = group.view(&2).unwrap().node();

    group.add_visible_filter(Filter::new(|v: &i32| *v != 2), true);

    assert_eq!(group.visible_data_list(), vec![1, 3]);
    assert!(group.view(&2).is_none());
    assert!(!fx.scene.is_alive(node_for_two));
    assert_eq!(fx.scene_order(&group), vec![1, 3]);
}

#[test]
fn test_scenario_c_max_count() {
    let fx = setup();
    let mut group = fx.group(GroupConfig {
        max_count: Some(1),
        ..GroupConfig::default()
    });
    group.create_group(vec![1, 2]);

    assert_eq!(group.visible_data_list(), vec![1]);
    assert!(group.add_item(2).is_none());
    assert_eq!(group.len(), 1);
}

#[test]
fn test_scenario_d_remove_item() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![10, 20]);

    assert!(group.remove_item(&20));
    assert_eq!(group.data_list(), &[10]);
    assert_eq!(group.len(), 1);
    assert_eq!(group.views().next().and_then(|v| v.data().copied()), Some(10));
}

#[test]
fn test_scenario_e_reverse_comparator() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default()).with_comparator(|a, b| b.cmp(a));
    group.create_group(vec![1, 2, 3]);
    group.sort_items();

    assert_eq!(group.visible_data_list(), vec![3, 2, 1]);
    assert_eq!(fx.scene_order(&group), vec![3, 2, 1]);
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_no_duplicate_views_for_equal_values() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![]);

    for value in [1, 2, 1, 3, 2, 2, 1] {
        group.add_item(value);
    }

    let mut bound = group.visible_data_list();
    bound.sort();
    assert_eq!(bound, vec![1, 2, 3]);
}

#[test]
fn test_visibility_filters_decide_which_values_have_views() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.add_visible_filter(Filter::new(|v: &i32| v % 2 == 0), false);
    group.add_visible_filter(Filter::new(|v: &i32| *v < 8), false);
    group.create_group((1..=10).collect());

    assert_eq!(group.visible_data_list(), vec![2, 4, 6]);

    group.refresh();
    assert_eq!(group.visible_data_list(), vec![2, 4, 6]);
    for value in 1..=10 {
        assert_eq!(group.view(&value).is_some(), group.is_item_visible(&value));
    }
}

#[test]
fn test_max_count_holds_across_adds() {
    let fx = setup();
    let mut group = fx.group(GroupConfig {
        max_count: Some(3),
        ..GroupConfig::default()
    });
    group.create_group(vec![1]);

    for value in 2..20 {
        group.add_item(value);
        assert!(group.len() <= 3);
    }
    group.add_items(vec![30, 31, 32]);
    group.refresh();
    assert_eq!(group.len(), 3);
}

#[test]
fn test_refresh_without_changes_is_a_round_trip() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default()).with_comparator(|a, b| a.cmp(b));
    group.add_visible_filter(Filter::new(|v: &i32| *v != 4), false);
    group.create_group(vec![5, 3, 4, 1]);

    let data_before = group.data_list().to_vec();
    let bound_before = group.visible_data_list();
    let nodes_before: Vec<_> = group.views().map(|v| v.node()).collect();

    group.refresh();

    assert_eq!(group.data_list(), data_before.as_slice());
    assert_eq!(group.visible_data_list(), bound_before);
    assert_eq!(group.views().map(|v| v.node()).collect::<Vec<_>>(), nodes_before);
}

#[test]
fn test_remove_item_reports_whether_a_view_existed() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.add_visible_filter(Filter::new(|v: &i32| *v != 2), false);
    group.create_group(vec![1, 2, 3]);

    assert!(!group.remove_item(&2));
    assert_eq!(group.data_list(), &[1, 2, 3]);
    assert!(!group.remove_item(&9));

    assert!(group.remove_item(&3));
    assert!(group.view(&3).is_none());
    assert!(!group.remove_item(&3));
}

#[test]
fn test_repeated_sorting_is_stable() {
    let fx = setup();
    let mut group = fx
        .group(GroupConfig::default())
        .with_comparator(|a: &i32, b: &i32| (a / 10).cmp(&(b / 10)));
    group.create_group(vec![21, 11, 25, 13, 22, 1]);

    let once = group.visible_data_list();
    group.sort_items();
    group.sort_items();

    assert_eq!(once, vec![1, 11, 13, 21, 25, 22]);
    assert_eq!(group.visible_data_list(), once);
    assert_eq!(fx.scene_order(&group), once);
}

// ============================================================================
// Errors and teardown
// ============================================================================

#[test]
fn test_missing_template_skips_only_that_value() {
    let fx = setup();
    let mut group = fx
        .group(GroupConfig::default())
        .with_template_kind(|v: &i32| if *v == 2 { "rare".to_string() } else { "item".to_string() });
    group.create_group(vec![1, 2, 3]);

    assert_eq!(group.visible_data_list(), vec![1, 3]);
    assert_eq!(group.data_list(), &[1, 3]);
    assert_eq!(*fx.errors.errors.lock(), vec![Error::missing_template("rare")]);
}

#[test]
fn test_add_item_with_missing_template_leaves_no_trace() {
    let fx = setup();
    let mut group = fx
        .group(GroupConfig::default())
        .with_template_kind(|v: &i32| if *v == 99 { "rare".to_string() } else { "item".to_string() });
    group.create_group(vec![1]);
    let (added, on_added) = recorder::<i32>();
    group.signals().item_added.connect(on_added);

    assert!(group.add_item(99).is_none());
    assert_eq!(group.data_list(), &[1]);
    assert!(added.lock().is_empty());
    assert!(group.can_be_modified());

    // Nothing left behind for refresh to retry.
    group.refresh();
    assert_eq!(fx.errors.errors.lock().len(), 1);
    assert_eq!(group.visible_data_list(), vec![1]);
}

#[test]
fn test_refresh_emits_refreshed_once_after_reconciling() {
    let fx = setup();
    let source = SourceList::new(vec![1, 2, 3]);
    let mut group = fx.group(GroupConfig::default());
    group.create_group_from(&source);
    source.set(vec![3, 4]);

    let observed = Arc::new(Mutex::new(Vec::new()));
    let observed_clone = observed.clone();
    let scene = fx.scene.clone();
    let content = fx.content;
    group
        .signals()
        .refreshed
        .connect(move |_| observed_clone.lock().push(scene.children(content).len()));

    group.refresh();

    assert_eq!(*observed.lock(), vec![2]);
    assert_eq!(group.visible_data_list(), vec![3, 4]);
}

#[test]
fn test_destroy_group_continues_past_failures() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1, 2, 3]);
    let nodes: Vec<_> = group.views().map(|v| v.node()).collect();
    fx.scene.fail_destroy(nodes[1]);

    group.destroy_group();

    assert!(group.is_empty());
    assert!(group.data_list().is_empty());
    assert!(!fx.scene.is_alive(nodes[0]));
    assert!(fx.scene.is_alive(nodes[1]));
    assert!(!fx.scene.is_alive(nodes[2]));
    assert_eq!(fx.errors.errors.lock().len(), 1);
    assert_eq!(fx.scene.destroy_calls(), 3);
}

#[test]
fn test_destroy_twice_and_drop_destroy_each_node_once() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1, 2]);

    group.destroy();
    group.destroy();
    drop(group);

    assert_eq!(fx.scene.destroy_calls(), 2);
    assert!(fx.scene.children(fx.content).is_empty());
}

// ============================================================================
// Signals
// ============================================================================

#[test]
fn test_add_and_remove_signals() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1]);

    let (added, on_added) = recorder::<i32>();
    group.signals().item_added.connect(on_added);
    let (batches, on_batch) = recorder::<Vec<i32>>();
    group.signals().items_added.connect(on_batch);
    let (removed, on_removed) = recorder::<i32>();
    group.signals().item_removed.connect(on_removed);
    let (removed_batches, on_removed_batch) = recorder::<Vec<i32>>();
    group.signals().items_removed.connect(on_removed_batch);

    group.add_items(vec![2]);
    group.add_items(vec![3, 4]);
    group.add_items(vec![]);
    group.remove_item(&1);
    assert_eq!(group.remove_items(&[2, 9, 3]), 2);

    assert_eq!(*added.lock(), vec![2]);
    assert_eq!(*batches.lock(), vec![vec![3, 4]]);
    assert_eq!(*removed.lock(), vec![1]);
    assert_eq!(*removed_batches.lock(), vec![vec![2, 3]]);
    assert_eq!(group.data_list(), &[4]);
}

#[test]
fn test_can_add_predicate_rejects_values() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default()).with_can_add(|v| *v > 0);
    group.create_group(vec![]);

    assert!(group.add_item(-1).is_none());
    assert!(!group.add_data(-5));
    assert!(group.add_data(5));
    assert_eq!(group.data_list(), &[5]);
}

#[test]
fn test_lifecycle_signals_fire_after_state_is_committed() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());

    let created = Arc::new(Mutex::new(0));
    let created_clone = created.clone();
    group.signals().group_created.connect(move |_| *created_clone.lock() += 1);
    let (item_ids, on_item) = recorder::<ViewId>();
    group.signals().item_created.connect(on_item);

    group.create_group(vec![1, 2]);

    assert_eq!(*created.lock(), 1);
    assert_eq!(item_ids.lock().as_slice(), group.view_ids());
}

// ============================================================================
// Selection and input
// ============================================================================

#[test]
fn test_select_uses_equality_and_keeps_one_view_selected() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1, 2, 3]);
    let (selected, on_selected) = recorder::<Option<i32>>();
    group.signals().item_selected.connect(on_selected);

    group.select(Some(&2));
    group.select(Some(&3));

    let flags: Vec<_> = group.views().map(|v| v.is_selected()).collect();
    assert_eq!(flags, vec![false, false, true]);
    assert_eq!(group.selected(), Some(3));
    assert_eq!(fx.scene.focused(), group.view(&3).map(|v| v.node()));

    group.deselect_all();
    assert!(group.views().all(|v| !v.is_selected()));
    assert_eq!(group.selected(), None);
    assert_eq!(*selected.lock(), vec![Some(2), Some(3), None]);
}

#[test]
fn test_click_actions() {
    let fx = setup();

    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1, 2]);
    let (clicked, on_clicked) = recorder::<i32>();
    group.signals().item_clicked.connect(on_clicked);
    assert!(group.click(&2));
    assert_eq!(group.selected(), Some(2));
    assert!(!group.click(&7));
    assert_eq!(*clicked.lock(), vec![2]);

    let mut removing = fx.group(GroupConfig {
        click_action: ClickAction::Remove,
        ..GroupConfig::default()
    });
    removing.create_group(vec![5, 6]);
    let (data_clicked, on_data) = recorder::<i32>();
    removing.signals().data_clicked.connect(on_data);
    let node = removing.view(&5).unwrap().node();
    assert_eq!(removing.press(node, PointerButton::Left), PressOutcome::Removed);
    assert_eq!(removing.data_list(), &[6]);
    assert_eq!(*data_clicked.lock(), vec![5]);

    let mut passive = fx.group(GroupConfig {
        click_action: ClickAction::Click,
        select_on_click: false,
        ..GroupConfig::default()
    });
    passive.create_group(vec![8]);
    assert!(passive.click(&8));
    assert_eq!(passive.selected(), None);
}

#[test]
fn test_right_click_and_view_level_input_are_forwarded() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1, 2]);

    let (right, on_right) = recorder::<i32>();
    group.signals().item_right_clicked.connect(on_right);
    let (remove, on_remove) = recorder::<i32>();
    group.signals().item_remove_requested.connect(on_remove);

    let node = group.view(&1).unwrap().node();
    assert_eq!(group.press(node, PointerButton::Right), PressOutcome::RightClicked);
    assert_eq!(group.press(fx.content, PointerButton::Left), PressOutcome::Ignored);

    let id = group.view_id(&2).unwrap();
    group.view_mut(id).unwrap().request_remove();
    assert!(group.request_remove(&1));

    assert_eq!(*right.lock(), vec![1]);
    assert_eq!(*remove.lock(), vec![2, 1]);
    assert_eq!(group.len(), 2);
}

// ============================================================================
// Availability
// ============================================================================

#[test]
fn test_availability_filters_only_toggle_views() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    group.create_group(vec![1, 2, 3]);
    let nodes: Vec<_> = group.views().map(|v| v.node()).collect();

    let low = Filter::new(|v: &i32| *v < 3);
    group.add_available_filter(low.clone(), true);
    let available: Vec<_> = group.views().map(|v| v.is_available()).collect();
    assert_eq!(available, vec![true, true, false]);
    assert!(!group.is_item_available(&3));

    group.remove_available_filter(&low, true);
    assert!(group.views().all(|v| v.is_available()));
    assert_eq!(group.views().map(|v| v.node()).collect::<Vec<_>>(), nodes);
}

#[test]
fn test_removing_a_visibility_filter_restores_hidden_values() {
    let fx = setup();
    let mut group = fx.group(GroupConfig::default());
    let hide_two = Filter::new(|v: &i32| *v != 2);
    group.create_group(vec![1, 2, 3]);

    group.add_visible_filter(hide_two.clone(), true);
    assert_eq!(group.visible_data_list(), vec![1, 3]);

    group.remove_visible_filter(&hide_two, true);
    assert_eq!(group.visible_data_list(), vec![1, 2, 3]);

    group.add_visible_filter(hide_two, false);
    group.clear_visibility_filters(true);
    assert_eq!(group.visible_data_list(), vec![1, 2, 3]);
}

// ============================================================================
// Backing source lists
// ============================================================================

#[test]
fn test_source_changes_refresh_on_update() {
    let fx = setup();
    let source = SourceList::new(vec![1, 2, 3]);
    let mut group = fx.group(GroupConfig {
        subscribe_to_source: true,
        ..GroupConfig::default()
    });
    group.create_group_from(&source);
    assert!(!group.update());

    source.remove(&2);
    source.push(4);
    assert!(group.is_dirty());
    assert!(group.update());
    assert!(!group.update());

    assert_eq!(group.data_list(), &[1, 3, 4]);
    assert_eq!(group.visible_data_list(), vec![1, 3, 4]);
    assert_eq!(fx.scene_order(&group), vec![1, 3, 4]);
}

#[test]
fn test_unsubscribed_source_is_copied_on_refresh_only() {
    let fx = setup();
    let source = SourceList::new(vec![1, 2]);
    let mut group = fx.group(GroupConfig::default());
    group.create_group_from(&source);

    source.set(vec![2, 5]);
    assert!(!group.update());
    assert_eq!(group.visible_data_list(), vec![1, 2]);

    group.refresh();
    assert_eq!(group.visible_data_list(), vec![2, 5]);
}

#[test]
fn test_filter_rebuild_keeps_the_source() {
    let fx = setup();
    let source = SourceList::new(vec![1, 2, 3]);
    let mut group = fx.group(GroupConfig {
        subscribe_to_source: true,
        ..GroupConfig::default()
    });
    group.create_group_from(&source);
    group.add_visible_filter(Filter::new(|v: &i32| *v > 1), true);

    assert!(group.source().is_some_and(|s| s.ptr_eq(&source)));
    source.push(7);
    assert!(group.update());
    assert_eq!(group.visible_data_list(), vec![2, 3, 7]);

    group.destroy_group();
    assert!(group.source().is_none());
    source.push(8);
    assert!(!group.update());
}

#[test]
fn test_scene_index_past_end_moves_last() {
    let fx = setup();
    let extra = fx.scene.instantiate(TemplateId(5), Some(fx.content)).unwrap();
    let mut group = fx.group(GroupConfig::default()).with_comparator(|a, b| b.cmp(a));
    group.create_group(vec![1, 2]);

    let children = fx.scene.children(fx.content);
    assert_eq!(children[0], extra);
    assert_eq!(fx.scene_order(&group), vec![2, 1]);
}
