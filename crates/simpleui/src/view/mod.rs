//! Data-bound views.
//!
//! An [`ItemView`] binds one model value to one scene node. A [`GroupView`]
//! reconciles a list of model values against a list of item views: it
//! creates a view for every value that passes its visibility filters,
//! destroys views whose value disappeared, keeps views in comparator order
//! and tracks which value is selected.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use simpleui::config::GroupConfig;
//! use simpleui::context::UiContext;
//! use simpleui::scene::{MemoryScene, TemplateId, TemplateSet};
//! use simpleui::view::{Filter, GroupView};
//!
//! let scene = Arc::new(MemoryScene::new());
//! let content = scene.create_root();
//! let templates = Arc::new(TemplateSet::new().with("item", TemplateId(1)));
//! let ctx = UiContext::new(scene.clone(), templates);
//!
//! let mut group = GroupView::new(ctx, content, GroupConfig::default());
//! group.create_group(vec![1, 2, 3]);
//! assert_eq!(group.visible_data_list(), vec![1, 2, 3]);
//!
//! group.add_visible_filter(Filter::new(|n: &i32| *n != 2), true);
//! assert_eq!(group.visible_data_list(), vec![1, 3]);
//! assert_eq!(scene.children(content).len(), 2);
//! ```

mod filter;
mod group_view;
mod indicator;
mod item_view;
mod text;

pub use filter::{Filter, FilterSet};
pub use group_view::{GroupSignals, GroupView, ViewId};
pub use indicator::{NodeIndicator, SelectionIndicator};
pub use item_view::{BindFilter, ItemSignals, ItemView};
pub use text::TextFormat;

/// Values that can be bound to views.
///
/// Views compare values with `PartialEq` (or a group's custom equality) and
/// never mutate them.
pub trait Model: Clone + PartialEq + Send + Sync + 'static {}

impl<T> Model for T where T: Clone + PartialEq + Send + Sync + 'static {}

/// Pointer button reported by the host's input system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// What a pointer press ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressOutcome {
    /// Click signals were emitted.
    Clicked,
    /// The item was selected.
    Selected,
    /// A removal request was emitted.
    RemoveRequested,
    /// The item was removed from its group.
    Removed,
    /// Right-click signals were emitted.
    RightClicked,
    /// Nothing happened.
    Ignored,
}
