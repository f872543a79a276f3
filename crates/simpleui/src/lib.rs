//! SimpleUI - data-bound item and group views for retained scene graphs.
//!
//! SimpleUI keeps a list of model values and a list of live views in sync.
//! It never draws anything: views are created, shown, reordered and
//! destroyed through the [`SceneGraph`](scene::SceneGraph) collaborator, and
//! templates are looked up through a [`TemplateRegistry`](scene::TemplateRegistry).
//! Every collaborator is passed in explicitly through a
//! [`UiContext`](context::UiContext).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use simpleui::prelude::*;
//!
//! let scene = Arc::new(MemoryScene::new());
//! let content = scene.create_root();
//! let templates = Arc::new(TemplateSet::new().with("item", TemplateId(1)));
//! let ctx = UiContext::new(scene.clone(), templates);
//!
//! let mut group = GroupView::new(ctx, content, GroupConfig::default())
//!     .with_comparator(|a: &u32, b: &u32| b.cmp(a));
//!
//! group.signals().item_selected.connect(|value| println!("selected {value:?}"));
//! group.create_group(vec![1, 2, 3]);
//! assert_eq!(group.visible_data_list(), vec![3, 2, 1]);
//!
//! group.click(&2);
//! assert_eq!(group.selected(), Some(2));
//! ```

pub use simpleui_core::*;

pub mod config;
pub mod context;
pub mod element;
pub mod form;
pub mod prelude;
pub mod scene;
pub mod source;
pub mod tooltip;
pub mod view;
