//! Prelude module for SimpleUI.
//!
//! ```ignore
//! use simpleui::prelude::*;
//! ```

// ============================================================================
// Signals and errors
// ============================================================================

pub use crate::{ConnectionGuard, ConnectionId, Error, Result, Signal};

// ============================================================================
// Collaborators
// ============================================================================

pub use crate::context::{
    ChangeNotifier, ChangeSource, ErrorReporter, FocusSink, TracingReporter, UiContext,
};
pub use crate::scene::{MemoryScene, NodeId, SceneGraph, TemplateId, TemplateRegistry, TemplateSet};
pub use crate::source::SourceList;

// ============================================================================
// Views
// ============================================================================

pub use crate::view::{
    Filter, FilterSet, GroupView, ItemView, Model, PointerButton, PressOutcome, TextFormat,
    ViewId,
};

// ============================================================================
// Configuration, forms and tooltips
// ============================================================================

pub use crate::config::{ClickAction, GroupConfig, ItemConfig, TooltipConfig, UiConfig};
pub use crate::form::{FormId, FormOptions, FormStack};
pub use crate::tooltip::{TooltipAction, TooltipController, TooltipTarget};
