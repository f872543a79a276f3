//! Show/hide lifecycle shared by every visual element.
//!
//! [`ElementState`] tracks whether an element's node is visible, whether the
//! element is available for interaction, and whether it has been destroyed.
//! It does not own the node; the owner passes the scene in on every call.

use simpleui_core::logging::targets;
use simpleui_core::Signal;

use crate::scene::{NodeId, SceneGraph};

/// Visibility, availability and destruction state of one scene node.
///
/// # Example
///
/// ```
/// use simpleui::element::ElementState;
/// use simpleui::scene::{MemoryScene, SceneGraph, TemplateId};
///
/// let scene = MemoryScene::new();
/// let node = scene.instantiate(TemplateId(1), None).unwrap();
/// let mut element = ElementState::new(node);
///
/// element.hide(&scene);
/// assert_eq!(scene.is_visible(node), Some(false));
/// element.switch_visible(&scene);
/// assert!(element.is_visible());
/// ```
pub struct ElementState {
    node: NodeId,
    visible: bool,
    available: bool,
    blocker: Option<NodeId>,
    destroyed: bool,
    shown: Signal<()>,
    hidden: Signal<()>,
}

impl ElementState {
    /// Creates state for a freshly instantiated, visible node.
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            visible: true,
            available: true,
            blocker: None,
            destroyed: false,
            shown: Signal::new(),
            hidden: Signal::new(),
        }
    }

    /// The node this state belongs to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Sets the node shown over the element while it is unavailable.
    pub fn set_blocker(&mut self, blocker: Option<NodeId>) {
        self.blocker = blocker;
    }

    /// The blocker node, if any.
    pub fn blocker(&self) -> Option<NodeId> {
        self.blocker
    }

    /// Shows the node. Does nothing if it is already visible.
    pub fn show(&mut self, scene: &dyn SceneGraph) {
        if self.destroyed || self.visible {
            return;
        }
        scene.set_visible(self.node, true);
        self.visible = true;
        tracing::trace!(target: targets::ELEMENT, node = ?self.node, "shown");
        self.shown.emit(());
    }

    /// Hides the node.
    ///
    /// Unlike [`show`](Self::show), this always reaches the scene, so a node
    /// whose state drifted from the flag is forced hidden.
    pub fn hide(&mut self, scene: &dyn SceneGraph) {
        if self.destroyed {
            return;
        }
        scene.set_visible(self.node, false);
        self.visible = false;
        tracing::trace!(target: targets::ELEMENT, node = ?self.node, "hidden");
        self.hidden.emit(());
    }

    /// Shows or hides the node, doing nothing when the flag already matches.
    pub fn set_visible(&mut self, scene: &dyn SceneGraph, visible: bool) {
        if self.visible == visible {
            return;
        }
        if visible {
            self.show(scene);
        } else {
            self.hide(scene);
        }
    }

    /// Flips visibility.
    pub fn switch_visible(&mut self, scene: &dyn SceneGraph) {
        if self.visible {
            self.hide(scene);
        } else {
            self.show(scene);
        }
    }

    /// Marks the element available or not. The blocker is visible exactly
    /// while the element is unavailable.
    pub fn set_available(&mut self, scene: &dyn SceneGraph, available: bool) {
        if self.destroyed {
            return;
        }
        self.available = available;
        if let Some(blocker) = self.blocker {
            scene.set_visible(blocker, !available);
        }
    }

    /// Records destruction. Returns `true` only on the first call.
    pub fn mark_destroyed(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.destroyed = true;
        self.shown.disconnect_all();
        self.hidden.disconnect_all();
        true
    }

    /// Whether the node is currently shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the element accepts interaction.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Whether [`mark_destroyed`](Self::mark_destroyed) has been called.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Emitted after the node is shown.
    pub fn shown(&self) -> &Signal<()> {
        &self.shown
    }

    /// Emitted after the node is hidden.
    pub fn hidden(&self) -> &Signal<()> {
        &self.hidden
    }
}
