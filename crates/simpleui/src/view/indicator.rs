//! Selection indicators.

use std::sync::Arc;

use crate::scene::{NodeId, SceneGraph};

/// Observer told about every selection change of an item view.
pub trait SelectionIndicator: Send + Sync {
    /// Called after the view's selection flag changes.
    fn set_selected(&self, selected: bool);
}

impl<F> SelectionIndicator for F
where
    F: Fn(bool) + Send + Sync,
{
    fn set_selected(&self, selected: bool) {
        self(selected)
    }
}

/// Shows a node while the view is selected and hides it otherwise.
pub struct NodeIndicator {
    scene: Arc<dyn SceneGraph>,
    node: NodeId,
}

impl NodeIndicator {
    /// Creates an indicator driving `node`, initialised to `selected`.
    pub fn new(scene: Arc<dyn SceneGraph>, node: NodeId, selected: bool) -> Self {
        scene.set_visible(node, selected);
        Self { scene, node }
    }

    /// The indicator node.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl SelectionIndicator for NodeIndicator {
    fn set_selected(&self, selected: bool) {
        self.scene.set_visible(self.node, selected);
    }
}
