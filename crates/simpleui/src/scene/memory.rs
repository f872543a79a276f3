//! Headless in-memory scene graph.

use std::collections::HashSet;

use parking_lot::Mutex;
use simpleui_core::{Error, Result};
use slotmap::SlotMap;

use super::{NodeId, SceneGraph, TemplateId};
use crate::context::FocusSink;

#[derive(Debug)]
struct NodeRecord {
    template: Option<TemplateId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    visible: bool,
}

#[derive(Debug, Default)]
struct SceneState {
    nodes: SlotMap<NodeId, NodeRecord>,
    roots: Vec<NodeId>,
    failing: HashSet<NodeId>,
    destroy_calls: usize,
    focused: Option<NodeId>,
}

impl SceneState {
    fn siblings_mut(&mut self, parent: Option<NodeId>) -> Option<&mut Vec<NodeId>> {
        match parent {
            Some(parent) => self.nodes.get_mut(parent).map(|record| &mut record.children),
            None => Some(&mut self.roots),
        }
    }

    fn remove_subtree(&mut self, node: NodeId) {
        if let Some(record) = self.nodes.remove(node) {
            for child in record.children {
                self.remove_subtree(child);
            }
        }
        if self.focused == Some(node) {
            self.focused = None;
        }
    }
}

/// A [`SceneGraph`] that keeps its node tree in memory.
///
/// Besides implementing the collaborator traits, it exposes inspection
/// helpers (children order, visibility, destroy counts, focus) and can be
/// told to fail the destruction of particular nodes.
///
/// # Example
///
/// ```
/// use simpleui::scene::{MemoryScene, SceneGraph, TemplateId};
///
/// let scene = MemoryScene::new();
/// let content = scene.create_root();
/// let node = scene.instantiate(TemplateId(7), Some(content)).unwrap();
///
/// assert_eq!(scene.children(content), vec![node]);
/// assert_eq!(scene.template_of(node), Some(TemplateId(7)));
/// ```
#[derive(Debug, Default)]
pub struct MemoryScene {
    state: Mutex<SceneState>,
}

impl MemoryScene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a template-less root node, typically used as a content container.
    pub fn create_root(&self) -> NodeId {
        let mut state = self.state.lock();
        let node = state.nodes.insert(NodeRecord {
            template: None,
            parent: None,
            children: Vec::new(),
            visible: true,
        });
        state.roots.push(node);
        node
    }

    /// Children of `parent` in sibling order.
    pub fn children(&self, parent: NodeId) -> Vec<NodeId> {
        self.state
            .lock()
            .nodes
            .get(parent)
            .map(|record| record.children.clone())
            .unwrap_or_default()
    }

    /// Whether the node still exists.
    pub fn is_alive(&self, node: NodeId) -> bool {
        self.state.lock().nodes.contains_key(node)
    }

    /// The node's visibility, or `None` if it does not exist.
    pub fn is_visible(&self, node: NodeId) -> Option<bool> {
        self.state.lock().nodes.get(node).map(|record| record.visible)
    }

    /// The template a node was instantiated from.
    pub fn template_of(&self, node: NodeId) -> Option<TemplateId> {
        self.state.lock().nodes.get(node).and_then(|record| record.template)
    }

    /// The node's parent, if it has one.
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.state.lock().nodes.get(node).and_then(|record| record.parent)
    }

    /// Number of live nodes, roots included.
    pub fn node_count(&self) -> usize {
        self.state.lock().nodes.len()
    }

    /// Number of times [`SceneGraph::destroy`] has been called.
    pub fn destroy_calls(&self) -> usize {
        self.state.lock().destroy_calls
    }

    /// Makes every later `destroy` of `node` fail with a scene error.
    pub fn fail_destroy(&self, node: NodeId) {
        self.state.lock().failing.insert(node);
    }

    /// The node that last received focus, if it still exists.
    pub fn focused(&self) -> Option<NodeId> {
        self.state.lock().focused
    }
}

impl SceneGraph for MemoryScene {
    fn instantiate(&self, template: TemplateId, parent: Option<NodeId>) -> Result<NodeId> {
        let mut state = self.state.lock();
        if let Some(parent) = parent {
            if !state.nodes.contains_key(parent) {
                return Err(Error::NodeNotFound);
            }
        }

        let node = state.nodes.insert(NodeRecord {
            template: Some(template),
            parent,
            children: Vec::new(),
            visible: true,
        });
        if let Some(siblings) = state.siblings_mut(parent) {
            siblings.push(node);
        }
        Ok(node)
    }

    fn destroy(&self, node: NodeId) -> Result<()> {
        let mut state = self.state.lock();
        state.destroy_calls += 1;

        if state.failing.contains(&node) {
            return Err(Error::scene("destroy", "node refused destruction"));
        }
        let parent = match state.nodes.get(node) {
            Some(record) => record.parent,
            None => return Err(Error::NodeNotFound),
        };

        if let Some(siblings) = state.siblings_mut(parent) {
            siblings.retain(|&sibling| sibling != node);
        }
        state.remove_subtree(node);
        Ok(())
    }

    fn set_visible(&self, node: NodeId, visible: bool) {
        if let Some(record) = self.state.lock().nodes.get_mut(node) {
            record.visible = visible;
        }
    }

    fn set_sibling_index(&self, node: NodeId, index: usize) {
        let mut state = self.state.lock();
        let parent = match state.nodes.get(node) {
            Some(record) => record.parent,
            None => return,
        };
        if let Some(siblings) = state.siblings_mut(parent) {
            siblings.retain(|&sibling| sibling != node);
            let index = index.min(siblings.len());
            siblings.insert(index, node);
        }
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let state = self.state.lock();
        let mut current = state.nodes.get(node).and_then(|record| record.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = state.nodes.get(parent).and_then(|record| record.parent);
        }
        false
    }
}

impl FocusSink for MemoryScene {
    fn request_focus(&self, node: NodeId) {
        let mut state = self.state.lock();
        if state.nodes.contains_key(node) {
            state.focused = Some(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantiate_and_destroy_subtree() {
        let scene = MemoryScene::new();
        let root = scene.create_root();
        let a = scene.instantiate(TemplateId(1), Some(root)).unwrap();
        let b = scene.instantiate(TemplateId(1), Some(a)).unwrap();

        assert!(scene.is_descendant(b, root));
        assert!(!scene.is_descendant(root, b));

        scene.destroy(a).unwrap();
        assert!(!scene.is_alive(a));
        assert!(!scene.is_alive(b));
        assert!(scene.children(root).is_empty());
        assert_eq!(scene.destroy(a), Err(Error::NodeNotFound));
    }

    #[test]
    fn test_sibling_index_clamps() {
        let scene = MemoryScene::new();
        let root = scene.create_root();
        let a = scene.instantiate(TemplateId(1), Some(root)).unwrap();
        let b = scene.instantiate(TemplateId(1), Some(root)).unwrap();
        let c = scene.instantiate(TemplateId(1), Some(root)).unwrap();

        scene.set_sibling_index(c, 0);
        assert_eq!(scene.children(root), vec![c, a, b]);

        scene.set_sibling_index(c, usize::MAX);
        assert_eq!(scene.children(root), vec![a, b, c]);
    }

    #[test]
    fn test_failing_destroy() {
        let scene = MemoryScene::new();
        let root = scene.create_root();
        let node = scene.instantiate(TemplateId(1), Some(root)).unwrap();

        scene.fail_destroy(node);
        assert!(matches!(scene.destroy(node), Err(Error::Scene { .. })));
        assert!(scene.is_alive(node));
        assert_eq!(scene.destroy_calls(), 1);
    }

    #[test]
    fn test_focus_and_visibility() {
        let scene = MemoryScene::new();
        let root = scene.create_root();
        let node = scene.instantiate(TemplateId(1), Some(root)).unwrap();

        scene.set_visible(node, false);
        assert_eq!(scene.is_visible(node), Some(false));

        scene.request_focus(node);
        assert_eq!(scene.focused(), Some(node));
        scene.destroy(node).unwrap();
        assert_eq!(scene.focused(), None);
    }
}
