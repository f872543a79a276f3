//! Scene-graph collaborators.
//!
//! SimpleUI never renders anything itself. Views create, show, hide, reorder
//! and destroy visual nodes through the [`SceneGraph`] trait, and look up the
//! template to instantiate for a value through a [`TemplateRegistry`]. Any
//! retained-mode renderer can provide an adapter for both.
//!
//! [`MemoryScene`] is a headless implementation that keeps the node tree in
//! memory. It is what the test suite runs against, and it is also useful for
//! driving views from a host that renders from a snapshot.

mod memory;

pub use memory::MemoryScene;

use simpleui_core::Result;
use slotmap::new_key_type;

new_key_type! {
    /// Handle to a node in the external scene graph.
    ///
    /// Adapters that keep their own node identifiers can build these through
    /// `NodeId::from(KeyData::from_ffi(raw))`.
    pub struct NodeId;
}

/// Handle to a visual template ("prefab") known to the scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub u32);

/// The retained scene-graph collaborator.
///
/// All methods take `&self`; adapters are expected to use interior
/// mutability the way [`MemoryScene`] does.
pub trait SceneGraph: Send + Sync {
    /// Instantiate `template` as the last child of `parent` (or as a root).
    fn instantiate(&self, template: TemplateId, parent: Option<NodeId>) -> Result<NodeId>;

    /// Destroy a node and its whole subtree.
    fn destroy(&self, node: NodeId) -> Result<()>;

    /// Toggle a node's visibility.
    fn set_visible(&self, node: NodeId, visible: bool);

    /// Move a node to `index` among its siblings.
    ///
    /// Indices past the end move the node to the last position.
    fn set_sibling_index(&self, node: NodeId, index: usize);

    /// Whether `node` lies somewhere below `ancestor`.
    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool;
}

/// Maps a view kind to the template it should be instantiated from.
pub trait TemplateRegistry: Send + Sync {
    /// Returns `None` when no template is registered for `kind`.
    fn template(&self, kind: &str) -> Option<TemplateId>;
}

/// A simple list-backed [`TemplateRegistry`].
///
/// Lookups return the first entry registered for a kind.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    entries: Vec<(String, TemplateId)>,
}

impl TemplateSet {
    /// Creates an empty template set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template for a kind, builder style.
    pub fn with(mut self, kind: impl Into<String>, template: TemplateId) -> Self {
        self.register(kind, template);
        self
    }

    /// Registers a template for a kind.
    pub fn register(&mut self, kind: impl Into<String>, template: TemplateId) {
        self.entries.push((kind.into(), template));
    }

    /// Removes every template registered for a kind. Returns how many were removed.
    pub fn unregister(&mut self, kind: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != kind);
        before - self.entries.len()
    }

    /// Orders entries by kind name, keeping registration order within a kind.
    pub fn sort(&mut self) {
        self.entries.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Drops repeated (kind, template) pairs, keeping the first occurrence.
    pub fn remove_duplicates(&mut self) {
        let mut seen = Vec::with_capacity(self.entries.len());
        self.entries.retain(|entry| {
            if seen.contains(entry) {
                false
            } else {
                seen.push(entry.clone());
                true
            }
        });
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no template is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the registered kinds in their current order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(kind, _)| kind.as_str())
    }
}

impl TemplateRegistry for TemplateSet {
    fn template(&self, kind: &str) -> Option<TemplateId> {
        self.entries
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, template)| *template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_lookup() {
        let set = TemplateSet::new()
            .with("slot", TemplateId(1))
            .with("header", TemplateId(2))
            .with("slot", TemplateId(3));

        assert_eq!(set.template("slot"), Some(TemplateId(1)));
        assert_eq!(set.template("header"), Some(TemplateId(2)));
        assert_eq!(set.template("footer"), None);
    }

    #[test]
    fn test_sort_and_dedup() {
        let mut set = TemplateSet::new()
            .with("b", TemplateId(2))
            .with("a", TemplateId(1))
            .with("b", TemplateId(2));

        set.remove_duplicates();
        assert_eq!(set.len(), 2);

        set.sort();
        assert_eq!(set.kinds().collect::<Vec<_>>(), vec!["a", "b"]);

        assert_eq!(set.unregister("a"), 1);
        assert_eq!(set.template("a"), None);
    }
}
