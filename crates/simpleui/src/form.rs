//! Z-ordered form stack.
//!
//! Forms are top-level panels (inventories, dialogs, menus) instantiated
//! from templates by kind. The [`FormStack`] keeps the list of active forms
//! sorted by priority, reflects that order in the scene's sibling order, and
//! implements the usual window rules: at most one core form at a time,
//! child forms hide with their parent, and click-outside dismissal.

use std::sync::Arc;

use simpleui_core::logging::targets;
use simpleui_core::{Error, Result, Signal};
use slotmap::{new_key_type, SlotMap};

use crate::context::{ErrorReporter, TracingReporter};
use crate::element::ElementState;
use crate::scene::{NodeId, SceneGraph, TemplateRegistry};

new_key_type! {
    /// Identifies a form in a [`FormStack`].
    pub struct FormId;
}

/// Behaviour flags for a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOptions {
    /// Showing a core form hides every other core form.
    pub core: bool,
    /// Whether [`FormStack::hide_top_closable`] may close the form.
    pub user_can_close: bool,
    /// Destroy the form when it is hidden.
    pub destroy_on_hide: bool,
    /// Hide the form when the pointer is pressed outside it.
    pub hide_if_click_outside: bool,
    /// Stack position; higher priorities are drawn above lower ones.
    pub priority: i32,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            core: false,
            user_can_close: true,
            destroy_on_hide: true,
            hide_if_click_outside: false,
            priority: 0,
        }
    }
}

/// A form instance.
pub struct Form {
    kind: String,
    element: ElementState,
    options: FormOptions,
    parent: Option<FormId>,
    children: Vec<FormId>,
}

impl Form {
    /// The kind the form was created for.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The form's root node.
    pub fn node(&self) -> NodeId {
        self.element.node()
    }

    /// The form's options.
    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Whether the form is shown.
    pub fn is_visible(&self) -> bool {
        self.element.is_visible()
    }

    /// The parent form, for embedded forms.
    pub fn parent(&self) -> Option<FormId> {
        self.parent
    }

    /// Embedded child forms.
    pub fn children(&self) -> &[FormId] {
        &self.children
    }
}

/// Owns every form and the priority-ordered list of active ones.
pub struct FormStack {
    scene: Arc<dyn SceneGraph>,
    templates: Arc<dyn TemplateRegistry>,
    errors: Arc<dyn ErrorReporter>,
    root: NodeId,
    forms: SlotMap<FormId, Form>,
    active: Vec<FormId>,
    form_shown: Signal<FormId>,
    form_hidden: Signal<FormId>,
}

impl FormStack {
    /// Creates a stack whose top-level forms are instantiated under `root`.
    pub fn new(
        scene: Arc<dyn SceneGraph>,
        templates: Arc<dyn TemplateRegistry>,
        root: NodeId,
    ) -> Self {
        Self {
            scene,
            templates,
            errors: Arc::new(TracingReporter),
            root,
            forms: SlotMap::with_key(),
            active: Vec::new(),
            form_shown: Signal::new(),
            form_hidden: Signal::new(),
        }
    }

    /// Sets the reporter for failures during teardown.
    pub fn with_errors(mut self, errors: Arc<dyn ErrorReporter>) -> Self {
        self.errors = errors;
        self
    }

    /// Returns the active form of `kind`, creating one if there is none.
    ///
    /// A new form is instantiated under its parent form's node (or the stack
    /// root), becomes active and the stack is re-sorted. It is not shown
    /// until [`show`](Self::show) is called.
    pub fn create_form(
        &mut self,
        kind: &str,
        options: FormOptions,
        parent: Option<FormId>,
    ) -> Result<FormId> {
        if let Some(existing) = self.form_by_kind(kind) {
            return Ok(existing);
        }

        let template = self
            .templates
            .template(kind)
            .ok_or_else(|| Error::missing_template(kind))?;
        let parent_node = match parent {
            Some(parent) => self.forms.get(parent).ok_or(Error::NodeNotFound)?.node(),
            None => self.root,
        };
        let node = self.scene.instantiate(template, Some(parent_node))?;

        let id = self.forms.insert(Form {
            kind: kind.to_string(),
            element: ElementState::new(node),
            options,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent.and_then(|parent| self.forms.get_mut(parent)) {
            parent.children.push(id);
        }
        self.active.push(id);
        self.sort_forms();

        tracing::debug!(target: targets::FORM, kind, "form created");
        Ok(id)
    }

    /// Shows a form, making it active. Showing a core form hides the other
    /// core forms. Emits `form_shown`.
    pub fn show(&mut self, id: FormId) -> bool {
        let Some(form) = self.forms.get_mut(id) else {
            return false;
        };
        form.element.show(&*self.scene);
        let core = form.options.core;

        if core {
            self.hide_core_forms(Some(id));
        }
        if !self.active.contains(&id) {
            self.active.push(id);
        }
        self.form_shown.emit(id);
        true
    }

    /// Hides a form and its child forms, deactivating them. Forms with
    /// `destroy_on_hide` are destroyed afterwards. Emits `form_hidden`.
    pub fn hide(&mut self, id: FormId) -> bool {
        let Some(form) = self.forms.get_mut(id) else {
            return false;
        };
        form.element.hide(&*self.scene);
        let children = std::mem::take(&mut form.children);
        let destroy_on_hide = form.options.destroy_on_hide;

        for child in children {
            self.hide(child);
        }

        self.active.retain(|&active| active != id);
        self.sort_forms();
        self.form_hidden.emit(id);

        if destroy_on_hide {
            if let Err(error) = self.destroy(id) {
                self.errors.report(&error);
            }
        }
        true
    }

    /// Destroys a form, its child forms and their nodes.
    pub fn destroy(&mut self, id: FormId) -> Result<()> {
        let Some(mut form) = self.forms.remove(id) else {
            return Ok(());
        };
        self.active.retain(|&active| active != id);
        if let Some(parent) = form.parent.and_then(|parent| self.forms.get_mut(parent)) {
            parent.children.retain(|&child| child != id);
        }
        for child in std::mem::take(&mut form.children) {
            if let Err(error) = self.destroy(child) {
                self.errors.report(&error);
            }
        }

        if !form.element.mark_destroyed() {
            return Ok(());
        }
        tracing::debug!(target: targets::FORM, kind = %form.kind, "form destroyed");
        match self.scene.destroy(form.node()) {
            Err(Error::NodeNotFound) => Ok(()),
            result => result,
        }
    }

    /// Changes a form's priority and re-sorts the stack.
    pub fn set_priority(&mut self, id: FormId, priority: i32) {
        if let Some(form) = self.forms.get_mut(id) {
            form.options.priority = priority;
            self.sort_forms();
        }
    }

    /// Orders active forms by ascending priority and moves their nodes to
    /// the end of their sibling lists in that order.
    pub fn sort_forms(&mut self) {
        let forms = &self.forms;
        self.active.retain(|id| forms.contains_key(*id));
        self.active
            .sort_by_key(|id| forms.get(*id).map_or(0, |form| form.options.priority));
        for id in &self.active {
            if let Some(form) = self.forms.get(*id) {
                self.scene.set_sibling_index(form.node(), usize::MAX);
            }
        }
    }

    /// Hides every active core form except `except`.
    pub fn hide_core_forms(&mut self, except: Option<FormId>) {
        let core: Vec<FormId> = self
            .active
            .iter()
            .copied()
            .filter(|&id| Some(id) != except)
            .filter(|&id| self.forms.get(id).is_some_and(|form| form.options.core))
            .collect();
        for id in core {
            self.hide(id);
        }
    }

    /// Hides the top-most active form the user may close.
    pub fn hide_top_closable(&mut self) -> bool {
        let top = self
            .active
            .iter()
            .rev()
            .copied()
            .find(|&id| self.forms.get(id).is_some_and(|form| form.options.user_can_close));
        match top {
            Some(id) => self.hide(id),
            None => false,
        }
    }

    /// Handles a pointer press. Forms that hide on outside clicks are hidden
    /// unless `hit` is the form's node or lies below it.
    pub fn pointer_pressed(&mut self, hit: Option<NodeId>) {
        let outside: Vec<FormId> = self
            .active
            .iter()
            .copied()
            .filter(|&id| {
                self.forms.get(id).is_some_and(|form| {
                    form.options.hide_if_click_outside
                        && !hit.is_some_and(|hit| {
                            hit == form.node() || self.scene.is_descendant(hit, form.node())
                        })
                })
            })
            .collect();
        for id in outside {
            self.hide(id);
        }
    }

    /// A form by ID.
    pub fn form(&self, id: FormId) -> Option<&Form> {
        self.forms.get(id)
    }

    /// The active form of `kind`.
    pub fn form_by_kind(&self, kind: &str) -> Option<FormId> {
        self.active
            .iter()
            .copied()
            .find(|&id| self.forms.get(id).is_some_and(|form| form.kind == kind))
    }

    /// Active forms, lowest priority first.
    pub fn active_forms(&self) -> &[FormId] {
        &self.active
    }

    /// Emitted after a form is shown.
    pub fn form_shown(&self) -> &Signal<FormId> {
        &self.form_shown
    }

    /// Emitted after a form is hidden.
    pub fn form_hidden(&self) -> &Signal<FormId> {
        &self.form_hidden
    }
}
