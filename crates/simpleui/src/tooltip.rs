//! Hover tooltips.
//!
//! A [`TooltipTarget`] is the per-node hover state machine: the host feeds
//! it pointer enter/exit events and frame ticks, and it answers with
//! [`TooltipAction`]s. A [`TooltipController`] owns the single tooltip
//! container, instantiates content for the current target and binds the
//! target's data to it.

use std::time::Duration;

use simpleui_core::logging::targets;
use simpleui_core::{Result, Signal};

use crate::config::{ItemConfig, TooltipConfig};
use crate::context::UiContext;
use crate::scene::NodeId;
use crate::view::{ItemView, Model};

/// What a target asks the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipAction {
    Show,
    Hide,
}

/// Hover state for one node that has a tooltip.
#[derive(Debug, Clone)]
pub struct TooltipTarget {
    node: NodeId,
    delay: Duration,
    elapsed: Duration,
    timing: bool,
    hovering: bool,
    lock_open: bool,
    active: bool,
}

impl TooltipTarget {
    /// Creates a target that asks for its tooltip after hovering for `delay`.
    pub fn new(node: NodeId, delay: Duration) -> Self {
        Self {
            node,
            delay,
            elapsed: Duration::ZERO,
            timing: false,
            hovering: false,
            lock_open: false,
            active: true,
        }
    }

    /// Creates a target using the configured show delay.
    pub fn from_config(node: NodeId, config: &TooltipConfig) -> Self {
        Self::new(node, config.show_delay())
    }

    /// The target node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The pointer entered the node. Starts the show timer unless locked.
    pub fn pointer_enter(&mut self) {
        self.hovering = true;
        if !self.lock_open {
            self.timing = true;
            self.elapsed = Duration::ZERO;
        }
    }

    /// The pointer left the node. Asks for the tooltip to hide unless locked.
    pub fn pointer_exit(&mut self) -> Option<TooltipAction> {
        self.hovering = false;
        if self.lock_open {
            return None;
        }
        self.timing = false;
        self.elapsed = Duration::ZERO;
        Some(TooltipAction::Hide)
    }

    /// Advances the show timer by `dt`.
    ///
    /// Returns [`TooltipAction::Show`] once the pointer has hovered for the
    /// configured delay. Inactive or locked targets never time out.
    pub fn tick(&mut self, dt: Duration) -> Option<TooltipAction> {
        if !self.active || !self.timing || self.lock_open {
            return None;
        }
        self.elapsed += dt;
        if self.elapsed < self.delay {
            return None;
        }
        self.timing = false;
        self.elapsed = Duration::ZERO;
        Some(TooltipAction::Show)
    }

    /// Keeps the tooltip open regardless of pointer movement.
    pub fn set_lock_open(&mut self, lock_open: bool) {
        self.lock_open = lock_open;
    }

    /// Enables or disables the show timer.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the pointer is over the node.
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Whether the tooltip is locked open.
    pub fn is_lock_open(&self) -> bool {
        self.lock_open
    }
}

/// Owns the tooltip container and its content.
pub struct TooltipController<T: Model> {
    ctx: UiContext<T>,
    container: NodeId,
    kind: String,
    config: TooltipConfig,
    current: Option<NodeId>,
    content: Option<ItemView<T>>,
    tooltip_shown: Signal<NodeId>,
    tooltip_hidden: Signal<NodeId>,
}

impl<T: Model> TooltipController<T> {
    /// Creates a controller that instantiates `kind` under `container`.
    ///
    /// The container is hidden until a tooltip is shown.
    pub fn new(
        ctx: UiContext<T>,
        container: NodeId,
        kind: impl Into<String>,
        config: TooltipConfig,
    ) -> Self {
        ctx.scene.set_visible(container, false);
        Self {
            ctx,
            container,
            kind: kind.into(),
            config,
            current: None,
            content: None,
            tooltip_shown: Signal::new(),
            tooltip_hidden: Signal::new(),
        }
    }

    /// Shows a tooltip for `target` displaying `data`.
    ///
    /// Replaces any tooltip already shown. On error nothing is shown.
    pub fn show(&mut self, target: NodeId, data: T) -> Result<()> {
        self.hide();

        let mut content = ItemView::instantiate(
            self.ctx.clone(),
            &self.kind,
            Some(self.container),
            &ItemConfig::default(),
        )?;
        content.set_data(Some(data), false);

        self.ctx.scene.set_visible(self.container, true);
        self.ctx.scene.set_sibling_index(self.container, usize::MAX);
        self.content = Some(content);
        self.current = Some(target);

        tracing::trace!(target: targets::TOOLTIP, ?target, "tooltip shown");
        self.tooltip_shown.emit(target);
        Ok(())
    }

    /// Shows a tooltip for an item view's node and data. Returns `Ok(false)`
    /// when the view has no data.
    pub fn show_for_view(&mut self, view: &ItemView<T>) -> Result<bool> {
        let Some(data) = view.data().cloned() else {
            return Ok(false);
        };
        self.show(view.node(), data)?;
        Ok(true)
    }

    /// Applies an action reported by a [`TooltipTarget`].
    pub fn apply(&mut self, target: &TooltipTarget, action: TooltipAction, data: T) -> Result<()> {
        match action {
            TooltipAction::Show => self.show(target.node(), data),
            TooltipAction::Hide => {
                self.hide_for(target.node());
                Ok(())
            }
        }
    }

    /// Hides the tooltip and destroys its content.
    pub fn hide(&mut self) {
        if let Some(mut content) = self.content.take() {
            if let Err(error) = content.destroy() {
                self.ctx.errors.report(&error);
            }
        }
        self.ctx.scene.set_visible(self.container, false);
        if let Some(target) = self.current.take() {
            tracing::trace!(target: targets::TOOLTIP, ?target, "tooltip hidden");
            self.tooltip_hidden.emit(target);
        }
    }

    /// Hides the tooltip only if it belongs to `target`.
    pub fn hide_for(&mut self, target: NodeId) -> bool {
        if self.current != Some(target) {
            return false;
        }
        self.hide();
        true
    }

    /// The target whose tooltip is shown.
    pub fn current_target(&self) -> Option<NodeId> {
        self.current
    }

    /// The content view of the shown tooltip.
    pub fn content(&self) -> Option<&ItemView<T>> {
        self.content.as_ref()
    }

    /// Offset of the content from the pointer. The content flips to the
    /// other side once the pointer crosses the horizontal center.
    pub fn content_offset(&self, pointer_x: f32) -> (f32, f32) {
        if pointer_x > 0.0 {
            (-self.config.offset_x, -self.config.offset_y)
        } else {
            (self.config.offset_x, self.config.offset_y)
        }
    }

    /// Emitted after a tooltip is shown, with its target.
    pub fn tooltip_shown(&self) -> &Signal<NodeId> {
        &self.tooltip_shown
    }

    /// Emitted after a tooltip is hidden, with its former target.
    pub fn tooltip_hidden(&self) -> &Signal<NodeId> {
        &self.tooltip_hidden
    }
}
