//! Previous/next page buttons.

use super::constants::{
    self, NAV_BUTTON_BASE, NAV_CENTER_TOP, NAV_EDGE_OFFSET, NAV_STACKED_NEXT_TOP,
    NAV_STACKED_PREV_TOP, NEXT_LABEL, PREV_LABEL,
};
use crate::dom::{Dom, NodeId};
use crate::model::DomError;

/// Which button a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    /// Go back one page.
    Previous,
    /// Go forward one page.
    Next,
}

/// The injected button pair. Hiding only changes opacity and pointer events;
/// both nodes stay attached until [`NavigationButtons::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationButtons {
    previous: NodeId,
    next: NodeId,
}

impl NavigationButtons {
    /// Create both buttons under the body.
    ///
    /// On failure nothing created so far is left attached.
    pub fn build<D: Dom + ?Sized>(
        dom: &mut D,
        on_right: bool,
        visible: bool,
    ) -> Result<Self, DomError> {
        let previous = create_button(dom, PREV_LABEL)?;
        let next = match create_button(dom, NEXT_LABEL) {
            Ok(node) => node,
            Err(e) => {
                dom.remove(previous);
                return Err(e);
            }
        };

        let buttons = Self { previous, next };
        buttons.position(dom, on_right);
        buttons.set_visible(dom, visible);
        Ok(buttons)
    }

    /// Previous-page button.
    pub fn previous(&self) -> NodeId {
        self.previous
    }

    /// Next-page button.
    pub fn next(&self) -> NodeId {
        self.next
    }

    /// Role of `node`, if it is one of the buttons.
    pub fn role(&self, node: NodeId) -> Option<ButtonRole> {
        if node == self.previous {
            Some(ButtonRole::Previous)
        } else if node == self.next {
            Some(ButtonRole::Next)
        } else {
            None
        }
    }

    /// Place the buttons on opposite edges, or stacked on the right edge.
    pub fn position<D: Dom + ?Sized>(&self, dom: &mut D, on_right: bool) {
        if on_right {
            dom.set_style(self.previous, "left", "auto", false);
            dom.set_style(self.previous, "right", NAV_EDGE_OFFSET, false);
            dom.set_style(self.previous, "top", NAV_STACKED_PREV_TOP, false);
            dom.set_style(self.next, "right", NAV_EDGE_OFFSET, false);
            dom.set_style(self.next, "top", NAV_STACKED_NEXT_TOP, false);
        } else {
            dom.set_style(self.previous, "left", NAV_EDGE_OFFSET, false);
            dom.set_style(self.previous, "right", "auto", false);
            dom.set_style(self.previous, "top", NAV_CENTER_TOP, false);
            dom.set_style(self.next, "right", NAV_EDGE_OFFSET, false);
            dom.set_style(self.next, "top", NAV_CENTER_TOP, false);
        }
    }

    /// Show or hide both buttons.
    pub fn set_visible<D: Dom + ?Sized>(&self, dom: &mut D, visible: bool) {
        let (opacity, pointer_events) = if visible { ("1", "auto") } else { ("0", "none") };
        for node in [self.previous, self.next] {
            dom.set_style(node, "opacity", opacity, false);
            dom.set_style(node, "pointer-events", pointer_events, false);
        }
    }

    /// Detach both buttons.
    pub fn remove<D: Dom + ?Sized>(&self, dom: &mut D) {
        dom.remove(self.previous);
        dom.remove(self.next);
    }
}

fn create_button<D: Dom + ?Sized>(dom: &mut D, label: &str) -> Result<NodeId, DomError> {
    let button = dom.create_element("button")?;
    dom.set_text(button, label);
    constants::apply(dom, button, NAV_BUTTON_BASE, false);
    let body = dom.body();
    dom.append_child(body, button)?;
    Ok(button)
}
