//! Capability interface over the hosting page.
//!
//! The engine never touches a browser API directly. Everything it needs from
//! the page (tree shape, computed style, geometry, text, inline style writes,
//! scrolling and listener registration) goes through [`Dom`], so content
//! location and pagination run unchanged against [`memory::MemoryDom`] in tests
//! and against the real document behind the `web` feature.

pub mod memory;

pub use memory::{DocumentSpec, MemoryDom, NodeSpec};

use crate::model::DomError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to an element owned by the page.
///
/// The engine only ever styles the nodes it did not create; it never detaches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Wrap a raw arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub fn get(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The subset of computed style the content locator inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputedStyle {
    /// Computed `display` value.
    pub display: String,
    /// Computed `visibility` value.
    pub visibility: String,
}

impl ComputedStyle {
    /// `display: none` or `visibility: hidden`.
    pub fn is_hidden(&self) -> bool {
        self.display == "none" || self.visibility == "hidden"
    }
}

/// Rendered box size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundingBox {
    /// Rendered width.
    pub width: f64,
    /// Rendered height.
    pub height: f64,
}

impl BoundingBox {
    /// Zero rendered width or height.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    /// Still parsing.
    Loading,
    /// Parsed; sub-resources may still be loading.
    Interactive,
    /// Fully loaded.
    #[default]
    Complete,
}

/// Object a listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenTarget {
    /// `window`
    Window,
    /// `document`
    Document,
    /// An element.
    Node(NodeId),
}

/// Kinds of events the engine subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    /// Viewport resized.
    Resize,
    /// Key pressed.
    KeyDown,
    /// Pointer moved.
    MouseMove,
    /// Element clicked.
    Click,
    /// Checkbox changed.
    Change,
    /// Page about to be discarded.
    Unload,
}

/// Disposal handle returned by [`Dom::listen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerToken(u64);

impl ListenerToken {
    /// Wrap a raw token value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw token value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Event delivered from the page to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum DomEvent {
    /// Viewport resized.
    Resize,
    /// Key pressed; `key` is `KeyboardEvent.key`.
    KeyDown {
        /// Key value, e.g. `"ArrowLeft"` or `"h"`.
        key: String,
    },
    /// Pointer moved anywhere in the document.
    MouseMove,
    /// An element the engine listens on was clicked.
    Click {
        /// Clicked element.
        target: NodeId,
    },
    /// A checkbox the engine listens on changed.
    Change {
        /// Changed checkbox.
        target: NodeId,
        /// New checked state.
        checked: bool,
    },
    /// Page is about to be discarded.
    Unload,
}

/// Narrow capability interface over a live document.
///
/// Read queries on arbitrary page nodes may fail (detached or exotic nodes);
/// callers treat a failure as "this candidate is invalid". Writes that create
/// or register something are fallible so the setup sequence can roll back.
pub trait Dom {
    /// `document.body`
    fn body(&self) -> NodeId;

    /// `document.head`
    fn head(&self) -> NodeId;

    /// Element children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Parent element, `None` for the document root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Lowercase tag name.
    fn tag_name(&self, node: NodeId) -> String;

    /// Computed display and visibility.
    fn computed_style(&self, node: NodeId) -> Result<ComputedStyle, DomError>;

    /// Rendered box size.
    fn bounding_box(&self, node: NodeId) -> Result<BoundingBox, DomError>;

    /// `textContent` (untrimmed).
    fn text_content(&self, node: NodeId) -> Result<String, DomError>;

    /// `scrollHeight` of the node.
    fn scroll_height(&self, node: NodeId) -> f64;

    /// Attached element with the given `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError>;

    /// Set an attribute.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError>;

    /// Replace the text content.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Set one inline style property, optionally `!important`.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str, important: bool);

    /// Remove one inline style property, restoring the stylesheet default.
    fn clear_style(&mut self, node: NodeId, property: &str);

    /// Read one inline style property.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    /// Set the `checked` state of a checkbox input.
    fn set_checked(&mut self, node: NodeId, checked: bool);

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError>;

    /// Detach `node` from the document. Removing a detached node is a no-op.
    fn remove(&mut self, node: NodeId);

    /// `window.innerHeight`
    fn viewport_height(&self) -> f64;

    /// `window.scrollY`
    fn scroll_y(&self) -> f64;

    /// Scroll the window to `y` immediately (no smooth animation).
    fn scroll_to(&mut self, y: f64);

    /// `document.readyState`
    fn ready_state(&self) -> ReadyState;

    /// Register a listener. Delivered events arrive as [`DomEvent`]s.
    fn listen(&mut self, target: ListenTarget, kind: EventKind)
        -> Result<ListenerToken, DomError>;

    /// Remove a listener. Unknown tokens are ignored.
    fn unlisten(&mut self, token: ListenerToken);

    /// Ancestors from the parent up to the document root.
    fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(node);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain
    }

    /// Nearest of `node` and its ancestors whose tag is one of `tags`.
    fn closest_tag(&self, node: NodeId, tags: &[&str]) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&n| tags.contains(&self.tag_name(n).as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computed_style_hidden_by_display_none() {
        let style = ComputedStyle {
            display: "none".to_string(),
            visibility: "visible".to_string(),
        };
        assert!(style.is_hidden());
    }

    #[test]
    fn computed_style_hidden_by_visibility() {
        let style = ComputedStyle {
            display: "block".to_string(),
            visibility: "hidden".to_string(),
        };
        assert!(style.is_hidden());
    }

    #[test]
    fn bounding_box_zero_width_is_empty() {
        assert!(BoundingBox {
            width: 0.0,
            height: 10.0
        }
        .is_empty());
        assert!(!BoundingBox {
            width: 1.0,
            height: 1.0
        }
        .is_empty());
    }

    #[test]
    fn node_id_displays_with_hash() {
        assert_eq!(NodeId::new(3).to_string(), "#3");
    }
}
