//! In-memory document used by the CLI, benches and tests.
//!
//! Nodes live in an arena indexed by [`NodeId`]. Geometry is declared rather
//! than computed: each node carries its rendered box and `scrollHeight`, plus an
//! optional `wide_scroll_height` that stands in for reflow when the node is
//! styled `width: 100%` (text gets shorter when the column gets wider).
//!
//! Beyond the [`Dom`] contract it records scroll calls and live listeners and
//! supports fault injection, so tests can assert "no scroll happened" or "setup
//! left nothing behind".

use super::{
    BoundingBox, ComputedStyle, Dom, EventKind, ListenTarget, ListenerToken, NodeId, ReadyState,
};
use crate::model::DomError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;
const DEFAULT_NODE_WIDTH: f64 = 600.0;
const DEFAULT_NODE_HEIGHT: f64 = 20.0;

fn default_display() -> String {
    "block".to_string()
}

fn default_width() -> f64 {
    DEFAULT_NODE_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_NODE_HEIGHT
}

fn default_viewport_height() -> f64 {
    DEFAULT_VIEWPORT_HEIGHT
}

/// Declarative description of one element and its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeSpec {
    /// Tag name (case-insensitive).
    pub tag: String,

    /// `id` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Text owned directly by this element (before its children).
    #[serde(default)]
    pub text: String,

    /// Computed `display`.
    #[serde(default = "default_display")]
    pub display: String,

    /// Computed `visibility`; inherited from the parent when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    /// Rendered width in pixels.
    #[serde(default = "default_width")]
    pub width: f64,

    /// Rendered height in pixels.
    #[serde(default = "default_height")]
    pub height: f64,

    /// `scrollHeight`; defaults to `height`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_height: Option<f64>,

    /// `scrollHeight` once the node is styled `width: 100%`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wide_scroll_height: Option<f64>,

    /// Element children in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Visible element with default geometry and no text.
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            id: None,
            text: String::new(),
            display: default_display(),
            visibility: None,
            width: DEFAULT_NODE_WIDTH,
            height: DEFAULT_NODE_HEIGHT,
            scroll_height: None,
            wide_scroll_height: None,
            children: Vec::new(),
        }
    }

    /// Set the `id` attribute.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Set the directly owned text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the rendered box.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set `scrollHeight`.
    pub fn with_scroll_height(mut self, height: f64) -> Self {
        self.scroll_height = Some(height);
        self
    }

    /// Set `scrollHeight` for full-width styling.
    pub fn with_wide_scroll_height(mut self, height: f64) -> Self {
        self.wide_scroll_height = Some(height);
        self
    }

    /// Set computed `display`.
    pub fn with_display(mut self, display: &str) -> Self {
        self.display = display.to_string();
        self
    }

    /// Set computed `visibility`.
    pub fn with_visibility(mut self, visibility: &str) -> Self {
        self.visibility = Some(visibility.to_string());
        self
    }

    /// Append one child.
    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }
}

/// Declarative description of a whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentSpec {
    /// `window.innerHeight`.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,

    /// Initial `window.scrollY`.
    #[serde(default)]
    pub scroll_y: f64,

    /// `document.readyState`.
    #[serde(default)]
    pub ready_state: ReadyState,

    /// The `<body>` element; its `tag` is forced to `body`.
    pub body: NodeSpec,
}

impl DocumentSpec {
    /// Page with the given viewport and body children.
    pub fn new(viewport_height: f64, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        Self {
            viewport_height,
            scroll_y: 0.0,
            ready_state: ReadyState::Complete,
            body: NodeSpec::element("body").with_children(children),
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    display: String,
    visibility: Option<String>,
    width: f64,
    height: f64,
    scroll_height: Option<f64>,
    wide_scroll_height: Option<f64>,
    inline: BTreeMap<String, String>,
    checked: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    injected: bool,
    faulty: bool,
}

impl MemoryNode {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: String::new(),
            display: default_display(),
            visibility: None,
            width: 0.0,
            height: 0.0,
            scroll_height: None,
            wide_scroll_height: None,
            inline: BTreeMap::new(),
            checked: false,
            parent: None,
            children: Vec::new(),
            injected: false,
            faulty: false,
        }
    }
}

/// Arena-backed [`Dom`] implementation.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<MemoryNode>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    viewport_height: f64,
    scroll_y: f64,
    ready_state: ReadyState,
    listeners: BTreeMap<ListenerToken, (ListenTarget, EventKind)>,
    next_listener: u64,
    scroll_log: Vec<f64>,
    failing_tags: BTreeSet<String>,
    failing_listens: BTreeSet<EventKind>,
}

impl MemoryDom {
    /// Build a document from its description.
    pub fn new(spec: DocumentSpec) -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            root: NodeId::new(0),
            head: NodeId::new(0),
            body: NodeId::new(0),
            viewport_height: spec.viewport_height,
            scroll_y: spec.scroll_y,
            ready_state: spec.ready_state,
            listeners: BTreeMap::new(),
            next_listener: 1,
            scroll_log: Vec::new(),
            failing_tags: BTreeSet::new(),
            failing_listens: BTreeSet::new(),
        };

        let root = dom.push(MemoryNode::new("html"));
        let head = dom.push(MemoryNode::new("head"));
        dom.link(root, head);

        let mut body_spec = spec.body;
        body_spec.tag = "body".to_string();
        let body = dom.insert_spec(&body_spec);
        dom.link(root, body);

        dom.root = root;
        dom.head = head;
        dom.body = body;
        dom
    }

    /// Parse a [`DocumentSpec`] from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let spec: DocumentSpec = serde_json::from_str(json)?;
        Ok(Self::new(spec))
    }

    fn push(&mut self, node: MemoryNode) -> NodeId {
        self.nodes.push(node);
        NodeId::new(self.nodes.len() - 1)
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.get()].parent = Some(parent);
        self.nodes[parent.get()].children.push(child);
    }

    fn insert_spec(&mut self, spec: &NodeSpec) -> NodeId {
        let mut node = MemoryNode::new(&spec.tag);
        if let Some(id) = &spec.id {
            node.attributes.insert("id".to_string(), id.clone());
        }
        node.text = spec.text.clone();
        node.display = spec.display.clone();
        node.visibility = spec.visibility.clone();
        node.width = spec.width;
        node.height = spec.height;
        node.scroll_height = spec.scroll_height;
        node.wide_scroll_height = spec.wide_scroll_height;

        let id = self.push(node);
        for child in &spec.children {
            let child_id = self.insert_spec(child);
            self.link(id, child_id);
        }
        id
    }

    fn node(&self, id: NodeId) -> Result<&MemoryNode, DomError> {
        self.nodes.get(id.get()).ok_or(DomError::MissingNode(id))
    }

    fn queryable(&self, id: NodeId) -> Result<&MemoryNode, DomError> {
        let node = self.node(id)?;
        if node.faulty || !self.is_attached(id) {
            return Err(DomError::Detached(id));
        }
        Ok(node)
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.get()].parent.take() {
            self.nodes[parent.get()].children.retain(|&c| c != id);
        }
    }

    // ===== Test-facing controls =====

    /// Root `<html>` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` is reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root {
                return true;
            }
            current = self.nodes.get(node.get()).and_then(|n| n.parent);
        }
        false
    }

    /// Change `window.innerHeight` (the caller dispatches the resize event).
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Change `window.scrollY` without recording a scroll call.
    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Change `document.readyState`.
    pub fn set_ready_state(&mut self, state: ReadyState) {
        self.ready_state = state;
    }

    /// Change a node's `scrollHeight`.
    pub fn set_scroll_height(&mut self, id: NodeId, height: f64) {
        if let Some(node) = self.nodes.get_mut(id.get()) {
            node.scroll_height = Some(height);
        }
    }

    /// Every `scroll_to` target in call order.
    pub fn scroll_log(&self) -> &[f64] {
        &self.scroll_log
    }

    /// Forget recorded scroll calls.
    pub fn clear_scroll_log(&mut self) {
        self.scroll_log.clear();
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of registered listeners of `kind`.
    pub fn listener_count_of(&self, kind: EventKind) -> usize {
        self.listeners.values().filter(|(_, k)| *k == kind).count()
    }

    /// Created elements that are still attached to the document.
    pub fn injected_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId::new)
            .filter(|&id| self.nodes[id.get()].injected && self.is_attached(id))
            .collect()
    }

    /// Make style, geometry and text queries on `id` fail.
    pub fn fail_queries_on(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(id.get()) {
            node.faulty = true;
        }
    }

    /// Make `create_element(tag)` fail.
    pub fn fail_create(&mut self, tag: &str) {
        self.failing_tags.insert(tag.to_ascii_lowercase());
    }

    /// Make `listen(_, kind)` fail.
    pub fn fail_listen(&mut self, kind: EventKind) {
        self.failing_listens.insert(kind);
    }

    /// Attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes
            .get(id.get())
            .and_then(|n| n.attributes.get(name))
            .map(String::as_str)
    }

    /// Directly owned text.
    pub fn own_text(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id.get()).map(|n| n.text.as_str())
    }

    /// `checked` state of a checkbox.
    pub fn is_checked(&self, id: NodeId) -> bool {
        self.nodes.get(id.get()).is_some_and(|n| n.checked)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.get()];
        out.push_str(&node.text);
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    fn display_none_in_chain(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .any(|n| self.nodes[n.get()].display == "none")
    }
}

impl Dom for MemoryDom {
    fn body(&self) -> NodeId {
        self.body
    }

    fn head(&self) -> NodeId {
        self.head
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.get())
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.get()).and_then(|n| n.parent)
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.nodes
            .get(node.get())
            .map(|n| n.tag.clone())
            .unwrap_or_default()
    }

    fn computed_style(&self, node: NodeId) -> Result<ComputedStyle, DomError> {
        let memory = self.queryable(node)?;
        let visibility = std::iter::once(node)
            .chain(self.ancestors(node))
            .find_map(|n| self.nodes[n.get()].visibility.clone())
            .unwrap_or_else(|| "visible".to_string());
        Ok(ComputedStyle {
            display: memory.display.clone(),
            visibility,
        })
    }

    fn bounding_box(&self, node: NodeId) -> Result<BoundingBox, DomError> {
        let memory = self.queryable(node)?;
        if self.display_none_in_chain(node) {
            return Ok(BoundingBox::default());
        }
        Ok(BoundingBox {
            width: memory.width,
            height: memory.height,
        })
    }

    fn text_content(&self, node: NodeId) -> Result<String, DomError> {
        self.queryable(node)?;
        let mut text = String::new();
        self.collect_text(node, &mut text);
        Ok(text)
    }

    fn scroll_height(&self, node: NodeId) -> f64 {
        let Some(memory) = self.nodes.get(node.get()) else {
            return 0.0;
        };
        let wide = memory.inline.get("width").is_some_and(|w| w == "100%");
        match (wide, memory.wide_scroll_height) {
            (true, Some(height)) => height,
            _ => memory.scroll_height.unwrap_or(memory.height),
        }
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        (0..self.nodes.len()).map(NodeId::new).find(|&node| {
            self.nodes[node.get()].attributes.get("id").map(String::as_str) == Some(id)
                && self.is_attached(node)
        })
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        if self.failing_tags.contains(&tag.to_ascii_lowercase()) {
            return Err(DomError::CreateElement {
                tag: tag.to_string(),
                reason: "creation refused by document".to_string(),
            });
        }
        let mut node = MemoryNode::new(tag);
        node.injected = true;
        Ok(self.push(node))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let memory = self
            .nodes
            .get_mut(node.get())
            .ok_or(DomError::MissingNode(node))?;
        memory.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(memory) = self.nodes.get_mut(node.get()) {
            memory.text = text.to_string();
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str, _important: bool) {
        if let Some(memory) = self.nodes.get_mut(node.get()) {
            memory.inline.insert(property.to_string(), value.to_string());
        }
    }

    fn clear_style(&mut self, node: NodeId, property: &str) {
        if let Some(memory) = self.nodes.get_mut(node.get()) {
            memory.inline.remove(property);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(node.get())
            .and_then(|n| n.inline.get(property).cloned())
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(memory) = self.nodes.get_mut(node.get()) {
            memory.checked = checked;
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.node(parent)?;
        self.node(child)?;
        self.detach(child);
        self.link(parent, child);
        Ok(())
    }

    fn remove(&mut self, node: NodeId) {
        if node.get() < self.nodes.len() {
            self.detach(node);
        }
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
        self.scroll_log.push(y);
    }

    fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    fn listen(
        &mut self,
        target: ListenTarget,
        kind: EventKind,
    ) -> Result<ListenerToken, DomError> {
        if self.failing_listens.contains(&kind) {
            return Err(DomError::Listen {
                kind,
                reason: "listener refused by document".to_string(),
            });
        }
        if let ListenTarget::Node(node) = target {
            self.node(node)?;
        }
        let token = ListenerToken::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(token, (target, kind));
        Ok(token)
    }

    fn unlisten(&mut self, token: ListenerToken) {
        self.listeners.remove(&token);
    }
}
