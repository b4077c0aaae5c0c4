//! Browser bindings (feature `web`).
//!
//! The engine does not hold JS closures. Listener and timer requests are
//! queued here and drained by a small JS glue layer, which calls back into
//! [`ReaderHandle::dispatch_event`] and [`ReaderHandle::fire_timer`]:
//!
//! ```js
//! const reader = new ReaderHandle(null, window.Android ?? null);
//! reader.install();
//! function pump() {
//!   for (const r of reader.drainListenerRequests()) { /* add/removeEventListener */ }
//!   for (const t of reader.drainTimerRequests()) { /* setTimeout/clearTimeout */ }
//! }
//! ```

#![forbid(unsafe_code)]

use super::Host;
use crate::config::{merge_config, validate, ConfigFile, ResolvedConfig};
use crate::dom::{
    BoundingBox, ComputedStyle, Dom, DomEvent, EventKind, ListenTarget, ListenerToken, NodeId,
    ReadyState,
};
use crate::model::DomError;
use crate::reader::Reader;
use crate::schedule::{Scheduler, TimerToken};
use js_sys::{Array, Function, Object, Reflect, WeakMap};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

fn event_type(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Resize => "resize",
        EventKind::KeyDown => "keydown",
        EventKind::MouseMove => "mousemove",
        EventKind::Click => "click",
        EventKind::Change => "change",
        EventKind::Unload => "pagehide",
    }
}

/// `document.readyState` as a [`ReadyState`]; unknown values count as complete.
fn parse_ready_state(state: &str) -> ReadyState {
    match state {
        "loading" => ReadyState::Loading,
        "interactive" => ReadyState::Interactive,
        _ => ReadyState::Complete,
    }
}

/// Document lifecycle signals the handle listens for before a reader exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleSignal {
    ReadyStateChange,
    Load,
    PageHide,
}

#[derive(Debug, Clone, Copy)]
enum ListenerRequest {
    Add(ListenerToken),
    Remove(ListenerToken),
}

/// [`Dom`] over the live `window.document`.
///
/// Elements are interned on first sight; a `WeakMap` keeps element → id
/// lookups O(1) without writing anything onto page nodes.
pub struct WebDom {
    window: Window,
    document: Document,
    elements: RefCell<Vec<Element>>,
    index: WeakMap,
    body: NodeId,
    head: NodeId,
    listeners: BTreeMap<ListenerToken, (ListenTarget, EventKind)>,
    lifecycle: BTreeMap<ListenerToken, LifecycleSignal>,
    requests: Vec<ListenerRequest>,
    next_listener: u64,
}

impl WebDom {
    /// Bind to the global window.
    ///
    /// # Errors
    ///
    /// Fails outside a browser or before `<body>` exists.
    pub fn new() -> Result<Self, DomError> {
        let window = web_sys::window().ok_or_else(|| DomError::Host("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| DomError::Host("no document".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| DomError::Host("document has no body".to_string()))?;
        let head = document
            .head()
            .ok_or_else(|| DomError::Host("document has no head".to_string()))?;

        let mut dom = Self {
            window,
            document,
            elements: RefCell::new(Vec::new()),
            index: WeakMap::new(),
            body: NodeId::new(0),
            head: NodeId::new(0),
            listeners: BTreeMap::new(),
            lifecycle: BTreeMap::new(),
            requests: Vec::new(),
            next_listener: 1,
        };
        dom.body = dom.intern(body.into());
        dom.head = dom.intern(head.into());
        Ok(dom)
    }

    fn intern(&self, element: Element) -> NodeId {
        let key: &Object = element.unchecked_ref();
        if let Some(index) = self.index.get(key).as_f64() {
            return NodeId::new(index as usize);
        }
        let mut elements = self.elements.borrow_mut();
        let id = NodeId::new(elements.len());
        self.index.set(key, &JsValue::from_f64(id.get() as f64));
        elements.push(element);
        id
    }

    fn element(&self, node: NodeId) -> Result<Element, DomError> {
        self.elements
            .borrow()
            .get(node.get())
            .cloned()
            .ok_or(DomError::MissingNode(node))
    }

    fn connected(&self, node: NodeId) -> Result<Element, DomError> {
        let element = self.element(node)?;
        if element.is_connected() {
            Ok(element)
        } else {
            Err(DomError::Detached(node))
        }
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.element(node).ok()?.dyn_into::<HtmlElement>().ok()
    }

    /// Target and kind behind a listener token.
    pub fn registration(&self, token: ListenerToken) -> Option<(ListenTarget, EventKind)> {
        self.listeners.get(&token).copied()
    }

    /// Whether the checkbox `node` is checked.
    pub fn is_checked(&self, node: NodeId) -> bool {
        self.element(node)
            .ok()
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .is_some_and(|input| input.checked())
    }

    /// Forget every interned element except `<body>` and `<head>`, so page
    /// nodes the locator walked can be collected.
    fn release_elements(&mut self) {
        let body = self.element(self.body).ok();
        let head = self.element(self.head).ok();
        self.elements.borrow_mut().clear();
        self.index = WeakMap::new();
        if let Some(body) = body {
            self.body = self.intern(body);
        }
        if let Some(head) = head {
            self.head = self.intern(head);
        }
    }

    /// Number of elements currently interned.
    pub fn interned_count(&self) -> usize {
        self.elements.borrow().len()
    }

    fn next_token(&mut self) -> ListenerToken {
        let token = ListenerToken::new(self.next_listener);
        self.next_listener += 1;
        token
    }

    fn listen_lifecycle(&mut self, signal: LifecycleSignal) -> ListenerToken {
        let token = self.next_token();
        self.lifecycle.insert(token, signal);
        self.requests.push(ListenerRequest::Add(token));
        token
    }

    fn lifecycle_signal(&self, token: ListenerToken) -> Option<LifecycleSignal> {
        self.lifecycle.get(&token).copied()
    }

    fn unlisten_lifecycle(&mut self) {
        let tokens: Vec<_> = std::mem::take(&mut self.lifecycle).into_keys().collect();
        self.requests
            .extend(tokens.into_iter().map(ListenerRequest::Remove));
    }

    fn request_target(&self, token: ListenerToken) -> Option<(JsValue, &'static str)> {
        if let Some(signal) = self.lifecycle_signal(token) {
            return Some(match signal {
                LifecycleSignal::ReadyStateChange => {
                    (self.document.clone().into(), "readystatechange")
                }
                LifecycleSignal::Load => (self.window.clone().into(), "load"),
                LifecycleSignal::PageHide => (self.window.clone().into(), "pagehide"),
            });
        }
        let &(target, kind) = self.listeners.get(&token)?;
        let target: JsValue = match target {
            ListenTarget::Window => self.window.clone().into(),
            ListenTarget::Document => self.document.clone().into(),
            ListenTarget::Node(node) => self.element(node).ok()?.into(),
        };
        Some((target, event_type(kind)))
    }

    fn drain_requests(&mut self) -> Array {
        let out = Array::new();
        let requests: Vec<_> = self.requests.drain(..).collect();
        for request in requests {
            let obj = Object::new();
            let (op, token) = match request {
                ListenerRequest::Add(token) => ("add", token),
                ListenerRequest::Remove(token) => ("remove", token),
            };
            let _ = Reflect::set(&obj, &"op".into(), &op.into());
            let _ = Reflect::set(&obj, &"id".into(), &JsValue::from_f64(token.get() as f64));
            if let ListenerRequest::Add(_) = request {
                let Some((target, event)) = self.request_target(token) else {
                    continue;
                };
                let _ = Reflect::set(&obj, &"target".into(), &target);
                let _ = Reflect::set(&obj, &"type".into(), &event.into());
            }
            out.push(&obj);
        }
        out
    }
}

impl Dom for WebDom {
    fn body(&self) -> NodeId {
        self.body
    }

    fn head(&self) -> NodeId {
        self.head
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        let Ok(element) = self.element(node) else {
            return Vec::new();
        };
        let children = element.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .map(|child| self.intern(child))
            .collect()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.element(node).ok()?.parent_element()?;
        Some(self.intern(parent))
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.element(node)
            .map(|e| e.tag_name().to_ascii_lowercase())
            .unwrap_or_default()
    }

    fn computed_style(&self, node: NodeId) -> Result<ComputedStyle, DomError> {
        let element = self.connected(node)?;
        let style = self
            .window
            .get_computed_style(&element)
            .map_err(|e| DomError::Host(js_error(e)))?
            .ok_or(DomError::Detached(node))?;
        let read = |property: &str| {
            style
                .get_property_value(property)
                .map_err(|e| DomError::Host(js_error(e)))
        };
        Ok(ComputedStyle {
            display: read("display")?,
            visibility: read("visibility")?,
        })
    }

    fn bounding_box(&self, node: NodeId) -> Result<BoundingBox, DomError> {
        let rect = self.connected(node)?.get_bounding_client_rect();
        Ok(BoundingBox {
            width: rect.width(),
            height: rect.height(),
        })
    }

    fn text_content(&self, node: NodeId) -> Result<String, DomError> {
        Ok(self.connected(node)?.text_content().unwrap_or_default())
    }

    fn scroll_height(&self, node: NodeId) -> f64 {
        self.element(node)
            .map(|e| f64::from(e.scroll_height()))
            .unwrap_or(0.0)
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let element = self.document.get_element_by_id(id)?;
        Some(self.intern(element))
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        let element = self
            .document
            .create_element(tag)
            .map_err(|e| DomError::CreateElement {
                tag: tag.to_string(),
                reason: js_error(e),
            })?;
        Ok(self.intern(element))
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element(node)?
            .set_attribute(name, value)
            .map_err(|e| DomError::Host(js_error(e)))
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Ok(element) = self.element(node) {
            element.set_text_content(Some(text));
        }
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str, important: bool) {
        let Some(element) = self.html(node) else {
            return;
        };
        let priority = if important { "important" } else { "" };
        if let Err(e) = element
            .style()
            .set_property_with_priority(property, value, priority)
        {
            warn!(%node, property, error = %js_error(e), "Failed to set style");
        }
    }

    fn clear_style(&mut self, node: NodeId, property: &str) {
        if let Some(element) = self.html(node) {
            let _ = element.style().remove_property(property);
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        let value = self.html(node)?.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn set_checked(&mut self, node: NodeId, checked: bool) {
        if let Some(input) = self
            .element(node)
            .ok()
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_checked(checked);
        }
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let child = self.element(child)?;
        self.element(parent)?
            .append_child(&child)
            .map(|_| ())
            .map_err(|e| DomError::Host(js_error(e)))
    }

    fn remove(&mut self, node: NodeId) {
        if let Ok(element) = self.element(node) {
            element.remove();
        }
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn scroll_to(&mut self, y: f64) {
        self.window.scroll_to_with_x_and_y(0.0, y);
    }

    fn ready_state(&self) -> ReadyState {
        parse_ready_state(&self.document.ready_state())
    }

    fn listen(
        &mut self,
        target: ListenTarget,
        kind: EventKind,
    ) -> Result<ListenerToken, DomError> {
        if let ListenTarget::Node(node) = target {
            self.element(node)?;
        }
        let token = self.next_token();
        self.listeners.insert(token, (target, kind));
        self.requests.push(ListenerRequest::Add(token));
        Ok(token)
    }

    fn unlisten(&mut self, token: ListenerToken) {
        if self.listeners.remove(&token).is_some() {
            self.requests.push(ListenerRequest::Remove(token));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerRequest {
    Set(TimerToken, Duration),
    Clear(TimerToken),
}

/// [`Scheduler`] whose timers are armed by the JS glue with `setTimeout`.
#[derive(Debug, Default)]
pub struct WebScheduler {
    next_token: u64,
    requests: Vec<TimerRequest>,
}

impl WebScheduler {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn drain_requests(&mut self) -> Array {
        let out = Array::new();
        for request in self.requests.drain(..) {
            let obj = Object::new();
            let (op, token) = match request {
                TimerRequest::Set(token, delay) => {
                    let _ = Reflect::set(
                        &obj,
                        &"delayMs".into(),
                        &JsValue::from_f64(delay.as_millis() as f64),
                    );
                    ("set", token)
                }
                TimerRequest::Clear(token) => ("clear", token),
            };
            let _ = Reflect::set(&obj, &"op".into(), &op.into());
            let _ = Reflect::set(&obj, &"id".into(), &JsValue::from_f64(token.get() as f64));
            out.push(&obj);
        }
        out
    }
}

impl Scheduler for WebScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken::new(self.next_token);
        self.requests.push(TimerRequest::Set(token, delay));
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.requests.push(TimerRequest::Clear(token));
    }
}

/// Host object exposing optional `showToast(msg)` and `getScreenMetrics()`.
struct JsHost {
    object: JsValue,
}

impl JsHost {
    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.object, &name.into())
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }
}

impl Host for JsHost {
    fn toast(&self, message: &str) {
        if let Some(show) = self.method("showToast") {
            if let Err(e) = show.call1(&self.object, &message.into()) {
                warn!(error = %js_error(e), "Host toast failed");
            }
        }
    }

    fn screen_metrics(&self) -> Option<String> {
        self.method("getScreenMetrics")?
            .call0(&self.object)
            .ok()?
            .as_string()
    }
}

fn config_from_json(json: Option<String>) -> Result<ResolvedConfig, JsValue> {
    let file = match json {
        Some(json) => Some(
            serde_json::from_str::<ConfigFile>(&json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?,
        ),
        None => None,
    };
    validate(merge_config(file)).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Reader bound to the current page, callable from JS and from the native shell.
#[wasm_bindgen]
pub struct ReaderHandle {
    reader: Reader<WebDom, WebScheduler>,
    installed: bool,
}

#[wasm_bindgen]
impl ReaderHandle {
    /// `config` is optional JSON using the config-file keys; `host` is the
    /// native bridge object, if any.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>, host: Option<JsValue>) -> Result<ReaderHandle, JsValue> {
        let config = config_from_json(config)?;
        let dom = WebDom::new().map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut reader = Reader::new(dom, WebScheduler::new(), config);
        if let Some(object) = host.filter(|h| !h.is_null() && !h.is_undefined()) {
            reader = reader.with_host(Box::new(JsHost { object }));
        }
        Ok(Self {
            reader,
            installed: false,
        })
    }

    /// Wire `readystatechange`, `load` and `pagehide`, then initialize right
    /// away if the document is already past loading. Safe to call twice.
    pub fn install(&mut self) {
        if !self.installed {
            self.installed = true;
            let dom = self.reader.dom_mut();
            dom.listen_lifecycle(LifecycleSignal::ReadyStateChange);
            dom.listen_lifecycle(LifecycleSignal::Load);
            dom.listen_lifecycle(LifecycleSignal::PageHide);
        }
        self.on_ready_state_change();
    }

    /// Call on `readystatechange` and once at startup.
    #[wasm_bindgen(js_name = onReadyStateChange)]
    pub fn on_ready_state_change(&mut self) {
        let state = self.reader.dom().ready_state();
        self.reader.on_ready_state(state);
    }

    /// Call on `window` `load`.
    #[wasm_bindgen(js_name = onLoad)]
    pub fn on_load(&mut self) {
        self.reader.on_load();
    }

    /// Go back one page.
    #[wasm_bindgen(js_name = previousPage)]
    pub fn previous_page(&mut self) {
        self.reader.previous_page();
    }

    /// Go forward one page.
    #[wasm_bindgen(js_name = nextPage)]
    pub fn next_page(&mut self) {
        self.reader.next_page();
    }

    /// Flip e-ink mode; returns whether it is now on.
    #[wasm_bindgen(js_name = toggleEinkMode)]
    pub fn toggle_eink_mode(&mut self) -> bool {
        self.reader.toggle_eink_mode()
    }

    /// Forward a DOM event received by listener `id`.
    #[wasm_bindgen(js_name = dispatchEvent)]
    pub fn dispatch_event(&mut self, id: f64, event: &web_sys::Event) {
        let token = ListenerToken::new(id as u64);
        if let Some(signal) = self.reader.dom().lifecycle_signal(token) {
            match signal {
                LifecycleSignal::ReadyStateChange => self.on_ready_state_change(),
                LifecycleSignal::Load => self.on_load(),
                LifecycleSignal::PageHide => self.cleanup(),
            }
            return;
        }
        let Some((target, kind)) = self.reader.dom().registration(token) else {
            return;
        };
        let dom_event = match (kind, target) {
            (EventKind::Resize, _) => DomEvent::Resize,
            (EventKind::MouseMove, _) => DomEvent::MouseMove,
            (EventKind::Unload, _) => DomEvent::Unload,
            (EventKind::KeyDown, _) => match event.dyn_ref::<web_sys::KeyboardEvent>() {
                Some(key_event) => DomEvent::KeyDown {
                    key: key_event.key(),
                },
                None => return,
            },
            (EventKind::Click, ListenTarget::Node(node)) => DomEvent::Click { target: node },
            (EventKind::Change, ListenTarget::Node(node)) => DomEvent::Change {
                target: node,
                checked: self.reader.dom().is_checked(node),
            },
            (EventKind::Click | EventKind::Change, _) => return,
        };
        self.reader.handle_event(dom_event);
    }

    /// Run the callback for timer `id` after its `setTimeout` fired.
    #[wasm_bindgen(js_name = fireTimer)]
    pub fn fire_timer(&mut self, id: f64) {
        self.reader.handle_timer(TimerToken::new(id as u64));
    }

    /// Pending `{op: "add"|"remove", id, target?, type?}` listener changes.
    #[wasm_bindgen(js_name = drainListenerRequests)]
    pub fn drain_listener_requests(&mut self) -> Array {
        self.reader.dom_mut().drain_requests()
    }

    /// Pending `{op: "set"|"clear", id, delayMs?}` timer changes.
    #[wasm_bindgen(js_name = drainTimerRequests)]
    pub fn drain_timer_requests(&mut self) -> Array {
        self.reader.scheduler_mut().drain_requests()
    }

    /// Tear everything down, lifecycle listeners included.
    pub fn cleanup(&mut self) {
        self.reader.cleanup();
        let dom = self.reader.dom_mut();
        dom.unlisten_lifecycle();
        dom.release_elements();
    }

    /// Whether the reader is set up and responding to input.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.reader.is_active()
    }

    /// 0-based current page, while active.
    #[wasm_bindgen(js_name = currentPage)]
    pub fn current_page(&self) -> Option<u32> {
        let state = self.reader.page_state()?;
        u32::try_from(state.current_page()).ok()
    }

    /// Page count, while active.
    #[wasm_bindgen(js_name = totalPages)]
    pub fn total_pages(&self) -> Option<u32> {
        let state = self.reader.page_state()?;
        u32::try_from(state.total_pages()).ok()
    }

    /// Elements the page adapter still references.
    #[wasm_bindgen(js_name = internedElements)]
    pub fn interned_elements(&self) -> u32 {
        u32::try_from(self.reader.dom().interned_count()).unwrap_or(u32::MAX)
    }
}
