//! Listener registry and the two engine-owned timers.
//!
//! Every listener the engine registers goes through [`EventCoordinator::register`]
//! and is remembered with its disposal token, so teardown is a walk over the
//! registry. The coordinator also owns the resize debounce and the auto-hide
//! timer: at most one of each is pending, and scheduling a new one cancels the
//! old one first.

use crate::config::KeyBindings;
use crate::dom::{Dom, EventKind, ListenTarget, ListenerToken, NodeId};
use crate::model::{DomError, KeyAction};
use crate::schedule::{Scheduler, TimerToken};
use std::time::Duration;
use tracing::debug;

/// Which engine-owned timer fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Resize settled; recompute pages.
    ResizeDebounce,
    /// Pointer went idle; hide the buttons again.
    AutoHide,
}

/// One registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    /// Object listened on.
    pub target: ListenTarget,
    /// Event kind.
    pub kind: EventKind,
    /// Disposal token.
    pub token: ListenerToken,
}

/// Owns listeners, debounce timers and key translation.
#[derive(Debug, Clone)]
pub struct EventCoordinator {
    registry: Vec<Registration>,
    resize_timer: Option<TimerToken>,
    auto_hide_timer: Option<TimerToken>,
    bindings: KeyBindings,
    resize_debounce: Duration,
    auto_hide_delay: Duration,
}

impl EventCoordinator {
    /// Coordinator with no listeners and no pending timers.
    pub fn new(bindings: KeyBindings, resize_debounce: Duration, auto_hide_delay: Duration) -> Self {
        Self {
            registry: Vec::new(),
            resize_timer: None,
            auto_hide_timer: None,
            bindings,
            resize_debounce,
            auto_hide_delay,
        }
    }

    /// Register one listener and remember it for teardown.
    pub fn register<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        target: ListenTarget,
        kind: EventKind,
    ) -> Result<ListenerToken, DomError> {
        let token = dom.listen(target, kind)?;
        self.registry.push(Registration {
            target,
            kind,
            token,
        });
        Ok(token)
    }

    /// Register the page-level listeners: resize, keydown, mousemove, unload.
    pub fn bind_page_listeners<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Result<(), DomError> {
        self.register(dom, ListenTarget::Window, EventKind::Resize)?;
        self.register(dom, ListenTarget::Document, EventKind::KeyDown)?;
        self.register(dom, ListenTarget::Document, EventKind::MouseMove)?;
        self.register(dom, ListenTarget::Window, EventKind::Unload)?;
        Ok(())
    }

    /// Drop every listener attached to `node` (used before removing it).
    pub fn release_target<D: Dom + ?Sized>(&mut self, dom: &mut D, node: NodeId) {
        self.registry.retain(|r| {
            if r.target == ListenTarget::Node(node) {
                dom.unlisten(r.token);
                false
            } else {
                true
            }
        });
    }

    /// Registered listeners of `kind`.
    pub fn registrations(&self, kind: EventKind) -> impl Iterator<Item = &Registration> {
        self.registry.iter().filter(move |r| r.kind == kind)
    }

    /// Restart the resize debounce.
    pub fn on_resize<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(previous) = self.resize_timer.take() {
            scheduler.cancel(previous);
        }
        self.resize_timer = Some(scheduler.schedule(self.resize_debounce));
    }

    /// React to pointer movement.
    ///
    /// Acts only while the buttons are hidden or were shown by an earlier
    /// movement; then (re)arms the auto-hide timer. Returns `true` when the
    /// caller should show the buttons.
    pub fn on_mousemove<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        buttons_visible: bool,
    ) -> bool {
        if buttons_visible && self.auto_hide_timer.is_none() {
            return false;
        }
        if let Some(previous) = self.auto_hide_timer.take() {
            scheduler.cancel(previous);
        }
        self.auto_hide_timer = Some(scheduler.schedule(self.auto_hide_delay));
        true
    }

    /// Forget a pending auto-hide (an explicit visibility change wins).
    pub fn cancel_auto_hide<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(token) = self.auto_hide_timer.take() {
            scheduler.cancel(token);
        }
    }

    /// Match a fired token against the owned timers, consuming it.
    ///
    /// Returns `None` for tokens this coordinator does not own.
    pub fn claim_timer(&mut self, token: TimerToken) -> Option<TimerKind> {
        if self.resize_timer == Some(token) {
            self.resize_timer = None;
            return Some(TimerKind::ResizeDebounce);
        }
        if self.auto_hide_timer == Some(token) {
            self.auto_hide_timer = None;
            return Some(TimerKind::AutoHide);
        }
        None
    }

    /// Translate a key value, applying the keyboard-control gate.
    pub fn translate_key(&self, key: &str, keyboard_enabled: bool) -> Option<KeyAction> {
        let action = self.bindings.get(key)?;
        if action.requires_keyboard() && !keyboard_enabled {
            debug!(key, "Keyboard control disabled; ignoring key");
            return None;
        }
        Some(action)
    }

    /// Remove every listener and cancel both timers. Safe to call repeatedly.
    pub fn dispose<D: Dom + ?Sized, S: Scheduler + ?Sized>(&mut self, dom: &mut D, scheduler: &mut S) {
        for registration in self.registry.drain(..) {
            dom.unlisten(registration.token);
        }
        for token in [self.resize_timer.take(), self.auto_hide_timer.take()]
            .into_iter()
            .flatten()
        {
            scheduler.cancel(token);
        }
    }

    /// Number of live listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of pending owned timers.
    pub fn pending_timer_count(&self) -> usize {
        usize::from(self.resize_timer.is_some()) + usize::from(self.auto_hide_timer.is_some())
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
