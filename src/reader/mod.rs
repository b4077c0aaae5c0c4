//! Reader lifecycle and event dispatch.
//!
//! A [`Reader`] owns the page capabilities and, once initialized, one
//! [`session::Session`] holding every piece of per-page state. The host page
//! forwards document readiness, DOM events and fired timers; the reader routes
//! them to the right component.
//!
//! ```text
//! Pending ──initialize ok──▶ Active ──unload / cleanup──▶ Disposed
//!    │                         ▲
//!    └──initialize err──▶ Failed ──load (retry)──┘
//! ```

mod session;

pub use session::PageTurn;

use crate::config::ResolvedConfig;
use crate::content::ContentRegion;
use crate::dom::{Dom, DomEvent, NodeId, ReadyState};
use crate::host::Host;
use crate::model::{InitError, Notice, PageState, PreferenceToggle, UiPreferences};
use crate::schedule::{Scheduler, TimerToken};
use crate::view::ButtonRole;
use serde::Serialize;
use session::{Env, Session};
use tracing::{debug, info, warn};

/// Coarse lifecycle phase, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Waiting for the document to become ready.
    Pending,
    /// Controls mounted and listening.
    Active,
    /// Setup failed and was rolled back.
    Failed,
    /// Torn down; inert for good.
    Disposed,
}

#[derive(Debug)]
enum Lifecycle {
    Pending,
    Active(Box<Session>),
    Failed(InitError),
    Disposed,
}

/// Paginated reader bound to one page.
pub struct Reader<D: Dom, S: Scheduler> {
    dom: D,
    scheduler: S,
    host: Option<Box<dyn Host>>,
    config: ResolvedConfig,
    lifecycle: Lifecycle,
}

impl<D: Dom, S: Scheduler> Reader<D, S> {
    /// Create an uninitialized reader. Nothing touches the page until
    /// [`Reader::initialize`] runs.
    pub fn new(dom: D, scheduler: S, config: ResolvedConfig) -> Self {
        Self {
            dom,
            scheduler,
            host: None,
            config,
            lifecycle: Lifecycle::Pending,
        }
    }

    /// Attach the native shell's services.
    pub fn with_host(mut self, host: Box<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    /// Split borrows so a session can act on the page services it doesn't own.
    fn active_parts(&mut self) -> Option<(&mut Session, Env<'_, D, S>)> {
        let Lifecycle::Active(session) = &mut self.lifecycle else {
            return None;
        };
        Some((
            session.as_mut(),
            Env {
                dom: &mut self.dom,
                scheduler: &mut self.scheduler,
                host: self.host.as_deref(),
            },
        ))
    }

    fn session(&self) -> Option<&Session> {
        match &self.lifecycle {
            Lifecycle::Active(session) => Some(&**session),
            _ => None,
        }
    }

    /// React to a document readiness report: initialize unless still loading.
    pub fn on_ready_state(&mut self, state: ReadyState) {
        if state == ReadyState::Loading {
            debug!("Document still loading; deferring initialization");
            return;
        }
        self.initialize();
    }

    /// Full page load. Retries setup if the earlier attempt did not complete.
    pub fn on_load(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Pending | Lifecycle::Failed(_)) {
            self.initialize();
        }
    }

    /// One-time setup. A no-op once active or disposed.
    ///
    /// On failure everything created during the attempt is released, the
    /// error is logged, and the reader stays inert until a later retry.
    pub fn initialize(&mut self) {
        match &self.lifecycle {
            Lifecycle::Active(_) => {
                debug!("Reader already active; ignoring initialize");
                return;
            }
            Lifecycle::Disposed => {
                debug!("Reader disposed; ignoring initialize");
                return;
            }
            Lifecycle::Pending | Lifecycle::Failed(_) => {}
        }

        let mut env = Env {
            dom: &mut self.dom,
            scheduler: &mut self.scheduler,
            host: self.host.as_deref(),
        };
        self.lifecycle = match Session::mount(&mut env, &self.config) {
            Ok(session) => Lifecycle::Active(Box::new(session)),
            Err(e) => {
                warn!(error = %e, "Reader initialization failed; page left untouched");
                Lifecycle::Failed(e)
            }
        };
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match self.lifecycle {
            Lifecycle::Pending => Phase::Pending,
            Lifecycle::Active(_) => Phase::Active,
            Lifecycle::Failed(_) => Phase::Failed,
            Lifecycle::Disposed => Phase::Disposed,
        }
    }

    /// Whether setup completed and the reader responds to input.
    pub fn is_active(&self) -> bool {
        self.phase() == Phase::Active
    }

    /// Error from the most recent failed setup attempt.
    pub fn init_error(&self) -> Option<&InitError> {
        match &self.lifecycle {
            Lifecycle::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Go back one page, or show the first-page notice.
    pub fn previous_page(&mut self) -> PageTurn {
        match self.active_parts() {
            Some((session, mut env)) => session.previous_page(&mut env),
            None => PageTurn::Ignored,
        }
    }

    /// Go forward one page, or show the last-page notice.
    pub fn next_page(&mut self) -> PageTurn {
        match self.active_parts() {
            Some((session, mut env)) => session.next_page(&mut env),
            None => PageTurn::Ignored,
        }
    }

    /// Flip the high-contrast stylesheet. Returns whether it is now enabled.
    pub fn toggle_eink_mode(&mut self) -> bool {
        let Some((session, env)) = self.active_parts() else {
            return false;
        };
        match session.eink.toggle(env.dom) {
            Ok(enabled) => {
                info!(enabled, "E-ink mode toggled");
                enabled
            }
            Err(e) => {
                warn!(error = %e, "Failed to inject e-ink stylesheet");
                session.eink.is_enabled()
            }
        }
    }

    /// Change one preference as if its switch had been flipped.
    pub fn set_preference(&mut self, toggle: PreferenceToggle, value: bool) {
        if let Some((session, mut env)) = self.active_parts() {
            session.set_preference(&mut env, toggle, value);
        }
    }

    /// Route a DOM event delivered to one of the registered listeners.
    pub fn handle_event(&mut self, event: DomEvent) {
        if matches!(event, DomEvent::Unload) {
            self.cleanup();
            return;
        }
        let Some((session, mut env)) = self.active_parts() else {
            return;
        };
        match event {
            DomEvent::Resize => session.events.on_resize(env.scheduler),
            DomEvent::KeyDown { key } => session.on_key(&mut env, &key),
            DomEvent::MouseMove => session.on_mousemove(&mut env),
            DomEvent::Click { target } => session.on_click(&mut env, target),
            DomEvent::Change { target, checked } => session.on_change(&mut env, target, checked),
            DomEvent::Unload => {}
        }
    }

    /// Run the callback behind a fired timer.
    pub fn handle_timer(&mut self, token: TimerToken) {
        match self.active_parts() {
            Some((session, mut env)) => session.on_timer(&mut env, token),
            None => debug!(token = token.get(), "Timer fired while inactive"),
        }
    }

    /// Remove every listener, timer and injected node. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        let previous = std::mem::replace(&mut self.lifecycle, Lifecycle::Disposed);
        if let Lifecycle::Active(mut session) = previous {
            let mut env = Env {
                dom: &mut self.dom,
                scheduler: &mut self.scheduler,
                host: self.host.as_deref(),
            };
            session.unmount(&mut env);
            info!("Reader cleaned up");
        }
    }

    /// Pagination state while active.
    pub fn page_state(&self) -> Option<&PageState> {
        self.session().map(|s| s.pagination.state())
    }

    /// Current preferences while active.
    pub fn preferences(&self) -> Option<UiPreferences> {
        self.session().map(|s| s.prefs)
    }

    /// Whether the e-ink stylesheet is applied.
    pub fn is_eink(&self) -> bool {
        self.session().is_some_and(|s| s.eink.is_enabled())
    }

    /// Located content region while active.
    pub fn region(&self) -> Option<ContentRegion> {
        self.session().map(|s| s.region)
    }

    /// Node of a navigation button.
    pub fn button_node(&self, role: ButtonRole) -> Option<NodeId> {
        self.session().map(|s| match role {
            ButtonRole::Previous => s.buttons.previous(),
            ButtonRole::Next => s.buttons.next(),
        })
    }

    /// Node of the settings gear.
    pub fn gear_node(&self) -> Option<NodeId> {
        self.session().map(|s| s.panel.gear())
    }

    /// Checkbox input backing a settings switch.
    pub fn switch_node(&self, toggle: PreferenceToggle) -> Option<NodeId> {
        self.session().and_then(|s| s.panel.input_for(toggle))
    }

    /// Whether the settings panel is showing.
    pub fn panel_open(&self) -> bool {
        self.session().is_some_and(|s| s.panel.is_open())
    }

    /// Most recent notice shown.
    pub fn last_notice(&self) -> Option<Notice> {
        self.session().and_then(|s| s.notifier.last())
    }

    /// Registered listeners and pending engine timers.
    pub fn live_resources(&self) -> (usize, usize) {
        self.session().map_or((0, 0), Session::live_resources)
    }

    /// The page this reader is bound to.
    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Mutable page access, for hosts that change geometry between events.
    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// The timer service.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Mutable timer service, for drivers that fire timers.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Resolved configuration this reader was created with.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
