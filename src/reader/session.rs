//! State of one initialized reader and the reactions to user input.
//!
//! Everything here assumes initialization succeeded: the region is located,
//! controls are mounted and listeners are registered.

use crate::config::{KeyBindings, ResolvedConfig};
use crate::content::{ContentLocator, ContentRegion};
use crate::dom::{Dom, EventKind, ListenTarget, NodeId};
use crate::host::{query_screen_metrics, Host};
use crate::model::{
    DomError, InitError, KeyAction, Margins, Notice, PageState, PreferenceToggle, UiPreferences,
    ViewportHeight,
};
use crate::schedule::{Scheduler, TimerToken};
use crate::state::{Boundary, EventCoordinator, PageStep, PaginationController, TimerKind};
use crate::view::{ButtonRole, ControlPanel, EinkModeToggle, LayoutEngine, NavigationButtons, Notifier};
use tracing::{debug, info};

/// Result of a page-turn request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageTurn {
    /// Moved to `page` and scrolled the window to `offset`.
    Moved {
        /// New 0-based page.
        page: usize,
        /// Scroll offset applied.
        offset: f64,
    },
    /// Already at a boundary; a notice was shown and nothing scrolled.
    AtBoundary(Boundary),
    /// The reader is not active.
    Ignored,
}

/// Borrowed page services for one handler invocation.
pub(crate) struct Env<'a, D, S> {
    pub dom: &'a mut D,
    pub scheduler: &'a mut S,
    pub host: Option<&'a dyn Host>,
}

/// Viewport height from the page, falling back to the host's screen metrics.
pub(crate) fn resolve_viewport<D: Dom>(dom: &D, host: Option<&dyn Host>) -> Option<ViewportHeight> {
    ViewportHeight::new(dom.viewport_height()).ok().or_else(|| {
        let metrics = query_screen_metrics(host?)?;
        debug!(?metrics, "Page reported no viewport; using host screen metrics");
        ViewportHeight::new(metrics.css_height()).ok()
    })
}

/// Everything created by a successful initialization.
#[derive(Debug)]
pub(crate) struct Session {
    pub region: ContentRegion,
    pub pagination: PaginationController,
    pub prefs: UiPreferences,
    pub layout: LayoutEngine,
    pub events: EventCoordinator,
    pub buttons: NavigationButtons,
    pub panel: ControlPanel,
    pub notifier: Notifier,
    pub eink: EinkModeToggle,
}

impl Session {
    /// Run the one-time setup sequence.
    ///
    /// Fallible steps (controls, listeners) run before the region is restyled;
    /// if any of them fails every node and listener created so far is released
    /// and the page is left as it was.
    pub fn mount<D: Dom, S: Scheduler>(
        env: &mut Env<'_, D, S>,
        config: &ResolvedConfig,
    ) -> Result<Self, InitError> {
        let margins = Margins::new(config.margins)?;
        let viewport = resolve_viewport(env.dom, env.host).ok_or(InitError::NoViewport {
            reported: env.dom.viewport_height(),
        })?;

        let region = ContentLocator::new(config.min_text_length).locate(env.dom);
        let prefs = config.preferences();

        let buttons = NavigationButtons::build(env.dom, prefs.buttons_on_right, prefs.buttons_visible)?;
        let panel = match ControlPanel::build(env.dom, &prefs) {
            Ok(panel) => panel,
            Err(e) => {
                buttons.remove(env.dom);
                return Err(e.into());
            }
        };

        let mut events = EventCoordinator::new(
            KeyBindings::default(),
            config.resize_debounce(),
            config.auto_hide(),
        );
        if let Err(e) = bind_listeners(&mut events, env.dom, &buttons, &panel) {
            events.dispose(env.dom, env.scheduler);
            panel.remove(env.dom);
            buttons.remove(env.dom);
            return Err(e.into());
        }

        let mut session = Self {
            region,
            pagination: PaginationController::new(PageState::new(margins, viewport)),
            prefs,
            layout: LayoutEngine::new(config.focused_column_width),
            events,
            buttons,
            panel,
            notifier: Notifier::new(config.notice_timings()),
            eink: EinkModeToggle::new(),
        };
        let total = session.apply_layout(env);

        info!(
            region = %region.node,
            text_length = region.text_length,
            total_pages = total,
            "Reader initialized"
        );
        Ok(session)
    }

    /// Release every listener, timer, injected node and style override.
    pub fn unmount<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>) {
        let controls = [self.buttons.previous(), self.buttons.next(), self.panel.gear()];
        let inputs = self.panel.switches().iter().map(|s| s.input);
        for node in controls.into_iter().chain(inputs) {
            self.events.release_target(env.dom, node);
        }
        self.events.dispose(env.dom, env.scheduler);
        self.notifier.clear(env.dom, env.scheduler);
        self.eink.disable(env.dom);
        self.buttons.remove(env.dom);
        self.panel.remove(env.dom);
        self.layout.restore(env.dom, self.region.node);
    }

    fn content_height<D: Dom>(&self, dom: &D) -> f64 {
        dom.scroll_height(self.region.node)
    }

    fn notify<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>, notice: Notice) {
        self.notifier.show(env.dom, env.scheduler, env.host, notice);
    }

    /// Restyle for the current layout mode and clamp to the new page count.
    fn apply_layout<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>) -> usize {
        let total = self.layout.apply_mode(
            env.dom,
            self.region.node,
            self.prefs.layout_mode(),
            self.pagination.state(),
        );
        self.pagination.set_total_pages(total);
        total
    }

    /// Scroll the window so the current page is showing.
    pub fn scroll_to_current_page<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>) -> f64 {
        let offset = self.pagination.scroll_target(self.content_height(env.dom));
        env.dom.scroll_to(offset);
        offset
    }

    fn turn<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>, step: PageStep) -> PageTurn {
        match step {
            PageStep::Advanced(page) => {
                let offset = self.scroll_to_current_page(env);
                PageTurn::Moved { page, offset }
            }
            PageStep::Blocked(boundary) => {
                let notice = match boundary {
                    Boundary::First => Notice::FirstPage,
                    Boundary::Last => Notice::LastPage,
                };
                self.notify(env, notice);
                PageTurn::AtBoundary(boundary)
            }
        }
    }

    pub fn next_page<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>) -> PageTurn {
        let step = self.pagination.next_page();
        self.turn(env, step)
    }

    pub fn previous_page<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>) -> PageTurn {
        let step = self.pagination.previous_page();
        self.turn(env, step)
    }

    fn show_buttons<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>, visible: bool) {
        self.prefs.buttons_visible = visible;
        self.buttons.set_visible(env.dom, visible);
        self.panel.sync(env.dom, &self.prefs);
    }

    /// Apply a preference change and its side effect, then resync the switches.
    pub fn set_preference<D: Dom, S: Scheduler>(
        &mut self,
        env: &mut Env<'_, D, S>,
        toggle: PreferenceToggle,
        value: bool,
    ) {
        self.prefs.set(toggle, value);
        match toggle {
            PreferenceToggle::Buttons => {
                self.events.cancel_auto_hide(env.scheduler);
                self.buttons.set_visible(env.dom, value);
            }
            PreferenceToggle::Keyboard => self.notify(env, Notice::KeyboardControl(value)),
            PreferenceToggle::Position => self.buttons.position(env.dom, value),
            PreferenceToggle::Layout => {
                self.apply_layout(env);
                self.scroll_to_current_page(env);
                self.notify(env, Notice::LayoutChanged(self.prefs.layout_mode()));
            }
        }
        self.panel.sync(env.dom, &self.prefs);
    }

    pub fn on_key<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>, key: &str) {
        let Some(action) = self.events.translate_key(key, self.prefs.keyboard_enabled) else {
            return;
        };
        match action {
            KeyAction::PreviousPage => {
                self.previous_page(env);
            }
            KeyAction::NextPage => {
                self.next_page(env);
            }
            KeyAction::ToggleButtons => {
                let visible = !self.prefs.buttons_visible;
                self.set_preference(env, PreferenceToggle::Buttons, visible);
            }
            KeyAction::ToggleKeyboard => {
                let enabled = !self.prefs.keyboard_enabled;
                self.set_preference(env, PreferenceToggle::Keyboard, enabled);
            }
        }
    }

    pub fn on_mousemove<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>) {
        if self
            .events
            .on_mousemove(env.scheduler, self.prefs.buttons_visible)
        {
            self.show_buttons(env, true);
        }
    }

    pub fn on_click<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>, target: NodeId) {
        match self.buttons.role(target) {
            Some(ButtonRole::Previous) => {
                self.previous_page(env);
            }
            Some(ButtonRole::Next) => {
                self.next_page(env);
            }
            None if target == self.panel.gear() => {
                self.panel.toggle_open(env.dom);
            }
            None => {}
        }
    }

    pub fn on_change<D: Dom, S: Scheduler>(
        &mut self,
        env: &mut Env<'_, D, S>,
        target: NodeId,
        checked: bool,
    ) {
        if let Some(toggle) = self.panel.switch_for(target) {
            self.set_preference(env, toggle, checked);
        }
    }

    /// Viewport settled after a resize: refresh geometry, keep the reader's place.
    fn on_resize_settled<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>) {
        match resolve_viewport(env.dom, env.host) {
            Some(viewport) => self.pagination.set_viewport_height(viewport),
            None => debug!("Resize reported no usable viewport; keeping previous height"),
        }
        let content_height = self.content_height(env.dom);
        self.pagination.recompute(content_height);
        let page = self.pagination.resync_from_scroll(env.dom.scroll_y());
        debug!(page, "Resynced page after resize");
        self.scroll_to_current_page(env);
    }

    /// Dispatch a fired timer. Unknown tokens are stale and ignored.
    pub fn on_timer<D: Dom, S: Scheduler>(&mut self, env: &mut Env<'_, D, S>, token: TimerToken) {
        match self.events.claim_timer(token) {
            Some(TimerKind::ResizeDebounce) => self.on_resize_settled(env),
            Some(TimerKind::AutoHide) => self.show_buttons(env, false),
            None => {
                if !self.notifier.claim_timer(env.dom, env.scheduler, token) {
                    debug!(token = token.get(), "Ignoring stale timer");
                }
            }
        }
    }

    /// Listeners plus pending engine timers, for leak checks.
    pub fn live_resources(&self) -> (usize, usize) {
        (
            self.events.listener_count(),
            self.events.pending_timer_count() + self.notifier.banner_count(),
        )
    }
}

fn bind_listeners<D: Dom>(
    events: &mut EventCoordinator,
    dom: &mut D,
    buttons: &NavigationButtons,
    panel: &ControlPanel,
) -> Result<(), DomError> {
    events.bind_page_listeners(dom)?;
    for node in [buttons.previous(), buttons.next(), panel.gear()] {
        events.register(dom, ListenTarget::Node(node), EventKind::Click)?;
    }
    for switch in panel.switches() {
        events.register(dom, ListenTarget::Node(switch.input), EventKind::Change)?;
    }
    Ok(())
}
