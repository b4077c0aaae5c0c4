//! User notices: native toast when a host is attached, in-page banner otherwise.
//!
//! An in-page banner stays fully visible for its display time, fades out, and
//! is detached once the fade has finished. Both steps are timers owned here.

use super::constants::{self, NOTICE_STYLE};
use crate::dom::{Dom, NodeId};
use crate::host::Host;
use crate::model::{DomError, Notice, NoticeKind};
use crate::schedule::{Scheduler, TimerToken};
use std::time::Duration;
use tracing::{debug, warn};

/// Display durations for notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTimings {
    /// Page boundary notices.
    pub page: Duration,
    /// Status notices.
    pub status: Duration,
    /// Fade-out before removal.
    pub fade: Duration,
}

impl NoticeTimings {
    /// Display time for a notice kind.
    pub fn display_for(&self, kind: NoticeKind) -> Duration {
        match kind {
            NoticeKind::Page => self.page,
            NoticeKind::Status => self.status,
        }
    }
}

impl Default for NoticeTimings {
    fn default() -> Self {
        Self {
            page: Duration::from_millis(1500),
            status: Duration::from_millis(3000),
            fade: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Showing(TimerToken),
    Fading(TimerToken),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Banner {
    node: NodeId,
    phase: Phase,
}

/// Shows notices and owns the timers of in-page banners.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notifier {
    timings: NoticeTimings,
    banners: Vec<Banner>,
    last: Option<Notice>,
}

impl Notifier {
    /// Notifier with the given durations.
    pub fn new(timings: NoticeTimings) -> Self {
        Self {
            timings,
            banners: Vec::new(),
            last: None,
        }
    }

    /// Most recent notice shown.
    pub fn last(&self) -> Option<Notice> {
        self.last
    }

    /// Number of in-page banners still attached.
    pub fn banner_count(&self) -> usize {
        self.banners.len()
    }

    /// Show `notice` through the host, or as an in-page banner.
    ///
    /// A banner that cannot be created is logged and dropped.
    pub fn show<D: Dom + ?Sized, S: Scheduler + ?Sized>(
        &mut self,
        dom: &mut D,
        scheduler: &mut S,
        host: Option<&dyn Host>,
        notice: Notice,
    ) {
        self.last = Some(notice);
        let text = notice.to_string();
        debug!(%text, "Showing notice");

        if let Some(host) = host {
            host.toast(&text);
            return;
        }

        match create_banner(dom, &text) {
            Ok(node) => {
                let token = scheduler.schedule(self.timings.display_for(notice.kind()));
                self.banners.push(Banner {
                    node,
                    phase: Phase::Showing(token),
                });
            }
            Err(e) => warn!(error = %e, %text, "Failed to show notice"),
        }
    }

    /// Advance the banner owning `token`. Returns `false` for foreign tokens.
    pub fn claim_timer<D: Dom + ?Sized, S: Scheduler + ?Sized>(
        &mut self,
        dom: &mut D,
        scheduler: &mut S,
        token: TimerToken,
    ) -> bool {
        let Some(index) = self.banners.iter().position(|b| match b.phase {
            Phase::Showing(t) | Phase::Fading(t) => t == token,
        }) else {
            return false;
        };

        let banner = self.banners[index];
        match banner.phase {
            Phase::Showing(_) => {
                dom.set_style(banner.node, "opacity", "0", false);
                let removal = scheduler.schedule(self.timings.fade);
                self.banners[index].phase = Phase::Fading(removal);
            }
            Phase::Fading(_) => {
                dom.remove(banner.node);
                self.banners.remove(index);
            }
        }
        true
    }

    /// Cancel every banner timer and detach every banner.
    pub fn clear<D: Dom + ?Sized, S: Scheduler + ?Sized>(&mut self, dom: &mut D, scheduler: &mut S) {
        for banner in self.banners.drain(..) {
            let (Phase::Showing(token) | Phase::Fading(token)) = banner.phase;
            scheduler.cancel(token);
            dom.remove(banner.node);
        }
    }
}

fn create_banner<D: Dom + ?Sized>(dom: &mut D, text: &str) -> Result<NodeId, DomError> {
    let node = dom.create_element("div")?;
    constants::apply(dom, node, NOTICE_STYLE, false);
    dom.set_text(node, text);
    let body = dom.body();
    dom.append_child(body, node)?;
    Ok(node)
}
