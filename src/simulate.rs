//! Scripted reading sessions over an in-memory page.
//!
//! A script is a list of steps separated by commas or whitespace, one or more
//! per line. Lines starting with `#` are comments.
//!
//! ```text
//! next prev eink mouse unload
//! key:ArrowRight  resize:1000  scroll:640  wait:250
//! click:prev  click:next  click:gear
//! toggle:buttons  toggle:keyboard  toggle:position  toggle:layout
//! ```

use crate::config::ResolvedConfig;
use crate::content::ContentRegion;
use crate::dom::{Dom, DomEvent, MemoryDom, ReadyState};
use crate::model::{LayoutMode, PreferenceToggle};
use crate::reader::{Phase, Reader};
use crate::schedule::ManualScheduler;
use crate::view::ButtonRole;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Malformed script step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    /// The step name is not recognized.
    #[error("Unknown step '{0}'")]
    UnknownStep(String),

    /// The step needs an argument it did not get, or the argument is invalid.
    #[error("Invalid argument '{value}' for step '{step}'")]
    InvalidArgument {
        /// Step name.
        step: String,
        /// Offending argument.
        value: String,
    },
}

/// Control that a `click:` step targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Previous-page button.
    Previous,
    /// Next-page button.
    Next,
    /// Settings gear.
    Gear,
}

/// One scripted user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Host calls `next_page`.
    Next,
    /// Host calls `previous_page`.
    Previous,
    /// Host calls `toggle_eink_mode`.
    Eink,
    /// Key press with the given `KeyboardEvent.key`.
    Key(String),
    /// Pointer movement.
    MouseMove,
    /// Viewport resized to the given height.
    Resize(f64),
    /// User scrolled the window to the given offset.
    Scroll(f64),
    /// Let the given number of milliseconds pass.
    Wait(u64),
    /// Click on an injected control.
    Click(ClickTarget),
    /// Flip a settings switch.
    Toggle(PreferenceToggle),
    /// Page is being discarded.
    Unload,
}

fn argument<T: FromStr>(step: &str, value: Option<&str>) -> Result<T, ScriptError> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| invalid(step, value))
}

impl FromStr for Step {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, value) = match s.split_once(':') {
            Some((name, value)) => (name, Some(value)),
            None => (s, None),
        };
        let step = match name {
            "next" => Self::Next,
            "prev" => Self::Previous,
            "eink" => Self::Eink,
            "mouse" => Self::MouseMove,
            "unload" => Self::Unload,
            "key" => match value {
                Some(key) if !key.is_empty() => Self::Key(key.to_string()),
                _ => return Err(invalid(name, value)),
            },
            "resize" => Self::Resize(argument(name, value)?),
            "scroll" => Self::Scroll(argument(name, value)?),
            "wait" => Self::Wait(argument(name, value)?),
            "click" => Self::Click(match value {
                Some("prev") => ClickTarget::Previous,
                Some("next") => ClickTarget::Next,
                Some("gear") => ClickTarget::Gear,
                _ => return Err(invalid(name, value)),
            }),
            "toggle" => Self::Toggle(argument(name, value)?),
            _ => return Err(ScriptError::UnknownStep(s.to_string())),
        };
        Ok(step)
    }
}

fn invalid(step: &str, value: Option<&str>) -> ScriptError {
    ScriptError::InvalidArgument {
        step: step.to_string(),
        value: value.unwrap_or_default().to_string(),
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => write!(f, "next"),
            Self::Previous => write!(f, "prev"),
            Self::Eink => write!(f, "eink"),
            Self::Key(key) => write!(f, "key:{}", key),
            Self::MouseMove => write!(f, "mouse"),
            Self::Resize(height) => write!(f, "resize:{}", height),
            Self::Scroll(y) => write!(f, "scroll:{}", y),
            Self::Wait(ms) => write!(f, "wait:{}", ms),
            Self::Click(ClickTarget::Previous) => write!(f, "click:prev"),
            Self::Click(ClickTarget::Next) => write!(f, "click:next"),
            Self::Click(ClickTarget::Gear) => write!(f, "click:gear"),
            Self::Toggle(toggle) => write!(f, "toggle:{}", toggle),
            Self::Unload => write!(f, "unload"),
        }
    }
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first malformed step.
pub fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|step| !step.is_empty())
        .map(str::parse)
        .collect()
}

/// Observable reader state after a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    /// Step that produced this state, or `"init"`.
    pub step: String,
    /// Virtual time in milliseconds.
    pub elapsed_ms: u64,
    /// Lifecycle phase.
    pub phase: Phase,
    /// 0-based current page.
    pub page: Option<usize>,
    /// Page count.
    pub total_pages: Option<usize>,
    /// Window scroll offset.
    pub scroll_y: f64,
    /// Most recent notice text.
    pub notice: Option<String>,
    /// Whether the e-ink stylesheet is applied.
    pub eink: bool,
    /// Whether the navigation buttons are showing.
    pub buttons_visible: Option<bool>,
    /// Current layout mode.
    pub layout: Option<LayoutMode>,
    /// Whether the settings panel is open.
    pub panel_open: bool,
}

/// Full output of a scripted session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    /// Region the reader settled on.
    pub region: Option<ContentRegion>,
    /// State right after setup.
    pub initial: StepReport,
    /// State after each step, in order.
    pub steps: Vec<StepReport>,
}

/// A reader over a [`MemoryDom`] driven by a virtual clock.
pub struct Simulation {
    reader: Reader<MemoryDom, ManualScheduler>,
}

impl Simulation {
    /// Load `dom` the way a browser would: readiness first, then the load event.
    pub fn start(dom: MemoryDom, config: ResolvedConfig) -> Self {
        let ready_state = dom.ready_state();
        let mut reader = Reader::new(dom, ManualScheduler::new(), config);
        reader.on_ready_state(ready_state);
        if ready_state == ReadyState::Loading {
            reader.dom_mut().set_ready_state(ReadyState::Complete);
        }
        reader.on_load();
        Self { reader }
    }

    /// The driven reader.
    pub fn reader(&self) -> &Reader<MemoryDom, ManualScheduler> {
        &self.reader
    }

    /// Apply one step and report the resulting state.
    pub fn run(&mut self, step: &Step) -> StepReport {
        debug!(%step, "Running step");
        match step {
            Step::Next => {
                self.reader.next_page();
            }
            Step::Previous => {
                self.reader.previous_page();
            }
            Step::Eink => {
                self.reader.toggle_eink_mode();
            }
            Step::Key(key) => self.reader.handle_event(DomEvent::KeyDown { key: key.clone() }),
            Step::MouseMove => self.reader.handle_event(DomEvent::MouseMove),
            Step::Resize(height) => {
                self.reader.dom_mut().set_viewport_height(*height);
                self.reader.handle_event(DomEvent::Resize);
            }
            Step::Scroll(y) => self.reader.dom_mut().set_scroll_y(*y),
            Step::Wait(ms) => self.wait(Duration::from_millis(*ms)),
            Step::Click(target) => {
                let node = match target {
                    ClickTarget::Previous => self.reader.button_node(ButtonRole::Previous),
                    ClickTarget::Next => self.reader.button_node(ButtonRole::Next),
                    ClickTarget::Gear => self.reader.gear_node(),
                };
                if let Some(target) = node {
                    self.reader.handle_event(DomEvent::Click { target });
                }
            }
            Step::Toggle(toggle) => {
                let node = self.reader.switch_node(*toggle);
                let current = self.reader.preferences().map(|p| p.get(*toggle));
                if let (Some(target), Some(current)) = (node, current) {
                    self.reader.handle_event(DomEvent::Change {
                        target,
                        checked: !current,
                    });
                }
            }
            Step::Unload => self.reader.handle_event(DomEvent::Unload),
        }
        self.snapshot(&step.to_string())
    }

    /// Run every step and collect the reports.
    pub fn run_script(&mut self, steps: &[Step]) -> SessionReport {
        let initial = self.snapshot("init");
        let region = self.reader.region();
        let steps = steps.iter().map(|step| self.run(step)).collect();
        SessionReport {
            region,
            initial,
            steps,
        }
    }

    /// Fire every timer due within `duration`, in due order.
    fn wait(&mut self, duration: Duration) {
        let until = self.reader.scheduler().now() + duration;
        while let Some(token) = self.reader.scheduler_mut().pop_due(until) {
            self.reader.handle_timer(token);
        }
        self.reader.scheduler_mut().advance_to(until);
    }

    /// Current observable state labelled `step`.
    pub fn snapshot(&self, step: &str) -> StepReport {
        let reader = &self.reader;
        let state = reader.page_state();
        let prefs = reader.preferences();
        StepReport {
            step: step.to_string(),
            elapsed_ms: u64::try_from(reader.scheduler().now().as_millis()).unwrap_or(u64::MAX),
            phase: reader.phase(),
            page: state.map(|s| s.current_page()),
            total_pages: state.map(|s| s.total_pages()),
            scroll_y: reader.dom().scroll_y(),
            notice: reader.last_notice().map(|n| n.to_string()),
            eink: reader.is_eink(),
            buttons_visible: prefs.map(|p| p.buttons_visible),
            layout: prefs.map(|p| p.layout_mode()),
            panel_open: reader.panel_open(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_harness::{article_page, test_config};

    #[test]
    fn parses_every_step_form() {
        let steps = parse_script(
            "# warm up\nnext prev eink mouse unload\nkey:ArrowRight resize:1000 scroll:640.5 wait:250\nclick:gear toggle:layout\n",
        )
        .unwrap();

        assert_eq!(
            steps,
            vec![
                Step::Next,
                Step::Previous,
                Step::Eink,
                Step::MouseMove,
                Step::Unload,
                Step::Key("ArrowRight".to_string()),
                Step::Resize(1000.0),
                Step::Scroll(640.5),
                Step::Wait(250),
                Step::Click(ClickTarget::Gear),
                Step::Toggle(PreferenceToggle::Layout),
            ]
        );
    }

    #[test]
    fn accepts_comma_separated_steps() {
        assert_eq!(
            parse_script("next,next, key:h").unwrap(),
            vec![Step::Next, Step::Next, Step::Key("h".to_string())]
        );
    }

    #[test]
    fn rejects_unknown_step() {
        assert_eq!(
            "jump".parse::<Step>(),
            Err(ScriptError::UnknownStep("jump".to_string()))
        );
    }

    #[test]
    fn rejects_bad_arguments() {
        for bad in ["wait:soon", "resize:", "click:menu", "toggle:colour", "key:", "key"] {
            assert!(
                matches!(bad.parse::<Step>(), Err(ScriptError::InvalidArgument { .. })),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn step_display_parses_back() {
        for text in ["key:h", "wait:300", "click:prev", "toggle:keyboard", "resize:900"] {
            let step: Step = text.parse().unwrap();
            assert_eq!(step.to_string(), text);
        }
    }

    #[test]
    fn loading_document_initializes_on_load() {
        let mut dom = article_page(800.0, 3000.0, 2000.0);
        dom.set_ready_state(ReadyState::Loading);

        let sim = Simulation::start(dom, test_config());

        assert!(sim.reader().is_active());
    }

    #[test]
    fn script_reports_each_step() {
        let mut sim = Simulation::start(article_page(800.0, 3000.0, 2000.0), test_config());
        let steps = parse_script("prev next next wait:1500 toggle:layout").unwrap();

        let report = sim.run_script(&steps);

        assert_eq!(report.initial.page, Some(0));
        assert_eq!(report.initial.total_pages, Some(4));
        assert_eq!(report.steps[0].notice.as_deref(), Some("First page"));
        assert_eq!(report.steps[2].page, Some(2));
        assert_eq!(report.steps[2].scroll_y, 1280.0);
        assert_eq!(report.steps[3].elapsed_ms, 1500);
        let last = report.steps.last().unwrap();
        assert_eq!(last.layout, Some(LayoutMode::Focused));
        assert_eq!(last.total_pages, Some(5));
        assert_eq!(last.notice.as_deref(), Some("Switched to focused mode"));
    }

    #[test]
    fn clicks_reach_injected_controls() {
        let mut sim = Simulation::start(article_page(800.0, 3000.0, 2000.0), test_config());

        sim.run(&Step::Click(ClickTarget::Next));
        let report = sim.run(&Step::Click(ClickTarget::Gear));

        assert_eq!(report.page, Some(1));
        assert!(report.panel_open);
    }

    #[test]
    fn steps_after_unload_are_inert() {
        let mut sim = Simulation::start(article_page(800.0, 3000.0, 2000.0), test_config());

        sim.run(&Step::Unload);
        let report = sim.run(&Step::Next);

        assert_eq!(report.phase, Phase::Disposed);
        assert_eq!(report.page, None);
    }
}
