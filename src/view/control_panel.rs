//! Settings panel with one switch per preference, opened by a gear button.
//!
//! The panel only renders state. Mutations go through the reader's change
//! handler, which then calls [`ControlPanel::sync`] so the switches follow
//! changes made from the keyboard or by pointer auto-show as well.

use super::constants::{
    self, GEAR_LABEL, GEAR_STYLE, KNOB_OFF, KNOB_ON, PANEL_STYLE, SWITCH_INPUT_STYLE,
    SWITCH_KNOB_STYLE, SWITCH_ROW_STYLE, SWITCH_SLIDER_STYLE, SWITCH_TRACK_STYLE,
};
use crate::dom::{Dom, NodeId};
use crate::model::{DomError, PreferenceToggle, UiPreferences};

/// One checkbox switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch {
    /// Preference the switch is bound to.
    pub toggle: PreferenceToggle,
    /// The checkbox `<input>`.
    pub input: NodeId,
    /// The slider knob drawn over it.
    pub knob: NodeId,
}

/// Injected settings panel and its gear trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    panel: NodeId,
    gear: NodeId,
    switches: Vec<Switch>,
    open: bool,
}

impl ControlPanel {
    /// Build the panel (closed) and the gear button under the body.
    ///
    /// Nothing is attached to the page until every element has been created,
    /// so a failure leaves no trace.
    pub fn build<D: Dom + ?Sized>(dom: &mut D, prefs: &UiPreferences) -> Result<Self, DomError> {
        let panel = dom.create_element("div")?;
        constants::apply(dom, panel, PANEL_STYLE, false);
        dom.set_style(panel, "display", "none", false);

        let mut switches = Vec::with_capacity(PreferenceToggle::ALL.len());
        for toggle in PreferenceToggle::ALL {
            let (row, switch) = build_switch(dom, toggle)?;
            dom.append_child(panel, row)?;
            switches.push(switch);
        }

        let gear = dom.create_element("button")?;
        dom.set_text(gear, GEAR_LABEL);
        dom.set_attribute(gear, "aria-label", "Reader settings")?;
        constants::apply(dom, gear, GEAR_STYLE, false);

        let body = dom.body();
        dom.append_child(body, panel)?;
        if let Err(e) = dom.append_child(body, gear) {
            dom.remove(panel);
            return Err(e);
        }

        let control_panel = Self {
            panel,
            gear,
            switches,
            open: false,
        };
        control_panel.sync(dom, prefs);
        Ok(control_panel)
    }

    /// Panel container.
    pub fn panel(&self) -> NodeId {
        self.panel
    }

    /// Gear button.
    pub fn gear(&self) -> NodeId {
        self.gear
    }

    /// Switches in panel order.
    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    /// Whether the panel is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the panel between `display: none` and `display: flex`.
    pub fn toggle_open<D: Dom + ?Sized>(&mut self, dom: &mut D) -> bool {
        self.open = !self.open;
        let display = if self.open { "flex" } else { "none" };
        dom.set_style(self.panel, "display", display, false);
        self.open
    }

    /// Preference bound to the checkbox `node`.
    pub fn switch_for(&self, node: NodeId) -> Option<PreferenceToggle> {
        self.switches
            .iter()
            .find(|s| s.input == node)
            .map(|s| s.toggle)
    }

    /// Checkbox bound to `toggle`.
    pub fn input_for(&self, toggle: PreferenceToggle) -> Option<NodeId> {
        self.switches
            .iter()
            .find(|s| s.toggle == toggle)
            .map(|s| s.input)
    }

    /// Make every switch reflect `prefs`.
    pub fn sync<D: Dom + ?Sized>(&self, dom: &mut D, prefs: &UiPreferences) {
        for switch in &self.switches {
            let on = prefs.get(switch.toggle);
            dom.set_checked(switch.input, on);
            dom.set_style(switch.knob, "transform", if on { KNOB_ON } else { KNOB_OFF }, false);
        }
    }

    /// Detach the panel and the gear.
    pub fn remove<D: Dom + ?Sized>(&self, dom: &mut D) {
        dom.remove(self.panel);
        dom.remove(self.gear);
    }
}

/// `row > [span(label), label(track) > [input, span(slider) > span(knob)]]`
fn build_switch<D: Dom + ?Sized>(
    dom: &mut D,
    toggle: PreferenceToggle,
) -> Result<(NodeId, Switch), DomError> {
    let row = dom.create_element("div")?;
    constants::apply(dom, row, SWITCH_ROW_STYLE, false);

    let text = dom.create_element("span")?;
    dom.set_text(text, toggle.label());

    let track = dom.create_element("label")?;
    constants::apply(dom, track, SWITCH_TRACK_STYLE, false);

    let input = dom.create_element("input")?;
    dom.set_attribute(input, "type", "checkbox")?;
    constants::apply(dom, input, SWITCH_INPUT_STYLE, false);

    let slider = dom.create_element("span")?;
    constants::apply(dom, slider, SWITCH_SLIDER_STYLE, false);
    let knob = dom.create_element("span")?;
    constants::apply(dom, knob, SWITCH_KNOB_STYLE, false);

    dom.append_child(slider, knob)?;
    dom.append_child(track, input)?;
    dom.append_child(track, slider)?;
    dom.append_child(row, text)?;
    dom.append_child(row, track)?;

    Ok((row, Switch { toggle, input, knob }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DocumentSpec, MemoryDom};

    fn dom() -> MemoryDom {
        MemoryDom::new(DocumentSpec::new(800.0, Vec::new()))
    }

    #[test]
    fn panel_starts_hidden_with_four_switches() {
        let mut dom = dom();
        let panel = ControlPanel::build(&mut dom, &UiPreferences::default()).unwrap();

        assert!(!panel.is_open());
        assert_eq!(dom.style(panel.panel(), "display").as_deref(), Some("none"));
        let toggles: Vec<_> = panel.switches().iter().map(|s| s.toggle).collect();
        assert_eq!(toggles, PreferenceToggle::ALL.to_vec());
        assert_eq!(
            dom.children(dom.body()),
            vec![panel.panel(), panel.gear()],
            "only the panel and gear hang off the body"
        );
    }

    #[test]
    fn gear_flips_between_none_and_flex() {
        let mut dom = dom();
        let mut panel = ControlPanel::build(&mut dom, &UiPreferences::default()).unwrap();

        assert!(panel.toggle_open(&mut dom));
        assert_eq!(dom.style(panel.panel(), "display").as_deref(), Some("flex"));
        assert!(!panel.toggle_open(&mut dom));
        assert_eq!(dom.style(panel.panel(), "display").as_deref(), Some("none"));
    }

    #[test]
    fn switches_reflect_preferences() {
        let mut dom = dom();
        let prefs = UiPreferences::default();
        let panel = ControlPanel::build(&mut dom, &prefs).unwrap();

        for switch in panel.switches() {
            assert_eq!(dom.is_checked(switch.input), prefs.get(switch.toggle));
        }
        let position = panel.switches()[2];
        assert_eq!(dom.style(position.knob, "transform").as_deref(), Some(KNOB_OFF));
    }

    #[test]
    fn sync_follows_external_changes() {
        let mut dom = dom();
        let mut prefs = UiPreferences::default();
        let panel = ControlPanel::build(&mut dom, &prefs).unwrap();

        prefs.keyboard_enabled = false;
        panel.sync(&mut dom, &prefs);

        let input = panel.input_for(PreferenceToggle::Keyboard).unwrap();
        assert!(!dom.is_checked(input));
        assert_eq!(panel.switch_for(input), Some(PreferenceToggle::Keyboard));
    }

    #[test]
    fn failed_build_attaches_nothing() {
        let mut dom = dom();
        dom.fail_create("input");
        assert!(ControlPanel::build(&mut dom, &UiPreferences::default()).is_err());
        assert!(dom.injected_nodes().is_empty());
    }
}
