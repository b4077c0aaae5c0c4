//! High-contrast grayscale override for e-ink panels.

use super::constants::{EINK_CSS, EINK_STYLE_ID};
use crate::dom::{Dom, NodeId};
use crate::model::DomError;
use tracing::debug;

/// Owns the single `<style id="eink-mode">` element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EinkModeToggle {
    style: Option<NodeId>,
}

impl EinkModeToggle {
    /// Toggle starting in the off state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the override is applied.
    pub fn is_enabled(&self) -> bool {
        self.style.is_some()
    }

    /// Flip the override and return the new state.
    ///
    /// If the stylesheet cannot be created the mode stays off.
    pub fn toggle<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Result<bool, DomError> {
        if self.is_enabled() {
            self.disable(dom);
        } else {
            self.enable(dom)?;
        }
        debug!(enabled = self.is_enabled(), "Toggled e-ink mode");
        Ok(self.is_enabled())
    }

    fn enable<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Result<(), DomError> {
        let style = dom.create_element("style")?;
        dom.set_attribute(style, "id", EINK_STYLE_ID)?;
        dom.set_text(style, EINK_CSS);
        let head = dom.head();
        dom.append_child(head, style)?;
        self.style = Some(style);
        Ok(())
    }

    /// Remove the override if present. Removing an absent override is a no-op.
    pub fn disable<D: Dom + ?Sized>(&mut self, dom: &mut D) {
        if let Some(style) = self.style.take() {
            dom.remove(style);
        }
        // A stale copy (e.g. from an earlier session on the same page) goes too.
        if let Some(stale) = dom.element_by_id(EINK_STYLE_ID) {
            dom.remove(stale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DocumentSpec, MemoryDom};

    fn dom() -> MemoryDom {
        MemoryDom::new(DocumentSpec::new(800.0, Vec::new()))
    }

    #[test]
    fn toggle_strictly_alternates() {
        let mut dom = dom();
        let mut eink = EinkModeToggle::new();

        for expected in [true, false, true, false] {
            assert_eq!(eink.toggle(&mut dom), Ok(expected));
            assert_eq!(dom.element_by_id(EINK_STYLE_ID).is_some(), expected);
        }
    }

    #[test]
    fn stylesheet_lives_in_head() {
        let mut dom = dom();
        let mut eink = EinkModeToggle::new();
        eink.toggle(&mut dom).unwrap();

        let style = dom.element_by_id(EINK_STYLE_ID).unwrap();
        assert_eq!(dom.parent(style), Some(dom.head()));
        assert!(dom
            .own_text(style)
            .is_some_and(|css| css.contains("grayscale(100%)")));
    }

    #[test]
    fn repeated_disable_is_noop() {
        let mut dom = dom();
        let mut eink = EinkModeToggle::new();
        eink.disable(&mut dom);
        eink.disable(&mut dom);
        assert!(!eink.is_enabled());
    }

    #[test]
    fn failed_creation_stays_off() {
        let mut dom = dom();
        dom.fail_create("style");
        let mut eink = EinkModeToggle::new();
        assert!(eink.toggle(&mut dom).is_err());
        assert!(!eink.is_enabled());
    }
}
