//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that keyboard shortcuts map to.
///
/// These represent user intent, not specific keys. The mapping from DOM
/// `KeyboardEvent.key` strings to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Go back one page. Default: ArrowLeft
    PreviousPage,
    /// Go forward one page. Default: ArrowRight
    NextPage,
    /// Show or hide the navigation buttons. Default: h/H
    ToggleButtons,
    /// Enable or disable keyboard page turning. Default: k/K
    ToggleKeyboard,
}

impl KeyAction {
    /// Whether this action is suppressed while keyboard control is disabled.
    ///
    /// `ToggleKeyboard` must stay reachable or keyboard control could never be
    /// switched back on.
    pub fn requires_keyboard(&self) -> bool {
        matches!(self, Self::PreviousPage | Self::NextPage)
    }
}
