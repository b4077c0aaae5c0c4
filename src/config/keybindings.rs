//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use std::collections::HashMap;

/// Maps `KeyboardEvent.key` values to domain actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: HashMap<String, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key value.
    pub fn get(&self, key: &str) -> Option<KeyAction> {
        self.bindings.get(key).copied()
    }

    /// Bind `key` to `action`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: &str, action: KeyAction) {
        self.bindings.insert(key.to_string(), action);
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        // Page turning
        bindings.insert("ArrowLeft".to_string(), KeyAction::PreviousPage);
        bindings.insert("ArrowRight".to_string(), KeyAction::NextPage);

        // Toggles, both cases so Caps Lock doesn't matter
        bindings.insert("h".to_string(), KeyAction::ToggleButtons);
        bindings.insert("H".to_string(), KeyAction::ToggleButtons);
        bindings.insert("k".to_string(), KeyAction::ToggleKeyboard);
        bindings.insert("K".to_string(), KeyAction::ToggleKeyboard);

        Self { bindings }
    }
}
