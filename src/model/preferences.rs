//! User-facing preferences and the toggles that mutate them.

use serde::Serialize;

/// Layout strategy applied to the content region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    /// Edge-to-edge content with ancestor width limits removed.
    FullWidth,
    /// Centered fixed-width column.
    Focused,
}

impl LayoutMode {
    /// Map the `full_width` preference flag to a mode.
    pub fn from_full_width(full_width: bool) -> Self {
        if full_width {
            Self::FullWidth
        } else {
            Self::Focused
        }
    }
}

/// Preference state read by layout and navigation controls.
///
/// Not persisted: every fresh initialization starts from the configured defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UiPreferences {
    /// Navigation buttons are shown (opacity 1, clickable).
    pub buttons_visible: bool,
    /// Arrow keys turn pages.
    pub keyboard_enabled: bool,
    /// Buttons are stacked on the right edge instead of on opposite edges.
    pub buttons_on_right: bool,
    /// Full-width layout instead of the focused column.
    pub full_width: bool,
}

impl UiPreferences {
    /// Current layout mode.
    pub fn layout_mode(&self) -> LayoutMode {
        LayoutMode::from_full_width(self.full_width)
    }

    /// Read the flag bound to `toggle`.
    pub fn get(&self, toggle: PreferenceToggle) -> bool {
        match toggle {
            PreferenceToggle::Buttons => self.buttons_visible,
            PreferenceToggle::Keyboard => self.keyboard_enabled,
            PreferenceToggle::Position => self.buttons_on_right,
            PreferenceToggle::Layout => self.full_width,
        }
    }

    /// Write the flag bound to `toggle`.
    pub fn set(&mut self, toggle: PreferenceToggle, value: bool) {
        match toggle {
            PreferenceToggle::Buttons => self.buttons_visible = value,
            PreferenceToggle::Keyboard => self.keyboard_enabled = value,
            PreferenceToggle::Position => self.buttons_on_right = value,
            PreferenceToggle::Layout => self.full_width = value,
        }
    }
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            buttons_visible: true,
            keyboard_enabled: true,
            buttons_on_right: false,
            full_width: true,
        }
    }
}

/// One of the four control-panel switches, bound 1:1 to a preference field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreferenceToggle {
    /// `buttons_visible`
    Buttons,
    /// `keyboard_enabled`
    Keyboard,
    /// `buttons_on_right`
    Position,
    /// `full_width`
    Layout,
}

impl PreferenceToggle {
    /// All toggles in control-panel order.
    pub const ALL: [Self; 4] = [Self::Buttons, Self::Keyboard, Self::Position, Self::Layout];

    /// Label rendered next to the switch.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Buttons => "Navigation buttons",
            Self::Keyboard => "Keyboard control",
            Self::Position => "Buttons on the right",
            Self::Layout => "Full-width mode",
        }
    }
}

impl std::fmt::Display for PreferenceToggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Buttons => "buttons",
            Self::Keyboard => "keyboard",
            Self::Position => "position",
            Self::Layout => "layout",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for PreferenceToggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|toggle| toggle.to_string() == s)
            .ok_or_else(|| format!("unknown toggle '{}'", s))
    }
}
