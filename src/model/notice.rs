//! User-visible notices.

use crate::model::preferences::LayoutMode;
use std::fmt;

/// Message shown to the user after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// `previous_page` was requested on page 0.
    FirstPage,
    /// `next_page` was requested on the last page.
    LastPage,
    /// Keyboard control was switched on (`true`) or off.
    KeyboardControl(bool),
    /// Layout mode changed.
    LayoutChanged(LayoutMode),
}

/// How long a notice stays on screen before fading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Page boundary hints (short).
    Page,
    /// Status changes (longer).
    Status,
}

impl Notice {
    /// Display duration class.
    pub fn kind(&self) -> NoticeKind {
        match self {
            Self::FirstPage | Self::LastPage => NoticeKind::Page,
            Self::KeyboardControl(_) | Self::LayoutChanged(_) => NoticeKind::Status,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstPage => write!(f, "First page"),
            Self::LastPage => write!(f, "Last page"),
            Self::KeyboardControl(true) => write!(f, "Keyboard control enabled"),
            Self::KeyboardControl(false) => write!(f, "Keyboard control disabled"),
            Self::LayoutChanged(LayoutMode::FullWidth) => write!(f, "Switched to full-width mode"),
            Self::LayoutChanged(LayoutMode::Focused) => write!(f, "Switched to focused mode"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_notices_render() {
        insta::assert_snapshot!(Notice::FirstPage.to_string(), @"First page");
        insta::assert_snapshot!(Notice::LastPage.to_string(), @"Last page");
    }

    #[test]
    fn status_notices_render() {
        insta::assert_snapshot!(
            Notice::KeyboardControl(false).to_string(),
            @"Keyboard control disabled"
        );
        insta::assert_snapshot!(
            Notice::LayoutChanged(LayoutMode::Focused).to_string(),
            @"Switched to focused mode"
        );
    }

    #[test]
    fn boundary_notices_are_page_kind() {
        assert_eq!(Notice::FirstPage.kind(), NoticeKind::Page);
        assert_eq!(Notice::KeyboardControl(true).kind(), NoticeKind::Status);
    }
}
