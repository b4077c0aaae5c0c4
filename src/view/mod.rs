//! Page styling and injected controls (impure shell over [`crate::dom::Dom`]).

pub mod constants;
pub mod control_panel;
pub mod eink;
pub mod layout;
pub mod nav_buttons;
pub mod notification;

pub use control_panel::{ControlPanel, Switch};
pub use eink::EinkModeToggle;
pub use layout::LayoutEngine;
pub use nav_buttons::{ButtonRole, NavigationButtons};
pub use notification::{NoticeTimings, Notifier};
