//! Domain model types (pure data, no document access).

pub mod error;
pub mod key_action;
pub mod notice;
pub mod page_state;
pub mod preferences;

pub use error::{DomError, InitError, ReaderError, ScreenMetricsError};
pub use key_action::KeyAction;
pub use notice::{Notice, NoticeKind};
pub use page_state::{InvalidMargins, InvalidViewportHeight, Margins, PageState, ViewportHeight};
pub use preferences::{LayoutMode, PreferenceToggle, UiPreferences};
