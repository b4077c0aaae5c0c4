//! Engine state machines (pure).
//!
//! Nothing here touches page styling: pagination decides pages and offsets,
//! the event coordinator decides which listeners and timers are live.

pub mod events;
pub mod pagination;

pub use events::{EventCoordinator, Registration, TimerKind};
pub use pagination::{Boundary, PageStep, PaginationController};
