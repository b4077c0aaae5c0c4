//! E-Reader View (ereader-view)
//!
//! Paginated, reflowable reader view for already-rendered web pages.
//!
//! The engine runs over a narrow capability interface ([`dom::Dom`]) and an
//! explicit timer abstraction ([`schedule::Scheduler`]) so the same code drives
//! a browser page (feature `web`) and the in-memory document used by the CLI
//! and the test suite.
//!
//! Layering follows Pure Core / Impure Shell:
//!
//! - `model`, `content`, `state`: pure data and state machines
//! - `view`: controls and stylesheet injection over a [`dom::Dom`]
//! - `reader`: lifecycle and event dispatch that ties it together
//! - `host`: host-provided services and the web adapter

pub mod config;
pub mod content;
pub mod dom;
pub mod host;
pub mod logging;
pub mod model;
pub mod reader;
pub mod schedule;
pub mod simulate;
pub mod state;
pub mod view;

pub use reader::{PageTurn, Reader};
pub use simulate::{Simulation, Step};

#[cfg(test)]
mod test_harness;
