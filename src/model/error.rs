//! Error types for the reader engine.
//!
//! This module defines the error taxonomy using `thiserror`. Errors compose via
//! `?` and `From` conversions up to [`ReaderError`], which is only surfaced by
//! the CLI shell. Inside the engine every failure degrades to "do nothing
//! further" rather than escaping into the host page.
//!
//! # Error Hierarchy
//!
//! - [`ReaderError`] - Top-level error for the binary
//!   - [`InitError`] - One-time setup failed and was rolled back
//!     - [`DomError`] - A document query or mutation failed
//!   - [`crate::config::ConfigError`] - Config file could not be read or parsed
//!   - [`crate::logging::LoggingError`] - Tracing subscriber setup failed
//!   - [`crate::simulate::ScriptError`] - Simulation script step is malformed
//!
//! # Recovery Strategy
//!
//! - **Content not found**: not an error at all; the locator falls back to the body.
//! - **Transient DOM errors** on a candidate node: caught at the point of use, the
//!   candidate is rejected.
//! - **Initialization failure**: logged, rolled back, reader stays inert.

use crate::dom::{EventKind, NodeId};
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the `ereader-view` binary.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Initialization of the reader failed.
    #[error("Reader initialization failed: {0}")]
    Init(#[from] InitError),

    /// Configuration could not be resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] crate::logging::LoggingError),

    /// Document fixture could not be loaded.
    #[error("Failed to load document {path}: {reason}")]
    Document {
        /// Path of the document fixture.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Simulation script is malformed.
    #[error("Invalid script: {0}")]
    Script(#[from] crate::simulate::ScriptError),

    /// Report serialization failed.
    #[error("Failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// Failure of a single document query or mutation.
///
/// Queries on a candidate node (style, geometry, text) may fail for detached or
/// exotic nodes; callers treat those as "reject this node".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The node is no longer attached to the document.
    #[error("Node {0} is detached from the document")]
    Detached(NodeId),

    /// The node handle does not refer to a known node.
    #[error("Node {0} does not exist")]
    MissingNode(NodeId),

    /// The document refused to create an element.
    #[error("Failed to create <{tag}> element: {reason}")]
    CreateElement {
        /// Tag that was requested.
        tag: String,
        /// Reason reported by the document.
        reason: String,
    },

    /// A listener could not be registered.
    #[error("Failed to register {kind:?} listener: {reason}")]
    Listen {
        /// Event kind that was requested.
        kind: EventKind,
        /// Reason reported by the document.
        reason: String,
    },

    /// A call into the hosting page failed.
    #[error("Host call failed: {0}")]
    Host(String),
}

/// Failure of the one-time setup sequence.
///
/// Setup is all-or-nothing: by the time this error is returned every node,
/// listener and timer created during the attempt has been released.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InitError {
    /// A document operation failed while mounting controls or listeners.
    #[error("Document operation failed: {0}")]
    Dom(#[from] DomError),

    /// Neither the page nor the host reported a usable viewport height.
    #[error("No usable viewport height (page reported {reported})")]
    NoViewport {
        /// Height reported by the page.
        reported: f64,
    },

    /// Configured margins are outside `[0, 0.5)`.
    #[error(transparent)]
    Margins(#[from] crate::model::page_state::InvalidMargins),
}

/// Host screen metrics payload could not be parsed.
#[derive(Debug, Error)]
pub enum ScreenMetricsError {
    /// Payload is not the expected JSON shape.
    #[error("Malformed screen metrics: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Density must be strictly positive.
    #[error("Screen density must be > 0 (got {0})")]
    InvalidDensity(f64),
}
