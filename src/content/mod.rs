//! Primary content detection.

pub mod locator;

pub use locator::{ContentLocator, ContentRegion, Rejection};
